use std::error::Error as StdError;
use std::sync::Arc;

use crate::errors::chain::StdErrorDisplayChainExt;
use crate::errors::error_kind::{ErrorKind, HasErrorKind};

/// An error of a known `Kind` accompanied by a human-readable message.
///
/// The kind is what callers branch on, the message is what operators read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, serde::Serialize, serde::Deserialize)]
#[error("{}: {}", kind, message)]
pub struct ErrorOf<Kind: ErrorKind> {
    pub kind:    Kind,
    pub message: Arc<str>,
}

impl<K0> ErrorOf<K0>
where
    K0: ErrorKind,
{
    pub fn map_kind<K1>(self, map: impl FnOnce(K0) -> K1) -> ErrorOf<K1>
    where
        K1: ErrorKind,
    {
        let ErrorOf { kind, message } = self;
        let kind = map(kind);
        ErrorOf { kind, message }
    }
}

impl<K: ErrorKind> ErrorOf<K> {
    pub fn new(kind: K, message: impl Into<Arc<str>>) -> Self {
        let message = message.into();
        Self { kind, message }
    }

    /// Wraps an error that knows its kind; the whole `source()` chain ends up
    /// in the message.
    pub fn from_source<E>(source: E) -> Self
    where
        E: HasErrorKind<K> + StdError,
    {
        Self::new(source.kind(), source.as_display_chain().to_string())
    }

    pub fn is(&self, kind: K) -> bool {
        self.kind == kind
    }
}

impl<Kind: ErrorKind> HasErrorKind<Kind> for ErrorOf<Kind> {
    fn kind(&self) -> Kind {
        self.kind
    }
}

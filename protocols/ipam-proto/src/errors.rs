use ipam_address::subnet::{ArithmeticError, PrefixLenError, PrefixParseError};
use ipam_common::errors::error_kind::HasErrorKind;
use ipam_common::errors::error_of::ErrorOf;
use ipam_common::impl_error_kind;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum AllocErrorKind {
    /// A CIDR string failed to parse.
    MalformedPrefix,
    /// No free block is wide enough for the requested length.
    NoRoomForPrefix,
    /// A batch of requests produced nothing at all.
    NoPrefixesAvailable,
    /// Exclusions would leave the pool empty.
    PoolExhausted,
    /// A block was split past the family's bit width.
    InsufficientAddressSpace,
    /// Incrementing an address left its block.
    AddressSpaceExhausted,
    ConnectionNotFound,
    DuplicateConnection,
    /// Free blocks overlap. Signals a bug, not bad input.
    OverlapDetected,
    /// An extra-prefix request is inconsistent in itself.
    InvalidRequest,
    /// A block given back as excluded was never taken out.
    NotExcluded,
}

impl_error_kind!(AllocErrorKind);

pub type AllocError = ErrorOf<AllocErrorKind>;

impl HasErrorKind<AllocErrorKind> for PrefixParseError {
    fn kind(&self) -> AllocErrorKind {
        AllocErrorKind::MalformedPrefix
    }
}

impl HasErrorKind<AllocErrorKind> for PrefixLenError {
    fn kind(&self) -> AllocErrorKind {
        AllocErrorKind::MalformedPrefix
    }
}

impl HasErrorKind<AllocErrorKind> for ArithmeticError {
    fn kind(&self) -> AllocErrorKind {
        match self {
            Self::InsufficientAddressSpace(_) => AllocErrorKind::InsufficientAddressSpace,
            Self::AddressSpaceExhausted { .. } => AllocErrorKind::AddressSpaceExhausted,
        }
    }
}

use std::borrow::Cow;

use crate::subnet::{IpPrefix, PrefixParseError};

/// Anything that names a CIDR block: a parsed [`IpPrefix`] or its text.
///
/// The text is kept as supplied, so `"10.10.1.127/25"` and `"10.10.1.0/25"`
/// are distinct spellings of the same block.
pub trait CidrLike {
    fn cidr_text(&self) -> Cow<'_, str>;
    fn to_prefix(&self) -> Result<IpPrefix, PrefixParseError>;
}

impl CidrLike for IpPrefix {
    fn cidr_text(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn to_prefix(&self) -> Result<IpPrefix, PrefixParseError> {
        Ok(*self)
    }
}

impl CidrLike for str {
    fn cidr_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.trim())
    }

    fn to_prefix(&self) -> Result<IpPrefix, PrefixParseError> {
        self.parse()
    }
}

impl CidrLike for String {
    fn cidr_text(&self) -> Cow<'_, str> {
        self.as_str().cidr_text()
    }

    fn to_prefix(&self) -> Result<IpPrefix, PrefixParseError> {
        self.parse()
    }
}

impl<T> CidrLike for &T
where
    T: CidrLike + ?Sized,
{
    fn cidr_text(&self) -> Cow<'_, str> {
        (**self).cidr_text()
    }

    fn to_prefix(&self) -> Result<IpPrefix, PrefixParseError> {
        (**self).to_prefix()
    }
}

use std::error::Error as StdError;
use std::fmt;

/// Renders an error together with its `source()` chain on a single line:
/// `outer << cause << root cause`.
pub trait StdErrorDisplayChainExt: StdError + Sized {
    fn as_display_chain(&self) -> impl fmt::Display + fmt::Debug {
        let e: &dyn StdError = self;
        D(e)
    }
}

impl<E> StdErrorDisplayChainExt for E where E: StdError {}

struct D<T>(T);

impl fmt::Display for D<&dyn StdError> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut e = self.0;
        write!(f, "{}", e)?;
        while let Some(source) = e.source() {
            write!(f, " << {}", source)?;
            e = source;
        }
        Ok(())
    }
}
impl fmt::Debug for D<&dyn StdError> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

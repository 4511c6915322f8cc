use ipam_address::address::IpFamily;

use crate::{AllocError, AllocErrorKind};

/// A batch entry asking for blocks of one length.
///
/// `required_number` blocks must be granted or the whole batch fails; up to
/// `requested_number - required_number` more are granted if space allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ExtraPrefixRequest {
    pub addr_family:      IpFamily,
    pub prefix_len:       u8,
    pub required_number:  u32,
    pub requested_number: u32,
}

impl ExtraPrefixRequest {
    pub fn new(addr_family: IpFamily, prefix_len: u8) -> Self {
        Self {
            addr_family,
            prefix_len,
            required_number: 1,
            requested_number: 1,
        }
    }

    pub fn with_required(self, required_number: u32) -> Self {
        Self {
            required_number,
            requested_number: self.requested_number.max(required_number),
            ..self
        }
    }

    pub fn with_requested(self, requested_number: u32) -> Self {
        Self {
            requested_number,
            ..self
        }
    }

    pub fn best_effort_number(&self) -> u32 {
        self.requested_number.saturating_sub(self.required_number)
    }

    pub fn validate(&self) -> Result<(), AllocError> {
        let Self {
            addr_family,
            prefix_len,
            required_number,
            requested_number,
        } = *self;

        if prefix_len > addr_family.bits() {
            return Err(AllocError::new(
                AllocErrorKind::InvalidRequest,
                format!("prefix length /{} is too long for {}", prefix_len, addr_family),
            ))
        }
        if requested_number == 0 {
            return Err(AllocError::new(
                AllocErrorKind::InvalidRequest,
                "requested number must be positive",
            ))
        }
        if requested_number < required_number {
            return Err(AllocError::new(
                AllocErrorKind::InvalidRequest,
                format!(
                    "requested number {} is less than required number {}",
                    requested_number, required_number
                ),
            ))
        }
        Ok(())
    }
}

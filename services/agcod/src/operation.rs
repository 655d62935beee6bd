use std::fmt::{Display, Formatter};

use crate::constants::X_AMZ_TARGET_PREFIX;

/// The AGCOD operations this client calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceOperation {
    /// Purchase a gift card.
    CreateGiftCard,
    /// Cancel a previously purchased gift card.
    CancelGiftCard,
    /// Query the partner's prepaid balance.
    GetAvailableFunds,
}

impl ServiceOperation {
    /// Wire name of the operation, also used as the request path.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceOperation::CreateGiftCard => "CreateGiftCard",
            ServiceOperation::CancelGiftCard => "CancelGiftCard",
            ServiceOperation::GetAvailableFunds => "GetAvailableFunds",
        }
    }

    /// Value of the `x-amz-target` header.
    pub fn target(&self) -> String {
        format!("{X_AMZ_TARGET_PREFIX}.{}", self.as_str())
    }
}

impl Display for ServiceOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

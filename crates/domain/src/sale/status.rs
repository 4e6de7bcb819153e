//! Sale status state machine.

use serde::{Deserialize, Serialize};

/// The status of a sale in its lifecycle.
///
/// State transitions:
/// ```text
/// Active ──cancel──► Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SaleStatus {
    /// Sale is in effect; items may be added, removed or cancelled.
    #[default]
    Active,

    /// Sale was cancelled (terminal state).
    Cancelled,
}

impl SaleStatus {
    /// Returns true if the sale can be cancelled in this status.
    pub fn can_cancel(&self) -> bool {
        matches!(self, SaleStatus::Active)
    }

    /// Returns true if the sale header and lines can be modified.
    pub fn can_modify(&self) -> bool {
        matches!(self, SaleStatus::Active)
    }

    /// Returns true if this is a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SaleStatus::Cancelled)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Active => "Active",
            SaleStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown status name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sale status: {0}")]
pub struct UnknownStatus(pub String);

impl std::str::FromStr for SaleStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(SaleStatus::Active),
            "cancelled" | "canceled" => Ok(SaleStatus::Cancelled),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

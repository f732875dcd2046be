//! Strong type definitions for DRVC3 receipts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Receipt identifier prefix.
pub const RECEIPT_ID_PREFIX: &str = "drvc3_";

/// A receipt identifier, derived from the issuance time: `drvc3_<unix-millis>`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptId(String);

impl ReceiptId {
    /// Derive an identifier from a Unix timestamp in milliseconds.
    pub fn from_millis(millis: i64) -> Self {
        Self(format!("{RECEIPT_ID_PREFIX}{millis}"))
    }

    /// Wrap an existing identifier string (as read from a persisted receipt).
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReceiptId({})", self.0)
    }
}

impl fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Descriptive lifecycle marker: a draft (`loose`) or canonical (`blocked`) receipt.
///
/// Set once at creation. It carries no behavioral difference in verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockState {
    Loose,
    Blocked,
}

impl BlockState {
    /// Map the caller's "canonize" flag onto a state.
    pub fn from_flag(blocked: bool) -> Self {
        if blocked {
            Self::Blocked
        } else {
            Self::Loose
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Loose => "loose",
            Self::Blocked => "blocked",
        }
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

use serde::{Deserialize, Serialize};

/// Which canonicalisation the gateway applies when checking a signature.
///
/// Selected per request through the integer `compatible` field: `1` picks the
/// legacy variant, anything else the standard one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SignMode {
    #[default]
    Standard,
    Compatible,
}

impl SignMode {
    pub fn from_flag(flag: i64) -> Self {
        if flag == 1 {
            SignMode::Compatible
        } else {
            SignMode::Standard
        }
    }

    /// The value carried in the `compatible` request field.
    pub fn as_flag(&self) -> i64 {
        match self {
            SignMode::Standard => 0,
            SignMode::Compatible => 1,
        }
    }
}

use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8888";
pub const DEFAULT_MERCHANT_ID: i64 = 20001;
pub const DEFAULT_CHANNEL_ID: i64 = 8008;
/// Placeholder secret. The gateway will reject anything signed with it.
pub const PLACEHOLDER_MERCHANT_KEY: &str = "your_merchant_key";

/// Prefix of the environment variables that feed [`ProbeConfig`]
/// (`PROBE_BASE_URL`, `PROBE_MERCHANT_ID`, ...).
pub const ENV_PREFIX: &str = "PROBE";

/// The resolved connection settings for one probe run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProbeConfig {
    /// Gateway root, e.g. `http://localhost:8888`.
    pub base_url: String,
    pub merchant_id: i64,
    pub channel_id: i64,
    /// Shared secret used for signing. Never sent over the wire.
    pub merchant_key: String,
}

impl ProbeConfig {
    pub fn uses_placeholder_key(&self) -> bool {
        self.merchant_key == PLACEHOLDER_MERCHANT_KEY
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            merchant_id: DEFAULT_MERCHANT_ID,
            channel_id: DEFAULT_CHANNEL_ID,
            merchant_key: PLACEHOLDER_MERCHANT_KEY.to_string(),
        }
    }
}

/// Values given on the command line. Anything left `None` falls through to the
/// environment and then to the defaults.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct ConnectionArgs {
    /// Gateway base URL [default: http://localhost:8888].
    pub base_url: Option<String>,

    /// Merchant id [default: 20001].
    pub merchant_id: Option<i64>,

    /// Payment channel id [default: 8008].
    pub channel_id: Option<i64>,

    /// Merchant secret key [default: your_merchant_key].
    pub merchant_key: Option<String>,
}

use crate::auth;
use chrono::Utc;
use core_types::{OrderParams, SignMode};
use rand::Rng;

pub const DEFAULT_AMOUNT: i64 = 10_000;
pub const DEFAULT_NOTIFY_URL: &str = "https://example.com/notify";
pub const DEFAULT_JUMP_URL: &str = "https://example.com/jump";
pub const DEFAULT_EXTRA: &str = "{}";

/// Everything needed to build an order request, minus the order number and signature.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub merchant_id: i64,
    pub channel_id: i64,
    /// Minor currency units.
    pub amount: i64,
    pub notify_url: String,
    pub jump_url: String,
    /// Opaque JSON text passed through to the gateway.
    pub extra: String,
    pub sign_mode: SignMode,
    pub test: bool,
}

impl OrderDraft {
    pub fn new(merchant_id: i64, channel_id: i64) -> Self {
        Self {
            merchant_id,
            channel_id,
            amount: DEFAULT_AMOUNT,
            notify_url: DEFAULT_NOTIFY_URL.to_string(),
            jump_url: DEFAULT_JUMP_URL.to_string(),
            extra: DEFAULT_EXTRA.to_string(),
            sign_mode: SignMode::Standard,
            test: false,
        }
    }

    /// The unsigned parameter mapping, in wire order.
    pub fn into_params(self, out_order_no: &str) -> OrderParams {
        OrderParams::new()
            .with("mchId", self.merchant_id)
            .with("channelId", self.channel_id)
            .with("mchOrderNo", out_order_no)
            .with("amount", self.amount)
            .with("notifyUrl", self.notify_url)
            .with("jumpUrl", self.jump_url)
            .with("extra", self.extra)
            .with("compatible", self.sign_mode.as_flag())
            .with("test", self.test)
    }
}

/// A fresh merchant order number: `TEST_<unix millis>_<0..=9999>`.
pub fn generate_out_order_no() -> String {
    let suffix: u16 = rand::rng().random_range(0..=9999);
    format!("TEST_{}_{}", Utc::now().timestamp_millis(), suffix)
}

/// An order request with its signature attached as the last field.
#[derive(Debug, Clone)]
pub struct SignedOrder {
    params: OrderParams,
    canonical: String,
    signature: String,
    sign_mode: SignMode,
}

impl SignedOrder {
    /// Signs `params` with the variant its `compatible` field selects.
    ///
    /// A `sign` field already present is dropped first so the fresh one is
    /// always last on the wire.
    pub fn new(mut params: OrderParams, key: &str) -> Self {
        params.remove(auth::SIGN_FIELD);
        let sign_mode = params.sign_mode();
        let canonical = auth::canonical_string_for(sign_mode, &params, key);
        let signature = auth::md5_upper_hex(&canonical);
        tracing::debug!(
            mode = ?sign_mode,
            fields = params.len(),
            "Signed order parameters."
        );
        params.insert(auth::SIGN_FIELD, signature.clone());

        Self {
            params,
            canonical,
            signature,
            sign_mode,
        }
    }

    /// The full payload, `sign` included.
    pub fn params(&self) -> &OrderParams {
        &self.params
    }

    /// The exact string that was hashed. It contains the secret key.
    pub fn canonical_string(&self) -> &str {
        &self.canonical
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn sign_mode(&self) -> SignMode {
        self.sign_mode
    }

    pub fn out_order_no(&self) -> Option<&str> {
        self.params.get("mchOrderNo").and_then(|v| v.as_str())
    }
}

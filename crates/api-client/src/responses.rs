use crate::auth;
use core_types::{OrderParams, ParamValue, SignMode};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};

/// The business code the gateway uses for a created order.
pub const SUCCESS_CODE: i64 = 200;

/// The body of a `POST /api/v1/orders` response.
///
/// Only `code` is strict: a missing or non-integer code fails the parse.
/// The display fields take any JSON value, and a `data` that is not an
/// object is treated as absent.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderResponse {
    pub code: i64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_data")]
    pub data: Option<OrderData>,
}

impl CreateOrderResponse {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

/// The `data` object of a successful response.
///
/// Unknown fields are kept so a `sign` over the whole object can be checked.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderData {
    #[serde(default, deserialize_with = "lenient_text")]
    pub pay_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub order_no: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sign: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OrderData {
    /// Every field of the object, `sign` included, as signable parameters.
    pub fn to_params(&self) -> OrderParams {
        let mut params: OrderParams = self
            .extra
            .iter()
            .map(|(k, v)| (k.clone(), ParamValue::from(v.clone())))
            .collect();
        params.insert("pay_url", self.pay_url.clone());
        params.insert("order_no", self.order_no.clone());
        params.insert(auth::SIGN_FIELD, self.sign.clone());
        params
    }

    /// Checks `data.sign` against the merchant key.
    ///
    /// `None` when the gateway did not sign the object.
    ///
    /// Only the fields present in the body are signed over. A gateway that
    /// signs an empty pay URL but omits it from the body (`omitempty`) will
    /// show up here as a mismatch.
    pub fn verify_sign(&self, mode: SignMode, key: &str) -> Option<bool> {
        self.sign
            .as_ref()
            .map(|_| auth::verify(mode, &self.to_params(), key))
    }
}

/// Any JSON value as display text: strings as-is, null as absent, anything
/// else in its compact JSON form.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn lenient_data<'de, D>(deserializer: D) -> Result<Option<OrderData>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(object @ Value::Object(_)) => serde_json::from_value(object)
            .map(Some)
            .map_err(de::Error::custom),
        _ => Ok(None),
    }
}

use core_types::{OrderParams, ParamValue, SignMode};

/// Field that carries the signature and is never part of its own input.
pub const SIGN_FIELD: &str = "sign";
/// Extra field skipped by the compatible variant.
const SIGN_TYPE_FIELD: &str = "sign_type";

/// Builds the string the gateway hashes in standard mode.
///
/// `sign` and null-valued fields are dropped, the rest are sorted by name
/// (byte order) and joined as `name=value` with `&`. The secret goes last as
/// `key=<secret>`. Nothing is escaped, so a value containing `&` or `=` is
/// hashed verbatim.
///
/// # Arguments
///
/// * `params` - The request parameters, in any order.
/// * `key` - The merchant's secret key.
pub fn canonical_string(params: &OrderParams, key: &str) -> String {
    let mut parts = sorted_pairs(params, |name, value| name != SIGN_FIELD && !value.is_null());
    parts.push(format!("key={key}"));
    parts.join("&")
}

/// Builds the string the gateway hashes when `compatible == 1`.
///
/// Also skips `sign_type` and empty text values, and appends the secret with
/// no separator or `key=` prefix.
pub fn compatible_canonical_string(params: &OrderParams, key: &str) -> String {
    let parts = sorted_pairs(params, |name, value| {
        name != SIGN_FIELD
            && name != SIGN_TYPE_FIELD
            && !value.is_null()
            && value.as_str() != Some("")
    });
    format!("{}{key}", parts.join("&"))
}

pub fn canonical_string_for(mode: SignMode, params: &OrderParams, key: &str) -> String {
    match mode {
        SignMode::Standard => canonical_string(params, key),
        SignMode::Compatible => compatible_canonical_string(params, key),
    }
}

fn sorted_pairs<F>(params: &OrderParams, keep: F) -> Vec<String>
where
    F: Fn(&str, &ParamValue) -> bool,
{
    let mut fields: Vec<(&String, &ParamValue)> =
        params.iter().filter(|&(name, value)| keep(name.as_str(), value)).collect();
    fields.sort_unstable_by(|a, b| a.0.cmp(b.0));
    fields
        .into_iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect()
}

/// MD5 of the UTF-8 bytes of `text`, as 32 uppercase hex characters.
pub fn md5_upper_hex(text: &str) -> String {
    hex::encode_upper(md5::compute(text.as_bytes()).0)
}

/// Creates the standard-mode signature for a parameter mapping.
///
/// # Returns
///
/// A 32-character uppercase hexadecimal digest.
pub fn sign(params: &OrderParams, key: &str) -> String {
    md5_upper_hex(&canonical_string(params, key))
}

pub fn sign_with(mode: SignMode, params: &OrderParams, key: &str) -> String {
    md5_upper_hex(&canonical_string_for(mode, params, key))
}

/// Checks a mapping that carries its own signature.
///
/// Returns `false` when the `sign` field is missing or not text.
pub fn verify(mode: SignMode, params: &OrderParams, key: &str) -> bool {
    match params.get(SIGN_FIELD).and_then(ParamValue::as_str) {
        Some(claimed) => claimed == sign_with(mode, params, key),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample() -> OrderParams {
        OrderParams::new()
            .with("mchId", 20001)
            .with("channelId", 8008)
            .with("mchOrderNo", "TEST_1700000000000_42")
            .with("amount", 10000)
            .with("notifyUrl", "https://example.com/notify")
            .with("jumpUrl", "https://example.com/jump")
            .with("extra", "{}")
            .with("compatible", 0)
            .with("test", false)
    }

    #[test]
    fn canonical_string_is_sorted_with_key_last() {
        let params = OrderParams::new().with("mchId", 1).with("amount", 100);
        assert_eq!(canonical_string(&params, "abc"), "amount=100&mchId=1&key=abc");
        assert_eq!(sign(&params, "abc"), "18611920640366576304F5AF6375CB50");
    }

    #[test]
    fn signs_a_full_order() {
        let params = sample();
        assert_eq!(
            canonical_string(&params, "your_merchant_key"),
            "amount=10000&channelId=8008&compatible=0&extra={}&jumpUrl=https://example.com/jump\
             &mchId=20001&mchOrderNo=TEST_1700000000000_42&notifyUrl=https://example.com/notify\
             &test=false&key=your_merchant_key"
        );
        assert_eq!(sign(&params, "your_merchant_key"), "D5C935602DD3CFE595F7DC4AD723F1C2");
    }

    #[test]
    fn signature_is_32_uppercase_hex_chars() {
        let signature = sign(&sample(), "k");
        assert_eq!(signature.len(), 32);
        assert!(signature.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }

    #[test]
    fn is_deterministic() {
        assert_eq!(sign(&sample(), "k"), sign(&sample(), "k"));
    }

    #[test]
    fn ignores_null_fields() {
        let with_null = sample().with("memo", ParamValue::Null);
        assert_eq!(sign(&with_null, "k"), sign(&sample(), "k"));
    }

    #[test]
    fn ignores_existing_sign_field() {
        let signed = sample().with("sign", "WHATEVER");
        assert_eq!(sign(&signed, "k"), sign(&sample(), "k"));
    }

    #[test]
    fn key_changes_signature() {
        let params = OrderParams::new().with("mchId", 1).with("amount", 100);
        assert_eq!(sign(&params, "xyz"), "0DA3F7AAED667CD00AF134B9B9567819");
        assert_ne!(sign(&params, "abc"), sign(&params, "xyz"));
    }

    #[test]
    fn field_order_does_not_matter() {
        let forward = OrderParams::new().with("a", 1).with("b", "x").with("c", true);
        let backward = OrderParams::new().with("c", true).with("b", "x").with("a", 1);
        assert_eq!(sign(&forward, "k"), sign(&backward, "k"));
    }

    #[test]
    fn booleans_render_as_words() {
        let params = OrderParams::new().with("test", false);
        assert_eq!(canonical_string(&params, "k"), "test=false&key=k");
    }

    #[test]
    fn empty_text_is_kept_in_standard_mode() {
        let params = OrderParams::new().with("extra", "").with("a", 1);
        assert_eq!(canonical_string(&params, "k"), "a=1&extra=&key=k");
    }

    #[test]
    fn separators_in_values_are_not_escaped() {
        let params = OrderParams::new().with("note", "x=1&y=2");
        assert_eq!(canonical_string(&params, "k"), "note=x=1&y=2&key=k");
    }

    #[test]
    fn sort_is_byte_wise() {
        // Uppercase sorts before lowercase.
        let params = OrderParams::new().with("b", 1).with("B", 2).with("a", 3);
        assert_eq!(canonical_string(&params, "k"), "B=2&a=3&b=1&key=k");
    }

    #[test]
    fn compatible_mode_appends_bare_key() {
        let params = OrderParams::new()
            .with("mchId", 1)
            .with("amount", 100)
            .with("sign_type", "MD5")
            .with("extra", "")
            .with("memo", ParamValue::Null)
            .with("sign", "OLD");
        assert_eq!(compatible_canonical_string(&params, "abc"), "amount=100&mchId=1abc");
        assert_eq!(
            sign_with(SignMode::Compatible, &params, "abc"),
            "5BABFC41795F2CBC2A2E7B7EBFB79D81"
        );
    }

    #[rstest]
    #[case(SignMode::Standard)]
    #[case(SignMode::Compatible)]
    fn verify_accepts_own_signature(#[case] mode: SignMode) {
        let mut params = sample();
        let signature = sign_with(mode, &params, "k");
        params.insert(SIGN_FIELD, signature);
        assert!(verify(mode, &params, "k"));
        assert!(!verify(mode, &params, "other"));
    }

    #[test]
    fn verify_rejects_missing_or_tampered_sign() {
        let mut params = sample();
        assert!(!verify(SignMode::Standard, &params, "k"));

        let signature = sign(&params, "k");
        params.insert(SIGN_FIELD, signature.to_lowercase());
        assert!(!verify(SignMode::Standard, &params, "k"));

        params.insert(SIGN_FIELD, signature);
        params.insert("amount", 1);
        assert!(!verify(SignMode::Standard, &params, "k"));
    }

    #[test]
    fn md5_of_empty_string() {
        assert_eq!(md5_upper_hex(""), "D41D8CD98F00B204E9800998ECF8427E");
    }
}

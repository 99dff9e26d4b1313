//! Console output for a probe run. Everything here writes to the supplied
//! writer so the report can be captured in tests.

use api_client::{CreateOrderResponse, OrderExchange, SignedOrder};
use configuration::ProbeConfig;
use rust_decimal::Decimal;
use std::io::{self, Write};

const RULE_WIDTH: usize = 60;

pub fn rule(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

pub fn header(out: &mut impl Write, config: &ProbeConfig) -> io::Result<()> {
    rule(out)?;
    writeln!(out, "Order creation probe")?;
    rule(out)?;
    writeln!(out, "BASE_URL:    {}", config.base_url)?;
    writeln!(out, "MERCHANT_ID: {}", config.merchant_id)?;
    writeln!(out, "CHANNEL_ID:  {}", config.channel_id)?;
    rule(out)
}

/// Minor units as a two-decimal major amount, e.g. `10000` -> `100.00`.
pub fn major_units(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

pub fn request(
    out: &mut impl Write,
    config: &ProbeConfig,
    order: &SignedOrder,
    amount: i64,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Order number: {}", order.out_order_no().unwrap_or("-"))?;
    writeln!(out, "Amount: {amount} minor units ({})", major_units(amount))?;

    writeln!(out)?;
    writeln!(out, "Request parameters:")?;
    writeln!(out, "{}", serde_json::to_string_pretty(order.params())?)?;

    writeln!(out)?;
    writeln!(out, "Sign mode: {:?}", order.sign_mode())?;
    writeln!(out, "String to sign: {}", order.canonical_string())?;
    writeln!(out, "Signature: {}", order.signature())?;

    if config.uses_placeholder_key() {
        writeln!(out)?;
        writeln!(
            out,
            "WARNING: using the placeholder merchant key \"{}\".",
            config.merchant_key
        )?;
        writeln!(out, "   The gateway will reject this signature. Pass the real key:")?;
        writeln!(
            out,
            "   order-probe [base_url] [merchant_id] [channel_id] [merchant_key]"
        )?;
    }
    Ok(())
}

pub fn sending(out: &mut impl Write, url: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Sending request to: {url}")
}

pub fn exchange(out: &mut impl Write, exchange: &OrderExchange) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Response status: {}", exchange.status.as_u16())?;
    writeln!(
        out,
        "Response time: {:.2}ms",
        exchange.elapsed.as_secs_f64() * 1000.0
    )?;
    writeln!(out)?;
    writeln!(out, "Response body:")?;
    writeln!(out, "{}", exchange.body)
}

pub fn parsed(out: &mut impl Write, exchange: &OrderExchange) -> io::Result<()> {
    if let Some(pretty) = exchange.pretty_body() {
        writeln!(out)?;
        writeln!(out, "Parsed response:")?;
        writeln!(out, "{pretty}")?;
    }
    Ok(())
}

/// `verified` is the outcome of checking `data.sign`, when the gateway sent one.
pub fn success(
    out: &mut impl Write,
    response: &CreateOrderResponse,
    verified: Option<bool>,
) -> io::Result<()> {
    writeln!(out)?;
    rule(out)?;
    writeln!(out, "SUCCESS: order created")?;
    if let Some(data) = &response.data {
        if let Some(pay_url) = &data.pay_url {
            writeln!(out, "Pay URL: {pay_url}")?;
        }
        if let Some(order_no) = &data.order_no {
            writeln!(out, "Order number: {order_no}")?;
        }
    }
    match verified {
        Some(true) => writeln!(out, "Response signature: valid")?,
        Some(false) => writeln!(out, "Response signature: MISMATCH")?,
        None => {}
    }
    Ok(())
}

pub fn failure(out: &mut impl Write, response: &CreateOrderResponse) -> io::Result<()> {
    writeln!(out)?;
    rule(out)?;
    writeln!(out, "FAILED: the gateway did not create the order")?;
    writeln!(out, "Error code: {}", response.code)?;
    writeln!(
        out,
        "Error message: {}",
        response.message.as_deref().unwrap_or("unknown error")
    )
}

pub fn unparsable(out: &mut impl Write, reason: &str) -> io::Result<()> {
    writeln!(out)?;
    rule(out)?;
    writeln!(out, "FAILED: the response is not the expected JSON ({reason})")?;
    rule(out)
}

pub fn transport_failure(out: &mut impl Write, error: &dyn std::fmt::Display) -> io::Result<()> {
    writeln!(out)?;
    rule(out)?;
    writeln!(out, "FAILED: request failed: {error}")?;
    rule(out)
}

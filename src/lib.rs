use api_client::error::ApiError;
use api_client::{GatewayClient, OrderApi, SignedOrder, generate_out_order_no};
use configuration::{Environment, ProbeConfig};
use std::io::Write;

pub mod cli;
pub mod report;

pub use cli::Cli;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The gateway answered with code 200.
    Accepted,
    /// The gateway answered but did not create the order.
    Rejected,
    /// The gateway answered with something that is not the expected JSON.
    Unparsable,
    /// Nothing was sent.
    DryRun,
    /// The request never completed.
    TransportFailure,
}

impl Outcome {
    /// Process exit status. Only a transport failure is non-zero.
    pub fn exit_status(&self) -> u8 {
        match self {
            Outcome::TransportFailure => 1,
            _ => 0,
        }
    }
}

/// Resolves configuration from the process environment and runs against the
/// real gateway.
pub async fn run(cli: &Cli, out: &mut impl Write) -> anyhow::Result<Outcome> {
    run_with_env(cli, configuration::environment(None), out).await
}

/// Same as [`run`] but reads `PROBE_*` settings from `env`.
pub async fn run_with_env(
    cli: &Cli,
    env: Environment,
    out: &mut impl Write,
) -> anyhow::Result<Outcome> {
    let config = configuration::load_config_with_env(&cli.connection, env)?;
    let client = GatewayClient::new(&config.base_url)?;
    probe(cli, &config, &client, out).await
}

/// Builds, signs and sends one order, reporting every step to `out`.
pub async fn probe(
    cli: &Cli,
    config: &ProbeConfig,
    api: &impl OrderApi,
    out: &mut impl Write,
) -> anyhow::Result<Outcome> {
    report::header(out, config)?;

    let out_order_no = generate_out_order_no();
    let params = cli.draft(config).into_params(&out_order_no);
    let order = SignedOrder::new(params, &config.merchant_key);
    report::request(out, config, &order, cli.amount)?;

    if config.uses_placeholder_key() {
        tracing::warn!("Signing with the placeholder merchant key.");
    }
    if cli.dry_run {
        writeln!(out)?;
        writeln!(out, "Dry run: request not sent.")?;
        return Ok(Outcome::DryRun);
    }

    report::sending(out, &api.endpoint())?;

    let exchange = match api.create_order(&order).await {
        Ok(exchange) => exchange,
        Err(ApiError::Transport(e)) => {
            tracing::error!(error = %e, "Order request failed.");
            report::transport_failure(out, &e)?;
            return Ok(Outcome::TransportFailure);
        }
        Err(e) => return Err(e.into()),
    };

    report::exchange(out, &exchange)?;
    report::parsed(out, &exchange)?;

    let response = match exchange.parse() {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, "Response did not match the expected shape.");
            report::unparsable(out, &e.to_string())?;
            return Ok(Outcome::Unparsable);
        }
    };

    if exchange.is_success(&response) {
        let verified = response
            .data
            .as_ref()
            .and_then(|data| data.verify_sign(order.sign_mode(), &config.merchant_key));
        report::success(out, &response, verified)?;
        Ok(Outcome::Accepted)
    } else {
        report::failure(out, &response)?;
        Ok(Outcome::Rejected)
    }
}

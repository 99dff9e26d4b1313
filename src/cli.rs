use api_client::OrderDraft;
use api_client::order::{DEFAULT_AMOUNT, DEFAULT_EXTRA, DEFAULT_JUMP_URL, DEFAULT_NOTIFY_URL};
use clap::Parser;
use configuration::{ConnectionArgs, ProbeConfig};
use core_types::SignMode;

/// Sends one signed order-creation request to a payment gateway and prints
/// what came back.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Order amount in minor currency units.
    #[arg(long, default_value_t = DEFAULT_AMOUNT)]
    pub amount: i64,

    /// Callback URL the gateway notifies on payment.
    #[arg(long, default_value = DEFAULT_NOTIFY_URL)]
    pub notify_url: String,

    /// Where the payer is sent afterwards.
    #[arg(long, default_value = DEFAULT_JUMP_URL)]
    pub jump_url: String,

    /// Opaque JSON text passed through in the `extra` field.
    #[arg(long, default_value = DEFAULT_EXTRA)]
    pub extra: String,

    /// Sign with the legacy compatible scheme (sends `compatible=1`).
    #[arg(long)]
    pub compatible: bool,

    /// Ask the gateway for a test-mode order (sends `test=true`).
    #[arg(long)]
    pub test_mode: bool,

    /// Build and sign the request, print it, but do not send it.
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    pub fn draft(&self, config: &ProbeConfig) -> OrderDraft {
        OrderDraft {
            merchant_id: config.merchant_id,
            channel_id: config.channel_id,
            amount: self.amount,
            notify_url: self.notify_url.clone(),
            jump_url: self.jump_url.clone(),
            extra: self.extra.clone(),
            sign_mode: if self.compatible {
                SignMode::Compatible
            } else {
                SignMode::Standard
            },
            test: self.test_mode,
        }
    }
}

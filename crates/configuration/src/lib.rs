use crate::error::ConfigError;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use config::{Environment, Map};
pub use settings::{ConnectionArgs, ProbeConfig};

/// Resolves the connection settings.
///
/// Layers, lowest to highest precedence: built-in defaults, `PROBE_*`
/// environment variables, then whatever was given on the command line.
/// No file source is read.
pub fn load_config(args: &ConnectionArgs) -> Result<ProbeConfig, ConfigError> {
    load_config_with_env(args, environment(None))
}

/// The `PROBE_*` environment source.
///
/// `None` reads the process environment; `Some(vars)` reads only `vars`.
pub fn environment(vars: Option<Map<String, String>>) -> Environment {
    Environment::with_prefix(settings::ENV_PREFIX).source(vars)
}

/// Same as [`load_config`] but with an explicit environment source.
pub fn load_config_with_env(
    args: &ConnectionArgs,
    env: Environment,
) -> Result<ProbeConfig, ConfigError> {
    let defaults = ProbeConfig::default();

    let builder = config::Config::builder()
        .set_default("base_url", defaults.base_url)?
        .set_default("merchant_id", defaults.merchant_id)?
        .set_default("channel_id", defaults.channel_id)?
        .set_default("merchant_key", defaults.merchant_key)?
        .add_source(env)
        .set_override_option("base_url", args.base_url.clone())?
        .set_override_option("merchant_id", args.merchant_id)?
        .set_override_option("channel_id", args.channel_id)?
        .set_override_option("merchant_key", args.merchant_key.clone())?
        .build()?;

    let config = builder.try_deserialize::<ProbeConfig>()?;
    validate(&config)?;

    Ok(config)
}

fn validate(config: &ProbeConfig) -> Result<(), ConfigError> {
    if !(config.base_url.starts_with("http://") || config.base_url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "base URL must start with http:// or https://, got '{}'",
            config.base_url
        )));
    }
    if config.merchant_key.is_empty() {
        return Err(ConfigError::ValidationError(
            "merchant key must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Installs the global `tracing` subscriber.
///
/// Logs go to stderr so stdout carries only the report. The level comes from
/// `RUST_LOG`, falling back to `warn`.
pub fn init_tracing() -> Result<(), ConfigError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| ConfigError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn env(vars: &[(&str, &str)]) -> Environment {
        environment(Some(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ))
    }

    #[test]
    fn falls_back_to_defaults() {
        let config = load_config_with_env(&ConnectionArgs::default(), env(&[])).unwrap();
        assert_eq!(config, ProbeConfig::default());
        assert!(config.uses_placeholder_key());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = load_config_with_env(
            &ConnectionArgs::default(),
            env(&[
                ("PROBE_BASE_URL", "https://gateway.example"),
                ("PROBE_MERCHANT_ID", "30002"),
                ("PROBE_MERCHANT_KEY", "s3cret"),
            ]),
        )
        .unwrap();

        assert_eq!(config.base_url, "https://gateway.example");
        assert_eq!(config.merchant_id, 30002);
        assert_eq!(config.channel_id, settings::DEFAULT_CHANNEL_ID);
        assert_eq!(config.merchant_key, "s3cret");
        assert!(!config.uses_placeholder_key());
    }

    #[test]
    fn command_line_beats_environment() {
        let args = ConnectionArgs {
            base_url: Some("http://127.0.0.1:9000".to_string()),
            merchant_id: Some(1),
            channel_id: Some(2),
            merchant_key: Some("cli-key".to_string()),
        };
        let config = load_config_with_env(
            &args,
            env(&[("PROBE_MERCHANT_ID", "30002"), ("PROBE_MERCHANT_KEY", "env-key")]),
        )
        .unwrap();

        assert_eq!(
            config,
            ProbeConfig {
                base_url: "http://127.0.0.1:9000".to_string(),
                merchant_id: 1,
                channel_id: 2,
                merchant_key: "cli-key".to_string(),
            }
        );
    }

    #[rstest]
    #[case("localhost:8888")]
    #[case("ftp://gateway.example")]
    fn rejects_non_http_base_url(#[case] url: &str) {
        let args = ConnectionArgs {
            base_url: Some(url.to_string()),
            ..Default::default()
        };
        let err = load_config_with_env(&args, env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn rejects_empty_key() {
        let args = ConnectionArgs {
            merchant_key: Some(String::new()),
            ..Default::default()
        };
        let err = load_config_with_env(&args, env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn rejects_non_numeric_merchant_id() {
        let err = load_config_with_env(
            &ConnectionArgs::default(),
            env(&[("PROBE_MERCHANT_ID", "abc")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }
}

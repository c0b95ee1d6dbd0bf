use std::env;
use std::time::Duration;

use service_dispatch_application::ClientConfig;
use service_dispatch_core::{DispatchError, DispatchResult};
use tracing_subscriber::EnvFilter;

/// Runtime settings loaded from the environment.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub base_url: String,
    pub secret: String,
    pub debug: bool,
    pub timeout: Duration,
    pub ping_marker_key: Option<String>,
}

impl CliConfig {
    pub fn load() -> DispatchResult<Self> {
        let base_url = required_non_empty_env("DISPATCH_BASE_URL")?;
        let secret = required_non_empty_env("DISPATCH_SECRET")?;
        let debug = env::var("DISPATCH_DEBUG")
            .unwrap_or_else(|_| "false".to_owned())
            .eq_ignore_ascii_case("true");
        let timeout_seconds = parse_env_u64("DISPATCH_TIMEOUT_SECONDS", 15)?;
        if timeout_seconds == 0 {
            return Err(DispatchError::Validation(
                "DISPATCH_TIMEOUT_SECONDS must be greater than zero".to_owned(),
            ));
        }

        let ping_marker_key = env::var("DISPATCH_PING_MARKER")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        Ok(Self {
            base_url,
            secret,
            debug,
            timeout: Duration::from_secs(timeout_seconds),
            ping_marker_key,
        })
    }

    pub fn client_config(&self) -> DispatchResult<ClientConfig> {
        let config = ClientConfig::new(self.base_url.as_str(), self.secret.as_str())?
            .with_debug(self.debug);

        Ok(match &self.ping_marker_key {
            Some(marker) => config.with_ping_marker_key(marker.as_str()),
            None => config,
        })
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> DispatchResult<String> {
    env::var(name).map_err(|_| DispatchError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> DispatchResult<String> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(DispatchError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn parse_env_u64(name: &str, default: u64) -> DispatchResult<u64> {
    match env::var(name) {
        Ok(value) => value.parse::<u64>().map_err(|error| {
            DispatchError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}

use std::env;
use std::fmt;
use std::time::Duration;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_API_VERSION: &str = "2023-08-01";
const DEFAULT_RETURN_URL_BASE: &str = "https://luxeandlush.vercel.app/payment/success";

pub const SANDBOX_BASE_URL: &str = "https://sandbox.cashfree.com/pg";
pub const PRODUCTION_BASE_URL: &str = "https://api.cashfree.com/pg";

/// Which gateway deployment the relay talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayEnvironment {
    Sandbox,
    Production,
}

impl GatewayEnvironment {
    /// Anything other than `sandbox` means production.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("sandbox") => GatewayEnvironment::Sandbox,
            _ => GatewayEnvironment::Production,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayEnvironment::Sandbox => "sandbox",
            GatewayEnvironment::Production => "production",
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            GatewayEnvironment::Sandbox => SANDBOX_BASE_URL,
            GatewayEnvironment::Production => PRODUCTION_BASE_URL,
        }
    }
}

impl fmt::Display for GatewayEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static gateway credentials sent as `x-client-id` / `x-client-secret`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[HIDDEN]")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub environment: GatewayEnvironment,
    /// `CASHFREE_ENVIRONMENT` exactly as given (default `production`).
    pub environment_name: String,
    pub credentials: Option<Credentials>,
    pub base_url_override: Option<String>,
    pub api_version: String,
    pub request_timeout: Option<Duration>,
    pub return_url_base: String,
    pub verify_webhook_signatures: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let credentials = match (non_empty("CASHFREE_APP_ID"), non_empty("CASHFREE_SECRET_KEY")) {
            (Some(client_id), Some(client_secret)) => Some(Credentials {
                client_id,
                client_secret,
            }),
            _ => None,
        };

        let environment_name = non_empty("CASHFREE_ENVIRONMENT")
            .unwrap_or_else(|| GatewayEnvironment::Production.to_string());

        Self {
            server_port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            environment: GatewayEnvironment::parse(Some(environment_name.as_str())),
            environment_name,
            credentials,
            base_url_override: non_empty("GATEWAY_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
            api_version: non_empty("GATEWAY_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            request_timeout: lookup("GATEWAY_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            return_url_base: non_empty("RETURN_URL_BASE")
                .unwrap_or_else(|| DEFAULT_RETURN_URL_BASE.to_string()),
            verify_webhook_signatures: lookup("WEBHOOK_VERIFY_SIGNATURES")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }

    /// False when `CASHFREE_ENVIRONMENT` was neither `sandbox` nor
    /// `production` and fell back to production.
    pub fn environment_recognised(&self) -> bool {
        self.environment_name == self.environment.as_str()
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Base URL for upstream calls; the override wins over the environment.
    pub fn gateway_base_url(&self) -> &str {
        self.base_url_override
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.server_port, 3001);
        assert_eq!(config.environment, GatewayEnvironment::Production);
        assert!(!config.has_credentials());
        assert_eq!(config.api_version, "2023-08-01");
        assert_eq!(config.request_timeout, None);
        assert!(!config.verify_webhook_signatures);
        assert_eq!(config.gateway_base_url(), PRODUCTION_BASE_URL);
    }

    #[test]
    fn test_sandbox_selects_sandbox_url() {
        let config = config_from(&[("CASHFREE_ENVIRONMENT", "sandbox")]);
        assert_eq!(config.environment, GatewayEnvironment::Sandbox);
        assert_eq!(config.gateway_base_url(), SANDBOX_BASE_URL);
    }

    #[test]
    fn test_unknown_environment_is_production() {
        let config = config_from(&[("CASHFREE_ENVIRONMENT", "staging")]);
        assert_eq!(config.environment, GatewayEnvironment::Production);
        assert_eq!(config.environment_name, "staging");
        assert!(!config.environment_recognised());
    }

    #[test]
    fn test_environment_name_defaults_to_production() {
        let config = config_from(&[]);
        assert_eq!(config.environment_name, "production");
        assert!(config.environment_recognised());
        assert!(config_from(&[("CASHFREE_ENVIRONMENT", "sandbox")]).environment_recognised());
    }

    #[test]
    fn test_credentials_need_both_values() {
        assert!(!config_from(&[("CASHFREE_APP_ID", "app")]).has_credentials());
        assert!(!config_from(&[("CASHFREE_APP_ID", "app"), ("CASHFREE_SECRET_KEY", "  ")])
            .has_credentials());
        assert!(config_from(&[("CASHFREE_APP_ID", "app"), ("CASHFREE_SECRET_KEY", "secret")])
            .has_credentials());
    }

    #[test]
    fn test_invalid_port_falls_back() {
        assert_eq!(config_from(&[("PORT", "not-a-port")]).server_port, 3001);
        assert_eq!(config_from(&[("PORT", "8080")]).server_port, 8080);
    }

    #[test]
    fn test_base_url_override_trims_trailing_slash() {
        let config = config_from(&[("GATEWAY_BASE_URL", "http://127.0.0.1:9000/pg/")]);
        assert_eq!(config.gateway_base_url(), "http://127.0.0.1:9000/pg");
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = config_from(&[("CASHFREE_APP_ID", "app"), ("CASHFREE_SECRET_KEY", "s3cr3t")]);
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("app"));
        assert!(!rendered.contains("s3cr3t"));
        assert!(rendered.contains("[HIDDEN]"));
    }

    #[test]
    fn test_webhook_verification_flag() {
        assert!(config_from(&[("WEBHOOK_VERIFY_SIGNATURES", "true")]).verify_webhook_signatures);
        assert!(config_from(&[("WEBHOOK_VERIFY_SIGNATURES", "1")]).verify_webhook_signatures);
        assert!(!config_from(&[("WEBHOOK_VERIFY_SIGNATURES", "no")]).verify_webhook_signatures);
    }
}

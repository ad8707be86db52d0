use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://my.ipaymu.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration: API key, gateway root and callback URLs.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct IpaymuConfig {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub urls: CallbackUrls,
}

/// URLs the gateway redirects to or notifies after a payment.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct CallbackUrls {
    #[serde(default, rename = "return")]
    pub return_url: Option<String>,
    #[serde(default, rename = "notify")]
    pub notify_url: Option<String>,
    #[serde(default, rename = "cancel")]
    pub cancel_url: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl CallbackUrls {
    pub fn is_empty(&self) -> bool {
        self.return_url.is_none() && self.notify_url.is_none() && self.cancel_url.is_none()
    }
}

impl IpaymuConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            urls: CallbackUrls::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_callback_urls(mut self, urls: CallbackUrls) -> Self {
        self.urls = urls;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Read configuration from `IPAYMU_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("IPAYMU_API_KEY").context("IPAYMU_API_KEY not set")?;

        let base_url = env::var("IPAYMU_BASE_URL").unwrap_or_else(|_| default_base_url());

        let timeout_secs = match env::var("IPAYMU_TIMEOUT_SECS") {
            Ok(value) => value
                .parse()
                .context("IPAYMU_TIMEOUT_SECS must be a valid number")?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let urls = CallbackUrls {
            return_url: non_empty_var("IPAYMU_RETURN_URL"),
            notify_url: non_empty_var("IPAYMU_NOTIFY_URL"),
            cancel_url: non_empty_var("IPAYMU_CANCEL_URL"),
        };

        let config = IpaymuConfig {
            api_key,
            base_url,
            timeout_secs,
            urls,
        };

        config.validate()?;
        Ok(config)
    }

    /// Layer an optional config file under the environment.
    ///
    /// Environment keys use the `IPAYMU_` prefix and `__` for nesting,
    /// e.g. `IPAYMU_API_KEY` or `IPAYMU_URLS__NOTIFY`.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        let config: IpaymuConfig = builder
            .add_source(
                config::Environment::with_prefix("IPAYMU")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("Failed to assemble configuration sources")?
            .try_deserialize()
            .context("Invalid iPaymu configuration")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(anyhow!("API key cannot be empty"));
        }

        if self.base_url.trim().is_empty() {
            return Err(anyhow!("Base URL cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(anyhow!(
                "Base URL must start with http:// or https://, got {}",
                self.base_url
            ));
        }

        if self.timeout_secs == 0 {
            return Err(anyhow!("Timeout must be greater than 0"));
        }

        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = IpaymuConfig::new("key-123");
        assert_eq!(config.base_url, "https://my.ipaymu.com");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.urls.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_key() {
        let config = IpaymuConfig::new("   ");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let config = IpaymuConfig::new("key").with_base_url("my.ipaymu.com");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = IpaymuConfig::new("key");
        config.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_nested_urls() {
        let config: IpaymuConfig = serde_json::from_value(serde_json::json!({
            "api_key": "key",
            "urls": { "return": "https://shop.test/thanks", "notify": "https://shop.test/notify" }
        }))
        .unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(
            config.urls.return_url.as_deref(),
            Some("https://shop.test/thanks")
        );
        assert_eq!(
            config.urls.notify_url.as_deref(),
            Some("https://shop.test/notify")
        );
        assert!(config.urls.cancel_url.is_none());
    }

    #[test]
    fn test_from_env_missing_key() {
        std::env::remove_var("IPAYMU_API_KEY");

        let config = IpaymuConfig::from_env();
        assert!(config.is_err(), "Config should fail without API key");
    }
}

//! 应用运行配置加载。

use domain::{SiteConfig, SiteConfigError};
use std::env;
use std::path::Path;
use std::time::Duration;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
    #[error("failed to read site file {0}: {1}")]
    SiteFile(String, String),
    #[error("invalid site config: {0}")]
    Site(#[from] SiteConfigError),
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    pub mqtt_enabled: bool,
    pub mqtt_host: String,
    pub mqtt_port: u16,
    pub mqtt_username: Option<String>,
    pub mqtt_password: Option<String>,
    pub mqtt_qos: u8,
    pub uplink_topic_prefix: String,
    pub downlink_topic_prefix: String,
    pub tick_interval_seconds: u64,
    pub republish_delay_ms: u64,
    pub lorawan_fport: u8,
    pub site_file: Option<String>,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_addr = env::var("HAB_HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:9010".to_string());
        let mqtt_enabled = read_bool_with_default("HAB_MQTT_ENABLED", true);
        let mqtt_host = env::var("HAB_MQTT_HOST").unwrap_or_else(|_| "localhost".to_string());
        let mqtt_port = read_u16_with_default("HAB_MQTT_PORT", 1883)?;
        let mqtt_username = read_optional("HAB_MQTT_USERNAME");
        let mqtt_password = read_optional("HAB_MQTT_PASSWORD");
        let mqtt_qos = read_u8_with_default("HAB_MQTT_QOS", 0)?;
        if mqtt_qos > 2 {
            return Err(ConfigError::Invalid(
                "HAB_MQTT_QOS".to_string(),
                mqtt_qos.to_string(),
            ));
        }
        let uplink_topic_prefix = read_prefix("HAB_UPLINK_TOPIC_PREFIX", "sim");
        let downlink_topic_prefix =
            read_prefix("HAB_DOWNLINK_TOPIC_PREFIX", "milesight/downlink");
        let tick_interval_seconds = read_u64_with_default("HAB_TICK_INTERVAL_SECONDS", 60)?;
        if tick_interval_seconds == 0 {
            return Err(ConfigError::Invalid(
                "HAB_TICK_INTERVAL_SECONDS".to_string(),
                "0".to_string(),
            ));
        }
        let republish_delay_ms = read_u64_with_default("HAB_REPUBLISH_DELAY_MS", 1000)?;
        let lorawan_fport = read_u8_with_default("HAB_LORAWAN_FPORT", 85)?;
        let site_file = read_optional("HAB_SITE_FILE");

        Ok(Self {
            http_addr,
            mqtt_enabled,
            mqtt_host,
            mqtt_port,
            mqtt_username,
            mqtt_password,
            mqtt_qos,
            uplink_topic_prefix,
            downlink_topic_prefix,
            tick_interval_seconds,
            republish_delay_ms,
            lorawan_fport,
            site_file,
        })
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_seconds)
    }

    pub fn republish_delay(&self) -> Duration {
        Duration::from_millis(self.republish_delay_ms)
    }

    /// 加载站点：配置了 `HAB_SITE_FILE` 时读取 JSON 文件，否则使用内置站点。
    pub fn load_site(&self) -> Result<SiteConfig, ConfigError> {
        let site = match &self.site_file {
            Some(path) => read_site_file(Path::new(path))?,
            None => SiteConfig::builtin(),
        };
        site.validate()?;
        Ok(site)
    }
}

fn read_site_file(path: &Path) -> Result<SiteConfig, ConfigError> {
    let display = path.display().to_string();
    let raw = std::fs::read_to_string(path)
        .map_err(|err| ConfigError::SiteFile(display.clone(), err.to_string()))?;
    serde_json::from_str(&raw).map_err(|err| ConfigError::SiteFile(display, err.to_string()))
}

fn read_prefix(key: &str, default: &str) -> String {
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.trim_end_matches('/').to_string()
}

fn read_u16_with_default(key: &str, default: u16) -> Result<u16, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u16>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_u8_with_default(key: &str, default: u8) -> Result<u8, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u8>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn read_bool_with_default(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "on"),
        Err(_) => default,
    }
}

pub mod clouds;
pub mod error;

pub use clouds::{CloudConfig, EndpointOverrides, load_cloud, parse_cloud};
pub use error::*;

use clouds::env_var;
use std::path::PathBuf;

/// Default overall wait, in seconds
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 300;

/// Default pause between status probes, in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Cloud name used when `OS_CLOUD` is not set
pub const DEFAULT_CLOUD_NAME: &str = "otc";

/// Status polling settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitSettings {
    pub timeout_secs: u64,
    pub poll_interval_ms: u64,
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_WAIT_TIMEOUT_SECS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitSettings {
    /// Defaults, overridden by `OTC_WAIT_TIMEOUT` and `OTC_POLL_INTERVAL_MS`
    pub fn from_env() -> Result<Self> {
        let mut settings = Self::default();
        if let Some(value) = env_var("OTC_WAIT_TIMEOUT") {
            settings.timeout_secs = parse_number("OTC_WAIT_TIMEOUT", &value)?;
        }
        if let Some(value) = env_var("OTC_POLL_INTERVAL_MS") {
            settings.poll_interval_ms = parse_number("OTC_POLL_INTERVAL_MS", &value)?;
        }
        Ok(settings)
    }
}

fn parse_number(name: &'static str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidValue {
            name,
            value: value.to_string(),
        })
}

/// Everything the driver needs to talk to the cloud
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverConfig {
    pub cloud: CloudConfig,
    pub wait: WaitSettings,
}

impl DriverConfig {
    pub fn new(cloud: CloudConfig) -> Self {
        Self {
            cloud,
            wait: WaitSettings::default(),
        }
    }

    pub fn with_wait(mut self, wait: WaitSettings) -> Self {
        self.wait = wait;
        self
    }

    /// Resolve credentials
    ///
    /// 1. `OS_AUTH_URL` set: everything comes from `OS_*` variables
    /// 2. `OS_CLOUD` set: that entry of the discovered clouds.yaml
    /// 3. otherwise [`ConfigError::NoCredentials`]
    pub fn load() -> Result<Self> {
        let wait = WaitSettings::from_env()?;

        if env_var("OS_AUTH_URL").is_some() {
            tracing::debug!("Using cloud credentials from environment");
            return Ok(Self::new(CloudConfig::from_env()?).with_wait(wait));
        }

        if let Some(name) = env_var("OS_CLOUD") {
            let path = find_clouds_file()?;
            let cloud = load_cloud(&path, &name)?;
            return Ok(Self::new(cloud).with_wait(wait));
        }

        Err(ConfigError::NoCredentials)
    }
}

/// Locate clouds.yaml
///
/// Search order:
/// 1. `OS_CLIENT_CONFIG_FILE`
/// 2. current directory: clouds.yaml, clouds.yml
/// 3. ~/.config/openstack/clouds.yaml
/// 4. /etc/openstack/clouds.yaml
pub fn find_clouds_file() -> Result<PathBuf> {
    if let Some(config_path) = env_var("OS_CLIENT_CONFIG_FILE") {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
    }

    let current_dir = std::env::current_dir()?;
    for filename in ["clouds.yaml", "clouds.yml"] {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let user_config = config_dir.join("openstack").join("clouds.yaml");
        if user_config.exists() {
            return Ok(user_config);
        }
    }

    let system_config = PathBuf::from("/etc/openstack/clouds.yaml");
    if system_config.exists() {
        return Ok(system_config);
    }

    Err(ConfigError::CloudsFileNotFound)
}

//! Cloud credentials from the environment or `clouds.yaml`

use crate::error::{ConfigError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Connection settings for one cloud account
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloudConfig {
    /// Identity endpoint, e.g. `https://iam.eu-de.otc.t-systems.com/v3`
    pub auth_url: String,
    pub region: String,
    pub domain_name: Option<String>,
    pub project_name: Option<String>,
    pub project_id: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Pre-issued token; takes precedence over username/password
    pub token: Option<String>,
    pub endpoints: EndpointOverrides,
}

/// Service endpoints that bypass the identity catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointOverrides {
    pub vpc: Option<String>,
    pub compute: Option<String>,
    pub image: Option<String>,
}

impl CloudConfig {
    /// Read `OS_*` variables the way the OpenStack clients do
    pub fn from_env() -> Result<Self> {
        let auth_url = env_var("OS_AUTH_URL").ok_or(ConfigError::MissingValue("OS_AUTH_URL"))?;

        let config = Self {
            auth_url,
            region: env_var("OS_REGION_NAME").unwrap_or_default(),
            domain_name: env_var("OS_DOMAIN_NAME").or_else(|| env_var("OS_USER_DOMAIN_NAME")),
            project_name: env_var("OS_PROJECT_NAME").or_else(|| env_var("OS_TENANT_NAME")),
            project_id: env_var("OS_PROJECT_ID").or_else(|| env_var("OS_TENANT_ID")),
            username: env_var("OS_USERNAME"),
            password: env_var("OS_PASSWORD"),
            token: env_var("OS_TOKEN"),
            endpoints: EndpointOverrides {
                vpc: env_var("OTC_VPC_ENDPOINT"),
                compute: env_var("OTC_COMPUTE_ENDPOINT"),
                image: env_var("OTC_IMAGE_ENDPOINT"),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Check that authentication can be attempted
    pub fn validate(&self) -> Result<()> {
        if self.auth_url.trim().is_empty() {
            return Err(ConfigError::MissingValue("auth_url"));
        }
        if self.token.is_some() {
            return Ok(());
        }
        if self.username.is_none() {
            return Err(ConfigError::MissingValue("username"));
        }
        if self.password.is_none() {
            return Err(ConfigError::MissingValue("password"));
        }
        if self.project_name.is_none() && self.project_id.is_none() {
            return Err(ConfigError::MissingValue("project_name"));
        }
        Ok(())
    }
}

/// Non-empty environment variable
pub(crate) fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Deserialize)]
struct CloudsFile {
    #[serde(default)]
    clouds: HashMap<String, CloudEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CloudEntry {
    auth: AuthSection,
    region_name: Option<String>,
    vpc_endpoint_override: Option<String>,
    compute_endpoint_override: Option<String>,
    image_endpoint_override: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AuthSection {
    auth_url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    token: Option<String>,
    project_name: Option<String>,
    project_id: Option<String>,
    domain_name: Option<String>,
    user_domain_name: Option<String>,
}

impl From<CloudEntry> for CloudConfig {
    fn from(entry: CloudEntry) -> Self {
        let auth = entry.auth;
        Self {
            auth_url: auth.auth_url.unwrap_or_default(),
            region: entry.region_name.unwrap_or_default(),
            domain_name: auth.domain_name.or(auth.user_domain_name),
            project_name: auth.project_name,
            project_id: auth.project_id,
            username: auth.username,
            password: auth.password,
            token: auth.token,
            endpoints: EndpointOverrides {
                vpc: entry.vpc_endpoint_override,
                compute: entry.compute_endpoint_override,
                image: entry.image_endpoint_override,
            },
        }
    }
}

/// Parse `clouds.yaml` content and pick the named cloud
pub fn parse_cloud(content: &str, name: &str) -> Result<CloudConfig> {
    let mut file: CloudsFile = serde_yaml::from_str(content)?;
    let entry = file
        .clouds
        .remove(name)
        .ok_or_else(|| ConfigError::CloudNotDefined(name.to_string()))?;

    let config = CloudConfig::from(entry);
    config.validate()?;
    Ok(config)
}

/// Load the named cloud from a `clouds.yaml` file
pub fn load_cloud(path: &Path, name: &str) -> Result<CloudConfig> {
    let content = std::fs::read_to_string(path)?;
    tracing::debug!("Loading cloud '{}' from {}", name, path.display());
    parse_cloud(&content, name)
}

//! Identity (Keystone v3) token authentication

use crate::error::{Result, ServiceError};
use chrono::{DateTime, Utc};
use otc_config::CloudConfig;
use otc_core::CloudError;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";

/// Authenticated session
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub project_id: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub catalog: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub endpoints: Vec<CatalogEndpoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEndpoint {
    #[serde(default)]
    pub interface: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub region_id: String,
    pub url: String,
}

impl CatalogEndpoint {
    fn in_region(&self, region: &str) -> bool {
        region.is_empty() || self.region_id == region || self.region == region
    }
}

impl Session {
    /// Public endpoint URL for a service type, preferring `region`
    pub fn endpoint(&self, service_type: &str, region: &str) -> Option<&str> {
        let entry = self
            .catalog
            .iter()
            .find(|e| e.service_type == service_type)?;

        let public = || entry.endpoints.iter().filter(|e| e.interface == "public");
        public()
            .find(|e| e.in_region(region))
            .or_else(|| public().next())
            .map(|e| e.url.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: TokenBody,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    expires_at: Option<DateTime<Utc>>,
    project: Option<ProjectRef>,
    #[serde(default)]
    catalog: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct ProjectRef {
    id: String,
}

fn auth_request(cloud: &CloudConfig) -> serde_json::Value {
    let identity = match &cloud.token {
        Some(token) => json!({
            "methods": ["token"],
            "token": { "id": token },
        }),
        None => json!({
            "methods": ["password"],
            "password": {
                "user": {
                    "name": cloud.username,
                    "password": cloud.password,
                    "domain": { "name": cloud.domain_name },
                }
            },
        }),
    };

    let scope = match &cloud.project_id {
        Some(id) => json!({ "project": { "id": id } }),
        None => json!({
            "project": {
                "name": cloud.project_name,
                "domain": { "name": cloud.domain_name },
            }
        }),
    };

    json!({ "auth": { "identity": identity, "scope": scope } })
}

/// Obtain a project-scoped token and the service catalog
pub async fn authenticate(http: &reqwest::Client, cloud: &CloudConfig) -> Result<Session> {
    cloud.validate()?;

    let url = format!("{}/auth/tokens", cloud.auth_url.trim_end_matches('/'));
    tracing::debug!("Requesting token from {}", url);

    let response = http.post(&url).json(&auth_request(cloud)).send().await?;
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        let text = response.text().await.unwrap_or_default();
        return Err(CloudError::AuthenticationFailed(text).into());
    }
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(ServiceError::Api {
            status: status.as_u16(),
            message: text,
        });
    }

    let token = response
        .headers()
        .get(SUBJECT_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| {
            CloudError::AuthenticationFailed(format!(
                "response has no {} header",
                SUBJECT_TOKEN_HEADER
            ))
        })?;

    let body: TokenResponse = response.json().await?;

    let project_id = cloud
        .project_id
        .clone()
        .or_else(|| body.token.project.map(|p| p.id))
        .ok_or_else(|| CloudError::InvalidConfig("token is not project scoped".to_string()))?;

    if let Some(expires_at) = body.token.expires_at {
        tracing::debug!("Token for project {} expires at {}", project_id, expires_at);
    }

    Ok(Session {
        token,
        project_id,
        expires_at: body.token.expires_at,
        catalog: body.token.catalog,
    })
}

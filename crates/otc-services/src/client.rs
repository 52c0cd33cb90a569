//! Authenticated client and per-service HTTP helpers

use crate::auth::{self, Session};
use crate::error::{Result, ServiceError};
use otc_config::{CloudConfig, DriverConfig, WaitSettings};
use otc_core::{
    CancellationToken, CloudError, Probe, ResourceStatus, WaitConfig, WaitOutcome, WaitTarget,
    poll_until,
};
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Default timeout for API requests
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Services reached through the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ServiceKind {
    Vpc,
    Compute,
    Image,
}

impl ServiceKind {
    fn catalog_type(&self) -> &'static str {
        match self {
            ServiceKind::Vpc => "vpc",
            ServiceKind::Compute => "compute",
            ServiceKind::Image => "image",
        }
    }

    fn api_path(&self, project_id: &str) -> String {
        match self {
            ServiceKind::Vpc => format!("/v1/{}", project_id),
            ServiceKind::Compute => format!("/v2.1/{}", project_id),
            ServiceKind::Image => "/v2".to_string(),
        }
    }
}

/// Build a service base URL from a catalog or override URL
///
/// Only the origin of `endpoint` is kept; the API version and project path
/// are appended per service.
pub(crate) fn service_base(endpoint: &str, kind: ServiceKind, project_id: &str) -> Result<String> {
    let url = url::Url::parse(endpoint)?;
    let origin = url.origin().ascii_serialization();
    Ok(format!("{}{}", origin, kind.api_path(project_id)))
}

pub(crate) fn wait_config(settings: &WaitSettings) -> WaitConfig {
    WaitConfig::new(
        Duration::from_secs(settings.timeout_secs),
        Duration::from_millis(settings.poll_interval_ms),
    )
}

/// HTTP helper bound to one service endpoint
#[derive(Clone)]
pub(crate) struct ServiceClient {
    http: reqwest::Client,
    base: String,
    token: Arc<str>,
}

impl ServiceClient {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_query(path, &[]).await
    }

    pub(crate) async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header(AUTH_TOKEN_HEADER, &*self.token)
            .query(query)
            .send()
            .await?;

        handle_response(response).await
    }

    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let url = self.url(path);
        tracing::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .header(AUTH_TOKEN_HEADER, &*self.token)
            .json(body)
            .send()
            .await?;

        handle_response(response).await
    }

    /// POST whose response body is ignored (server actions)
    pub(crate) async fn post_empty<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let url = self.url(path);
        tracing::debug!("POST {} (empty response)", url);

        let response = self
            .http
            .post(&url)
            .header(AUTH_TOKEN_HEADER, &*self.token)
            .json(body)
            .send()
            .await?;

        check_status(response).await
    }

    pub(crate) async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let url = self.url(path);
        tracing::debug!("PUT {}", url);

        let response = self
            .http
            .put(&url)
            .header(AUTH_TOKEN_HEADER, &*self.token)
            .json(body)
            .send()
            .await?;

        handle_response(response).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path);
        tracing::debug!("DELETE {}", url);

        let response = self
            .http
            .delete(&url)
            .header(AUTH_TOKEN_HEADER, &*self.token)
            .send()
            .await?;

        check_status(response).await
    }
}

/// Parse a JSON body, mapping 404 to [`ServiceError::NotFound`]
async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let text = response.text().await?;

    if status.is_success() {
        serde_json::from_str(&text).map_err(|e| {
            tracing::warn!("Failed to parse response: {} ({})", e, text);
            ServiceError::Json(e)
        })
    } else {
        Err(status_error(status, text))
    }
}

async fn check_status(response: reqwest::Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        let text = response.text().await.unwrap_or_default();
        Err(status_error(status, text))
    }
}

fn status_error(status: StatusCode, text: String) -> ServiceError {
    if status == StatusCode::NOT_FOUND {
        ServiceError::NotFound(text)
    } else {
        ServiceError::Api {
            status: status.as_u16(),
            message: text,
        }
    }
}

/// Turn one status reading into a probe result
pub(crate) fn probe_status(id: &str, status: ResourceStatus, target: WaitTarget) -> Result<Probe> {
    if target.is_reached_by(status) {
        return Ok(Probe::Reached);
    }
    if status.is_gone() {
        return Ok(Probe::Gone);
    }
    match (status, target) {
        // a resource may report ERROR on its way out; only a status wait fails
        (ResourceStatus::Error, WaitTarget::Status(_)) => Err(CloudError::ResourceFailed {
            id: id.to_string(),
            status: status.to_string(),
        }
        .into()),
        _ => Ok(Probe::Pending),
    }
}

/// A 404 while probing means the resource is gone
pub(crate) fn probe_lookup<T>(result: Result<T>, probe: impl FnOnce(T) -> Result<Probe>) -> Result<Probe> {
    match result {
        Ok(value) => probe(value),
        Err(e) if e.is_not_found() => Ok(Probe::Gone),
        Err(e) => Err(e),
    }
}

/// Open Telekom Cloud client
///
/// Created by [`Client::authenticate`]; call [`Client::init_network`] and/or
/// [`Client::init_compute`] before using the corresponding operations.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    session: Arc<Session>,
    cloud: Arc<CloudConfig>,
    wait: WaitConfig,
    cancel: CancellationToken,
    vpc: Option<ServiceClient>,
    compute: Option<ServiceClient>,
    image: Option<ServiceClient>,
}

impl Client {
    /// Authenticate against the identity service
    pub async fn authenticate(config: &DriverConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        let session = auth::authenticate(&http, &config.cloud).await?;
        tracing::info!("Authenticated for project {}", session.project_id);

        Ok(Self {
            http,
            session: Arc::new(session),
            cloud: Arc::new(config.cloud.clone()),
            wait: wait_config(&config.wait),
            cancel: CancellationToken::new(),
            vpc: None,
            compute: None,
            image: None,
        })
    }

    /// Abort every wait of this client when `cancel` fires
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_wait_config(mut self, wait: WaitConfig) -> Self {
        self.wait = wait;
        self
    }

    pub fn wait_config(&self) -> &WaitConfig {
        &self.wait
    }

    pub fn project_id(&self) -> &str {
        &self.session.project_id
    }

    pub fn region(&self) -> &str {
        &self.cloud.region
    }

    /// Resolve the VPC endpoint used by network operations
    pub fn init_network(&mut self) -> Result<()> {
        let override_url = self.cloud.endpoints.vpc.clone();
        self.vpc = Some(self.service_client(ServiceKind::Vpc, override_url.as_deref())?);
        Ok(())
    }

    /// Resolve the compute and image endpoints
    pub fn init_compute(&mut self) -> Result<()> {
        let compute_url = self.cloud.endpoints.compute.clone();
        let image_url = self.cloud.endpoints.image.clone();
        self.compute = Some(self.service_client(ServiceKind::Compute, compute_url.as_deref())?);
        self.image = Some(self.service_client(ServiceKind::Image, image_url.as_deref())?);
        Ok(())
    }

    fn service_client(&self, kind: ServiceKind, override_url: Option<&str>) -> Result<ServiceClient> {
        let endpoint = match override_url {
            Some(url) => url,
            None => self
                .session
                .endpoint(kind.catalog_type(), &self.cloud.region)
                .ok_or_else(|| ServiceError::MissingEndpoint(kind.catalog_type().to_string()))?,
        };

        let base = service_base(endpoint, kind, &self.session.project_id)?;
        tracing::debug!("Using {} endpoint {}", kind.catalog_type(), base);

        Ok(ServiceClient {
            http: self.http.clone(),
            base,
            token: Arc::from(self.session.token.as_str()),
        })
    }

    pub(crate) fn vpc_api(&self) -> Result<&ServiceClient> {
        self.vpc.as_ref().ok_or(ServiceError::NotInitialized("network"))
    }

    pub(crate) fn compute_api(&self) -> Result<&ServiceClient> {
        self.compute.as_ref().ok_or(ServiceError::NotInitialized("compute"))
    }

    pub(crate) fn image_api(&self) -> Result<&ServiceClient> {
        self.image.as_ref().ok_or(ServiceError::NotInitialized("compute"))
    }

    /// Poll with this client's wait settings and cancellation token
    pub(crate) async fn wait_until<F, Fut>(&self, what: &str, probe: F) -> Result<WaitOutcome>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Probe>>,
    {
        let outcome = poll_until(&self.wait, &self.cancel, probe).await?;
        tracing::debug!("Wait for {} finished: {:?}", what, outcome);
        Ok(outcome)
    }
}

#[cfg(test)]
impl Client {
    /// Client whose services all live on `uri`, for unit tests
    pub(crate) fn for_mock_server(uri: &str) -> Self {
        let http = reqwest::Client::new();
        let service = |base: String| ServiceClient {
            http: http.clone(),
            base,
            token: Arc::from("token-1"),
        };
        Self {
            session: Arc::new(Session {
                token: "token-1".to_string(),
                project_id: "project-1".to_string(),
                expires_at: None,
                catalog: Vec::new(),
            }),
            cloud: Arc::new(CloudConfig::default()),
            wait: WaitConfig::new(Duration::from_secs(1), Duration::from_millis(10)),
            cancel: CancellationToken::new(),
            vpc: Some(service(format!("{}/v1/project-1", uri))),
            compute: Some(service(format!("{}/v2.1/project-1", uri))),
            image: Some(service(format!("{}/v2", uri))),
            http,
        }
    }
}

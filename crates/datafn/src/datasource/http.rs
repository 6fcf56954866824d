//! secret store client speaking the REST v1 api
use super::secret_manager::{Connect, SecretPage, SecretStore, SecretVersion};
use super::{ResolveError, JSON_MEDIA_TYPE};
use base64::Engine;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://secretmanager.googleapis.com/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretManagerConfig {
    pub endpoint: String,
    pub access_token: Option<String>,
    pub timeout: Duration,
    pub page_size: u32,
}

impl Default for SecretManagerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            access_token: None,
            timeout: Duration::from_secs(30),
            page_size: 100,
        }
    }
}

#[derive(Debug, Clone, derive_new::new)]
pub struct HttpConnector {
    config: SecretManagerConfig,
}

#[async_trait::async_trait]
impl Connect for HttpConnector {
    type Client = HttpSecretManager;

    async fn connect(&self) -> Result<HttpSecretManager, ResolveError> {
        let endpoint = Url::parse(&self.config.endpoint)
            .and_then(|endpoint| endpoint.join("v1/"))
            .map_err(|err| ResolveError::InvalidUri(format!("{}: {err}", self.config.endpoint)))?;

        let client = Client::builder()
            .timeout(self.config.timeout)
            .build()
            .map_err(|err| connection_error(&endpoint, err))?;

        tracing::debug!(%endpoint, "secret store client ready");
        Ok(HttpSecretManager {
            client,
            endpoint,
            access_token: self.config.access_token.clone(),
            page_size: self.config.page_size,
        })
    }
}

#[derive(Debug, Clone)]
pub struct HttpSecretManager {
    client: Client,
    endpoint: Url,
    access_token: Option<String>,
    page_size: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListSecretsResponse {
    #[serde(default)]
    secrets: Vec<Secret>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Secret {
    name: String,
}

#[derive(Debug, Deserialize)]
struct AccessResponse {
    payload: SecretPayload,
}

#[derive(Debug, Deserialize)]
struct SecretPayload {
    #[serde(default)]
    data: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

fn connection_error(endpoint: &Url, err: reqwest::Error) -> ResolveError {
    ResolveError::Connection {
        endpoint: endpoint.to_string(),
        reason: err.to_string(),
    }
}

fn status_error(path: &str, status: StatusCode, body: &str) -> ResolveError {
    if status == StatusCode::NOT_FOUND {
        return ResolveError::NotFound(path.to_string());
    }

    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|response| response.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    ResolveError::Status {
        path: path.to_string(),
        status: status.as_u16(),
        message,
    }
}

fn decode_payload(name: &str, payload: &SecretPayload) -> Result<Vec<u8>, ResolveError> {
    base64::engine::general_purpose::STANDARD
        .decode(&payload.data)
        .map_err(|err| ResolveError::Format(format!("payload of {name}: {err}")))
}

impl HttpSecretManager {
    /// `path` below the api root, one path segment per `/` separated part
    ///
    /// Empty, `.` and `..` segments are rejected so the request can not leave the api root.
    fn url(&self, path: &str) -> Result<Url, ResolveError> {
        let invalid = || ResolveError::InvalidUri(format!("{path}: not a resource path"));

        let segments: Vec<&str> = path.split('/').collect();
        if segments
            .iter()
            .any(|segment| matches!(*segment, "" | "." | ".."))
        {
            return Err(invalid());
        }

        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, ResolveError> {
        let request = match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .header(reqwest::header::ACCEPT, JSON_MEDIA_TYPE)
            .send()
            .await
            .map_err(|err| connection_error(&self.endpoint, err))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| connection_error(&self.endpoint, err))?;
        tracing::trace!(path, %status, "response");

        if !status.is_success() {
            return Err(status_error(path, status, &body));
        }

        serde_json::from_str(&body).map_err(|err| ResolveError::Format(format!("{path}: {err}")))
    }
}

#[async_trait::async_trait]
impl SecretStore for HttpSecretManager {
    async fn list_secrets(
        &self,
        parent: &str,
        page_token: Option<&str>,
    ) -> Result<SecretPage, ResolveError> {
        let mut url = self.url(&format!("{parent}/secrets"))?;
        url.query_pairs_mut()
            .append_pair("pageSize", &self.page_size.to_string());
        if let Some(token) = page_token {
            url.query_pairs_mut().append_pair("pageToken", token);
        }

        let response: ListSecretsResponse = self.get(parent, self.client.get(url)).await?;
        Ok(SecretPage::new(
            response.secrets.into_iter().map(|secret| secret.name).collect(),
            response.next_page_token.filter(|token| !token.is_empty()),
        ))
    }

    async fn get_secret_version(&self, name: &str) -> Result<SecretVersion, ResolveError> {
        let url = self.url(name)?;
        self.get(name, self.client.get(url)).await
    }

    async fn access_secret_version(&self, name: &str) -> Result<Vec<u8>, ResolveError> {
        let url = self.url(&format!("{name}:access"))?;
        let response: AccessResponse = self.get(name, self.client.get(url)).await?;
        decode_payload(name, &response.payload)
    }
}

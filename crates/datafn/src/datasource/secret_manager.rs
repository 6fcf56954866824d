//! secret store datasource
//!
//! The path addressed by the url and the optional path argument (see [super::param_path]) is dispatched on its
//! number of segments:
//!
//! | **path**                       | **request**                                           | **payload**            |
//! |--------------------------------|-------------------------------------------------------|------------------------|
//! | `projects/123`                 | list all secrets that have a readable latest version  | `["foo", "bar"]`       |
//! | `projects/123/secrets/foo`     | access `projects/123/secrets/foo/versions/latest`     | `{"latest": "<value>"}`|
//! | anything else                  | access the path as given                              | `{"latest": "<value>"}`|
//!
//! The backend client is created by a [Connect] implementation the first time a resolver needs it and reused for
//! every later call on the same resolver. Each resolver owns its own client.
use super::{cancellable, param_path, Payload, ResolveError, Resolver};
use crate::context::RenderContext;
use regex::Regex;
use std::sync::OnceLock;
use tokio::sync::OnceCell;
use url::Url;

pub const LATEST_VERSION: &str = "versions/latest";

/// One page of secret resource names (`projects/<number>/secrets/<name>`)
#[derive(Debug, Clone, PartialEq, Eq, Default, derive_new::new)]
pub struct SecretPage {
    pub names: Vec<String>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VersionState {
    Enabled,
    Disabled,
    Destroyed,
    #[default]
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, derive_new::new)]
pub struct SecretVersion {
    pub name: String,
    #[serde(default)]
    pub state: VersionState,
}

impl SecretVersion {
    pub fn is_accessible(&self) -> bool {
        !matches!(self.state, VersionState::Disabled | VersionState::Destroyed)
    }
}

/// Subset of the secret store API
#[async_trait::async_trait]
pub trait SecretStore: Send + Sync {
    async fn list_secrets(
        &self,
        parent: &str,
        page_token: Option<&str>,
    ) -> Result<SecretPage, ResolveError>;

    async fn get_secret_version(&self, name: &str) -> Result<SecretVersion, ResolveError>;

    async fn access_secret_version(&self, name: &str) -> Result<Vec<u8>, ResolveError>;
}

/// Creates the [SecretStore] client
#[async_trait::async_trait]
pub trait Connect: Send + Sync {
    type Client: SecretStore;

    async fn connect(&self) -> Result<Self::Client, ResolveError>;
}

#[derive(Debug, PartialEq, Eq)]
enum Request {
    List(String),
    Access(String),
}

impl Request {
    fn from_path(path: String) -> Self {
        match path.split('/').count() {
            2 => Request::List(path),
            4 => Request::Access(format!("{path}/{LATEST_VERSION}")),
            _ => Request::Access(path),
        }
    }
}

#[derive(serde::Serialize)]
struct Latest {
    latest: String,
}

fn short_name(name: &str) -> Result<String, ResolveError> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN
        .get_or_init(|| Regex::new(r"^projects/\d+/secrets/(.+)$").expect("valid secret name pattern"));

    pattern
        .captures(name)
        .and_then(|captures| captures.get(1))
        .map(|short| short.as_str().to_string())
        .ok_or_else(|| ResolveError::Format(format!("unexpected secret name format: {name}")))
}

pub struct SecretManagerResolver<C: Connect> {
    connector: C,
    client: OnceCell<C::Client>,
}

impl<C: Connect> SecretManagerResolver<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            client: OnceCell::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.client.initialized()
    }

    async fn client(&self) -> Result<&C::Client, ResolveError> {
        self.client
            .get_or_try_init(|| async {
                tracing::debug!("connecting to secret store");
                self.connector.connect().await
            })
            .await
    }

    #[tracing::instrument(level = "debug", skip(self, url, args), fields(url = %url))]
    async fn read_path(&self, url: &Url, args: &[String]) -> Result<Payload, ResolveError> {
        let request = Request::from_path(param_path(url, args)?);
        tracing::debug!(?request, "dispatch");

        let client = self.client().await?;
        match request {
            Request::List(parent) => Payload::json(&list(client, &parent).await?),
            Request::Access(name) => {
                let data = client.access_secret_version(&name).await?;
                let latest = String::from_utf8(data).map_err(|_| {
                    ResolveError::Format(format!("payload of {name} is not valid utf-8"))
                })?;

                Payload::json(&Latest { latest })
            }
        }
    }
}

/// Drain all pages, then keep the secrets whose latest version can be read
async fn list<S: SecretStore + ?Sized>(
    client: &S,
    parent: &str,
) -> Result<Vec<String>, ResolveError> {
    let mut names = vec![];
    let mut page_token: Option<String> = None;
    loop {
        let page = client.list_secrets(parent, page_token.as_deref()).await?;
        names.extend(page.names);

        match page.next_page_token {
            Some(token) if !token.is_empty() => page_token = Some(token),
            _ => break,
        }
    }

    tracing::trace!(count = names.len(), parent, "listed secrets");

    let mut secrets = Vec::with_capacity(names.len());
    for name in names {
        let short = short_name(&name)?;

        match client
            .get_secret_version(&format!("{name}/{LATEST_VERSION}"))
            .await
        {
            Ok(version) if version.is_accessible() => secrets.push(short),
            Ok(version) => tracing::trace!(%name, state = ?version.state, "skipped"),
            Err(ResolveError::NotFound(_)) | Err(ResolveError::Status { status: 403, .. }) => {
                tracing::trace!(%name, "skipped, no readable version")
            }
            Err(err) => return Err(err),
        }
    }

    Ok(secrets)
}

#[async_trait::async_trait]
impl<C: Connect> Resolver for SecretManagerResolver<C> {
    async fn read(
        &self,
        ctx: &RenderContext,
        url: &Url,
        args: &[String],
    ) -> Result<Payload, ResolveError> {
        cancellable(ctx, self.read_path(url, args)).await
    }
}

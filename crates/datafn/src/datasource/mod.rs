//! datasources
//!
//! A datasource turns a URL plus an optional path argument into a payload that decodes into a [Value]. The
//! collection functions never call datasources, the template layer does and hands the decoded values over.
//!
//! Calls may block on network I/O. Every call races against the cancellation signal of the [RenderContext] it was
//! given and returns [ResolveError::Cancelled] once that fires. Results are all-or-nothing, a call never hands out
//! part of a listing.
pub mod http;
pub mod secret_manager;

use crate::context::RenderContext;
use crate::value::Value;
use std::future::Future;
use url::Url;

pub const JSON_MEDIA_TYPE: &str = "application/json";

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ResolveError {
    #[error("unable to reach {endpoint}: {reason}")]
    Connection { endpoint: String, reason: String },
    #[error("{0} not found")]
    NotFound(String),
    #[error("unexpected data from backend: {0}")]
    Format(String),
    #[error("{path}: backend responded with status {status}: {message}")]
    Status {
        path: String,
        status: u16,
        message: String,
    },
    #[error("cancelled")]
    Cancelled,
    #[error("invalid datasource url {0}")]
    InvalidUri(String),
    #[error("wrong number of path arguments: wanted at most 1, got {0}")]
    InvalidArgs(usize),
}

/// Raw datasource response
#[derive(Debug, Clone, PartialEq, Eq, derive_new::new)]
pub struct Payload {
    pub media_type: &'static str,
    pub data: Vec<u8>,
}

impl Payload {
    pub fn json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Self, ResolveError> {
        let data =
            serde_json::to_vec(value).map_err(|err| ResolveError::Format(err.to_string()))?;
        Ok(Self::new(JSON_MEDIA_TYPE, data))
    }

    pub fn decode(&self) -> Result<Value, ResolveError> {
        if self.media_type != JSON_MEDIA_TYPE {
            return Err(ResolveError::Format(format!(
                "unsupported media type {}",
                self.media_type
            )));
        }

        serde_json::from_slice::<Value>(&self.data)
            .map_err(|err| ResolveError::Format(err.to_string()))
    }
}

#[async_trait::async_trait]
pub trait Resolver: Send + Sync {
    /// Fetch the raw payload addressed by `url` and `args`
    async fn read(
        &self,
        ctx: &RenderContext,
        url: &Url,
        args: &[String],
    ) -> Result<Payload, ResolveError>;

    /// Fetch and decode
    async fn resolve(
        &self,
        ctx: &RenderContext,
        url: &Url,
        args: &[String],
    ) -> Result<Value, ResolveError> {
        self.read(ctx, url, args).await?.decode()
    }
}

/// Path addressed by `url` and the optional path argument, without leading `/`
///
/// The argument is appended to the path of the url.
pub fn param_path(url: &Url, args: &[String]) -> Result<String, ResolveError> {
    let base = url.path();
    let path = match args {
        [] => base.to_string(),
        [arg] if base.trim_matches('/').is_empty() => arg.clone(),
        [arg] => format!(
            "{}/{}",
            base.trim_end_matches('/'),
            arg.trim_start_matches('/')
        ),
        more => return Err(ResolveError::InvalidArgs(more.len())),
    };

    Ok(path.trim_start_matches('/').to_string())
}

/// Run `future` unless `ctx` gets cancelled first
pub(crate) async fn cancellable<T>(
    ctx: &RenderContext,
    future: impl Future<Output = Result<T, ResolveError>>,
) -> Result<T, ResolveError> {
    tokio::select! {
        biased;
        _ = ctx.cancelled() => {
            tracing::debug!(render = ctx.name(), "datasource call cancelled");
            Err(ResolveError::Cancelled)
        }
        result = future => result,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn url(url: &str) -> Url {
        Url::parse(url).expect("valid url")
    }

    #[test]
    fn path_from_url() {
        let path = param_path(&url("gcp+sm:///projects/123/secrets/foo"), &[]);
        assert_eq!(path, Ok("projects/123/secrets/foo".to_string()));

        let path = param_path(&url("gcp+sm:projects/123"), &[]);
        assert_eq!(path, Ok("projects/123".to_string()));
    }

    #[test]
    fn path_argument_is_appended() {
        let path = param_path(&url("gcp+sm:///projects/123/"), &["/secrets/foo".into()]);
        assert_eq!(path, Ok("projects/123/secrets/foo".to_string()));

        let path = param_path(&url("gcp+sm:///"), &["projects/123".into()]);
        assert_eq!(path, Ok("projects/123".to_string()));
    }

    #[test]
    fn too_many_arguments() {
        let path = param_path(&url("gcp+sm:///"), &["a".into(), "b".into()]);
        assert_eq!(path, Err(ResolveError::InvalidArgs(2)));
    }

    #[test]
    fn decode_json_payload() {
        let payload = Payload::json(&["a", "b"]).expect("serializable");
        assert_eq!(payload.decode(), Ok(Value::from(vec!["a", "b"])));

        let ordered = Payload::new(JSON_MEDIA_TYPE, br#"{"b":1,"a":2}"#.to_vec());
        assert_eq!(
            ordered.decode().map(|value| value.to_string()),
            Ok(r#"{"b":1,"a":2}"#.to_string())
        );

        let broken = Payload::new(JSON_MEDIA_TYPE, b"{".to_vec());
        assert!(matches!(broken.decode(), Err(ResolveError::Format(_))));
    }

    #[tokio::test]
    async fn cancelled_context_wins() {
        let (ctx, handle) = RenderContext::new("test");
        handle.cancel();

        let result = cancellable(&ctx, std::future::pending::<Result<(), _>>()).await;
        assert_eq!(result, Err(ResolveError::Cancelled));
    }
}

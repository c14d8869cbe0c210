//! Mini app host detection.
//!
//! A page may be embedded by a mini app container that keeps a splash screen
//! up until the page reports it is ready. The container is an outside
//! collaborator, reached only through [`HostBridge`].

use axum::http::HeaderMap;
use serde::Deserialize;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

pub const MINI_APP_HEADER: &str = "x-mini-app";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Web,
    MiniApp,
}

impl Environment {
    pub fn label(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::MiniApp => "mini app",
        }
    }

    /// Query string that keeps a follow-up page request in this context.
    pub fn query_suffix(self) -> &'static str {
        match self {
            Self::Web => "",
            Self::MiniApp => "?miniApp=true",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("host bridge: {0}")]
pub struct HostError(pub String);

pub trait HostBridge {
    fn is_in_mini_app(&self) -> impl Future<Output = Result<bool, HostError>> + Send;
    fn ready(&self) -> impl Future<Output = Result<(), HostError>> + Send;
}

/// Asks the host where we are running and, inside a mini app, tells it we
/// are ready. `ready` is sent at most once and its outcome is only logged.
/// A host that cannot answer is treated as a plain web page.
pub async fn startup<H: HostBridge>(host: &H) -> Environment {
    let environment = detect(host).await;
    if environment == Environment::Web {
        return environment;
    }

    match host.ready().await {
        Ok(()) => debug!("ready signalled to host"),
        Err(err) => warn!("host ready notification failed: {err}"),
    }
    Environment::MiniApp
}

/// Detection alone, for callers that must not signal readiness.
pub async fn detect<H: HostBridge>(host: &H) -> Environment {
    let in_mini_app = match host.is_in_mini_app().await {
        Ok(answer) => answer,
        Err(err) => {
            warn!("host detection failed, assuming web: {err}");
            false
        }
    };
    debug!(in_mini_app, "host detected");

    if in_mini_app {
        Environment::MiniApp
    } else {
        Environment::Web
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct HostQuery {
    #[serde(rename = "miniApp")]
    pub mini_app: Option<String>,
}

impl HostQuery {
    pub fn requests_mini_app(&self) -> bool {
        self.mini_app.as_deref().is_some_and(is_truthy)
    }
}

/// Host view of a single page request. Embedding containers open the page
/// with `?miniApp=true` or send `x-mini-app: 1`. Signalling ready arms the
/// rendered page to emit the container SDK's ready call.
#[derive(Debug, Default)]
pub struct RequestHost {
    embedded: bool,
    ready: AtomicBool,
}

impl RequestHost {
    pub fn from_request(query: &HostQuery, headers: &HeaderMap) -> Self {
        let by_query = query.requests_mini_app();
        let by_header = headers
            .get(MINI_APP_HEADER)
            .and_then(|value| value.to_str().ok())
            .is_some_and(is_truthy);

        Self {
            embedded: by_query || by_header,
            ready: AtomicBool::new(false),
        }
    }

    pub fn ready_signalled(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}

impl HostBridge for RequestHost {
    async fn is_in_mini_app(&self) -> Result<bool, HostError> {
        Ok(self.embedded)
    }

    async fn ready(&self) -> Result<(), HostError> {
        if self.ready.swap(true, Ordering::SeqCst) {
            return Err(HostError("ready already signalled".into()));
        }
        Ok(())
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use std::sync::atomic::AtomicUsize;

    struct FakeHost {
        answer: Result<bool, String>,
        ready_fails: bool,
        ready_calls: AtomicUsize,
    }

    impl FakeHost {
        fn new(answer: Result<bool, String>) -> Self {
            Self {
                answer,
                ready_fails: false,
                ready_calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.ready_calls.load(Ordering::SeqCst)
        }
    }

    impl HostBridge for FakeHost {
        async fn is_in_mini_app(&self) -> Result<bool, HostError> {
            self.answer.clone().map_err(HostError)
        }

        async fn ready(&self) -> Result<(), HostError> {
            self.ready_calls.fetch_add(1, Ordering::SeqCst);
            if self.ready_fails {
                return Err(HostError("splash stuck".into()));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn mini_app_host_gets_ready_once() {
        let host = FakeHost::new(Ok(true));
        assert_eq!(startup(&host).await, Environment::MiniApp);
        assert_eq!(host.calls(), 1);
    }

    #[tokio::test]
    async fn web_host_never_gets_ready() {
        let host = FakeHost::new(Ok(false));
        assert_eq!(startup(&host).await, Environment::Web);
        assert_eq!(host.calls(), 0);
    }

    #[tokio::test]
    async fn detection_failure_is_treated_as_web() {
        let host = FakeHost::new(Err("no sdk".into()));
        assert_eq!(startup(&host).await, Environment::Web);
        assert_eq!(host.calls(), 0);
    }

    #[tokio::test]
    async fn ready_failure_is_ignored() {
        let mut host = FakeHost::new(Ok(true));
        host.ready_fails = true;
        assert_eq!(startup(&host).await, Environment::MiniApp);
        assert_eq!(host.calls(), 1);
    }

    #[tokio::test]
    async fn request_host_detects_query_and_header() {
        let headers = HeaderMap::new();
        let query = HostQuery {
            mini_app: Some("true".into()),
        };
        let host = RequestHost::from_request(&query, &headers);
        assert_eq!(startup(&host).await, Environment::MiniApp);
        assert!(host.ready_signalled());

        let mut headers = HeaderMap::new();
        headers.insert(MINI_APP_HEADER, HeaderValue::from_static("1"));
        let host = RequestHost::from_request(&HostQuery::default(), &headers);
        assert_eq!(startup(&host).await, Environment::MiniApp);

        let host = RequestHost::from_request(&HostQuery::default(), &HeaderMap::new());
        assert_eq!(startup(&host).await, Environment::Web);
        assert!(!host.ready_signalled());
    }

    #[tokio::test]
    async fn detect_does_not_signal_ready() {
        let host = FakeHost::new(Ok(true));
        assert_eq!(detect(&host).await, Environment::MiniApp);
        assert_eq!(host.calls(), 0);
    }

    #[test]
    fn environment_labels() {
        assert_eq!(Environment::Web.label(), "web");
        assert_eq!(Environment::MiniApp.label(), "mini app");
    }

    #[test]
    fn query_suffix_round_trips_through_detection() {
        assert_eq!(Environment::Web.query_suffix(), "");
        assert_eq!(Environment::MiniApp.query_suffix(), "?miniApp=true");

        let query = HostQuery {
            mini_app: Environment::MiniApp
                .query_suffix()
                .strip_prefix("?miniApp=")
                .map(str::to_string),
        };
        assert!(query.requests_mini_app());
        assert!(!HostQuery::default().requests_mini_app());
    }
}

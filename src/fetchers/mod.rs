pub mod dictionary;
pub mod http;
pub mod weather;

use crate::core::error::ChatError;
use async_trait::async_trait;
use serde_json::Value;

pub use http::HttpFetcher;

/// Network access used by the lookup plugins.
///
/// Any non-success status, transport failure or unreadable body is an `Err`;
/// callers decide whether to fall back.
#[async_trait]
pub trait JsonFetch: Send + Sync {
    async fn fetch_json(&self, url: &str) -> Result<Value, ChatError>;
}

/// Fetcher for `--offline` runs. Every lookup takes the fallback path.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineFetcher;

#[async_trait]
impl JsonFetch for OfflineFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value, ChatError> {
        Err(ChatError::Network(format!("offline mode, skipped {}", url)))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Canned responses keyed by nothing: answers every request the same way
    /// and remembers which URLs were asked for.
    pub struct StubFetch {
        response: Result<Value, u16>,
        pub urls: Mutex<Vec<String>>,
    }

    impl StubFetch {
        pub fn ok(body: Value) -> Self {
            Self {
                response: Ok(body),
                urls: Mutex::new(Vec::new()),
            }
        }

        pub fn status(status: u16) -> Self {
            Self {
                response: Err(status),
                urls: Mutex::new(Vec::new()),
            }
        }

        pub fn requested(&self) -> Vec<String> {
            self.urls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl JsonFetch for StubFetch {
        async fn fetch_json(&self, url: &str) -> Result<Value, ChatError> {
            self.urls.lock().unwrap().push(url.to_string());
            match &self.response {
                Ok(body) => Ok(body.clone()),
                Err(status) => Err(ChatError::Upstream { status: *status }),
            }
        }
    }
}

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::db::{PlayerStore, StoreError};
use crate::response::ResponseShape;

/// Shared by every handler; cloning only bumps the store's reference count.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PlayerStore>,
    pub response_shape: ResponseShape,
    pub request_timeout: Duration,
}

impl AppState {
    /// State with the default 10 second deadline and the direct shape.
    pub fn new(store: Arc<dyn PlayerStore>) -> Self {
        let defaults = Config::default();
        Self {
            store,
            response_shape: defaults.response_shape,
            request_timeout: defaults.request_timeout,
        }
    }

    pub fn from_config(store: Arc<dyn PlayerStore>, config: &Config) -> Self {
        Self {
            store,
            response_shape: config.response_shape,
            request_timeout: config.request_timeout,
        }
    }

    pub fn with_response_shape(mut self, shape: ResponseShape) -> Self {
        self.response_shape = shape;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Run one store call under the request deadline.
    pub async fn deadline<T>(
        &self,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        tokio::time::timeout(self.request_timeout, call)
            .await
            .map_err(|_| StoreError::Timeout(self.request_timeout))?
    }
}

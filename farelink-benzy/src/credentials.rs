use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;
use tokio::sync::Mutex;
use tracing::{error, info};

use farelink_core::error::SupplierError;
use farelink_store::app_config::SupplierConfig;

use crate::clock::Clock;
use crate::gateway::SupplierGateway;
use crate::wire::{clean_token, SignatureRequest};

/// Kept deliberately shorter than the supplier's token lifetime so tokens
/// are renewed well before they expire upstream.
const TOKEN_TTL: Duration = Duration::from_secs(47 * 60 * 60);

/// Bearer token and client identifier issued by the signature endpoint.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub token: String,
    pub client_id: String,
    pub tui: String,
    pub expires_at: Instant,
}

type PendingRefresh = Shared<BoxFuture<'static, Result<Credentials, SupplierError>>>;

struct CredentialState {
    cached: Option<Credentials>,
    pending: Option<PendingRefresh>,
}

struct Inner {
    gateway: Arc<dyn SupplierGateway>,
    config: SupplierConfig,
    clock: Arc<dyn Clock>,
    state: Mutex<CredentialState>,
}

/// Process-wide credential cache. At most one signature request is in flight
/// at any time; every caller that arrives during a refresh is parked on the
/// same shared future and receives that refresh's outcome.
#[derive(Clone)]
pub struct CredentialCache {
    inner: Arc<Inner>,
}

impl CredentialCache {
    pub fn new(
        gateway: Arc<dyn SupplierGateway>,
        config: SupplierConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                gateway,
                config,
                clock,
                state: Mutex::new(CredentialState {
                    cached: None,
                    pending: None,
                }),
            }),
        }
    }

    /// Returns cached credentials without touching the network while they
    /// remain valid; otherwise joins (or starts) the single in-flight
    /// refresh.
    pub async fn get_credentials(&self) -> Result<Credentials, SupplierError> {
        let refresh = {
            let mut state = self.inner.state.lock().await;

            if let Some(cached) = state.cached.as_ref() {
                if self.inner.clock.now() < cached.expires_at {
                    return Ok(cached.clone());
                }
            }

            match state.pending.as_ref() {
                Some(pending) => pending.clone(),
                None => {
                    let inner = Arc::clone(&self.inner);
                    let refresh: PendingRefresh = async move {
                        let outcome = Inner::refresh(&inner).await;
                        let mut state = inner.state.lock().await;
                        state.pending = None;
                        if let Ok(credentials) = &outcome {
                            state.cached = Some(credentials.clone());
                        }
                        outcome
                    }
                    .boxed()
                    .shared();
                    state.pending = Some(refresh.clone());
                    refresh
                }
            }
        };

        refresh.await
    }

    /// Drops the cached credentials so the next caller refreshes. Used when
    /// the supplier starts rejecting the token early.
    pub async fn invalidate(&self) {
        let mut state = self.inner.state.lock().await;
        state.cached = None;
    }
}

impl Inner {
    async fn refresh(inner: &Arc<Inner>) -> Result<Credentials, SupplierError> {
        let request = SignatureRequest {
            merchant_id: inner.config.merchant_id.clone(),
            api_key: inner.config.api_key.clone(),
            client_id: inner.config.client_id.clone(),
            password: inner.config.password.clone(),
            agent_code: String::new(),
            browser_key: inner.config.browser_key.clone(),
            key: inner.config.signing_key.clone(),
        };

        let response = inner.gateway.signature(&request).await.map_err(|e| {
            error!(error = %e, "signature request failed");
            SupplierError::Auth(e.to_string())
        })?;

        let credentials = Credentials {
            token: clean_token(&response.token),
            client_id: clean_token(&response.client_id),
            tui: clean_token(&response.tui),
            expires_at: inner.clock.now() + TOKEN_TTL,
        };

        info!("supplier credentials refreshed");
        Ok(credentials)
    }
}

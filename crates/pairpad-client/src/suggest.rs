//! Debounced suggestion fetching.
//!
//! Every edit re-arms a trailing-edge debounce timer; only after the
//! user goes quiet does one request leave for the backend. Re-arming
//! cancels a timer that has not fired yet, but never an in-flight
//! request: a response that arrives after a newer request was issued
//! is discarded by generation number instead.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pairpad_proto::rest::{AutocompleteRequest, AutocompleteResponse};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

use crate::error::ClientError;

/// Default quiet period before a suggestion request is issued.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(600);

/// Source of suggestions. Abstracted so tests can count and shape
/// responses without a network.
#[async_trait]
pub trait SuggestionBackend: Send + Sync + 'static {
    /// Fetch a suggestion for the given editor state.
    async fn fetch(&self, req: AutocompleteRequest) -> Result<AutocompleteResponse, ClientError>;
}

/// Backend that POSTs to a suggestion HTTP endpoint.
pub struct HttpSuggestionBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSuggestionBackend {
    /// Point the backend at a server base URL, e.g. `http://127.0.0.1:8000`.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/autocomplete", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl SuggestionBackend for HttpSuggestionBackend {
    async fn fetch(&self, req: AutocompleteRequest) -> Result<AutocompleteResponse, ClientError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&req)
            .send()
            .await?
            .error_for_status()?
            .json::<AutocompleteResponse>()
            .await?;
        Ok(resp)
    }
}

#[derive(Default)]
struct ProxyState {
    pending: Option<String>,
    /// Generation of the newest request actually issued. Responses
    /// carrying an older generation are stale and dropped.
    latest_issued: u64,
}

/// Debouncing proxy in front of a [`SuggestionBackend`].
pub struct SuggestionProxy {
    backend: Arc<dyn SuggestionBackend>,
    debounce: Duration,
    state: Arc<Mutex<ProxyState>>,
    timer: Option<JoinHandle<()>>,
}

impl SuggestionProxy {
    /// Proxy with the default quiet period.
    pub fn new(backend: Arc<dyn SuggestionBackend>) -> Self {
        Self::with_debounce(backend, DEFAULT_DEBOUNCE)
    }

    /// Proxy with a custom quiet period.
    pub fn with_debounce(backend: Arc<dyn SuggestionBackend>, debounce: Duration) -> Self {
        Self {
            backend,
            debounce,
            state: Arc::new(Mutex::new(ProxyState::default())),
            timer: None,
        }
    }

    /// Record an edit: re-arm the debounce timer for this editor state.
    ///
    /// Aborting the previous timer only cancels an unexpired quiet
    /// period; once a fetch has been issued it runs to completion on
    /// its own task and is subject only to the staleness check.
    pub fn note_edit(&mut self, code: String, cursor_position: usize, language: String) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }

        let backend = Arc::clone(&self.backend);
        let state = Arc::clone(&self.state);
        let debounce = self.debounce;

        self.timer = Some(tokio::spawn(async move {
            sleep(debounce).await;

            let generation = {
                let mut st = state.lock();
                st.latest_issued += 1;
                st.latest_issued
            };
            let req = AutocompleteRequest {
                code,
                cursor_position,
                language,
            };
            // Detached so the fetch outlives any later timer abort.
            tokio::spawn(async move {
                let result = backend.fetch(req).await;
                let mut st = state.lock();
                if generation < st.latest_issued {
                    debug!(generation, "Discarding stale suggestion response");
                    return;
                }
                st.pending = match result {
                    Ok(resp) => resp.suggestion.filter(|s| !s.is_empty()),
                    Err(err) => {
                        debug!(%err, "Suggestion fetch failed");
                        None
                    }
                };
            });
        }));
    }

    /// The suggestion currently on offer, if any.
    pub fn pending(&self) -> Option<String> {
        self.state.lock().pending.clone()
    }

    /// Accept the pending suggestion by appending it to `document`.
    /// No-op when nothing is pending.
    pub fn apply(&self, document: &mut String) {
        if let Some(suggestion) = self.state.lock().pending.take() {
            document.push_str(&suggestion);
        }
    }
}

impl Drop for SuggestionProxy {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

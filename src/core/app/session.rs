use std::time::Duration;

use reqwest::Client;
use tracing::warn;

use crate::core::catalog::{CatalogError, ModelCatalog};
use crate::core::config::Config;
use crate::core::message::MessageIdGenerator;
use crate::utils::url::validate_endpoint;

pub struct SessionContext {
    pub client: Client,
    pub endpoint: String,
    pub selected_model: Option<String>,
    pub pending: bool,
    pub current_request_id: u64,
    pub request_timeout: Duration,
    pub reveal_interval: Duration,
    pub ids: MessageIdGenerator,
}

impl SessionContext {
    pub fn new(endpoint: String, selected_model: Option<String>, config: &Config) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            selected_model,
            pending: false,
            current_request_id: 0,
            request_timeout: config.request_timeout(),
            reveal_interval: config.reveal_interval(),
            ids: MessageIdGenerator::new(),
        }
    }

    /// Mark a submission as in flight and return its request id.
    pub fn begin_request(&mut self) -> u64 {
        self.pending = true;
        self.current_request_id += 1;
        self.current_request_id
    }

    pub fn is_current_request(&self, request_id: u64) -> bool {
        self.pending && self.current_request_id == request_id
    }

    pub fn finish_request(&mut self) {
        self.pending = false;
    }
}

/// Result of resolving startup options against the config and catalog.
pub struct SessionBootstrap {
    pub session: SessionContext,
    pub startup_warnings: Vec<String>,
}

/// Resolve endpoint and model for a new session.
///
/// A model named on the command line must exist in the catalog. A stale
/// `default-model` in the config only produces a warning and leaves the
/// session without a selection.
pub fn prepare_session(
    cli_model: Option<&str>,
    cli_endpoint: Option<&str>,
    config: &Config,
    catalog: &ModelCatalog,
) -> Result<SessionBootstrap, Box<dyn std::error::Error>> {
    let endpoint = validate_endpoint(&config.resolve_endpoint(cli_endpoint))?;
    let mut startup_warnings = Vec::new();

    let selected_model = match cli_model {
        Some(id) => Some(catalog.require(id)?.id.clone()),
        None => match config.default_model.as_deref() {
            Some(id) => match catalog.require(id) {
                Ok(model) => Some(model.id.clone()),
                Err(CatalogError::UnknownModel(id)) => {
                    warn!(model = %id, "Configured default model is not in the catalog");
                    startup_warnings.push(format!(
                        "Default model '{id}' is not available. Press Ctrl+O to pick one."
                    ));
                    None
                }
                Err(err) => return Err(err.into()),
            },
            None => None,
        },
    };

    Ok(SessionBootstrap {
        session: SessionContext::new(endpoint, selected_model, config),
        startup_warnings,
    })
}

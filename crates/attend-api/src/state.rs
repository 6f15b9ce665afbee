use std::sync::Arc;

use tokio::sync::Mutex;

use attend_core::models::session::SessionStore;
use attend_instruments::risk::RiskRules;
use attend_models::dataset::Dataset;
use attend_models::error::ModelError;
use attend_models::pipeline::TrainingReport;

use crate::config::AttendConfig;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AttendConfig>,
    pub rules: Arc<RiskRules>,
    pub dataset: Arc<Dataset>,
    pub sessions: Arc<Mutex<SessionStore>>,
    pub last_report: Arc<Mutex<Option<TrainingReport>>>,
}

impl AppState {
    pub fn new(config: AttendConfig, dataset: Dataset) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(SessionStore::with_limits(config.sessions))),
            rules: Arc::new(config.rules()),
            config: Arc::new(config),
            dataset: Arc::new(dataset),
            last_report: Arc::new(Mutex::new(None)),
        }
    }

    /// Load the configured dataset, falling back as the config allows.
    pub fn from_config(config: AttendConfig) -> Result<Self, ModelError> {
        let dataset = Dataset::load_or_synthesize(config.dataset_path.as_deref(), config.fallback)?;
        if dataset.provenance.fallback_used {
            tracing::warn!(
                reason = dataset.provenance.fallback_reason.as_deref().unwrap_or_default(),
                "serving synthetic data in place of the configured dataset"
            );
        }
        Ok(Self::new(config, dataset))
    }
}

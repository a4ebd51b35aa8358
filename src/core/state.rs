use std::sync::Arc;

use sqlx::PgPool;

use crate::core::config::Settings;
use crate::services::gemini::GeminiService;

#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    db: PgPool,
    gemini: GeminiService,
}

impl AppState {
    pub(crate) fn new(settings: Settings, db: PgPool, gemini: GeminiService) -> Self {
        Self { inner: Arc::new(InnerState { settings, db, gemini }) }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn db(&self) -> &PgPool {
        &self.inner.db
    }

    pub(crate) fn gemini(&self) -> &GeminiService {
        &self.inner.gemini
    }
}

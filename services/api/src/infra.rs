use decision_helper::config::AppConfig;
use decision_helper::error::AppError;
use decision_helper::questionnaire::QuestionCatalog;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Resolves the catalog from `--catalog`, then `APP_CATALOG_PATH`, then the standard set.
pub(crate) fn load_catalog(
    config: &AppConfig,
    override_path: Option<PathBuf>,
) -> Result<Arc<QuestionCatalog>, AppError> {
    let mut catalog_config = config.catalog.clone();
    if let Some(path) = override_path {
        catalog_config.path = Some(path);
    }

    let catalog = catalog_config.load_catalog()?;
    info!(
        questions = catalog.len(),
        dimensions = catalog.dimensions().len(),
        source = %catalog_config
            .path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "standard".to_string()),
        "question catalog loaded"
    );
    Ok(Arc::new(catalog))
}

/// Parses a `question_id=token` command-line assignment.
pub(crate) fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (id, token) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected QUESTION=VALUE, got '{raw}'"))?;

    let id = id.trim();
    let token = token.trim();
    if id.is_empty() || token.is_empty() {
        return Err(format!("expected QUESTION=VALUE, got '{raw}'"));
    }

    Ok((id.to_string(), token.to_string()))
}

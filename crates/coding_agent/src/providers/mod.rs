use std::path::Path;
use std::sync::Arc;

use agent_provider::{ChatBackend, ProviderInitError};
use agent_provider_mock::MOCK_PROVIDER_ID;

mod mock;

pub use mock::{load_mock_script, mock_provider, MOCK_SCRIPT_ENV_VAR};

pub const PROVIDER_ENV_VAR: &str = "CODING_AGENT_PROVIDER";

pub fn provider_from_env() -> Result<Arc<dyn ChatBackend>, ProviderInitError> {
    let provider_id = std::env::var(PROVIDER_ENV_VAR)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            ProviderInitError::new(format!(
                "{PROVIDER_ENV_VAR} is not set. Available providers: {MOCK_PROVIDER_ID}"
            ))
        })?;

    let script = std::env::var_os(MOCK_SCRIPT_ENV_VAR).filter(|value| !value.is_empty());
    provider_for_id(&provider_id, script.as_deref().map(Path::new))
}

pub fn provider_for_id(
    provider_id: &str,
    mock_script: Option<&Path>,
) -> Result<Arc<dyn ChatBackend>, ProviderInitError> {
    match provider_id {
        MOCK_PROVIDER_ID => Ok(Arc::new(mock_provider(mock_script)?)),
        unknown => Err(ProviderInitError::new(format!(
            "Unsupported provider '{unknown}'. Available providers: {MOCK_PROVIDER_ID}"
        ))),
    }
}

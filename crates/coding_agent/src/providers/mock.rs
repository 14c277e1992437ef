use std::path::Path;

use agent_provider::ProviderInitError;
use agent_provider_mock::MockProvider;

pub const MOCK_SCRIPT_ENV_VAR: &str = "CODING_AGENT_MOCK_SCRIPT";

/// Builds the mock backend, scripted from `script` when given.
pub fn mock_provider(script: Option<&Path>) -> Result<MockProvider, ProviderInitError> {
    match script {
        Some(path) => Ok(MockProvider::new(load_mock_script(path)?)),
        None => Ok(MockProvider::default()),
    }
}

/// Reads a JSON array of response strings.
pub fn load_mock_script(path: &Path) -> Result<Vec<String>, ProviderInitError> {
    let text = std::fs::read_to_string(path).map_err(|error| {
        ProviderInitError::new(format!(
            "Failed to read mock script {}: {error}",
            path.display()
        ))
    })?;

    let replies: Vec<String> = serde_json::from_str(&text).map_err(|error| {
        ProviderInitError::new(format!(
            "Mock script {} must be a JSON array of strings: {error}",
            path.display()
        ))
    })?;

    tracing::debug!(path = %path.display(), replies = replies.len(), "loaded mock script");
    Ok(replies)
}

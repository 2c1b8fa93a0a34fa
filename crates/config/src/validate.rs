use crate::error::{ErrorKind, Result};
use crate::settings::Settings;

impl Settings {
    /// Reject settings that would load but can't work.
    ///
    /// All problems are reported at once, separated by `; `.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();
        if self.genai.timeout_secs == 0 {
            problems.push("genai.timeout_secs must be greater than zero".to_string());
        }
        for (field, model) in [
            ("passage_model", &self.genai.passage_model),
            ("reasoning_model", &self.genai.reasoning_model),
            ("quick_model", &self.genai.quick_model),
        ] {
            if model.trim().is_empty() {
                problems.push(format!("genai.{field} must not be empty"));
            }
        }
        if self.genai.api_key.as_deref().is_some_and(|key| key.trim().is_empty()) {
            problems.push("genai.api_key must not be blank".to_string());
        }
        if self.retry.initial_delay_ms == 0 {
            problems.push("retry.initial_delay_ms must be greater than zero".to_string());
        }
        if let Some(path) = &self.storage.path
            && !path.is_absolute()
        {
            problems.push(format!("storage.path must be absolute, got {}", path.display()));
        }
        if self.bible.default_version.trim().is_empty() {
            problems.push("bible.default_version must not be empty".to_string());
        }
        if !problems.is_empty() {
            exn::bail!(ErrorKind::Invalid(problems.join("; ")));
        }
        Ok(())
    }
}

//! Wiring settings into the library components.

use crate::cli::Cli;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use exn::ResultExt;
use std::sync::Arc;
use verbum_assistant::Assistant;
use verbum_bible::{NetworkSwitch, PassageResolver, find_translation};
use verbum_config::Settings;
use verbum_genai::error::{ErrorKind as GenAiErrorKind, Result as GenAiResult};
use verbum_genai::{GeminiClient, GenerationRequest, Generator, GeneratorHandle};
use verbum_storage::StoreHandle;
use verbum_storage::backend::{LocalStore, ReadOnlyStore};

pub struct App {
    pub settings: Settings,
    pub store: StoreHandle,
    generator: GeneratorHandle,
    network: Arc<NetworkSwitch>,
}

impl App {
    pub fn new(cli: &Cli, settings: Settings) -> Result<Self> {
        let root = settings.storage.resolved_path().or_raise(|| ErrorKind::Config)?;
        let local = LocalStore::new("device", &root).or_raise(|| ErrorKind::Storage)?;
        tracing::debug!(root = %root.display(), "Opened device storage");
        let store: StoreHandle = if cli.read_only || settings.storage.read_only {
            Arc::new(ReadOnlyStore::new(Arc::new(local)))
        } else {
            Arc::new(local)
        };

        let generator: GeneratorHandle = match settings.genai.api_key.as_deref() {
            Some(key) => Arc::new(
                GeminiClient::new(key, settings.genai.endpoint.clone(), settings.genai.timeout())
                    .or_raise(|| ErrorKind::Generator)?,
            ),
            None => {
                tracing::info!("No API key configured; only cached passages are available");
                Arc::new(Unconfigured)
            },
        };

        Ok(Self { settings, store, generator, network: Arc::new(NetworkSwitch::new(!cli.offline)) })
    }

    pub fn resolver(&self) -> PassageResolver {
        PassageResolver::new(self.generator.clone(), self.store.clone(), self.network.clone())
            .with_backoff(self.settings.retry.backoff())
            .with_model(&self.settings.genai.passage_model)
    }

    pub fn assistant(&self) -> Assistant {
        Assistant::new(self.generator.clone())
            .with_backoff(self.settings.retry.backoff())
            .with_models(&self.settings.genai.reasoning_model, &self.settings.genai.quick_model)
    }

    /// The requested translation, or the configured default, in its catalog
    /// spelling. Unknown ids are passed on to the model as they are.
    pub fn translation(&self, requested: Option<String>) -> String {
        let version = requested.unwrap_or_else(|| self.settings.bible.default_version.clone());
        match find_translation(&version) {
            Some(known) => known.id.to_string(),
            None => {
                tracing::warn!(%version, "Unknown translation; see `verbum translations`");
                version
            },
        }
    }
}

/// Stands in for the model when no API key is set. Every request fails without
/// being retried.
struct Unconfigured;

#[async_trait]
impl Generator for Unconfigured {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn generate(&self, _request: &GenerationRequest) -> GenAiResult<String> {
        exn::bail!(GenAiErrorKind::Configuration(
            "no API key; set GEMINI_API_KEY or genai.api_key".to_string()
        ));
    }
}

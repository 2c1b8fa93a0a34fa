use crate::error::{ErrorKind, Result};
use crate::task::{ModelTier, Task};
use verbum_genai::{GenerationRequest, GeneratorHandle};
use verbum_retry::{Backoff, Classify};

pub const DEFAULT_REASONING_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_QUICK_MODEL: &str = "gemini-3-flash-preview";

/// Runs [`Task`]s against a generator, with retries and fallbacks.
pub struct Assistant {
    generator: GeneratorHandle,
    backoff: Backoff,
    reasoning_model: String,
    quick_model: String,
}

impl Assistant {
    pub fn new(generator: GeneratorHandle) -> Self {
        Self {
            generator,
            backoff: Backoff::default(),
            reasoning_model: DEFAULT_REASONING_MODEL.to_string(),
            quick_model: DEFAULT_QUICK_MODEL.to_string(),
        }
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_models(mut self, reasoning: impl Into<String>, quick: impl Into<String>) -> Self {
        self.reasoning_model = reasoning.into();
        self.quick_model = quick.into();
        self
    }

    pub fn model(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Reasoning => &self.reasoning_model,
            ModelTier::Quick => &self.quick_model,
        }
    }

    /// Run a task, answering with its fallback sentence on any failure.
    pub async fn run(&self, task: Task<'_>) -> String {
        match self.try_run(task).await {
            Ok(answer) => answer,
            Err(err) => {
                tracing::warn!(%task, class = %err.class(), error = ?err, "Task failed, using fallback");
                task.fallback().to_string()
            },
        }
    }

    /// Run a task once through the retry schedule. Blank answers are errors.
    #[tracing::instrument(skip_all, fields(task = %task))]
    pub async fn try_run(&self, task: Task<'_>) -> Result<String> {
        let request = GenerationRequest::new(self.model(task.tier()), task.contents())
            .with_system_instruction(task.system_instruction());
        let answer = match self.backoff.run(|| self.generator.generate(&request)).await {
            Ok(answer) => answer,
            Err(err) => {
                let class = err.class();
                return Err(err.raise(ErrorKind::Generation(class)));
            },
        };
        let answer = answer.trim();
        if answer.is_empty() {
            exn::bail!(ErrorKind::EmptyAnswer);
        }
        Ok(answer.to_string())
    }

    pub async fn bible_context(&self, book: &str, chapter: u32) -> String {
        self.run(Task::Context { book, chapter }).await
    }

    pub async fn ask(&self, question: &str) -> String {
        self.run(Task::Question(question)).await
    }

    pub async fn summarize_sermon(&self, title: &str, speaker: &str) -> String {
        self.run(Task::SermonSummary { title, speaker }).await
    }

    pub async fn prayer(&self, intent: &str) -> String {
        self.run(Task::Prayer(intent)).await
    }
}

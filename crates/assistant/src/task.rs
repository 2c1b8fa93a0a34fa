//! The four single-shot tasks and their prompts.

use derive_more::Display;

/// Which configured model a task runs on.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelTier {
    /// Slower model for theology and open questions.
    #[display("reasoning")]
    Reasoning,
    /// Fast model for short text.
    #[display("quick")]
    Quick,
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Task<'a> {
    /// Historical and spiritual background of a chapter.
    #[display("context")]
    Context { book: &'a str, chapter: u32 },
    /// A free-form question about the Scriptures.
    #[display("question")]
    Question(&'a str),
    /// Key points of a sermon, from its title and speaker.
    #[display("summary")]
    SermonSummary { title: &'a str, speaker: &'a str },
    /// A short prayer for the given intention.
    #[display("prayer")]
    Prayer(&'a str),
}

impl Task<'_> {
    pub fn tier(&self) -> ModelTier {
        match self {
            Self::Context { .. } | Self::Question(_) => ModelTier::Reasoning,
            Self::SermonSummary { .. } | Self::Prayer(_) => ModelTier::Quick,
        }
    }

    pub fn system_instruction(&self) -> &'static str {
        match self {
            Self::Context { .. } => {
                "Seja pastoral e profundo. Forneça 3 parágrafos curtos explicando o contexto histórico e espiritual."
            },
            Self::Question(_) => "Responda de forma curta e pastoral com base nas Escrituras.",
            Self::SermonSummary { .. } => "Resuma os pontos fundamentais da pregação.",
            Self::Prayer(_) => "Escreva uma oração bíblica e curta.",
        }
    }

    pub fn contents(&self) -> String {
        match self {
            Self::Context { book, chapter } => format!("Forneça contexto teológico de {book} capítulo {chapter}."),
            Self::Question(question) => question.to_string(),
            Self::SermonSummary { title, speaker } => format!("Resumo de: {title} por {speaker}"),
            Self::Prayer(intent) => format!("Oração para: {intent}"),
        }
    }

    /// Shown instead of an answer when the model can't be used.
    pub fn fallback(&self) -> &'static str {
        match self {
            Self::Context { .. } => "O insight teológico está indisponível agora.",
            Self::Question(_) => "O sistema está com alta demanda. Tente novamente em breve.",
            Self::SermonSummary { .. } => "Resumo indisponível.",
            Self::Prayer(_) => "Deus conhece seu coração, fale com Ele em oração.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Task::Context { book: "Romanos", chapter: 8 }, ModelTier::Reasoning, "Forneça contexto teológico de Romanos capítulo 8.")]
    #[case(Task::Question("Quem foi Melquisedeque?"), ModelTier::Reasoning, "Quem foi Melquisedeque?")]
    #[case(Task::SermonSummary { title: "O Bom Pastor", speaker: "Pr. Marcos" }, ModelTier::Quick, "Resumo de: O Bom Pastor por Pr. Marcos")]
    #[case(Task::Prayer("minha família"), ModelTier::Quick, "Oração para: minha família")]
    fn test_prompts(#[case] task: Task<'_>, #[case] tier: ModelTier, #[case] contents: &str) {
        assert_eq!(task.tier(), tier);
        assert_eq!(task.contents(), contents);
        assert!(!task.system_instruction().is_empty());
        assert!(!task.fallback().is_empty());
    }
}

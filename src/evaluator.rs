use crate::llm::OpenAiProvider;
use crate::rule::Rule;
use async_trait::async_trait;
use tracing::trace;

/// The pluggable capability that computes violations for one rule
///
/// Implementations may be backed by pattern matching, static analysis, or a
/// remote inference call. Whatever they return is untrusted text; the decoder
/// is responsible for making sense of it.
#[async_trait]
pub trait Evaluator: Send + Sync {
    async fn evaluate(&self, rule: &Rule, source_text: &str) -> anyhow::Result<String>;
}

/// Default evaluator backed by an OpenAI-compatible chat endpoint
///
/// One instance is shared by every rule; the rule's id, description, and
/// details are rendered into the prompt per call.
pub struct LlmEvaluator {
    provider: OpenAiProvider,
}

impl LlmEvaluator {
    pub fn new(provider: OpenAiProvider) -> Self {
        Self { provider }
    }

    fn render_prompt(rule: &Rule, source_text: &str) -> String {
        format!(
            "Analyze the following code based *only* on the rule provided.\n\
             \n\
             Rule ID: {}\n\
             Rule Description: {}\n\
             Rule Details: {}\n\
             \n\
             Code:\n\
             ```\n\
             {}\n\
             ```\n\
             \n\
             Identify all lines where the rule is violated. For each violation, \
             provide the line number, the specific issue, and a suggestion for fixing it.\n\
             \n\
             If no violations are found for this rule, return an empty list.\n\
             \n\
             Output ONLY a valid JSON list of violation objects, where each object has \
             'line', 'issue', and 'suggestion' keys. \
             Example: [{{\"line\": 10, \"issue\": \"Hardcoded secret\", \"suggestion\": \"Load from environment variable.\"}}]\n\
             If no violations, output: []\n\
             \n\
             JSON Violations:",
            rule.id, rule.description, rule.details, source_text
        )
    }
}

#[async_trait]
impl Evaluator for LlmEvaluator {
    async fn evaluate(&self, rule: &Rule, source_text: &str) -> anyhow::Result<String> {
        let prompt = Self::render_prompt(rule, source_text);
        trace!("Prompt for rule {}: {}", rule.id, prompt);
        self.provider.complete(&prompt).await
    }
}

use serde::{Deserialize, Serialize};

/// A validated rule violation at a specific source line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Violation {
    /// Line number (1-indexed, within the original source)
    pub line: u32,
    /// What is wrong on that line
    pub issue: String,
    /// How to fix it
    pub suggestion: String,
}

/// All surviving violations for one rule
///
/// Only exists when at least one violation survived decoding and validation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RuleResult {
    pub rule_id: String,
    pub description: String,
    pub violations: Vec<Violation>,
}

/// Aggregated per-rule results for one source text, in rule-catalog order
///
/// This is the single source of truth consumed by both the report builder and
/// the annotator, so the two artifacts can never diverge.
#[derive(Debug, Clone, Default)]
pub struct AnalysisResult {
    results: Vec<RuleResult>,
}

impl AnalysisResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule's result. Callers push in catalog order; iteration
    /// preserves insertion order.
    pub fn push(&mut self, result: RuleResult) {
        self.results.push(result);
    }

    pub fn get(&self, rule_id: &str) -> Option<&RuleResult> {
        self.results.iter().find(|r| r.rule_id == rule_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuleResult> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Canonical report shape handed to persistence/printing collaborators
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub file_name: String,
    pub analysis_summary: Vec<RuleSummary>,
}

/// One rule's entry in the report summary
#[derive(Debug, Clone, Serialize)]
pub struct RuleSummary {
    pub rule_id: String,
    pub violations: Vec<Violation>,
}

use crate::types::{AnalysisResult, Report, RuleSummary};

/// Shape the aggregated result into the canonical report structure
///
/// Pure transform: no filtering beyond what `AnalysisResult` already omitted,
/// rule-catalog order preserved.
pub fn build_report(file_name: &str, result: &AnalysisResult) -> Report {
    Report {
        file_name: file_name.to_string(),
        analysis_summary: result
            .iter()
            .map(|rule_result| RuleSummary {
                rule_id: rule_result.rule_id.clone(),
                violations: rule_result.violations.clone(),
            })
            .collect(),
    }
}

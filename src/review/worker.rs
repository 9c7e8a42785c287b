use crate::decode::{self, RawViolation};
use crate::evaluator::Evaluator;
use crate::rule::Rule;
use crate::types::{RuleResult, Violation};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Evaluate one rule against the source text
///
/// Invokes the bound evaluator under an independent timeout, decodes its raw
/// output, and validates every decoded record against the source line count.
/// Any evaluator-level failure (transport error, timeout, malformed call) is
/// caught here and treated as zero violations; a single failing rule never
/// aborts the batch. Returns `Some` only when at least one violation survived.
pub async fn evaluate_rule(
    worker_id: usize,
    rule: &Rule,
    evaluator: &Arc<dyn Evaluator>,
    source_text: &str,
    total_lines: usize,
    timeout: Duration,
) -> Option<RuleResult> {
    let start = std::time::Instant::now();
    info!("[Worker {}] Evaluating rule '{}'", worker_id, rule.id);

    let raw_output = match tokio::time::timeout(timeout, evaluator.evaluate(rule, source_text)).await
    {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            warn!(
                "[Worker {}] Evaluator failed for rule '{}', treating as zero violations: {}",
                worker_id, rule.id, e
            );
            return None;
        }
        Err(_) => {
            warn!(
                "[Worker {}] Evaluator timed out for rule '{}' after {:?}, treating as zero violations",
                worker_id, rule.id, timeout
            );
            return None;
        }
    };

    let decoded = decode::decode(&raw_output, &rule.id);
    let violations = validate_lines(decoded, total_lines, &rule.id);

    let elapsed = start.elapsed().as_secs_f64();
    info!(
        "[Worker {}] Done evaluating rule '{}' ({:.2}s): {} violations",
        worker_id,
        rule.id,
        elapsed,
        violations.len()
    );

    if violations.is_empty() {
        return None;
    }

    Some(RuleResult {
        rule_id: rule.id.clone(),
        description: rule.description.clone(),
        violations,
    })
}

/// Promote raw violations to validated ones, dropping records whose line is
/// missing or outside `[1, total_lines]`. Siblings are unaffected; order is
/// preserved.
fn validate_lines(raw: Vec<RawViolation>, total_lines: usize, rule_id: &str) -> Vec<Violation> {
    raw.into_iter()
        .filter_map(|violation| match violation.line {
            Some(line) if line >= 1 && line as usize <= total_lines => Some(Violation {
                line,
                issue: violation.issue,
                suggestion: violation.suggestion,
            }),
            _ => {
                debug!(
                    "Dropping violation with missing/out-of-range line for rule {}: line={:?}, issue={}",
                    rule_id, violation.line, violation.issue
                );
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use async_trait::async_trait;

    struct FixedEvaluator(&'static str);

    #[async_trait]
    impl Evaluator for FixedEvaluator {
        async fn evaluate(&self, _rule: &Rule, _source_text: &str) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingEvaluator;

    #[async_trait]
    impl Evaluator for FailingEvaluator {
        async fn evaluate(&self, _rule: &Rule, _source_text: &str) -> anyhow::Result<String> {
            bail!("connection refused")
        }
    }

    struct HangingEvaluator;

    #[async_trait]
    impl Evaluator for HangingEvaluator {
        async fn evaluate(&self, _rule: &Rule, _source_text: &str) -> anyhow::Result<String> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("[]".into())
        }
    }

    fn rule() -> Rule {
        Rule::new("CR001", "Naming Conventions", "details")
    }

    fn raw(line: Option<u32>) -> RawViolation {
        RawViolation {
            line,
            issue: "issue".into(),
            suggestion: "fix".into(),
        }
    }

    #[test]
    fn test_validate_lines_drops_missing_and_out_of_range() {
        let validated = validate_lines(
            vec![raw(None), raw(Some(1)), raw(Some(999)), raw(Some(2))],
            2,
            "CR001",
        );
        let lines: Vec<u32> = validated.iter().map(|v| v.line).collect();
        assert_eq!(lines, vec![1, 2]);
    }

    #[test]
    fn test_validate_lines_last_line_is_valid() {
        let validated = validate_lines(vec![raw(Some(2))], 2, "CR001");
        assert_eq!(validated.len(), 1);
    }

    #[tokio::test]
    async fn test_evaluate_rule_collects_valid_violations() {
        let evaluator: Arc<dyn Evaluator> = Arc::new(FixedEvaluator(
            r#"[{"line": 1, "issue": "bad name", "suggestion": "rename"}]"#,
        ));
        let result = evaluate_rule(
            0,
            &rule(),
            &evaluator,
            "def f():\n    pass",
            2,
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        assert_eq!(result.rule_id, "CR001");
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].line, 1);
    }

    #[tokio::test]
    async fn test_evaluate_rule_unparseable_output_yields_none() {
        let evaluator: Arc<dyn Evaluator> = Arc::new(FixedEvaluator("not json"));
        let result =
            evaluate_rule(0, &rule(), &evaluator, "x", 1, Duration::from_secs(5)).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_evaluate_rule_only_invalid_lines_yields_none() {
        let evaluator: Arc<dyn Evaluator> = Arc::new(FixedEvaluator(
            r#"[{"line": 999, "issue": "x", "suggestion": "y"}]"#,
        ));
        let result =
            evaluate_rule(0, &rule(), &evaluator, "a\nb", 2, Duration::from_secs(5)).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_evaluate_rule_evaluator_failure_is_recovered() {
        let evaluator: Arc<dyn Evaluator> = Arc::new(FailingEvaluator);
        let result =
            evaluate_rule(0, &rule(), &evaluator, "x", 1, Duration::from_secs(5)).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_evaluate_rule_timeout_is_recovered() {
        let evaluator: Arc<dyn Evaluator> = Arc::new(HangingEvaluator);
        let result =
            evaluate_rule(0, &rule(), &evaluator, "x", 1, Duration::from_millis(20)).await;
        assert!(result.is_none());
    }
}

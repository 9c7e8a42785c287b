use crate::types::AnalysisResult;
use std::collections::HashMap;
use tracing::debug;

/// Merge violations into a copy of the source text as inline review comments
///
/// Each flagged line is followed by one comment per violation, rendered as
/// `# REVIEW [<rule_id>]: <issue> -> SUGGESTION: <suggestion>` and prefixed
/// with the flagged line's own leading whitespace, so comments sit at the
/// indentation level of the code they annotate. Line numbers always refer to
/// the original, pre-annotation numbering.
///
/// The source is split and rejoined on `\n` verbatim, so an empty result
/// returns the input byte-for-byte (trailing newline included) and the
/// original buffer is never mutated. Violations whose line falls outside the
/// source are silently skipped; duplicates are rendered as separate comments.
pub fn annotate(source_text: &str, result: &AnalysisResult) -> String {
    let lines: Vec<&str> = source_text.split('\n').collect();

    // 0-based line index -> comments, filled in catalog order and, within a
    // rule, in the order the evaluator returned the violations.
    let mut annotations: HashMap<usize, Vec<String>> = HashMap::new();
    for rule_result in result.iter() {
        for violation in &rule_result.violations {
            let line = violation.line as usize;
            if line >= 1 && line <= lines.len() {
                let comment = format!(
                    "# REVIEW [{}]: {} -> SUGGESTION: {}",
                    rule_result.rule_id, violation.issue, violation.suggestion
                );
                annotations.entry(line - 1).or_default().push(comment);
            } else {
                debug!(
                    "Skipping annotation outside source for rule {}: line {}",
                    rule_result.rule_id, violation.line
                );
            }
        }
    }

    let mut annotated: Vec<String> = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        annotated.push((*line).to_string());
        if let Some(comments) = annotations.get(&i) {
            let indentation = leading_whitespace(line);
            for comment in comments {
                annotated.push(format!("{}{}", indentation, comment));
            }
        }
    }

    annotated.join("\n")
}

/// Leading run of spaces and tabs of a line
fn leading_whitespace(line: &str) -> &str {
    let end = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RuleResult, Violation};

    fn violation(line: u32, issue: &str, suggestion: &str) -> Violation {
        Violation {
            line,
            issue: issue.into(),
            suggestion: suggestion.into(),
        }
    }

    fn single_rule(rule_id: &str, violations: Vec<Violation>) -> AnalysisResult {
        let mut result = AnalysisResult::new();
        result.push(RuleResult {
            rule_id: rule_id.into(),
            description: "desc".into(),
            violations,
        });
        result
    }

    #[test]
    fn test_annotate_inserts_comment_after_flagged_line() {
        let source = "def f():\n    pass";
        let result = single_rule("CR001", vec![violation(1, "bad name", "rename")]);
        assert_eq!(
            annotate(source, &result),
            "def f():\n# REVIEW [CR001]: bad name -> SUGGESTION: rename\n    pass"
        );
    }

    #[test]
    fn test_annotate_empty_result_is_identity() {
        let result = AnalysisResult::new();
        for source in ["", "a", "a\nb", "a\nb\n", "  indented\n\ntrailing\n"] {
            assert_eq!(annotate(source, &result), source);
            // Two passes drift nothing either.
            assert_eq!(annotate(&annotate(source, &result), &result), source);
        }
    }

    #[test]
    fn test_annotate_preserves_indentation() {
        let source = "def f():\n    if x:\n        return 1";
        let result = single_rule("CR004", vec![violation(3, "magic number", "name it")]);
        let annotated = annotate(source, &result);
        let lines: Vec<&str> = annotated.split('\n').collect();
        assert_eq!(
            lines[3],
            "        # REVIEW [CR004]: magic number -> SUGGESTION: name it"
        );
    }

    #[test]
    fn test_annotate_preserves_tab_indentation() {
        let source = "def f():\n\t\treturn 1";
        let result = single_rule("CR004", vec![violation(2, "x", "y")]);
        let annotated = annotate(source, &result);
        let lines: Vec<&str> = annotated.split('\n').collect();
        assert!(lines[2].starts_with("\t\t# REVIEW [CR004]:"));
    }

    #[test]
    fn test_annotate_skips_out_of_range_lines() {
        let source = "one\ntwo";
        let result = single_rule("CR001", vec![violation(999, "x", "y")]);
        assert_eq!(annotate(source, &result), source);
    }

    #[test]
    fn test_annotate_last_line_is_valid() {
        let source = "one\ntwo";
        let result = single_rule("CR001", vec![violation(2, "x", "y")]);
        assert_eq!(
            annotate(source, &result),
            "one\ntwo\n# REVIEW [CR001]: x -> SUGGESTION: y"
        );
    }

    #[test]
    fn test_annotate_multiple_rules_same_line_in_catalog_order() {
        let source = "a\nb\n    flagged";
        let mut result = AnalysisResult::new();
        result.push(RuleResult {
            rule_id: "RuleA".into(),
            description: "a".into(),
            violations: vec![violation(3, "first", "fix a")],
        });
        result.push(RuleResult {
            rule_id: "RuleB".into(),
            description: "b".into(),
            violations: vec![violation(3, "second", "fix b")],
        });

        let annotated = annotate(source, &result);
        let lines: Vec<&str> = annotated.split('\n').collect();
        assert_eq!(lines[3], "    # REVIEW [RuleA]: first -> SUGGESTION: fix a");
        assert_eq!(lines[4], "    # REVIEW [RuleB]: second -> SUGGESTION: fix b");
    }

    #[test]
    fn test_annotate_duplicates_are_not_merged() {
        let source = "line";
        let result = single_rule(
            "CR001",
            vec![violation(1, "dup", "fix"), violation(1, "dup", "fix")],
        );
        let annotated = annotate(source, &result);
        assert_eq!(annotated.split('\n').count(), 3);
    }

    #[test]
    fn test_annotate_original_lines_keep_their_numbers() {
        let source = "def f():\n    pass\nprint(1)";
        let result = single_rule("CR001", vec![violation(1, "x", "y"), violation(3, "z", "w")]);
        let annotated = annotate(source, &result);
        let original: Vec<&str> = source.split('\n').collect();
        // Every original line survives verbatim, in order, when comments are
        // filtered back out.
        let survivors: Vec<&str> = annotated
            .split('\n')
            .filter(|l| !l.trim_start().starts_with("# REVIEW ["))
            .collect();
        assert_eq!(survivors, original);
    }
}

use serde::{Deserialize, Serialize};

/// A review rule from the catalog
///
/// Rules are loaded once at startup and never change afterwards. The catalog
/// is an ordered sequence; results are always reported in catalog order.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Rule {
    /// Unique, stable rule identifier (e.g. "CR001")
    pub id: String,
    /// Human-readable rule name
    pub description: String,
    /// Detailed instructions for the evaluator on how to check this rule
    pub details: String,
}

impl Rule {
    pub fn new(id: &str, description: &str, details: &str) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            details: details.into(),
        }
    }
}

/// Built-in review rule catalog, used when the config file defines no rules
pub fn default_catalog() -> Vec<Rule> {
    vec![
        Rule::new(
            "CR001",
            "Naming Conventions",
            "Ensure consistent, meaningful, and compliant naming practices. \
             Classes: PascalCase, functions/variables: snake_case, constants: \
             UPPER_CASE (max 10 chars). Names must be descriptive and unambiguous.",
        ),
        Rule::new(
            "CR002",
            "Secret & Credential Handling",
            "Ensure sensitive data (e.g., API keys) is stored securely. \
             No hardcoding; load from .env or secret managers.",
        ),
        Rule::new(
            "CR003",
            "File & Folder Naming Structure",
            "Ensure logical, readable, and scalable structure. Files: lowercase \
             with underscores/dashes. Logical directory grouping. Avoid nesting > 3 levels.",
        ),
        Rule::new(
            "CR004",
            "Code Formatting & Style",
            "Ensure uniform code formatting. Use formatters (black/prettier), \
             consistent indentation (Python: 4 spaces), line length 80-120 chars, \
             no trailing spaces, proper line endings.",
        ),
        Rule::new(
            "CR005",
            "Comments & Documentation",
            "Ensure code is self-explanatory and documented. Function/class \
             docstrings required. Inline comments for complex logic only. \
             Avoid redundant comments.",
        ),
        Rule::new(
            "CR006",
            "Error Handling",
            "Ensure proper error handling. Catch specific exceptions, avoid bare \
             'except:', log errors with context, use try/except/finally for cleanup.",
        ),
        Rule::new(
            "CR007",
            "Dependency Usage",
            "Ensure dependencies are necessary, secure, and managed. Include \
             manifest (requirements.txt), pin versions, remove unused dependencies.",
        ),
        Rule::new(
            "CR008",
            "Input & Data Validation",
            "Ensure external input is validated and sanitized. Check inputs for \
             correctness/completeness/format, sanitize client data, use validation \
             libraries/checks.",
        ),
        Rule::new(
            "CR009",
            "Security Practices",
            "Ensure adherence to security best practices. Avoid 'eval()' on user \
             input, use HTTPS, secure CORS/headers, don't log sensitive info.",
        ),
        Rule::new(
            "CR010",
            "Logging & Debugging Practices",
            "Ensure efficient debugging and secure logging. Use proper logging \
             levels, avoid 'print()' in production, don't log secrets.",
        ),
    ]
}

use crate::evaluator::Evaluator;
use crate::rule::Rule;
use std::sync::Arc;

/// The rule catalog, each rule bound to its evaluator capability
///
/// Populated once at initialization and read-only afterwards. Iteration order
/// is registration order, which is the catalog order every downstream
/// consumer relies on.
pub struct Registry {
    entries: Vec<Entry>,
}

struct Entry {
    rule: Rule,
    evaluator: Arc<dyn Evaluator>,
}

impl Registry {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Bind every rule of a catalog to one shared evaluator
    pub fn with_evaluator(rules: Vec<Rule>, evaluator: Arc<dyn Evaluator>) -> Self {
        let mut registry = Self::new();
        for rule in rules {
            registry.register(rule, evaluator.clone());
        }
        registry
    }

    pub fn register(&mut self, rule: Rule, evaluator: Arc<dyn Evaluator>) {
        self.entries.push(Entry { rule, evaluator });
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Rule, &Arc<dyn Evaluator>)> {
        self.entries.iter().map(|e| (&e.rule, &e.evaluator))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

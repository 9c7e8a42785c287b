use super::worker;
use crate::registry::Registry;
use crate::types::{AnalysisResult, RuleResult};
use anyhow::bail;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Run every registered rule against one source text
///
/// Fans out one worker per rule, bounded by `max_parallel_rules` (1 means
/// sequential evaluation, the conservative default for external APIs).
/// Workers are independent and share no mutable state; their results come
/// back through the stream tagged with the catalog index and are merged in
/// catalog order regardless of completion order, so the outcome is fully
/// deterministic for a fixed set of evaluator outputs.
///
/// Cancellation is all-or-nothing: once the shutdown flag is set the run
/// returns an error and no partial `AnalysisResult` escapes.
pub async fn evaluate_all(
    registry: &Registry,
    source_text: &str,
    max_parallel_rules: usize,
    evaluator_timeout: Duration,
    shutdown: Arc<Mutex<bool>>,
) -> anyhow::Result<AnalysisResult> {
    let total_lines = super::line_count(source_text);
    debug!(
        "Evaluating {} rules against {} source lines",
        registry.len(),
        total_lines
    );

    if *shutdown.lock().await {
        bail!("review cancelled before any rule was evaluated");
    }

    let futures: Vec<_> = registry
        .iter()
        .enumerate()
        .map(|(i, (rule, evaluator))| {
            let evaluator = evaluator.clone();
            async move {
                let result = worker::evaluate_rule(
                    i,
                    rule,
                    &evaluator,
                    source_text,
                    total_lines,
                    evaluator_timeout,
                )
                .await;
                (i, result)
            }
        })
        .collect();

    let max_workers = max_parallel_rules.max(1);
    info!("Running workers with max parallelism: {}", max_workers);

    // Worker pool: fill up to max_workers, then push one new worker per
    // completion so the pool size stays constant until the queue drains.
    use futures::stream::{FuturesUnordered, StreamExt};
    let mut stream = FuturesUnordered::new();
    let mut collected: Vec<(usize, Option<RuleResult>)> = Vec::new();
    let mut futures_iter = futures.into_iter();

    for _ in 0..max_workers.min(futures_iter.len()) {
        if let Some(fut) = futures_iter.next() {
            stream.push(fut);
        }
    }

    while let Some(item) = stream.next().await {
        collected.push(item);
        if *shutdown.lock().await {
            warn!("Shutdown requested, discarding partial results");
            bail!("review cancelled, no results were produced");
        }
        if let Some(fut) = futures_iter.next() {
            stream.push(fut);
        }
    }

    // Completion order is nondeterministic under parallelism; the catalog
    // index restores the stable ordering.
    collected.sort_by_key(|(i, _)| *i);

    let mut analysis = AnalysisResult::new();
    for (_, result) in collected {
        if let Some(rule_result) = result {
            analysis.push(rule_result);
        }
    }

    info!(
        "Review complete: {} of {} rules reported violations",
        analysis.len(),
        registry.len()
    );
    Ok(analysis)
}

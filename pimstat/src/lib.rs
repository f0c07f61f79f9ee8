//! PIM simulator statistics (`pimstat`).
//!
//! Extracts metrics from the logs of several simulator runs, one per KV cache
//! placement policy, and compares them against a baseline policy.

// Modules
pub mod aggregate;
pub mod collector;
pub mod compare;
pub mod config;
pub mod parser;
pub mod report;
pub mod table;

// Exports
pub use self::{
	collector::Collector,
	compare::{Comparison, ComparisonEntry},
	config::{Config, TimingConfig},
	parser::{Metrics, MetricsParser, RegexParser},
	table::{MetricValue, MetricsTable, PolicyRun},
};

/// Analysis output
#[derive(Clone, Debug)]
pub struct Analysis {
	/// All metrics
	pub table: MetricsTable,

	/// Comparison against the baseline, if the baseline had any metrics
	pub comparison: Option<Comparison>,
}

/// Collects, aggregates and compares all policies in `config`.
///
/// # Errors
/// Returns an error if `config` is invalid.
pub fn analyze(config: &Config, parser: &impl MetricsParser) -> Result<Analysis, anyhow::Error> {
	config.validate()?;

	let collector = Collector::new(parser, |policy: &str| config.log_path(policy), config.parallel);
	let runs = collector.collect(&config.policies);
	tracing::info!(
		policies = runs.len(),
		without_metrics = runs.iter().filter(|run| run.metrics.is_empty()).count(),
		"Collected all policy runs"
	);

	let table = aggregate::aggregate(runs, &config.timing)?;
	let comparison = compare::compare(&table, &config.baseline)?;

	Ok(Analysis { table, comparison })
}

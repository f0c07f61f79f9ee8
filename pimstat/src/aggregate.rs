//! Metrics aggregation

// Imports
use {
	crate::{
		config::TimingConfig,
		parser::TOTAL_CYCLES,
		table::{MetricValue, MetricsTable, PolicyRun, Row},
	},
	itertools::Itertools,
	pimstat_util::FiniteF64,
	std::collections::BTreeMap,
};

/// Derived column for the total time (in nanoseconds)
pub const TOTAL_TIME_NS: &str = "total_time_ns";

/// Derived column for the total time (in seconds)
pub const TOTAL_TIME_SECONDS: &str = "total_time_seconds";

/// Derived column for the throughput (in tokens per second)
pub const THROUGHPUT_TOKENS_PER_SEC: &str = "throughput_tokens_per_sec";

/// All derived columns, in the order they're appended to the table
pub const DERIVED_COLUMNS: [&str; 3] = [TOTAL_TIME_NS, TOTAL_TIME_SECONDS, THROUGHPUT_TOKENS_PER_SEC];

/// Aggregates all runs into a table, adding derived metrics.
///
/// Raw metric columns come first, sorted, followed by any derived columns.
///
/// # Errors
/// Returns an error if any policy is duplicated.
pub fn aggregate(runs: Vec<PolicyRun>, timing: &TimingConfig) -> Result<MetricsTable, anyhow::Error> {
	let raw_columns = runs
		.iter()
		.map(|run| run.metrics.keys())
		.kmerge()
		.dedup()
		.cloned()
		.collect::<Vec<_>>();

	let rows = runs
		.into_iter()
		.map(|run| {
			let mut values = run
				.metrics
				.into_iter()
				.map(|(name, value)| (name, MetricValue::Int(value)))
				.collect::<BTreeMap<_, _>>();

			let derived = self::derive(&run.policy, &values, timing);
			values.extend(derived.into_iter().map(|(name, value)| (name.to_owned(), MetricValue::Float(value))));

			Row {
				policy: run.policy,
				values,
			}
		})
		.collect::<Vec<_>>();

	let derived_columns = DERIVED_COLUMNS
		.into_iter()
		.filter(|column| rows.iter().any(|row| row.values.contains_key(*column)))
		.map(str::to_owned);

	let columns = raw_columns.into_iter().chain(derived_columns).collect();
	MetricsTable::new(columns, rows)
}

/// Derives all metrics possible from a row's raw values
fn derive(policy: &str, values: &BTreeMap<String, MetricValue>, timing: &TimingConfig) -> Vec<(&'static str, f64)> {
	let Some(total_cycles) = values.get(TOTAL_CYCLES) else {
		return vec![];
	};

	let mut derived = vec![];
	let Some(total_time_ns) = (total_cycles.as_f64() * timing.cycle_period_ns).finite() else {
		tracing::warn!(policy, ?total_cycles, "Total time is not finite, skipping derived metrics");
		return derived;
	};
	derived.push((TOTAL_TIME_NS, total_time_ns));

	let total_time_seconds = total_time_ns / 1e9;
	derived.push((TOTAL_TIME_SECONDS, total_time_seconds));

	if total_time_seconds == 0.0 {
		tracing::warn!(policy, "Total time is zero, skipping throughput");
		return derived;
	}
	match (timing.workload_token_count as f64 / total_time_seconds).finite() {
		Some(throughput) => derived.push((THROUGHPUT_TOKENS_PER_SEC, throughput)),
		None => tracing::warn!(policy, total_time_seconds, "Throughput is not finite, skipping it"),
	}

	derived
}

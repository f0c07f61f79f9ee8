//! Comparison against a baseline policy

// Imports
use crate::{
	parser::{TOTAL_CONFLICTS, TOTAL_CYCLES},
	table::{MetricsTable, Row},
};

/// Comparison of all policies against a baseline
#[derive(PartialEq, Clone, Debug)]
pub struct Comparison {
	/// Baseline policy
	pub baseline: String,

	/// Entries, in table order.
	///
	/// Policies without any comparable metric are omitted.
	pub entries: Vec<ComparisonEntry>,
}

impl Comparison {
	/// Returns the entry for `policy`
	pub fn entry(&self, policy: &str) -> Option<&ComparisonEntry> {
		self.entries.iter().find(|entry| entry.policy == policy)
	}
}

/// Comparison of a single policy against the baseline
#[derive(PartialEq, Clone, Debug)]
pub struct ComparisonEntry {
	/// Policy
	pub policy: String,

	/// Cycle improvement (in %).
	///
	/// Positive when the policy took fewer cycles.
	pub cycle_improvement_pct: Option<f64>,

	/// Conflict reduction (in %).
	///
	/// Positive when the policy had fewer conflicts. Not clamped, so a policy
	/// with more conflicts than the baseline has a negative reduction.
	pub conflict_reduction_pct: Option<f64>,
}

/// Compares all policies in `table` against `baseline`.
///
/// Returns `None` if the baseline has no metrics at all.
///
/// # Errors
/// Returns an error if `baseline` isn't in the table.
pub fn compare(table: &MetricsTable, baseline: &str) -> Result<Option<Comparison>, anyhow::Error> {
	let Some(baseline_row) = table.row(baseline) else {
		anyhow::bail!("Baseline policy {baseline:?} is not in the table");
	};

	if baseline_row.is_empty() {
		tracing::warn!(baseline, "Baseline has no metrics, skipping comparison");
		return Ok(None);
	}

	let baseline_cycles = match self::int_metric(baseline_row, TOTAL_CYCLES) {
		Some(0) => {
			tracing::warn!(baseline, "Baseline has zero cycles, skipping cycle improvements");
			None
		},
		Some(cycles) => Some(cycles),
		None => {
			tracing::warn!(baseline, "Baseline has no cycles, skipping cycle improvements");
			None
		},
	};

	let baseline_conflicts = self::int_metric(baseline_row, TOTAL_CONFLICTS);
	if baseline_conflicts.is_none() {
		tracing::warn!(baseline, "Baseline has no conflicts, skipping conflict reductions");
	}

	let entries = table
		.rows()
		.iter()
		.filter(|row| row.policy != baseline)
		.filter_map(|row| {
			let cycle_improvement_pct = baseline_cycles
				.zip(self::int_metric(row, TOTAL_CYCLES))
				.map(|(baseline_cycles, cycles)| self::cycle_improvement_pct(baseline_cycles, cycles));
			let conflict_reduction_pct = baseline_conflicts
				.zip(self::int_metric(row, TOTAL_CONFLICTS))
				.map(|(baseline_conflicts, conflicts)| self::conflict_reduction_pct(baseline_conflicts, conflicts));

			if cycle_improvement_pct.is_none() && conflict_reduction_pct.is_none() {
				tracing::debug!(policy = %row.policy, "Policy has no comparable metrics, skipping it");
				return None;
			}

			Some(ComparisonEntry {
				policy: row.policy.clone(),
				cycle_improvement_pct,
				conflict_reduction_pct,
			})
		})
		.collect();

	Ok(Some(Comparison {
		baseline: baseline.to_owned(),
		entries,
	}))
}

/// Returns the cycle improvement of `cycles` over `baseline_cycles` (in %).
///
/// `baseline_cycles` must be non-zero.
pub fn cycle_improvement_pct(baseline_cycles: u64, cycles: u64) -> f64 {
	(baseline_cycles as f64 - cycles as f64) / baseline_cycles as f64 * 100.0
}

/// Returns the conflict reduction of `conflicts` over `baseline_conflicts` (in %).
///
/// Returns `0` if `baseline_conflicts` is zero.
pub fn conflict_reduction_pct(baseline_conflicts: u64, conflicts: u64) -> f64 {
	match baseline_conflicts {
		0 => 0.0,
		_ => (baseline_conflicts as f64 - conflicts as f64) / baseline_conflicts as f64 * 100.0,
	}
}

/// Returns an integer metric from a row
fn int_metric(row: &Row, name: &str) -> Option<u64> {
	row.get(name)?.as_u64()
}

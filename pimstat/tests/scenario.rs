//! End-to-end analysis of a results directory

// Imports
use {
	pimstat::{
		parser::{TOTAL_CONFLICTS, TOTAL_CYCLES},
		report,
		Config,
		MetricValue,
		RegexParser,
	},
	std::{fs, path::Path},
};

/// Writes `log` as `policy`'s simulation log
fn write_log(results_dir: &Path, policy: &str, log: &str) {
	fs::create_dir_all(results_dir.join(policy)).unwrap();
	fs::write(results_dir.join(policy).join("simulation_output.log"), log).unwrap();
}

fn config(results_dir: &Path) -> Config {
	Config {
		results_dir: results_dir.to_owned(),
		policies: ["baseline", "A", "B"].map(str::to_owned).into(),
		baseline: "baseline".to_owned(),
		..Config::default()
	}
}

#[test]
fn baseline_with_one_missing_policy() {
	let dir = tempfile::tempdir().unwrap();
	write_log(
		dir.path(),
		"baseline",
		"\
Simulation finished
  memory_system_cycles: 8019650
KV Cache Policy Statistics:
  total_allocations: 512
  total_conflicts: 4

Bank Conflict Statistics:
  weight_kv_conflicts: 3
  kv_weight_conflicts: 1
",
	);
	write_log(dir.path(), "A", "total_cycles: 5854003\ntotal_conflicts: 256\n");

	let analysis = pimstat::analyze(&config(dir.path()), &RegexParser::new()).unwrap();

	// Table
	let table = &analysis.table;
	assert_eq!(
		table.rows().iter().map(|row| row.policy.as_str()).collect::<Vec<_>>(),
		["baseline", "A", "B"]
	);
	assert!(table.row("B").unwrap().is_empty());
	let baseline = table.row("baseline").unwrap();
	assert_eq!(baseline.get(TOTAL_CYCLES), Some(MetricValue::Int(8019650)));
	assert_eq!(baseline.get(TOTAL_CONFLICTS), Some(MetricValue::Int(4)));
	assert_eq!(baseline.get("kv_total_allocations"), Some(MetricValue::Int(512)));
	assert_eq!(baseline.get("conflict_kv_weight_conflicts"), Some(MetricValue::Int(1)));

	// Comparison
	let comparison = analysis.comparison.as_ref().unwrap();
	assert_eq!(comparison.entries.len(), 1);
	let a = comparison.entry("A").unwrap();
	let cycle_improvement_pct = a.cycle_improvement_pct.unwrap();
	assert!((cycle_improvement_pct - 27.0).abs() < 0.05, "{cycle_improvement_pct}");
	assert_eq!(a.conflict_reduction_pct, Some(-6300.0));
	assert!(comparison.entry("B").is_none());

	// Export
	let output_path = dir.path().join("comparison_results.csv");
	report::write_csv(table, &output_path).unwrap();
	assert_eq!(&report::read_csv(&output_path).unwrap(), table);

	// Summary
	let mut summary = vec![];
	report::write_summary(&mut summary, table, analysis.comparison.as_ref()).unwrap();
	let summary = String::from_utf8(summary).unwrap();
	assert!(summary.contains("A:\n  Cycle reduction: 27.00%\n  Conflict reduction: -6300.00%\n"), "{summary}");
	assert!(!summary.contains("B:"), "{summary}");
}

#[test]
fn missing_baseline_log_skips_comparison() {
	let dir = tempfile::tempdir().unwrap();
	write_log(dir.path(), "A", "total_cycles: 100\n");

	let analysis = pimstat::analyze(&config(dir.path()), &RegexParser::new()).unwrap();
	assert_eq!(analysis.table.rows().len(), 3);
	assert!(analysis.comparison.is_none());
}

#[test]
fn baseline_outside_policies_is_fatal() {
	let dir = tempfile::tempdir().unwrap();
	let config = Config {
		baseline: "naive".to_owned(),
		..config(dir.path())
	};

	assert!(pimstat::analyze(&config, &RegexParser::new()).is_err());
}

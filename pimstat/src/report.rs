//! Reports.
//!
//! Exports the metrics table as csv, and writes the human-readable summary.

// Imports
use {
	crate::{
		compare::Comparison,
		table::{MetricValue, MetricsTable, Row},
	},
	anyhow::Context,
	itertools::Itertools,
	std::{collections::BTreeMap, io, path::Path},
};

/// Policy column name
pub const POLICY_COLUMN: &str = "policy";

/// Placeholder for absent values in the summary
const ABSENT: &str = "-";

/// Writes `table` as csv to `path`.
///
/// The first column is the policy, followed by all of the table's columns.
/// Absent values are written as empty fields.
pub fn write_csv(table: &MetricsTable, path: &Path) -> Result<(), anyhow::Error> {
	let mut writer = csv::Writer::from_path(path).with_context(|| format!("Unable to create output file {path:?}"))?;

	writer
		.write_record(std::iter::once(POLICY_COLUMN).chain(table.columns().iter().map(String::as_str)))
		.context("Unable to write header")?;

	for row in table.rows() {
		let values = table
			.columns()
			.iter()
			.map(|column| row.get(column).map(|value| value.to_string()).unwrap_or_default());
		writer
			.write_record(std::iter::once(row.policy.clone()).chain(values))
			.with_context(|| format!("Unable to write row for policy {:?}", row.policy))?;
	}

	writer.flush().context("Unable to flush output file")?;

	Ok(())
}

/// Reads a table written by [`write_csv`] from `path`.
pub fn read_csv(path: &Path) -> Result<MetricsTable, anyhow::Error> {
	let mut reader = csv::Reader::from_path(path).with_context(|| format!("Unable to open {path:?}"))?;

	let mut columns = reader
		.headers()
		.context("Unable to read header")?
		.iter()
		.map(str::to_owned)
		.collect::<Vec<_>>();
	anyhow::ensure!(
		columns.first().map(String::as_str) == Some(POLICY_COLUMN),
		"Expected first column to be {POLICY_COLUMN:?}, found {:?}",
		columns.first()
	);
	columns.remove(0);

	let rows = reader
		.records()
		.enumerate()
		.map(|(record_idx, record)| -> Result<Row, anyhow::Error> {
			let record = record.with_context(|| format!("Unable to read record #{record_idx}"))?;
			let mut fields = record.iter();
			let policy = fields
				.next()
				.with_context(|| format!("Record #{record_idx} has no policy"))?
				.to_owned();

			let values = columns
				.iter()
				.zip(fields)
				.filter(|(_, field)| !field.is_empty())
				.map(|(column, field)| -> Result<(String, MetricValue), anyhow::Error> {
					let value = MetricValue::parse(field)
						.with_context(|| format!("Unable to parse {column:?} for policy {policy:?}"))?;
					Ok((column.clone(), value))
				})
				.collect::<Result<BTreeMap<_, _>, _>>()?;

			Ok(Row { policy, values })
		})
		.collect::<Result<Vec<_>, _>>()?;

	MetricsTable::new(columns, rows).context("Malformed table")
}

/// Writes a human-readable summary of `table` and `comparison` to `out`
pub fn write_summary<W: io::Write>(
	out: &mut W,
	table: &MetricsTable,
	comparison: Option<&Comparison>,
) -> Result<(), io::Error> {
	writeln!(out, "=== Summary ===")?;
	self::write_table(out, table)?;

	let Some(comparison) = comparison else {
		return Ok(());
	};

	writeln!(out)?;
	writeln!(out, "=== Improvements vs Baseline ({}) ===", comparison.baseline)?;
	if comparison.entries.is_empty() {
		writeln!(out, "No policies could be compared")?;
	}
	for entry in &comparison.entries {
		writeln!(out, "{}:", entry.policy)?;
		if let Some(pct) = entry.cycle_improvement_pct {
			writeln!(out, "  Cycle reduction: {pct:.2}%")?;
		}
		if let Some(pct) = entry.conflict_reduction_pct {
			writeln!(out, "  Conflict reduction: {pct:.2}%")?;
		}
	}

	Ok(())
}

/// Writes `table` with aligned columns.
///
/// Policies are left-aligned, values right-aligned.
fn write_table<W: io::Write>(out: &mut W, table: &MetricsTable) -> Result<(), io::Error> {
	let cells = table
		.rows()
		.iter()
		.map(|row| {
			table
				.columns()
				.iter()
				.map(|column| row.get(column).map_or_else(|| ABSENT.to_owned(), |value| value.to_string()))
				.collect::<Vec<_>>()
		})
		.collect::<Vec<_>>();

	let policy_width = table
		.rows()
		.iter()
		.map(|row| row.policy.len())
		.chain([POLICY_COLUMN.len()])
		.max()
		.unwrap_or(0);
	let widths = table
		.columns()
		.iter()
		.enumerate()
		.map(|(column_idx, column)| {
			cells
				.iter()
				.map(|row_cells| row_cells[column_idx].len())
				.chain([column.len()])
				.max()
				.unwrap_or(0)
		})
		.collect::<Vec<_>>();

	writeln!(
		out,
		"{POLICY_COLUMN:<policy_width$}  {}",
		table
			.columns()
			.iter()
			.zip(&widths)
			.format_with("  ", |(column, &width), f| f(&format_args!("{column:>width$}")))
	)?;
	for (row, row_cells) in table.rows().iter().zip(&cells) {
		writeln!(
			out,
			"{:<policy_width$}  {}",
			row.policy,
			row_cells
				.iter()
				.zip(&widths)
				.format_with("  ", |(cell, &width), f| f(&format_args!("{cell:>width$}")))
		)?;
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use {
		super::*,
		crate::{
			aggregate::aggregate,
			compare::ComparisonEntry,
			config::TimingConfig,
			parser::{Metrics, TOTAL_CONFLICTS, TOTAL_CYCLES},
			table::PolicyRun,
		},
		std::fs,
	};

	fn sample_table() -> MetricsTable {
		let run = |policy: &str, metrics: &[(&str, u64)]| PolicyRun {
			policy:  policy.to_owned(),
			metrics: metrics
				.iter()
				.map(|&(name, value)| (name.to_owned(), value))
				.collect::<Metrics>(),
		};

		aggregate(
			vec![
				run("baseline", &[(TOTAL_CYCLES, 8019650), (TOTAL_CONFLICTS, 4), ("kv_hits", 10)]),
				run("A", &[(TOTAL_CYCLES, 5854003), (TOTAL_CONFLICTS, 256)]),
				run("B", &[]),
				run("C", &[(TOTAL_CYCLES, 8000000)]),
			],
			&TimingConfig::default(),
		)
		.unwrap()
	}

	#[test]
	fn csv_round_trip() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("comparison_results.csv");

		let table = sample_table();
		write_csv(&table, &path).unwrap();
		let read = read_csv(&path).unwrap();

		assert_eq!(read, table);
		assert!(read.row("B").unwrap().is_empty());
		assert_eq!(read.row("C").unwrap().get(TOTAL_CONFLICTS), None);
		assert_eq!(
			read.row("C").unwrap().get("total_time_ns"),
			Some(MetricValue::Float(10000000.0))
		);
	}

	#[test]
	fn csv_layout() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("out.csv");
		write_csv(&sample_table(), &path).unwrap();

		let contents = fs::read_to_string(&path).unwrap();
		let lines = contents.lines().collect::<Vec<_>>();
		assert_eq!(
			lines[0],
			"policy,kv_hits,total_conflicts,total_cycles,total_time_ns,total_time_seconds,throughput_tokens_per_sec"
		);
		assert!(lines[1].starts_with("baseline,10,4,8019650,10024562.5,0.0100245625,"));
		assert_eq!(lines[3], "B,,,,,,");
		assert_eq!(lines.len(), 5);
	}

	#[test]
	fn read_csv_requires_policy_column() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("bad.csv");
		fs::write(&path, "name,total_cycles\na,1\n").unwrap();

		assert!(read_csv(&path).is_err());
	}

	#[test]
	fn summary_contains_table_and_comparison() {
		let table = sample_table();
		let comparison = Comparison {
			baseline: "baseline".to_owned(),
			entries:  vec![
				ComparisonEntry {
					policy:                 "A".to_owned(),
					cycle_improvement_pct:  Some(27.004258),
					conflict_reduction_pct: Some(-6300.0),
				},
				ComparisonEntry {
					policy:                 "C".to_owned(),
					cycle_improvement_pct:  Some(0.2449),
					conflict_reduction_pct: None,
				},
			],
		};

		let mut out = vec![];
		write_summary(&mut out, &table, Some(&comparison)).unwrap();
		let out = String::from_utf8(out).unwrap();

		assert!(out.starts_with("=== Summary ===\npolicy    kv_hits"), "{out}");
		assert!(out.contains("\nB       "), "{out}");
		assert!(out.contains("A:\n  Cycle reduction: 27.00%\n  Conflict reduction: -6300.00%\n"), "{out}");
		assert!(out.contains("C:\n  Cycle reduction: 0.24%\n"), "{out}");
		assert!(!out.contains("C:\n  Cycle reduction: 0.24%\n  Conflict"), "{out}");
	}

	#[test]
	fn summary_without_comparison() {
		let mut out = vec![];
		write_summary(&mut out, &sample_table(), None).unwrap();
		let out = String::from_utf8(out).unwrap();

		assert_eq!(out.lines().count(), 6);
		assert!(!out.contains("Improvements"));
	}
}

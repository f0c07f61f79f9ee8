//! Metrics table

// Imports
use {
	crate::parser::Metrics,
	std::{collections::BTreeMap, fmt},
};

/// A single policy run
#[derive(Clone, Debug)]
pub struct PolicyRun {
	/// Policy name
	pub policy: String,

	/// Metrics reported by the run's log.
	///
	/// Empty if the log was missing.
	pub metrics: Metrics,
}

impl PolicyRun {
	/// Creates an empty run for `policy`
	pub fn empty(policy: impl Into<String>) -> Self {
		Self {
			policy:  policy.into(),
			metrics: Metrics::new(),
		}
	}
}

/// Metric value
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum MetricValue {
	/// Raw metric, as reported by the simulator
	Int(u64),

	/// Derived metric
	Float(f64),
}

impl MetricValue {
	/// Returns this value as a float
	pub fn as_f64(self) -> f64 {
		match self {
			Self::Int(value) => value as f64,
			Self::Float(value) => value,
		}
	}

	/// Returns this value as an integer, if it is one
	pub fn as_u64(self) -> Option<u64> {
		match self {
			Self::Int(value) => Some(value),
			Self::Float(_) => None,
		}
	}

	/// Parses a value written by the [`Display`](fmt::Display) impl.
	pub fn parse(s: &str) -> Result<Self, anyhow::Error> {
		// Note: Floats are always displayed with a decimal point
		if s.contains('.') {
			s.parse()
				.map(Self::Float)
				.map_err(|err| anyhow::anyhow!("Unable to parse float {s:?}: {err}"))
		} else {
			s.parse()
				.map(Self::Int)
				.map_err(|err| anyhow::anyhow!("Unable to parse integer {s:?}: {err}"))
		}
	}
}

impl fmt::Display for MetricValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match *self {
			Self::Int(value) => write!(f, "{value}"),
			Self::Float(value) => {
				// Note: `f64`'s display never uses an exponent, but omits the
				//       decimal point on whole numbers, which would read back as an integer.
				let s = value.to_string();
				if s.contains('.') || !value.is_finite() {
					f.write_str(&s)
				} else {
					write!(f, "{s}.0")
				}
			},
		}
	}
}

/// Table row
#[derive(PartialEq, Clone, Debug)]
pub struct Row {
	/// Policy name
	pub policy: String,

	/// All values, by column
	pub values: BTreeMap<String, MetricValue>,
}

impl Row {
	/// Returns the value of `column`, if present
	pub fn get(&self, column: &str) -> Option<MetricValue> {
		self.values.get(column).copied()
	}

	/// Returns if this row has no values
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

/// Metrics table.
///
/// Rows are in policy registration order, and the column set is the
/// union of all values across all rows.
#[derive(PartialEq, Clone, Debug)]
pub struct MetricsTable {
	/// Columns
	columns: Vec<String>,

	/// Rows
	rows: Vec<Row>,
}

impl MetricsTable {
	/// Creates a table from it's columns and rows.
	///
	/// # Errors
	/// Returns an error if any policy is duplicated, or if any row has a value outside of `columns`.
	pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Result<Self, anyhow::Error> {
		for (idx, row) in rows.iter().enumerate() {
			anyhow::ensure!(
				!rows[..idx].iter().any(|other| other.policy == row.policy),
				"Duplicate policy {:?}",
				row.policy
			);

			if let Some(column) = row.values.keys().find(|column| !columns.contains(column)) {
				anyhow::bail!("Policy {:?} has value for unknown column {column:?}", row.policy);
			}
		}

		Ok(Self { columns, rows })
	}

	/// Returns all columns
	pub fn columns(&self) -> &[String] {
		&self.columns
	}

	/// Returns all rows
	pub fn rows(&self) -> &[Row] {
		&self.rows
	}

	/// Returns the row for `policy`
	pub fn row(&self, policy: &str) -> Option<&Row> {
		self.rows.iter().find(|row| row.policy == policy)
	}
}

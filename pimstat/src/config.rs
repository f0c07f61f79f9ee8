//! Configuration

// Imports
use {
	itertools::Itertools,
	std::path::{Path, PathBuf},
};

/// Configuration
#[derive(Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
	/// Results directory.
	///
	/// Each policy's log lives in `<results_dir>/<policy>/<log_file_name>`.
	pub results_dir: PathBuf,

	/// Log file name within each policy's directory
	pub log_file_name: String,

	/// Output file name within the results directory
	pub output_file_name: String,

	/// Policies to compare, in order
	pub policies: Vec<String>,

	/// Baseline policy
	pub baseline: String,

	/// Timing configuration
	pub timing: TimingConfig,

	/// Whether to parse each policy's log in parallel
	pub parallel: bool,
}

impl Config {
	/// Returns the log path for `policy`
	pub fn log_path(&self, policy: &str) -> PathBuf {
		self.results_dir.join(policy).join(&self.log_file_name)
	}

	/// Returns the output path
	pub fn output_path(&self) -> PathBuf {
		self.results_dir.join(&self.output_file_name)
	}

	/// Validates this configuration.
	///
	/// # Errors
	/// Returns an error if the policies or the baseline are malformed, or if the timing
	/// constants can't be used to derive times.
	pub fn validate(&self) -> Result<(), anyhow::Error> {
		anyhow::ensure!(!self.policies.is_empty(), "No policies configured");

		if let Some(policy) = self.policies.iter().find(|policy| !self::is_valid_policy_name(policy)) {
			anyhow::bail!("Invalid policy name {policy:?}");
		}

		let duplicates = self.policies.iter().duplicates().collect::<Vec<_>>();
		anyhow::ensure!(duplicates.is_empty(), "Duplicate policies: {duplicates:?}");

		anyhow::ensure!(
			self.policies.contains(&self.baseline),
			"Baseline policy {:?} is not among the configured policies {:?}",
			self.baseline,
			self.policies
		);

		self.timing.validate()
	}
}

impl Default for Config {
	fn default() -> Self {
		Self {
			results_dir:      PathBuf::from("exp_results/kv_cache_evaluation"),
			log_file_name:    "simulation_output.log".to_owned(),
			output_file_name: "comparison_results.csv".to_owned(),
			policies:         ["baseline", "bank_partitioning", "contention_aware"]
				.map(str::to_owned)
				.into(),
			baseline:         "baseline".to_owned(),
			timing:           TimingConfig::default(),
			parallel:         true,
		}
	}
}

/// Timing configuration, used to derive times from cycles
#[derive(Clone, Copy, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TimingConfig {
	/// Memory clock period (in nanoseconds)
	pub cycle_period_ns: f64,

	/// Tokens processed by the benchmark workload
	pub workload_token_count: u64,
}

impl TimingConfig {
	/// Validates this configuration
	pub fn validate(&self) -> Result<(), anyhow::Error> {
		anyhow::ensure!(
			self.cycle_period_ns.is_finite() && self.cycle_period_ns > 0.0,
			"Cycle period must be positive and finite, found {}",
			self.cycle_period_ns
		);

		Ok(())
	}
}

impl Default for TimingConfig {
	fn default() -> Self {
		// Note: HBM3's `tCK`
		Self {
			cycle_period_ns:      1.25,
			workload_token_count: 512,
		}
	}
}

/// Returns if `policy` may be used as a single path component
fn is_valid_policy_name(policy: &str) -> bool {
	let mut components = Path::new(policy).components();
	!policy.is_empty() &&
		matches!(components.next(), Some(std::path::Component::Normal(_))) &&
		components.next().is_none()
}

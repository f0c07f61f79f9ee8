//! Policy run collection

// Imports
use {
	crate::{
		parser::{Metrics, MetricsParser},
		table::PolicyRun,
	},
	itertools::Itertools,
	pimstat_util::DisplayWrapper,
	rayon::prelude::*,
	std::{fs, path::PathBuf},
};

/// Policy run collector
pub struct Collector<'a, P, L> {
	/// Parser
	parser: &'a P,

	/// Log path resolver
	log_path: L,

	/// Whether to collect in parallel
	parallel: bool,
}

impl<'a, P, L> Collector<'a, P, L>
where
	P: MetricsParser,
	L: Fn(&str) -> PathBuf + Sync,
{
	/// Creates a new collector.
	///
	/// `log_path` resolves each policy to it's log file.
	pub fn new(parser: &'a P, log_path: L, parallel: bool) -> Self {
		Self {
			parser,
			log_path,
			parallel,
		}
	}

	/// Collects a run for each policy, in the same order.
	///
	/// Policies whose log can't be read get an empty run.
	pub fn collect<S: AsRef<str> + Sync>(&self, policies: &[S]) -> Vec<PolicyRun> {
		match self.parallel {
			true => policies.par_iter().map(|policy| self.collect_one(policy.as_ref())).collect(),
			false => policies.iter().map(|policy| self.collect_one(policy.as_ref())).collect(),
		}
	}

	/// Collects a single policy's run
	fn collect_one(&self, policy: &str) -> PolicyRun {
		let log_path = (self.log_path)(policy);
		let text = match fs::read_to_string(&log_path) {
			Ok(text) => text,
			Err(err) => {
				tracing::warn!(policy, ?log_path, %err, "Unable to read log, policy will have no metrics");
				return PolicyRun::empty(policy);
			},
		};

		let metrics = self.parser.parse(&text);
		tracing::debug!(
			policy,
			?log_path,
			"Parsed metrics: {}",
			DisplayWrapper::new(|f| self::fmt_metrics(f, &metrics))
		);

		PolicyRun {
			policy: policy.to_owned(),
			metrics,
		}
	}
}

/// Formats metrics as `name=value` pairs
fn fmt_metrics(f: &mut std::fmt::Formatter<'_>, metrics: &Metrics) -> std::fmt::Result {
	match metrics.is_empty() {
		true => f.write_str("<none>"),
		false => write!(
			f,
			"{}",
			metrics.iter().format_with(", ", |(name, value), f| f(&format_args!("{name}={value}")))
		),
	}
}

#[cfg(test)]
mod tests {
	use {
		super::*,
		crate::parser::{RegexParser, TOTAL_CYCLES},
	};

	#[test]
	fn missing_logs_yield_empty_runs_in_order() {
		let dir = tempfile::tempdir().unwrap();
		for (policy, cycles) in [("baseline", 100), ("b", 80)] {
			fs::create_dir(dir.path().join(policy)).unwrap();
			fs::write(
				dir.path().join(policy).join("simulation_output.log"),
				format!("total_cycles: {cycles}\n"),
			)
			.unwrap();
		}

		let parser = RegexParser::new();
		for parallel in [false, true] {
			let collector = Collector::new(
				&parser,
				|policy: &str| dir.path().join(policy).join("simulation_output.log"),
				parallel,
			);
			let runs = collector.collect(&["baseline", "a", "b"]);

			assert_eq!(
				runs.iter().map(|run| run.policy.as_str()).collect::<Vec<_>>(),
				["baseline", "a", "b"]
			);
			assert_eq!(runs[0].metrics.get(TOTAL_CYCLES), Some(&100));
			assert!(runs[1].metrics.is_empty());
			assert_eq!(runs[2].metrics.get(TOTAL_CYCLES), Some(&80));
		}
	}

	#[test]
	fn uses_given_parser() {
		struct Fixed;
		impl MetricsParser for Fixed {
			fn parse(&self, text: &str) -> Metrics {
				[("len".to_owned(), text.len() as u64)].into()
			}
		}

		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("p.log"), "abcd").unwrap();

		let collector = Collector::new(&Fixed, |policy: &str| dir.path().join(format!("{policy}.log")), false);
		let runs = collector.collect(&["p".to_owned()]);
		assert_eq!(runs[0].metrics.get("len"), Some(&4));
	}
}

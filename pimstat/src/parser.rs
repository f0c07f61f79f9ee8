//! Simulator log parsing.
//!
//! Turns the free-text output of a simulator run into a flat map of metrics.

// Imports
use {
	regex::Regex,
	std::{collections::BTreeMap, sync::LazyLock},
};

/// Metrics, by name
pub type Metrics = BTreeMap<String, u64>;

/// Metric name for the total memory system cycles
pub const TOTAL_CYCLES: &str = "total_cycles";

/// Metric name for the total bank conflicts
pub const TOTAL_CONFLICTS: &str = "total_conflicts";

/// Metrics parser
pub trait MetricsParser: Send + Sync {
	/// Parses all metrics out of `text`.
	///
	/// Never fails: anything not recognized is simply not reported.
	fn parse(&self, text: &str) -> Metrics;
}

/// Scalar metric, matched by a single `label: <integer>` pattern
struct Scalar {
	/// Metric name
	name: &'static str,

	/// Pattern, with the value as the first capture
	pattern: Regex,
}

/// Statistics block, a header followed by `name: <integer>` lines until a blank line
struct Block {
	/// Header, including the trailing colon
	header: &'static str,

	/// Prefix for all metrics in this block
	prefix: &'static str,
}

/// Scalar metrics
// Note: The simulator reports its cycle counter as `memory_system_cycles`, but we
//       also accept our own name for it. Whichever comes first wins.
static SCALARS: LazyLock<[Scalar; 2]> = LazyLock::new(|| {
	[
		Scalar {
			name:    TOTAL_CYCLES,
			pattern: Regex::new(r"(?:memory_system_cycles|total_cycles):\s*(\d+)").expect("Invalid regex"),
		},
		Scalar {
			name:    TOTAL_CONFLICTS,
			pattern: Regex::new(r"total_conflicts:\s*(\d+)").expect("Invalid regex"),
		},
	]
});

/// Statistics blocks
const BLOCKS: [Block; 2] = [
	Block {
		header: "KV Cache Policy Statistics:",
		prefix: "kv_",
	},
	Block {
		header: "Bank Conflict Statistics:",
		prefix: "conflict_",
	},
];

/// Pattern for each line within a block
static BLOCK_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\w+):\s*(\d+)").expect("Invalid regex"));

/// Pattern for the end of a block
static BLOCK_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r?\n\r?\n").expect("Invalid regex"));

/// Regex-based metrics parser
#[derive(Clone, Copy, Debug, Default)]
pub struct RegexParser;

impl RegexParser {
	/// Creates a new parser
	pub fn new() -> Self {
		Self
	}
}

impl MetricsParser for RegexParser {
	fn parse(&self, text: &str) -> Metrics {
		let mut metrics = Metrics::new();

		for scalar in SCALARS.iter() {
			let Some(captures) = scalar.pattern.captures(text) else {
				tracing::trace!(name = scalar.name, "Metric not found");
				continue;
			};

			if let Some(value) = self::parse_value(scalar.name, &captures[1]) {
				metrics.insert(scalar.name.to_owned(), value);
			}
		}

		for block in &BLOCKS {
			let Some(body) = self::block_body(text, block.header) else {
				tracing::trace!(header = block.header, "Block not found");
				continue;
			};

			for line in body.lines() {
				let Some(captures) = BLOCK_LINE.captures(line) else {
					continue;
				};

				let name = format!("{}{}", block.prefix, &captures[1]);
				if let Some(value) = self::parse_value(&name, &captures[2]) {
					// Note: Like the scalars, the first occurrence wins
					metrics.entry(name).or_insert(value);
				}
			}
		}

		metrics
	}
}

/// Returns the body of the first block with header `header`.
///
/// The body starts right after the header and ends at the first blank line, or the end of `text`.
fn block_body<'a>(text: &'a str, header: &str) -> Option<&'a str> {
	let start = text.find(header)? + header.len();
	let rest = &text[start..];
	let end = BLOCK_END.find(rest).map_or(rest.len(), |end| end.start());

	Some(&rest[..end])
}

/// Parses a metric value.
///
/// Returns `None` if it doesn't fit
fn parse_value(name: &str, value: &str) -> Option<u64> {
	match value.parse() {
		Ok(value) => Some(value),
		Err(err) => {
			tracing::warn!(name, value, %err, "Ignoring metric with unrepresentable value");
			None
		},
	}
}

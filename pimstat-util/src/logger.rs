//! Logger

// Imports
use {
	std::{fs, io, path::Path, sync::Mutex},
	tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer},
};

/// Initializes the logger.
///
/// Logs to stderr, filtered by `RUST_LOG` (`info` by default).
/// If `log_file` is passed, also logs to it, filtered by `RUST_LOG_FILE` (`debug` by default).
///
/// Any messages buffered through [`pre_init`] are emitted once the logger is installed.
pub fn init(log_file: Option<&Path>, log_file_append: bool) {
	let term_layer = fmt::layer()
		.with_writer(io::stderr)
		.with_filter(self::env_filter("RUST_LOG", "info"));

	let file_layer = log_file.and_then(|log_file| {
		let file = fs::OpenOptions::new()
			.create(true)
			.write(true)
			.append(log_file_append)
			.truncate(!log_file_append)
			.open(log_file);

		match file {
			Ok(file) => Some(
				fmt::layer()
					.with_ansi(false)
					.with_writer(Mutex::new(file))
					.with_filter(self::env_filter("RUST_LOG_FILE", "debug")),
			),
			// Note: We can't log this yet, there's no logger
			Err(err) => {
				eprintln!("Unable to open log file {log_file:?}: {err}");
				None
			},
		}
	});

	if let Err(err) = tracing_subscriber::registry()
		.with(term_layer)
		.with(file_layer)
		.try_init()
	{
		eprintln!("Unable to initialize logger: {err}");
	}

	pre_init::flush();
}

/// Creates an env filter from `var`, or `default` if unset / invalid
fn env_filter(var: &str, default: &str) -> EnvFilter {
	EnvFilter::try_from_env(var).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Logging before the logger is initialized.
///
/// Messages are buffered and emitted by [`init`](super::init).
pub mod pre_init {
	// Imports
	use std::sync::{Mutex, PoisonError};

	/// Buffered debug messages
	static DEBUG_MESSAGES: Mutex<Vec<String>> = Mutex::new(Vec::new());

	/// Buffers a debug message
	pub fn debug(message: impl Into<String>) {
		DEBUG_MESSAGES
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.push(message.into());
	}

	/// Emits all buffered messages
	pub(super) fn flush() {
		let messages = std::mem::take(&mut *DEBUG_MESSAGES.lock().unwrap_or_else(PoisonError::into_inner));
		for message in messages {
			tracing::debug!("{message}");
		}
	}

}

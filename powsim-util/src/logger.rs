//! Logger
//!
//! Logs to `stderr`, filtered by `RUST_LOG` (defaults to `info`), and optionally
//! to a file, filtered by `RUST_LOG_FILE` (defaults to `debug`).

// Imports
use {
	std::{
		fs,
		io,
		path::Path,
		sync::{
			atomic::{self, AtomicBool},
			Mutex,
		},
	},
	tracing_subscriber::{prelude::*, EnvFilter},
};

/// Whether the logger was already initialized
static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initializes the logger.
///
/// Any messages logged through [`pre_init`] are emitted right after.
///
/// # Panics
/// Panics if called more than once.
pub fn init(log_file: Option<&Path>, log_file_append: bool) {
	assert!(
		!INITIALIZED.swap(true, atomic::Ordering::AcqRel),
		"Logger was already initialized"
	);

	// Create the stderr layer
	let stderr_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	let stderr_layer = tracing_subscriber::fmt::layer()
		.with_writer(io::stderr)
		.with_filter(stderr_filter);

	// Then the file layer, if we got a file
	let mut file_err = None;
	let file_layer = log_file.and_then(|log_file| {
		let file = fs::OpenOptions::new()
			.create(true)
			.write(true)
			.append(log_file_append)
			.truncate(!log_file_append)
			.open(log_file);

		match file {
			Ok(file) => {
				let file_filter =
					EnvFilter::try_from_env("RUST_LOG_FILE").unwrap_or_else(|_| EnvFilter::new("debug"));
				let layer = tracing_subscriber::fmt::layer()
					.with_ansi(false)
					.with_writer(Mutex::new(file))
					.with_filter(file_filter);
				Some(layer)
			},
			Err(err) => {
				file_err = Some((log_file.to_path_buf(), err));
				None
			},
		}
	});

	tracing_subscriber::registry()
		.with(stderr_layer)
		.with(file_layer)
		.init();

	if let Some((log_file, err)) = file_err {
		tracing::warn!(?log_file, ?err, "Unable to open log file, logging only to stderr");
	}

	// Finally flush everything logged before we were initialized
	pre_init::flush();
}

/// Logging before the logger is initialized
pub mod pre_init {
	// Imports
	use std::sync::Mutex;

	/// Debug messages logged before initialization
	static MESSAGES: Mutex<Vec<String>> = Mutex::new(Vec::new());

	/// Logs a debug message once the logger is initialized
	pub fn debug(msg: impl Into<String>) {
		// Note: A poisoned lock only means another thread panicked mid-push, the
		//       vector itself is still fine.
		MESSAGES.lock().unwrap_or_else(|err| err.into_inner()).push(msg.into());
	}

	/// Emits all buffered messages
	pub(super) fn flush() {
		let messages = std::mem::take(&mut *MESSAGES.lock().unwrap_or_else(|err| err.into_inner()));
		for msg in messages {
			tracing::debug!("{msg}");
		}
	}
}

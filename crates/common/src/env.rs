//! Environment helpers used before configuration is resolved.

use std::path::PathBuf;

/// Load `.env` from the working directory or its parents if present.
///
/// Runs before the subscriber exists (so `RUST_LOG` can come from `.env`);
/// the caller logs the returned path once logging is up.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

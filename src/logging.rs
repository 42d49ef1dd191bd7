use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Install a file-backed subscriber when `RUST_LOG` is set.
///
/// The terminal belongs to the UI, so nothing is ever logged to stdout or
/// stderr.
pub fn init(log_file: &Path) -> std::io::Result<()> {
    let Ok(filter) = EnvFilter::try_from_default_env() else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;
    // A subscriber set elsewhere (tests) wins.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

//! Logging setup for the solver
//!
//! Uses the `log` facade with an `env_logger` backend.
//!
//! - `info!` - Solve start and finish
//! - `debug!` - Branch decisions and worker lifecycle
//! - `trace!` - Individual oracle evaluations
//!
//! `RUST_LOG` takes precedence over the level passed in by the binary:
//!
//! ```bash
//! RUST_LOG=debug superstring puzzle.SWE
//! RUST_LOG=superstring::search::parallel=debug superstring puzzle.SWE --algorithm parallel
//! ```

use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging from `RUST_LOG`, falling back to `default_level`.
///
/// Only the first call has any effect.
pub fn init_from_env_or(default_level: LevelFilter) {
    INIT.call_once(|| {
        let env = Env::default().default_filter_or(default_level.as_str());
        let _ = Builder::from_env(env)
            .format(|buf, record| {
                writeln!(
                    buf,
                    "[{:5}] {} - {}",
                    record.level(),
                    record.target(),
                    record.args()
                )
            })
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_runs_once() {
        init_from_env_or(LevelFilter::Info);
        assert!(INIT.is_completed());

        // Later calls are no-ops rather than panics
        init_from_env_or(LevelFilter::Debug);
        log::debug!("logging initialized");
        assert!(INIT.is_completed());
    }
}

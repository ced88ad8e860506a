//! Cross-crate integration scenarios.

pub mod archive_flows;
pub mod storage_flows;
pub mod tamper;

use forest_telemetry::{init_logging, TelemetryConfig};
use std::sync::Once;

static LOGGING: Once = Once::new();

/// Route test logs through the same subscriber binaries use.
///
/// Silent unless `FOREST_LOG_LEVEL` or `RUST_LOG` asks for output.
pub fn init_test_logging() {
    LOGGING.call_once(|| {
        let config = TelemetryConfig::from_env();
        let config = if std::env::var_os("FOREST_LOG_LEVEL").is_none()
            && std::env::var_os("RUST_LOG").is_none()
        {
            config.with_log_level("off")
        } else {
            config
        };
        // a subscriber installed by the harness is fine too
        let _ = init_logging(&config);
    });
}

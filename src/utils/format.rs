//! Label formatting

use std::time::Duration;

/// Format elapsed time as a zero-padded `MM:SS` label.
///
/// The minute field only has two digits, so anything at or beyond 100
/// minutes wraps around (`100:05` shows as `00:05`).
pub fn format_elapsed(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs();
    format!("{:02}:{:02}", (seconds / 60) % 100, seconds % 60)
}

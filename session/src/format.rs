//! Presentation helpers for positions and durations.

use crate::SessionSnapshot;

/// Format a whole number of seconds as `m:ss`.
///
/// Hours wrap: only the minutes within the current hour are shown.
///
/// ```
/// use playkit_session::format_duration;
///
/// assert_eq!(format_duration(125), "2:05");
/// assert_eq!(format_duration(59), "0:59");
/// ```
#[must_use]
pub fn format_duration(total_secs: u64) -> String {
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{minutes}:{seconds:02}")
}

/// Format a snapshot as `position / duration`.
#[must_use]
pub fn format_progress(snapshot: &SessionSnapshot) -> String {
    format!(
        "{} / {}",
        format_duration(snapshot.position_secs),
        format_duration(snapshot.duration_secs)
    )
}

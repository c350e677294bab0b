//! Console output formatting with colored display

use std::fmt::Write as _;

use owo_colors::OwoColorize;

use crate::music::Track;
use crate::session::SessionReport;

/// Format the "now playing" line shown before the game starts.
pub fn format_now_playing(track: &Track) -> String {
    if track.artist.is_empty() {
        format!("Now playing: {}", track.title.bold())
    } else {
        format!(
            "Now playing: {} by {}",
            track.title.bold(),
            track.artist.cyan()
        )
    }
}

/// Format the final score report printed after the terminal is restored.
///
/// Returns a multi-line string with a boxed format.
pub fn format_report(report: &SessionReport) -> String {
    let mut output = String::new();
    let border = "━".repeat(32);
    let border_dim = border.dimmed();

    let accuracy = if report.notes == 0 {
        0.0
    } else {
        report.score as f64 * 100.0 / report.notes as f64
    };

    let _ = writeln!(output, "{}", border_dim);
    let _ = writeln!(output, "  SCORE  : {}", report.score.green().bold());
    let _ = writeln!(output, "  NOTES  : {} ({:.1}% hit)", report.notes, accuracy);
    let _ = writeln!(output, "  TICKS  : {}", report.ticks);
    let _ = write!(output, "{}", border_dim);

    output
}

//! Two-line status display formatting
//!
//! The instrument shows its settings on a 16-column character LCD. This
//! module only formats; rendering the lines (to an LCD controller or a
//! terminal) is the caller's concern. Lines are refreshed by the control
//! loop only when a key event changed state.

use crate::synth::params::SynthParams;

/// Width of one display line, in characters
pub const LINE_WIDTH: usize = 16;

/// Fixed header line naming the three fields
pub const HEADER: &str = "FREQ DC  WAVE";

/// Format the two status lines for the current settings
///
/// Both lines are padded to exactly [`LINE_WIDTH`] columns so a redraw
/// fully overwrites the previous contents. The value line mirrors the
/// header's column layout, e.g. `100  50% SQR`.
pub fn status_lines(params: &SynthParams) -> [String; 2] {
    let duty_pct = (params.duty_cycle() * 100.0).round() as u32;
    let values = format!(
        "{:<4} {:>2}% {}",
        params.frequency.hz(),
        duty_pct,
        params.kind.label()
    );
    [pad(HEADER), pad(&values)]
}

fn pad(line: &str) -> String {
    debug_assert!(line.len() <= LINE_WIDTH, "status line too long: {line:?}");
    format!("{:<width$}", line, width = LINE_WIDTH)
}

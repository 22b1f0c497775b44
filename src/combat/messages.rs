//! Chat-facing text helpers.

/// Fill `{user}` and `{target}` placeholders in a move message template.
pub fn render_template(template: &str, user: &str, target: &str) -> String {
    template.replace("{user}", user).replace("{target}", target)
}

const BAR_SEGMENTS: usize = 20;

/// Render a monster's HP as a fixed-width bar for chat output.
pub fn health_bar(current: u32, max: u32) -> String {
    if max == 0 {
        return format!("[{}] 0/0", "░".repeat(BAR_SEGMENTS));
    }
    let filled = ((current as f64 / max as f64) * BAR_SEGMENTS as f64).round() as usize;
    let filled = filled.min(BAR_SEGMENTS);
    format!(
        "[{}{}] {}/{}",
        "█".repeat(filled),
        "░".repeat(BAR_SEGMENTS - filled),
        current,
        max
    )
}

/// Effectiveness commentary appended after a damaging hit.
pub fn effectiveness_text(multiplier: f64) -> Option<&'static str> {
    if multiplier == 0.0 {
        Some("It had no effect...")
    } else if multiplier >= 2.0 {
        Some("It's super effective!")
    } else if multiplier > 0.0 && multiplier < 1.0 {
        Some("It's not very effective...")
    } else {
        None
    }
}

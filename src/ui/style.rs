use console::style;
use std::fmt::Display;

/// Green bold: completion lines
pub fn success<D: Display>(text: D) -> String {
    style(text).green().bold().to_string()
}

/// White bold: step titles
pub fn header<D: Display>(text: D) -> String {
    style(text).white().bold().to_string()
}

/// Dim: hints, secondary text
pub fn dim<D: Display>(text: D) -> String {
    style(text).dim().to_string()
}

/// Yellow: warnings, paused state
pub fn yellow<D: Display>(text: D) -> String {
    style(text).yellow().to_string()
}

/// Cyan bold: step counters
pub fn accent<D: Display>(text: D) -> String {
    style(text).cyan().bold().to_string()
}

/// Red bold: crisis resources
pub fn alert<D: Display>(text: D) -> String {
    style(text).red().bold().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn styled_text_keeps_content() {
        console::set_colors_enabled(false);
        assert_eq!(header("Дыхание"), "Дыхание");
        assert_eq!(accent("2/5"), "2/5");
        assert_eq!(dim("Enter"), "Enter");
    }
}

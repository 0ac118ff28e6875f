// yuvcmp-cli/src/output.rs
//
// Colored status lines on stderr. Color is used only when stderr supports it.

use owo_colors::OwoColorize;

/// Print an error message with red styling
pub fn print_error(message: &str) {
    if console::colors_enabled_stderr() {
        eprintln!("{} {}", "Error:".bold().bright_red(), message);
    } else {
        eprintln!("Error: {message}");
    }
}

/// Print a one-line run summary with the label dimmed
pub fn print_summary(label: &str, value: &str) {
    if console::colors_enabled_stderr() {
        eprintln!("{} {}", format!("{label}:").dimmed(), value.bright_white());
    } else {
        eprintln!("{label}: {value}");
    }
}

/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Status column color: given doses green, pending yellow.
pub fn color_for_status(administered: bool) -> &'static str {
    if administered { GREEN } else { YELLOW }
}

/// Wrap `value` in `color`, or grey it out when blank.
pub fn colorize(value: &str, color: &str) -> String {
    if value.trim().is_empty() || value.trim() == "--" {
        format!("{GREY}{value}{RESET}")
    } else {
        format!("{color}{value}{RESET}")
    }
}

/// Highlight used for doses flagged as next.
pub fn highlight_next(value: &str) -> String {
    format!("{BOLD}{GREEN}{value}{RESET}")
}

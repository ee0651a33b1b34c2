//! Plain-text table helpers.

/// Print a horizontal separator line.
pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

/// Format an optional value, showing a placeholder for `None`.
pub fn format_optional(value: Option<&str>, placeholder: &str) -> String {
    value.unwrap_or(placeholder).to_string()
}

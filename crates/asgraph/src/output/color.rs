//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Reference: cyan    (ASNs)
//!   - Accent:    yellow  (rank numbers, cone sizes)
//!   - Success:   green   (files written)
//!   - Error:     red     (failures)
//!   - Muted:     dimmed  (field labels)
//!   - Emphasis:  bold    (section headers)

use colored::Colorize;

use super::OutputConfig;

/// Apply semantic "success" color (green) to text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "error" color (red, bold) to text.
pub fn error(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.red().bold().to_string()
}

/// Colorize an ASN (cyan), rendered with its `AS` prefix.
pub(crate) fn colorize_asn(asn: impl std::fmt::Display, config: &OutputConfig) -> String {
    let text = format!("AS{asn}");
    if !config.use_colors {
        return text;
    }
    text.cyan().to_string()
}

/// Accent a number (yellow).
pub(crate) fn number(value: impl std::fmt::Display, config: &OutputConfig) -> String {
    let text = value.to_string();
    if !config.use_colors {
        return text;
    }
    text.yellow().to_string()
}

/// Dim text for field labels.
pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

/// Bold text for headers.
pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}

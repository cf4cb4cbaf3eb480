//! # Output Configuration
//!
//! Decides whether the CLI decorates its summary lines with emoji, based on
//! the `--color` flag and the usual environment conventions:
//!
//! - `--color=always|never` wins over everything else
//! - `NO_COLOR` (any value) disables decoration
//! - `CLICOLOR=0` disables it, `CLICOLOR_FORCE=1` forces it on
//! - `TERM=dumb` disables it
//! - otherwise the terminal's capabilities decide

use std::env;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    /// Builds the configuration from the `--color` flag value.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };
        Self { use_color }
    }

    fn detect_color_support() -> bool {
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }
        console::Term::stdout().features().colors_supported()
    }

    /// Status marker for a finished step.
    pub fn status(&self, success: bool) -> &'static str {
        match (success, self.use_color) {
            (true, true) => "✅",
            (true, false) => "[OK]",
            (false, true) => "⚠️ ",
            (false, false) => "[WARN]",
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns `emoji_str` when decoration is enabled, `plain` otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_flags() {
        assert!(OutputConfig::from_env_and_flag("always").use_color);
        assert!(OutputConfig::from_env_and_flag("ALWAYS").use_color);
        assert!(!OutputConfig::from_env_and_flag("never").use_color);
    }

    #[test]
    fn test_emoji_helper() {
        let plain = OutputConfig { use_color: false };
        let fancy = OutputConfig { use_color: true };
        assert_eq!(emoji(&plain, "📦", "[FETCH]"), "[FETCH]");
        assert_eq!(emoji(&fancy, "📦", "[FETCH]"), "📦");
    }

    #[test]
    fn test_status_markers() {
        let plain = OutputConfig { use_color: false };
        assert_eq!(plain.status(true), "[OK]");
        assert_eq!(plain.status(false), "[WARN]");
    }
}

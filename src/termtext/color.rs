use console::{Color, Style, Term};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Whether styled output is wanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorPolicy {
    Enabled,
    Disabled,
    /// Style only when the terminal check says the output is a color terminal.
    #[default]
    Auto,
}

impl ColorPolicy {
    /// Resolves the policy to on/off. `is_terminal` is only consulted for
    /// [`ColorPolicy::Auto`].
    pub fn resolve(self, is_terminal: impl FnOnce() -> bool) -> bool {
        match self {
            ColorPolicy::Enabled => true,
            ColorPolicy::Disabled => false,
            ColorPolicy::Auto => is_terminal(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color setting {0:?} (expected true, false or auto)")]
pub struct ParseColorPolicyError(String);

impl FromStr for ColorPolicy {
    type Err = ParseColorPolicyError;

    /// Accepts the spellings found in config files and environment variables.
    /// The empty string means "not set" and maps to [`ColorPolicy::Auto`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "on" | "yes" | "enabled" | "always" => Ok(ColorPolicy::Enabled),
            "false" | "0" | "off" | "no" | "disabled" | "never" => Ok(ColorPolicy::Disabled),
            "" | "auto" => Ok(ColorPolicy::Auto),
            _ => Err(ParseColorPolicyError(s.to_string())),
        }
    }
}

/// Foreground colors used by display operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColor {
    /// The terminal's own foreground color.
    Default,
    Red,
    Green,
    Yellow,
    Cyan,
}

impl TextColor {
    fn console_color(self) -> Option<Color> {
        match self {
            TextColor::Default => None,
            TextColor::Red => Some(Color::Red),
            TextColor::Green => Some(Color::Green),
            TextColor::Yellow => Some(Color::Yellow),
            TextColor::Cyan => Some(Color::Cyan),
        }
    }
}

/// Builds the style for a color/bold combination.
pub fn style(color: TextColor, bold: bool) -> Style {
    let mut style = Style::new();
    if let Some(c) = color.console_color() {
        style = style.fg(c);
    }
    if bold {
        style = style.bold();
    }
    style
}

/// Wraps `text` in escape sequences when `enabled`, and returns it untouched
/// otherwise.
pub fn colorize(text: &str, color: TextColor, bold: bool, enabled: bool) -> String {
    if !enabled {
        return text.to_string();
    }
    style(color, bold)
        .force_styling(true)
        .apply_to(text)
        .to_string()
}

/// The "is this a color terminal" capability consulted under
/// [`ColorPolicy::Auto`].
pub type TerminalCheck = Arc<dyn Fn() -> bool + Send + Sync>;

/// Whether stdout is a terminal that supports colors.
pub fn stdout_supports_color() -> bool {
    Term::stdout().features().colors_supported()
}

/// Applies a [`ColorPolicy`] to [`colorize`] calls.
#[derive(Clone)]
pub struct Colorizer {
    policy: ColorPolicy,
    terminal: TerminalCheck,
}

impl Colorizer {
    /// Creates a colorizer that checks stdout under [`ColorPolicy::Auto`].
    pub fn new(policy: ColorPolicy) -> Self {
        Self {
            policy,
            terminal: Arc::new(stdout_supports_color),
        }
    }

    /// Replaces the terminal check.
    pub fn with_terminal_check(mut self, check: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.terminal = Arc::new(check);
        self
    }

    pub fn policy(&self) -> ColorPolicy {
        self.policy
    }

    /// Resolves the policy; re-evaluated on every call.
    pub fn enabled(&self) -> bool {
        self.policy.resolve(|| (self.terminal)())
    }

    pub fn colorize(&self, text: &str, color: TextColor, bold: bool) -> String {
        colorize(text, color, bold, self.enabled())
    }
}

impl fmt::Debug for Colorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Colorizer")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[test]
    fn test_disabled_returns_text_unchanged() {
        for text in ["", "plain", "\x1b[31malready red\x1b[0m", "tab\there"] {
            assert_eq!(colorize(text, TextColor::Red, true, false), text);
        }
    }

    #[test]
    fn test_enabled_wraps_color_and_bold() {
        let out = colorize("OK", TextColor::Green, true, true);
        assert!(out.contains("\x1b[32m"));
        assert!(out.contains("\x1b[1m"));
        assert!(out.ends_with("OK\x1b[0m"));
        assert_eq!(console::strip_ansi_codes(&out), "OK");
    }

    #[test]
    fn test_enabled_without_bold() {
        let out = colorize("x", TextColor::Cyan, false, true);
        assert!(out.contains("\x1b[36m"));
        assert!(!out.contains("\x1b[1m"));
    }

    #[test]
    fn test_default_color_bold_only() {
        let out = colorize("header", TextColor::Default, true, true);
        assert!(out.starts_with("\x1b[1m"));
        assert!(out.ends_with("header\x1b[0m"));
        assert!(!out.contains("\x1b[3"));
    }

    #[test]
    fn test_enabled_styles_regardless_of_console_detection() {
        // Whatever console decides about this process, an explicit yes wins.
        let detected = console::colors_enabled();
        let out = colorize("FAILED", TextColor::Red, true, true);
        assert!(out.contains("\x1b[31m"), "detected = {detected}");
        let forced = style(TextColor::Red, true).force_styling(true);
        assert_eq!(out, forced.apply_to("FAILED").to_string());
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("true".parse::<ColorPolicy>(), Ok(ColorPolicy::Enabled));
        assert_eq!("FALSE".parse::<ColorPolicy>(), Ok(ColorPolicy::Disabled));
        assert_eq!("".parse::<ColorPolicy>(), Ok(ColorPolicy::Auto));
        assert_eq!("auto".parse::<ColorPolicy>(), Ok(ColorPolicy::Auto));
        assert!("purple".parse::<ColorPolicy>().is_err());
    }

    #[test]
    fn test_auto_consults_terminal_check_each_call() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        static TTY: AtomicBool = AtomicBool::new(true);

        let colorizer = Colorizer::new(ColorPolicy::Auto).with_terminal_check(|| {
            CALLS.fetch_add(1, Ordering::SeqCst);
            TTY.load(Ordering::SeqCst)
        });

        assert!(colorizer.colorize("a", TextColor::Red, false).contains("\x1b["));
        TTY.store(false, Ordering::SeqCst);
        assert_eq!(colorizer.colorize("a", TextColor::Red, false), "a");
        assert_eq!(CALLS.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_explicit_policy_skips_terminal_check() {
        let colorizer = Colorizer::new(ColorPolicy::Enabled)
            .with_terminal_check(|| panic!("terminal check should not run"));
        assert!(colorizer.enabled());

        let colorizer = Colorizer::new(ColorPolicy::Disabled)
            .with_terminal_check(|| panic!("terminal check should not run"));
        assert_eq!(colorizer.colorize("x", TextColor::Green, true), "x");
    }
}

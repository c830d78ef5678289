use crate::cli::ColorChoice;
use std::io::IsTerminal;

/// Initialize color mode based on CLI choice and environment
pub fn init(choice: ColorChoice) {
    colored::control::set_override(should_color(
        choice,
        std::env::var_os("NO_COLOR").is_some(),
        std::io::stdout().is_terminal(),
    ));
}

fn should_color(choice: ColorChoice, no_color: bool, is_terminal: bool) -> bool {
    match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        // Respect NO_COLOR standard (https://no-color.org/)
        ColorChoice::Auto => !no_color && is_terminal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_needs_terminal_and_no_no_color() {
        assert!(should_color(ColorChoice::Auto, false, true));
        assert!(!should_color(ColorChoice::Auto, true, true));
        assert!(!should_color(ColorChoice::Auto, false, false));
    }

    #[test]
    fn explicit_choice_wins() {
        assert!(should_color(ColorChoice::Always, true, false));
        assert!(!should_color(ColorChoice::Never, false, true));
    }
}

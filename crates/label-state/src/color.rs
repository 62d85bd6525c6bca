use crate::cli::ColorChoice;
use std::io::IsTerminal;

/// Initialize color mode based on CLI choice and environment
pub fn init(choice: ColorChoice) {
    // Respect NO_COLOR standard (https://no-color.org/)
    let no_color = std::env::var_os("NO_COLOR").is_some();
    let enabled = should_colorize(choice, no_color, std::io::stdout().is_terminal());
    colored::control::set_override(enabled);
}

fn should_colorize(choice: ColorChoice, no_color: bool, is_terminal: bool) -> bool {
    match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => !no_color && is_terminal,
    }
}

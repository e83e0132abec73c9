#[macro_use]
extern crate rust_i18n;

i18n!("locales");

use colored::Colorize;
use skillsync::cli;
use skillsync::error::SkillsyncError;
use skillsync::init_locale;

fn main() {
    init_locale();

    if let Err(e) = cli::run() {
        let message = e
            .downcast_ref::<SkillsyncError>()
            .map(SkillsyncError::display_localized)
            .unwrap_or_else(|| e.to_string());
        eprintln!("{}", t!("messages.error", error = message).red());
        std::process::exit(1);
    }
}

use anyhow::{Result, anyhow};
use colored::Colorize;
use inquire::Text;
use std::io::IsTerminal;

pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal()
}

/// Per-skill answer to "overwrite the mirror entry?". The `-all` variants are
/// applied by the reconciler to every later conflict in the same run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConflictResolution {
    Yes,
    No,
    YesAll,
    NoAll,
}

/// Normalize an answer line. `None` means the input was not recognized; the
/// caller decides the fail-safe.
pub fn parse_resolution(input: &str) -> Option<ConflictResolution> {
    match input.trim().to_lowercase().as_str() {
        "yes" | "y" => Some(ConflictResolution::Yes),
        "no" | "n" => Some(ConflictResolution::No),
        "yes-all" | "yes all" | "ya" | "all" => Some(ConflictResolution::YesAll),
        "no-all" | "no all" | "na" | "none" => Some(ConflictResolution::NoAll),
        _ => None,
    }
}

/// Decision provider for mirror conflicts. The reconciler never talks to a
/// terminal directly, so tests can script answers.
pub trait ConflictResolver {
    fn resolve(&mut self, skill_name: &str) -> Result<ConflictResolution>;
}

pub struct InteractiveResolver {
    interactive: bool,
}

impl InteractiveResolver {
    pub fn new(interactive: bool) -> Self {
        Self { interactive }
    }
}

impl ConflictResolver for InteractiveResolver {
    fn resolve(&mut self, skill_name: &str) -> Result<ConflictResolution> {
        if !self.interactive {
            // No terminal to ask: keep the existing mirror entry.
            println!(
                "{}",
                t!("fetch.conflict.non_interactive", skill = skill_name).yellow()
            );
            return Ok(ConflictResolution::No);
        }

        println!(
            "\n{}",
            t!("fetch.conflict.exists", skill = skill_name).yellow()
        );
        let prompt = t!("fetch.conflict.question");
        let answer = Text::new(&prompt)
            .prompt()
            .map_err(|e| anyhow!(t!("fetch.conflict.prompt_failed", error = e)))?;

        match parse_resolution(&answer) {
            Some(resolution) => Ok(resolution),
            None => {
                println!(
                    "{}",
                    t!("fetch.conflict.invalid_input", input = answer).yellow()
                );
                Ok(ConflictResolution::No)
            }
        }
    }
}

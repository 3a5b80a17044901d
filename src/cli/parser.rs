use std::env;

use super::CliError;
use super::commands::Command;

pub struct CliParser;

impl Default for CliParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CliParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self) -> Result<Command, CliError> {
        let args: Vec<String> = env::args().collect();

        if args.len() < 2 {
            return Err(CliError::ParseError("No command provided".to_string()));
        }

        match args[1].as_str() {
            "help" | "--help" | "-h" => Ok(Command::Help),
            "migrate" => Ok(Command::Migrate),
            "seed" => Ok(Command::Seed),
            _ => Err(CliError::ParseError(format!(
                "Unknown command: {}",
                args[1]
            ))),
        }
    }
}

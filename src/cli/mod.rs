pub mod commands;
pub mod parser;

use std::fmt;
use std::process;

use parser::CliParser;

use crate::storage::SeaOrmStorage;

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            CliError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            CliError::CommandError(msg) => write!(f, "Command error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::StoreError> for CliError {
    fn from(err: crate::errors::StoreError) -> Self {
        CliError::StorageError(err.to_string())
    }
}

pub async fn run_cli() {
    if let Err(e) = run_cli_inner().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run_cli_inner() -> Result<(), CliError> {
    let parser = CliParser::new();
    let command = parser.parse()?;

    if !command.needs_storage() {
        return command.execute(None).await;
    }

    let storage = SeaOrmStorage::from_config()
        .await
        .map_err(|e| CliError::StorageError(e.to_string()))?;
    command.execute(Some(storage)).await
}

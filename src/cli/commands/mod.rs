mod help;
mod seed;

pub use help::*;
pub use seed::*;

use super::CliError;
use crate::storage::SeaOrmStorage;

#[derive(Debug)]
pub enum Command {
    Help,
    Migrate,
    Seed,
}

impl Command {
    pub fn needs_storage(&self) -> bool {
        !matches!(self, Command::Help)
    }

    pub async fn execute(self, storage: Option<SeaOrmStorage>) -> Result<(), CliError> {
        match self {
            Command::Help => {
                show_help();
                Ok(())
            }
            Command::Migrate => {
                // Migrations run on connect; reaching this point means they applied.
                let storage = storage.ok_or_else(|| {
                    CliError::CommandError("storage not initialized".to_string())
                })?;
                println!("Migrations applied ({} backend)", storage.backend_name());
                Ok(())
            }
            Command::Seed => {
                let storage = storage.ok_or_else(|| {
                    CliError::CommandError("storage not initialized".to_string())
                })?;
                seed_database(&storage).await
            }
        }
    }
}

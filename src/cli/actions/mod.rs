pub mod aws;
pub mod db;

// The match over actions lives in `run` so this file only lists them.
mod run;

use std::path::Path;
use tracing::warn;

#[derive(Debug)]
pub enum Action {
    Aws(aws::Args),
    Db(db::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}

/// Home directory to write credential files into, or `None` for stdout.
fn file_target(stdout: bool, home: Option<&Path>) -> Option<&Path> {
    if stdout {
        return None;
    }

    if home.is_none() {
        warn!("$HOME is undefined. I'll write to stdout.");
    }

    home
}

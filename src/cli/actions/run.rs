use crate::cli::actions::{Action, aws, db};
use anyhow::Result;

/// Execute the provided action.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Aws(args) => aws::execute(args).await,
        Action::Db(args) => db::execute(args).await,
    }
}

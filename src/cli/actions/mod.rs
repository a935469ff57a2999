pub mod account;
pub mod admin;
pub mod session;

// Internal "interpreter" for `Action`; the match lives in `run` so this file
// stays small as commands are added.
mod run;

#[derive(Debug)]
pub enum Action {
    Account(account::Args),
    Admin(admin::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails, the PIN is rejected or the
    /// account gets locked.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}

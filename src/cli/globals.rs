use std::path::PathBuf;

/// Environment-derived settings shared by every subcommand. Built once by
/// the dispatcher.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub vault_addr: String,
    pub auth_mount: String,
    pub home: Option<PathBuf>,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(vault_addr: String, auth_mount: String) -> Self {
        Self {
            vault_addr,
            auth_mount,
            home: dirs::home_dir(),
        }
    }

    #[must_use]
    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }
}

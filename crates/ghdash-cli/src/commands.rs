//! CLI command implementations.

use ghdash_api::bridge;
use ghdash_api::{
    ApiError, BridgeError, ClientSettings, Config, Credential, CredentialStore, FileStorage,
    GitHubClient, StorageError, TokenStorage, TOKEN_KEY,
};
use serde::Serialize;
use thiserror::Error;

use crate::render;

/// CLI errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("invalid repository '{0}': expected OWNER/NAME")]
    InvalidRepository(String),

    #[error("invalid JSON arguments: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;

/// Splits `OWNER/NAME` into its two parts.
pub fn parse_repo(input: &str) -> Result<(&str, &str)> {
    match input.trim().split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner, name))
        }
        _ => Err(CliError::InvalidRepository(input.to_string())),
    }
}

/// Everything a command needs: token storage, client settings and output mode.
///
/// The client is only built by commands that reach GitHub, so token
/// housekeeping works even with an unusable API URL.
pub struct Context {
    storage: FileStorage,
    settings: ClientSettings,
    json: bool,
    color: bool,
}

impl Context {
    /// Resolves the token storage named by `config`.
    pub fn open(config: &Config, json: bool) -> Result<Self> {
        let storage = config.storage()?;
        tracing::debug!(path = %storage.path().display(), "Using token storage");
        Ok(Self {
            storage,
            settings: config.client_settings(),
            json,
            color: console::colors_enabled(),
        })
    }

    fn store(&self) -> Result<CredentialStore<FileStorage>> {
        Ok(CredentialStore::open(
            self.storage.clone(),
            self.settings.clone(),
        )?)
    }

    fn client(&self) -> Result<GitHubClient> {
        Ok(self.store()?.client())
    }

    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            print!("{}", text(value));
        }
        Ok(())
    }

    // ==================== Token Commands ====================

    /// Validate and save a token.
    pub async fn token_set(&self, token: &str) -> Result<()> {
        let user = self.store()?.set_token(token).await?;
        println!("Token saved. Authenticated as {}.", user.login);
        Ok(())
    }

    /// Remove the saved token.
    pub fn token_clear(&self) -> Result<()> {
        self.storage.remove(TOKEN_KEY)?;
        tracing::info!("Cleared GitHub token");
        println!("Token cleared.");
        Ok(())
    }

    /// Show token state.
    pub fn token_status(&self) -> Result<()> {
        match self.saved_token() {
            Some(cred) => print!(
                "{}",
                render::token_status(&cred.masked(), self.storage.path())
            ),
            None => println!("No token saved. Run 'ghdash token set <TOKEN>'."),
        }
        Ok(())
    }

    /// The saved token, if one is readable.
    fn saved_token(&self) -> Option<Credential> {
        match self.storage.get(TOKEN_KEY) {
            Ok(token) => token
                .filter(|t| !t.trim().is_empty())
                .map(Credential::new),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read saved GitHub token");
                None
            }
        }
    }

    // ==================== Read Commands ====================

    /// Search repositories.
    pub async fn search(&self, query: &str) -> Result<()> {
        let repos = self.client()?.search_repositories(query).await?;
        self.emit(&repos, |r| render::repositories(r))
    }

    /// Show one repository.
    pub async fn repo(&self, repo: &str) -> Result<()> {
        let (owner, name) = parse_repo(repo)?;
        let detail = self.client()?.get_repository(owner, name).await?;
        self.emit(&detail, render::repository)
    }

    /// List issues.
    pub async fn issues(&self, repo: &str) -> Result<()> {
        let (owner, name) = parse_repo(repo)?;
        let issues = self.client()?.list_issues(owner, name).await?;
        self.emit(&issues, |i| render::issues(i, self.color))
    }

    /// List pull requests.
    pub async fn pulls(&self, repo: &str) -> Result<()> {
        let (owner, name) = parse_repo(repo)?;
        let pulls = self.client()?.list_pull_requests(owner, name).await?;
        self.emit(&pulls, |p| render::pull_requests(p, self.color))
    }

    /// Call a bridge channel; always prints JSON.
    pub async fn invoke(&self, channel: &str, args: Option<&str>) -> Result<()> {
        let args = match args {
            Some(raw) => serde_json::from_str(raw)?,
            None => serde_json::Value::Null,
        };
        let value = bridge::dispatch(&self.client()?, channel, args).await?;
        println!("{}", serde_json::to_string_pretty(&value)?);
        Ok(())
    }
}

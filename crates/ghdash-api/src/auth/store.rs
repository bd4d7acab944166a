//! # Credential Store
//!
//! Persists the access token and keeps the client handle bound to it.

use crate::client::{ClientSettings, GitHubClient};
use crate::error::{ApiError, ApiResult};
use crate::storage::{StorageError, TokenStorage};
use crate::types::UserProfile;

use super::Credential;

/// Storage key the token is persisted under.
pub const TOKEN_KEY: &str = "github_token";

/// Owner of the single active credential.
///
/// Holds at most one token. Every change of token replaces the client
/// handle wholesale; handles already given out keep the token they were
/// built with.
///
/// # Examples
///
/// ```rust,ignore
/// let mut store = CredentialStore::open(FileStorage::default_location()?, ClientSettings::default())?;
///
/// if !store.is_initialized() {
///     let user = store.set_token("ghp_xxx").await?;
///     println!("Signed in as {}", user.login);
/// }
///
/// let client = store.client();
/// ```
#[derive(Debug)]
pub struct CredentialStore<S> {
    storage: S,
    client: GitHubClient,
}

impl<S: TokenStorage> CredentialStore<S> {
    /// Opens the store, restoring a previously persisted token.
    ///
    /// A restored token is trusted without a probe; it is checked on the
    /// first call that uses it. Storage that cannot be parsed opens as
    /// uninitialized so the token can still be cleared or replaced.
    ///
    /// # Errors
    ///
    /// * [`ApiError::Storage`] - The storage could not be read at all
    /// * [`ApiError::InvalidConfig`] - `settings` holds an unusable API URL
    pub fn open(storage: S, settings: ClientSettings) -> ApiResult<Self> {
        let saved = match storage.get(TOKEN_KEY) {
            Ok(saved) => saved,
            Err(e @ StorageError::Corrupt { .. }) => {
                tracing::warn!(error = %e, "Ignoring unreadable saved GitHub token");
                None
            }
            Err(e) => return Err(e.into()),
        };
        let token = saved
            .filter(|t| !t.trim().is_empty())
            .map(Credential::new);

        if token.is_some() {
            tracing::info!("Restored saved GitHub token");
        } else {
            tracing::debug!("No saved GitHub token");
        }

        let client = GitHubClient::new(&settings, token)?;
        Ok(Self { storage, client })
    }

    /// Validates and saves a new token.
    ///
    /// The token is trimmed, then probed with one authenticated call. On
    /// success it is persisted and becomes the active credential. On any
    /// failure, including blank input, the persisted token is discarded and
    /// the store is left uninitialized.
    ///
    /// # Returns
    ///
    /// The profile of the account owning the token.
    ///
    /// # Errors
    ///
    /// * [`ApiError::InvalidToken`] - `token` is empty or blank
    /// * [`ApiError::Unauthorized`] - GitHub rejected the token
    /// * [`ApiError::Network`] - The probe could not be sent
    /// * [`ApiError::Storage`] - The validated token could not be saved
    pub async fn set_token(&mut self, token: &str) -> ApiResult<UserProfile> {
        let token = token.trim();
        if token.is_empty() {
            self.discard();
            return Err(ApiError::InvalidToken);
        }

        let candidate = self.client.with_token(Some(Credential::new(token)));

        match candidate.authenticated_user().await {
            Ok(user) => {
                if let Err(e) = self.storage.set(TOKEN_KEY, token) {
                    self.discard();
                    return Err(e.into());
                }
                self.client = candidate;
                tracing::info!(login = %user.login, "Saved GitHub token");
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "GitHub token rejected, discarding saved token");
                self.discard();
                Err(e)
            }
        }
    }

    /// Removes the token from memory and storage.
    ///
    /// The in-memory token is dropped even if storage fails.
    ///
    /// # Errors
    ///
    /// * [`ApiError::Storage`] - The persisted token could not be removed
    pub fn clear_token(&mut self) -> ApiResult<()> {
        self.client = self.client.with_token(None);
        self.storage.remove(TOKEN_KEY)?;
        tracing::info!("Cleared GitHub token");
        Ok(())
    }

    /// Whether a token-bound client exists.
    ///
    /// Says nothing about whether GitHub still accepts the token.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.client.is_initialized()
    }

    /// Returns a handle for the caller to own.
    ///
    /// Without a token the handle fails every operation with
    /// [`ApiError::Uninitialized`].
    #[must_use]
    pub fn client(&self) -> GitHubClient {
        self.client.clone()
    }

    /// The active token, if any.
    #[must_use]
    pub fn credential(&self) -> Option<&Credential> {
        self.client.credential()
    }

    /// The backing storage.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Drops to uninitialized and forgets the persisted token.
    fn discard(&mut self) {
        self.client = self.client.with_token(None);
        if let Err(e) = self.storage.remove(TOKEN_KEY) {
            tracing::warn!(error = %e, "Failed to remove saved GitHub token");
        }
    }
}

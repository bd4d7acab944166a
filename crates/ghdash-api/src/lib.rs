//! # ghdash API
//!
//! Access layer for the ghdash GitHub dashboard.
//!
//! ## Architecture
//!
//! A [`CredentialStore`] holds at most one GitHub personal access token,
//! persisted through a [`TokenStorage`] backend. Whenever the token changes
//! the store builds a fresh [`GitHubClient`] bound to it; callers take a
//! clone of that handle and issue read-only requests against the GitHub
//! REST API. The [`bridge`] module exposes the same operations behind
//! channel names for a desktop host.
//!
//! ## Modules
//!
//! - [`auth`] - Token value and the credential store
//! - [`bridge`] - Channel-based call surface forwarding to the client
//! - [`client`] - HTTP client for the GitHub REST API
//! - [`config`] - Persisted application configuration
//! - [`error`] - Error taxonomy for API operations
//! - [`storage`] - Key-value persistence for the token
//! - [`types`] - Display-shaped repository, issue and pull request records
//!
//! ## Example
//!
//! ```rust,ignore
//! use ghdash_api::{ClientSettings, CredentialStore, FileStorage};
//!
//! let storage = FileStorage::default_location()?;
//! let mut store = CredentialStore::open(storage, ClientSettings::default())?;
//! store.set_token("ghp_xxx").await?;
//!
//! let client = store.client();
//! for repo in client.search_repositories("tokio").await? {
//!     println!("{} ({} stars)", repo.full_name, repo.stargazers_count);
//! }
//! ```

pub mod auth;
pub mod bridge;
pub mod client;
pub mod config;
pub mod error;
pub mod storage;
pub mod types;

pub use auth::{Credential, CredentialStore, TOKEN_KEY};
pub use bridge::{BridgeError, Channel};
pub use client::{ClientSettings, GitHubClient, DEFAULT_API_URL};
pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use storage::{FileStorage, MemoryStorage, StorageError, StorageResult, TokenStorage};
pub use types::{
    Issue, IssueState, Label, Owner, PullRequest, PullRequestStatus, RepositoryDetail,
    RepositorySummary, UserProfile, DEFAULT_LABEL_COLOR,
};

//! # Authentication Module
//!
//! Holds the GitHub access token and the client bound to it.
//!
//! ## Components
//!
//! - [`Credential`] - A bearer token that never prints itself
//! - [`CredentialStore`] - Persists the token and owns the active client

mod credentials;
mod store;

pub use credentials::Credential;
pub use store::{CredentialStore, TOKEN_KEY};

//! # Bridge
//!
//! Channel-named call surface for a desktop host process.
//!
//! Each channel forwards to one [`GitHubClient`] operation. Arguments
//! arrive as a JSON array of positional values and results leave as JSON.
//!
//! | Channel             | Arguments         | Result              |
//! |---------------------|-------------------|---------------------|
//! | `github:search`     | `[query]`         | `{"items": [...]}`  |
//! | `github:get-repo`   | `[owner, repo]`   | repository object   |
//! | `github:get-issues` | `[owner, repo]`   | array of issues     |
//! | `github:get-pulls`  | `[owner, repo]`   | array of pull requests |

use std::fmt;
use std::str::FromStr;

use serde_json::{json, Value};
use thiserror::Error;

use crate::client::GitHubClient;
use crate::error::ApiError;

/// Errors returned by the bridge.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// No handler is registered under this name.
    #[error("unknown channel: {0}")]
    UnknownChannel(String),

    /// Arguments do not match the channel's signature.
    #[error("invalid arguments for {channel}: {reason}")]
    InvalidArguments {
        /// Channel being invoked.
        channel: Channel,
        /// What was wrong.
        reason: String,
    },

    /// The forwarded call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The result could not be encoded.
    #[error("failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A bridge channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Repository search.
    Search,
    /// Single repository.
    GetRepo,
    /// Repository issues.
    GetIssues,
    /// Repository pull requests.
    GetPulls,
}

impl Channel {
    /// Every channel, in registration order.
    pub const ALL: [Self; 4] = [Self::Search, Self::GetRepo, Self::GetIssues, Self::GetPulls];

    /// Wire name of the channel.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Search => "github:search",
            Self::GetRepo => "github:get-repo",
            Self::GetIssues => "github:get-issues",
            Self::GetPulls => "github:get-pulls",
        }
    }

    const fn arity(self) -> usize {
        match self {
            Self::Search => 1,
            Self::GetRepo | Self::GetIssues | Self::GetPulls => 2,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| BridgeError::UnknownChannel(s.to_string()))
    }
}

/// Checks the argument list and extracts it as strings.
fn string_args(channel: Channel, args: &[Value]) -> Result<Vec<&str>, BridgeError> {
    if args.len() != channel.arity() {
        return Err(BridgeError::InvalidArguments {
            channel,
            reason: format!("expected {} arguments, got {}", channel.arity(), args.len()),
        });
    }

    args.iter()
        .enumerate()
        .map(|(i, arg)| {
            arg.as_str().ok_or_else(|| BridgeError::InvalidArguments {
                channel,
                reason: format!("argument {i} must be a string"),
            })
        })
        .collect()
}

/// Forwards a call on `channel` to `client`.
///
/// # Errors
///
/// * [`BridgeError::InvalidArguments`] - Wrong argument count or type
/// * [`BridgeError::Api`] - The client call failed
pub async fn invoke(
    client: &GitHubClient,
    channel: Channel,
    args: &[Value],
) -> Result<Value, BridgeError> {
    let args = string_args(channel, args)?;
    tracing::debug!(%channel, "Bridge call");

    let value = match channel {
        Channel::Search => {
            let items = client.search_repositories(args[0]).await?;
            json!({ "items": items })
        }
        Channel::GetRepo => serde_json::to_value(client.get_repository(args[0], args[1]).await?)?,
        Channel::GetIssues => serde_json::to_value(client.list_issues(args[0], args[1]).await?)?,
        Channel::GetPulls => {
            serde_json::to_value(client.list_pull_requests(args[0], args[1]).await?)?
        }
    };

    Ok(value)
}

/// Resolves a channel by name and forwards the call.
///
/// `args` must be a JSON array; `null` is treated as no arguments.
///
/// # Errors
///
/// * [`BridgeError::UnknownChannel`] - `channel` names no handler
/// * everything [`invoke`] returns
pub async fn dispatch(
    client: &GitHubClient,
    channel: &str,
    args: Value,
) -> Result<Value, BridgeError> {
    let channel: Channel = channel.parse()?;
    let args = match args {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => {
            return Err(BridgeError::InvalidArguments {
                channel,
                reason: format!("arguments must be a JSON array, got {other}"),
            })
        }
    };
    invoke(client, channel, &args).await
}

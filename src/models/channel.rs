// src/models/channel.rs

//! Release channel definitions and URL derivation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A monitored release track of the Discord client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseChannel {
    Stable,
    Ptb,
    Canary,
}

impl ReleaseChannel {
    /// All channels, in boot order.
    pub const ALL: [ReleaseChannel; 3] = [Self::Canary, Self::Stable, Self::Ptb];

    /// Lowercase channel name, used in URLs, storage keys and subscriptions.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Ptb => "ptb",
            Self::Canary => "canary",
        }
    }

    /// Display name for notification titles.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Stable => "Stable",
            Self::Ptb => "PTB",
            Self::Canary => "Canary",
        }
    }

    /// Host serving this channel. The stable channel lives on the bare
    /// domain; every other channel on a channel-name subdomain.
    pub fn host(&self, domain: &str) -> String {
        match self {
            Self::Stable => domain.to_string(),
            other => format!("{}.{}", other.name(), domain),
        }
    }
}

impl fmt::Display for ReleaseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReleaseChannel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stable" => Ok(Self::Stable),
            "ptb" => Ok(Self::Ptb),
            "canary" => Ok(Self::Canary),
            other => Err(format!("unknown release channel '{other}'")),
        }
    }
}

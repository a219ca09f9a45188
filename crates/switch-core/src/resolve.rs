//! Profile and server name resolution.
//!
//! Expands a batch of tokens (profile names and/or bare server names) into
//! a flat server list. Any unrecognized token fails the whole batch before
//! anything is written; mixed valid/invalid batches are never partially
//! applied.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::registry::{Profile, ServerEntry};

/// Hard resolution failures. Callers abort with a non-zero exit and must
/// not write any configuration.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// A token matched neither a profile nor a server. Carries the known
    /// names so the caller can show what is available.
    #[error("Unknown profile or server: \"{token}\"")]
    UnknownToken {
        token: String,
        known_profiles: Vec<String>,
        known_servers: Vec<String>,
    },

    /// The direct single-profile path named a profile that does not exist.
    #[error("Profile \"{name}\" not found")]
    UnknownProfile {
        name: String,
        known_profiles: Vec<String>,
    },

    /// Resolution succeeded but produced no servers.
    #[error("No servers to configure")]
    EmptySelection,
}

/// Outcome of a successful token resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Server names, deduplicated, in order of first occurrence.
    pub servers: Vec<String>,
    /// Tokens that resolved as profiles, in input order.
    pub profiles: Vec<String>,
    /// Tokens that resolved as bare server names, in input order.
    pub singles: Vec<String>,
}

/// Resolve a token batch against the merged registries.
///
/// Tokens are classified in order: known profile first, then known server.
/// Profile members are accepted without validating them against the server
/// registry; unresolved members are dropped later at write time.
pub fn resolve_tokens(
    tokens: &[String],
    profiles: &BTreeMap<String, Profile>,
    servers: &BTreeMap<String, ServerEntry>,
) -> Result<Resolution, ResolveError> {
    let mut resolved = Resolution {
        servers: Vec::new(),
        profiles: Vec::new(),
        singles: Vec::new(),
    };

    for token in tokens {
        if let Some(profile) = profiles.get(token) {
            resolved.profiles.push(token.clone());
            for member in &profile.servers {
                push_unique(&mut resolved.servers, member);
            }
        } else if servers.contains_key(token) {
            resolved.singles.push(token.clone());
            push_unique(&mut resolved.servers, token);
        } else {
            return Err(ResolveError::UnknownToken {
                token: token.clone(),
                known_profiles: profiles.keys().cloned().collect(),
                known_servers: servers.keys().cloned().collect(),
            });
        }
    }

    if resolved.servers.is_empty() {
        return Err(ResolveError::EmptySelection);
    }

    Ok(resolved)
}

fn push_unique(list: &mut Vec<String>, name: &str) {
    if !list.iter().any(|existing| existing == name) {
        list.push(name.to_string());
    }
}

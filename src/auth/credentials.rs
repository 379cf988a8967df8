//! Credentials extracted from requests and the verifiers that vouch for them.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use sha2::{Digest, Sha256};

/// A credential as presented by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Basic { username: String, password: String },
    Bearer(String),
    ApiKey(String),
}

impl Credential {
    pub fn kind(&self) -> CredentialKind {
        match self {
            Credential::Basic { .. } => CredentialKind::Basic,
            Credential::Bearer(_) => CredentialKind::Bearer,
            Credential::ApiKey(_) => CredentialKind::ApiKey,
        }
    }

    /// The secret material, in the form it is stored hashed.
    fn secret(&self) -> String {
        match self {
            Credential::Basic { username, password } => format!("{}:{}", username, password),
            Credential::Bearer(token) => token.clone(),
            Credential::ApiKey(key) => key.clone(),
        }
    }
}

/// Kind of credential, as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialKind {
    Basic,
    Bearer,
    ApiKey,
}

/// Vouches for credentials.
///
/// Adapters only parse requests; whether a credential is good is decided
/// here.
pub trait CredentialVerifier: Send + Sync {
    /// Principal name for a valid credential.
    fn verify(&self, credential: &Credential) -> Option<String>;
}

impl<F> CredentialVerifier for F
where
    F: Fn(&Credential) -> Option<String> + Send + Sync,
{
    fn verify(&self, credential: &Credential) -> Option<String> {
        self(credential)
    }
}

/// Shared verifier handle.
pub type VerifierRef = Arc<dyn CredentialVerifier>;

/// Credential configuration from config file.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfiguredCredential {
    /// Unique ID, reported in logs.
    pub id: String,
    /// Principal name reported on success.
    pub principal: String,
    pub kind: CredentialKind,
    /// Username, for `basic` credentials.
    #[serde(default)]
    pub username: Option<String>,
    /// Password, token or API key.
    pub secret: String,
}

/// In-memory verifier over configured credentials.
///
/// Only SHA-256 digests of secrets are kept, mapped to their principal.
#[derive(Clone, Default)]
pub struct StaticCredentials {
    entries: HashMap<(CredentialKind, String), String>,
}

impl StaticCredentials {
    /// Create a verifier from configured credentials.
    pub fn new(configured: Vec<ConfiguredCredential>) -> Self {
        let mut entries = HashMap::new();

        for item in configured {
            let secret = match (item.kind, &item.username) {
                (CredentialKind::Basic, Some(username)) => format!("{}:{}", username, item.secret),
                (CredentialKind::Basic, None) => {
                    tracing::warn!(id = %item.id, "Basic credential without username skipped");
                    continue;
                }
                _ => item.secret,
            };
            entries.insert((item.kind, Self::hash_secret(&secret)), item.principal);
        }

        Self { entries }
    }

    /// Hash a secret for storage/comparison.
    pub fn hash_secret(secret: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, credential: &Credential) -> Option<String> {
        let key = (credential.kind(), Self::hash_secret(&credential.secret()));
        self.entries.get(&key).cloned()
    }
}

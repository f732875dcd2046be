//! Issuer and verifier configuration, and where the signing key comes from.

use std::env;
use std::fmt;

use drvc3_core::{Keypair, CERTIFICATE};

use crate::error::ConfigError;

/// Environment variable the signing key is read from unless overridden.
pub const DEFAULT_KEY_ENV_VAR: &str = "PRIVATE_KEY";

/// Tags attached to every receipt unless the request supplies its own.
pub const DEFAULT_TAGS: [&str; 3] = ["#loosechain", "#drvc3", "#proof"];

/// Configuration for an [`Issuer`](crate::Issuer).
#[derive(Debug, Clone)]
pub struct IssuerConfig {
    /// Name of the environment variable holding the hex signing key.
    pub key_env_var: String,
    /// Format-version tag stamped on each receipt.
    pub certificate: String,
    /// Tags used when a request carries none.
    pub tags: Vec<String>,
    /// `resource.type` recorded when issuing for a file.
    pub resource_type: String,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            key_env_var: DEFAULT_KEY_ENV_VAR.to_string(),
            certificate: CERTIFICATE.to_string(),
            tags: DEFAULT_TAGS.iter().map(|t| t.to_string()).collect(),
            resource_type: "file".to_string(),
        }
    }
}

/// Configuration for a [`Verifier`](crate::Verifier).
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Re-digest local resources. When off, the integrity step is recorded as skipped.
    pub check_local_resources: bool,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            check_local_resources: true,
        }
    }
}

/// Where an issuer obtains its signing key.
///
/// The key is resolved at issuance time, once per receipt, and never stored
/// in any artifact.
#[derive(Clone)]
pub enum SigningKeySource {
    /// Read a hex secret from the named environment variable.
    Env { var: String },
    /// A key supplied directly by the caller.
    Provided(Keypair),
}

impl SigningKeySource {
    /// Read the key from the variable named in `config`.
    pub fn from_env(config: &IssuerConfig) -> Self {
        SigningKeySource::Env {
            var: config.key_env_var.clone(),
        }
    }

    /// Use an already loaded key.
    pub fn provided(keypair: Keypair) -> Self {
        SigningKeySource::Provided(keypair)
    }

    /// Produce the signing key.
    pub fn resolve(&self) -> Result<Keypair, ConfigError> {
        self.resolve_with(|var| env::var(var).ok())
    }

    /// Produce the signing key, looking variables up through `lookup`.
    pub fn resolve_with<F>(&self, lookup: F) -> Result<Keypair, ConfigError>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        match self {
            SigningKeySource::Provided(keypair) => Ok(keypair.clone()),
            SigningKeySource::Env { var } => {
                let value = lookup(var)
                    .filter(|v| !v.trim().is_empty())
                    .ok_or_else(|| ConfigError::MissingKey { var: var.clone() })?;
                Keypair::from_hex(&value).map_err(|source| ConfigError::InvalidKey {
                    var: var.clone(),
                    source,
                })
            }
        }
    }
}

impl fmt::Debug for SigningKeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SigningKeySource::Env { var } => write!(f, "Env({var})"),
            SigningKeySource::Provided(keypair) => write!(f, "Provided({keypair:?})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HARDHAT_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_defaults() {
        let config = IssuerConfig::default();
        assert_eq!(config.key_env_var, "PRIVATE_KEY");
        assert_eq!(config.certificate, "DRVC3 v1.0");
        assert_eq!(config.tags, vec!["#loosechain", "#drvc3", "#proof"]);
        assert!(VerifierConfig::default().check_local_resources);
    }

    #[test]
    fn test_resolve_from_lookup() {
        let source = SigningKeySource::from_env(&IssuerConfig::default());
        let keypair = source
            .resolve_with(|var| (var == "PRIVATE_KEY").then(|| HARDHAT_KEY.to_string()))
            .unwrap();
        assert_eq!(
            keypair.address().to_checksum(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn test_custom_variable_name() {
        let config = IssuerConfig {
            key_env_var: "DRVC3_SIGNING_KEY".to_string(),
            ..IssuerConfig::default()
        };
        let source = SigningKeySource::from_env(&config);
        let result = source
            .resolve_with(|var| (var == "DRVC3_SIGNING_KEY").then(|| HARDHAT_KEY[2..].to_string()));
        assert!(result.is_ok());
    }

    #[test]
    fn test_missing_key() {
        let source = SigningKeySource::from_env(&IssuerConfig::default());
        let result = source.resolve_with(|_| None);
        assert!(matches!(result, Err(ConfigError::MissingKey { var }) if var == "PRIVATE_KEY"));

        let result = source.resolve_with(|_| Some("   ".to_string()));
        assert!(matches!(result, Err(ConfigError::MissingKey { .. })));
    }

    #[test]
    fn test_malformed_key_not_echoed() {
        let source = SigningKeySource::from_env(&IssuerConfig::default());
        let secret = "0xdeadbeefnothex";
        let err = source.resolve_with(|_| Some(secret.to_string())).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidKey { .. }));
        assert!(!err.to_string().contains("deadbeef"));
    }

    #[test]
    fn test_zero_key_rejected() {
        let source = SigningKeySource::from_env(&IssuerConfig::default());
        let zero = format!("0x{}", "00".repeat(32));
        assert!(matches!(
            source.resolve_with(|_| Some(zero)),
            Err(ConfigError::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_debug_hides_secret() {
        let keypair = Keypair::from_hex(HARDHAT_KEY).unwrap();
        let rendered = format!("{:?}", SigningKeySource::provided(keypair));
        assert!(!rendered.contains("ac0974"));
        assert!(rendered.contains("Provided"));
    }
}

//! Kubernetes secrets referenced by the platform resources.
//!
//! A secret either carries values the builder actually knows (the endpoint
//! credentials, the license file) or is a placeholder for material the
//! inventory never reveals. Placeholders have their own variants so that a
//! real value can never end up in one by accident, and they render every
//! unknown field as [`INCOMPLETE_WARNING`].

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use super::meta::{kinds, ObjectMeta, TypeMeta};

/// Marker written into every field the user must fill in by hand.
pub const INCOMPLETE_WARNING: &str =
    "Warning: Incomplete secret, please replace it with the secret content";

/// Secret types
pub mod secret_type {
    pub const OPAQUE: &str = "Opaque";
    pub const BASIC_AUTH: &str = "kubernetes.io/basic-auth";
    pub const TLS: &str = "kubernetes.io/tls";
}

/// Well known secret keys
pub mod keys {
    pub const USERNAME: &str = "username";
    pub const PASSWORD: &str = "password";
    pub const TLS_CERT: &str = "tls.crt";
    pub const TLS_KEY: &str = "tls.key";
    pub const CA_CERT: &str = "ca.crt";
    pub const LICENSE_CONTENT: &str = "content";
    pub const FAKE_DATA: &str = "Fake Data";
}

/// Well known secret names
pub mod names {
    pub const SYSTEM_ENDPOINT: &str = "system-endpoint";
    pub const SYSTEM_LICENSE: &str = "system-license";
    pub const BMC: &str = "bmc-secret";
}

#[derive(Debug, Clone, PartialEq)]
pub enum SecretContent {
    /// Values read from the environment or the inventory. `data` is binary
    /// and base64 encoded on output, `string_data` is written as is.
    Known {
        secret_type: String,
        data: BTreeMap<String, Vec<u8>>,
        string_data: BTreeMap<String, String>,
    },
    IncompleteTls,
    IncompleteBasicAuth { username: String },
    /// Placeholder for any other secret type.
    IncompleteOther { secret_type: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Secret {
    pub metadata: ObjectMeta,
    pub content: SecretContent,
}

impl Secret {
    pub fn opaque(
        name: &str,
        namespace: &str,
        data: BTreeMap<String, Vec<u8>>,
        string_data: BTreeMap<String, String>,
    ) -> Self {
        Self {
            metadata: ObjectMeta::new(name, namespace),
            content: SecretContent::Known {
                secret_type: secret_type::OPAQUE.to_string(),
                data,
                string_data,
            },
        }
    }

    /// The installed license file, stored under the `content` key.
    pub fn license(name: &str, namespace: &str, content: &str) -> Self {
        let mut data = BTreeMap::new();
        data.insert(
            keys::LICENSE_CONTENT.to_string(),
            content.as_bytes().to_vec(),
        );
        Self::opaque(name, namespace, data, BTreeMap::new())
    }

    /// TLS material for a certificate; none of it is recoverable.
    pub fn incomplete_tls(name: &str, namespace: &str) -> Self {
        Self {
            metadata: ObjectMeta::new(name, namespace),
            content: SecretContent::IncompleteTls,
        }
    }

    /// Board management credentials; the username is known, the password is not.
    pub fn incomplete_basic_auth(name: &str, namespace: &str, username: &str) -> Self {
        Self {
            metadata: ObjectMeta::new(name, namespace),
            content: SecretContent::IncompleteBasicAuth {
                username: username.to_string(),
            },
        }
    }

    pub fn incomplete_other(name: &str, namespace: &str, secret_type: &str) -> Self {
        Self {
            metadata: ObjectMeta::new(name, namespace),
            content: SecretContent::IncompleteOther {
                secret_type: secret_type.to_string(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn is_incomplete(&self) -> bool {
        !matches!(self.content, SecretContent::Known { .. })
    }

    pub fn secret_type(&self) -> &str {
        match &self.content {
            SecretContent::Known { secret_type, .. } => secret_type,
            SecretContent::IncompleteTls => secret_type::TLS,
            SecretContent::IncompleteBasicAuth { .. } => secret_type::BASIC_AUTH,
            SecretContent::IncompleteOther { secret_type } => secret_type,
        }
    }

    fn document(&self) -> SecretDocument<'_> {
        let warning = || INCOMPLETE_WARNING.to_string();

        let (data, string_data) = match &self.content {
            SecretContent::Known {
                data, string_data, ..
            } => (
                data.iter()
                    .map(|(k, v)| (k.clone(), STANDARD.encode(v)))
                    .collect(),
                string_data.clone(),
            ),
            SecretContent::IncompleteTls => (
                BTreeMap::new(),
                [keys::TLS_CERT, keys::TLS_KEY, keys::CA_CERT]
                    .iter()
                    .map(|k| (k.to_string(), warning()))
                    .collect(),
            ),
            SecretContent::IncompleteBasicAuth { username } => {
                let mut fields = BTreeMap::new();
                fields.insert(keys::USERNAME.to_string(), username.clone());
                fields.insert(keys::PASSWORD.to_string(), warning());
                (BTreeMap::new(), fields)
            }
            SecretContent::IncompleteOther { .. } => {
                let mut fields = BTreeMap::new();
                fields.insert(keys::FAKE_DATA.to_string(), warning());
                (BTreeMap::new(), fields)
            }
        };

        SecretDocument {
            type_meta: TypeMeta::core(kinds::SECRET),
            metadata: &self.metadata,
            secret_type: self.secret_type(),
            data,
            string_data,
        }
    }
}

/// Wire layout of a secret.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SecretDocument<'a> {
    #[serde(flatten)]
    type_meta: TypeMeta,
    metadata: &'a ObjectMeta,
    #[serde(rename = "type")]
    secret_type: &'a str,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    data: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    string_data: BTreeMap<String, String>,
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.document().serialize(serializer)
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// API group of every platform resource in the manifest.
pub const API_VERSION: &str = "starlingx.windriver.com/v1";

/// Core API group used by namespaces and secrets.
pub const CORE_API_VERSION: &str = "v1";

/// Label stamped on every platform resource.
pub const CONTROLLER_TOOLS_LABEL: &str = "controller-tools.k8s.io";
pub const CONTROLLER_TOOLS_VERSION: &str = "1.0";

/// Resource kinds
pub mod kinds {
    pub const NAMESPACE: &str = "Namespace";
    pub const SECRET: &str = "Secret";
    pub const SYSTEM: &str = "System";
    pub const HOST: &str = "Host";
    pub const HOST_PROFILE: &str = "HostProfile";
    pub const PLATFORM_NETWORK: &str = "PlatformNetwork";
    pub const ADDRESS_POOL: &str = "AddressPool";
    pub const DATA_NETWORK: &str = "DataNetwork";
    pub const PTP_INSTANCE: &str = "PtpInstance";
    pub const PTP_INTERFACE: &str = "PtpInterface";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMeta {
    pub api_version: String,
    pub kind: String,
}

impl TypeMeta {
    pub fn platform(kind: &str) -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: kind.to_string(),
        }
    }

    pub fn core(kind: &str) -> Self {
        Self {
            api_version: CORE_API_VERSION.to_string(),
            kind: kind.to_string(),
        }
    }
}

/// Object metadata. The creation timestamp is never set, but it is still
/// rendered (as null) and later scrubbed from the manifest text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub creation_timestamp: Option<String>,
}

impl ObjectMeta {
    pub fn new(name: &str, namespace: &str) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            ..Default::default()
        }
    }

    /// Metadata for a platform resource, carrying the controller-tools label.
    pub fn labelled(name: &str, namespace: &str) -> Self {
        let mut meta = Self::new(name, namespace);
        meta.labels.insert(
            CONTROLLER_TOOLS_LABEL.to_string(),
            CONTROLLER_TOOLS_VERSION.to_string(),
        );
        meta
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub metadata: ObjectMeta,
}

impl Namespace {
    pub fn new(name: &str) -> Self {
        Self {
            type_meta: TypeMeta::core(kinds::NAMESPACE),
            metadata: ObjectMeta::new(name, ""),
        }
    }
}

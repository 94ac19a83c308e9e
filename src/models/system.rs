use serde::{Deserialize, Serialize};

use super::equality::{deep_equal_by_eq, optional_deep_eq, optional_keyed_set_eq, DeepEqual, Keyed};
use super::meta::{kinds, ObjectMeta, TypeMeta};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificateInfo {
    #[serde(rename = "type")]
    pub cert_type: String,
    pub secret: String,
    /// Inventory fingerprint; used for matching, never rendered.
    #[serde(skip)]
    pub signature: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LicenseInfo {
    pub secret: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceParameterInfo {
    pub service: String,
    pub section: String,
    #[serde(rename = "paramname")]
    pub param_name: String,
    #[serde(rename = "paramvalue")]
    pub param_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageBackend {
    pub name: String,
    #[serde(rename = "type")]
    pub backend_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_factor: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrbdConfiguration {
    pub link_utilization: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerFileSystemInfo {
    pub name: String,
    pub size: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemStorageInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backends: Option<Vec<StorageBackend>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drbd: Option<DrbdConfiguration>,
    #[serde(default, rename = "filesystems", skip_serializing_if = "Option::is_none")]
    pub file_systems: Option<Vec<ControllerFileSystemInfo>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PtpInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mechanism: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_servers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ntp_servers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ptp: Option<PtpInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificates: Option<Vec<CertificateInfo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<LicenseInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_parameters: Option<Vec<ServiceParameterInfo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<SystemStorageInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vswitch_type: Option<String>,
}

/// Observed system attributes. Rendered with the resource and then scrubbed
/// from the manifest text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    pub system_type: String,
    pub system_mode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct System {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub metadata: ObjectMeta,
    pub spec: SystemSpec,
    pub status: SystemStatus,
}

impl System {
    pub fn new(name: &str, namespace: &str, spec: SystemSpec, status: SystemStatus) -> Self {
        Self {
            type_meta: TypeMeta::platform(kinds::SYSTEM),
            metadata: ObjectMeta::labelled(name, namespace),
            spec,
            status,
        }
    }
}

impl Keyed for CertificateInfo {
    type Key = (String, String);

    /// Certificates with a known fingerprint are matched on it, the others on
    /// the secret they reference.
    fn key(&self) -> (String, String) {
        if self.signature.is_empty() {
            (self.cert_type.clone(), self.secret.clone())
        } else {
            (self.cert_type.clone(), self.signature.clone())
        }
    }
}

impl Keyed for ServiceParameterInfo {
    type Key = (String, String, String, Option<String>, Option<String>);

    fn key(&self) -> Self::Key {
        (
            self.service.clone(),
            self.section.clone(),
            self.param_name.clone(),
            self.personality.clone(),
            self.resource.clone(),
        )
    }
}

impl Keyed for StorageBackend {
    type Key = String;

    fn key(&self) -> String {
        self.name.clone()
    }
}

impl Keyed for ControllerFileSystemInfo {
    type Key = String;

    fn key(&self) -> String {
        self.name.clone()
    }
}

deep_equal_by_eq!(
    CertificateInfo,
    ServiceParameterInfo,
    StorageBackend,
    ControllerFileSystemInfo,
    DrbdConfiguration,
    PtpInfo,
    LicenseInfo,
);

impl DeepEqual for SystemStorageInfo {
    fn deep_equal(&self, other: &Self) -> bool {
        optional_keyed_set_eq(&self.backends, &other.backends)
            && optional_deep_eq(&self.drbd, &other.drbd)
            && optional_keyed_set_eq(&self.file_systems, &other.file_systems)
    }
}

impl DeepEqual for SystemSpec {
    fn deep_equal(&self, other: &Self) -> bool {
        self.description == other.description
            && self.location == other.location
            && self.latitude == other.latitude
            && self.longitude == other.longitude
            && self.contact == other.contact
            && self.dns_servers == other.dns_servers
            && self.ntp_servers == other.ntp_servers
            && optional_deep_eq(&self.ptp, &other.ptp)
            && optional_keyed_set_eq(&self.certificates, &other.certificates)
            && optional_deep_eq(&self.license, &other.license)
            && optional_keyed_set_eq(&self.service_parameters, &other.service_parameters)
            && optional_deep_eq(&self.storage, &other.storage)
            && self.vswitch_type == other.vswitch_type
    }
}

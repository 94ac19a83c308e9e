use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::equality::{multimap_eq, DeepEqual};
use super::meta::{kinds, ObjectMeta, TypeMeta};

// --- Platform networks ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformNetworkSpec {
    #[serde(rename = "type")]
    pub network_type: String,
    pub dynamic: bool,
    #[serde(default)]
    pub associated_address_pools: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformNetwork {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub metadata: ObjectMeta,
    pub spec: PlatformNetworkSpec,
}

impl PlatformNetwork {
    pub fn new(name: &str, namespace: &str, spec: PlatformNetworkSpec) -> Self {
        Self {
            type_meta: TypeMeta::platform(kinds::PLATFORM_NETWORK),
            metadata: ObjectMeta::labelled(name, namespace),
            spec,
        }
    }
}

// --- Address pools ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationRange {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ranges: Vec<AllocationRange>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPoolSpec {
    pub subnet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floating_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller0_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller1_address: Option<String>,
    pub prefix: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    pub allocation: AllocationInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressPool {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub metadata: ObjectMeta,
    pub spec: AddressPoolSpec,
}

impl AddressPool {
    pub fn new(name: &str, namespace: &str, spec: AddressPoolSpec) -> Self {
        Self {
            type_meta: TypeMeta::platform(kinds::ADDRESS_POOL),
            metadata: ObjectMeta::labelled(name, namespace),
            spec,
        }
    }
}

// --- Data networks ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VxlanInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multicast_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udp_port_number: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_mode: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataNetworkSpec {
    #[serde(rename = "type")]
    pub network_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vxlan: Option<VxlanInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataNetwork {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub metadata: ObjectMeta,
    pub spec: DataNetworkSpec,
}

impl DataNetwork {
    pub fn new(name: &str, namespace: &str, spec: DataNetworkSpec) -> Self {
        Self {
            type_meta: TypeMeta::platform(kinds::DATA_NETWORK),
            metadata: ObjectMeta::labelled(name, namespace),
            spec,
        }
    }
}

// --- PTP ---

/// PTP parameters grouped by section, each section keeping inventory order.
pub type PtpParameters = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PtpInstanceSpec {
    pub service: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: PtpParameters,
}

impl DeepEqual for PtpInstanceSpec {
    fn deep_equal(&self, other: &Self) -> bool {
        self.service == other.service && multimap_eq(&self.parameters, &other.parameters)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PtpInstance {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub metadata: ObjectMeta,
    pub spec: PtpInstanceSpec,
}

impl PtpInstance {
    pub fn new(name: &str, namespace: &str, spec: PtpInstanceSpec) -> Self {
        Self {
            type_meta: TypeMeta::platform(kinds::PTP_INSTANCE),
            metadata: ObjectMeta::labelled(name, namespace),
            spec,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PtpInterfaceSpec {
    #[serde(rename = "ptpinstance")]
    pub ptp_instance: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: PtpParameters,
}

impl DeepEqual for PtpInterfaceSpec {
    fn deep_equal(&self, other: &Self) -> bool {
        self.ptp_instance == other.ptp_instance && multimap_eq(&self.parameters, &other.parameters)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PtpInterface {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub metadata: ObjectMeta,
    pub spec: PtpInterfaceSpec,
}

impl PtpInterface {
    pub fn new(name: &str, namespace: &str, spec: PtpInterfaceSpec) -> Self {
        Self {
            type_meta: TypeMeta::platform(kinds::PTP_INTERFACE),
            metadata: ObjectMeta::labelled(name, namespace),
            spec,
        }
    }
}

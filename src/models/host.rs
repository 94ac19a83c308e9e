use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::equality::{
    deep_equal_by_eq, keyed_set_eq, optional_deep_eq, optional_keyed_set_eq,
    optional_unordered_eq, unordered_eq, DeepEqual, Keyed,
};
use super::meta::{kinds, ObjectMeta, TypeMeta};

/// Page sizes understood by the memory configuration.
pub mod page_size {
    pub const SIZE_4KB: &str = "4KB";
    pub const SIZE_2MB: &str = "2MB";
    pub const SIZE_1GB: &str = "1GB";
}

/// Provisioning modes
pub mod provisioning_mode {
    pub const STATIC: &str = "static";
    pub const DYNAMIC: &str = "dynamic";
}

// --- Board management ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BmPasswordInfo {
    pub secret: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BmCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<BmPasswordInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BmInfo {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub bm_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<BmCredentials>,
}

// --- Processors and memory ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorFunctionInfo {
    pub function: String,
    pub count: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessorInfo {
    pub node: i32,
    pub functions: Vec<ProcessorFunctionInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryFunctionInfo {
    pub function: String,
    pub page_size: String,
    pub page_count: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryNodeInfo {
    pub node: i32,
    pub functions: Vec<MemoryFunctionInfo>,
}

// --- Storage ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitorInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JournalInfo {
    pub location: String,
    pub size: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OsdInfo {
    pub function: String,
    pub path: String,
    #[serde(default, rename = "cluster", skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<JournalInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysicalVolumeInfo {
    #[serde(rename = "type")]
    pub pv_type: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeGroupInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lvm_type: Option<String>,
    pub physical_volumes: Vec<PhysicalVolumeInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileSystemInfo {
    pub name: String,
    pub size: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStorageInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor: Option<MonitorInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub osds: Option<Vec<OsdInfo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_groups: Option<Vec<VolumeGroupInfo>>,
    #[serde(default, rename = "filesystems", skip_serializing_if = "Option::is_none")]
    pub file_systems: Option<Vec<FileSystemInfo>>,
}

impl ProfileStorageInfo {
    pub fn is_empty(&self) -> bool {
        self.monitor.is_none()
            && self.osds.is_none()
            && self.volume_groups.is_none()
            && self.file_systems.is_none()
    }
}

// --- Interfaces ---

/// Attributes shared by every interface type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonInterfaceInfo {
    pub name: String,
    pub class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_networks: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_networks: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ptp_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ptp_interfaces: Option<Vec<String>>,
    /// Inventory identifier, only carried until the uuid filter runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EthernetPortInfo {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthernetInfo {
    #[serde(flatten)]
    pub common: CommonInterfaceInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vf_count: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vf_driver: Option<String>,
    pub port: EthernetPortInfo,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub lower: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VlanInfo {
    #[serde(flatten)]
    pub common: CommonInterfaceInfo,
    pub lower: String,
    pub vid: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BondInfo {
    #[serde(flatten)]
    pub common: CommonInterfaceInfo,
    pub members: Vec<String>,
    pub mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transmit_hash_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_reselect: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VfInfo {
    #[serde(flatten)]
    pub common: CommonInterfaceInfo,
    pub lower: String,
    pub vf_count: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vf_driver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tx_rate: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterfaceInfo {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ethernet: Vec<EthernetInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vlan: Vec<VlanInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bond: Vec<BondInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vf: Vec<VfInfo>,
}

impl InterfaceInfo {
    /// Iterate the shared attributes of every interface, all types included.
    pub fn commons_mut(&mut self) -> impl Iterator<Item = &mut CommonInterfaceInfo> {
        self.ethernet
            .iter_mut()
            .map(|e| &mut e.common)
            .chain(self.vlan.iter_mut().map(|v| &mut v.common))
            .chain(self.bond.iter_mut().map(|b| &mut b.common))
            .chain(self.vf.iter_mut().map(|v| &mut v.common))
    }

    pub fn commons(&self) -> impl Iterator<Item = &CommonInterfaceInfo> {
        self.ethernet
            .iter()
            .map(|e| &e.common)
            .chain(self.vlan.iter().map(|v| &v.common))
            .chain(self.bond.iter().map(|b| &b.common))
            .chain(self.vf.iter().map(|v| &v.common))
    }

    pub fn is_empty(&self) -> bool {
        self.ethernet.is_empty() && self.vlan.is_empty() && self.bond.is_empty() && self.vf.is_empty()
    }
}

// --- Addresses and routes ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressInfo {
    pub interface: String,
    pub address: String,
    pub prefix: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteInfo {
    pub interface: String,
    #[serde(rename = "subnet")]
    pub network: String,
    pub prefix: i32,
    pub gateway: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<i32>,
}

// --- Profile ---

/// Everything a host can be configured with. Used both as a shared profile
/// and as the per-host overrides layered on top of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostProfileSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub administrative_state: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subfunctions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub console: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boot_device: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_on: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_mode: Option<String>,
    #[serde(default, rename = "bootMAC", skip_serializing_if = "Option::is_none")]
    pub boot_mac: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ptp_instances: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_device: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock_synchronization: Option<String>,
    #[serde(
        default,
        rename = "maxCPUMhzConfigured",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_cpu_mhz_configured: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_armor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hw_settle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kernel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_management: Option<BmInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub processors: Vec<ProcessorInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub memory: Vec<MemoryNodeInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<ProfileStorageInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interfaces: Option<InterfaceInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<AddressInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<RouteInfo>,
}

impl HostProfileSpec {
    pub fn has_subfunction(&self, function: &str) -> bool {
        self.subfunctions.iter().any(|s| s == function)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostProfile {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub metadata: ObjectMeta,
    pub spec: HostProfileSpec,
}

impl HostProfile {
    pub fn new(name: &str, namespace: &str, spec: HostProfileSpec) -> Self {
        Self {
            type_meta: TypeMeta::platform(kinds::HOST_PROFILE),
            metadata: ObjectMeta::labelled(name, namespace),
            spec,
        }
    }
}

// --- Host ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchDmiInfo {
    #[serde(rename = "serialNumber")]
    pub serial_number: String,
}

/// Attributes used to recognise a host that has not been provisioned yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchInfo {
    #[serde(default, rename = "bootMAC", skip_serializing_if = "Option::is_none")]
    pub boot_mac: Option<String>,
    #[serde(default, rename = "dmi", skip_serializing_if = "Option::is_none")]
    pub dmi: Option<MatchDmiInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostSpec {
    pub profile: String,
    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_info: Option<MatchInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<HostProfileSpec>,
}

impl HostSpec {
    /// Overrides, created on first use.
    pub fn overrides_mut(&mut self) -> &mut HostProfileSpec {
        self.overrides.get_or_insert_with(HostProfileSpec::default)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Host {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub metadata: ObjectMeta,
    pub spec: HostSpec,
}

impl Host {
    pub fn new(name: &str, namespace: &str, spec: HostSpec) -> Self {
        Self {
            type_meta: TypeMeta::platform(kinds::HOST),
            metadata: ObjectMeta::labelled(name, namespace),
            spec,
        }
    }
}

// --- Keys ---

impl Keyed for ProcessorFunctionInfo {
    type Key = String;

    fn key(&self) -> String {
        self.function.clone()
    }
}

impl Keyed for ProcessorInfo {
    type Key = i32;

    fn key(&self) -> i32 {
        self.node
    }
}

impl Keyed for MemoryFunctionInfo {
    type Key = (String, String);

    fn key(&self) -> (String, String) {
        (self.function.clone(), self.page_size.clone())
    }
}

impl Keyed for MemoryNodeInfo {
    type Key = i32;

    fn key(&self) -> i32 {
        self.node
    }
}

impl Keyed for OsdInfo {
    type Key = String;

    fn key(&self) -> String {
        self.path.clone()
    }
}

impl Keyed for PhysicalVolumeInfo {
    type Key = (String, String);

    fn key(&self) -> (String, String) {
        (self.pv_type.clone(), self.path.clone())
    }
}

impl Keyed for VolumeGroupInfo {
    type Key = String;

    fn key(&self) -> String {
        self.name.clone()
    }
}

impl Keyed for FileSystemInfo {
    type Key = String;

    fn key(&self) -> String {
        self.name.clone()
    }
}

impl Keyed for EthernetInfo {
    type Key = String;

    fn key(&self) -> String {
        self.port.name.clone()
    }
}

impl Keyed for VlanInfo {
    type Key = (String, String);

    fn key(&self) -> (String, String) {
        (self.common.name.clone(), self.common.class.clone())
    }
}

impl Keyed for BondInfo {
    type Key = (String, String);

    fn key(&self) -> (String, String) {
        (self.common.name.clone(), self.common.class.clone())
    }
}

impl Keyed for VfInfo {
    type Key = (String, String);

    fn key(&self) -> (String, String) {
        (self.common.name.clone(), self.common.class.clone())
    }
}

impl Keyed for AddressInfo {
    type Key = String;

    fn key(&self) -> String {
        self.address.clone()
    }
}

impl Keyed for RouteInfo {
    type Key = (String, String, i32);

    fn key(&self) -> (String, String, i32) {
        (self.interface.clone(), self.network.clone(), self.prefix)
    }
}

// --- Structural equality ---

deep_equal_by_eq!(
    ProcessorFunctionInfo,
    MemoryFunctionInfo,
    MonitorInfo,
    OsdInfo,
    PhysicalVolumeInfo,
    FileSystemInfo,
    AddressInfo,
    RouteInfo,
    BmInfo,
);

impl DeepEqual for ProcessorInfo {
    fn deep_equal(&self, other: &Self) -> bool {
        self.node == other.node && keyed_set_eq(&self.functions, &other.functions)
    }
}

impl DeepEqual for MemoryNodeInfo {
    fn deep_equal(&self, other: &Self) -> bool {
        self.node == other.node && keyed_set_eq(&self.functions, &other.functions)
    }
}

impl DeepEqual for VolumeGroupInfo {
    fn deep_equal(&self, other: &Self) -> bool {
        self.name == other.name
            && self.lvm_type == other.lvm_type
            && keyed_set_eq(&self.physical_volumes, &other.physical_volumes)
    }
}

impl DeepEqual for ProfileStorageInfo {
    fn deep_equal(&self, other: &Self) -> bool {
        optional_deep_eq(&self.monitor, &other.monitor)
            && optional_keyed_set_eq(&self.osds, &other.osds)
            && optional_keyed_set_eq(&self.volume_groups, &other.volume_groups)
            && optional_keyed_set_eq(&self.file_systems, &other.file_systems)
    }
}

impl DeepEqual for CommonInterfaceInfo {
    fn deep_equal(&self, other: &Self) -> bool {
        self.name == other.name
            && self.class == other.class
            && self.mtu == other.mtu
            && optional_unordered_eq(&self.platform_networks, &other.platform_networks)
            && optional_unordered_eq(&self.data_networks, &other.data_networks)
            && self.ptp_role == other.ptp_role
            && optional_unordered_eq(&self.ptp_interfaces, &other.ptp_interfaces)
            && self.uuid == other.uuid
    }
}

impl DeepEqual for EthernetInfo {
    fn deep_equal(&self, other: &Self) -> bool {
        self.common.deep_equal(&other.common)
            && self.vf_count == other.vf_count
            && self.vf_driver == other.vf_driver
            && self.port == other.port
            && self.lower == other.lower
    }
}

impl DeepEqual for VlanInfo {
    fn deep_equal(&self, other: &Self) -> bool {
        self.common.deep_equal(&other.common) && self.lower == other.lower && self.vid == other.vid
    }
}

impl DeepEqual for BondInfo {
    fn deep_equal(&self, other: &Self) -> bool {
        self.common.deep_equal(&other.common)
            && unordered_eq(&self.members, &other.members)
            && self.mode == other.mode
            && self.transmit_hash_policy == other.transmit_hash_policy
            && self.primary_reselect == other.primary_reselect
    }
}

impl DeepEqual for VfInfo {
    fn deep_equal(&self, other: &Self) -> bool {
        self.common.deep_equal(&other.common)
            && self.lower == other.lower
            && self.vf_count == other.vf_count
            && self.vf_driver == other.vf_driver
            && self.max_tx_rate == other.max_tx_rate
    }
}

impl DeepEqual for InterfaceInfo {
    fn deep_equal(&self, other: &Self) -> bool {
        keyed_set_eq(&self.ethernet, &other.ethernet)
            && keyed_set_eq(&self.vlan, &other.vlan)
            && keyed_set_eq(&self.bond, &other.bond)
            && keyed_set_eq(&self.vf, &other.vf)
    }
}

impl DeepEqual for HostProfileSpec {
    fn deep_equal(&self, other: &Self) -> bool {
        self.personality == other.personality
            && self.administrative_state == other.administrative_state
            && unordered_eq(&self.subfunctions, &other.subfunctions)
            && self.location == other.location
            && self.labels == other.labels
            && self.install_output == other.install_output
            && self.console == other.console
            && self.boot_device == other.boot_device
            && self.power_on == other.power_on
            && self.provisioning_mode == other.provisioning_mode
            && self.boot_mac == other.boot_mac
            && unordered_eq(&self.ptp_instances, &other.ptp_instances)
            && self.root_device == other.root_device
            && self.clock_synchronization == other.clock_synchronization
            && self.max_cpu_mhz_configured == other.max_cpu_mhz_configured
            && self.app_armor == other.app_armor
            && self.hw_settle == other.hw_settle
            && self.kernel == other.kernel
            && optional_deep_eq(&self.board_management, &other.board_management)
            && keyed_set_eq(&self.processors, &other.processors)
            && keyed_set_eq(&self.memory, &other.memory)
            && optional_deep_eq(&self.storage, &other.storage)
            && optional_deep_eq(&self.interfaces, &other.interfaces)
            && keyed_set_eq(&self.addresses, &other.addresses)
            && keyed_set_eq(&self.routes, &other.routes)
    }
}

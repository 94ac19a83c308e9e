use serde::{Deserialize, Serialize};

// --- System scope ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemCapabilities {
    pub vswitch_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct System {
    #[serde(rename = "uuid")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub location: String,
    pub contact: String,
    pub latitude: String,
    pub longitude: String,
    pub system_type: String,
    pub system_mode: String,
    pub software_version: String,
    pub capabilities: SystemCapabilities,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Drbd {
    #[serde(rename = "uuid")]
    pub id: String,
    pub link_util: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dns {
    #[serde(rename = "uuid")]
    pub id: String,
    pub nameservers: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Ntp {
    #[serde(rename = "uuid")]
    pub id: String,
    pub ntpservers: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Ptp {
    #[serde(rename = "uuid")]
    pub id: String,
    pub mode: String,
    pub transport: String,
    pub mechanism: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Certificate {
    #[serde(rename = "uuid")]
    pub id: String,
    #[serde(rename = "certtype")]
    pub cert_type: String,
    pub signature: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceParameter {
    #[serde(rename = "uuid")]
    pub id: String,
    pub service: String,
    pub section: String,
    pub name: String,
    pub value: String,
    pub personality: Option<String>,
    pub resource: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageBackendCapabilities {
    pub replication: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageBackend {
    #[serde(rename = "uuid")]
    pub id: String,
    pub name: String,
    pub backend: String,
    pub network: String,
    pub capabilities: StorageBackendCapabilities,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerFileSystem {
    #[serde(rename = "uuid")]
    pub id: String,
    pub name: String,
    pub size: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct License {
    pub content: String,
    pub error: String,
}

// --- Networking ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Network {
    #[serde(rename = "uuid")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub network_type: String,
    pub dynamic: bool,
    pub pool_uuid: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressPool {
    #[serde(rename = "uuid")]
    pub id: String,
    pub name: String,
    pub network: String,
    pub prefix: i32,
    pub gateway_address: Option<String>,
    pub floating_address: Option<String>,
    pub controller0_address: Option<String>,
    pub controller1_address: Option<String>,
    pub order: String,
    pub ranges: Vec<Vec<String>>,
}

/// Association row joining a platform network to one of its address pools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkAddressPool {
    #[serde(rename = "uuid")]
    pub id: String,
    pub network_uuid: String,
    pub address_pool_uuid: String,
    pub network_name: String,
    pub address_pool_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataNetwork {
    #[serde(rename = "uuid")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub network_type: String,
    pub mtu: i32,
    pub mode: Option<String>,
    pub multicast_group: Option<String>,
    pub port_num: Option<i32>,
    pub ttl: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PtpInstance {
    #[serde(rename = "uuid")]
    pub id: String,
    pub name: String,
    pub service: String,
    pub hostnames: Vec<String>,
    pub parameters: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PtpInterface {
    #[serde(rename = "uuid")]
    pub id: String,
    pub name: String,
    pub ptp_instance_name: String,
    pub interface_names: Vec<String>,
    pub parameters: Vec<String>,
}

// --- Hosts ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostLocation {
    pub locn: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Host {
    #[serde(rename = "uuid")]
    pub id: String,
    pub hostname: String,
    pub personality: String,
    pub subfunctions: String,
    pub location: HostLocation,
    pub install_output: String,
    pub console: String,
    #[serde(rename = "mgmt_mac")]
    pub boot_mac: String,
    #[serde(rename = "rootfs_device")]
    pub root_device: String,
    pub boot_device: String,
    pub bm_type: Option<String>,
    #[serde(rename = "bm_ip")]
    pub bm_address: Option<String>,
    pub bm_username: Option<String>,
    pub task: Option<String>,
    #[serde(rename = "administrative")]
    pub administrative_state: String,
    #[serde(rename = "operational")]
    pub operational_status: String,
    #[serde(rename = "availability")]
    pub availability_status: String,
    pub clock_synchronization: Option<String>,
    pub max_cpu_mhz_configured: String,
    pub apparmor: String,
    pub hw_settle: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Label {
    #[serde(rename = "uuid")]
    pub id: String,
    #[serde(rename = "label_key")]
    pub key: String,
    #[serde(rename = "label_value")]
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Cpu {
    #[serde(rename = "uuid")]
    pub id: String,
    #[serde(rename = "numa_node")]
    pub processor: i32,
    #[serde(rename = "cpu")]
    pub logical_core: i32,
    #[serde(rename = "core")]
    pub physical_core: i32,
    pub thread: i32,
    #[serde(rename = "allocated_function")]
    pub function: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Memory {
    #[serde(rename = "uuid")]
    pub id: String,
    #[serde(rename = "numa_node")]
    pub processor: i32,
    #[serde(rename = "platform_reserved_mib")]
    pub platform: i64,
    #[serde(rename = "vm_hugepages_nr_1G")]
    pub vm_1g_hugepages_count: i32,
    #[serde(rename = "vm_hugepages_nr_1G_pending")]
    pub vm_1g_hugepages_pending: Option<i32>,
    #[serde(rename = "vm_hugepages_nr_2M")]
    pub vm_2m_hugepages_count: i32,
    #[serde(rename = "vm_hugepages_nr_2M_pending")]
    pub vm_2m_hugepages_pending: Option<i32>,
    #[serde(rename = "vswitch_hugepages_size_mib")]
    pub vswitch_hugepages_size: i32,
    #[serde(rename = "vswitch_hugepages_nr")]
    pub vswitch_hugepages_count: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Interface {
    #[serde(rename = "uuid")]
    pub id: String,
    #[serde(rename = "ifname")]
    pub name: String,
    #[serde(rename = "iftype")]
    pub if_type: String,
    #[serde(rename = "ifclass")]
    pub class: String,
    #[serde(rename = "imtu")]
    pub mtu: i32,
    #[serde(rename = "vlan_id")]
    pub vid: Option<i32>,
    pub ipv4_pool: Option<String>,
    pub ipv6_pool: Option<String>,
    #[serde(rename = "aemode")]
    pub ae_mode: Option<String>,
    #[serde(rename = "txhashpolicy")]
    pub ae_transmit_hash: Option<String>,
    #[serde(rename = "primary_reselect")]
    pub ae_primary_reselect: Option<String>,
    #[serde(rename = "sriov_numvfs")]
    pub vf_count: Option<i32>,
    #[serde(rename = "sriov_vf_driver")]
    pub vf_driver: Option<String>,
    pub uses: Vec<String>,
    pub ptp_role: Option<String>,
    pub max_tx_rate: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Port {
    #[serde(rename = "uuid")]
    pub id: String,
    pub name: String,
    #[serde(rename = "interface_uuid")]
    pub interface_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    #[serde(rename = "uuid")]
    pub id: String,
    pub address: String,
    pub prefix: i32,
    #[serde(rename = "ifname")]
    pub interface_name: String,
    pub pool_uuid: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Route {
    #[serde(rename = "uuid")]
    pub id: String,
    pub network: String,
    pub prefix: i32,
    pub gateway: String,
    pub metric: i32,
    #[serde(rename = "ifname")]
    pub interface_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Disk {
    #[serde(rename = "uuid")]
    pub id: String,
    pub device_path: String,
    pub device_node: String,
    pub device_id: String,
    #[serde(rename = "size_mib")]
    pub size: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Partition {
    #[serde(rename = "uuid")]
    pub id: String,
    pub device_path: String,
    pub device_node: String,
    #[serde(rename = "size_mib")]
    pub size: i64,
    #[serde(rename = "ipv_uuid")]
    pub physical_volume_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalVolume {
    #[serde(rename = "uuid")]
    pub id: String,
    #[serde(rename = "pv_type")]
    pub pv_type: String,
    #[serde(rename = "disk_or_part_device_path")]
    pub device_path: String,
    #[serde(rename = "disk_or_part_uuid")]
    pub device_uuid: String,
    #[serde(rename = "ilvg_uuid")]
    pub volume_group_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeGroupCapabilities {
    pub lvm_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeGroup {
    #[serde(rename = "uuid")]
    pub id: String,
    #[serde(rename = "lvm_vg_name")]
    pub name: String,
    pub capabilities: VolumeGroupCapabilities,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Osd {
    #[serde(rename = "uuid")]
    pub id: String,
    pub function: String,
    #[serde(rename = "idisk_uuid")]
    pub disk_id: String,
    pub tier_uuid: String,
    pub journal_location: Option<String>,
    pub journal_path: Option<String>,
    pub journal_size_mib: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CephMonitor {
    #[serde(rename = "uuid")]
    pub id: String,
    pub hostname: String,
    #[serde(rename = "ceph_mon_gib")]
    pub size: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostFileSystem {
    #[serde(rename = "uuid")]
    pub id: String,
    pub name: String,
    pub size: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InterfaceNetwork {
    #[serde(rename = "uuid")]
    pub id: String,
    pub interface_uuid: String,
    pub network_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InterfaceDataNetwork {
    #[serde(rename = "uuid")]
    pub id: String,
    pub interface_uuid: String,
    pub datanetwork_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Cluster {
    #[serde(rename = "uuid")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageTier {
    #[serde(rename = "uuid")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Kernel {
    pub hostname: String,
    pub provisioned_kernel: String,
    pub running_kernel: String,
}

/// Canonical inventory values the assembler and filters branch on.
pub mod values {
    pub const CONTROLLER_0: &str = "controller-0";

    pub const PERSONALITY_CONTROLLER: &str = "controller";
    pub const PERSONALITY_WORKER: &str = "worker";
    pub const SUBFUNCTION_WORKER: &str = "worker";

    pub const AVAIL_POWER_OFF: &str = "power-off";
    pub const TASK_POWERING_ON: &str = "Powering-on";
    pub const TASK_POWERING_OFF: &str = "Powering-off";

    pub const CPU_FUNCTION_PLATFORM: &str = "platform";
    pub const CPU_FUNCTION_VSWITCH: &str = "vswitch";
    pub const CPU_FUNCTION_APPLICATION: &str = "applications";

    pub const MEMORY_FUNCTION_PLATFORM: &str = "platform";
    pub const MEMORY_FUNCTION_VSWITCH: &str = "vswitch";
    pub const MEMORY_FUNCTION_VM: &str = "vm";

    pub const IF_TYPE_ETHERNET: &str = "ethernet";
    pub const IF_TYPE_VLAN: &str = "vlan";
    pub const IF_TYPE_AE: &str = "ae";
    pub const IF_TYPE_VIRTUAL: &str = "virtual";
    pub const IF_TYPE_VF: &str = "vf";

    pub const IF_CLASS_NONE: &str = "none";
    pub const IF_CLASS_PCI_SRIOV: &str = "pci-sriov";

    pub const LOOPBACK_INTERFACE: &str = "lo";
    pub const DEFAULT_MTU: i32 = 1500;

    pub const PV_TYPE_PARTITION: &str = "partition";
    pub const STORAGE_TIER_NAME: &str = "storage";
    pub const SYSTEM_VOLUME_GROUPS: &[&str] = &["cgts-vg"];

    pub const DATANETWORK_TYPE_VXLAN: &str = "vxlan";
    pub const DATANETWORK_DEFAULT_MTU: i32 = 1500;
    pub const ENDPOINT_MODE_DYNAMIC: &str = "dynamic";

    pub const PLATFORM_CA_CERTIFICATE: &str = "ssl_ca";
    pub const OPENSTACK_CA_CERTIFICATE: &str = "openstack_ca";

    pub const KERNEL_STANDARD: &str = "standard";

    /// Platform network types exported as PlatformNetwork resources.
    pub const EXPORTED_NETWORK_TYPES: &[&str] = &["oam", "mgmt", "admin", "storage"];
}

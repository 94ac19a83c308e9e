//! In-memory inventory used by unit tests, with canned lab fixtures.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

use super::types::*;
use super::Inventory;
use crate::error::BuildError;

/// Per-host sub-resources.
#[derive(Debug, Clone, Default)]
pub struct HostFixture {
    pub host: Host,
    pub kernel: Option<Kernel>,
    pub labels: Vec<Label>,
    pub cpus: Vec<Cpu>,
    pub memory: Vec<Memory>,
    pub interfaces: Vec<Interface>,
    pub ports: Vec<Port>,
    pub addresses: Vec<Address>,
    pub routes: Vec<Route>,
    pub disks: Vec<Disk>,
    pub partitions: Vec<Partition>,
    pub physical_volumes: Vec<PhysicalVolume>,
    pub volume_groups: Vec<VolumeGroup>,
    pub osds: Vec<Osd>,
    pub file_systems: Vec<HostFileSystem>,
    pub interface_networks: Vec<InterfaceNetwork>,
    pub interface_data_networks: Vec<InterfaceDataNetwork>,
    pub ptp_instances: Vec<PtpInstance>,
    pub ptp_interfaces: Vec<PtpInterface>,
}

#[derive(Debug, Clone, Default)]
pub struct FakeInventory {
    pub systems: Vec<System>,
    pub drbd: Vec<Drbd>,
    pub dns: Vec<Dns>,
    pub ntp: Vec<Ntp>,
    pub ptp: Vec<Ptp>,
    pub certificates: Vec<Certificate>,
    pub service_parameters: Vec<ServiceParameter>,
    pub storage_backends: Vec<StorageBackend>,
    pub controller_filesystems: Vec<ControllerFileSystem>,
    pub license: Option<License>,
    pub networks: Vec<Network>,
    pub address_pools: Vec<AddressPool>,
    pub network_address_pools: Vec<NetworkAddressPool>,
    pub data_networks: Vec<DataNetwork>,
    pub ptp_instances: Vec<PtpInstance>,
    pub ptp_interfaces: Vec<PtpInterface>,
    pub ceph_monitors: Vec<CephMonitor>,
    pub clusters: Vec<Cluster>,
    /// Storage tiers keyed by cluster id.
    pub storage_tiers: HashMap<String, Vec<StorageTier>>,
    /// Partitions only reachable by id.
    pub system_partitions: Vec<Partition>,
    pub hosts: Vec<HostFixture>,
    /// Name of the trait method that answers with `InventoryUnavailable`.
    pub fail_on: Option<&'static str>,
}

impl FakeInventory {
    fn check(&self, operation: &'static str) -> Result<()> {
        if self.fail_on == Some(operation) {
            return Err(BuildError::unavailable(operation, "connection refused").into());
        }
        Ok(())
    }

    fn fixture(&self, operation: &'static str, host_id: &str) -> Result<&HostFixture> {
        self.check(operation)?;
        self.hosts
            .iter()
            .find(|f| f.host.id == host_id)
            .ok_or_else(|| BuildError::inconsistent("host", host_id).into())
    }

    /// A single All-in-one simplex controller, the smallest real lab.
    pub fn aio_simplex() -> Self {
        Self {
            systems: vec![System {
                id: "s-1".to_string(),
                name: "vbox".to_string(),
                description: "Virtual box lab".to_string(),
                location: "Ottawa".to_string(),
                contact: "info@example.com".to_string(),
                system_type: "All-in-one".to_string(),
                system_mode: "simplex".to_string(),
                software_version: "22.12".to_string(),
                capabilities: SystemCapabilities {
                    vswitch_type: "none".to_string(),
                },
                ..Default::default()
            }],
            drbd: vec![Drbd {
                id: "drbd-1".to_string(),
                link_util: 40,
            }],
            dns: vec![Dns {
                id: "dns-1".to_string(),
                nameservers: "8.8.8.8,8.8.4.4".to_string(),
            }],
            ntp: vec![Ntp {
                id: "ntp-1".to_string(),
                ntpservers: "0.pool.ntp.org,1.pool.ntp.org".to_string(),
            }],
            ptp: vec![Ptp {
                id: "ptp-1".to_string(),
                mode: "hardware".to_string(),
                transport: "l2".to_string(),
                mechanism: "e2e".to_string(),
            }],
            certificates: vec![
                Certificate {
                    id: "cert-1".to_string(),
                    cert_type: "ssl".to_string(),
                    signature: "ssl_8823".to_string(),
                },
                Certificate {
                    id: "cert-2".to_string(),
                    cert_type: "ssl_ca".to_string(),
                    signature: "ssl_ca_1122".to_string(),
                },
            ],
            service_parameters: vec![ServiceParameter {
                id: "sp-1".to_string(),
                service: "platform".to_string(),
                section: "maintenance".to_string(),
                name: "heartbeat_period".to_string(),
                value: "100".to_string(),
                personality: None,
                resource: None,
            }],
            storage_backends: vec![StorageBackend {
                id: "sb-1".to_string(),
                name: "ceph-store".to_string(),
                backend: "ceph".to_string(),
                network: "mgmt".to_string(),
                capabilities: StorageBackendCapabilities {
                    replication: "1".to_string(),
                },
            }],
            controller_filesystems: vec![
                ControllerFileSystem {
                    id: "cfs-1".to_string(),
                    name: "database".to_string(),
                    size: 10,
                },
                ControllerFileSystem {
                    id: "cfs-2".to_string(),
                    name: "platform".to_string(),
                    size: 10,
                },
            ],
            license: None,
            networks: vec![
                network("n-mgmt", "mgmt", "mgmt", true, Some("p-mgmt")),
                network("n-oam", "oam", "oam", false, Some("p-oam")),
                network("n-ch", "cluster-host", "cluster-host", true, Some("p-ch")),
            ],
            address_pools: vec![
                pool("p-mgmt", "management", "192.168.204.0", 24, None),
                pool("p-oam", "oam", "10.10.10.0", 24, Some("10.10.10.1")),
                pool("p-ch", "cluster-host-subnet", "192.168.206.0", 24, None),
            ],
            network_address_pools: vec![
                NetworkAddressPool {
                    id: "nap-1".to_string(),
                    network_uuid: "n-mgmt".to_string(),
                    address_pool_uuid: "p-mgmt".to_string(),
                    network_name: "mgmt".to_string(),
                    address_pool_name: "management".to_string(),
                },
                NetworkAddressPool {
                    id: "nap-2".to_string(),
                    network_uuid: "n-oam".to_string(),
                    address_pool_uuid: "p-oam".to_string(),
                    network_name: "oam".to_string(),
                    address_pool_name: "oam".to_string(),
                },
            ],
            data_networks: vec![DataNetwork {
                id: "dn-1".to_string(),
                name: "group0-data0".to_string(),
                network_type: "vlan".to_string(),
                mtu: 1500,
                ..Default::default()
            }],
            hosts: vec![controller_0()],
            ..Default::default()
        }
    }

    /// The simplex lab plus identical workers, one per MAC address given.
    pub fn with_workers(macs: &[&str]) -> Self {
        let mut inv = Self::aio_simplex();
        for (index, mac) in macs.iter().enumerate() {
            inv.hosts.push(worker(index, mac));
        }
        inv
    }
}

fn network(id: &str, name: &str, kind: &str, dynamic: bool, pool: Option<&str>) -> Network {
    Network {
        id: id.to_string(),
        name: name.to_string(),
        network_type: kind.to_string(),
        dynamic,
        pool_uuid: pool.map(|p| p.to_string()),
    }
}

fn pool(id: &str, name: &str, subnet: &str, prefix: i32, gateway: Option<&str>) -> AddressPool {
    let base = subnet.trim_end_matches(".0");
    AddressPool {
        id: id.to_string(),
        name: name.to_string(),
        network: subnet.to_string(),
        prefix,
        gateway_address: gateway.map(|g| g.to_string()),
        floating_address: Some(format!("{}.2", base)),
        controller0_address: Some(format!("{}.3", base)),
        controller1_address: Some(format!("{}.4", base)),
        order: "random".to_string(),
        ranges: vec![vec![format!("{}.1", base), format!("{}.254", base)]],
    }
}

fn cpu(node: i32, core: i32, thread: i32, function: &str) -> Cpu {
    Cpu {
        id: format!("cpu-{}-{}-{}", node, core, thread),
        processor: node,
        logical_core: core * 2 + thread,
        physical_core: core,
        thread,
        function: function.to_string(),
    }
}

pub fn ethernet(id: &str, name: &str, class: &str, mtu: i32) -> Interface {
    Interface {
        id: id.to_string(),
        name: name.to_string(),
        if_type: values::IF_TYPE_ETHERNET.to_string(),
        class: class.to_string(),
        mtu,
        ..Default::default()
    }
}

pub fn port(interface_id: &str, name: &str) -> Port {
    Port {
        id: format!("port-{}", name),
        name: name.to_string(),
        interface_id: interface_id.to_string(),
    }
}

fn binding(interface_id: &str, network: &str) -> InterfaceNetwork {
    InterfaceNetwork {
        id: format!("in-{}-{}", interface_id, network),
        interface_uuid: interface_id.to_string(),
        network_name: network.to_string(),
    }
}

fn data_binding(interface_id: &str, network: &str) -> InterfaceDataNetwork {
    InterfaceDataNetwork {
        id: format!("idn-{}-{}", interface_id, network),
        interface_uuid: interface_id.to_string(),
        datanetwork_name: network.to_string(),
    }
}

fn root_disk() -> Disk {
    Disk {
        id: "d-1".to_string(),
        device_path: "/dev/disk/by-path/pci-0000:00:0d.0-ata-1.0".to_string(),
        device_node: "/dev/sda".to_string(),
        device_id: "ata-VBOX_HARDDISK_VB1".to_string(),
        size: 250_000,
    }
}

fn standard_kernel(hostname: &str) -> Option<Kernel> {
    Some(Kernel {
        hostname: hostname.to_string(),
        provisioned_kernel: values::KERNEL_STANDARD.to_string(),
        running_kernel: values::KERNEL_STANDARD.to_string(),
    })
}

fn controller_0() -> HostFixture {
    let mut lo = ethernet("if-lo", "lo", "platform", 1500);
    lo.if_type = values::IF_TYPE_VIRTUAL.to_string();

    HostFixture {
        host: Host {
            id: "h-0".to_string(),
            hostname: "controller-0".to_string(),
            personality: "controller".to_string(),
            subfunctions: "controller,worker".to_string(),
            install_output: "text".to_string(),
            console: "ttyS0,115200".to_string(),
            boot_mac: "08:00:27:00:00:01".to_string(),
            root_device: "sda".to_string(),
            boot_device: "/dev/sda".to_string(),
            administrative_state: "unlocked".to_string(),
            operational_status: "enabled".to_string(),
            availability_status: "available".to_string(),
            clock_synchronization: Some("ntp".to_string()),
            apparmor: "disabled".to_string(),
            hw_settle: "0".to_string(),
            ..Default::default()
        },
        kernel: standard_kernel("controller-0"),
        cpus: vec![
            cpu(0, 0, 0, "Platform"),
            cpu(0, 0, 1, "Platform"),
            cpu(0, 1, 0, "Platform"),
            cpu(0, 1, 1, "Platform"),
            cpu(0, 2, 0, "Applications"),
            cpu(0, 2, 1, "Applications"),
            cpu(0, 3, 0, "Applications"),
            cpu(0, 3, 1, "Applications"),
        ],
        memory: vec![Memory {
            id: "m-0".to_string(),
            processor: 0,
            platform: 8000,
            vm_2m_hugepages_count: 1024,
            vm_1g_hugepages_count: 0,
            vswitch_hugepages_size: 1024,
            vswitch_hugepages_count: 0,
            ..Default::default()
        }],
        interfaces: vec![
            lo,
            ethernet("if-oam", "oam0", "platform", 1500),
            ethernet("if-mgmt", "mgmt0", "platform", 1500),
            ethernet("if-data", "data0", "data", 1500),
            ethernet("if-spare", "enp0s10", "none", 1500),
        ],
        ports: vec![
            port("if-oam", "enp0s3"),
            port("if-mgmt", "enp0s8"),
            port("if-data", "enp0s9"),
            port("if-spare", "enp0s10"),
        ],
        interface_networks: vec![
            binding("if-oam", "oam"),
            binding("if-mgmt", "mgmt"),
            binding("if-mgmt", "cluster-host"),
        ],
        interface_data_networks: vec![data_binding("if-data", "group0-data0")],
        addresses: vec![
            Address {
                id: "a-1".to_string(),
                address: "10.10.10.3".to_string(),
                prefix: 24,
                interface_name: "oam0".to_string(),
                pool_uuid: Some("p-oam".to_string()),
            },
            Address {
                id: "a-2".to_string(),
                address: "192.168.100.10".to_string(),
                prefix: 24,
                interface_name: "data0".to_string(),
                pool_uuid: None,
            },
        ],
        routes: vec![Route {
            id: "r-1".to_string(),
            network: "0.0.0.0".to_string(),
            prefix: 0,
            gateway: "192.168.100.1".to_string(),
            metric: 1,
            interface_name: "data0".to_string(),
        }],
        disks: vec![root_disk()],
        partitions: vec![Partition {
            id: "p-1".to_string(),
            device_path: "/dev/disk/by-path/pci-0000:00:0d.0-ata-1.0-part4".to_string(),
            device_node: "/dev/sda4".to_string(),
            size: 30720,
            physical_volume_id: Some("pv-1".to_string()),
        }],
        physical_volumes: vec![PhysicalVolume {
            id: "pv-1".to_string(),
            pv_type: values::PV_TYPE_PARTITION.to_string(),
            device_path: "/dev/disk/by-path/pci-0000:00:0d.0-ata-1.0-part4".to_string(),
            device_uuid: "p-1".to_string(),
            volume_group_id: "vg-1".to_string(),
        }],
        volume_groups: vec![VolumeGroup {
            id: "vg-1".to_string(),
            name: "cgts-vg".to_string(),
            capabilities: VolumeGroupCapabilities { lvm_type: None },
        }],
        file_systems: vec![
            HostFileSystem {
                id: "hfs-1".to_string(),
                name: "backup".to_string(),
                size: 25,
            },
            HostFileSystem {
                id: "hfs-2".to_string(),
                name: "docker".to_string(),
                size: 30,
            },
        ],
        ..Default::default()
    }
}

/// A plain worker; every worker built here has the same shape apart from
/// identity, MAC and board management address.
pub fn worker(index: usize, mac: &str) -> HostFixture {
    let hostname = format!("worker-{}", index);

    HostFixture {
        host: Host {
            id: format!("h-w{}", index),
            hostname: hostname.clone(),
            personality: "worker".to_string(),
            subfunctions: "worker".to_string(),
            install_output: "text".to_string(),
            console: "ttyS0,115200".to_string(),
            boot_mac: mac.to_string(),
            root_device: "/dev/disk/by-path/pci-0000:00:0d.0-ata-1.0".to_string(),
            boot_device: "/dev/disk/by-path/pci-0000:00:0d.0-ata-1.0".to_string(),
            bm_type: Some("ipmi".to_string()),
            bm_address: Some(format!("10.10.10.{}", 130 + index)),
            bm_username: Some("admin".to_string()),
            administrative_state: "unlocked".to_string(),
            operational_status: "enabled".to_string(),
            availability_status: "available".to_string(),
            location: HostLocation {
                locn: Some(format!("rack {}", index)),
            },
            ..Default::default()
        },
        kernel: standard_kernel(&hostname),
        cpus: vec![
            cpu(0, 0, 0, "Platform"),
            cpu(0, 1, 0, "Applications"),
            cpu(0, 2, 0, "Applications"),
        ],
        memory: vec![Memory {
            id: format!("m-w{}", index),
            processor: 0,
            platform: 2000,
            vm_2m_hugepages_count: 512,
            vswitch_hugepages_size: 2,
            vswitch_hugepages_count: 0,
            ..Default::default()
        }],
        interfaces: vec![
            ethernet("if-w-mgmt", "mgmt0", "platform", 1500),
            ethernet("if-w-data", "data0", "data", 1500),
        ],
        ports: vec![port("if-w-mgmt", "enp0s3"), port("if-w-data", "enp0s8")],
        interface_networks: vec![
            binding("if-w-mgmt", "mgmt"),
            binding("if-w-mgmt", "cluster-host"),
        ],
        interface_data_networks: vec![data_binding("if-w-data", "group0-data0")],
        disks: vec![root_disk()],
        ..Default::default()
    }
}

#[async_trait]
impl Inventory for FakeInventory {
    async fn list_systems(&self) -> Result<Vec<System>> {
        self.check("list_systems")?;
        Ok(self.systems.clone())
    }

    async fn list_drbd(&self) -> Result<Vec<Drbd>> {
        self.check("list_drbd")?;
        Ok(self.drbd.clone())
    }

    async fn list_dns(&self) -> Result<Vec<Dns>> {
        self.check("list_dns")?;
        Ok(self.dns.clone())
    }

    async fn list_ntp(&self) -> Result<Vec<Ntp>> {
        self.check("list_ntp")?;
        Ok(self.ntp.clone())
    }

    async fn list_ptp(&self) -> Result<Vec<Ptp>> {
        self.check("list_ptp")?;
        Ok(self.ptp.clone())
    }

    async fn list_certificates(&self) -> Result<Vec<Certificate>> {
        self.check("list_certificates")?;
        Ok(self.certificates.clone())
    }

    async fn list_service_parameters(&self) -> Result<Vec<ServiceParameter>> {
        self.check("list_service_parameters")?;
        Ok(self.service_parameters.clone())
    }

    async fn list_storage_backends(&self) -> Result<Vec<StorageBackend>> {
        self.check("list_storage_backends")?;
        Ok(self.storage_backends.clone())
    }

    async fn list_controller_filesystems(&self) -> Result<Vec<ControllerFileSystem>> {
        self.check("list_controller_filesystems")?;
        Ok(self.controller_filesystems.clone())
    }

    async fn get_license(&self) -> Result<Option<License>> {
        self.check("get_license")?;
        Ok(self.license.clone())
    }

    async fn list_networks(&self) -> Result<Vec<Network>> {
        self.check("list_networks")?;
        Ok(self.networks.clone())
    }

    async fn list_address_pools(&self) -> Result<Vec<AddressPool>> {
        self.check("list_address_pools")?;
        Ok(self.address_pools.clone())
    }

    async fn list_network_address_pools(&self) -> Result<Vec<NetworkAddressPool>> {
        self.check("list_network_address_pools")?;
        Ok(self.network_address_pools.clone())
    }

    async fn list_data_networks(&self) -> Result<Vec<DataNetwork>> {
        self.check("list_data_networks")?;
        Ok(self.data_networks.clone())
    }

    async fn list_ptp_instances(&self) -> Result<Vec<PtpInstance>> {
        self.check("list_ptp_instances")?;
        Ok(self.ptp_instances.clone())
    }

    async fn list_ptp_interfaces(&self) -> Result<Vec<PtpInterface>> {
        self.check("list_ptp_interfaces")?;
        Ok(self.ptp_interfaces.clone())
    }

    async fn list_ceph_monitors(&self) -> Result<Vec<CephMonitor>> {
        self.check("list_ceph_monitors")?;
        Ok(self.ceph_monitors.clone())
    }

    async fn list_clusters(&self) -> Result<Vec<Cluster>> {
        self.check("list_clusters")?;
        Ok(self.clusters.clone())
    }

    async fn list_storage_tiers(&self, cluster_id: &str) -> Result<Vec<StorageTier>> {
        self.check("list_storage_tiers")?;
        Ok(self.storage_tiers.get(cluster_id).cloned().unwrap_or_default())
    }

    async fn get_partition(&self, partition_id: &str) -> Result<Partition> {
        self.check("get_partition")?;
        self.system_partitions
            .iter()
            .find(|p| p.id == partition_id)
            .cloned()
            .ok_or_else(|| BuildError::inconsistent("partition", partition_id).into())
    }

    async fn list_hosts(&self) -> Result<Vec<Host>> {
        self.check("list_hosts")?;
        Ok(self.hosts.iter().map(|f| f.host.clone()).collect())
    }

    async fn get_host(&self, host_id: &str) -> Result<Host> {
        Ok(self.fixture("get_host", host_id)?.host.clone())
    }

    async fn get_kernel(&self, host_id: &str) -> Result<Kernel> {
        self.fixture("get_kernel", host_id)?
            .kernel
            .clone()
            .ok_or_else(|| BuildError::inconsistent("kernel", host_id).into())
    }

    async fn list_labels(&self, host_id: &str) -> Result<Vec<Label>> {
        Ok(self.fixture("list_labels", host_id)?.labels.clone())
    }

    async fn list_cpus(&self, host_id: &str) -> Result<Vec<Cpu>> {
        Ok(self.fixture("list_cpus", host_id)?.cpus.clone())
    }

    async fn list_memory(&self, host_id: &str) -> Result<Vec<Memory>> {
        Ok(self.fixture("list_memory", host_id)?.memory.clone())
    }

    async fn list_interfaces(&self, host_id: &str) -> Result<Vec<Interface>> {
        Ok(self.fixture("list_interfaces", host_id)?.interfaces.clone())
    }

    async fn list_ports(&self, host_id: &str) -> Result<Vec<Port>> {
        Ok(self.fixture("list_ports", host_id)?.ports.clone())
    }

    async fn list_addresses(&self, host_id: &str) -> Result<Vec<Address>> {
        Ok(self.fixture("list_addresses", host_id)?.addresses.clone())
    }

    async fn list_routes(&self, host_id: &str) -> Result<Vec<Route>> {
        Ok(self.fixture("list_routes", host_id)?.routes.clone())
    }

    async fn list_disks(&self, host_id: &str) -> Result<Vec<Disk>> {
        Ok(self.fixture("list_disks", host_id)?.disks.clone())
    }

    async fn list_partitions(&self, host_id: &str) -> Result<Vec<Partition>> {
        Ok(self.fixture("list_partitions", host_id)?.partitions.clone())
    }

    async fn list_physical_volumes(&self, host_id: &str) -> Result<Vec<PhysicalVolume>> {
        Ok(self
            .fixture("list_physical_volumes", host_id)?
            .physical_volumes
            .clone())
    }

    async fn list_volume_groups(&self, host_id: &str) -> Result<Vec<VolumeGroup>> {
        Ok(self.fixture("list_volume_groups", host_id)?.volume_groups.clone())
    }

    async fn list_osds(&self, host_id: &str) -> Result<Vec<Osd>> {
        Ok(self.fixture("list_osds", host_id)?.osds.clone())
    }

    async fn list_host_filesystems(&self, host_id: &str) -> Result<Vec<HostFileSystem>> {
        Ok(self.fixture("list_host_filesystems", host_id)?.file_systems.clone())
    }

    async fn list_interface_networks(&self, host_id: &str) -> Result<Vec<InterfaceNetwork>> {
        Ok(self
            .fixture("list_interface_networks", host_id)?
            .interface_networks
            .clone())
    }

    async fn list_interface_data_networks(
        &self,
        host_id: &str,
    ) -> Result<Vec<InterfaceDataNetwork>> {
        Ok(self
            .fixture("list_interface_data_networks", host_id)?
            .interface_data_networks
            .clone())
    }

    async fn list_host_ptp_instances(&self, host_id: &str) -> Result<Vec<PtpInstance>> {
        Ok(self
            .fixture("list_host_ptp_instances", host_id)?
            .ptp_instances
            .clone())
    }

    async fn list_host_ptp_interfaces(&self, host_id: &str) -> Result<Vec<PtpInterface>> {
        Ok(self
            .fixture("list_host_ptp_interfaces", host_id)?
            .ptp_interfaces
            .clone())
    }
}

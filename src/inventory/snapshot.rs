use anyhow::{Context, Result};
use std::collections::BTreeMap;

use super::types::*;
use super::Inventory;
use crate::error::BuildError;

/// System scope attributes, collected once per build.
#[derive(Debug, Clone, Default)]
pub struct SystemInfo {
    pub system: System,
    pub drbd: Option<Drbd>,
    pub dns: Option<Dns>,
    pub ntp: Option<Ntp>,
    pub ptp: Option<Ptp>,
    pub certificates: Vec<Certificate>,
    pub service_parameters: Vec<ServiceParameter>,
    pub storage_backends: Vec<StorageBackend>,
    pub file_systems: Vec<ControllerFileSystem>,
    pub license: Option<License>,
}

impl SystemInfo {
    pub async fn populate(inventory: &dyn Inventory) -> Result<Self> {
        let system = inventory
            .list_systems()
            .await
            .context("failed to get system")?
            .into_iter()
            .next()
            .ok_or_else(|| BuildError::inconsistent("system", "default"))?;

        let drbd = inventory
            .list_drbd()
            .await
            .context("failed to get DRBD info")?
            .into_iter()
            .next();

        let dns = inventory
            .list_dns()
            .await
            .context("failed to get DNS info")?
            .into_iter()
            .next();

        let ntp = inventory
            .list_ntp()
            .await
            .context("failed to get NTP info")?
            .into_iter()
            .next();

        let ptp = inventory
            .list_ptp()
            .await
            .context("failed to get PTP info")?
            .into_iter()
            .next();

        // Certificates are not scoped by system so the whole list is taken.
        let certificates = inventory
            .list_certificates()
            .await
            .context("failed to get certificate list")?;

        let service_parameters = inventory
            .list_service_parameters()
            .await
            .context("failed to get service parameters")?;

        let storage_backends = inventory
            .list_storage_backends()
            .await
            .context("failed to get storage backends")?;

        let file_systems = inventory
            .list_controller_filesystems()
            .await
            .context("failed to get filesystem list")?;

        let license = inventory
            .get_license()
            .await
            .context("failed to get license")?;

        Ok(Self {
            system,
            drbd,
            dns,
            ntp,
            ptp,
            certificates,
            service_parameters,
            storage_backends,
            file_systems,
            license,
        })
    }
}

/// Everything the assembler needs to know about one host, fetched up front
/// so the individual builders never go back to the inventory.
#[derive(Debug, Clone, Default)]
pub struct HostInfo {
    pub host: Host,
    pub kernel: Option<Kernel>,
    pub labels: Vec<Label>,
    pub cpus: Vec<Cpu>,
    pub memory: Vec<Memory>,
    pub monitors: Vec<CephMonitor>,
    pub networks: Vec<Network>,
    pub data_networks: Vec<DataNetwork>,
    pub interface_networks: Vec<InterfaceNetwork>,
    pub interface_data_networks: Vec<InterfaceDataNetwork>,
    pub pools: Vec<AddressPool>,
    pub ports: Vec<Port>,
    pub interfaces: Vec<Interface>,
    pub addresses: Vec<Address>,
    pub routes: Vec<Route>,
    pub disks: Vec<Disk>,
    pub partitions: Vec<Partition>,
    pub volume_groups: Vec<VolumeGroup>,
    pub physical_volumes: Vec<PhysicalVolume>,
    pub osds: Vec<Osd>,
    pub clusters: Vec<Cluster>,
    /// Storage tier named "storage", keyed by cluster name.
    pub storage_tiers: BTreeMap<String, StorageTier>,
    pub file_systems: Vec<HostFileSystem>,
    pub ptp_instances: Vec<PtpInstance>,
    pub ptp_interfaces: Vec<PtpInterface>,
}

impl HostInfo {
    pub async fn populate(inventory: &dyn Inventory, host_id: &str) -> Result<Self> {
        let mut info = Self {
            host: inventory
                .get_host(host_id)
                .await
                .with_context(|| format!("failed to get host {}", host_id))?,
            ..Default::default()
        };

        info.labels = inventory
            .list_labels(host_id)
            .await
            .with_context(|| format!("failed to list labels for host {}", host_id))?;

        info.cpus = inventory
            .list_cpus(host_id)
            .await
            .with_context(|| format!("failed to list CPU for host {}", host_id))?;

        info.memory = inventory
            .list_memory(host_id)
            .await
            .with_context(|| format!("failed to list memory for host {}", host_id))?;

        info.monitors = inventory
            .list_ceph_monitors()
            .await
            .with_context(|| format!("failed to list Ceph monitors for host {}", host_id))?;

        info.networks = inventory
            .list_networks()
            .await
            .with_context(|| format!("failed to list networks for host {}", host_id))?;

        info.data_networks = inventory
            .list_data_networks()
            .await
            .with_context(|| format!("failed to list data networks for host {}", host_id))?;

        info.interface_networks = inventory
            .list_interface_networks(host_id)
            .await
            .with_context(|| format!("failed to list interface networks for host {}", host_id))?;

        info.interface_data_networks = inventory
            .list_interface_data_networks(host_id)
            .await
            .with_context(|| {
                format!("failed to list interface data networks for host {}", host_id)
            })?;

        info.pools = inventory
            .list_address_pools()
            .await
            .with_context(|| format!("failed to list address pools for host {}", host_id))?;

        info.ports = inventory
            .list_ports(host_id)
            .await
            .with_context(|| format!("failed to list ports for host {}", host_id))?;

        info.interfaces = inventory
            .list_interfaces(host_id)
            .await
            .with_context(|| format!("failed to list interfaces for host {}", host_id))?;

        info.addresses = inventory
            .list_addresses(host_id)
            .await
            .with_context(|| format!("failed to list addresses for host {}", host_id))?;

        info.routes = inventory
            .list_routes(host_id)
            .await
            .with_context(|| format!("failed to list routes for host {}", host_id))?;

        info.disks = inventory
            .list_disks(host_id)
            .await
            .with_context(|| format!("failed to list disks for host {}", host_id))?;

        info.partitions = inventory
            .list_partitions(host_id)
            .await
            .with_context(|| format!("failed to list partitions for host {}", host_id))?;

        info.volume_groups = inventory
            .list_volume_groups(host_id)
            .await
            .with_context(|| format!("failed to list volume groups for host {}", host_id))?;

        info.physical_volumes = inventory
            .list_physical_volumes(host_id)
            .await
            .with_context(|| format!("failed to list physical volumes for host {}", host_id))?;

        info.osds = inventory
            .list_osds(host_id)
            .await
            .with_context(|| format!("failed to list OSDs for host {}", host_id))?;

        info.clusters = inventory
            .list_clusters()
            .await
            .with_context(|| format!("failed to list clusters for host {}", host_id))?;

        info.ptp_instances = inventory
            .list_host_ptp_instances(host_id)
            .await
            .with_context(|| format!("failed to list PTP instances for host {}", host_id))?;

        info.ptp_interfaces = inventory
            .list_host_ptp_interfaces(host_id)
            .await
            .with_context(|| format!("failed to list PTP interfaces for host {}", host_id))?;

        info.populate_system_partitions(inventory).await?;
        info.populate_storage_tiers(inventory).await;

        info.file_systems = inventory
            .list_host_filesystems(host_id)
            .await
            .with_context(|| format!("failed to list filesystems for host {}", host_id))?;

        info.kernel = match inventory.get_kernel(host_id).await {
            Ok(kernel) => Some(kernel),
            Err(e) => {
                tracing::warn!("Failed to read kernel for host {}: {:#}", host_id, e);
                None
            }
        };

        Ok(info)
    }

    /// System created partitions are missing from the host partition list;
    /// fetch the ones a physical volume refers to individually.
    async fn populate_system_partitions(&mut self, inventory: &dyn Inventory) -> Result<()> {
        let missing: Vec<String> = self
            .physical_volumes
            .iter()
            .filter(|pv| pv.pv_type == values::PV_TYPE_PARTITION)
            .filter(|pv| self.find_partition(&pv.device_uuid).is_none())
            .map(|pv| pv.device_uuid.clone())
            .collect();

        for id in missing {
            let partition = inventory
                .get_partition(&id)
                .await
                .with_context(|| format!("failed to lookup system partition: {}", id))?;
            self.partitions.push(partition);
        }

        Ok(())
    }

    async fn populate_storage_tiers(&mut self, inventory: &dyn Inventory) {
        let mut tiers = BTreeMap::new();

        for cluster in &self.clusters {
            match inventory.list_storage_tiers(&cluster.id).await {
                Ok(list) => {
                    if let Some(tier) = list
                        .into_iter()
                        .find(|t| t.name == values::STORAGE_TIER_NAME)
                    {
                        tiers.insert(cluster.name.clone(), tier);
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to list storage tiers for cluster {}: {:#}",
                        cluster.id,
                        e
                    );
                }
            }
        }

        self.storage_tiers = tiers;
    }

    pub fn has_subfunction(&self, function: &str) -> bool {
        self.host
            .subfunctions
            .split(',')
            .any(|s| s.trim() == function)
    }

    pub fn find_partition(&self, id: &str) -> Option<&Partition> {
        self.partitions.iter().find(|p| p.id == id)
    }

    pub fn find_disk(&self, id: &str) -> Option<&Disk> {
        self.disks.iter().find(|d| d.id == id)
    }

    pub fn find_disk_by_node(&self, node: &str) -> Option<&Disk> {
        self.disks.iter().find(|d| d.device_node == node)
    }

    pub fn find_address_pool(&self, id: &str) -> Option<&AddressPool> {
        self.pools.iter().find(|p| p.id == id)
    }

    /// Reverse lookup of the cluster that owns a storage tier.
    pub fn find_cluster_name_by_tier(&self, tier_id: &str) -> Option<&str> {
        self.storage_tiers
            .iter()
            .find(|(_, tier)| tier.id == tier_id)
            .map(|(name, _)| name.as_str())
    }

    pub fn find_interface_port_name(&self, interface_id: &str) -> Option<&str> {
        self.ports
            .iter()
            .find(|p| p.interface_id == interface_id)
            .map(|p| p.name.as_str())
    }

    pub fn find_monitor(&self) -> Option<&CephMonitor> {
        self.monitors
            .iter()
            .find(|m| m.hostname == self.host.hostname)
    }

    /// PTP interfaces list their members as "hostname/ifname".
    pub fn find_ptp_interface_names(&self, iface: &Interface) -> Vec<String> {
        let member = format!("{}/{}", self.host.hostname, iface.name);
        self.ptp_interfaces
            .iter()
            .filter(|p| p.interface_names.iter().any(|n| *n == member))
            .map(|p| p.name.clone())
            .collect()
    }

    pub fn interface_network_names(&self, iface: &Interface) -> Vec<String> {
        self.interface_networks
            .iter()
            .filter(|a| a.interface_uuid == iface.id)
            .map(|a| a.network_name.clone())
            .collect()
    }

    pub fn interface_data_network_names(&self, iface: &Interface) -> Vec<String> {
        self.interface_data_networks
            .iter()
            .filter(|a| a.interface_uuid == iface.id)
            .map(|a| a.datanetwork_name.clone())
            .collect()
    }

    pub fn ptp_instance_names(&self) -> Vec<String> {
        self.ptp_instances.iter().map(|p| p.name.clone()).collect()
    }

    /// Addresses allocated from a pool were added by the system, not the user.
    pub fn is_system_address(&self, address: &Address) -> bool {
        address.pool_uuid.is_some()
    }
}

pub mod client;
pub mod snapshot;
pub mod types;

#[cfg(test)]
pub mod fake;

pub use client::InventoryClient;
pub use snapshot::{HostInfo, SystemInfo};

use anyhow::Result;
use async_trait::async_trait;

use types::*;

/// Read-only view of the platform inventory. One read per kind; no caching,
/// coalescing or retries. Transport and authentication failures surface as
/// `BuildError::InventoryUnavailable`, unresolved references as
/// `BuildError::InventoryInconsistent`.
#[async_trait]
pub trait Inventory: Send + Sync {
    // --- System scope ---
    async fn list_systems(&self) -> Result<Vec<System>>;
    async fn list_drbd(&self) -> Result<Vec<Drbd>>;
    async fn list_dns(&self) -> Result<Vec<Dns>>;
    async fn list_ntp(&self) -> Result<Vec<Ntp>>;
    async fn list_ptp(&self) -> Result<Vec<Ptp>>;
    async fn list_certificates(&self) -> Result<Vec<Certificate>>;
    async fn list_service_parameters(&self) -> Result<Vec<ServiceParameter>>;
    async fn list_storage_backends(&self) -> Result<Vec<StorageBackend>>;
    async fn list_controller_filesystems(&self) -> Result<Vec<ControllerFileSystem>>;
    /// `Ok(None)` when no license file is installed.
    async fn get_license(&self) -> Result<Option<License>>;

    // --- Networking ---
    async fn list_networks(&self) -> Result<Vec<Network>>;
    async fn list_address_pools(&self) -> Result<Vec<AddressPool>>;
    async fn list_network_address_pools(&self) -> Result<Vec<NetworkAddressPool>>;
    async fn list_data_networks(&self) -> Result<Vec<DataNetwork>>;
    async fn list_ptp_instances(&self) -> Result<Vec<PtpInstance>>;
    async fn list_ptp_interfaces(&self) -> Result<Vec<PtpInterface>>;

    // --- Storage clusters ---
    async fn list_ceph_monitors(&self) -> Result<Vec<CephMonitor>>;
    async fn list_clusters(&self) -> Result<Vec<Cluster>>;
    async fn list_storage_tiers(&self, cluster_id: &str) -> Result<Vec<StorageTier>>;
    async fn get_partition(&self, partition_id: &str) -> Result<Partition>;

    // --- Hosts ---
    async fn list_hosts(&self) -> Result<Vec<Host>>;
    async fn get_host(&self, host_id: &str) -> Result<Host>;
    async fn get_kernel(&self, host_id: &str) -> Result<Kernel>;
    async fn list_labels(&self, host_id: &str) -> Result<Vec<Label>>;
    async fn list_cpus(&self, host_id: &str) -> Result<Vec<Cpu>>;
    async fn list_memory(&self, host_id: &str) -> Result<Vec<Memory>>;
    async fn list_interfaces(&self, host_id: &str) -> Result<Vec<Interface>>;
    async fn list_ports(&self, host_id: &str) -> Result<Vec<Port>>;
    async fn list_addresses(&self, host_id: &str) -> Result<Vec<Address>>;
    async fn list_routes(&self, host_id: &str) -> Result<Vec<Route>>;
    async fn list_disks(&self, host_id: &str) -> Result<Vec<Disk>>;
    async fn list_partitions(&self, host_id: &str) -> Result<Vec<Partition>>;
    async fn list_physical_volumes(&self, host_id: &str) -> Result<Vec<PhysicalVolume>>;
    async fn list_volume_groups(&self, host_id: &str) -> Result<Vec<VolumeGroup>>;
    async fn list_osds(&self, host_id: &str) -> Result<Vec<Osd>>;
    async fn list_host_filesystems(&self, host_id: &str) -> Result<Vec<HostFileSystem>>;
    async fn list_interface_networks(&self, host_id: &str) -> Result<Vec<InterfaceNetwork>>;
    async fn list_interface_data_networks(
        &self,
        host_id: &str,
    ) -> Result<Vec<InterfaceDataNetwork>>;
    async fn list_host_ptp_instances(&self, host_id: &str) -> Result<Vec<PtpInstance>>;
    async fn list_host_ptp_interfaces(&self, host_id: &str) -> Result<Vec<PtpInterface>>;
}

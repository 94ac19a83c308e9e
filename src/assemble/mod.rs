//! Entity assembly: turns inventory snapshots into unfiltered resources.
//!
//! Every function here is pure over a snapshot; the inventory is never read
//! again once [`HostInfo`](crate::inventory::HostInfo) or
//! [`SystemInfo`](crate::inventory::SystemInfo) has been populated.

pub mod host;
pub mod network;
pub mod system;

pub use host::{fix_device_path, new_host, new_host_profile, new_host_profile_spec, profile_name};
pub use network::{
    new_data_network, new_platform_networks, new_ptp_instance, new_ptp_interface,
    parse_ptp_parameters,
};
pub use system::{cert_secret_name, new_system};

//! Filter chains applied while a deployment is assembled.
//!
//! Host filters move host specific attributes from a profile into the host
//! overrides. Profile filters strip defaults and normalize values so that
//! more hosts end up sharing a profile. System and platform network filters
//! trim attributes that do not belong in a reusable manifest. Chains run in
//! registration order and the first error aborts the build.

pub mod host;
pub mod profile;
pub mod system;

use anyhow::Result;

use crate::build::Deployment;
use crate::config::FilterOptions;
use crate::inventory::types::values;
use crate::models::{Host, HostProfile, PlatformNetwork, System};

pub use host::{
    AddressFilter, BmAddressFilter, Controller0Filter, HostKernelFilter, InterfaceRemoveUuidFilter,
    LocationFilter, LoopbackInterfaceFilter, StorageMonitorFilter,
};
pub use profile::{
    ConsoleNameFilter, InterfaceDefaultsFilter, InterfaceMtuFilter, InterfaceNamingFilter,
    InterfaceUnusedFilter, MemoryClearAllFilter, MemoryDefaultsFilter, ProcessorClearAllFilter,
    ProcessorDefaultsFilter, VolumeGroupFilter,
};
pub use system::{CaCertificateFilter, ServiceParameterFilter};

pub trait SystemFilter: Send {
    fn filter(&mut self, system: &mut System, deployment: &Deployment) -> Result<()>;
}

/// Runs once per host, before the profile filters, while the profile still
/// belongs to that host alone.
pub trait HostFilter: Send {
    fn filter(&mut self, profile: &mut HostProfile, host: &mut Host, deployment: &Deployment)
        -> Result<()>;
}

/// Runs on every profile twice: once per host as it is built and again over
/// all profiles once every host is known. State kept across calls survives
/// into the second pass; `reset` is only called before each host's first pass.
pub trait ProfileFilter: Send {
    fn filter(&mut self, profile: &mut HostProfile, deployment: &Deployment) -> Result<()>;

    fn reset(&mut self);

    /// Called after the first pass for a host, with the host the profile
    /// was built for. Filters that rewrite names use it to fix references
    /// that the host filters already moved into the overrides.
    fn update_host(&mut self, _host: &mut Host) -> Result<()> {
        Ok(())
    }
}

pub trait PlatformNetworkFilter: Send {
    fn filter(&mut self, network: &mut PlatformNetwork, deployment: &Deployment) -> Result<()>;
}

/// Host filters every build runs, in order.
pub fn default_host_filters() -> Vec<Box<dyn HostFilter>> {
    vec![
        Box::new(Controller0Filter),
        Box::new(LoopbackInterfaceFilter),
        Box::new(LocationFilter),
        Box::new(AddressFilter),
        Box::new(BmAddressFilter),
        Box::new(StorageMonitorFilter),
        Box::new(InterfaceRemoveUuidFilter),
        Box::new(HostKernelFilter),
    ]
}

/// Profile filters selected by the options.
pub fn profile_filters(options: &FilterOptions) -> Vec<Box<dyn ProfileFilter>> {
    let mut filters: Vec<Box<dyn ProfileFilter>> = Vec::new();

    if options.no_defaults {
        filters.push(Box::new(InterfaceUnusedFilter));
    }

    if options.no_memory {
        filters.push(Box::new(MemoryClearAllFilter));
    } else if options.no_defaults {
        filters.push(Box::new(MemoryDefaultsFilter));
    }

    if options.no_processors {
        filters.push(Box::new(ProcessorClearAllFilter));
    } else if options.no_defaults {
        filters.push(Box::new(ProcessorDefaultsFilter));
    }

    if options.no_interface_defaults {
        filters.push(Box::new(InterfaceDefaultsFilter));
    }

    if options.normalize_interfaces {
        filters.push(Box::new(InterfaceNamingFilter::new()));
    }

    if options.normalize_mtu {
        filters.push(Box::new(InterfaceMtuFilter::new()));
    }

    if options.normalize_console {
        filters.push(Box::new(ConsoleNameFilter::new()));
    }

    if options.no_sys_vg {
        filters.push(Box::new(VolumeGroupFilter::system()));
    }

    filters
}

/// System filters selected by the options.
pub fn system_filters(options: &FilterOptions) -> Vec<Box<dyn SystemFilter>> {
    let mut filters: Vec<Box<dyn SystemFilter>> = Vec::new();

    if options.no_ca_certificates {
        filters.push(Box::new(CaCertificateFilter));
    }

    if options.no_service_parameters {
        filters.push(Box::new(ServiceParameterFilter));
    }

    filters
}

/// True when another interface uses `name` as its lower interface or as a
/// bond member.
pub fn is_interface_in_use(name: &str, interfaces: &crate::models::host::InterfaceInfo) -> bool {
    interfaces.vlan.iter().any(|v| v.lower == name)
        || interfaces.vf.iter().any(|v| v.lower == name)
        || interfaces.bond.iter().any(|b| b.members.iter().any(|m| m == name))
}

pub(crate) fn is_loopback(name: &str) -> bool {
    name == values::LOOPBACK_INTERFACE
}

use anyhow::Result;

use super::{is_loopback, HostFilter};
use crate::build::Deployment;
use crate::inventory::types::values;
use crate::models::host::{provisioning_mode, BmInfo, InterfaceInfo, MatchInfo};
use crate::models::{Host, HostProfile};

/// controller-0 is always present before the manifest is applied, so it is
/// matched by its boot MAC and provisioned dynamically.
pub struct Controller0Filter;

impl HostFilter for Controller0Filter {
    fn filter(&mut self, _profile: &mut HostProfile, host: &mut Host, _: &Deployment) -> Result<()> {
        if host.metadata.name != values::CONTROLLER_0 {
            return Ok(());
        }

        let overrides = host.spec.overrides_mut();
        overrides.provisioning_mode = Some(provisioning_mode::DYNAMIC.to_string());

        if let Some(boot_mac) = overrides.boot_mac.take() {
            host.spec.match_info = Some(MatchInfo {
                boot_mac: Some(boot_mac),
                dmi: None,
            });
        }

        Ok(())
    }
}

/// Only controller-0 has a loopback interface.
pub struct LoopbackInterfaceFilter;

impl HostFilter for LoopbackInterfaceFilter {
    fn filter(&mut self, profile: &mut HostProfile, host: &mut Host, _: &Deployment) -> Result<()> {
        let Some(interfaces) = profile.spec.interfaces.as_mut() else {
            return Ok(());
        };

        let (loopback, ethernet): (Vec<_>, Vec<_>) = std::mem::take(&mut interfaces.ethernet)
            .into_iter()
            .partition(|e| is_loopback(&e.common.name));
        interfaces.ethernet = ethernet;

        if !loopback.is_empty() {
            host.spec
                .overrides_mut()
                .interfaces
                .get_or_insert_with(InterfaceInfo::default)
                .ethernet
                .extend(loopback);
        }

        Ok(())
    }
}

pub struct LocationFilter;

impl HostFilter for LocationFilter {
    fn filter(&mut self, profile: &mut HostProfile, host: &mut Host, _: &Deployment) -> Result<()> {
        if let Some(location) = profile.spec.location.take() {
            host.spec.overrides_mut().location = Some(location);
        }
        Ok(())
    }
}

pub struct AddressFilter;

impl HostFilter for AddressFilter {
    fn filter(&mut self, profile: &mut HostProfile, host: &mut Host, _: &Deployment) -> Result<()> {
        if !profile.spec.addresses.is_empty() {
            host.spec.overrides_mut().addresses = std::mem::take(&mut profile.spec.addresses);
        }
        Ok(())
    }
}

/// The board management address is per host; the type and credentials are
/// assumed to be shared and stay in the profile.
pub struct BmAddressFilter;

impl HostFilter for BmAddressFilter {
    fn filter(&mut self, profile: &mut HostProfile, host: &mut Host, _: &Deployment) -> Result<()> {
        let address = profile
            .spec
            .board_management
            .as_mut()
            .and_then(|bm| bm.address.take());

        if let Some(address) = address {
            host.spec.overrides_mut().board_management = Some(BmInfo {
                address: Some(address),
                ..Default::default()
            });
        }

        Ok(())
    }
}

/// A storage monitor runs on a single node.
pub struct StorageMonitorFilter;

impl HostFilter for StorageMonitorFilter {
    fn filter(&mut self, profile: &mut HostProfile, host: &mut Host, _: &Deployment) -> Result<()> {
        let Some(storage) = profile.spec.storage.as_mut() else {
            return Ok(());
        };
        let Some(monitor) = storage.monitor.take() else {
            return Ok(());
        };

        if storage.is_empty() {
            profile.spec.storage = None;
        }

        host.spec
            .overrides_mut()
            .storage
            .get_or_insert_with(Default::default)
            .monitor = Some(monitor);

        Ok(())
    }
}

/// Inventory ids are meaningless on another system.
pub struct InterfaceRemoveUuidFilter;

impl HostFilter for InterfaceRemoveUuidFilter {
    fn filter(&mut self, profile: &mut HostProfile, host: &mut Host, _: &Deployment) -> Result<()> {
        if let Some(interfaces) = profile.spec.interfaces.as_mut() {
            interfaces.commons_mut().for_each(|c| c.uuid = None);
        }

        let overrides = host.spec.overrides.as_mut().and_then(|o| o.interfaces.as_mut());
        if let Some(interfaces) = overrides {
            interfaces.commons_mut().for_each(|c| c.uuid = None);
        }

        Ok(())
    }
}

/// Keep the kernel only when it differs from the platform default.
pub struct HostKernelFilter;

impl HostFilter for HostKernelFilter {
    fn filter(&mut self, profile: &mut HostProfile, _host: &mut Host, _: &Deployment) -> Result<()> {
        let standard = matches!(
            profile.spec.kernel.as_deref(),
            Some(values::KERNEL_STANDARD) | Some("")
        );
        if standard {
            profile.spec.kernel = None;
        }
        Ok(())
    }
}

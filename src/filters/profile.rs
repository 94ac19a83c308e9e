use anyhow::Result;
use regex_lite::Regex;
use std::collections::{HashMap, HashSet};

use super::{is_loopback, ProfileFilter};
use crate::build::Deployment;
use crate::inventory::types::values;
use crate::models::host::{CommonInterfaceInfo, InterfaceInfo};
use crate::models::{Host, HostProfile};

/// Console setting missing the parity and stop bits.
pub const CONSOLE_SHORTHAND_PATTERN: &str = r"ttyS[0-9]+,\d+$";

/// Linux default parity and stop bits.
const CONSOLE_DEFAULT_SUFFIX: &str = "n8";

/// Canonical interface name per platform network, by precedence.
const INTERFACE_NAMES: &[(&str, &str)] = &[
    ("pxeboot", "pxeboot0"),
    ("mgmt", "mgmt0"),
    ("cluster-host", "cluster0"),
    ("oam", "oam0"),
];

/// Ethernet interfaces without a class that nothing else depends on.
pub struct InterfaceUnusedFilter;

impl ProfileFilter for InterfaceUnusedFilter {
    fn filter(&mut self, profile: &mut HostProfile, _: &Deployment) -> Result<()> {
        let Some(interfaces) = profile.spec.interfaces.as_mut() else {
            return Ok(());
        };

        let info: &InterfaceInfo = interfaces;
        let used: HashSet<String> = info
            .ethernet
            .iter()
            .map(|e| e.common.name.clone())
            .filter(|name| super::is_interface_in_use(name, info))
            .collect();

        interfaces
            .ethernet
            .retain(|e| e.common.class != values::IF_CLASS_NONE || used.contains(&e.common.name));

        Ok(())
    }

    fn reset(&mut self) {}
}

pub struct MemoryClearAllFilter;

impl ProfileFilter for MemoryClearAllFilter {
    fn filter(&mut self, profile: &mut HostProfile, _: &Deployment) -> Result<()> {
        profile.spec.memory.clear();
        Ok(())
    }

    fn reset(&mut self) {}
}

/// Drops unallocated functions and the single vswitch page every host
/// starts with.
pub struct MemoryDefaultsFilter;

impl ProfileFilter for MemoryDefaultsFilter {
    fn filter(&mut self, profile: &mut HostProfile, _: &Deployment) -> Result<()> {
        for node in &mut profile.spec.memory {
            node.functions.retain(|f| {
                let default_vswitch = f
                    .function
                    .eq_ignore_ascii_case(values::MEMORY_FUNCTION_VSWITCH)
                    && f.page_count == 1;
                f.page_count != 0 && !default_vswitch
            });
        }
        profile.spec.memory.retain(|node| !node.functions.is_empty());
        Ok(())
    }

    fn reset(&mut self) {}
}

/// Drops the platform core count a host gets by default: two on a
/// controller, one on a worker. Other functions depend on too many system
/// settings to guess.
pub struct ProcessorDefaultsFilter;

impl ProcessorDefaultsFilter {
    fn default_platform_cores(personality: Option<&str>) -> Option<i32> {
        match personality {
            Some(values::PERSONALITY_CONTROLLER) => Some(2),
            Some(values::PERSONALITY_WORKER) => Some(1),
            _ => None,
        }
    }
}

impl ProfileFilter for ProcessorDefaultsFilter {
    fn filter(&mut self, profile: &mut HostProfile, _: &Deployment) -> Result<()> {
        let default = Self::default_platform_cores(profile.spec.personality.as_deref());

        for node in &mut profile.spec.processors {
            node.functions.retain(|f| {
                !(f.function.eq_ignore_ascii_case(values::CPU_FUNCTION_PLATFORM)
                    && Some(f.count) == default)
            });
        }
        profile.spec.processors.retain(|node| !node.functions.is_empty());
        Ok(())
    }

    fn reset(&mut self) {}
}

pub struct ProcessorClearAllFilter;

impl ProfileFilter for ProcessorClearAllFilter {
    fn filter(&mut self, profile: &mut HostProfile, _: &Deployment) -> Result<()> {
        profile.spec.processors.clear();
        Ok(())
    }

    fn reset(&mut self) {}
}

/// Removes volume groups by name.
pub struct VolumeGroupFilter {
    blacklist: Vec<String>,
}

impl VolumeGroupFilter {
    pub fn new(blacklist: &[&str]) -> Self {
        Self {
            blacklist: blacklist.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Groups the platform creates on its own.
    pub fn system() -> Self {
        Self::new(values::SYSTEM_VOLUME_GROUPS)
    }
}

impl ProfileFilter for VolumeGroupFilter {
    fn filter(&mut self, profile: &mut HostProfile, _: &Deployment) -> Result<()> {
        let Some(storage) = profile.spec.storage.as_mut() else {
            return Ok(());
        };
        let Some(groups) = storage.volume_groups.as_mut() else {
            return Ok(());
        };

        groups.retain(|vg| !self.blacklist.contains(&vg.name));
        if groups.is_empty() {
            storage.volume_groups = None;
        }

        Ok(())
    }

    fn reset(&mut self) {}
}

/// Renames interfaces after the platform network they carry so that hosts
/// cabled differently can still share a profile.
///
/// Renames are recorded per profile and applied to every reference: lower
/// interfaces, bond members, addresses and routes. References that the host
/// filters already moved into the overrides are fixed in
/// [`ProfileFilter::update_host`], which sees the renames of the profile
/// filtered last.
#[derive(Default)]
pub struct InterfaceNamingFilter {
    updates: HashMap<String, String>,
}

impl InterfaceNamingFilter {
    pub fn new() -> Self {
        Self::default()
    }

    fn canonical_name(info: &CommonInterfaceInfo) -> Option<&'static str> {
        let networks = info.platform_networks.as_ref()?;
        INTERFACE_NAMES
            .iter()
            .find(|(network, _)| networks.iter().any(|n| n == network))
            .map(|(_, name)| *name)
    }

    fn check_interface(&mut self, info: &mut CommonInterfaceInfo) {
        if is_loopback(&info.name) {
            return;
        }

        if let Some(name) = Self::canonical_name(info) {
            if info.name != name {
                self.updates.insert(info.name.clone(), name.to_string());
                info.name = name.to_string();
            }
        }
    }

    fn rename(&self, name: &mut String) {
        if let Some(new_name) = self.updates.get(name.as_str()) {
            *name = new_name.clone();
        }
    }

    fn update_references(&self, interfaces: &mut InterfaceInfo) {
        for ethernet in &mut interfaces.ethernet {
            self.rename(&mut ethernet.lower);
        }
        for vlan in &mut interfaces.vlan {
            self.rename(&mut vlan.lower);
        }
        for vf in &mut interfaces.vf {
            self.rename(&mut vf.lower);
        }
        for bond in &mut interfaces.bond {
            bond.members.iter_mut().for_each(|m| self.rename(m));
        }
    }
}

impl ProfileFilter for InterfaceNamingFilter {
    fn filter(&mut self, profile: &mut HostProfile, _: &Deployment) -> Result<()> {
        // Another profile's renames must never reach this one.
        self.updates.clear();

        let Some(interfaces) = profile.spec.interfaces.as_mut() else {
            return Ok(());
        };

        for info in interfaces.commons_mut() {
            self.check_interface(info);
        }

        if self.updates.is_empty() {
            return Ok(());
        }

        self.update_references(interfaces);
        for address in &mut profile.spec.addresses {
            self.rename(&mut address.interface);
        }
        for route in &mut profile.spec.routes {
            self.rename(&mut route.interface);
        }

        Ok(())
    }

    fn reset(&mut self) {
        self.updates.clear();
    }

    fn update_host(&mut self, host: &mut Host) -> Result<()> {
        let Some(overrides) = host.spec.overrides.as_mut() else {
            return Ok(());
        };

        for address in &mut overrides.addresses {
            self.rename(&mut address.interface);
        }
        for route in &mut overrides.routes {
            self.rename(&mut route.interface);
        }
        if let Some(interfaces) = overrides.interfaces.as_mut() {
            self.update_references(interfaces);
        }

        Ok(())
    }
}

/// Aligns MTUs of interfaces attached to the same platform network.
///
/// Needs both passes: the first records the largest MTU seen per network
/// across every profile, the second raises the others to it. Marks are never
/// reset.
#[derive(Default)]
pub struct InterfaceMtuFilter {
    high_water_marks: HashMap<String, i32>,
}

impl InterfaceMtuFilter {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_mtu(&mut self, info: &mut CommonInterfaceInfo) {
        let Some(networks) = info.platform_networks.as_ref() else {
            return;
        };

        let value = info.mtu.unwrap_or(values::DEFAULT_MTU);
        let mut raised = None;

        for network in networks {
            match self.high_water_marks.get_mut(network) {
                Some(mark) if value > *mark => *mark = value,
                Some(mark) if *mark != values::DEFAULT_MTU => raised = Some(*mark),
                Some(_) => {}
                None => {
                    self.high_water_marks.insert(network.clone(), value);
                }
            }
        }

        if let Some(mtu) = raised {
            info.mtu = Some(mtu);
        }
    }

    pub fn high_water_mark(&self, network: &str) -> Option<i32> {
        self.high_water_marks.get(network).copied()
    }
}

impl ProfileFilter for InterfaceMtuFilter {
    fn filter(&mut self, profile: &mut HostProfile, _: &Deployment) -> Result<()> {
        let Some(interfaces) = profile.spec.interfaces.as_mut() else {
            return Ok(());
        };
        let InterfaceInfo {
            ethernet,
            vlan,
            bond,
            vf,
        } = interfaces;

        for e in ethernet.iter_mut() {
            self.check_mtu(&mut e.common);
        }

        for b in bond.iter_mut() {
            self.check_mtu(&mut b.common);
            // Members always follow their bond.
            for e in ethernet.iter_mut().filter(|e| b.members.contains(&e.common.name)) {
                e.common.mtu = b.common.mtu;
            }
        }

        for v in vlan.iter_mut() {
            self.check_mtu(&mut v.common);
        }

        for v in vf.iter_mut() {
            self.check_mtu(&mut v.common);
        }

        Ok(())
    }

    fn reset(&mut self) {}
}

/// Completes `ttyS0,115200` into `ttyS0,115200n8`; an empty console is
/// dropped.
pub struct ConsoleNameFilter {
    regex: Option<Regex>,
}

impl ConsoleNameFilter {
    pub fn new() -> Self {
        Self {
            regex: Regex::new(CONSOLE_SHORTHAND_PATTERN).ok(),
        }
    }
}

impl Default for ConsoleNameFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileFilter for ConsoleNameFilter {
    fn filter(&mut self, profile: &mut HostProfile, _: &Deployment) -> Result<()> {
        let Some(console) = profile.spec.console.as_mut() else {
            return Ok(());
        };

        if console.is_empty() {
            profile.spec.console = None;
        } else if self.regex.as_ref().is_some_and(|re| re.is_match(console)) {
            console.push_str(CONSOLE_DEFAULT_SUFFIX);
        }

        Ok(())
    }

    fn reset(&mut self) {}
}

/// Drops interface attributes equal to their default. Network lists stay,
/// even when empty: an empty list asserts the interface has no bindings.
pub struct InterfaceDefaultsFilter;

impl ProfileFilter for InterfaceDefaultsFilter {
    fn filter(&mut self, profile: &mut HostProfile, _: &Deployment) -> Result<()> {
        if let Some(interfaces) = profile.spec.interfaces.as_mut() {
            for info in interfaces.commons_mut() {
                if info.mtu == Some(values::DEFAULT_MTU) {
                    info.mtu = None;
                }
            }
        }
        Ok(())
    }

    fn reset(&mut self) {}
}

use anyhow::Result;
use std::collections::BTreeMap;

use crate::error::BuildError;
use crate::inventory::types::{self as inv, values, Interface};
use crate::inventory::HostInfo;
use crate::models::host::*;
use crate::models::secret::names;
use crate::utils::{mib_to_gib, strip_partition_number};

/// Boot MAC the first controller reports until it is configured.
pub const ZERO_MAC: &str = "00:00:00:00:00:00";

/// Board management type written for hosts without a controller.
pub const BM_TYPE_NONE: &str = "none";

const DISK_PATH_PREFIX: &str = "/dev/disk/";

/// Hostname, or the inventory id for hosts that were never named.
pub fn host_name(host: &inv::Host) -> &str {
    if host.hostname.is_empty() {
        &host.id
    } else {
        &host.hostname
    }
}

pub fn profile_name(host: &inv::Host) -> String {
    format!("{}-profile", host_name(host))
}

fn is_short_node(path: &str) -> bool {
    !path.is_empty() && path.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Normalize a boot or root device to its stable `/dev/disk/...` path.
///
/// Paths already under `/dev/disk/` are kept. Short node names such as `sda`
/// are expanded to `/dev/sda` before the lookup. When no disk matches, the
/// path is returned unchanged.
pub fn fix_device_path(path: &str, info: &HostInfo) -> String {
    if path.starts_with(DISK_PATH_PREFIX) {
        return path.to_string();
    }

    let node = if is_short_node(path) {
        format!("/dev/{}", path)
    } else {
        path.to_string()
    };

    info.find_disk_by_node(&node)
        .map(|disk| disk.device_path.clone())
        .unwrap_or_else(|| path.to_string())
}

/// Assume the board is powered on unless the inventory clearly says otherwise.
fn power_state(host: &inv::Host) -> bool {
    let task = host.task.as_deref();
    if host.availability_status == values::AVAIL_POWER_OFF {
        task == Some(values::TASK_POWERING_ON)
    } else {
        task != Some(values::TASK_POWERING_OFF)
    }
}

fn board_management(host: &inv::Host) -> BmInfo {
    match &host.bm_type {
        Some(bm_type) => BmInfo {
            bm_type: Some(bm_type.clone()),
            address: host.bm_address.clone(),
            credentials: host.bm_username.as_ref().map(|_| BmCredentials {
                password: Some(BmPasswordInfo {
                    secret: names::BMC.to_string(),
                }),
            }),
        },
        None => BmInfo {
            bm_type: Some(BM_TYPE_NONE.to_string()),
            address: None,
            credentials: None,
        },
    }
}

fn labels(info: &HostInfo) -> Option<BTreeMap<String, String>> {
    let labels: BTreeMap<String, String> = info
        .labels
        .iter()
        .map(|l| (l.key.clone(), l.value.clone()))
        .collect();

    if labels.is_empty() {
        None
    } else {
        Some(labels)
    }
}

/// Physical core counts per node and function.
fn processors(info: &HostInfo) -> Vec<ProcessorInfo> {
    let mut nodes: BTreeMap<i32, BTreeMap<String, i32>> = BTreeMap::new();

    for cpu in &info.cpus {
        // Hyper-threads follow their physical core.
        if cpu.thread != 0 {
            continue;
        }

        let function = cpu.function.to_lowercase();
        if function == values::CPU_FUNCTION_APPLICATION {
            continue;
        }

        match nodes.get_mut(&cpu.processor) {
            Some(functions) => *functions.entry(function).or_insert(0) += 1,
            None => {
                let mut functions = BTreeMap::new();
                // A zero vswitch allocation is not listed, record it anyway.
                if function != values::CPU_FUNCTION_VSWITCH && cpu.processor == 0 {
                    functions.insert(values::CPU_FUNCTION_VSWITCH.to_string(), 0);
                }
                functions.insert(function, 1);
                nodes.insert(cpu.processor, functions);
            }
        }
    }

    nodes
        .into_iter()
        .map(|(node, functions)| ProcessorInfo {
            node,
            functions: functions
                .into_iter()
                .map(|(function, count)| ProcessorFunctionInfo { function, count })
                .collect(),
        })
        .collect()
}

fn vswitch_page_size(size_mib: i32) -> &'static str {
    match size_mib {
        2 => page_size::SIZE_2MB,
        1024 => page_size::SIZE_1GB,
        _ => page_size::SIZE_4KB,
    }
}

/// Platform memory as a count of 4K pages. Counts beyond `i32` are clamped
/// and logged.
fn platform_page_count(memory: &inv::Memory) -> i32 {
    let pages = memory.platform.saturating_mul(1024) / 4;
    i32::try_from(pages).unwrap_or_else(|_| {
        tracing::warn!(
            "Memory node {}: {}",
            memory.processor,
            BuildError::invalid("platform", &memory.platform.to_string())
        );
        if pages < 0 {
            i32::MIN
        } else {
            i32::MAX
        }
    })
}

fn memory(info: &HostInfo) -> Vec<MemoryNodeInfo> {
    info.memory
        .iter()
        .map(|m| {
            let platform = MemoryFunctionInfo {
                function: values::MEMORY_FUNCTION_PLATFORM.to_string(),
                page_size: page_size::SIZE_4KB.to_string(),
                page_count: platform_page_count(m),
            };

            let vswitch_size = vswitch_page_size(m.vswitch_hugepages_size);
            let vswitch = MemoryFunctionInfo {
                function: values::MEMORY_FUNCTION_VSWITCH.to_string(),
                page_size: vswitch_size.to_string(),
                page_count: m.vswitch_hugepages_count,
            };

            // The 2M VM count includes the vswitch pages when both use 2M.
            let mut vm_2m_count = m.vm_2m_hugepages_pending.unwrap_or(m.vm_2m_hugepages_count);
            if vswitch_size == page_size::SIZE_2MB && vm_2m_count >= vswitch.page_count {
                vm_2m_count -= vswitch.page_count;
            }

            let vm_2m = MemoryFunctionInfo {
                function: values::MEMORY_FUNCTION_VM.to_string(),
                page_size: page_size::SIZE_2MB.to_string(),
                page_count: vm_2m_count,
            };

            let vm_1g = MemoryFunctionInfo {
                function: values::MEMORY_FUNCTION_VM.to_string(),
                page_size: page_size::SIZE_1GB.to_string(),
                page_count: m
                    .vm_1g_hugepages_pending
                    .unwrap_or(m.vm_1g_hugepages_count),
            };

            MemoryNodeInfo {
                node: m.processor,
                functions: vec![platform, vswitch, vm_2m, vm_1g],
            }
        })
        .collect()
}

fn common_interface(iface: &Interface, info: &HostInfo) -> CommonInterfaceInfo {
    let class = if iface.class.is_empty() {
        values::IF_CLASS_NONE.to_string()
    } else {
        iface.class.clone()
    };

    let mut networks = info.interface_network_names(iface);
    for pool_id in [&iface.ipv4_pool, &iface.ipv6_pool].into_iter().flatten() {
        if let Some(pool) = info.find_address_pool(pool_id) {
            networks.push(pool.name.clone());
        }
    }

    CommonInterfaceInfo {
        name: iface.name.clone(),
        class,
        mtu: Some(iface.mtu),
        platform_networks: Some(networks),
        data_networks: Some(info.interface_data_network_names(iface)),
        ptp_role: iface.ptp_role.clone(),
        ptp_interfaces: Some(info.find_ptp_interface_names(iface)),
        uuid: Some(iface.id.clone()),
    }
}

fn first_lower(iface: &Interface) -> String {
    iface.uses.first().cloned().unwrap_or_default()
}

fn interfaces(info: &HostInfo) -> Result<InterfaceInfo> {
    let mut result = InterfaceInfo::default();

    for iface in &info.interfaces {
        let common = common_interface(iface, info);

        match iface.if_type.as_str() {
            values::IF_TYPE_ETHERNET => {
                let (port, lower) = match iface.uses.first() {
                    Some(lower) => (lower.clone(), lower.clone()),
                    None => {
                        let port = info.find_interface_port_name(&iface.id).ok_or_else(|| {
                            BuildError::missing(format!(
                                "unable to find port name for interface id {}",
                                iface.id
                            ))
                        })?;
                        (port.to_string(), String::new())
                    }
                };

                let sriov = iface.class.eq_ignore_ascii_case(values::IF_CLASS_PCI_SRIOV);
                result.ethernet.push(EthernetInfo {
                    common,
                    vf_count: if sriov { iface.vf_count } else { None },
                    vf_driver: if sriov { iface.vf_driver.clone() } else { None },
                    port: EthernetPortInfo { name: port },
                    lower,
                });
            }
            values::IF_TYPE_VIRTUAL => {
                result.ethernet.push(EthernetInfo {
                    port: EthernetPortInfo {
                        name: iface.name.clone(),
                    },
                    common,
                    ..Default::default()
                });
            }
            values::IF_TYPE_VLAN => {
                result.vlan.push(VlanInfo {
                    common,
                    lower: first_lower(iface),
                    vid: iface.vid.unwrap_or(0),
                });
            }
            values::IF_TYPE_AE => {
                result.bond.push(BondInfo {
                    common,
                    members: iface.uses.clone(),
                    mode: iface.ae_mode.clone().unwrap_or_default(),
                    transmit_hash_policy: iface.ae_transmit_hash.clone(),
                    primary_reselect: iface.ae_primary_reselect.clone(),
                });
            }
            values::IF_TYPE_VF => {
                result.vf.push(VfInfo {
                    common,
                    lower: first_lower(iface),
                    vf_count: iface.vf_count.unwrap_or(0),
                    vf_driver: iface.vf_driver.clone(),
                    max_tx_rate: iface.max_tx_rate,
                });
            }
            other => {
                tracing::debug!("Skipping interface {} of type {:?}", iface.name, other);
            }
        }
    }

    Ok(result)
}

fn addresses(info: &HostInfo) -> Vec<AddressInfo> {
    info.addresses
        .iter()
        .filter(|a| !info.is_system_address(a))
        .map(|a| AddressInfo {
            interface: a.interface_name.clone(),
            address: a.address.clone(),
            prefix: a.prefix,
        })
        .collect()
}

fn routes(info: &HostInfo) -> Vec<RouteInfo> {
    info.routes
        .iter()
        .map(|r| RouteInfo {
            interface: r.interface_name.clone(),
            network: r.network.clone(),
            prefix: r.prefix,
            gateway: r.gateway.clone(),
            metric: Some(r.metric),
        })
        .collect()
}

fn volume_groups(info: &HostInfo) -> Result<Vec<VolumeGroupInfo>> {
    let mut groups = Vec::with_capacity(info.volume_groups.len());

    for vg in &info.volume_groups {
        let mut physical_volumes = Vec::new();

        for pv in info.physical_volumes.iter().filter(|pv| pv.volume_group_id == vg.id) {
            let mut volume = PhysicalVolumeInfo {
                pv_type: pv.pv_type.clone(),
                path: pv.device_path.clone(),
                size: None,
            };

            if pv.pv_type == values::PV_TYPE_PARTITION {
                let partition = info.find_partition(&pv.device_uuid).ok_or_else(|| {
                    BuildError::missing(format!("failed to lookup partition {}", pv.device_uuid))
                })?;
                volume.size = Some(mib_to_gib(partition.size));
                volume.path = strip_partition_number(&partition.device_path);
            }

            physical_volumes.push(volume);
        }

        groups.push(VolumeGroupInfo {
            name: vg.name.clone(),
            lvm_type: vg.capabilities.lvm_type.clone(),
            physical_volumes,
        });
    }

    Ok(groups)
}

fn osds(info: &HostInfo) -> Vec<OsdInfo> {
    let mut result = Vec::new();

    for osd in &info.osds {
        let Some(disk) = info.find_disk(&osd.disk_id) else {
            tracing::warn!("Unable to find disk for OSD {}", osd.id);
            continue;
        };

        // A journal on the OSD itself is system generated.
        let journal = match &osd.journal_location {
            Some(location) if *location != osd.id => match &osd.journal_path {
                Some(path) => Some(JournalInfo {
                    location: strip_partition_number(path),
                    size: mib_to_gib(osd.journal_size_mib.unwrap_or(0)),
                }),
                None => {
                    tracing::warn!("Unexpected empty journal path for OSD {}", osd.id);
                    None
                }
            },
            _ => None,
        };

        result.push(OsdInfo {
            function: osd.function.clone(),
            path: disk.device_path.clone(),
            cluster_name: info.find_cluster_name_by_tier(&osd.tier_uuid).map(String::from),
            journal,
        });
    }

    result
}

fn storage(info: &HostInfo) -> Result<Option<ProfileStorageInfo>> {
    let mut storage = ProfileStorageInfo::default();

    // Controller monitors are managed by the platform itself.
    if info.host.personality == values::PERSONALITY_WORKER {
        storage.monitor = info.find_monitor().map(|m| MonitorInfo { size: Some(m.size) });
    }

    let groups = volume_groups(info)?;
    if !groups.is_empty() {
        storage.volume_groups = Some(groups);
    }

    let osds = osds(info);
    if !osds.is_empty() {
        storage.osds = Some(osds);
    }

    storage.file_systems = Some(
        info.file_systems
            .iter()
            .map(|fs| FileSystemInfo {
                name: fs.name.clone(),
                size: fs.size,
            })
            .collect(),
    );

    if storage.osds.is_none() && storage.volume_groups.is_none() && storage.file_systems.is_none() {
        return Ok(None);
    }

    Ok(Some(storage))
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// The full, unfiltered configuration of one host.
pub fn new_host_profile_spec(info: &HostInfo) -> Result<HostProfileSpec> {
    let host = &info.host;

    let mut spec = HostProfileSpec {
        personality: Some(host.personality.clone()),
        subfunctions: host.subfunctions.split(',').map(|s| s.to_string()).collect(),
        administrative_state: Some(host.administrative_state.clone()),
        console: Some(host.console.clone()),
        install_output: Some(host.install_output.clone()),
        hw_settle: non_empty(&host.hw_settle),
        app_armor: non_empty(&host.apparmor),
        max_cpu_mhz_configured: non_empty(&host.max_cpu_mhz_configured),
        location: host.location.locn.as_deref().and_then(non_empty),
        boot_device: Some(fix_device_path(&host.boot_device, info)),
        root_device: Some(fix_device_path(&host.root_device, info)),
        clock_synchronization: host.clock_synchronization.clone(),
        ptp_instances: info.ptp_instance_names(),
        power_on: Some(power_state(host)),
        board_management: Some(board_management(host)),
        labels: labels(info),
        kernel: info
            .kernel
            .as_ref()
            .and_then(|k| non_empty(&k.provisioned_kernel)),
        ..Default::default()
    };

    // Storing the bootstrap MAC would conflict once the real one is known.
    if host.boot_mac != ZERO_MAC {
        spec.boot_mac = Some(host.boot_mac.clone());
    }

    if spec.has_subfunction(values::SUBFUNCTION_WORKER) {
        spec.processors = processors(info);
        spec.memory = memory(info);
    }

    spec.interfaces = Some(interfaces(info)?);
    spec.addresses = addresses(info);
    spec.routes = routes(info);
    spec.storage = storage(info)?;

    Ok(spec)
}

pub fn new_host_profile(namespace: &str, info: &HostInfo) -> Result<HostProfile> {
    let spec = new_host_profile_spec(info)?;
    Ok(HostProfile::new(&profile_name(&info.host), namespace, spec))
}

/// A host bound to its own profile, carrying the inventory boot MAC as its
/// only override. A host still reporting the zero MAC gets no override.
pub fn new_host(namespace: &str, info: &HostInfo) -> Host {
    let name = host_name(&info.host);
    let spec = HostSpec {
        profile: name.to_string(),
        match_info: None,
        overrides: (info.host.boot_mac != ZERO_MAC).then(|| HostProfileSpec {
            boot_mac: Some(info.host.boot_mac.clone()),
            ..Default::default()
        }),
    };

    Host::new(name, namespace, spec)
}

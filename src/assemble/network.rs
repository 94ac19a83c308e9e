use std::collections::HashSet;

use crate::inventory::types::{self as inv, values};
use crate::models::network::*;

/// Section used for PTP parameters that do not name one.
pub const DEFAULT_PTP_SECTION: &str = "global";

pub fn new_data_network(namespace: &str, net: &inv::DataNetwork) -> DataNetwork {
    let mut spec = DataNetworkSpec {
        network_type: net.network_type.clone(),
        ..Default::default()
    };

    if net.mtu != values::DATANETWORK_DEFAULT_MTU {
        spec.mtu = Some(net.mtu);
    }

    if !net.description.is_empty() {
        spec.description = Some(net.description.clone());
    }

    if net.network_type == values::DATANETWORK_TYPE_VXLAN {
        let dynamic = net.mode.as_deref() == Some(values::ENDPOINT_MODE_DYNAMIC);
        spec.vxlan = Some(VxlanInfo {
            endpoint_mode: net.mode.clone(),
            udp_port_number: net.port_num,
            ttl: net.ttl,
            multicast_group: if dynamic {
                net.multicast_group.clone()
            } else {
                None
            },
        });
    }

    DataNetwork::new(&net.name, namespace, spec)
}

fn new_address_pool(namespace: &str, pool: &inv::AddressPool) -> AddressPool {
    let ranges = pool
        .ranges
        .iter()
        .filter_map(|range| match range.as_slice() {
            [start, end, ..] => Some(AllocationRange {
                start: start.clone(),
                end: end.clone(),
            }),
            _ => {
                tracing::warn!("Ignoring malformed range {:?} of pool {}", range, pool.name);
                None
            }
        })
        .collect();

    let spec = AddressPoolSpec {
        subnet: pool.network.clone(),
        prefix: pool.prefix,
        gateway: pool.gateway_address.clone(),
        floating_address: pool.floating_address.clone(),
        controller0_address: pool.controller0_address.clone(),
        controller1_address: pool.controller1_address.clone(),
        allocation: AllocationInfo {
            order: if pool.order.is_empty() {
                None
            } else {
                Some(pool.order.clone())
            },
            ranges,
        },
    };

    AddressPool::new(&pool.name, namespace, spec)
}

/// Ids of the pools a network draws from. The association list wins; the
/// pool recorded on the network itself is only a fallback.
fn associated_pool_ids<'a>(
    network: &'a inv::Network,
    associations: &'a [inv::NetworkAddressPool],
) -> Vec<&'a str> {
    let ids: Vec<&str> = associations
        .iter()
        .filter(|a| a.network_uuid == network.id)
        .map(|a| a.address_pool_uuid.as_str())
        .collect();

    if ids.is_empty() {
        network.pool_uuid.as_deref().into_iter().collect()
    } else {
        ids
    }
}

/// Platform networks of the exported types together with every address pool
/// they reference. A pool shared by several networks is emitted once.
pub fn new_platform_networks(
    namespace: &str,
    networks: &[inv::Network],
    pools: &[inv::AddressPool],
    associations: &[inv::NetworkAddressPool],
) -> (Vec<PlatformNetwork>, Vec<AddressPool>) {
    let mut platform_networks = Vec::new();
    let mut address_pools = Vec::new();
    let mut emitted = HashSet::new();

    for network in networks {
        if !values::EXPORTED_NETWORK_TYPES.contains(&network.network_type.as_str()) {
            tracing::debug!("Not exporting {} network {}", network.network_type, network.name);
            continue;
        }

        let mut pool_names = Vec::new();
        for id in associated_pool_ids(network, associations) {
            let Some(pool) = pools.iter().find(|p| p.id == id) else {
                tracing::warn!("Unable to find address pool {} of network {}", id, network.name);
                continue;
            };

            pool_names.push(pool.name.clone());
            if emitted.insert(pool.id.clone()) {
                address_pools.push(new_address_pool(namespace, pool));
            }
        }

        let spec = PlatformNetworkSpec {
            network_type: network.network_type.clone(),
            dynamic: network.dynamic,
            associated_address_pools: pool_names,
        };
        platform_networks.push(PlatformNetwork::new(&network.name, namespace, spec));
    }

    (platform_networks, address_pools)
}

/// Group `[section:]key=value` parameters by section, keeping their order.
pub fn parse_ptp_parameters(parameters: &[String]) -> PtpParameters {
    let mut result = PtpParameters::new();

    for parameter in parameters {
        let (section, value) = match (parameter.find(':'), parameter.find('=')) {
            (Some(colon), Some(equals)) if colon < equals => {
                (&parameter[..colon], &parameter[colon + 1..])
            }
            (Some(colon), None) => (&parameter[..colon], &parameter[colon + 1..]),
            _ => (DEFAULT_PTP_SECTION, parameter.as_str()),
        };

        result
            .entry(section.to_string())
            .or_default()
            .push(value.to_string());
    }

    result
}

pub fn new_ptp_instance(namespace: &str, instance: &inv::PtpInstance) -> PtpInstance {
    let spec = PtpInstanceSpec {
        service: instance.service.clone(),
        parameters: parse_ptp_parameters(&instance.parameters),
    };
    PtpInstance::new(&instance.name, namespace, spec)
}

pub fn new_ptp_interface(namespace: &str, interface: &inv::PtpInterface) -> PtpInterface {
    let spec = PtpInterfaceSpec {
        ptp_instance: interface.ptp_instance_name.clone(),
        parameters: parse_ptp_parameters(&interface.parameters),
    };
    PtpInterface::new(&interface.name, namespace, spec)
}

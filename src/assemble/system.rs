use crate::error::BuildError;
use crate::inventory::types as inv;
use crate::inventory::SystemInfo;
use crate::models::secret::names;
use crate::models::system::*;
use crate::utils::split_list;

/// Placeholder secret name for the certificate at `index`. Kubernetes names
/// do not allow underscores.
pub fn cert_secret_name(cert_type: &str, index: usize) -> String {
    format!("{}-cert-secret-{}", cert_type.replace('_', "-"), index)
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn certificates(certificates: &[inv::Certificate]) -> Vec<CertificateInfo> {
    certificates
        .iter()
        .enumerate()
        .map(|(index, c)| CertificateInfo {
            cert_type: c.cert_type.clone(),
            secret: cert_secret_name(&c.cert_type, index),
            signature: c.signature.clone(),
        })
        .collect()
}

fn service_parameters(parameters: &[inv::ServiceParameter]) -> Vec<ServiceParameterInfo> {
    parameters
        .iter()
        .map(|sp| ServiceParameterInfo {
            service: sp.service.clone(),
            section: sp.section.clone(),
            param_name: sp.name.clone(),
            param_value: sp.value.clone(),
            personality: sp.personality.clone(),
            resource: sp.resource.clone(),
        })
        .collect()
}

/// Replication is reported as a string; anything unparsable becomes 0.
fn replication_factor(backend: &inv::StorageBackend) -> i32 {
    let value = &backend.capabilities.replication;
    match value.parse() {
        Ok(factor) => factor,
        Err(_) => {
            tracing::warn!(
                "Storage backend {}: {}",
                backend.name,
                BuildError::invalid("replication", value)
            );
            0
        }
    }
}

fn storage_backends(backends: &[inv::StorageBackend]) -> Vec<StorageBackend> {
    backends
        .iter()
        .map(|sb| StorageBackend {
            name: sb.name.clone(),
            backend_type: sb.backend.clone(),
            replication_factor: Some(replication_factor(sb)),
            network: Some(sb.network.clone()),
        })
        .collect()
}

pub fn new_system_spec(info: &SystemInfo) -> SystemSpec {
    let system = &info.system;

    let mut spec = SystemSpec {
        location: non_empty(&system.location),
        description: non_empty(&system.description),
        contact: non_empty(&system.contact),
        latitude: non_empty(&system.latitude),
        longitude: non_empty(&system.longitude),
        vswitch_type: Some(system.capabilities.vswitch_type.clone()),
        dns_servers: info.dns.as_ref().map(|dns| split_list(&dns.nameservers)),
        ntp_servers: info.ntp.as_ref().map(|ntp| split_list(&ntp.ntpservers)),
        ptp: info.ptp.as_ref().map(|ptp| PtpInfo {
            mode: Some(ptp.mode.clone()),
            transport: Some(ptp.transport.clone()),
            mechanism: Some(ptp.mechanism.clone()),
        }),
        license: info.license.as_ref().map(|_| LicenseInfo {
            secret: names::SYSTEM_LICENSE.to_string(),
        }),
        ..Default::default()
    };

    if let Some(drbd) = &info.drbd {
        spec.storage = Some(SystemStorageInfo {
            drbd: Some(DrbdConfiguration {
                link_utilization: drbd.link_util,
            }),
            ..Default::default()
        });
    }

    if !info.certificates.is_empty() {
        spec.certificates = Some(certificates(&info.certificates));
    }

    if !info.service_parameters.is_empty() {
        spec.service_parameters = Some(service_parameters(&info.service_parameters));
    }

    if !info.file_systems.is_empty() {
        let file_systems = info
            .file_systems
            .iter()
            .map(|fs| ControllerFileSystemInfo {
                name: fs.name.clone(),
                size: fs.size,
            })
            .collect();
        spec.storage.get_or_insert_with(Default::default).file_systems = Some(file_systems);
    }

    if !info.storage_backends.is_empty() {
        spec.storage.get_or_insert_with(Default::default).backends =
            Some(storage_backends(&info.storage_backends));
    }

    spec
}

pub fn new_system(namespace: &str, name: &str, info: &SystemInfo) -> System {
    let status = SystemStatus {
        system_type: info.system.system_type.clone(),
        system_mode: info.system.system_mode.clone(),
    };

    System::new(name, namespace, new_system_spec(info), status)
}

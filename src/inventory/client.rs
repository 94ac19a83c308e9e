use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use super::types::*;
use super::Inventory;
use crate::config::Credentials;
use crate::error::{kind_of, BuildError};

const PLATFORM_SERVICE_TYPE: &str = "platform";
const PLATFORM_SERVICE_NAME: &str = "sysinv";
const DEFAULT_INTERFACE: &str = "public";
const LICENSE_NOT_FOUND: &str = "License file not found";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: Token,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Token {
    catalog: Vec<CatalogEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogEntry {
    #[serde(rename = "type")]
    service_type: String,
    name: String,
    endpoints: Vec<CatalogEndpoint>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogEndpoint {
    interface: String,
    region: String,
    region_id: String,
    url: String,
}

/// Picks the platform inventory endpoint out of a Keystone service catalog.
fn select_endpoint(catalog: &[CatalogEntry], interface: &str, region: &str) -> Option<String> {
    catalog
        .iter()
        .filter(|e| e.service_type == PLATFORM_SERVICE_TYPE && e.name == PLATFORM_SERVICE_NAME)
        .flat_map(|e| e.endpoints.iter())
        .find(|ep| {
            ep.interface == interface
                && (region.is_empty() || ep.region == region || ep.region_id == region)
        })
        .map(|ep| ep.url.trim_end_matches('/').to_string())
}

fn password_auth_body(credentials: &Credentials) -> serde_json::Value {
    let user_domain = if credentials.user_domain_name.is_empty() {
        "Default"
    } else {
        credentials.user_domain_name.as_str()
    };
    let project_domain = if credentials.project_domain_name.is_empty() {
        "Default"
    } else {
        credentials.project_domain_name.as_str()
    };

    serde_json::json!({
        "auth": {
            "identity": {
                "methods": ["password"],
                "password": {
                    "user": {
                        "name": credentials.username,
                        "domain": { "name": user_domain },
                        "password": credentials.password,
                    }
                }
            },
            "scope": {
                "project": {
                    "name": credentials.project_name,
                    "domain": { "name": project_domain },
                }
            }
        }
    })
}

/// Platform inventory API client
pub struct InventoryClient {
    base_url: String,
    token: String,
    client: Client,
}

impl InventoryClient {
    pub fn new(url: String, token: String, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            base_url: url.trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    /// Authenticate against Keystone and resolve the platform endpoint from
    /// the returned service catalog.
    pub async fn connect(credentials: &Credentials, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        let auth_url = format!("{}/auth/tokens", credentials.auth_url.trim_end_matches('/'));
        tracing::debug!("Authenticating against {}", auth_url);

        let resp = client
            .post(&auth_url)
            .json(&password_auth_body(credentials))
            .send()
            .await
            .map_err(|e| BuildError::unavailable("authenticate", e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(BuildError::unavailable(
                "authenticate",
                format!("Keystone API error {}: {}", status, body),
            )
            .into());
        }

        let token = resp
            .headers()
            .get("X-Subject-Token")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
            .ok_or_else(|| BuildError::unavailable("authenticate", "no X-Subject-Token in response"))?;

        let body: TokenResponse = resp
            .json()
            .await
            .map_err(|e| BuildError::unavailable("authenticate", e))?;

        let interface = if credentials.interface.is_empty() {
            DEFAULT_INTERFACE
        } else {
            credentials.interface.as_str()
        };

        let url = select_endpoint(&body.token.catalog, interface, &credentials.region_name)
            .ok_or_else(|| {
                BuildError::unavailable(
                    "authenticate",
                    format!(
                        "no {} endpoint for {} service in region {:?}",
                        interface, PLATFORM_SERVICE_NAME, credentials.region_name
                    ),
                )
            })?;

        tracing::info!("Using platform inventory endpoint {}", url);
        Self::new(url, token, timeout_secs)
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn fetch(&self, path: &str) -> Result<(StatusCode, String)> {
        let resp = self
            .client
            .get(self.api_url(path))
            .header("X-Auth-Token", &self.token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| BuildError::unavailable(path, e))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| BuildError::unavailable(path, e))?;
        Ok((status, body))
    }

    /// Helper to perform a GET returning a single object
    async fn get_one<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let (status, body) = self.fetch(path).await?;

        if status == StatusCode::NOT_FOUND {
            return Err(BuildError::inconsistent(path, "").into());
        }
        if !status.is_success() {
            return Err(BuildError::unavailable(
                path,
                format!("inventory API error {}: {}", status, body),
            )
            .into());
        }

        serde_json::from_str(&body).map_err(|e| BuildError::unavailable(path, e).into())
    }

    /// Helper to perform a GET list request. Every list is wrapped in an
    /// object under a resource specific key.
    async fn list<T: DeserializeOwned>(&self, path: &str, key: &str) -> Result<Vec<T>> {
        let (status, body) = self.fetch(path).await?;

        if !status.is_success() {
            return Err(BuildError::unavailable(
                path,
                format!("inventory API error {}: {}", status, body),
            )
            .into());
        }

        decode_list(&body, key).map_err(|e| BuildError::unavailable(path, e).into())
    }
}

/// Names the missing object when a single-object read answers 404.
fn not_found_as(resource: &str, id: &str, err: anyhow::Error) -> anyhow::Error {
    if matches!(kind_of(&err), Some(BuildError::InventoryInconsistent { .. })) {
        BuildError::inconsistent(resource, id).into()
    } else {
        err
    }
}

fn decode_list<T: DeserializeOwned>(body: &str, key: &str) -> Result<Vec<T>, String> {
    let mut value: serde_json::Value = serde_json::from_str(body).map_err(|e| e.to_string())?;
    match value.get_mut(key) {
        Some(items) => serde_json::from_value(items.take()).map_err(|e| e.to_string()),
        None => Err(format!("response has no {:?} list", key)),
    }
}

#[async_trait]
impl Inventory for InventoryClient {
    async fn list_systems(&self) -> Result<Vec<System>> {
        self.list("isystems", "isystems").await
    }

    async fn list_drbd(&self) -> Result<Vec<Drbd>> {
        self.list("drbdconfig", "drbdconfigs").await
    }

    async fn list_dns(&self) -> Result<Vec<Dns>> {
        self.list("idns", "idnss").await
    }

    async fn list_ntp(&self) -> Result<Vec<Ntp>> {
        self.list("intps", "intps").await
    }

    async fn list_ptp(&self) -> Result<Vec<Ptp>> {
        self.list("ptps", "ptps").await
    }

    async fn list_certificates(&self) -> Result<Vec<Certificate>> {
        self.list("certificate", "certificates").await
    }

    async fn list_service_parameters(&self) -> Result<Vec<ServiceParameter>> {
        self.list("service_parameter", "parameters").await
    }

    async fn list_storage_backends(&self) -> Result<Vec<StorageBackend>> {
        self.list("storage_backends", "storage_backends").await
    }

    async fn list_controller_filesystems(&self) -> Result<Vec<ControllerFileSystem>> {
        self.list("controller_fs", "controller_fs").await
    }

    async fn get_license(&self) -> Result<Option<License>> {
        let path = "license/get_license_file";
        let (status, body) = self.fetch(path).await?;

        if body.contains(LICENSE_NOT_FOUND) {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(BuildError::unavailable(
                path,
                format!("inventory API error {}: {}", status, body),
            )
            .into());
        }

        let license: License =
            serde_json::from_str(&body).map_err(|e| BuildError::unavailable(path, e))?;
        if !license.error.is_empty() {
            return Err(BuildError::unavailable(path, license.error).into());
        }

        Ok(Some(license))
    }

    async fn list_networks(&self) -> Result<Vec<Network>> {
        self.list("networks", "networks").await
    }

    async fn list_address_pools(&self) -> Result<Vec<AddressPool>> {
        self.list("addrpools", "addrpools").await
    }

    async fn list_network_address_pools(&self) -> Result<Vec<NetworkAddressPool>> {
        self.list("network_addresspools", "network_addresspools").await
    }

    async fn list_data_networks(&self) -> Result<Vec<DataNetwork>> {
        self.list("datanetworks", "datanetworks").await
    }

    async fn list_ptp_instances(&self) -> Result<Vec<PtpInstance>> {
        self.list("ptp_instances", "ptp_instances").await
    }

    async fn list_ptp_interfaces(&self) -> Result<Vec<PtpInterface>> {
        self.list("ptp_interfaces", "ptp_interfaces").await
    }

    async fn list_ceph_monitors(&self) -> Result<Vec<CephMonitor>> {
        self.list("ceph_mon", "ceph_mon").await
    }

    async fn list_clusters(&self) -> Result<Vec<Cluster>> {
        self.list("clusters", "clusters").await
    }

    async fn list_storage_tiers(&self, cluster_id: &str) -> Result<Vec<StorageTier>> {
        self.list(&format!("clusters/{}/storage_tiers", cluster_id), "storage_tiers")
            .await
    }

    async fn get_partition(&self, partition_id: &str) -> Result<Partition> {
        let path = format!("partitions/{}", partition_id);
        self.get_one(&path)
            .await
            .map_err(|e| not_found_as("partition", partition_id, e))
    }

    async fn list_hosts(&self) -> Result<Vec<Host>> {
        self.list("ihosts", "ihosts").await
    }

    async fn get_host(&self, host_id: &str) -> Result<Host> {
        let path = format!("ihosts/{}", host_id);
        self.get_one(&path)
            .await
            .map_err(|e| not_found_as("host", host_id, e))
    }

    async fn get_kernel(&self, host_id: &str) -> Result<Kernel> {
        self.get_one(&format!("ihosts/{}/kernel", host_id)).await
    }

    async fn list_labels(&self, host_id: &str) -> Result<Vec<Label>> {
        self.list(&format!("ihosts/{}/labels", host_id), "labels").await
    }

    async fn list_cpus(&self, host_id: &str) -> Result<Vec<Cpu>> {
        self.list(&format!("ihosts/{}/icpus", host_id), "icpus").await
    }

    async fn list_memory(&self, host_id: &str) -> Result<Vec<Memory>> {
        self.list(&format!("ihosts/{}/imemorys", host_id), "imemorys").await
    }

    async fn list_interfaces(&self, host_id: &str) -> Result<Vec<Interface>> {
        self.list(&format!("ihosts/{}/iinterfaces", host_id), "iinterfaces")
            .await
    }

    async fn list_ports(&self, host_id: &str) -> Result<Vec<Port>> {
        self.list(&format!("ihosts/{}/ethernet_ports", host_id), "ethernet_ports")
            .await
    }

    async fn list_addresses(&self, host_id: &str) -> Result<Vec<Address>> {
        self.list(&format!("ihosts/{}/addresses", host_id), "addresses")
            .await
    }

    async fn list_routes(&self, host_id: &str) -> Result<Vec<Route>> {
        self.list(&format!("ihosts/{}/routes", host_id), "routes").await
    }

    async fn list_disks(&self, host_id: &str) -> Result<Vec<Disk>> {
        self.list(&format!("ihosts/{}/idisks", host_id), "idisks").await
    }

    async fn list_partitions(&self, host_id: &str) -> Result<Vec<Partition>> {
        self.list(&format!("ihosts/{}/partitions", host_id), "partitions")
            .await
    }

    async fn list_physical_volumes(&self, host_id: &str) -> Result<Vec<PhysicalVolume>> {
        self.list(&format!("ihosts/{}/ipvs", host_id), "ipvs").await
    }

    async fn list_volume_groups(&self, host_id: &str) -> Result<Vec<VolumeGroup>> {
        self.list(&format!("ihosts/{}/ilvgs", host_id), "ilvgs").await
    }

    async fn list_osds(&self, host_id: &str) -> Result<Vec<Osd>> {
        self.list(&format!("ihosts/{}/istors", host_id), "istors").await
    }

    async fn list_host_filesystems(&self, host_id: &str) -> Result<Vec<HostFileSystem>> {
        self.list(&format!("ihosts/{}/host_fs", host_id), "host_fs").await
    }

    async fn list_interface_networks(&self, host_id: &str) -> Result<Vec<InterfaceNetwork>> {
        self.list(
            &format!("ihosts/{}/interface_networks", host_id),
            "interface_networks",
        )
        .await
    }

    async fn list_interface_data_networks(
        &self,
        host_id: &str,
    ) -> Result<Vec<InterfaceDataNetwork>> {
        self.list(
            &format!("ihosts/{}/interface_datanetworks", host_id),
            "interface_datanetworks",
        )
        .await
    }

    async fn list_host_ptp_instances(&self, host_id: &str) -> Result<Vec<PtpInstance>> {
        self.list(&format!("ihosts/{}/ptp_instances", host_id), "ptp_instances")
            .await
    }

    async fn list_host_ptp_interfaces(&self, host_id: &str) -> Result<Vec<PtpInterface>> {
        self.list(&format!("ihosts/{}/ptp_interfaces", host_id), "ptp_interfaces")
            .await
    }
}

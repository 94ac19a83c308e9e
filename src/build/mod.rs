//! Deployment assembly.
//!
//! [`DeploymentBuilder::build`] reads the inventory once, in a fixed order,
//! runs the filter chains over the assembled resources and collapses
//! identical host profiles. The result is a [`Deployment`] which renders
//! itself as a manifest (see [`manifest`]).

pub mod manifest;

use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashSet};
use std::io::Write;
use std::sync::Arc;

use crate::assemble;
use crate::config::Credentials;
use crate::error::BuildError;
use crate::filters::{self, HostFilter, PlatformNetworkFilter, ProfileFilter, SystemFilter};
use crate::inventory::{HostInfo, Inventory, SystemInfo};
use crate::models::host::provisioning_mode;
use crate::models::secret::names;
use crate::models::system::{SystemSpec, SystemStatus};
use crate::models::{
    AddressPool, DataNetwork, DeepEqual, Host, HostProfile, Namespace, PlatformNetwork,
    PtpInstance, PtpInterface, Secret, System,
};

/// Keys of the system endpoint secret
pub mod endpoint_keys {
    pub const USERNAME: &str = "OS_USERNAME";
    pub const PASSWORD: &str = "OS_PASSWORD";
    pub const REGION_NAME: &str = "OS_REGION_NAME";
    pub const USER_DOMAIN_NAME: &str = "OS_USER_DOMAIN_NAME";
    pub const PROJECT_NAME: &str = "OS_PROJECT_NAME";
    pub const AUTH_URL: &str = "OS_AUTH_URL";
    pub const INTERFACE: &str = "OS_INTERFACE";
    pub const KEYSTONE_REGION_NAME: &str = "OS_KEYSTONE_REGION_NAME";
}

/// Every resource of one system, in manifest order.
#[derive(Debug, Clone)]
pub struct Deployment {
    pub namespace: Namespace,
    pub secrets: Vec<Secret>,
    /// Placeholders the user has to fill in before the manifest is applied.
    pub incomplete_secrets: Vec<Secret>,
    pub system: System,
    pub platform_networks: Vec<PlatformNetwork>,
    pub address_pools: Vec<AddressPool>,
    pub data_networks: Vec<DataNetwork>,
    pub ptp_instances: Vec<PtpInstance>,
    pub ptp_interfaces: Vec<PtpInterface>,
    pub profiles: Vec<HostProfile>,
    pub hosts: Vec<Host>,
}

impl Deployment {
    /// An empty deployment; the system carries no attributes yet.
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            namespace: Namespace::new(namespace),
            secrets: Vec::new(),
            incomplete_secrets: Vec::new(),
            system: System::new(name, namespace, SystemSpec::default(), SystemStatus::default()),
            platform_networks: Vec::new(),
            address_pools: Vec::new(),
            data_networks: Vec::new(),
            ptp_instances: Vec::new(),
            ptp_interfaces: Vec::new(),
            profiles: Vec::new(),
            hosts: Vec::new(),
        }
    }

    pub fn has_incomplete_secrets(&self) -> bool {
        !self.incomplete_secrets.is_empty()
    }

    pub fn find_profile(&self, name: &str) -> Option<&HostProfile> {
        self.profiles.iter().find(|p| p.metadata.name == name)
    }
}

/// Opaque secret the deployment manager uses to reach the platform API.
pub fn new_endpoint_secret(name: &str, namespace: &str, credentials: &Credentials) -> Secret {
    let mut data = BTreeMap::new();
    data.insert(
        endpoint_keys::USERNAME.to_string(),
        credentials.username.as_bytes().to_vec(),
    );
    data.insert(
        endpoint_keys::PASSWORD.to_string(),
        credentials.password.as_bytes().to_vec(),
    );

    let mut string_data = BTreeMap::new();
    for (key, value) in [
        (endpoint_keys::REGION_NAME, &credentials.region_name),
        (endpoint_keys::USER_DOMAIN_NAME, &credentials.user_domain_name),
        (endpoint_keys::PROJECT_NAME, &credentials.project_name),
        (endpoint_keys::AUTH_URL, &credentials.auth_url),
        (endpoint_keys::INTERFACE, &credentials.interface),
    ] {
        string_data.insert(key.to_string(), value.clone());
    }

    // Only some regions need it.
    if !credentials.keystone_region_name.is_empty() {
        string_data.insert(
            endpoint_keys::KEYSTONE_REGION_NAME.to_string(),
            credentials.keystone_region_name.clone(),
        );
    }

    Secret::opaque(name, namespace, data, string_data)
}

/// Builds a [`Deployment`] from a running system.
pub struct DeploymentBuilder {
    inventory: Arc<dyn Inventory>,
    namespace: String,
    name: String,
    progress: Box<dyn Write + Send>,
    credentials: Credentials,
    system_filters: Vec<Box<dyn SystemFilter>>,
    host_filters: Vec<Box<dyn HostFilter>>,
    profile_filters: Vec<Box<dyn ProfileFilter>>,
    platform_network_filters: Vec<Box<dyn PlatformNetworkFilter>>,
}

impl DeploymentBuilder {
    /// A builder running only the default host filters. Progress lines are
    /// written to `progress`; write failures are ignored.
    pub fn new(
        inventory: Arc<dyn Inventory>,
        namespace: &str,
        name: &str,
        progress: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            inventory,
            namespace: namespace.to_string(),
            name: name.to_string(),
            progress,
            credentials: Credentials::default(),
            system_filters: Vec::new(),
            host_filters: filters::default_host_filters(),
            profile_filters: Vec::new(),
            platform_network_filters: Vec::new(),
        }
    }

    /// Credentials written into the system endpoint secret.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn add_system_filters(&mut self, filters: Vec<Box<dyn SystemFilter>>) {
        self.system_filters.extend(filters);
    }

    pub fn add_host_filters(&mut self, filters: Vec<Box<dyn HostFilter>>) {
        self.host_filters.extend(filters);
    }

    pub fn add_profile_filters(&mut self, filters: Vec<Box<dyn ProfileFilter>>) {
        self.profile_filters.extend(filters);
    }

    pub fn add_platform_network_filters(&mut self, filters: Vec<Box<dyn PlatformNetworkFilter>>) {
        self.platform_network_filters.extend(filters);
    }

    fn progress(&mut self, args: std::fmt::Arguments<'_>) {
        let _ = self.progress.write_fmt(args);
    }

    pub async fn build(&mut self) -> Result<Deployment> {
        let (name, namespace) = (self.name.clone(), self.namespace.clone());
        let mut deployment = Deployment::new(&namespace, &name);

        self.progress(format_args!(
            "building deployment for system {:?} in namespace {:?}\n",
            name, namespace
        ));
        tracing::info!(system = %name, namespace = %namespace, "Building deployment");

        self.progress(format_args!("building namespace configuration\n"));

        self.progress(format_args!("building system configuration\n"));
        let system_info = self.build_system(&mut deployment).await?;

        self.progress(format_args!("building system endpoint secret configuration\n"));
        deployment.secrets.push(new_endpoint_secret(
            names::SYSTEM_ENDPOINT,
            &self.namespace,
            &self.credentials,
        ));

        self.progress(format_args!("building system license secret configuration\n"));
        self.build_license_secret(&mut deployment, &system_info);

        self.progress(format_args!("building certificate secret configurations\n"));
        self.build_certificate_secrets(&mut deployment);

        self.progress(format_args!("building data network configurations\n"));
        self.build_data_networks(&mut deployment).await?;

        self.progress(format_args!("building platform network configurations\n"));
        self.build_platform_networks(&mut deployment).await?;

        self.progress(format_args!("building PTP instance configurations\n"));
        self.build_ptp_instances(&mut deployment).await?;

        self.progress(format_args!("building PTP interface configurations\n"));
        self.build_ptp_interfaces(&mut deployment).await?;

        self.progress(format_args!("building host and profile configurations\n"));
        self.build_hosts_and_profiles(&mut deployment).await?;

        self.progress(format_args!("re-running profile filters for second pass\n"));
        self.filter_profiles(&mut deployment)?;

        self.progress(format_args!("simplifying profile configurations\n"));
        self.simplify_profiles(&mut deployment)?;

        tracing::info!(
            hosts = deployment.hosts.len(),
            profiles = deployment.profiles.len(),
            incomplete_secrets = deployment.incomplete_secrets.len(),
            "Deployment built"
        );

        Ok(deployment)
    }

    async fn build_system(&mut self, deployment: &mut Deployment) -> Result<SystemInfo> {
        let info = SystemInfo::populate(self.inventory.as_ref())
            .await
            .context("failed to collect system information")?;

        let mut system = assemble::new_system(&self.namespace, &self.name, &info);

        self.progress(format_args!("...filtering system attributes\n"));
        for filter in &mut self.system_filters {
            filter.filter(&mut system, deployment)?;
        }

        deployment.system = system;
        Ok(info)
    }

    fn build_license_secret(&self, deployment: &mut Deployment, info: &SystemInfo) {
        let license = deployment.system.spec.license.as_ref();
        if let (Some(license), Some(file)) = (license, info.license.as_ref()) {
            let secret = Secret::license(&license.secret, &self.namespace, &file.content);
            deployment.secrets.push(secret);
        }
    }

    /// Certificate material never leaves the system; each certificate gets
    /// a placeholder.
    fn build_certificate_secrets(&self, deployment: &mut Deployment) {
        let Some(certificates) = deployment.system.spec.certificates.as_ref() else {
            return;
        };

        let placeholders: Vec<Secret> = certificates
            .iter()
            .map(|c| Secret::incomplete_tls(&c.secret, &self.namespace))
            .collect();
        deployment.incomplete_secrets.extend(placeholders);
    }

    async fn build_data_networks(&mut self, deployment: &mut Deployment) -> Result<()> {
        let networks = self
            .inventory
            .list_data_networks()
            .await
            .context("failed to list data networks")?;

        deployment.data_networks = networks
            .iter()
            .map(|n| assemble::new_data_network(&self.namespace, n))
            .collect();

        Ok(())
    }

    async fn build_platform_networks(&mut self, deployment: &mut Deployment) -> Result<()> {
        let networks = self
            .inventory
            .list_networks()
            .await
            .context("failed to list platform networks")?;
        let pools = self
            .inventory
            .list_address_pools()
            .await
            .context("failed to list address pools")?;
        let associations = self
            .inventory
            .list_network_address_pools()
            .await
            .context("failed to list network address pools")?;

        let (mut platform_networks, address_pools) =
            assemble::new_platform_networks(&self.namespace, &networks, &pools, &associations);

        for network in &mut platform_networks {
            for filter in &mut self.platform_network_filters {
                filter.filter(network, deployment)?;
            }
        }

        deployment.platform_networks = platform_networks;
        deployment.address_pools = address_pools;

        Ok(())
    }

    async fn build_ptp_instances(&mut self, deployment: &mut Deployment) -> Result<()> {
        let instances = self
            .inventory
            .list_ptp_instances()
            .await
            .context("failed to list PTP instances")?;

        deployment.ptp_instances = instances
            .iter()
            .map(|i| assemble::new_ptp_instance(&self.namespace, i))
            .collect();

        Ok(())
    }

    async fn build_ptp_interfaces(&mut self, deployment: &mut Deployment) -> Result<()> {
        let interfaces = self
            .inventory
            .list_ptp_interfaces()
            .await
            .context("failed to list PTP interfaces")?;

        deployment.ptp_interfaces = interfaces
            .iter()
            .map(|i| assemble::new_ptp_interface(&self.namespace, i))
            .collect();

        Ok(())
    }

    fn filter_host(
        &mut self,
        profile: &mut HostProfile,
        host: &mut Host,
        deployment: &Deployment,
    ) -> Result<()> {
        for filter in &mut self.host_filters {
            filter.filter(profile, host, deployment)?;
        }
        Ok(())
    }

    fn filter_profile(&mut self, profile: &mut HostProfile, deployment: &Deployment) -> Result<()> {
        for filter in &mut self.profile_filters {
            filter.filter(profile, deployment)?;
        }
        Ok(())
    }

    fn reset_profile_filters(&mut self) {
        for filter in &mut self.profile_filters {
            filter.reset();
        }
    }

    async fn build_hosts_and_profiles(&mut self, deployment: &mut Deployment) -> Result<()> {
        let hosts = self
            .inventory
            .list_hosts()
            .await
            .context("failed to list hosts")?;

        let mut bm_secret_generated = false;

        for h in &hosts {
            self.reset_profile_filters();

            let hostname = assemble::host::host_name(h).to_string();
            self.progress(format_args!("...Building host configuration for {:?}\n", hostname));

            let info = HostInfo::populate(self.inventory.as_ref(), &h.id)
                .await
                .with_context(|| format!("failed to collect host information for {}", hostname))?;

            let mut host = assemble::new_host(&self.namespace, &info);

            self.progress(format_args!(
                "...Building host profile configuration for {:?}\n",
                hostname
            ));

            let mut profile = assemble::new_host_profile(&self.namespace, &info)?;

            // The boot MAC is host specific and already on the host.
            profile.spec.boot_mac = None;
            profile.spec.provisioning_mode = Some(provisioning_mode::STATIC.to_string());
            host.spec.profile = profile.metadata.name.clone();

            // Hosts are assumed to share their BMC credentials, so a single
            // placeholder is enough.
            if !bm_secret_generated {
                let password = profile
                    .spec
                    .board_management
                    .as_ref()
                    .and_then(|bm| bm.credentials.as_ref())
                    .and_then(|c| c.password.as_ref());

                if let (Some(password), Some(username)) = (password, h.bm_username.as_ref()) {
                    deployment.incomplete_secrets.push(Secret::incomplete_basic_auth(
                        &password.secret,
                        &self.namespace,
                        username,
                    ));
                    bm_secret_generated = true;
                }
            }

            self.progress(format_args!(
                "...Running profile filters for {:?}\n",
                profile.metadata.name
            ));

            self.filter_host(&mut profile, &mut host, deployment)?;
            self.filter_profile(&mut profile, deployment)?;
            for filter in &mut self.profile_filters {
                filter.update_host(&mut host)?;
            }

            deployment.hosts.push(host);
            deployment.profiles.push(profile);
        }

        Ok(())
    }

    /// Second pass, for filters that need to have seen every profile.
    fn filter_profiles(&mut self, deployment: &mut Deployment) -> Result<()> {
        let mut profiles = std::mem::take(&mut deployment.profiles);

        for profile in &mut profiles {
            self.progress(format_args!(
                "...Running profile filters for {:?}\n",
                profile.metadata.name
            ));
            self.filter_profile(profile, deployment)?;
        }

        deployment.profiles = profiles;
        Ok(())
    }

    /// Points every host at the first profile equal to its own and drops the
    /// profiles nothing refers to anymore.
    fn simplify_profiles(&mut self, deployment: &mut Deployment) -> Result<()> {
        let mut retained = HashSet::new();

        for host in &mut deployment.hosts {
            let profile = deployment
                .profiles
                .iter()
                .find(|p| p.metadata.name == host.spec.profile)
                .ok_or_else(|| {
                    BuildError::filter(format!("unable to find profile {:?}", host.spec.profile))
                })?;

            if let Some(first) = deployment
                .profiles
                .iter()
                .find(|p| p.spec.deep_equal(&profile.spec))
            {
                host.spec.profile = first.metadata.name.clone();
            }

            if host.spec.profile == profile.metadata.name {
                retained.insert(profile.metadata.name.clone());
            } else {
                let _ = writeln!(
                    self.progress,
                    "...Profile {:?} not unique using {:?} instead",
                    profile.metadata.name, host.spec.profile
                );
            }
        }

        deployment
            .profiles
            .retain(|p| retained.contains(&p.metadata.name));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterOptions;
    use crate::error::{kind_of, BuildError};
    use crate::inventory::fake::{self, FakeInventory};
    use crate::inventory::types::{values, Address, Cluster, Disk, Interface, Osd, StorageTier};
    use crate::models::host::JournalInfo;
    use crate::models::secret::secret_type;
    use proptest::prelude::*;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct Progress(Arc<Mutex<Vec<u8>>>);

    impl Write for Progress {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Progress {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn builder(inv: FakeInventory, options: &FilterOptions, progress: Progress) -> DeploymentBuilder {
        let mut builder =
            DeploymentBuilder::new(Arc::new(inv), "deployment", "vbox", Box::new(progress));
        builder.add_system_filters(filters::system_filters(options));
        builder.add_profile_filters(filters::profile_filters(options));
        builder
    }

    fn build(inv: FakeInventory, options: &FilterOptions) -> Result<Deployment> {
        tokio_test::block_on(builder(inv, options, Progress::default()).build())
    }

    fn host<'a>(deployment: &'a Deployment, name: &str) -> &'a Host {
        deployment
            .hosts
            .iter()
            .find(|h| h.metadata.name == name)
            .unwrap()
    }

    fn kind_rank(kind: &str) -> usize {
        [
            "Namespace",
            "Secret",
            "System",
            "PlatformNetwork",
            "AddressPool",
            "DataNetwork",
            "PtpInstance",
            "PtpInterface",
            "HostProfile",
            "Host",
        ]
        .iter()
        .position(|k| *k == kind)
        .unwrap()
    }

    fn document_kinds(text: &str) -> Vec<String> {
        text.split(manifest::DOCUMENT_SEPARATOR)
            .filter(|doc| !doc.is_empty())
            .map(|doc| {
                let value: serde_yaml::Value = serde_yaml::from_str(doc).unwrap();
                value["kind"].as_str().unwrap().to_string()
            })
            .collect()
    }

    fn assert_profiles_consistent(deployment: &Deployment) {
        for host in &deployment.hosts {
            assert!(
                deployment.find_profile(&host.spec.profile).is_some(),
                "host {} refers to missing profile {}",
                host.metadata.name,
                host.spec.profile
            );
        }

        for (i, a) in deployment.profiles.iter().enumerate() {
            for b in &deployment.profiles[i + 1..] {
                assert!(
                    !a.spec.deep_equal(&b.spec),
                    "profiles {} and {} are identical",
                    a.metadata.name,
                    b.metadata.name
                );
            }
        }
    }

    #[test]
    fn test_aio_simplex() {
        let deployment = build(FakeInventory::aio_simplex(), &FilterOptions::default()).unwrap();

        let names: Vec<&str> = deployment.secrets.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec![names::SYSTEM_ENDPOINT]);

        let placeholders: Vec<&str> = deployment.incomplete_secrets.iter().map(|s| s.name()).collect();
        assert_eq!(placeholders, vec!["ssl-cert-secret-0", "ssl-ca-cert-secret-1"]);
        assert!(deployment
            .incomplete_secrets
            .iter()
            .all(|s| s.secret_type() == secret_type::TLS));
        assert!(deployment.has_incomplete_secrets());

        assert_eq!(deployment.profiles.len(), 1);
        let profile = &deployment.profiles[0];
        assert_eq!(profile.metadata.name, "controller-0-profile");
        assert!(profile.spec.boot_mac.is_none());
        assert_eq!(profile.spec.provisioning_mode.as_deref(), Some("static"));
        assert!(profile.spec.addresses.is_empty());

        let controller = host(&deployment, "controller-0");
        assert_eq!(controller.spec.profile, "controller-0-profile");
        assert_eq!(
            controller
                .spec
                .match_info
                .as_ref()
                .and_then(|m| m.boot_mac.as_deref()),
            Some("08:00:27:00:00:01")
        );

        let overrides = controller.spec.overrides.as_ref().unwrap();
        assert_eq!(overrides.provisioning_mode.as_deref(), Some("dynamic"));
        assert!(overrides.boot_mac.is_none());
        let loopback = &overrides.interfaces.as_ref().unwrap().ethernet;
        assert_eq!(loopback.len(), 1);
        assert_eq!(loopback[0].common.name, "lo");
        assert_eq!(overrides.addresses.len(), 1);
        assert_eq!(overrides.addresses[0].address, "192.168.100.10");
        assert_eq!(overrides.addresses[0].interface, "data0");
    }

    #[test]
    fn test_endpoint_secret() {
        let credentials = Credentials {
            auth_url: "http://192.168.204.2:5000/v3".to_string(),
            username: "admin".to_string(),
            password: "St8rlingX*".to_string(),
            project_name: "admin".to_string(),
            user_domain_name: "Default".to_string(),
            region_name: "RegionOne".to_string(),
            interface: "internal".to_string(),
            ..Default::default()
        };

        let secret = new_endpoint_secret(names::SYSTEM_ENDPOINT, "deployment", &credentials);
        let doc = serde_yaml::to_value(&secret).unwrap();
        assert_eq!(doc["type"], "Opaque");
        assert_eq!(doc["data"]["OS_USERNAME"], "YWRtaW4=");
        assert_eq!(doc["stringData"]["OS_REGION_NAME"], "RegionOne");
        assert_eq!(doc["stringData"]["OS_AUTH_URL"], "http://192.168.204.2:5000/v3");
        assert!(doc["stringData"].get("OS_KEYSTONE_REGION_NAME").is_none());

        let credentials = Credentials {
            keystone_region_name: "SystemController".to_string(),
            ..credentials
        };
        let secret = new_endpoint_secret(names::SYSTEM_ENDPOINT, "deployment", &credentials);
        let doc = serde_yaml::to_value(&secret).unwrap();
        assert_eq!(doc["stringData"]["OS_KEYSTONE_REGION_NAME"], "SystemController");
    }

    #[test]
    fn test_builder_uses_credentials() {
        let credentials = Credentials {
            username: "operator".to_string(),
            ..Default::default()
        };
        let mut builder = builder(
            FakeInventory::aio_simplex(),
            &FilterOptions::default(),
            Progress::default(),
        )
        .with_credentials(credentials);

        let deployment = tokio_test::block_on(builder.build()).unwrap();
        let doc = serde_yaml::to_value(&deployment.secrets[0]).unwrap();
        assert_eq!(doc["data"]["OS_USERNAME"], "b3BlcmF0b3I=");
    }

    #[test]
    fn test_license_secret() {
        let mut inv = FakeInventory::aio_simplex();
        inv.license = Some(crate::inventory::types::License {
            content: "LICENSE".to_string(),
            error: String::new(),
        });

        let deployment = build(inv, &FilterOptions::default()).unwrap();
        let names: Vec<&str> = deployment.secrets.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec![names::SYSTEM_ENDPOINT, names::SYSTEM_LICENSE]);
        assert!(!deployment.secrets[1].is_incomplete());
    }

    #[test]
    fn test_ca_certificate_filter_drops_placeholder() {
        let options = FilterOptions {
            no_ca_certificates: true,
            ..Default::default()
        };
        let deployment = build(FakeInventory::aio_simplex(), &options).unwrap();

        let placeholders: Vec<&str> = deployment.incomplete_secrets.iter().map(|s| s.name()).collect();
        assert_eq!(placeholders, vec!["ssl-cert-secret-0"]);
    }

    #[test]
    fn test_identical_workers_share_profile() {
        let inv = FakeInventory::with_workers(&["08:00:27:00:01:00", "08:00:27:00:01:01"]);
        let progress = Progress::default();
        let mut builder = builder(inv, &FilterOptions::default(), progress.clone());
        let deployment = tokio_test::block_on(builder.build()).unwrap();

        let profiles: Vec<&str> = deployment
            .profiles
            .iter()
            .map(|p| p.metadata.name.as_str())
            .collect();
        assert_eq!(profiles, vec!["controller-0-profile", "worker-0-profile"]);
        assert_eq!(host(&deployment, "worker-0").spec.profile, "worker-0-profile");
        assert_eq!(host(&deployment, "worker-1").spec.profile, "worker-0-profile");

        let bmc: Vec<&Secret> = deployment
            .incomplete_secrets
            .iter()
            .filter(|s| s.name() == names::BMC)
            .collect();
        assert_eq!(bmc.len(), 1);
        let doc = serde_yaml::to_value(bmc[0]).unwrap();
        assert_eq!(doc["stringData"]["username"], "admin");

        // host specific values stay with the host
        let worker = host(&deployment, "worker-1").spec.overrides.as_ref().unwrap();
        assert_eq!(worker.boot_mac.as_deref(), Some("08:00:27:00:01:01"));
        assert_eq!(worker.location.as_deref(), Some("rack 1"));
        assert_eq!(
            worker.board_management.as_ref().and_then(|bm| bm.address.as_deref()),
            Some("10.10.10.131")
        );

        assert!(progress
            .text()
            .contains("...Profile \"worker-1-profile\" not unique using \"worker-0-profile\" instead\n"));
        assert_profiles_consistent(&deployment);
    }

    #[test]
    fn test_zero_boot_mac_not_matched() {
        let mut inv = FakeInventory::aio_simplex();
        inv.hosts[0].host.boot_mac = assemble::host::ZERO_MAC.to_string();

        let deployment = build(inv, &FilterOptions::default()).unwrap();
        let controller = host(&deployment, "controller-0");

        assert!(controller.spec.match_info.is_none());
        let overrides = controller.spec.overrides.as_ref().unwrap();
        assert!(overrides.boot_mac.is_none());
        assert_eq!(overrides.provisioning_mode.as_deref(), Some("dynamic"));
    }

    #[test]
    fn test_osd_with_external_journal() {
        let mut inv = FakeInventory::aio_simplex();
        inv.clusters = vec![Cluster {
            id: "c-1".to_string(),
            name: "ceph_cluster".to_string(),
        }];
        inv.storage_tiers.insert(
            "c-1".to_string(),
            vec![StorageTier {
                id: "t-1".to_string(),
                name: "storage".to_string(),
            }],
        );

        let fixture = &mut inv.hosts[0];
        fixture.disks.push(Disk {
            id: "d-2".to_string(),
            device_path: "/dev/disk/by-path/pci-0000:00:0d.0-ata-2.0".to_string(),
            device_node: "/dev/sdb".to_string(),
            ..Default::default()
        });
        fixture.osds = vec![
            Osd {
                id: "osd-a".to_string(),
                function: "osd".to_string(),
                disk_id: "d-1".to_string(),
                tier_uuid: "t-1".to_string(),
                journal_location: Some("osd-b".to_string()),
                journal_path: Some("/dev/disk/by-path/pci-0000:00:0d.0-ata-2.0-part2".to_string()),
                journal_size_mib: Some(10240),
            },
            Osd {
                id: "osd-b".to_string(),
                function: "journal".to_string(),
                disk_id: "d-2".to_string(),
                journal_location: Some("osd-b".to_string()),
                journal_path: Some("/dev/disk/by-path/pci-0000:00:0d.0-ata-2.0-part1".to_string()),
                journal_size_mib: Some(1024),
                ..Default::default()
            },
        ];

        let deployment = build(inv, &FilterOptions::default()).unwrap();
        let osds = deployment.profiles[0]
            .spec
            .storage
            .as_ref()
            .and_then(|s| s.osds.clone())
            .unwrap();

        assert_eq!(osds.len(), 2);
        assert_eq!(osds[0].path, "/dev/disk/by-path/pci-0000:00:0d.0-ata-1.0");
        assert_eq!(osds[0].cluster_name.as_deref(), Some("ceph_cluster"));
        assert_eq!(
            osds[0].journal,
            Some(JournalInfo {
                location: "/dev/disk/by-path/pci-0000:00:0d.0-ata-2.0".to_string(),
                size: 10,
            })
        );
        assert_eq!(osds[1].function, "journal");
    }

    #[test]
    fn test_interface_naming_reaches_host_overrides() {
        let mut inv = FakeInventory::aio_simplex();
        let fixture = &mut inv.hosts[0];
        if let Some(mgmt) = fixture.interfaces.iter_mut().find(|i| i.id == "if-mgmt") {
            mgmt.name = "enp0s8".to_string();
        }
        fixture.addresses.push(Address {
            id: "a-3".to_string(),
            address: "192.168.204.50".to_string(),
            prefix: 24,
            interface_name: "enp0s8".to_string(),
            pool_uuid: None,
        });

        let options = FilterOptions {
            normalize_interfaces: true,
            ..Default::default()
        };
        let deployment = build(inv, &options).unwrap();

        let interfaces = deployment.profiles[0].spec.interfaces.as_ref().unwrap();
        assert!(interfaces.commons().any(|c| c.name == "mgmt0"));
        assert!(interfaces.commons().all(|c| c.name != "enp0s8"));

        let overrides = host(&deployment, "controller-0").spec.overrides.as_ref().unwrap();
        let moved = overrides
            .addresses
            .iter()
            .find(|a| a.address == "192.168.204.50")
            .unwrap();
        assert_eq!(moved.interface, "mgmt0");
    }

    #[test]
    fn test_interface_naming_stays_within_profile() {
        let mut inv = FakeInventory::with_workers(&["08:00:27:00:01:00"]);
        inv.hosts[0].interfaces.push(Interface {
            if_type: values::IF_TYPE_VLAN.to_string(),
            uses: vec!["data0".to_string()],
            vid: Some(100),
            ..fake::ethernet("if-vlan", "vlan100", "data", 1500)
        });
        for iface in inv.hosts[1].interfaces.iter_mut() {
            match iface.id.as_str() {
                "if-w-mgmt" => iface.name = "data0".to_string(),
                "if-w-data" => iface.name = "data1".to_string(),
                _ => {}
            }
        }

        let options = FilterOptions {
            normalize_interfaces: true,
            ..Default::default()
        };
        let deployment = build(inv, &options).unwrap();

        let controller = deployment
            .find_profile("controller-0-profile")
            .and_then(|p| p.spec.interfaces.as_ref())
            .unwrap();
        assert_eq!(controller.vlan[0].lower, "data0");
        assert!(controller.ethernet.iter().any(|e| e.common.name == "data0"));

        let worker = deployment
            .find_profile("worker-0-profile")
            .and_then(|p| p.spec.interfaces.as_ref())
            .unwrap();
        assert!(worker.commons().any(|c| c.name == "mgmt0"));
        assert!(worker.commons().all(|c| c.name != "data0"));
    }

    #[test]
    fn test_mtu_raised_across_profiles() {
        let mut inv = FakeInventory::with_workers(&["08:00:27:00:01:00"]);
        if let Some(mgmt) = inv.hosts[1].interfaces.iter_mut().find(|i| i.id == "if-w-mgmt") {
            mgmt.mtu = 9000;
        }

        let options = FilterOptions {
            normalize_mtu: true,
            ..Default::default()
        };
        let deployment = build(inv, &options).unwrap();
        assert_eq!(deployment.profiles.len(), 2);

        for profile in &deployment.profiles {
            let mgmt = profile
                .spec
                .interfaces
                .as_ref()
                .and_then(|i| i.commons().find(|c| c.name == "mgmt0").cloned())
                .unwrap();
            assert_eq!(mgmt.mtu, Some(9000), "profile {}", profile.metadata.name);
        }
    }

    #[test]
    fn test_progress_lines() {
        let progress = Progress::default();
        let mut builder = builder(
            FakeInventory::aio_simplex(),
            &FilterOptions::default(),
            progress.clone(),
        );
        tokio_test::block_on(builder.build()).unwrap();

        let text = progress.text();
        let expected = [
            "building deployment for system \"vbox\" in namespace \"deployment\"\n",
            "building namespace configuration\n",
            "building system configuration\n",
            "...filtering system attributes\n",
            "building system endpoint secret configuration\n",
            "building system license secret configuration\n",
            "building certificate secret configurations\n",
            "building data network configurations\n",
            "building platform network configurations\n",
            "building PTP instance configurations\n",
            "building PTP interface configurations\n",
            "building host and profile configurations\n",
            "...Building host configuration for \"controller-0\"\n",
            "...Building host profile configuration for \"controller-0\"\n",
            "...Running profile filters for \"controller-0-profile\"\n",
            "re-running profile filters for second pass\n",
            "...Running profile filters for \"controller-0-profile\"\n",
            "simplifying profile configurations\n",
        ];
        assert_eq!(text, expected.concat());
    }

    #[test]
    fn test_inventory_failure_aborts_build() {
        for operation in ["list_systems", "list_hosts", "list_interfaces"] {
            let mut inv = FakeInventory::aio_simplex();
            inv.fail_on = Some(operation);

            let err = build(inv, &FilterOptions::default()).unwrap_err();
            assert!(
                matches!(kind_of(&err), Some(BuildError::InventoryUnavailable { .. })),
                "{}: {:#}",
                operation,
                err
            );
        }
    }

    #[test]
    fn test_manifest_order_and_scrubbing() {
        let inv = FakeInventory::with_workers(&["08:00:27:00:01:00"]);
        let deployment = build(inv, &FilterOptions::default().minimal()).unwrap();
        let text = deployment.to_yaml().unwrap();

        assert!(text.starts_with(manifest::DOCUMENT_SEPARATOR));
        assert!(!text.contains("creationTimestamp"));
        assert!(!text.contains("\nstatus:"));

        let kinds = document_kinds(&text);
        let ranks: Vec<usize> = kinds.iter().map(|k| kind_rank(k)).collect();
        assert!(ranks.windows(2).all(|w| w[0] <= w[1]), "{:?}", kinds);
        assert_eq!(kinds.first().map(String::as_str), Some("Namespace"));
        assert_eq!(kinds.last().map(String::as_str), Some("Host"));
        assert_eq!(kinds.iter().filter(|k| *k == "Host").count(), 2);
    }

    #[test]
    fn test_same_inventory_same_manifest() {
        let inv = FakeInventory::with_workers(&["08:00:27:00:01:00", "08:00:27:00:01:01"]);
        let options = FilterOptions::default().minimal();

        let first = build(inv.clone(), &options).unwrap().to_yaml().unwrap();
        let second = build(inv, &options).unwrap().to_yaml().unwrap();
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn profiles_resolve_and_stay_unique(
            macs in prop::collection::vec(0u8..4, 0..5),
            minimal in any::<bool>(),
        ) {
            let macs: Vec<String> = macs
                .iter()
                .map(|m| format!("08:00:27:00:01:{:02x}", m))
                .collect();
            let macs: Vec<&str> = macs.iter().map(String::as_str).collect();

            let options = if minimal {
                FilterOptions::default().minimal()
            } else {
                FilterOptions::default()
            };
            let deployment = build(FakeInventory::with_workers(&macs), &options).unwrap();

            prop_assert_eq!(deployment.hosts.len(), macs.len() + 1);
            assert_profiles_consistent(&deployment);
        }
    }
}

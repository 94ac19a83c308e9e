use std::env;

/// Keystone credentials and endpoint selection, read from the usual
/// `OS_*` variables.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub auth_url: String,
    pub username: String,
    pub password: String,
    pub project_name: String,
    pub user_domain_name: String,
    pub project_domain_name: String,
    pub region_name: String,
    pub interface: String,
    pub keystone_region_name: String,
}

impl Credentials {
    pub fn load() -> Self {
        Self {
            auth_url: get_env("OS_AUTH_URL", ""),
            username: get_env("OS_USERNAME", ""),
            password: get_env("OS_PASSWORD", ""),
            project_name: get_env("OS_PROJECT_NAME", ""),
            user_domain_name: get_env("OS_USER_DOMAIN_NAME", ""),
            project_domain_name: get_env("OS_PROJECT_DOMAIN_NAME", ""),
            region_name: get_env("OS_REGION_NAME", ""),
            interface: get_env("OS_INTERFACE", ""),
            keystone_region_name: get_env("OS_KEYSTONE_REGION_NAME", ""),
        }
    }
}

/// Toggles selecting which optional filters run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub no_defaults: bool,
    pub no_ca_certificates: bool,
    pub no_memory: bool,
    pub no_processors: bool,
    pub no_interface_defaults: bool,
    pub no_sys_vg: bool,
    pub no_service_parameters: bool,
    pub normalize_interfaces: bool,
    pub normalize_mtu: bool,
    pub normalize_console: bool,
}

impl FilterOptions {
    pub fn load() -> Self {
        let options = Self {
            no_defaults: get_flag("DEPLOY_NO_DEFAULTS"),
            no_ca_certificates: get_flag("DEPLOY_NO_CA_CERTIFICATES"),
            no_memory: get_flag("DEPLOY_NO_MEMORY"),
            no_processors: get_flag("DEPLOY_NO_PROCESSORS"),
            no_interface_defaults: get_flag("DEPLOY_NO_INTERFACE_DEFAULTS"),
            no_sys_vg: get_flag("DEPLOY_NO_SYS_VG"),
            no_service_parameters: get_flag("DEPLOY_NO_SERVICE_PARAMETERS"),
            normalize_interfaces: get_flag("DEPLOY_NORMALIZE_INTERFACES"),
            normalize_mtu: get_flag("DEPLOY_NORMALIZE_MTU"),
            normalize_console: get_flag("DEPLOY_NORMALIZE_CONSOLE"),
        };

        if get_flag("DEPLOY_MINIMAL_CONFIG") {
            options.minimal()
        } else {
            options
        }
    }

    /// Shorthand enabling every filter except the clear-all and volume group ones.
    pub fn minimal(self) -> Self {
        Self {
            no_defaults: true,
            no_ca_certificates: true,
            no_interface_defaults: true,
            normalize_interfaces: true,
            normalize_mtu: true,
            normalize_console: true,
            no_service_parameters: true,
            ..self
        }
    }
}

/// Config holds all application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub output_file: String,
    pub system_name: String,
    pub namespace: String,
    pub request_timeout_secs: u64,
    pub filters: FilterOptions,
    pub credentials: Credentials,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn load() -> Self {
        Self {
            output_file: get_env("DEPLOY_OUTPUT_FILE", "deployment-config.yaml"),
            system_name: get_env("DEPLOY_SYSTEM_NAME", ""),
            namespace: get_env("DEPLOY_NAMESPACE", "deployment"),
            request_timeout_secs: get_env("DEPLOY_REQUEST_TIMEOUT_SECS", "30")
                .parse()
                .unwrap_or(30),
            filters: FilterOptions::load(),
            credentials: Credentials::load(),
        }
    }

    /// Checks the resource names and rewrites them into a form Kubernetes accepts.
    pub fn validate(&mut self) -> Result<(), String> {
        self.system_name = resource_name("system", &self.system_name)?;
        self.namespace = resource_name("namespace", &self.namespace)?;

        if self.credentials.auth_url.is_empty() {
            return Err("OS_AUTH_URL must be provided".to_string());
        }
        if self.credentials.username.is_empty() {
            return Err("OS_USERNAME must be provided".to_string());
        }
        if self.credentials.password.is_empty() {
            return Err("OS_PASSWORD must be provided".to_string());
        }

        Ok(())
    }
}

/// Kubernetes does not allow underscores in resource names.
fn resource_name(what: &str, value: &str) -> Result<String, String> {
    if value.is_empty() {
        return Err(format!("{} name must not be blank", what));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(format!("{} name must not contain whitespace characters", what));
    }
    Ok(value.replace('_', "-"))
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_flag(key: &str) -> bool {
    parse_flag(&get_env(key, "false"))
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

//! Multi-document YAML rendering of a [`Deployment`].

use anyhow::Result;
use regex_lite::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use super::Deployment;
use crate::error::BuildError;

/// Separator written before the first document and after every document.
pub const DOCUMENT_SEPARATOR: &str = "---\n";

/// A top level `status` block, up to the next document separator.
pub const STATUS_BLOCK_PATTERN: &str = r"(?ms)^status.*?^(---|$)";

/// Any line carrying a creation timestamp, including its line break.
pub const CREATION_TIMESTAMP_PATTERN: &str = r"(?m)^.*?creationTimestamp:.*?$[\r\n]";

/// Resource kinds as named in serialization errors
pub mod document_kinds {
    pub const NAMESPACE: &str = "namespace";
    pub const SECRET: &str = "secret";
    pub const SYSTEM: &str = "system";
    pub const PLATFORM_NETWORK: &str = "platform network";
    pub const ADDRESS_POOL: &str = "address pool";
    pub const DATA_NETWORK: &str = "data network";
    pub const PTP_INSTANCE: &str = "ptp instance";
    pub const PTP_INTERFACE: &str = "ptp interface";
    pub const PROFILE: &str = "profile";
    pub const HOST: &str = "host";
}

fn status_block() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(STATUS_BLOCK_PATTERN).ok())
        .as_ref()
}

fn creation_timestamp() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(CREATION_TIMESTAMP_PATTERN).ok())
        .as_ref()
}

/// Drop observed state; it is regenerated once the manifest is applied.
pub fn strip_status(text: &str) -> String {
    match status_block() {
        Some(re) => re.replace_all(text, "$1").to_string(),
        None => text.to_string(),
    }
}

pub fn strip_creation_timestamp(text: &str) -> String {
    match creation_timestamp() {
        Some(re) => re.replace_all(text, "").to_string(),
        None => text.to_string(),
    }
}

fn push_document<T: Serialize>(buffer: &mut String, kind: &str, value: &T) -> Result<()> {
    let text = serde_yaml::to_string(value).map_err(|e| BuildError::serialization(kind, e))?;
    buffer.push_str(&text);
    buffer.push_str(DOCUMENT_SEPARATOR);
    Ok(())
}

fn push_documents<T: Serialize>(buffer: &mut String, kind: &str, values: &[T]) -> Result<()> {
    for value in values {
        push_document(buffer, kind, value)?;
    }
    Ok(())
}

impl Deployment {
    /// Renders every resource in apply order: namespace, secrets, system,
    /// networks and pools, PTP, profiles and finally hosts.
    pub fn to_yaml(&self) -> Result<String> {
        use document_kinds as kinds;

        let mut buffer = String::from(DOCUMENT_SEPARATOR);

        push_document(&mut buffer, kinds::NAMESPACE, &self.namespace)?;
        push_documents(&mut buffer, kinds::SECRET, &self.secrets)?;
        push_documents(&mut buffer, kinds::SECRET, &self.incomplete_secrets)?;
        push_document(&mut buffer, kinds::SYSTEM, &self.system)?;
        push_documents(&mut buffer, kinds::PLATFORM_NETWORK, &self.platform_networks)?;
        push_documents(&mut buffer, kinds::ADDRESS_POOL, &self.address_pools)?;
        push_documents(&mut buffer, kinds::DATA_NETWORK, &self.data_networks)?;
        push_documents(&mut buffer, kinds::PTP_INSTANCE, &self.ptp_instances)?;
        push_documents(&mut buffer, kinds::PTP_INTERFACE, &self.ptp_interfaces)?;
        push_documents(&mut buffer, kinds::PROFILE, &self.profiles)?;
        push_documents(&mut buffer, kinds::HOST, &self.hosts)?;

        let text = strip_status(&buffer);
        Ok(strip_creation_timestamp(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Secret;

    #[test]
    fn test_strip_status_between_documents() {
        let text = "kind: System\nstatus:\n  systemMode: simplex\n  systemType: All-in-one\n---\nkind: Host\n---\n";
        assert_eq!(strip_status(text), "kind: System\n---\nkind: Host\n---\n");
    }

    #[test]
    fn test_strip_status_ignores_nested_keys() {
        let text = "spec:\n  status: enabled\n---\n";
        assert_eq!(strip_status(text), text);
    }

    #[test]
    fn test_strip_status_at_end_of_text() {
        let text = "kind: System\nstatus:\n  systemMode: duplex\n";
        assert_eq!(strip_status(text), "kind: System\n");
    }

    #[test]
    fn test_strip_creation_timestamp() {
        let text = "metadata:\n  creationTimestamp: null\n  name: vbox\n";
        assert_eq!(strip_creation_timestamp(text), "metadata:\n  name: vbox\n");
    }

    #[test]
    fn test_empty_deployment_layout() {
        let deployment = Deployment::new("deployment", "vbox");
        let text = deployment.to_yaml().unwrap();

        assert!(text.starts_with("---\napiVersion: v1\nkind: Namespace\n"));
        assert!(text.ends_with("---\n"));
        // namespace and system
        assert_eq!(text.matches(DOCUMENT_SEPARATOR).count(), 3);
        assert!(!text.contains("creationTimestamp"));
        assert!(!text.contains("\nstatus:"));
        assert!(!text.contains("systemMode"));
    }

    #[test]
    fn test_incomplete_secrets_follow_known_secrets() {
        let mut deployment = Deployment::new("deployment", "vbox");
        deployment
            .incomplete_secrets
            .push(Secret::incomplete_tls("ssl-cert-secret-0", "deployment"));
        deployment
            .secrets
            .push(Secret::license("system-license", "deployment", "LICENSE"));

        let text = deployment.to_yaml().unwrap();
        let license = text.find("name: system-license").unwrap();
        let tls = text.find("name: ssl-cert-secret-0").unwrap();
        let system = text.find("kind: System").unwrap();
        assert!(license < tls);
        assert!(tls < system);
    }
}

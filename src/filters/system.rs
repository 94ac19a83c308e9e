use anyhow::Result;

use super::SystemFilter;
use crate::build::Deployment;
use crate::inventory::types::values;
use crate::models::system::ServiceParameterInfo;
use crate::models::System;

/// Trusted CA certificates are installed at bootstrap, before the manifest
/// is ever applied.
pub struct CaCertificateFilter;

impl SystemFilter for CaCertificateFilter {
    fn filter(&mut self, system: &mut System, _: &Deployment) -> Result<()> {
        let Some(certificates) = system.spec.certificates.as_mut() else {
            return Ok(());
        };

        certificates.retain(|c| {
            c.cert_type != values::PLATFORM_CA_CERTIFICATE
                && c.cert_type != values::OPENSTACK_CA_CERTIFICATE
        });
        if certificates.is_empty() {
            system.spec.certificates = None;
        }

        Ok(())
    }
}

/// Drops service parameters that hold their platform default.
pub struct ServiceParameterFilter;

impl ServiceParameterFilter {
    /// The inventory does not say which values were changed, so every
    /// parameter counts as a default.
    pub fn is_default(_parameter: &ServiceParameterInfo) -> bool {
        true
    }
}

impl SystemFilter for ServiceParameterFilter {
    fn filter(&mut self, system: &mut System, _: &Deployment) -> Result<()> {
        let Some(parameters) = system.spec.service_parameters.as_mut() else {
            return Ok(());
        };

        parameters.retain(|p| !Self::is_default(p));
        if parameters.is_empty() {
            system.spec.service_parameters = None;
        }

        Ok(())
    }
}

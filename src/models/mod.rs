//! Declarative resources written to the deployment manifest.

pub mod equality;
pub mod host;
pub mod meta;
pub mod network;
pub mod secret;
pub mod system;

pub use equality::{DeepEqual, Keyed};
pub use host::{Host, HostProfile, HostProfileSpec, HostSpec};
pub use meta::{Namespace, ObjectMeta, TypeMeta};
pub use network::{AddressPool, DataNetwork, PlatformNetwork, PtpInstance, PtpInterface};
pub use secret::Secret;
pub use system::{System, SystemSpec, SystemStatus};

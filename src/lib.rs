//! Exports a running StarlingX system as a declarative deployment manifest.
//!
//! The inventory is read through [`inventory::Inventory`], turned into
//! resources by [`assemble`], reduced by the [`filters`] chains and collected
//! into a [`build::Deployment`] that renders itself as a multi-document YAML
//! stream.

pub mod assemble;
pub mod build;
pub mod config;
pub mod error;
pub mod filters;
pub mod inventory;
pub mod models;
pub mod utils;

pub use build::{Deployment, DeploymentBuilder};
pub use error::BuildError;

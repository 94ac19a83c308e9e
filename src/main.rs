use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deploy_builder::config::Config;
use deploy_builder::error::kind_of;
use deploy_builder::inventory::InventoryClient;
use deploy_builder::{filters, BuildError, DeploymentBuilder};

/// Process exit statuses
mod exit_status {
    pub const CONFIG: u8 = 2;
    pub const INVENTORY: u8 = 30;
    pub const BUILD: u8 = 40;
    pub const SERIALIZATION: u8 = 41;
    pub const OUTPUT: u8 = 42;
    pub const INCOMPLETE_SECRETS: u8 = 44;
}

fn build_status(err: &anyhow::Error) -> u8 {
    match kind_of(err) {
        Some(BuildError::Serialization { .. }) => exit_status::SERIALIZATION,
        Some(BuildError::InventoryUnavailable { .. }) => exit_status::INVENTORY,
        _ => exit_status::BUILD,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deploy_builder=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let mut cfg = Config::load();
    if let Err(e) = cfg.validate() {
        eprintln!("error: {}", e);
        return ExitCode::from(exit_status::CONFIG);
    }
    tracing::info!("Output: {}", cfg.output_file);
    tracing::info!("Filters: {:?}", cfg.filters);

    let client = match InventoryClient::connect(&cfg.credentials, cfg.request_timeout_secs).await {
        Ok(client) => client,
        Err(e) => {
            eprintln!("error: failed to connect to the inventory: {:#}", e);
            return ExitCode::from(exit_status::INVENTORY);
        }
    };

    let mut builder = DeploymentBuilder::new(
        Arc::new(client),
        &cfg.namespace,
        &cfg.system_name,
        Box::new(std::io::stdout()),
    )
    .with_credentials(cfg.credentials.clone());
    builder.add_system_filters(filters::system_filters(&cfg.filters));
    builder.add_profile_filters(filters::profile_filters(&cfg.filters));

    let deployment = match builder.build().await {
        Ok(deployment) => deployment,
        Err(e) => {
            eprintln!("error: failed to build deployment: {:#}", e);
            return ExitCode::from(build_status(&e));
        }
    };

    let manifest = match deployment.to_yaml() {
        Ok(text) => text,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::from(build_status(&e));
        }
    };

    let header = format!(
        "# Generated: {}\n# Tool version: {}\n",
        chrono::Utc::now().to_rfc3339(),
        env!("CARGO_PKG_VERSION")
    );
    if let Err(e) = std::fs::write(&cfg.output_file, header + &manifest) {
        eprintln!("error: failed to write {}: {}", cfg.output_file, e);
        return ExitCode::from(exit_status::OUTPUT);
    }

    println!("done.");

    if deployment.has_incomplete_secrets() {
        let names: Vec<&str> = deployment.incomplete_secrets.iter().map(|s| s.name()).collect();
        println!(
            "\nWarning: The generated deployment configuration contains incomplete secrets ({}).\n\
             They must be edited by hand before the configuration can be applied.",
            names.join(", ")
        );
        return ExitCode::from(exit_status::INCOMPLETE_SECRETS);
    }

    ExitCode::SUCCESS
}

use crate::cli::CreateArgs;
use crate::config::builder::build_create_config;
use crate::error::Result;
use ffserial::workflows::document::DocumentDriver;
use std::path::Path;
use tracing::info;

pub fn run(args: CreateArgs, config_path: Option<&Path>) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let config = build_create_config(&args, config_path)?;

    let force = config.build_force()?;
    info!(
        parameters = force.num_global_parameters(),
        "Writing TorchForce document to {:?}", &config.output_path
    );
    DocumentDriver::global().save(&force, &config.root_name, &config.output_path)?;

    println!(
        "✓ TorchForce ({} global parameter(s)) written to: {}",
        force.num_global_parameters(),
        config.output_path.display()
    );
    Ok(())
}

use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::CreateConfig;
use crate::cli::CreateArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use ffserial::forces::params::load_global_parameters_csv;
use std::path::Path;
use tracing::{debug, info};

/// Resolves the `create` settings from CLI arguments, an optional config file and defaults.
///
/// Scalars follow CLI > `--set` > file > defaults. Global parameters are concatenated:
/// config file first, then `--params-csv`, then `-P` arguments.
pub fn build_create_config(args: &CreateArgs, config_path: Option<&Path>) -> Result<CreateConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = match config_path {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let document_file = file_config.document.take().unwrap_or_default();
    let force_file = file_config.force.take().unwrap_or_default();

    let root_name = args
        .root_name
        .clone()
        .or(document_file.root_name)
        .unwrap_or(defaults.root_name);
    let force_group = args
        .force_group
        .or(force_file.force_group)
        .unwrap_or(defaults.force_group);
    let uses_periodic = args.uses_periodic
        || force_file
            .uses_periodic
            .unwrap_or(defaults.uses_periodic);
    let outputs_forces = args.outputs_forces
        || force_file
            .outputs_forces
            .unwrap_or(defaults.outputs_forces);

    let mut global_parameters = force_file.global_parameters;
    if let Some(csv_path) = &args.params_csv {
        let loaded = load_global_parameters_csv(csv_path)?;
        info!(
            count = loaded.len(),
            "Loaded global parameters from {:?}", csv_path
        );
        global_parameters.extend(loaded);
    }
    global_parameters.extend(args.params.iter().cloned());

    let config = CreateConfig {
        model_file: args.model.clone(),
        output_path: args.output.clone(),
        root_name,
        force_group,
        uses_periodic,
        outputs_forces,
        global_parameters,
    };
    debug!("Resolved create configuration: {:?}", config);
    Ok(config)
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value) =
            parser::parse_key_value(kv_pair).map_err(|e| CliError::Config(e.to_string()))?;
        let invalid = |e: parser::ParseError| CliError::Config(e.to_string());

        match key {
            "document.root-name" => {
                config.document.get_or_insert_with(Default::default).root_name =
                    Some(value.to_string());
            }
            "force.force-group" => {
                config.force.get_or_insert_with(Default::default).force_group =
                    Some(parser::parse_int(key, value).map_err(invalid)?);
            }
            "force.uses-periodic" => {
                config.force.get_or_insert_with(Default::default).uses_periodic =
                    Some(parser::parse_bool(key, value).map_err(invalid)?);
            }
            "force.outputs-forces" => {
                config.force.get_or_insert_with(Default::default).outputs_forces =
                    Some(parser::parse_bool(key, value).map_err(invalid)?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

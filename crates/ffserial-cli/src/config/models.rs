use ffserial::forces::torch::{ForceError, GlobalParameter, TorchForce};
use std::path::PathBuf;

/// Fully resolved settings for the `create` command.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateConfig {
    pub model_file: String,
    pub output_path: PathBuf,
    pub root_name: String,
    pub force_group: i64,
    pub uses_periodic: bool,
    pub outputs_forces: bool,
    pub global_parameters: Vec<GlobalParameter>,
}

impl CreateConfig {
    pub fn build_force(&self) -> Result<TorchForce, ForceError> {
        let mut force = TorchForce::new(self.model_file.as_str())?;
        force.set_force_group(self.force_group)?;
        force.set_uses_periodic_boundary_conditions(self.uses_periodic);
        force.set_outputs_forces(self.outputs_forces);
        for param in &self.global_parameters {
            force.add_global_parameter(param.name.as_str(), param.default_value);
        }
        Ok(force)
    }
}

use serde::Deserialize;
use thiserror::Error;

/// Highest force group index a force may be assigned to.
pub const MAX_FORCE_GROUP: u32 = 31;

/// A named global parameter together with its default value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GlobalParameter {
    pub name: String,
    #[serde(rename = "default")]
    pub default_value: f64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ForceError {
    #[error("A model file path is required")]
    EmptyFile,
    #[error("Force group {0} is outside the valid range 0..=31")]
    InvalidForceGroup(i64),
    #[error("Global parameter index {index} is out of range (count: {count})")]
    ParameterIndexOutOfRange { index: usize, count: usize },
}

/// Configuration of a force evaluated by a serialized neural-network model.
///
/// Only the configuration is held here; evaluating the model is left to the simulation
/// engine. The model file is mandatory at construction, every other field starts at its
/// default (group 0, non-periodic, energy-only output, no global parameters).
#[derive(Debug, Clone, PartialEq)]
pub struct TorchForce {
    file: String,
    force_group: u32,
    uses_periodic: bool,
    outputs_forces: bool,
    global_parameters: Vec<GlobalParameter>,
}

impl TorchForce {
    /// Creates a force backed by the model stored at `file`.
    ///
    /// # Errors
    ///
    /// Returns [`ForceError::EmptyFile`] if `file` is empty or only whitespace.
    pub fn new(file: impl Into<String>) -> Result<Self, ForceError> {
        let file = file.into();
        if file.trim().is_empty() {
            return Err(ForceError::EmptyFile);
        }
        Ok(Self {
            file,
            force_group: 0,
            uses_periodic: false,
            outputs_forces: false,
            global_parameters: Vec::new(),
        })
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn force_group(&self) -> u32 {
        self.force_group
    }

    /// # Errors
    ///
    /// Returns [`ForceError::InvalidForceGroup`] unless `group` is within `0..=31`.
    pub fn set_force_group(&mut self, group: i64) -> Result<(), ForceError> {
        match u32::try_from(group) {
            Ok(g) if g <= MAX_FORCE_GROUP => {
                self.force_group = g;
                Ok(())
            }
            _ => Err(ForceError::InvalidForceGroup(group)),
        }
    }

    pub fn uses_periodic_boundary_conditions(&self) -> bool {
        self.uses_periodic
    }

    pub fn set_uses_periodic_boundary_conditions(&mut self, periodic: bool) {
        self.uses_periodic = periodic;
    }

    /// Whether the model returns forces directly instead of only an energy.
    pub fn outputs_forces(&self) -> bool {
        self.outputs_forces
    }

    pub fn set_outputs_forces(&mut self, outputs_forces: bool) {
        self.outputs_forces = outputs_forces;
    }

    /// Appends a global parameter and returns its index.
    pub fn add_global_parameter(&mut self, name: impl Into<String>, default_value: f64) -> usize {
        self.global_parameters.push(GlobalParameter {
            name: name.into(),
            default_value,
        });
        self.global_parameters.len() - 1
    }

    pub fn num_global_parameters(&self) -> usize {
        self.global_parameters.len()
    }

    pub fn global_parameters(&self) -> &[GlobalParameter] {
        &self.global_parameters
    }

    pub fn global_parameter_name(&self, index: usize) -> Result<&str, ForceError> {
        self.parameter(index).map(|p| p.name.as_str())
    }

    pub fn global_parameter_default_value(&self, index: usize) -> Result<f64, ForceError> {
        self.parameter(index).map(|p| p.default_value)
    }

    pub fn set_global_parameter_name(
        &mut self,
        index: usize,
        name: impl Into<String>,
    ) -> Result<(), ForceError> {
        self.parameter_mut(index)?.name = name.into();
        Ok(())
    }

    pub fn set_global_parameter_default_value(
        &mut self,
        index: usize,
        default_value: f64,
    ) -> Result<(), ForceError> {
        self.parameter_mut(index)?.default_value = default_value;
        Ok(())
    }

    fn parameter(&self, index: usize) -> Result<&GlobalParameter, ForceError> {
        let count = self.global_parameters.len();
        self.global_parameters
            .get(index)
            .ok_or(ForceError::ParameterIndexOutOfRange { index, count })
    }

    fn parameter_mut(&mut self, index: usize) -> Result<&mut GlobalParameter, ForceError> {
        let count = self.global_parameters.len();
        self.global_parameters
            .get_mut(index)
            .ok_or(ForceError::ParameterIndexOutOfRange { index, count })
    }
}

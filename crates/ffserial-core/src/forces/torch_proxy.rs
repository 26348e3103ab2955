use super::torch::{ForceError, TorchForce};
use crate::core::error::SerializationError;
use crate::core::node::PropertyNode;
use crate::core::proxy::{SerializationProxy, VERSION_PROPERTY, check_version};
use tracing::warn;

pub const TORCH_FORCE_TAG: &str = "TorchForce";
pub const CURRENT_VERSION: i64 = 1;

const FILE: &str = "file";
const FORCE_GROUP: &str = "forceGroup";
const USES_PERIODIC: &str = "usesPeriodic";
const OUTPUTS_FORCES: &str = "outputsForces";
const GLOBAL_PARAMETERS: &str = "GlobalParameters";
const PARAMETER: &str = "Parameter";
const PARAMETER_NAME: &str = "name";
const PARAMETER_DEFAULT: &str = "default";

/// Serialization proxy for [`TorchForce`].
///
/// Version 1 layout:
///
/// ```text
/// version, file, forceGroup, usesPeriodic, outputsForces
/// GlobalParameters
///     Parameter { name, default }   (one per parameter, in index order)
/// ```
///
/// Only `file` is required on load. `forceGroup`, `usesPeriodic` and `outputsForces` are
/// applied when present and otherwise left at the constructor defaults.
#[derive(Debug, Default, Clone, Copy)]
pub struct TorchForceProxy;

impl SerializationProxy for TorchForceProxy {
    type Object = TorchForce;

    fn type_tag(&self) -> &'static str {
        TORCH_FORCE_TAG
    }

    fn serialize(
        &self,
        force: &TorchForce,
        node: &mut PropertyNode,
    ) -> Result<(), SerializationError> {
        node.set_property(VERSION_PROPERTY, CURRENT_VERSION)
            .set_property(FILE, force.file())
            .set_property(FORCE_GROUP, force.force_group())
            .set_property(USES_PERIODIC, force.uses_periodic_boundary_conditions())
            .set_property(OUTPUTS_FORCES, force.outputs_forces());

        let parameters = node.create_child_node(GLOBAL_PARAMETERS);
        for parameter in force.global_parameters() {
            parameters
                .create_child_node(PARAMETER)
                .set_property(PARAMETER_NAME, &parameter.name)
                .set_property(PARAMETER_DEFAULT, parameter.default_value);
        }
        Ok(())
    }

    fn deserialize(&self, node: &PropertyNode) -> Result<TorchForce, SerializationError> {
        check_version(node, TORCH_FORCE_TAG, CURRENT_VERSION..=CURRENT_VERSION)?;

        let invalid = |e: ForceError| SerializationError::invalid_object(TORCH_FORCE_TAG, e);
        let mut force = TorchForce::new(node.string_property(FILE)?.into_owned()).map_err(invalid)?;

        if let Some(group) = node.optional_int_property(FORCE_GROUP)? {
            force.set_force_group(group).map_err(invalid)?;
        }
        if let Some(periodic) = node.optional_bool_property(USES_PERIODIC)? {
            force.set_uses_periodic_boundary_conditions(periodic);
        }
        if let Some(outputs_forces) = node.optional_bool_property(OUTPUTS_FORCES)? {
            force.set_outputs_forces(outputs_forces);
        }

        let categories: Vec<&PropertyNode> = node.children_named(GLOBAL_PARAMETERS).collect();
        if categories.len() > 1 {
            warn!(
                count = categories.len(),
                "Merging multiple '{}' nodes in document order.", GLOBAL_PARAMETERS
            );
        }
        for category in categories {
            for parameter in category.children() {
                force.add_global_parameter(
                    parameter.string_property(PARAMETER_NAME)?.into_owned(),
                    parameter.float_property(PARAMETER_DEFAULT)?,
                );
            }
        }

        Ok(force)
    }
}

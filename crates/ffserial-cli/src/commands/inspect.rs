use crate::cli::InspectArgs;
use crate::error::Result;
use ffserial::core::io::traits::DocumentFormat;
use ffserial::core::io::xml::XmlFormat;
use ffserial::forces::torch::TorchForce;
use ffserial::workflows::document::{DocumentDriver, DocumentError, TYPE_PROPERTY};
use std::fmt;
use tracing::{info, warn};

pub fn run(args: InspectArgs) -> Result<()> {
    info!("Loading document from {:?}", &args.path);
    let node = XmlFormat::read_from_path(&args.path).map_err(DocumentError::from)?;
    let tag = node
        .string_property(TYPE_PROPERTY)
        .map_err(DocumentError::from)?
        .into_owned();
    let object = DocumentDriver::global()
        .from_node(&node)
        .map_err(DocumentError::from)?;

    match object.downcast_ref::<TorchForce>() {
        Some(force) => print!(
            "{}",
            TorchForceSummary {
                root_name: node.name(),
                force,
            }
        ),
        None => {
            warn!(tag = %tag, "No detailed view is available for this type.");
            println!("<{}> {}", node.name(), tag);
        }
    }
    Ok(())
}

/// Human-readable summary of a [`TorchForce`] loaded from a document.
pub struct TorchForceSummary<'a> {
    pub root_name: &'a str,
    pub force: &'a TorchForce,
}

impl fmt::Display for TorchForceSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let force = self.force;
        writeln!(f, "<{}> TorchForce", self.root_name)?;
        writeln!(f, "  file:           {}", force.file())?;
        writeln!(f, "  force group:    {}", force.force_group())?;
        writeln!(
            f,
            "  uses periodic:  {}",
            force.uses_periodic_boundary_conditions()
        )?;
        writeln!(f, "  outputs forces: {}", force.outputs_forces())?;
        writeln!(
            f,
            "  global parameters ({}):",
            force.num_global_parameters()
        )?;
        for (i, param) in force.global_parameters().iter().enumerate() {
            writeln!(f, "    [{}] {} = {}", i, param.name, param.default_value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn description_lists_fields_and_parameters_in_order() {
        let mut force = TorchForce::new("model.pt").unwrap();
        force.set_force_group(2).unwrap();
        force.add_global_parameter("k", 1.5);
        force.add_global_parameter("r0", 0.2);

        let text = TorchForceSummary {
            root_name: "Force",
            force: &force,
        }
        .to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "<Force> TorchForce");
        assert!(lines[1].ends_with("model.pt"));
        assert!(lines[2].ends_with('2'));
        assert!(lines[5].contains("(2)"));
        assert_eq!(lines[6].trim(), "[0] k = 1.5");
        assert_eq!(lines[7].trim(), "[1] r0 = 0.2");
    }

    #[test]
    fn inspect_fails_for_documents_without_a_type_tag() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("untyped.xml");
        std::fs::write(&path, "<Force version=\"1\"/>").unwrap();

        assert!(run(InspectArgs { path }).is_err());
    }

    #[test]
    fn inspect_fails_for_missing_files() {
        let args = InspectArgs {
            path: PathBuf::from("/nonexistent/ffserial/doc.xml"),
        };
        assert!(run(args).is_err());
    }
}

use crate::cli::CheckArgs;
use crate::error::{CliError, Result};
use ffserial::core::io::traits::DocumentFormat;
use ffserial::core::io::xml::XmlFormat;
use ffserial::core::node::PropertyNode;
use ffserial::core::proxy::VERSION_PROPERTY;
use ffserial::workflows::document::{DocumentDriver, DocumentError, TYPE_PROPERTY};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub tag: String,
    pub version: i64,
}

pub fn run(args: CheckArgs) -> Result<()> {
    let report = check_document(&args.path)?;
    println!(
        "✓ {} is a stable '{}' document (version {}).",
        args.path.display(),
        report.tag,
        report.version
    );
    Ok(())
}

/// Loads the document at `path`, serializes the object again and re-parses the output.
///
/// Both the re-serialized tree and its re-parsed form must equal the tree that was read.
pub fn check_document(path: &Path) -> Result<CheckReport> {
    let driver = DocumentDriver::global();

    info!("Loading document from {:?}", path);
    let original = XmlFormat::read_from_path(path).map_err(DocumentError::from)?;
    let object = driver.from_node(&original).map_err(DocumentError::from)?;

    let reserialized = driver
        .to_node(&*object, original.name())
        .map_err(DocumentError::from)?;
    let text = XmlFormat::render(&reserialized).map_err(DocumentError::from)?;
    let reparsed = XmlFormat::parse(&text).map_err(DocumentError::from)?;
    debug!("Re-serialized document:\n{}", text);

    let failure = |reason: String| CliError::Check {
        path: path.to_path_buf(),
        reason,
    };
    if reparsed != reserialized {
        return Err(failure(
            "re-serialized tree does not survive a render/parse cycle".to_string(),
        ));
    }
    if let Some(difference) = first_difference(&original, &reserialized) {
        return Err(failure(difference));
    }

    Ok(CheckReport {
        tag: original
            .string_property(TYPE_PROPERTY)
            .map_err(DocumentError::from)?
            .into_owned(),
        version: original
            .int_property(VERSION_PROPERTY)
            .map_err(DocumentError::from)?,
    })
}

fn first_difference(expected: &PropertyNode, actual: &PropertyNode) -> Option<String> {
    if expected.name() != actual.name() {
        return Some(format!(
            "element '{}' became '{}'",
            expected.name(),
            actual.name()
        ));
    }

    let expected_props: Vec<_> = expected.properties().collect();
    let actual_props: Vec<_> = actual.properties().collect();
    if expected_props != actual_props {
        return Some(format!(
            "properties of '{}' changed: {:?} -> {:?}",
            expected.name(),
            expected_props,
            actual_props
        ));
    }

    if expected.children().len() != actual.children().len() {
        return Some(format!(
            "'{}' had {} child element(s), now {}",
            expected.name(),
            expected.children().len(),
            actual.children().len()
        ));
    }
    expected
        .children()
        .iter()
        .zip(actual.children())
        .find_map(|(e, a)| first_difference(e, a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ffserial::forces::torch::TorchForce;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn documents_written_by_the_driver_pass_the_check() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("force.xml");
        let mut force = TorchForce::new("model.pt").unwrap();
        force.add_global_parameter("k", 1.5);
        DocumentDriver::global().save(&force, "Force", &path).unwrap();

        let report = check_document(&path).unwrap();
        assert_eq!(
            report,
            CheckReport {
                tag: "TorchForce".to_string(),
                version: 1,
            }
        );
    }

    #[test]
    fn numeric_looking_strings_and_non_finite_defaults_pass_the_check() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("force.xml");
        let mut force = TorchForce::new("42").unwrap();
        force.add_global_parameter("1", 1.5);
        force.add_global_parameter("true", f64::NAN);
        force.add_global_parameter("scale", f64::INFINITY);
        DocumentDriver::global().save(&force, "Force", &path).unwrap();

        let report = check_document(&path).unwrap();
        assert_eq!(report.tag, "TorchForce");

        let restored: TorchForce = DocumentDriver::global().load_as(&path).unwrap();
        assert_eq!(restored.file(), "42");
        assert_eq!(restored.global_parameter_name(0).unwrap(), "1");
        assert_eq!(restored.global_parameter_name(1).unwrap(), "true");
        assert!(restored.global_parameter_default_value(1).unwrap().is_nan());
        assert_eq!(
            restored.global_parameter_default_value(2).unwrap(),
            f64::INFINITY
        );
    }

    #[test]
    fn documents_missing_optional_fields_are_reported_as_changed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("minimal.xml");
        fs::write(
            &path,
            "<Force type=\"TorchForce\" version=\"1\" file=\"model.pt\"/>",
        )
        .unwrap();

        match check_document(&path) {
            Err(CliError::Check { reason, .. }) => assert!(reason.contains("properties")),
            other => panic!("Expected a check failure, got {:?}", other),
        }
    }

    #[test]
    fn unsupported_versions_fail_to_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("future.xml");
        fs::write(
            &path,
            "<Force type=\"TorchForce\" version=\"2\" file=\"model.pt\"/>",
        )
        .unwrap();

        assert!(matches!(
            check_document(&path),
            Err(CliError::Document(DocumentError::Serialization(_)))
        ));
    }

    #[test]
    fn differences_are_located_in_nested_children() {
        let mut expected = PropertyNode::new("Force");
        expected
            .create_child_node("GlobalParameters")
            .create_child_node("Parameter")
            .set_property("name", "k");
        let mut actual = expected.clone();
        actual.create_child_node("Extra");

        assert!(first_difference(&expected, &expected.clone()).is_none());
        let message = first_difference(&expected, &actual).unwrap();
        assert!(message.contains("child element"));
    }
}

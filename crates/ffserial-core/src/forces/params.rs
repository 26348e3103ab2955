use super::torch::GlobalParameter;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
}

/// Loads a global-parameter table from a CSV file with the header `name,default`.
///
/// Rows are returned in file order, which becomes the parameter index order once they are
/// added to a force.
pub fn load_global_parameters_csv(path: &Path) -> Result<Vec<GlobalParameter>, ParamLoadError> {
    let display = path.to_string_lossy().to_string();
    let file = File::open(path).map_err(|e| ParamLoadError::Io {
        path: display.clone(),
        source: e,
    })?;
    read_global_parameters_csv(file, &display)
}

/// Reads a global-parameter table from any CSV source; `origin` names it in errors.
pub fn read_global_parameters_csv(
    source: impl Read,
    origin: &str,
) -> Result<Vec<GlobalParameter>, ParamLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    reader
        .deserialize::<GlobalParameter>()
        .map(|record| {
            record.map_err(|e| ParamLoadError::Csv {
                path: origin.to_owned(),
                source: e,
            })
        })
        .collect()
}

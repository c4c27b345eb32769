use std::fs;
use std::path::PathBuf;

use crate::context::AdminError;

pub fn read_value(val: Option<String>, file: Option<PathBuf>) -> Result<String, AdminError> {
    read_opt_value(val, file)?.ok_or_else(|| AdminError::InvalidInput("value required".into()))
}

pub fn read_opt_value(
    val: Option<String>,
    file: Option<PathBuf>,
) -> Result<Option<String>, AdminError> {
    if let Some(path) = file {
        let data = fs::read_to_string(&path).map_err(|source| AdminError::InputFile {
            path: path.display().to_string(),
            source,
        })?;
        return Ok(Some(data));
    }
    Ok(val)
}

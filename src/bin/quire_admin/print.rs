use serde::Serialize;

use crate::context::AdminError;

pub fn print_json<T: Serialize>(value: &T) -> Result<(), AdminError> {
    let out = serde_json::to_string_pretty(value).map_err(AdminError::Output)?;
    println!("{out}");
    Ok(())
}

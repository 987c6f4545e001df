use power_core::{PowerError, Result};
use std::path::Path;

/// Read a single real number from a sysfs-style attribute file.
///
/// Surrounding whitespace (including the kernel's trailing newline) is ignored.
pub fn read_number(path: impl AsRef<Path>) -> Result<f64> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| PowerError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    let value = raw.trim();
    value.parse::<f64>().map_err(|_| PowerError::MalformedValue {
        path:  path.to_path_buf(),
        value: value.to_string(),
    })
}

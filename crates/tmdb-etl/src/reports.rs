//! Plain-text analysis reports shipped next to the dataset.

use crate::error::{EtlError, Result};
use std::fs;
use std::path::Path;
use tracing::{error, warn};

/// Read a UTF-8 report file.
pub fn read_report(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(EtlError::NotFound(path.to_path_buf()));
    }
    Ok(fs::read_to_string(path)?)
}

/// [`read_report`], logging the failure and returning `None` instead.
pub fn echo_report(path: &Path) -> Option<String> {
    match read_report(path) {
        Ok(text) => Some(text),
        Err(e @ EtlError::NotFound(_)) => {
            warn!("{}", e);
            None
        }
        Err(e) => {
            error!("Cannot read report {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Ejercicio_5.txt");
        fs::write(&path, "Conclusiones:\nLas series largas son raras.\n").unwrap();

        let text = read_report(&path).unwrap();
        assert!(text.starts_with("Conclusiones:"));
        assert_eq!(echo_report(&path), Some(text));
    }

    #[test]
    fn test_missing_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");

        let err = read_report(&path).unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert_eq!(echo_report(&path), None);
    }

    #[test]
    fn test_unreadable_report_is_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.txt");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).unwrap();

        assert_eq!(read_report(&path).unwrap_err().error_code(), "IO_FAILURE");
        assert_eq!(echo_report(&path), None);
    }
}

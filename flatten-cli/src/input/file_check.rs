//! Pre-flight checks on the input file

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::Path;

use crate::error::CliError;

/// Ensure `path` names an existing, readable regular file
pub fn check_readable(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(CliError::MissingArgument("a csv file location".to_string()).into());
    }
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()).into());
    }
    if !path.is_file() {
        return Err(CliError::FileNotFound(format!("{} is not a file", path.display())).into());
    }

    match File::open(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            Err(CliError::PermissionDenied(path.display().to_string()).into())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to open file: {}", path.display())),
    }
}

/// Get file size in bytes
pub fn file_size(path: &Path) -> Result<u64> {
    let metadata = fs::metadata(path)
        .with_context(|| format!("Failed to get metadata for: {}", path.display()))?;

    Ok(metadata.len())
}

/// Final path component of the input, used to name the output file
pub fn base_file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| CliError::FileNotFound(format!("{} has no file name", path.display())).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_readable_file_passes() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("products.csv");
        fs::write(&file_path, "Handle,Image Src\n").unwrap();

        assert!(check_readable(&file_path).is_ok());
    }

    #[test]
    fn test_empty_path_is_missing_argument() {
        let err = check_readable(Path::new("")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::MissingArgument(_))
        ));
    }

    #[test]
    fn test_nonexistent_file() {
        let err = check_readable(Path::new("/nonexistent/products.csv")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_directory_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let err = check_readable(temp_dir.path()).unwrap_err();
        assert!(err.to_string().contains("is not a file"));
    }

    #[cfg(unix)]
    #[test]
    fn test_permission_denied() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("locked.csv");
        fs::write(&file_path, "Handle,Image Src\n").unwrap();

        let mut permissions = fs::metadata(&file_path).unwrap().permissions();
        permissions.set_mode(0o000);
        fs::set_permissions(&file_path, permissions).unwrap();

        // Root ignores permission bits
        if File::open(&file_path).is_err() {
            let err = check_readable(&file_path).unwrap_err();
            assert!(err.to_string().contains("No read access"));
        }

        let mut permissions = fs::metadata(&file_path).unwrap().permissions();
        permissions.set_mode(0o644);
        fs::set_permissions(&file_path, permissions).unwrap();
    }

    #[test]
    fn test_file_size() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("sized.csv");
        fs::write(&file_path, "a".repeat(1024)).unwrap();

        assert_eq!(file_size(&file_path).unwrap(), 1024);
    }

    #[test]
    fn test_base_file_name() {
        assert_eq!(
            base_file_name(Path::new("exports/2024/products.csv")).unwrap(),
            "products.csv"
        );
        assert_eq!(base_file_name(Path::new("products.csv")).unwrap(), "products.csv");
        assert!(base_file_name(Path::new("/")).is_err());
    }
}

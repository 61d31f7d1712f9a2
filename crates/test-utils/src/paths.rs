//! Temporary directories for catalog fixtures.

use std::io;
use std::path::Path;

/// Creates a temporary directory with a specific prefix.
///
/// The directory is removed when the returned `TempDir` is dropped.
pub fn temp_dir_with_prefix(prefix: &str) -> io::Result<tempfile::TempDir> {
    tempfile::Builder::new().prefix(prefix).tempdir()
}

/// Writes `(file name, contents)` pairs into `dir`, creating it if needed.
pub fn write_files<'a>(
    dir: &Path,
    files: impl IntoIterator<Item = (String, &'a [u8])>,
) -> io::Result<()> {
    std::fs::create_dir_all(dir)?;
    for (name, data) in files {
        std::fs::write(dir.join(name), data)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_files() {
        let dir = temp_dir_with_prefix("catalog_test_").unwrap();
        assert!(dir.path().to_string_lossy().contains("catalog_test_"));
        let nested = dir.path().join("epsg");
        write_files(&nested, [("area.bin".to_string(), &b"\x01\x02"[..])]).unwrap();
        assert_eq!(std::fs::read(nested.join("area.bin")).unwrap(), vec![1, 2]);
    }
}

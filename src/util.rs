/// Create-if-absent filesystem helpers shared by the scaffolder and `export`.
pub mod fs {
    use std::fs;
    use std::io::{self, ErrorKind};
    use std::path::Path;

    /// Ensure a directory exists, creating it recursively if needed.
    /// Returns `true` when the directory was created by this call.
    pub fn ensure_dir(path: &Path) -> io::Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        fs::create_dir_all(path)?;
        Ok(true)
    }

    /// Create an empty file unless something already occupies `path`.
    /// Existing files are never opened for writing.
    pub fn touch_new(path: &Path) -> io::Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        match fs::OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(_) => Ok(true),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(err) => Err(err),
        }
    }
}

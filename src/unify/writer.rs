//! Unified file persistence.
//!
//! Content is written to a hidden temp file in the destination directory and
//! then renamed over the target, so readers never observe a half-written
//! bundle and a failed write leaves any previous bundle untouched.

use std::fs;
use std::io::Write;
use std::path::Path;

use super::UnifyError;

/// Write `content` to `path`, creating parent directories as needed.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<(), UnifyError> {
    let dir = path
        .parent()
        .ok_or_else(|| UnifyError::Config(format!("`{}` has no parent directory", path.display())))?;

    fs::create_dir_all(dir).map_err(|err| UnifyError::OutputDir(dir.to_path_buf(), err))?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".unify-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|err| UnifyError::OutputDir(dir.to_path_buf(), err))?;

    let write_err = |err: std::io::Error| UnifyError::Write(path.to_path_buf(), err);
    tmp.write_all(content).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;

    // Temp files are created owner-only; bundles are served publicly.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(write_err)?;
    }

    tmp.persist(path).map_err(|err| write_err(err.error))?;
    Ok(())
}

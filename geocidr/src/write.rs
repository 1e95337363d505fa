use std::{
    fs::{self, Permissions},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Write one network per line to `path`, replacing whatever was there.
///
/// The lines go to a temporary file next to the destination which is then renamed
/// over it, so a failed write never leaves a truncated list behind. An existing
/// symlink is written through and an existing file keeps its permissions.
pub fn write_networks<P: AsRef<Path>>(path: P, networks: &[String]) -> Result<()> {
    let path = path.as_ref();
    // a dangling link fails to resolve and gets replaced
    let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let dir = parent_dir(&target);
    if !dir.is_dir() {
        return Err(Error::DestinationMissingDir { dir });
    }

    let unwritable = |source: io::Error| Error::DestinationUnwritable {
        path: path.to_path_buf(),
        source,
    };

    let perms = fs::metadata(&target)
        .ok()
        .filter(|m| m.is_file())
        .map(|m| m.permissions());

    let tmp = NamedTempFile::new_in(&dir).map_err(unwritable)?;
    let mut wtr = BufWriter::new(tmp);
    write_lines(&mut wtr, networks).map_err(unwritable)?;
    let tmp = wtr.into_inner().map_err(|e| unwritable(e.into_error()))?;
    if let Some(perms) = perms.or_else(default_permissions) {
        tmp.as_file().set_permissions(perms).map_err(unwritable)?;
    }
    tmp.persist(&target).map_err(|e| unwritable(e.error))?;

    Ok(())
}

fn parent_dir(p: &Path) -> PathBuf {
    match p.parent() {
        Some(d) if !d.as_os_str().is_empty() => d.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn write_lines(w: &mut impl Write, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(w, "{line}")?;
    }
    w.flush()
}

// temp files are created 0600
#[cfg(unix)]
fn default_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;

    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<Permissions> {
    None
}

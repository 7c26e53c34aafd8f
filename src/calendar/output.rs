use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::TeamRef;

/// Make scraped text safe to use as a single path component.
pub fn sanitize_component(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '\0' | '/' | '\\'))
        .collect();
    match cleaned.trim() {
        "" | "." | ".." => "_".to_string(),
        _ => cleaned,
    }
}

/// `<root>/<sport>/<league>/<team>.<extension>`
pub fn calendar_path(root: &Path, team: &TeamRef, extension: &str) -> PathBuf {
    root.join(sanitize_component(&team.sport))
        .join(sanitize_component(&team.league))
        .join(format!("{}.{extension}", sanitize_component(&team.name)))
}

/// Write to a sibling .tmp file then rename, so readers never see a partial calendar.
pub fn write_atomic(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, contents).map_err(io_error(&tmp))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(io_error(path)(e));
    }
    Ok(())
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> Error {
    let path = path.to_path_buf();
    move |source| Error::Io { path, source }
}

use crate::error::{CliError, Result};
use evskim::engine::state::InputGroup;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Turns each input directory into a group of its files ending in `.<extension>`.
///
/// Files are sorted by name. Directories without a matching file are dropped with a
/// warning, so they take no output number.
pub fn discover_groups(dirs: &[PathBuf], extension: &str) -> Result<Vec<InputGroup>> {
    let mut groups = Vec::with_capacity(dirs.len());
    for dir in dirs {
        let files = matching_files(dir, extension)?;
        if files.is_empty() {
            warn!(
                "No '.{}' files in {:?}, skipping directory.",
                extension, dir
            );
            continue;
        }
        debug!("Group {:?}: {} file(s)", dir, files.len());
        groups.push(InputGroup::new(dir.display().to_string(), files));
    }
    Ok(groups)
}

fn matching_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(CliError::Argument(format!(
            "Input directory does not exist: {}",
            dir.display()
        )));
    }

    let suffix = format!(".{}", extension);
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.len() > suffix.len() && name.ends_with(&suffix) {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

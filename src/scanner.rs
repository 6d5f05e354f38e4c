use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use context::SortContext;
use error::*;
use filesystem::FileSystem;
use tags::TagReader;

/// A file found directly inside the source directory, with the tags it had when scanned.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryEntry {
    pub path: PathBuf,
    pub tags: BTreeSet<String>,
}

/// Checks that the source directory exists and makes sure the destination directory does.
///
/// Nothing is created in a dry run.
pub fn prepare_directories(fs: &dyn FileSystem, file_context: &SortContext) -> Result<()> {
    let source_dir = &file_context.source_dir;
    if !fs.exists(source_dir) {
        bail!(ErrorKind::Validation(format!("Source directory {} doesn't exist.", source_dir.to_string_lossy())));
    }
    if !fs.is_dir(source_dir) {
        bail!(ErrorKind::Validation(format!("Source {} is not a directory.", source_dir.to_string_lossy())));
    }

    let dest_dir = &file_context.dest_dir;
    if !fs.is_dir(dest_dir) {
        if file_context.dry_run {
            if fs.exists(dest_dir) {
                bail!(ErrorKind::Validation(format!("Destination {} is not a directory.", dest_dir.to_string_lossy())));
            }
            debug!("Would create destination directory: {}", dest_dir.to_string_lossy());
            return Ok(());
        }

        debug!("Creating destination directory: {}", dest_dir.to_string_lossy());
        fs.create_dir_all(dest_dir).map_err(|error| {
            Error::from(ErrorKind::Validation(format!("Failed to create destination directory {}: {}",
                                                      dest_dir.to_string_lossy(), error)))
        })?;
    }

    ensure_distinct_directories(fs, source_dir, dest_dir)
}

// Spellings such as `photos` and `./photos` name the same directory, so compare resolved paths.
fn ensure_distinct_directories(fs: &dyn FileSystem, source_dir: &Path, dest_dir: &Path) -> Result<()> {
    let same = match (fs.canonicalize(source_dir), fs.canonicalize(dest_dir)) {
        (Ok(source), Ok(destination)) => source == destination,
        _ => source_dir == dest_dir,
    };
    if same {
        bail!(ErrorKind::Validation(format!("Source {} and destination {} are the same directory.",
                                            source_dir.to_string_lossy(), dest_dir.to_string_lossy())));
    }
    Ok(())
}

/// Lists the visible regular files directly inside `directory`, sorted by path.
pub fn scan_directory(fs: &dyn FileSystem, tag_reader: &dyn TagReader, directory: &Path) -> Result<Vec<DirectoryEntry>> {
    let mut paths = fs.list_dir(directory).chain_err(|| {
        ErrorKind::Validation(format!("Unable to read entries of directory {}", directory.to_string_lossy()))
    })?;
    paths.sort();

    let mut entries = Vec::new();
    for path in paths {
        if is_hidden(&path) {
            trace!("Hidden entry: {}", path.to_string_lossy());
            continue;
        }
        if !fs.is_file(&path) {
            trace!("Not a file: {}", path.to_string_lossy());
            continue;
        }
        let tags = tag_reader.read_tags(&path).unwrap_or_else(|error| {
            debug!("Unable to read tags of {}, treating it as untagged: {}", path.to_string_lossy(), error);
            BTreeSet::new()
        });
        trace!("Regular file: {} tags: {:?}", path.to_string_lossy(), tags);
        entries.push(DirectoryEntry { path, tags });
    }

    Ok(entries)
}

fn is_hidden(path: &Path) -> bool {
    match path.file_name() {
        Some(name) => name.to_string_lossy().starts_with('.'),
        None => false,
    }
}

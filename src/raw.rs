use std::path::{Path, PathBuf};

use filesystem::FileSystem;

/// RAW extensions in the order they are tried. Only the first one found is used.
pub const RAW_EXTENSIONS: [&str; 7] = ["CR2", "NEF", "ARW", "RAF", "RW2", "ORF", "DNG"];

/// Finds the RAW file in `directory` that shares `file`'s base name, e.g. `IMG_01.CR2` for
/// `IMG_01.jpg`. A RAW `file` is its own first candidate.
pub fn find_raw_companion(fs: &dyn FileSystem, file: &Path, directory: &Path) -> Option<PathBuf> {
    let base_name = file.file_stem()?;
    RAW_EXTENSIONS
        .iter()
        .map(|extension| {
            let mut candidate_name = base_name.to_os_string();
            candidate_name.push(".");
            candidate_name.push(*extension);
            directory.join(candidate_name)
        })
        .find(|candidate| fs.is_file(candidate))
}

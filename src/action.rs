use std::io;
use std::path::{Path, PathBuf};

use context::SortContext;
use error::*;
use filesystem::FileSystem;
use report::Report;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    Copy,
    Move,
}

impl TransferMode {
    pub fn verb(&self) -> &'static str {
        match *self {
            TransferMode::Copy => "copy",
            TransferMode::Move => "move",
        }
    }

    pub fn progressive(&self) -> &'static str {
        match *self {
            TransferMode::Copy => "copying",
            TransferMode::Move => "moving",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match *self {
            TransferMode::Copy => "Copied",
            TransferMode::Move => "Moved",
        }
    }
}

/// Moves or copies `file` into the destination directory, or only describes doing so in a
/// dry run. Failures are reported rather than returned so that a run can carry on.
pub fn transfer_file(fs: &dyn FileSystem, file: &Path, file_context: &SortContext) -> Report {
    let mode = file_context.transfer_mode();
    let file_name = display_file_name(file);

    let destination = match destination_for(fs, file, &file_context.dest_dir) {
        Ok(destination) => destination,
        Err(error) => return failed(mode, file_name, &error),
    };

    if file_context.dry_run {
        return Report::WouldTransfer { mode, source: file.to_path_buf(), destination };
    }

    let result = match mode {
        TransferMode::Copy => copy_file(fs, file, &destination),
        TransferMode::Move => move_file(fs, file, &destination),
    };
    match result {
        Ok(()) => Report::Transferred { mode, file_name },
        Err(error) => failed(mode, file_name, &error),
    }
}

fn failed(mode: TransferMode, file_name: String, error: &Error) -> Report {
    for cause in error.iter().skip(1) {
        debug!("{} caused by: {}", error, cause);
    }
    Report::Failed { mode, file_name, description: root_cause_description(error) }
}

fn destination_for(fs: &dyn FileSystem, file: &Path, dest_dir: &Path) -> Result<PathBuf> {
    let file_name = match file.file_name() {
        Some(name) => name,
        None => bail!(ErrorKind::Transfer(format!("{} does not have a file name", file.to_string_lossy()))),
    };
    let destination = dest_dir.join(file_name);
    if is_same_file(fs, file, &destination) {
        bail!(ErrorKind::Transfer(format!("{} is already in the destination directory", file.to_string_lossy())));
    }
    Ok(destination)
}

/// Paths are compared after resolving `.`, `..` and links, since copying a file onto itself
/// would remove it first.
fn is_same_file(fs: &dyn FileSystem, file: &Path, destination: &Path) -> bool {
    if destination == file {
        return true;
    }
    match (fs.canonicalize(file), fs.canonicalize(destination)) {
        (Ok(file), Ok(destination)) => file == destination,
        _ => false,
    }
}

pub(crate) fn display_file_name(file: &Path) -> String {
    match file.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => file.to_string_lossy().into_owned(),
    }
}

fn copy_file(fs: &dyn FileSystem, file: &Path, destination: &Path) -> Result<()> {
    if fs.exists(destination) {
        debug!("Removing existing {} before copying", destination.to_string_lossy());
        fs.remove_file(destination).chain_err(|| {
            ErrorKind::Transfer(format!("Unable to remove existing file {}", destination.to_string_lossy()))
        })?;
    }
    fs.copy(file, destination).chain_err(|| {
        ErrorKind::Transfer(format!("Unable to copy file {} to destination {}", file.to_string_lossy(),
                                    destination.to_string_lossy()))
    })
}

fn move_file(fs: &dyn FileSystem, file: &Path, destination: &Path) -> Result<()> {
    if fs.exists(destination) {
        bail!(ErrorKind::Transfer(format!("{} already exists", destination.to_string_lossy())));
    }
    match fs.rename(file, destination) {
        Ok(()) => Ok(()),
        Err(ref error) if is_cross_device(error) => {
            debug!("Cannot rename {} across devices, copying it instead", file.to_string_lossy());
            fs.copy(file, destination).chain_err(|| {
                ErrorKind::Transfer(format!("Unable to copy file {} to destination {}", file.to_string_lossy(),
                                            destination.to_string_lossy()))
            })?;
            fs.remove_file(file).chain_err(|| {
                ErrorKind::Transfer(format!("Copied {} but unable to remove it", file.to_string_lossy()))
            })
        }
        Err(error) => Err(error).chain_err(|| {
            ErrorKind::Transfer(format!("Unable to move file {} to destination {}", file.to_string_lossy(),
                                        destination.to_string_lossy()))
        }),
    }
}

#[cfg(unix)]
fn is_cross_device(error: &io::Error) -> bool {
    error.raw_os_error() == Some(::libc::EXDEV)
}

#[cfg(windows)]
fn is_cross_device(error: &io::Error) -> bool {
    const ERROR_NOT_SAME_DEVICE: i32 = 17;
    error.raw_os_error() == Some(ERROR_NOT_SAME_DEVICE)
}

#[cfg(not(any(unix, windows)))]
fn is_cross_device(_error: &io::Error) -> bool {
    false
}

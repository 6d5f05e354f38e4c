use std::path::PathBuf;

use action::TransferMode;

#[derive(Clone, Debug)]
pub struct SortContext {
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub tag: String,
    pub copy: bool,
    pub dry_run: bool
}

impl SortContext {
    pub fn transfer_mode(&self) -> TransferMode {
        if self.copy {
            TransferMode::Copy
        } else {
            TransferMode::Move
        }
    }
}

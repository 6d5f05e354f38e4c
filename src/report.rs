use std::fmt;
use std::path::PathBuf;

use action::TransferMode;

/// The outcome of one step of a run, printed as a single console line.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    WouldTransfer { mode: TransferMode, source: PathBuf, destination: PathBuf },
    Transferred { mode: TransferMode, file_name: String },
    Failed { mode: TransferMode, file_name: String, description: String },
    NoRawMatch { file_name: String },
}

impl Report {
    pub fn is_failure(&self) -> bool {
        match *self {
            Report::Failed { .. } => true,
            _ => false,
        }
    }

    pub fn log(&self) {
        if self.is_failure() {
            error!("{}", self);
        } else {
            info!("{}", self);
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Report::WouldTransfer { mode, ref source, ref destination } => write!(
                f,
                "[Dry Run] Would {}: {} → {}",
                mode.verb(),
                source.to_string_lossy(),
                destination.to_string_lossy()
            ),
            Report::Transferred { mode, ref file_name } => write!(f, "{}: {}", mode.past_tense(), file_name),
            Report::Failed { mode, ref file_name, ref description } => {
                write!(f, "Error {} {}: {}", mode.progressive(), file_name, description)
            }
            Report::NoRawMatch { ref file_name } => write!(f, "No RAW match for: {}", file_name),
        }
    }
}

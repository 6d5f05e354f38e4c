use std::collections::HashSet;
use std::path::{Path, PathBuf};

use action::{display_file_name, transfer_file};
use context::SortContext;
use error::*;
use filesystem::FileSystem;
use raw::find_raw_companion;
use report::Report;
use rule::TagRule;
use scanner::{prepare_directories, scan_directory};
use tags::TagReader;

/// Transfers every tagged file in the source directory, each followed by its RAW companion.
///
/// Reports are logged as they happen and also returned. Only invalid directories end the run
/// early; a file that fails to transfer is reported and the run moves on.
pub fn sort_tagged_files(fs: &dyn FileSystem, tag_reader: &dyn TagReader, file_context: &SortContext)
    -> Result<Vec<Report>> {
    prepare_directories(fs, file_context)?;
    let entries = scan_directory(fs, tag_reader, &file_context.source_dir)?;
    let rule = TagRule::new(&file_context.tag);

    let mut run = SortRun { fs, file_context, handled: HashSet::new(), reports: Vec::new() };
    let mut matched = 0;
    for entry in entries.iter().filter(|entry| rule.matches(entry)) {
        matched += 1;
        if !run.transfer(&entry.path) {
            continue;
        }

        match find_raw_companion(fs, &entry.path, &file_context.source_dir) {
            Some(raw_file) => {
                run.transfer(&raw_file);
            }
            None => run.record(Report::NoRawMatch { file_name: display_file_name(&entry.path) }),
        }
    }

    let failures = run.reports.iter().filter(|report| report.is_failure()).count();
    debug!("{} of {} scanned files are tagged '{}', {} transfers failed", matched, entries.len(),
           file_context.tag, failures);
    Ok(run.reports)
}

struct SortRun<'a> {
    fs: &'a dyn FileSystem,
    file_context: &'a SortContext,
    handled: HashSet<PathBuf>,
    reports: Vec<Report>,
}

impl<'a> SortRun<'a> {
    /// Returns false if the file was already transferred earlier in this run.
    fn transfer(&mut self, file: &Path) -> bool {
        if !self.handled.insert(file.to_path_buf()) {
            debug!("Already transferred: {}", file.to_string_lossy());
            return false;
        }
        let report = transfer_file(self.fs, file, self.file_context);
        self.record(report);
        true
    }

    fn record(&mut self, report: Report) {
        report.log();
        self.reports.push(report);
    }
}

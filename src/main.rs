// `error_chain!` can recurse deeply
#![recursion_limit = "1024"]

extern crate clap;
#[macro_use]
extern crate log;
extern crate log4rs;
#[macro_use]
extern crate error_chain;
#[cfg(unix)]
extern crate libc;
extern crate plist;
extern crate xattr;

// For testing in submodules
#[cfg(test)]
extern crate rand;

use clap::{App, Arg, ArgMatches};
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

mod action;
mod context;
mod error;
mod filesystem;
mod raw;
mod report;
mod rule;
mod scanner;
mod sorter;
mod tags;

#[cfg(test)]
mod testutils;

use context::SortContext;
use error::*;
use filesystem::OsFileSystem;
use sorter::sort_tagged_files;
use tags::XattrTagReader;

use std::path::PathBuf;

fn main() {
    let argument_matches = create_app().get_matches();

    if let Err(ref error) = configure_logging(argument_matches.occurrences_of("v")) {
        eprintln!("Error: {}", error);
        ::std::process::exit(1);
    }

    // If there was an error, nicely print it and the related causes
    if let Err(ref error) = run(argument_matches) {
        error!("Error: {}", error);
        for cause in error.iter().skip(1) {
            error!("caused by: {}", cause);
        }
        ::std::process::exit(1);
    } else {
        ::std::process::exit(0);
    }
}

fn create_app<'a, 'b>() -> App<'a, 'b> {
    App::new("tagsort")
        .version("0.1")
        .author("Mitch S. <mitch+map@applicative.us>")
        .about("Moves or copies tagged photos, and their RAW companions, into a directory")
        .arg(
            Arg::with_name("source")
                .short("s")
                .long("source")
                .value_name("DIRECTORY")
                .help("Sets the directory to look for tagged files in")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::with_name("destination")
                .short("d")
                .long("destination")
                .value_name("DIRECTORY")
                .help("Sets the directory to move tagged files into, created if missing")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::with_name("tag")
                .short("t")
                .long("tag")
                .value_name("TAG")
                .help("Sets the tag to match, exactly and case sensitively")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::with_name("copy")
                .long("copy")
                .help("Copies files instead of moving them, overwriting existing files"),
        )
        .arg(
            Arg::with_name("dry-run")
                .short("n")
                .long("dry-run")
                .help("Shows what would be transferred without changing anything"),
        )
        .arg(
            Arg::with_name("v")
                .short("v")
                .multiple(true)
                .help("Sets the level of verbosity"),
        )
}

fn configure_logging(verbosity: u64) -> Result<()> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{h({m})}{n}")))
        .build();
    // Per-file results are logged at info, so that is the quietest level.
    let level = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))
        .map_err(|errors| Error::from(ErrorKind::Logging(format!("{:?}", errors))))?;
    log4rs::init_config(config).map_err(|error| Error::from(ErrorKind::Logging(error.to_string())))?;
    Ok(())
}

fn run(matches: ArgMatches) -> Result<()> {
    let file_context = resolve_context(&matches)?;
    debug!("{:?}", file_context);

    let reports = sort_tagged_files(&OsFileSystem, &XattrTagReader, &file_context)?;
    debug!("{} files reported", reports.len());

    Ok(())
}

fn resolve_context(matches: &ArgMatches) -> Result<SortContext> {
    // clap enforces these, but be explicit rather than unwrapping
    let source = matches
        .value_of("source")
        .chain_err(|| ErrorKind::Validation("A source directory is required".to_string()))?;
    let destination = matches
        .value_of("destination")
        .chain_err(|| ErrorKind::Validation("A destination directory is required".to_string()))?;
    let tag = matches
        .value_of("tag")
        .chain_err(|| ErrorKind::Validation("A tag is required".to_string()))?;

    Ok(SortContext {
        source_dir: PathBuf::from(source),
        dest_dir: PathBuf::from(destination),
        tag: tag.to_string(),
        copy: matches.is_present("copy"),
        dry_run: matches.is_present("dry-run"),
    })
}

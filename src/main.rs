mod setup;

use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{ArgAction, ArgGroup, Parser};
use tds_core::drivers::TAGS_SUPPORTED;
use tds_core::{split_names, Mode, RunOptions};

#[derive(Parser, Debug)]
#[command(
    name = "takeout-date-setter",
    version,
    about = "Google Photos Takeout Helper - restore file dates and people tags from sidecar metadata",
    arg_required_else_help = true,
    group(ArgGroup::new("mode").multiple(false))
)]
struct Cli {
    /// Extracted Takeout folder to scan
    folder: PathBuf,

    /// List files with photo-taken time, upload time and people as CSV
    #[arg(long, group = "mode")]
    list: bool,

    /// Set file dates from metadata
    #[arg(long, group = "mode")]
    set_file_dates: bool,

    /// List unique 'people' names from the metadata
    #[arg(long, group = "mode")]
    list_tags: bool,

    /// Assign the given 'people' names as Finder tags (macOS only, semicolon-separated)
    #[arg(long, group = "mode", value_name = "TAG1;...", hide = !TAGS_SUPPORTED)]
    assign_people_tags: Option<String>,

    /// Assign all 'people' names as Finder tags (macOS only)
    #[arg(long, group = "mode", hide = !TAGS_SUPPORTED)]
    assign_all_people_tags: bool,

    /// Remove all Finder tags (macOS only)
    #[arg(long, group = "mode", hide = !TAGS_SUPPORTED)]
    remove_all_tags: bool,

    /// Remove the given Finder tags (macOS only, semicolon-separated)
    #[arg(long, group = "mode", value_name = "TAG1;...", hide = !TAGS_SUPPORTED)]
    remove_named_tags: Option<String>,

    /// Verbosity level. Max: 2.
    #[arg(short, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.list {
            Mode::List
        } else if self.set_file_dates {
            Mode::SetFileDates
        } else if self.list_tags {
            Mode::ListTags
        } else if let Some(tags) = &self.assign_people_tags {
            Mode::AssignPeopleTags(split_names(tags))
        } else if self.assign_all_people_tags {
            Mode::AssignAllPeopleTags
        } else if self.remove_all_tags {
            Mode::RemoveAllTags
        } else if let Some(tags) = &self.remove_named_tags {
            Mode::RemoveNamedTags(split_names(tags))
        } else {
            Mode::Check
        }
    }

    fn run_options(&self) -> RunOptions {
        RunOptions {
            folder: self.folder.clone(),
            mode: self.mode(),
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Nothing useful is left to do if stderr itself is gone.
            err.print().ok();
            return exit_code(&err);
        }
    };
    setup::configure_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

/// Help and version requests succeed; every other parse error is a usage error.
fn exit_code(err: &clap::Error) -> ExitCode {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let options = cli.run_options();
    let t_total = std::time::Instant::now();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let summary = tds_core::run(&options, &mut out)?;

    log::info!(
        "Done! {}: {} sidecars found, {} processed, {} skipped, {} files updated, {} failed ({:.2}s)",
        options.mode,
        summary.sidecars_found,
        summary.sidecars_processed,
        summary.sidecars_skipped,
        summary.targets_updated,
        summary.target_failures,
        t_total.elapsed().as_secs_f64()
    );
    Ok(())
}

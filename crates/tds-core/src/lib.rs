pub mod csv;
pub mod date;
pub mod drivers;
pub mod error;
pub mod report;
pub mod resolve;
pub mod scan;
pub mod sidecar;

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use drivers::{SystemTimestamps, TagDriver, TimestampDriver};
use report::TagAccumulator;
use resolve::{Resolution, TargetSet};
use sidecar::SidecarRecord;

pub use error::{ResolveError, RunError, SidecarError};

/// What to do with each sidecar found.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    /// Resolve and parse every sidecar, report problems, change nothing.
    #[default]
    Check,
    /// CSV listing of every target file.
    List,
    SetFileDates,
    /// Distinct people names over the whole tree.
    ListTags,
    /// Tag each file with the people names that appear in the given list.
    AssignPeopleTags(Vec<String>),
    AssignAllPeopleTags,
    RemoveAllTags,
    RemoveNamedTags(Vec<String>),
}

impl Mode {
    /// Tag listing works from sidecars alone; everything else needs the media file.
    pub fn requires_primary(&self) -> bool {
        !matches!(self, Mode::ListTags)
    }

    pub fn uses_tags(&self) -> bool {
        matches!(
            self,
            Mode::AssignPeopleTags(_)
                | Mode::AssignAllPeopleTags
                | Mode::RemoveAllTags
                | Mode::RemoveNamedTags(_)
        )
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Check => "check",
            Mode::List => "list",
            Mode::SetFileDates => "set-file-dates",
            Mode::ListTags => "list-tags",
            Mode::AssignPeopleTags(_) => "assign-people-tags",
            Mode::AssignAllPeopleTags => "assign-all-people-tags",
            Mode::RemoveAllTags => "remove-all-tags",
            Mode::RemoveNamedTags(_) => "remove-named-tags",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Root of the extracted Takeout tree.
    pub folder: PathBuf,
    pub mode: Mode,
}

/// Split a `"A;B"` option value into names, dropping empty items and
/// repeats (the first occurrence keeps its place).
pub fn split_names(list: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in list.split(';').filter(|s| !s.is_empty()) {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Counts for one run. Per-file failures only show up here and in the log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub sidecars_found: u64,
    pub sidecars_processed: u64,
    pub sidecars_skipped: u64,
    pub targets_updated: u64,
    pub target_failures: u64,
    /// Filled in `ListTags` mode.
    pub tags: TagAccumulator,
}

/// Run `options.mode` over the tree with this platform's drivers, writing
/// reports to `out`.
pub fn run<W: Write>(options: &RunOptions, out: &mut W) -> Result<RunSummary, RunError> {
    if options.mode.uses_tags() && !drivers::TAGS_SUPPORTED {
        return Err(RunError::Argument(format!(
            "--{} is not supported on this platform",
            options.mode
        )));
    }
    if options.mode == Mode::SetFileDates && !drivers::BIRTH_TIME_SUPPORTED {
        log::debug!("Creation time is not writable on this platform, setting modification time only");
    }
    let tags = drivers::system_tag_driver();
    run_with_drivers(options, &SystemTimestamps, tags.as_ref(), out)
}

/// Same as [`run`] with explicit mutation drivers.
pub fn run_with_drivers<W: Write>(
    options: &RunOptions,
    timestamps: &dyn TimestampDriver,
    tags: &dyn TagDriver,
    out: &mut W,
) -> Result<RunSummary, RunError> {
    if !options.folder.is_dir() {
        return Err(RunError::Traversal(options.folder.clone()));
    }

    let mut summary = RunSummary::default();
    let mut ctx = Context {
        mode: &options.mode,
        timestamps,
        tags,
        summary: &mut summary,
    };

    if options.mode == Mode::List {
        writeln!(out, "{}", report::LIST_HEADER)?;
    }

    for sidecar_path in scan::sidecar_candidates(&options.folder) {
        ctx.summary.sidecars_found += 1;
        ctx.process(&sidecar_path, out)?;
    }

    if options.mode == Mode::ListTags {
        summary.tags.write_to(out)?;
    }
    out.flush()?;

    Ok(summary)
}

struct Context<'a> {
    mode: &'a Mode,
    timestamps: &'a dyn TimestampDriver,
    tags: &'a dyn TagDriver,
    summary: &'a mut RunSummary,
}

impl Context<'_> {
    /// Handle one sidecar. Only report output failures are returned; every
    /// other problem is logged and the sidecar or target is skipped.
    fn process<W: Write>(&mut self, sidecar_path: &Path, out: &mut W) -> Result<(), RunError> {
        let mode = self.mode;
        let targets = match resolve::resolve_targets(sidecar_path, mode.requires_primary()) {
            Ok(Resolution::Targets(targets)) => targets,
            Ok(Resolution::NotApplicable) => {
                log::debug!("{}: not a sidecar", sidecar_path.display());
                self.summary.sidecars_skipped += 1;
                return Ok(());
            }
            Err(err) => {
                log::warn!("{}: {}", sidecar_path.display(), err);
                self.summary.sidecars_skipped += 1;
                return Ok(());
            }
        };

        let record = match sidecar::read_sidecar(sidecar_path) {
            Ok(record) => record,
            Err(err) => {
                log::warn!("Error parsing {}: {}", sidecar_path.display(), err);
                self.summary.sidecars_skipped += 1;
                return Ok(());
            }
        };
        self.summary.sidecars_processed += 1;

        match mode {
            Mode::Check => {}
            Mode::List => {
                for path in targets.iter() {
                    report::write_list_row(out, path, &record)?;
                }
            }
            Mode::ListTags => self.summary.tags.add_all(record.people),
            Mode::SetFileDates => self.set_file_dates(&targets, &record),
            Mode::AssignPeopleTags(allowed) => {
                let selected: Vec<String> = allowed
                    .iter()
                    .filter(|name| record.people.contains(name))
                    .cloned()
                    .collect();
                self.assign_tags(&targets, &selected);
            }
            Mode::AssignAllPeopleTags => self.assign_tags(&targets, &record.people),
            Mode::RemoveAllTags => {
                for path in targets.iter() {
                    let result = self.tags.remove_all_tags(path);
                    self.record_outcome(path, "removed all tags", result);
                }
            }
            Mode::RemoveNamedTags(names) => {
                for path in targets.iter() {
                    let result = self.tags.remove_named_tags(path, names);
                    self.record_outcome(path, "removed named tags", result);
                }
            }
        }
        Ok(())
    }

    fn set_file_dates(&mut self, targets: &TargetSet, record: &SidecarRecord) {
        for path in targets.iter() {
            let result = self
                .timestamps
                .set_times(path, record.photo_taken_time, record.creation_time);
            self.record_outcome(path, "set file dates", result);
        }
    }

    fn assign_tags(&mut self, targets: &TargetSet, names: &[String]) {
        if names.is_empty() {
            return;
        }
        for path in targets.iter() {
            let result = self.tags.set_tags(path, names);
            self.record_outcome(path, "assigned tags", result);
        }
    }

    fn record_outcome(&mut self, path: &Path, action: &str, result: anyhow::Result<()>) {
        match result {
            Ok(()) => {
                log::debug!("{}: {}", path.display(), action);
                self.summary.targets_updated += 1;
            }
            Err(err) => {
                log::error!("{:#}", err);
                self.summary.target_failures += 1;
            }
        }
    }
}

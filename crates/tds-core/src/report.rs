use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::Path;

use crate::csv;
use crate::date::format_timestamp;
use crate::sidecar::SidecarRecord;

pub const LIST_HEADER: &str = "File,PhotoTakenTime,UploadTime,People";

/// Write one `--list` row for `path` using the dates and people of `record`.
pub fn write_list_row<W: Write>(out: &mut W, path: &Path, record: &SidecarRecord) -> io::Result<()> {
    let row = csv::encode_row(&[
        path.display().to_string(),
        format_timestamp(record.photo_taken_time),
        format_timestamp(record.creation_time),
        record.people.join(";"),
    ]);
    writeln!(out, "{}", row)
}

/// Distinct people names seen during one run, kept sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagAccumulator {
    names: BTreeSet<String>,
}

impl TagAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_all<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(Into::into));
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// One name per line, ascending.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for name in &self.names {
            writeln!(out, "{}", name)?;
        }
        Ok(())
    }
}

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use filetime::FileTime;

/// Whether [`SystemTimestamps`] also sets the file's birth time.
pub const BIRTH_TIME_SUPPORTED: bool = cfg!(any(target_os = "macos", windows));

pub trait TimestampDriver {
    /// Set `path`'s modification time to `creation_time` and, where the
    /// platform has a writable birth time, its birth time to `photo_taken_time`.
    /// Access time is left alone.
    fn set_times(&self, path: &Path, photo_taken_time: i64, creation_time: i64) -> anyhow::Result<()>;
}

/// Writes timestamps to the real file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimestamps;

impl TimestampDriver for SystemTimestamps {
    fn set_times(&self, path: &Path, photo_taken_time: i64, creation_time: i64) -> anyhow::Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;

        filetime::set_file_mtime(path, FileTime::from_unix_time(creation_time, 0))
            .with_context(|| format!("failed to set modification time for {}", path.display()))?;

        set_birth_time(&file, photo_taken_time)
            .with_context(|| format!("failed to set creation time for {}", path.display()))
    }
}

#[cfg(any(target_os = "macos", windows))]
fn set_birth_time(file: &File, epoch: i64) -> anyhow::Result<()> {
    use std::fs::FileTimes;
    #[cfg(target_os = "macos")]
    use std::os::macos::fs::FileTimesExt;
    #[cfg(windows)]
    use std::os::windows::fs::FileTimesExt;

    file.set_times(FileTimes::new().set_created(system_time(epoch)?))?;
    Ok(())
}

#[cfg(not(any(target_os = "macos", windows)))]
fn set_birth_time(_file: &File, _epoch: i64) -> anyhow::Result<()> {
    Ok(())
}

#[cfg_attr(not(any(target_os = "macos", windows, test)), allow(dead_code))]
fn system_time(epoch: i64) -> anyhow::Result<SystemTime> {
    let offset = Duration::from_secs(epoch.unsigned_abs());
    let time = if epoch >= 0 {
        UNIX_EPOCH.checked_add(offset)
    } else {
        UNIX_EPOCH.checked_sub(offset)
    };
    time.with_context(|| format!("timestamp {} is out of range", epoch))
}

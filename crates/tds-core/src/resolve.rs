//! Maps a sidecar to the media files it describes.
//!
//! `IMG_1.HEIC.supplemental-metadata.json` describes `IMG_1.HEIC`. Live photos
//! and motion photos often ship a companion `IMG_1.MP4` with no sidecar of its
//! own; such a companion takes its dates and tags from the primary's sidecar.
//! A companion that does have its own sidecar is left for that sidecar.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::ResolveError;

/// Long-form sidecar suffix written by Takeout.
pub const SUPPLEMENTAL_SUFFIX: &str = ".supplemental-metadata.json";
/// Short alias Takeout uses when the long form would make the name too long.
pub const SUPPL_SUFFIX: &str = ".suppl.json";

const SIDECAR_SUFFIXES: [&str; 2] = [SUPPLEMENTAL_SUFFIX, SUPPL_SUFFIX];
const COMPANION_EXTENSIONS: [&str; 2] = ["MP4", "mp4"];

/// Media files one sidecar applies to, primary first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSet {
    pub primary: PathBuf,
    pub companions: Vec<PathBuf>,
}

impl TargetSet {
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.primary.as_path()).chain(self.companions.iter().map(PathBuf::as_path))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Targets(TargetSet),
    /// File name carries neither sidecar suffix.
    NotApplicable,
}

/// Strip a recognized sidecar suffix, yielding the media file name.
pub fn media_name(sidecar_name: &str) -> Option<&str> {
    SIDECAR_SUFFIXES
        .iter()
        .find_map(|suffix| sidecar_name.find(suffix).map(|pos| &sidecar_name[..pos]))
}

/// True if `name` looks like a Takeout sidecar.
pub fn is_sidecar_name(name: &str) -> bool {
    name.ends_with(".json") && media_name(name).is_some()
}

/// Resolve the media files `sidecar` applies to.
///
/// With `require_primary`, a primary that is not on disk is an error.
pub fn resolve_targets(sidecar: &Path, require_primary: bool) -> Result<Resolution, ResolveError> {
    let Some(base_name) = sidecar
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(media_name)
    else {
        return Ok(Resolution::NotApplicable);
    };

    let dir = sidecar.parent().unwrap_or_else(|| Path::new(""));
    let primary = dir.join(base_name);

    if require_primary && !primary.exists() {
        return Err(ResolveError::MissingPrimary(primary));
    }

    let stem = Path::new(base_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(base_name);

    let mut companions: Vec<PathBuf> = Vec::new();
    for ext in COMPANION_EXTENSIONS {
        let candidate = dir.join(format!("{}.{}", stem, ext));
        if candidate == primary || !candidate.exists() || has_own_sidecar(&candidate) {
            continue;
        }
        let already_included = std::iter::once(&primary)
            .chain(companions.iter())
            .any(|p| is_same_file(p, &candidate).unwrap_or(false));
        if already_included {
            log::trace!("{} is already a target, skipping", candidate.display());
            continue;
        }
        companions.push(candidate);
    }

    Ok(Resolution::Targets(TargetSet { primary, companions }))
}

fn has_own_sidecar(media: &Path) -> bool {
    let Some(name) = media.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    SIDECAR_SUFFIXES
        .iter()
        .any(|suffix| media.with_file_name(format!("{}{}", name, suffix)).exists())
}

/// Whether two paths name the same file, e.g. `X.MP4` and `X.mp4` on a
/// case-insensitive file system.
#[cfg(unix)]
pub fn is_same_file(a: &Path, b: &Path) -> io::Result<bool> {
    use std::os::unix::fs::MetadataExt;

    let (ma, mb) = (fs::metadata(a)?, fs::metadata(b)?);
    Ok(ma.dev() == mb.dev() && ma.ino() == mb.ino())
}

#[cfg(not(unix))]
pub fn is_same_file(a: &Path, b: &Path) -> io::Result<bool> {
    Ok(fs::canonicalize(a)? == fs::canonicalize(b)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        File::create(&path).unwrap();
        path
    }

    fn targets(resolution: Resolution) -> TargetSet {
        match resolution {
            Resolution::Targets(t) => t,
            Resolution::NotApplicable => panic!("expected targets"),
        }
    }

    /// Probe whether the temp dir treats `a` and `A` as the same name.
    fn case_insensitive(dir: &Path) -> bool {
        let probe = touch(dir, "case-probe");
        let insensitive = dir.join("CASE-PROBE").exists();
        fs::remove_file(probe).unwrap();
        insensitive
    }

    #[test]
    fn test_media_name() {
        assert_eq!(media_name("IMG_1.HEIC.supplemental-metadata.json"), Some("IMG_1.HEIC"));
        assert_eq!(media_name("IMG_1.HEIC.suppl.json"), Some("IMG_1.HEIC"));
        assert_eq!(media_name("IMG_1.HEIC.json"), None);
        assert_eq!(media_name("metadata.json"), None);
        assert!(is_sidecar_name("a.jpg.suppl.json"));
        assert!(!is_sidecar_name("a.jpg.suppl.json.bak"));
    }

    #[test]
    fn test_not_applicable() {
        let dir = tempdir().unwrap();
        let path = touch(dir.path(), "print-subscriptions.json");
        assert_eq!(resolve_targets(&path, true).unwrap(), Resolution::NotApplicable);
    }

    #[test]
    fn test_primary_only() {
        let dir = tempdir().unwrap();
        let primary = touch(dir.path(), "IMG_1.HEIC");
        let json = touch(dir.path(), "IMG_1.HEIC.supplemental-metadata.json");

        let t = targets(resolve_targets(&json, true).unwrap());
        assert_eq!(t.primary, primary);
        assert!(t.companions.is_empty());
        assert_eq!(t.iter().count(), 1);
    }

    #[test]
    fn test_short_suffix() {
        let dir = tempdir().unwrap();
        let primary = touch(dir.path(), "PXL_20230101_120000000.jpg");
        let json = touch(dir.path(), "PXL_20230101_120000000.jpg.suppl.json");

        let t = targets(resolve_targets(&json, true).unwrap());
        assert_eq!(t.primary, primary);
    }

    #[test]
    fn test_missing_primary() {
        let dir = tempdir().unwrap();
        let json = touch(dir.path(), "IMG_1.HEIC.supplemental-metadata.json");

        let err = resolve_targets(&json, true).unwrap_err();
        let ResolveError::MissingPrimary(path) = err;
        assert_eq!(path, dir.path().join("IMG_1.HEIC"));

        // Tag listing does not need the media file.
        let t = targets(resolve_targets(&json, false).unwrap());
        assert_eq!(t.primary, dir.path().join("IMG_1.HEIC"));
    }

    #[test]
    fn test_companion_without_sidecar_included() {
        let dir = tempdir().unwrap();
        let primary = touch(dir.path(), "IMG_1.HEIC");
        let mp4 = touch(dir.path(), "IMG_1.MP4");
        let json = touch(dir.path(), "IMG_1.HEIC.supplemental-metadata.json");

        let t = targets(resolve_targets(&json, true).unwrap());
        assert_eq!(t.iter().collect::<Vec<_>>(), vec![primary.as_path(), mp4.as_path()]);
    }

    #[test]
    fn test_companion_with_own_sidecar_excluded() {
        for own in ["IMG_1.MP4.supplemental-metadata.json", "IMG_1.MP4.suppl.json"] {
            let dir = tempdir().unwrap();
            touch(dir.path(), "IMG_1.HEIC");
            touch(dir.path(), "IMG_1.MP4");
            touch(dir.path(), own);
            let json = touch(dir.path(), "IMG_1.HEIC.supplemental-metadata.json");

            let t = targets(resolve_targets(&json, true).unwrap());
            assert!(t.companions.is_empty(), "{own} should claim IMG_1.MP4");
        }
    }

    #[test]
    fn test_lowercase_companion() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "IMG_2.jpg");
        let mp4 = touch(dir.path(), "IMG_2.mp4");
        let json = touch(dir.path(), "IMG_2.jpg.suppl.json");

        let t = targets(resolve_targets(&json, true).unwrap());
        assert_eq!(t.companions.len(), 1);
        assert!(is_same_file(&t.companions[0], &mp4).unwrap());
    }

    #[test]
    fn test_both_case_variants() {
        let dir = tempdir().unwrap();
        let insensitive = case_insensitive(dir.path());
        touch(dir.path(), "IMG_3.HEIC");
        touch(dir.path(), "IMG_3.MP4");
        touch(dir.path(), "IMG_3.mp4");
        let json = touch(dir.path(), "IMG_3.HEIC.supplemental-metadata.json");

        let t = targets(resolve_targets(&json, true).unwrap());
        if insensitive {
            assert_eq!(t.companions, vec![dir.path().join("IMG_3.MP4")]);
        } else {
            assert_eq!(
                t.companions,
                vec![dir.path().join("IMG_3.MP4"), dir.path().join("IMG_3.mp4")]
            );
        }
    }

    #[test]
    fn test_mp4_primary_is_not_its_own_companion() {
        let dir = tempdir().unwrap();
        let primary = touch(dir.path(), "VID_1.MP4");
        let json = touch(dir.path(), "VID_1.MP4.supplemental-metadata.json");

        let t = targets(resolve_targets(&json, true).unwrap());
        assert_eq!(t.primary, primary);
        assert!(t.companions.is_empty());
    }

    #[test]
    fn test_is_same_file() {
        let dir = tempdir().unwrap();
        let a = touch(dir.path(), "a");
        let b = touch(dir.path(), "b");
        assert!(is_same_file(&a, &a).unwrap());
        assert!(!is_same_file(&a, &b).unwrap());
        assert!(is_same_file(&a, &dir.path().join("missing")).is_err());
    }
}

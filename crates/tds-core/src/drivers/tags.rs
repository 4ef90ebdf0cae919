use std::path::Path;

/// Whether this build can store file tags.
pub const TAGS_SUPPORTED: bool = cfg!(target_os = "macos");

/// Categorical tags stored in a file system attribute.
///
/// Every operation is idempotent: repeating it leaves the same tag set.
pub trait TagDriver {
    /// Replace the tag set of `path` with `tags`.
    fn set_tags(&self, path: &Path, tags: &[String]) -> anyhow::Result<()>;
    fn remove_all_tags(&self, path: &Path) -> anyhow::Result<()>;
    /// Remove the named tags, leaving any others.
    fn remove_named_tags(&self, path: &Path, names: &[String]) -> anyhow::Result<()>;
}

/// Fails every call. Used where the file system has no tag attribute.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedTags;

impl UnsupportedTags {
    fn fail(path: &Path) -> anyhow::Result<()> {
        anyhow::bail!("file tags are not supported on this platform ({})", path.display())
    }
}

impl TagDriver for UnsupportedTags {
    fn set_tags(&self, path: &Path, _tags: &[String]) -> anyhow::Result<()> {
        Self::fail(path)
    }

    fn remove_all_tags(&self, path: &Path) -> anyhow::Result<()> {
        Self::fail(path)
    }

    fn remove_named_tags(&self, path: &Path, _names: &[String]) -> anyhow::Result<()> {
        Self::fail(path)
    }
}

/// The tag driver for the platform this was built for.
pub fn system_tag_driver() -> Box<dyn TagDriver> {
    #[cfg(target_os = "macos")]
    {
        Box::new(FinderTags)
    }
    #[cfg(not(target_os = "macos"))]
    {
        Box::new(UnsupportedTags)
    }
}

#[cfg(target_os = "macos")]
pub use finder::FinderTags;

#[cfg(target_os = "macos")]
mod finder {
    use std::path::Path;

    use anyhow::Context;

    use super::TagDriver;

    /// Finder keeps user tags as a binary plist array of strings. A coloured
    /// tag is stored as `"<name>\n<color index>"`.
    const USER_TAGS_XATTR: &str = "com.apple.metadata:_kMDItemUserTags";

    /// macOS Finder tags.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct FinderTags;

    fn tag_label(tag: &str) -> &str {
        tag.split('\n').next().unwrap_or(tag)
    }

    fn read_tags(path: &Path) -> anyhow::Result<Vec<String>> {
        let raw = xattr::get(path, USER_TAGS_XATTR)
            .with_context(|| format!("failed to read tags of {}", path.display()))?;
        match raw {
            Some(bytes) => plist::from_bytes(&bytes)
                .with_context(|| format!("unreadable tag list on {}", path.display())),
            None => Ok(Vec::new()),
        }
    }

    fn write_tags(path: &Path, tags: &[String]) -> anyhow::Result<()> {
        if tags.is_empty() {
            return clear_tags(path);
        }
        let mut blob = Vec::new();
        plist::to_writer_binary(&mut blob, &tags)?;
        xattr::set(path, USER_TAGS_XATTR, &blob)
            .with_context(|| format!("failed to write tags of {}", path.display()))
    }

    fn clear_tags(path: &Path) -> anyhow::Result<()> {
        let present = xattr::get(path, USER_TAGS_XATTR)
            .with_context(|| format!("failed to read tags of {}", path.display()))?
            .is_some();
        if present {
            xattr::remove(path, USER_TAGS_XATTR)
                .with_context(|| format!("failed to remove tags of {}", path.display()))?;
        }
        Ok(())
    }

    impl TagDriver for FinderTags {
        fn set_tags(&self, path: &Path, tags: &[String]) -> anyhow::Result<()> {
            write_tags(path, tags)
        }

        fn remove_all_tags(&self, path: &Path) -> anyhow::Result<()> {
            clear_tags(path)
        }

        fn remove_named_tags(&self, path: &Path, names: &[String]) -> anyhow::Result<()> {
            let existing = read_tags(path)?;
            let kept: Vec<String> = existing
                .iter()
                .filter(|tag| !names.iter().any(|n| n == tag_label(tag)))
                .cloned()
                .collect();
            if kept.len() == existing.len() {
                return Ok(());
            }
            write_tags(path, &kept)
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_fails_every_call() {
        let path = Path::new("IMG_1.HEIC");
        let tags = vec!["Alice".to_string()];
        assert!(UnsupportedTags.set_tags(path, &tags).is_err());
        assert!(UnsupportedTags.remove_all_tags(path).is_err());
        assert!(UnsupportedTags.remove_named_tags(path, &tags).is_err());
    }
}

//! File system mutations, behind traits so the run controller never branches
//! on the platform and tests can record calls instead of touching files.

pub mod tags;
pub mod times;

pub use tags::{system_tag_driver, TagDriver, UnsupportedTags, TAGS_SUPPORTED};
pub use times::{SystemTimestamps, TimestampDriver, BIRTH_TIME_SUPPORTED};

#[cfg(target_os = "macos")]
pub use tags::FinderTags;

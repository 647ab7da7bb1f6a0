//! Entry classification during the tree walk.
//!
//! Precedence matters: an excluded name is never scanned even if it is also
//! listed as media, and media wins over ordinary directory handling.
//!
//! | Kind | Rule |
//! |---|---|
//! | [`EntryKind::Excluded`] | name is in the exclusion set (any entry type) |
//! | [`EntryKind::Media`] | directory whose name is in the media set |
//! | [`EntryKind::IndexPlaceholder`] | the reserved `_index.adoc` |
//! | [`EntryKind::Content`] | non-directory with the `.adoc` extension |
//! | [`EntryKind::Directory`] | any other directory |
//! | [`EntryKind::Other`] | everything else, ignored |

use crate::config::BuildConfig;
use crate::paths;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Excluded,
    Media,
    IndexPlaceholder,
    Content,
    Directory,
    Other,
}

/// Classify one walk entry by its base name and type.
pub fn classify(name: &str, is_dir: bool, config: &BuildConfig) -> EntryKind {
    if config.is_excluded(name) {
        EntryKind::Excluded
    } else if is_dir && config.is_media(name) {
        EntryKind::Media
    } else if is_dir {
        EntryKind::Directory
    } else if name == paths::INDEX_SOURCE {
        EntryKind::IndexPlaceholder
    } else if paths::has_source_ext(name) {
        EntryKind::Content
    } else {
        EntryKind::Other
    }
}

use std::path::Path;

use walkdir::WalkDir;

use crate::media::mime::is_playable;

/// List the playable media files directly inside `folder`, sorted by file name.
///
/// Only regular files (symlinks are followed) with an extension from
/// [`crate::media::mime::VIDEO_EXTENSIONS`] are returned. A missing or
/// unreadable folder yields an empty list; the error is logged, never returned.
pub fn list_media_files(folder: &Path) -> Vec<String> {
    if !folder.is_dir() {
        tracing::warn!("Channel folder is not a readable directory: {}", folder.display());
        return Vec::new();
    }

    let walker = WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    let mut files = Vec::new();
    for entry in walker {
        match entry {
            Err(e) => {
                tracing::warn!("Cannot access entry in {}: {}", folder.display(), e);
            }
            Ok(entry) if entry.file_type().is_file() && is_playable(entry.path()) => {
                match entry.file_name().to_str() {
                    Some(name) => files.push(name.to_owned()),
                    None => tracing::debug!("Skipping non UTF-8 file name: {}", entry.path().display()),
                }
            }
            Ok(_) => {}
        }
    }

    files
}

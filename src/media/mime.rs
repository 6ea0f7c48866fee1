use std::path::Path;

/// Fallback for extensions missing from the table below.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Extensions the folder scanner treats as playable episodes.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov", "flv", "wmv", "webm"];

/// Media kind classification for servable files.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
    Image,
    Subtitle,
}

/// Classify a file path by its extension into a (MediaKind, MIME type) pair.
///
/// Returns `None` for unrecognized extensions. Extensions are matched
/// case-insensitively.
///
/// Subtitles use the types browsers expect for `<track>` elements:
/// `text/vtt` for WebVTT and `application/x-subrip` for SubRip.
pub fn classify(path: &Path) -> Option<(MediaKind, &'static str)> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();

    let result = match ext.as_str() {
        // Video
        "mp4" | "m4v" => (MediaKind::Video, "video/mp4"),
        "mkv" => (MediaKind::Video, "video/x-matroska"),
        "avi" => (MediaKind::Video, "video/x-msvideo"),
        "mov" => (MediaKind::Video, "video/quicktime"),
        "ts" | "m2ts" | "mts" => (MediaKind::Video, "video/mp2t"),
        "mpg" | "mpeg" => (MediaKind::Video, "video/mpeg"),
        "wmv" => (MediaKind::Video, "video/x-ms-wmv"),
        "flv" => (MediaKind::Video, "video/x-flv"),
        "ogv" => (MediaKind::Video, "video/ogg"),
        "webm" => (MediaKind::Video, "video/webm"),
        "3gp" => (MediaKind::Video, "video/3gpp"),

        // Audio
        "mp3" => (MediaKind::Audio, "audio/mpeg"),
        "m4a" => (MediaKind::Audio, "audio/mp4"),
        "aac" => (MediaKind::Audio, "audio/aac"),
        "flac" => (MediaKind::Audio, "audio/flac"),
        "ogg" | "oga" | "opus" => (MediaKind::Audio, "audio/ogg"),
        "wav" => (MediaKind::Audio, "audio/wav"),

        // Image (show posters)
        "jpg" | "jpeg" => (MediaKind::Image, "image/jpeg"),
        "png" => (MediaKind::Image, "image/png"),
        "gif" => (MediaKind::Image, "image/gif"),
        "webp" => (MediaKind::Image, "image/webp"),

        // Subtitle
        "vtt" => (MediaKind::Subtitle, "text/vtt"),
        "srt" => (MediaKind::Subtitle, "application/x-subrip"),

        _ => return None,
    };

    Some(result)
}

/// MIME type for `path`, falling back to `application/octet-stream`.
pub fn guess(path: &Path) -> &'static str {
    classify(path).map(|(_, mime)| mime).unwrap_or(OCTET_STREAM)
}

/// True when the extension is one of [`VIDEO_EXTENSIONS`].
pub fn is_playable(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            VIDEO_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

//! Format selection and output-path resolution for the download endpoint.

use std::path::{Path, PathBuf};

use crate::youtube::VideoInfo;

/// Filename stem used when sanitizing leaves nothing behind.
const FALLBACK_STEM: &str = "download";

/// Format chosen for a download, reduced to the two fields the transfer
/// needs.
#[derive(Debug, PartialEq, Eq)]
pub struct SelectedFormat<'a> {
    pub format_id: &'a str,
    pub ext: &'a str,
}

/// Picks the format whose id matches the request, silently falling back to
/// the first listed format when nothing matches or no id was requested. The
/// caller is answered with whatever actually gets downloaded.
///
/// Formats without an id cannot be requested from the extractor and are
/// skipped entirely. `None` means the video reported no usable format at all.
pub fn select_format<'a>(info: &'a VideoInfo, requested: Option<&str>) -> Option<SelectedFormat<'a>> {
    let mut usable = info.formats.iter().filter_map(|format| {
        let format_id = format.format_id.as_deref()?;
        Some(SelectedFormat {
            format_id,
            ext: format.ext.as_deref().unwrap_or("mp4"),
        })
    });

    if let Some(wanted) = requested
        && let Some(found) = usable.clone().find(|format| format.format_id == wanted)
    {
        return Some(found);
    }

    usable.next()
}

/// Replaces path separators and other filesystem-hostile characters so a
/// caller-supplied title cannot steer the output outside the download
/// directory.
pub fn sanitize_title(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            _ => c,
        })
        .collect();

    let trimmed = cleaned.trim().trim_matches('.');
    if trimmed.is_empty() {
        FALLBACK_STEM.to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// Builds `<download_dir>/<stem>.<ext>`, preferring the caller-supplied title
/// over the video's own.
pub fn resolve_output_path(
    download_dir: &Path,
    title_override: Option<&str>,
    info: &VideoInfo,
    ext: &str,
) -> PathBuf {
    let stem = title_override
        .filter(|title| !title.trim().is_empty())
        .unwrap_or_else(|| info.display_title());

    download_dir.join(format!("{}.{}", sanitize_title(stem), ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube::FormatEntry;

    fn info_with_formats(formats: Vec<FormatEntry>) -> VideoInfo {
        VideoInfo {
            id: "abc".into(),
            title: Some("Sample Title".into()),
            fulltitle: None,
            formats,
        }
    }

    fn format(id: Option<&str>, ext: Option<&str>) -> FormatEntry {
        FormatEntry {
            format_id: id.map(str::to_owned),
            ext: ext.map(str::to_owned),
        }
    }

    #[test]
    fn exact_format_match_wins() {
        let info = info_with_formats(vec![
            format(Some("137"), Some("mp4")),
            format(Some("251"), Some("webm")),
        ]);
        let selected = select_format(&info, Some("251")).unwrap();
        assert_eq!(selected.format_id, "251");
        assert_eq!(selected.ext, "webm");
    }

    #[test]
    fn unmatched_request_falls_back_to_first_format() {
        let info = info_with_formats(vec![
            format(Some("137"), Some("mp4")),
            format(Some("251"), Some("webm")),
        ]);
        let selected = select_format(&info, Some("9999")).unwrap();
        assert_eq!(selected.format_id, "137");
    }

    #[test]
    fn missing_request_falls_back_to_first_format() {
        let info = info_with_formats(vec![format(Some("18"), None)]);
        let selected = select_format(&info, None).unwrap();
        assert_eq!(selected.format_id, "18");
        assert_eq!(selected.ext, "mp4");
    }

    #[test]
    fn idless_formats_are_skipped() {
        let info = info_with_formats(vec![
            format(None, Some("mp4")),
            format(Some("251"), Some("webm")),
        ]);
        let selected = select_format(&info, None).unwrap();
        assert_eq!(selected.format_id, "251");
    }

    #[test]
    fn empty_format_list_selects_nothing() {
        let info = info_with_formats(Vec::new());
        assert!(select_format(&info, Some("137")).is_none());
    }

    #[test]
    fn sanitize_title_neutralizes_separators() {
        assert_eq!(sanitize_title("My Song/remix"), "My Song_remix");
        assert_eq!(sanitize_title("a\\b:c"), "a_b_c");
    }

    #[test]
    fn sanitize_title_rejects_dot_only_stems() {
        assert_eq!(sanitize_title(".."), FALLBACK_STEM);
        assert_eq!(sanitize_title("   "), FALLBACK_STEM);
    }

    #[test]
    fn traversal_attempts_stay_inside_the_download_dir() {
        let info = info_with_formats(Vec::new());
        let path = resolve_output_path(Path::new("downloads"), Some("../escape"), &info, "mp4");
        assert_eq!(path, PathBuf::from("downloads/_escape.mp4"));
    }

    #[test]
    fn override_title_beats_video_title() {
        let info = info_with_formats(Vec::new());
        let path = resolve_output_path(Path::new("downloads"), Some("My Pick"), &info, "webm");
        assert_eq!(path, PathBuf::from("downloads/My Pick.webm"));
    }

    #[test]
    fn video_title_used_when_no_override() {
        let info = info_with_formats(Vec::new());
        let path = resolve_output_path(Path::new("downloads"), None, &info, "mp4");
        assert_eq!(path, PathBuf::from("downloads/Sample Title.mp4"));
    }

    #[test]
    fn blank_override_is_ignored() {
        let info = info_with_formats(Vec::new());
        let path = resolve_output_path(Path::new("downloads"), Some("  "), &info, "mp4");
        assert_eq!(path, PathBuf::from("downloads/Sample Title.mp4"));
    }
}

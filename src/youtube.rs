// src/youtube.rs - YouTube URL helpers
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref VIDEO_ID: Regex = Regex::new(
        r"(?:youtube\.com/watch\?(?:[^#]*&)?v=|youtu\.be/)([A-Za-z0-9_-]{6,})"
    )
    .unwrap();
}

/// Best-effort extraction of the video id from a watch or short URL, for
/// log and status display only. The backend performs the authoritative
/// validation; unrecognized URLs are still submitted as-is.
pub fn extract_video_id(url: &str) -> Option<&str> {
    VIDEO_ID
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_id_from_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("https://youtube.com/watch?list=PL123&v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_extracts_id_from_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_unrecognized_urls_yield_none() {
        assert_eq!(extract_video_id("https://example.com/watch?v=x"), None);
        assert_eq!(extract_video_id("not a url"), None);
    }
}

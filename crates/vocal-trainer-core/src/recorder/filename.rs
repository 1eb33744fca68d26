use crate::recorder::CLIP_EXTENSION;

use chrono::NaiveDateTime;

/// Name used when no track is active or nothing survives sanitizing.
pub const FALLBACK_TRACK_NAME: &str = "Exercise";

/// Keep ASCII letters, digits, space, `_` and `-`, then turn each run of
/// spaces into a single `_`.
pub fn sanitize_track_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_space = false;

    for c in name.chars() {
        match c {
            ' ' if !in_space => {
                out.push('_');
                in_space = true;
            }
            ' ' => {}
            c if c.is_ascii_alphanumeric() || c == '_' || c == '-' => {
                out.push(c);
                in_space = false;
            }
            _ => {}
        }
    }

    out
}

/// `<sanitized track>_<YYYY-MM-DD>_<HH-MM>.wav`
pub fn recording_filename(track_name: Option<&str>, now: NaiveDateTime) -> String {
    let safe = track_name
        .map(sanitize_track_name)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| FALLBACK_TRACK_NAME.to_string());

    format!(
        "{}_{}_{}.{}",
        safe,
        now.format("%Y-%m-%d"),
        now.format("%H-%M"),
        CLIP_EXTENSION
    )
}

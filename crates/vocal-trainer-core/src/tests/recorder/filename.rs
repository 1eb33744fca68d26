use crate::{FALLBACK_TRACK_NAME, recording_filename, sanitize_track_name};

use chrono::NaiveDate;

#[allow(clippy::unwrap_used)]
fn at_14_05() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 19)
        .unwrap()
        .and_hms_opt(14, 5, 59)
        .unwrap()
}

/// WHAT: Punctuation is stripped and spaces become underscores
/// WHY: Filenames must be safe on every filesystem
#[test]
fn given_name_with_punctuation_when_sanitizing_then_only_safe_chars_remain() {
    // Given/When: Sanitizing a name with punctuation, accents and runs of spaces
    let safe = sanitize_track_name("Lip  Trill (warm-up)! ñ2");

    // Then: Only [A-Za-z0-9_-] with single underscores for space runs
    assert_eq!(safe, "Lip_Trill_warm-up_2");
}

/// WHAT: Filenames combine track name, date and colon-free time
/// WHY: Takes sort by exercise and time in a file browser
#[test]
fn given_track_and_time_when_deriving_filename_then_name_date_time_wav() {
    // Given/When: Deriving the filename at 14:05
    let name = recording_filename(Some("Sirens Low"), at_14_05());

    // Then: Date and HH-MM, fixed extension
    assert_eq!(name, "Sirens_Low_2026-10-19_14-05.wav");
}

/// WHAT: No active track falls back to a generic name
/// WHY: Recording works before any track was selected
#[test]
fn given_no_track_when_deriving_filename_then_fallback_name_used() {
    // Given/When: Deriving without a track and with a name that sanitizes to nothing
    let none = recording_filename(None, at_14_05());
    let symbols = recording_filename(Some("¡¿!"), at_14_05());

    // Then: Both use the fallback
    let expected = format!("{}_2026-10-19_14-05.wav", FALLBACK_TRACK_NAME);
    assert_eq!(none, expected);
    assert_eq!(symbols, expected);
}

//! Timecode and frame-rate conversions for marker placement.

/// Formats seconds as `HH:MM:SS:FF` at the given frame rate.
pub fn seconds_to_timecode(seconds: f64, fps: f64) -> String {
    let hours = (seconds / 3600.0) as u32;
    let minutes = ((seconds % 3600.0) / 60.0) as u32;
    let secs = (seconds % 60.0) as u32;
    let frames = ((seconds % 1.0) * fps).round() as u32;
    format!("{hours:02}:{minutes:02}:{secs:02}:{frames:02}")
}

/// Parses `HH:MM:SS:FF` into a frame count; malformed input is frame 0.
pub fn timecode_to_frames(tc: &str, fps: f64) -> i64 {
    let mut parts = tc.split(':');
    let (Some(h), Some(m), Some(s), Some(f), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return 0;
    };
    let (Ok(h), Ok(m), Ok(s), Ok(f)) = (
        h.parse::<i64>(),
        m.parse::<i64>(),
        s.parse::<i64>(),
        f.parse::<i64>(),
    ) else {
        return 0;
    };
    (((h * 3600 + m * 60 + s) as f64) * fps).round() as i64 + f
}

/// Extracts a numeric rate from strings like `"23.98 fps"`, rounded to
/// three decimals.
pub fn parse_frame_rate(rate: &str) -> Option<f64> {
    let value: f64 = rate.split_whitespace().next()?.parse().ok()?;
    Some((value * 1000.0).round() / 1000.0)
}

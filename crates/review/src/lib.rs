//! Review pull/push helpers.
//!
//! Everything the media panel needs once clips are on the review service:
//! comments flattened into marker-ready notes, the status/label vocabulary
//! mapped both ways between the service and the panel's colour labels, and
//! the timecode conversions the marker placement needs. Creating markers in
//! the host timeline stays with the host integration.

pub mod comments;
pub mod status;
pub mod timecode;

pub use comments::{ReviewNote, flatten_comments, pull_notes};
pub use status::{ReviewStatus, get_status, set_status};
pub use timecode::{parse_frame_rate, seconds_to_timecode, timecode_to_frames};

//! Snapshot payloads.
//!
//! These are what gets persisted and returned to callers: flattened,
//! typed versions of the API responses with derived fields computed once at
//! fetch time.

mod analytics;
mod channel;
mod comment;
mod playlist;
mod video;

pub use self::analytics::{PlaylistAnalytics, TopVideo};
pub use self::channel::Channel;
pub use self::comment::Comment;
pub use self::playlist::{Playlist, PlaylistVideo};
pub use self::video::Video;

/// Public watch URL of a video.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

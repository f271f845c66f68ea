use crate::duration::parse_seconds;
use crate::models::watch_url;
use crate::wire::{PlaylistItem, VideoItem};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tubesnap_resolver::Payload;

/// Playlist details, without its contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub item_count: u64,
    #[serde(with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
    pub channel_title: Option<String>,
    pub privacy_status: Option<String>,
}
impl Payload for Playlist {}

impl From<PlaylistItem> for Playlist {
    fn from(item: PlaylistItem) -> Self {
        Self {
            id: item.id,
            name: item.snippet.title,
            description: item.snippet.description,
            thumbnail_url: item.snippet.thumbnails.best(),
            item_count: item.content_details.item_count,
            published_at: item.snippet.published_at,
            channel_title: item.snippet.channel_title,
            privacy_status: item.status.privacy_status,
        }
    }
}

/// One entry of a playlist (or of a channel's uploads).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistVideo {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
    pub duration: Option<String>,
    pub duration_seconds: Option<u64>,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub privacy_status: Option<String>,
    pub url: String,
}

impl From<VideoItem> for PlaylistVideo {
    fn from(item: VideoItem) -> Self {
        let duration_seconds = item.content_details.duration.as_deref().and_then(parse_seconds);
        Self {
            url: watch_url(&item.id),
            video_id: item.id,
            title: item.snippet.title,
            description: item.snippet.description,
            thumbnail_url: item.snippet.thumbnails.best(),
            published_at: item.snippet.published_at,
            duration: item.content_details.duration,
            duration_seconds,
            view_count: item.statistics.views(),
            like_count: item.statistics.likes(),
            comment_count: item.statistics.comments(),
            privacy_status: item.status.privacy_status,
        }
    }
}

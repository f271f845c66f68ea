use crate::wire::ChannelItem;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tubesnap_resolver::Payload;

/// Channel details and lifetime counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub title: String,
    pub description: String,
    /// The channel's `@handle`, if it has one.
    pub custom_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub country: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
    /// Absent when the channel hides its subscriber count.
    pub subscriber_count: Option<u64>,
    pub view_count: u64,
    pub video_count: u64,
    pub youtube_channel_url: String,
}
impl Payload for Channel {}

impl From<ChannelItem> for Channel {
    fn from(item: ChannelItem) -> Self {
        Self {
            youtube_channel_url: format!("https://www.youtube.com/channel/{}", item.id),
            subscriber_count: item.statistics.subscribers(),
            view_count: item.statistics.views(),
            video_count: item.statistics.videos(),
            id: item.id,
            title: item.snippet.title,
            description: item.snippet.description,
            custom_url: item.snippet.custom_url,
            thumbnail_url: item.snippet.thumbnails.best(),
            country: item.snippet.country,
            published_at: item.snippet.published_at,
        }
    }
}

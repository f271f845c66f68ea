use crate::duration::{parse_seconds, round2};
use crate::models::watch_url;
use crate::wire::VideoItem;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tubesnap_resolver::Payload;

/// A single video with its counters and figures derived from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub channel_title: Option<String>,
    pub privacy_status: Option<String>,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    /// ISO-8601 duration as reported by the API.
    pub duration: Option<String>,
    pub watch_time_minutes: Option<f64>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
    /// Whole days between publication and the fetch.
    pub days_since_published: Option<i64>,
    /// Only present when both the view count and the age are positive.
    pub views_per_day: Option<f64>,
    pub youtube_video_url: String,
}
impl Payload for Video {}

impl Video {
    pub(crate) fn from_item(item: VideoItem, fetched_at: OffsetDateTime) -> Self {
        let view_count = item.statistics.views();
        let duration = item.content_details.duration;
        let watch_time_minutes = duration
            .as_deref()
            .and_then(parse_seconds)
            .map(|seconds| round2(seconds as f64 / 60.0));
        let published_at = item.snippet.published_at;
        let days_since_published = published_at.map(|published| (fetched_at - published).whole_days());
        let views_per_day = match days_since_published {
            Some(days) if days > 0 && view_count > 0 => Some(round2(view_count as f64 / days as f64)),
            _ => None,
        };
        Self {
            youtube_video_url: watch_url(&item.id),
            id: item.id,
            title: item.snippet.title,
            description: item.snippet.description,
            thumbnail_url: item.snippet.thumbnails.best(),
            channel_title: item.snippet.channel_title,
            privacy_status: item.status.privacy_status,
            view_count,
            like_count: item.statistics.likes(),
            comment_count: item.statistics.comments(),
            duration,
            watch_time_minutes,
            published_at,
            days_since_published,
            views_per_day,
        }
    }
}

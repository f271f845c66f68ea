//! Response bodies of the YouTube Data API v3, as far as they are read.
//!
//! Everything is optional or defaulted: the API omits parts that weren't
//! requested and fields the caller isn't allowed to see.

use serde::Deserialize;
use time::OffsetDateTime;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub(crate) items: Vec<T>,
    #[serde(default)]
    pub(crate) next_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Thumbnail {
    pub(crate) url: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Thumbnails {
    pub(crate) default: Option<Thumbnail>,
    pub(crate) medium: Option<Thumbnail>,
    pub(crate) high: Option<Thumbnail>,
    pub(crate) maxres: Option<Thumbnail>,
}
impl Thumbnails {
    /// URL of the largest thumbnail available.
    pub(crate) fn best(&self) -> Option<String> {
        [&self.maxres, &self.high, &self.medium, &self.default]
            .into_iter()
            .flatten()
            .next()
            .map(|thumbnail| thumbnail.url.clone())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Snippet {
    #[serde(default)]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub(crate) published_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub(crate) channel_title: Option<String>,
    #[serde(default)]
    pub(crate) thumbnails: Thumbnails,
}

/// Counters arrive as decimal strings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Statistics {
    pub(crate) view_count: Option<String>,
    pub(crate) like_count: Option<String>,
    pub(crate) comment_count: Option<String>,
}

fn count(raw: &Option<String>) -> u64 {
    raw.as_deref().and_then(|value| value.parse().ok()).unwrap_or(0)
}

impl Statistics {
    pub(crate) fn views(&self) -> u64 {
        count(&self.view_count)
    }

    pub(crate) fn likes(&self) -> u64 {
        count(&self.like_count)
    }

    pub(crate) fn comments(&self) -> u64 {
        count(&self.comment_count)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Status {
    pub(crate) privacy_status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct VideoContentDetails {
    pub(crate) duration: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VideoItem {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) snippet: Snippet,
    #[serde(default)]
    pub(crate) statistics: Statistics,
    #[serde(default)]
    pub(crate) content_details: VideoContentDetails,
    #[serde(default)]
    pub(crate) status: Status,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaylistContentDetails {
    #[serde(default)]
    pub(crate) item_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaylistItem {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) snippet: Snippet,
    #[serde(default)]
    pub(crate) content_details: PlaylistContentDetails,
    #[serde(default)]
    pub(crate) status: Status,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaylistEntryDetails {
    pub(crate) video_id: String,
}

/// One row of `playlistItems`: only the video id is read.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaylistEntry {
    pub(crate) content_details: Option<PlaylistEntryDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommentSnippet {
    #[serde(default)]
    pub(crate) author_display_name: String,
    pub(crate) author_channel_url: Option<String>,
    pub(crate) author_profile_image_url: Option<String>,
    #[serde(default)]
    pub(crate) text_display: String,
    #[serde(default)]
    pub(crate) text_original: String,
    #[serde(default)]
    pub(crate) like_count: u64,
    pub(crate) parent_id: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub(crate) published_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub(crate) updated_at: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentResource {
    pub(crate) id: String,
    pub(crate) snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ThreadSnippet {
    pub(crate) top_level_comment: CommentResource,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ThreadReplies {
    #[serde(default)]
    pub(crate) comments: Vec<CommentResource>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentThread {
    pub(crate) snippet: ThreadSnippet,
    #[serde(default)]
    pub(crate) replies: ThreadReplies,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RelatedPlaylists {
    pub(crate) uploads: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChannelContentDetails {
    #[serde(default)]
    pub(crate) related_playlists: RelatedPlaylists,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChannelSnippet {
    #[serde(default)]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: String,
    pub(crate) custom_url: Option<String>,
    pub(crate) country: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub(crate) published_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub(crate) thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChannelStatistics {
    pub(crate) view_count: Option<String>,
    pub(crate) subscriber_count: Option<String>,
    #[serde(default)]
    pub(crate) hidden_subscriber_count: bool,
    pub(crate) video_count: Option<String>,
}
impl ChannelStatistics {
    pub(crate) fn views(&self) -> u64 {
        count(&self.view_count)
    }

    /// `None` when the channel hides it.
    pub(crate) fn subscribers(&self) -> Option<u64> {
        (!self.hidden_subscriber_count).then(|| count(&self.subscriber_count))
    }

    pub(crate) fn videos(&self) -> u64 {
        count(&self.video_count)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChannelItem {
    #[serde(default)]
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) snippet: ChannelSnippet,
    #[serde(default)]
    pub(crate) statistics: ChannelStatistics,
    #[serde(default)]
    pub(crate) content_details: ChannelContentDetails,
}

use crate::wire::CommentResource;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A top-level comment or a reply, flattened into one list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    /// Id of the top-level comment this replies to.
    pub parent_id: Option<String>,
    pub author_name: String,
    pub author_channel_url: Option<String>,
    pub author_avatar_url: Option<String>,
    pub text_display: String,
    pub text_original: String,
    pub like_count: u64,
    #[serde(with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
    pub is_reply: bool,
}

impl Comment {
    pub(crate) fn top_level(resource: CommentResource) -> Self {
        Self::from_resource(resource, None)
    }

    pub(crate) fn reply(resource: CommentResource, thread_id: &str) -> Self {
        let parent = resource.snippet.parent_id.clone().unwrap_or_else(|| thread_id.to_string());
        Self::from_resource(resource, Some(parent))
    }

    fn from_resource(resource: CommentResource, parent_id: Option<String>) -> Self {
        let snippet = resource.snippet;
        Self {
            id: resource.id,
            is_reply: parent_id.is_some(),
            parent_id,
            author_name: snippet.author_display_name,
            author_channel_url: snippet.author_channel_url,
            author_avatar_url: snippet.author_profile_image_url,
            text_display: snippet.text_display,
            text_original: snippet.text_original,
            like_count: snippet.like_count,
            published_at: snippet.published_at,
            updated_at: snippet.updated_at,
        }
    }
}

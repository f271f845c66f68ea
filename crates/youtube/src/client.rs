//! HTTP client for the YouTube Data API v3.

use crate::error::{ErrorKind, Result};
use crate::models::{Channel, Comment, Playlist, PlaylistVideo, Video};
use crate::wire::{ChannelItem, CommentThread, ListResponse, PlaylistEntry, PlaylistItem, VideoItem};
use exn::{OptionExt, ResultExt};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use time::OffsetDateTime;
use tracing::instrument;
use tubesnap_resolver::Fetched;

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Largest `maxResults` the list endpoints accept for videos and playlist items.
const PAGE_SIZE: usize = 50;
/// Largest `maxResults` of `commentThreads`.
const THREAD_PAGE_SIZE: usize = 100;
const REPLIES_PER_THREAD: usize = 3;
const VIDEO_PARTS: &str = "snippet,statistics,contentDetails,status";
const PLAYLIST_PARTS: &str = "snippet,contentDetails,status";
/// Channel id standing for the channel of the authenticated owner. Only
/// works with an access token.
pub const MY_CHANNEL: &str = "mine";

/// How requests authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Public data only, sent as the `key` query parameter.
    ApiKey(String),
    /// OAuth access token of the owner, sent as a bearer token.
    AccessToken(String),
}

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub credentials: Credentials,
    pub timeout: Duration,
    /// Mix up to three replies per thread into comment listings.
    pub include_replies: bool,
}
impl ClientOptions {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials,
            timeout: DEFAULT_TIMEOUT,
            include_replies: true,
        }
    }
}

/// YouTube Data API client.
///
/// Cheap to clone. Every method makes one or more GET requests and maps the
/// responses into snapshot payloads; nothing is cached here.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    include_replies: bool,
}

impl Client {
    pub fn new(options: ClientOptions) -> Result<Self> {
        let base_url = options.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            exn::bail!(ErrorKind::Config("base URL must not be empty".to_string()));
        }
        let blank = match &options.credentials {
            Credentials::ApiKey(value) | Credentials::AccessToken(value) => value.trim().is_empty(),
        };
        if blank {
            exn::bail!(ErrorKind::Config("credentials must not be empty".to_string()));
        }
        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .or_raise(|| ErrorKind::Config("could not build HTTP client".to_string()))?;
        Ok(Self {
            http,
            base_url,
            credentials: options.credentials,
            include_replies: options.include_replies,
        })
    }

    /// GET `endpoint` and decode the JSON body.
    ///
    /// `subject` names what was asked for; it ends up in
    /// [`ErrorKind::NotFound`] when the API answers 404.
    async fn get<T: DeserializeOwned>(&self, endpoint: &str, subject: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{endpoint}", self.base_url);
        let request = self.http.get(&url).query(query);
        let request = match &self.credentials {
            Credentials::ApiKey(key) => request.query(&[("key", key.as_str())]),
            Credentials::AccessToken(token) => request.bearer_auth(token),
        };
        let response = request.send().await.or_raise(|| ErrorKind::Network)?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(endpoint, %status, "YouTube API request was not successful");
            exn::bail!(match status.as_u16() {
                404 => ErrorKind::NotFound(subject.to_string()),
                401 => ErrorKind::Unauthorized,
                code => ErrorKind::Status(code),
            });
        }
        response.json::<T>().await.or_raise(|| ErrorKind::InvalidResponse)
    }

    /// Details and statistics of one video.
    #[instrument(skip(self))]
    pub async fn video(&self, video_id: &str) -> Result<Video> {
        let list: ListResponse<VideoItem> = self
            .get("videos", video_id, &[("part", VIDEO_PARTS), ("id", video_id)])
            .await?;
        let item = list.items.into_iter().next().ok_or_raise(|| ErrorKind::NotFound(video_id.to_string()))?;
        Ok(Video::from_item(item, OffsetDateTime::now_utc()))
    }

    /// Up to `limit` comments of a video, most relevant threads first.
    ///
    /// With replies enabled, each page asks for half as many threads as there
    /// are comments still missing and keeps up to three replies per thread.
    /// Pages are fetched until `limit` is reached or the threads run out; only
    /// the latter marks the result exhausted.
    #[instrument(skip(self))]
    pub async fn comments(&self, video_id: &str, limit: usize) -> Result<Fetched<Vec<Comment>>> {
        let mut comments = Vec::with_capacity(limit);
        let mut page_token: Option<String> = None;
        let mut exhausted = false;
        while comments.len() < limit {
            let remaining = limit - comments.len();
            let threads = if self.include_replies { remaining / 2 } else { remaining };
            let max_results = threads.clamp(1, THREAD_PAGE_SIZE).to_string();
            let mut query = vec![
                ("part", "snippet,replies"),
                ("videoId", video_id),
                ("maxResults", max_results.as_str()),
                ("order", "relevance"),
                ("textFormat", "plainText"),
            ];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }
            let page: ListResponse<CommentThread> = self.get("commentThreads", video_id, &query).await?;
            for thread in page.items {
                let top = Comment::top_level(thread.snippet.top_level_comment);
                let thread_id = top.id.clone();
                comments.push(top);
                if self.include_replies {
                    let replies = thread.replies.comments.into_iter().take(REPLIES_PER_THREAD);
                    comments.extend(replies.map(|reply| Comment::reply(reply, &thread_id)));
                }
            }
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => {
                    exhausted = true;
                    break;
                },
            }
        }
        if comments.len() > limit {
            comments.truncate(limit);
            exhausted = false;
        }
        Ok(Fetched::new(comments, exhausted))
    }

    /// Details of one playlist.
    #[instrument(skip(self))]
    pub async fn playlist(&self, playlist_id: &str) -> Result<Playlist> {
        let list: ListResponse<PlaylistItem> = self
            .get("playlists", playlist_id, &[("part", PLAYLIST_PARTS), ("id", playlist_id)])
            .await?;
        let item = list.items.into_iter().next().ok_or_raise(|| ErrorKind::NotFound(playlist_id.to_string()))?;
        Ok(Playlist::from(item))
    }

    /// The first `limit` videos of a playlist, in playlist order.
    ///
    /// Entries whose video is no longer visible (deleted, private) are
    /// skipped, so fewer than `limit` videos may come back even though the
    /// playlist has more. Exhaustion is decided by the playlist's pages alone.
    #[instrument(skip(self))]
    pub async fn playlist_videos(&self, playlist_id: &str, limit: usize) -> Result<Fetched<Vec<PlaylistVideo>>> {
        let entries = self
            .collect(
                "playlistItems",
                playlist_id,
                &[("part", "contentDetails"), ("playlistId", playlist_id)],
                limit,
                |entry: PlaylistEntry| entry.content_details.map(|details| details.video_id),
            )
            .await?;
        let videos = self.videos_by_id(&entries.payload).await?;
        if videos.len() < entries.payload.len() {
            tracing::debug!(hidden = entries.payload.len() - videos.len(), "skipped entries without a visible video");
        }
        Ok(Fetched::new(videos, entries.exhausted))
    }

    /// Details and counters of a channel. [`MY_CHANNEL`] asks for the
    /// channel of the access token's owner.
    #[instrument(skip(self))]
    pub async fn channel(&self, channel_id: &str) -> Result<Channel> {
        let list: ListResponse<ChannelItem> = self
            .get("channels", channel_id, &[("part", "snippet,statistics"), channel_filter("id", channel_id)])
            .await?;
        let item = list.items.into_iter().next().ok_or_raise(|| ErrorKind::NotFound(channel_id.to_string()))?;
        Ok(Channel::from(item))
    }

    /// Up to `limit` playlists of a channel, as the API orders them.
    #[instrument(skip(self))]
    pub async fn channel_playlists(&self, channel_id: &str, limit: usize) -> Result<Fetched<Vec<Playlist>>> {
        self.collect(
            "playlists",
            channel_id,
            &[("part", PLAYLIST_PARTS), channel_filter("channelId", channel_id)],
            limit,
            |item: PlaylistItem| Some(Playlist::from(item)),
        )
        .await
    }

    /// The most recent `limit` uploads of a channel.
    #[instrument(skip(self))]
    pub async fn channel_videos(&self, channel_id: &str, limit: usize) -> Result<Fetched<Vec<PlaylistVideo>>> {
        let list: ListResponse<ChannelItem> = self
            .get("channels", channel_id, &[("part", "contentDetails"), channel_filter("id", channel_id)])
            .await?;
        let uploads = list
            .items
            .into_iter()
            .next()
            .and_then(|channel| channel.content_details.related_playlists.uploads)
            .ok_or_raise(|| ErrorKind::NotFound(channel_id.to_string()))?;
        tracing::debug!(uploads = %uploads, "resolved channel uploads playlist");
        self.playlist_videos(&uploads, limit).await
    }

    /// Page through a list endpoint until `limit` items are kept or the
    /// pages run out. `keep` maps each raw item, dropping those it returns
    /// `None` for; dropped items never make the result look exhausted.
    async fn collect<T, U>(
        &self,
        endpoint: &str,
        subject: &str,
        query: &[(&str, &str)],
        limit: usize,
        mut keep: impl FnMut(T) -> Option<U>,
    ) -> Result<Fetched<Vec<U>>>
    where
        T: DeserializeOwned,
    {
        let mut items = Vec::with_capacity(limit);
        let mut page_token: Option<String> = None;
        let mut exhausted = false;
        while items.len() < limit {
            let max_results = (limit - items.len()).min(PAGE_SIZE).to_string();
            let mut page_query = query.to_vec();
            page_query.push(("maxResults", max_results.as_str()));
            if let Some(token) = page_token.as_deref() {
                page_query.push(("pageToken", token));
            }
            let page: ListResponse<T> = self.get(endpoint, subject, &page_query).await?;
            items.extend(page.items.into_iter().filter_map(&mut keep));
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => {
                    exhausted = true;
                    break;
                },
            }
        }
        if items.len() > limit {
            items.truncate(limit);
            exhausted = false;
        }
        Ok(Fetched::new(items, exhausted))
    }

    /// Look up videos in batches, keeping the order of `video_ids`.
    async fn videos_by_id(&self, video_ids: &[String]) -> Result<Vec<PlaylistVideo>> {
        let mut found: HashMap<String, VideoItem> = HashMap::with_capacity(video_ids.len());
        for batch in video_ids.chunks(PAGE_SIZE) {
            let ids = batch.join(",");
            let list: ListResponse<VideoItem> = self
                .get("videos", &ids, &[("part", VIDEO_PARTS), ("id", ids.as_str())])
                .await?;
            found.extend(list.items.into_iter().map(|item| (item.id.clone(), item)));
        }
        Ok(video_ids.iter().filter_map(|id| found.remove(id)).map(PlaylistVideo::from).collect())
    }
}

/// Select the owner's own channel for [`MY_CHANNEL`], or filter by id.
fn channel_filter<'a>(parameter: &'a str, channel_id: &'a str) -> (&'a str, &'a str) {
    if channel_id == MY_CHANNEL { ("mine", "true") } else { (parameter, channel_id) }
}

//! Resource kinds served from YouTube and their upstream bindings.

use crate::client::Client;
use crate::error::Error;
use crate::models::{Channel, Comment, Playlist, PlaylistVideo, Video};
use async_trait::async_trait;
use tubesnap_resolver::upstream::{self, Fetched, Upstream};
use tubesnap_resolver::{Limit, Resource, ResourceId};

/// A single video, keyed by video id.
pub struct VideoDetails;
impl Resource for VideoDetails {
    const KIND: &'static str = "video";
    type Payload = Video;
}

/// Comments of a video, keyed by video id.
pub struct VideoComments;
impl Resource for VideoComments {
    const KIND: &'static str = "comments";
    type Payload = Vec<Comment>;
}

/// Playlist details, keyed by playlist id.
pub struct PlaylistDetails;
impl Resource for PlaylistDetails {
    const KIND: &'static str = "playlist";
    type Payload = Playlist;
}

/// Videos in a playlist, keyed by playlist id.
pub struct PlaylistVideos;
impl Resource for PlaylistVideos {
    const KIND: &'static str = "playlist-videos";
    type Payload = Vec<PlaylistVideo>;
}

/// Uploads of a channel, keyed by channel id.
pub struct ChannelVideos;
impl Resource for ChannelVideos {
    const KIND: &'static str = "channel-videos";
    type Payload = Vec<PlaylistVideo>;
}

/// Channel details and counters, keyed by channel id or `mine`.
pub struct ChannelOverview;
impl Resource for ChannelOverview {
    const KIND: &'static str = "channel";
    type Payload = Channel;
}

/// Playlists of a channel, keyed by channel id or `mine`.
pub struct ChannelPlaylists;
impl Resource for ChannelPlaylists {
    const KIND: &'static str = "channel-playlists";
    type Payload = Vec<Playlist>;
}

fn into_upstream_error(err: Error) -> upstream::Error {
    let kind = err.upstream();
    err.raise(kind)
}

#[async_trait]
impl Upstream<VideoDetails> for Client {
    async fn fetch(&self, resource_id: &ResourceId, _limit: Limit) -> upstream::Result<Fetched<Video>> {
        let video = self.video(resource_id.as_str()).await.map_err(into_upstream_error)?;
        Ok(Fetched::complete(video))
    }
}

#[async_trait]
impl Upstream<VideoComments> for Client {
    async fn fetch(&self, resource_id: &ResourceId, limit: Limit) -> upstream::Result<Fetched<Vec<Comment>>> {
        self.comments(resource_id.as_str(), limit.as_usize()).await.map_err(into_upstream_error)
    }
}

#[async_trait]
impl Upstream<PlaylistDetails> for Client {
    async fn fetch(&self, resource_id: &ResourceId, _limit: Limit) -> upstream::Result<Fetched<Playlist>> {
        let playlist = self.playlist(resource_id.as_str()).await.map_err(into_upstream_error)?;
        Ok(Fetched::complete(playlist))
    }
}

#[async_trait]
impl Upstream<PlaylistVideos> for Client {
    async fn fetch(&self, resource_id: &ResourceId, limit: Limit) -> upstream::Result<Fetched<Vec<PlaylistVideo>>> {
        self.playlist_videos(resource_id.as_str(), limit.as_usize()).await.map_err(into_upstream_error)
    }
}

#[async_trait]
impl Upstream<ChannelVideos> for Client {
    async fn fetch(&self, resource_id: &ResourceId, limit: Limit) -> upstream::Result<Fetched<Vec<PlaylistVideo>>> {
        self.channel_videos(resource_id.as_str(), limit.as_usize()).await.map_err(into_upstream_error)
    }
}

#[async_trait]
impl Upstream<ChannelOverview> for Client {
    async fn fetch(&self, resource_id: &ResourceId, _limit: Limit) -> upstream::Result<Fetched<Channel>> {
        let channel = self.channel(resource_id.as_str()).await.map_err(into_upstream_error)?;
        Ok(Fetched::complete(channel))
    }
}

#[async_trait]
impl Upstream<ChannelPlaylists> for Client {
    async fn fetch(&self, resource_id: &ResourceId, limit: Limit) -> upstream::Result<Fetched<Vec<Playlist>>> {
        self.channel_playlists(resource_id.as_str(), limit.as_usize()).await.map_err(into_upstream_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientOptions, Credentials};
    use mockito::{Matcher, Server};
    use std::sync::Arc;
    use tubesnap_resolver::error::ErrorKind;
    use tubesnap_resolver::mock::MemoryStore;
    use tubesnap_resolver::{Resolver, SnapshotStore, Source};

    fn resolver<R: Resource>(client: &Client, store: &Arc<MemoryStore>) -> Resolver<R>
    where
        Client: Upstream<R>,
    {
        Resolver::new(Arc::new(client.clone()) as Arc<dyn Upstream<R>>, store.clone() as Arc<dyn SnapshotStore>)
    }

    fn client(url: String) -> Client {
        Client::new(ClientOptions { base_url: url, ..ClientOptions::new(Credentials::ApiKey("k".to_string())) }).unwrap()
    }

    #[tokio::test]
    async fn test_video_resolves_then_caches() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/videos")
            .match_query(Matcher::UrlEncoded("id".to_string(), "V1".to_string()))
            .with_body(r#"{"items": [{"id": "V1", "snippet": {"title": "Teatime"}}]}"#)
            .expect(1)
            .create_async()
            .await;
        let store = Arc::new(MemoryStore::default());
        let videos = resolver::<VideoDetails>(&client(server.url()), &store);

        let first = videos.read(Some("U1"), "V1", false, None).await.unwrap();
        let second = videos.read(Some("U1"), "V1", false, None).await.unwrap();
        assert_eq!(first.source, Source::Upstream);
        assert_eq!(second.source, Source::Cache);
        assert_eq!(second.payload.title, "Teatime");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_comment_limit_reaches_upstream() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/commentThreads")
            .match_query(Matcher::UrlEncoded("maxResults".to_string(), "5".to_string()))
            .with_body(r#"{"items": []}"#)
            .create_async()
            .await;
        let store = Arc::new(MemoryStore::default());
        let comments = resolver::<VideoComments>(&client(server.url()), &store);

        let resolved = comments.read(Some("U1"), "V1", false, Some(10)).await.unwrap();
        assert_eq!(resolved.count, 0);
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test]
    async fn test_error_kinds_reach_the_resolver() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/playlists")
            .match_query(Matcher::UrlEncoded("id".to_string(), "gone".to_string()))
            .with_status(404)
            .create_async()
            .await;
        server
            .mock("GET", "/playlists")
            .match_query(Matcher::UrlEncoded("id".to_string(), "broken".to_string()))
            .with_status(503)
            .create_async()
            .await;
        let store = Arc::new(MemoryStore::default());
        let playlists = resolver::<PlaylistDetails>(&client(server.url()), &store);

        let err = playlists.read(Some("U1"), "gone", false, None).await.unwrap_err();
        assert_eq!(*err, ErrorKind::NotFound("gone".to_string()));
        let err = playlists.read(Some("U1"), "broken", false, None).await.unwrap_err();
        assert_eq!(*err, ErrorKind::UpstreamUnavailable);
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_short_playlist_page_is_refetched_for_larger_limit() {
        let mut server = Server::new_async().await;
        let entries = |ids: &[&str]| {
            let items: Vec<_> = ids.iter().map(|id| format!(r#"{{"contentDetails": {{"videoId": "{id}"}}}}"#)).collect();
            items.join(",")
        };
        let first_page = server
            .mock("GET", "/playlistItems")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("playlistId".to_string(), "PL1".to_string()),
                Matcher::UrlEncoded("maxResults".to_string(), "3".to_string()),
            ]))
            .with_body(format!(r#"{{"items": [{}], "nextPageToken": "p2"}}"#, entries(&["a", "b", "c"])))
            .expect(1)
            .create_async()
            .await;
        server
            .mock("GET", "/videos")
            .match_query(Matcher::UrlEncoded("id".to_string(), "a,b,c".to_string()))
            .with_body(r#"{"items": [{"id": "a"}, {"id": "c"}]}"#)
            .create_async()
            .await;
        let store = Arc::new(MemoryStore::default());
        let videos = resolver::<PlaylistVideos>(&client(server.url()), &store);

        let small = videos.read(Some("U1"), "PL1", false, Some(3)).await.unwrap();
        assert_eq!(small.source, Source::Upstream);
        assert_eq!(small.count, 2);
        first_page.assert_async().await;

        let ten_entries = server
            .mock("GET", "/playlistItems")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("playlistId".to_string(), "PL1".to_string()),
                Matcher::UrlEncoded("maxResults".to_string(), "10".to_string()),
            ]))
            .with_body(format!(r#"{{"items": [{}]}}"#, entries(&["a", "b", "c", "d"])))
            .expect(1)
            .create_async()
            .await;
        server
            .mock("GET", "/videos")
            .match_query(Matcher::UrlEncoded("id".to_string(), "a,b,c,d".to_string()))
            .with_body(r#"{"items": [{"id": "a"}, {"id": "c"}, {"id": "d"}]}"#)
            .create_async()
            .await;

        let large = videos.read(Some("U1"), "PL1", false, Some(10)).await.unwrap();
        assert_eq!(large.source, Source::Upstream);
        assert_eq!(large.count, 3);
        ten_entries.assert_async().await;

        // The playlist ended on that page, so any limit is served from cache now.
        let again = videos.read(Some("U1"), "PL1", false, Some(50)).await.unwrap();
        assert_eq!(again.source, Source::Cache);
        assert_eq!(store.writes(), 2);
    }

    #[tokio::test]
    async fn test_own_channel_overview_is_cached_per_owner() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/channels")
            .match_query(Matcher::UrlEncoded("mine".to_string(), "true".to_string()))
            .with_body(r#"{"items": [{"id": "UC1", "snippet": {"title": "Kitchen"}, "statistics": {"subscriberCount": "7"}}]}"#)
            .expect(2)
            .create_async()
            .await;
        let store = Arc::new(MemoryStore::default());
        let channels = resolver::<ChannelOverview>(&client(server.url()), &store);

        let first = channels.read(Some("U1"), "mine", false, None).await.unwrap();
        assert_eq!(first.payload.subscriber_count, Some(7));
        let cached = channels.read(Some("U1"), "mine", false, None).await.unwrap();
        assert_eq!(cached.source, Source::Cache);
        let other_owner = channels.read(Some("U2"), "mine", false, None).await.unwrap();
        assert_eq!(other_owner.source, Source::Upstream);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_channel_playlists_respect_the_limit() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/playlists")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("channelId".to_string(), "UC1".to_string()),
                Matcher::UrlEncoded("maxResults".to_string(), "2".to_string()),
            ]))
            .with_body(r#"{"items": [{"id": "PL1"}, {"id": "PL2"}], "nextPageToken": "p2"}"#)
            .create_async()
            .await;
        let store = Arc::new(MemoryStore::default());
        let playlists = resolver::<ChannelPlaylists>(&client(server.url()), &store);

        let resolved = playlists.read(Some("U1"), "UC1", false, Some(2)).await.unwrap();
        assert_eq!(resolved.count, 2);
        assert_eq!(resolved.payload[1].id, "PL2");
        let cached = playlists.read(Some("U1"), "UC1", false, Some(1)).await.unwrap();
        assert_eq!(cached.source, Source::Cache);
        assert_eq!(cached.count, 1);
    }

    #[test]
    fn test_kinds_are_distinct() {
        let kinds = [
            VideoDetails::KIND,
            VideoComments::KIND,
            PlaylistDetails::KIND,
            PlaylistVideos::KIND,
            ChannelVideos::KIND,
            ChannelOverview::KIND,
            ChannelPlaylists::KIND,
        ];
        let unique: std::collections::BTreeSet<_> = kinds.iter().collect();
        assert_eq!(unique.len(), kinds.len());
    }
}

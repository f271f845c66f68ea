use crate::duration::round2;
use crate::models::PlaylistVideo;
use serde::Serialize;

/// The video that leads one of the rankings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopVideo {
    pub video_id: String,
    pub title: String,
    pub count: u64,
}

/// Totals over a list of playlist entries.
///
/// Computed from a snapshot on every read, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistAnalytics {
    pub video_count: usize,
    pub total_views: u64,
    pub total_likes: u64,
    pub total_comments: u64,
    pub average_views: f64,
    pub top_by_views: Option<TopVideo>,
    pub top_by_likes: Option<TopVideo>,
}

impl PlaylistAnalytics {
    pub fn from_videos(videos: &[PlaylistVideo]) -> Self {
        let total_views = videos.iter().map(|video| video.view_count).sum::<u64>();
        let average_views = match videos.len() {
            0 => 0.0,
            count => round2(total_views as f64 / count as f64),
        };
        Self {
            video_count: videos.len(),
            total_views,
            total_likes: videos.iter().map(|video| video.like_count).sum(),
            total_comments: videos.iter().map(|video| video.comment_count).sum(),
            average_views,
            top_by_views: top_by(videos, |video| video.view_count),
            top_by_likes: top_by(videos, |video| video.like_count),
        }
    }
}

/// First video with the highest count; ties go to the earlier entry.
fn top_by(videos: &[PlaylistVideo], count: impl Fn(&PlaylistVideo) -> u64) -> Option<TopVideo> {
    let mut best: Option<&PlaylistVideo> = None;
    for video in videos {
        if best.is_none_or(|current| count(video) > count(current)) {
            best = Some(video);
        }
    }
    best.map(|video| TopVideo {
        video_id: video.video_id.clone(),
        title: video.title.clone(),
        count: count(video),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: &str, views: u64, likes: u64) -> PlaylistVideo {
        PlaylistVideo {
            video_id: id.to_string(),
            title: format!("Video {id}"),
            description: String::new(),
            thumbnail_url: None,
            published_at: None,
            duration: None,
            duration_seconds: None,
            view_count: views,
            like_count: likes,
            comment_count: 1,
            privacy_status: None,
            url: String::new(),
        }
    }

    #[test]
    fn test_empty() {
        let analytics = PlaylistAnalytics::from_videos(&[]);
        assert_eq!(analytics.video_count, 0);
        assert_eq!(analytics.average_views, 0.0);
        assert_eq!(analytics.top_by_views, None);
    }

    #[test]
    fn test_totals_and_rankings() {
        let analytics = PlaylistAnalytics::from_videos(&[video("a", 10, 9), video("b", 30, 1), video("c", 30, 9)]);
        assert_eq!(analytics.video_count, 3);
        assert_eq!(analytics.total_views, 70);
        assert_eq!(analytics.total_likes, 19);
        assert_eq!(analytics.total_comments, 3);
        assert_eq!(analytics.average_views, 23.33);
        assert_eq!(analytics.top_by_views.unwrap().video_id, "b");
        assert_eq!(analytics.top_by_likes.unwrap().video_id, "a");
    }
}

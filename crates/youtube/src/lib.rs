//! YouTube Data API v3 upstream for the snapshot resolver.
//!
//! [`Client`] talks to the API and turns its responses into the payload
//! types in [`models`]. The marker types in this crate's root name each
//! resource kind and bind it to the matching client call, so a
//! `Resolver<VideoComments>` can be built straight from a `Client`.

mod client;
mod duration;
pub mod error;
pub mod models;
mod resources;
mod wire;

pub use crate::client::{Client, ClientOptions, Credentials, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, MY_CHANNEL};
pub use crate::duration::parse_seconds;
pub use crate::resources::{
    ChannelOverview, ChannelPlaylists, ChannelVideos, PlaylistDetails, PlaylistVideos, VideoComments, VideoDetails,
};

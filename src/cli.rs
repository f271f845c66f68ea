use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tubesnap_resolver::Resource;
use tubesnap_youtube::{
    ChannelOverview, ChannelPlaylists, ChannelVideos, PlaylistDetails, PlaylistVideos, VideoComments, VideoDetails,
};

#[derive(Debug, Parser)]
#[command(name = "tubesnap", version, about = "Read YouTube resources through a per-owner snapshot cache")]
pub struct Cli {
    /// Config file (TOML, YAML or JSON).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Account the snapshots belong to.
    #[arg(long, global = true, env = "TUBESNAP_OWNER")]
    pub owner: Option<String>,
    /// Snapshot database, overriding `database.path`.
    #[arg(long, global = true, value_name = "FILE")]
    pub database: Option<PathBuf>,
    /// More log output on stderr; repeat for more. `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Details and statistics of a video.
    Video(ReadArgs),
    /// Comments of a video, replies included.
    Comments(CollectionArgs),
    /// Details of a playlist.
    Playlist(ReadArgs),
    /// Videos in a playlist.
    PlaylistVideos {
        #[command(flatten)]
        read: CollectionArgs,
        /// Add totals, averages and the top videos.
        #[arg(long)]
        analytics: bool,
    },
    /// Details and counters of a channel; `mine` for the owner's own.
    Channel(ReadArgs),
    /// Uploads of a channel.
    ChannelVideos(CollectionArgs),
    /// Playlists of a channel; `mine` for the owner's own.
    ChannelPlaylists(CollectionArgs),
    /// List the cached snapshots of the owner.
    Snapshots,
    /// Delete one cached snapshot of the owner.
    Forget {
        kind: Kind,
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct ReadArgs {
    /// Resource id.
    pub id: String,
    /// Skip the cache and fetch from YouTube.
    #[arg(long)]
    pub refresh: bool,
}

#[derive(Debug, Args)]
pub struct CollectionArgs {
    #[command(flatten)]
    pub read: ReadArgs,
    /// Maximum number of items.
    #[arg(long)]
    pub limit: Option<u32>,
}

/// Resource kinds as named on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    Video,
    Comments,
    Playlist,
    PlaylistVideos,
    Channel,
    ChannelVideos,
    ChannelPlaylists,
}
impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Video => VideoDetails::KIND,
            Self::Comments => VideoComments::KIND,
            Self::Playlist => PlaylistDetails::KIND,
            Self::PlaylistVideos => PlaylistVideos::KIND,
            Self::Channel => ChannelOverview::KIND,
            Self::ChannelVideos => ChannelVideos::KIND,
            Self::ChannelPlaylists => ChannelPlaylists::KIND,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    #[test]
    fn test_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_collection() {
        let cli = Cli::try_parse_from(["tubesnap", "comments", "V1", "--limit", "10", "--refresh", "--owner", "U1"]).unwrap();
        assert_eq!(cli.owner.as_deref(), Some("U1"));
        let Command::Comments(args) = cli.command else {
            panic!("expected comments");
        };
        assert_eq!(args.read.id, "V1");
        assert!(args.read.refresh);
        assert_eq!(args.limit, Some(10));
    }

    #[test]
    fn test_parse_forget() {
        let cli = Cli::try_parse_from(["tubesnap", "-vv", "forget", "playlist-videos", "PL1"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Forget { kind: Kind::PlaylistVideos, .. }));
    }

    #[test]
    fn test_parse_channel_playlists() {
        let cli = Cli::try_parse_from(["tubesnap", "channel-playlists", "mine", "--limit", "5"]).unwrap();
        let Command::ChannelPlaylists(args) = cli.command else {
            panic!("expected channel-playlists");
        };
        assert_eq!(args.read.id, "mine");
        assert_eq!(args.limit, Some(5));
    }

    #[rstest]
    #[case(Kind::Video, "video")]
    #[case(Kind::Comments, "comments")]
    #[case(Kind::Playlist, "playlist")]
    #[case(Kind::PlaylistVideos, "playlist-videos")]
    #[case(Kind::Channel, "channel")]
    #[case(Kind::ChannelVideos, "channel-videos")]
    #[case(Kind::ChannelPlaylists, "channel-playlists")]
    fn test_kind_names_match_resources(#[case] kind: Kind, #[case] expected: &str) {
        assert_eq!(kind.as_str(), expected);
        // The command line spelling is the stored spelling.
        assert_eq!(kind.to_possible_value().unwrap().get_name(), expected);
    }
}

use crate::cli::{Cli, CollectionArgs, Command, ReadArgs};
use miette::{IntoDiagnostic, Report};
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;
use std::sync::Arc;
use time::OffsetDateTime;
use tubesnap_cache::{Database, Repository};
use tubesnap_config::Config;
use tubesnap_resolver::{
    Limits, OwnerId, Request, Resolved, Resolver, Resource, ResourceId, SnapshotKey, SnapshotStore, StoreHandle,
    StoredSnapshot, Upstream,
};
use tubesnap_youtube::models::PlaylistAnalytics;
use tubesnap_youtube::{
    ChannelOverview, ChannelPlaylists, ChannelVideos, Client, PlaylistDetails, PlaylistVideos, VideoComments,
    VideoDetails,
};

/// Load config, open the database and run the command. Returns the JSON
/// document to print.
pub async fn run(cli: &Cli) -> miette::Result<String> {
    let config = Config::load(cli.config.as_deref())
        .map_err(|err| report(&err, Some("check the config file and the TUBESNAP_* environment variables")))?;
    let path = cli.database.clone().unwrap_or_else(|| config.database.path.clone());
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).into_diagnostic()?;
    }
    let database = Database::connect(&path).await.map_err(|err| report(&err, None))?;
    let store: StoreHandle = Arc::new(Repository::from(&database));
    let owner = cli.owner.clone().or_else(|| config.owner.clone());

    let context = Context::new(config, owner, store)?;
    let output = context.execute(&cli.command).await;
    database.close().await;
    serde_json::to_string_pretty(&output?).into_diagnostic()
}

/// Everything a command needs, independent of where the store lives.
pub struct Context {
    config: Config,
    owner: Option<String>,
    store: StoreHandle,
    limits: Limits,
}

#[derive(Serialize)]
struct WithAnalytics<T> {
    #[serde(flatten)]
    resolved: T,
    analytics: PlaylistAnalytics,
}

#[derive(Serialize)]
struct SnapshotSummary {
    kind: String,
    resource_id: String,
    item_count: Option<u32>,
    fetch_limit: u32,
    exhausted: bool,
    #[serde(with = "time::serde::rfc3339")]
    last_fetched_at: OffsetDateTime,
}
impl From<StoredSnapshot> for SnapshotSummary {
    fn from(snapshot: StoredSnapshot) -> Self {
        Self {
            kind: snapshot.key.kind,
            resource_id: snapshot.key.resource_id.as_str().to_string(),
            item_count: snapshot.item_count,
            fetch_limit: snapshot.fetch_limit,
            exhausted: snapshot.exhausted,
            last_fetched_at: snapshot.last_fetched_at,
        }
    }
}

impl Context {
    pub fn new(config: Config, owner: Option<String>, store: StoreHandle) -> miette::Result<Self> {
        let limits = config.limits().map_err(|err| report(&err, None))?;
        Ok(Self { config, owner, store, limits })
    }

    pub async fn execute(&self, command: &Command) -> miette::Result<Value> {
        match command {
            Command::Video(args) => to_value(self.read::<VideoDetails>(args, None).await?),
            Command::Comments(CollectionArgs { read, limit }) => {
                to_value(self.read::<VideoComments>(read, *limit).await?)
            },
            Command::Playlist(args) => to_value(self.read::<PlaylistDetails>(args, None).await?),
            Command::PlaylistVideos { read: CollectionArgs { read, limit }, analytics } => {
                let resolved = self.read::<PlaylistVideos>(read, *limit).await?;
                if !*analytics {
                    return to_value(resolved);
                }
                let analytics = PlaylistAnalytics::from_videos(&resolved.payload);
                to_value(WithAnalytics { resolved, analytics })
            },
            Command::Channel(args) => to_value(self.read::<ChannelOverview>(args, None).await?),
            Command::ChannelVideos(CollectionArgs { read, limit }) => {
                to_value(self.read::<ChannelVideos>(read, *limit).await?)
            },
            Command::ChannelPlaylists(CollectionArgs { read, limit }) => {
                to_value(self.read::<ChannelPlaylists>(read, *limit).await?)
            },
            Command::Snapshots => {
                let owner = self.owner()?;
                let snapshots = self.store.list(&owner).await.map_err(|err| report(&err, None))?;
                to_value(snapshots.into_iter().map(SnapshotSummary::from).collect::<Vec<_>>())
            },
            Command::Forget { kind, id } => {
                let owner = self.owner()?;
                let resource_id = ResourceId::parse(id).map_err(|err| report(&err, None))?;
                let key = SnapshotKey::new(owner, kind.as_str(), resource_id);
                let deleted = self.store.delete(&key).await.map_err(|err| report(&err, None))?;
                tracing::info!(kind = %key.kind, resource_id = %key.resource_id, deleted, "forget");
                Ok(serde_json::json!({ "deleted": deleted }))
            },
        }
    }

    fn owner(&self) -> miette::Result<OwnerId> {
        OwnerId::parse(self.owner.as_deref()).map_err(|err| resolve_error(&err))
    }

    /// Validate first so bad input is rejected before credentials are even
    /// looked at.
    async fn read<R>(&self, args: &ReadArgs, limit: Option<u32>) -> miette::Result<Resolved<R::Payload>>
    where
        R: Resource,
        Client: Upstream<R>,
    {
        let request = Request::new(self.owner.as_deref(), &args.id, args.refresh, limit, &self.limits)
            .map_err(|err| resolve_error(&err))?;
        let resolver = Resolver::<R>::new(self.client()?, self.store.clone()).with_limits(self.limits);
        resolver.resolve(&request).await.map_err(|err| resolve_error(&err))
    }

    fn client(&self) -> miette::Result<Arc<Client>> {
        let options = self
            .config
            .client_options()
            .map_err(|err| report(&err, Some("set youtube.api_key or TUBESNAP_YOUTUBE__API_KEY")))?;
        let client = Client::new(options).map_err(|err| report(&err, None))?;
        Ok(Arc::new(client))
    }
}

fn to_value(value: impl Serialize) -> miette::Result<Value> {
    serde_json::to_value(value).into_diagnostic()
}

fn resolve_error(err: &tubesnap_resolver::error::Error) -> Report {
    use tubesnap_resolver::error::ErrorKind;
    let help = match &**err {
        ErrorKind::NotAuthenticated => Some("pass --owner or set TUBESNAP_OWNER"),
        ErrorKind::UpstreamUnavailable => Some("the cached snapshot is unchanged; try again later"),
        ErrorKind::Store => Some("run `tubesnap forget` on the resource, or delete the snapshot database"),
        ErrorKind::InvalidRequest(_) | ErrorKind::NotFound(_) => None,
    };
    report(err, help)
}

fn report<E>(err: &E, help: Option<&str>) -> Report
where
    E: std::ops::Deref + std::fmt::Debug,
    E::Target: Display,
{
    tracing::debug!(error = ?err, "command failed");
    let message = err.deref().to_string();
    match help {
        Some(help) => miette::miette!(help = help, "{message}"),
        None => miette::miette!("{message}"),
    }
}

use std::path::Path;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use transrpc_client::ClientConfig;
use transrpc_types::{RpcError, TorrentId, TorrentSelector};

/// Selects recently active torrents instead of explicit ids.
const RECENT: &str = "recent";

/// Errors surfaced by the command-line front end.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// The RPC call or the client setup failed.
    #[error(transparent)]
    Rpc(#[from] RpcError),

    /// An argument could not be interpreted.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Top-level CLI struct for the binary.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub(crate) struct Cli {
    /// Connection settings; unset flags fall back to the environment.
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Flags that override `TRANSMISSION_*` environment variables.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct ConnectionArgs {
    /// RPC endpoint.
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Username for basic authentication.
    #[arg(long, global = true, requires = "password")]
    pub username: Option<String>,

    /// Password for basic authentication.
    #[arg(long, global = true, requires = "username")]
    pub password: Option<String>,
}

impl ConnectionArgs {
    /// Applies the flags on top of `config`.
    pub(crate) fn apply(self, mut config: ClientConfig) -> Result<ClientConfig, CliError> {
        if let Some(url) = self.url {
            config.url = url;
        }
        if let (Some(username), Some(password)) = (self.username, self.password) {
            config = config.with_credentials(username, password)?;
        }
        Ok(config)
    }
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// List torrents with their status and progress.
    List(Selection),
    /// Show transfer statistics.
    Stats,
    /// Show session settings.
    Session,
    /// Start torrents.
    Start(Selection),
    /// Stop torrents.
    Stop(Selection),
    /// Verify local data of torrents.
    Verify(Selection),
    /// Announce torrents to their trackers now.
    Reannounce(Selection),
    /// Add a torrent from a local `.torrent` file, a URL or a magnet link.
    Add {
        /// File path, URL or magnet link.
        source: String,
        /// Where to store the data.
        #[arg(long)]
        download_dir: Option<String>,
        /// Add without starting.
        #[arg(long)]
        paused: bool,
    },
    /// Remove torrents.
    Remove {
        /// Which torrents.
        #[command(flatten)]
        selection: Selection,
        /// Also delete downloaded data.
        #[arg(long)]
        delete_data: bool,
    },
}

/// Torrent ids: numeric local ids or 40 character hashes. `recent` selects recently active
/// torrents; no ids selects every torrent.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct Selection {
    /// Torrent ids.
    pub ids: Vec<String>,
}

impl Selection {
    /// The selector these ids describe.
    pub(crate) fn selector(&self) -> Result<TorrentSelector, CliError> {
        match self.ids.as_slice() {
            [] => Ok(TorrentSelector::All),
            [only] if only == RECENT => Ok(TorrentSelector::RecentlyActive),
            ids => ids
                .iter()
                .map(|id| {
                    id.parse::<TorrentId>()
                        .map_err(|e| CliError::InvalidArgument(format!("{id}: {e}")))
                })
                .collect(),
        }
    }
}

/// Whether `source` names a local file rather than something the daemon fetches.
pub(crate) fn is_local_file(source: &str) -> bool {
    !source.contains("://") && !source.starts_with("magnet:") && Path::new(source).is_file()
}

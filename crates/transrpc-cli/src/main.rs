//! # Transmission RPC command line
//!
//! ## Usage
//!
//! ```sh,ignore
//! transrpc --url http://localhost:9091/transmission/rpc list
//! transrpc add 'magnet:?xt=urn:btih:...' --paused
//! transrpc remove 3 7 --delete-data
//! ```
//!
//! Connection settings come from `TRANSMISSION_RPC_URL`, `TRANSMISSION_USERNAME`,
//! `TRANSMISSION_PASSWORD` and `TRANSMISSION_TIMEOUT_SECS` (a `.env` file is honoured) and
//! can be overridden with flags.

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;
use transrpc_client::requests::AddTorrent;
use transrpc_client::{ClientConfig, TransmissionClient};
use transrpc_types::{FieldRecord, TorrentFields, TorrentRecord};

mod cli;

use cli::{Cli, CliError, Command, is_local_file};

/// Initializes the tracing subscriber.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn list_line(torrent: &TorrentRecord) -> String {
    let id = torrent.id.get().map_or_else(|| "?".to_owned(), u32::to_string);
    let status = torrent
        .status
        .get()
        .map_or_else(|| "?".to_owned(), ToString::to_string);
    let done = torrent.percent_done.get().copied().unwrap_or_default() * 100.0;
    let name = torrent.name.get().map_or("", String::as_str);
    format!("{id:>5}  {status:<18}  {done:>5.1}%  {name}")
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = cli.connection.apply(ClientConfig::from_env()?)?;
    let client = TransmissionClient::try_new(&config)?;
    debug!("Running {:?} against {}", cli.command, client.url());

    match cli.command {
        Command::List(selection) => {
            let fields = [
                TorrentFields::ID.id(),
                TorrentFields::NAME.id(),
                TorrentFields::STATUS.id(),
                TorrentFields::PERCENT_DONE.id(),
            ];
            let torrents = client.get_torrents(selection.selector()?, &fields).await?;
            for torrent in &torrents {
                println!("{}", list_line(torrent));
            }
        }
        Command::Stats => {
            let stats = client.session_stats().await?;
            println!(
                "{} torrents ({} active, {} paused)",
                stats.torrent_count, stats.active_torrent_count, stats.paused_torrent_count
            );
            println!(
                "down {} / up {}",
                stats.download_speed, stats.upload_speed
            );
            println!(
                "this session: {} down, {} up",
                stats.current.downloaded_bytes, stats.current.uploaded_bytes
            );
            println!(
                "all time: {} down, {} up over {} sessions",
                stats.cumulative.downloaded_bytes,
                stats.cumulative.uploaded_bytes,
                stats.cumulative.session_count
            );
        }
        Command::Session => {
            let session = client.get_session(&[]).await?;
            debug!("Session reported {} fields", session.present_fields().len());
            println!("{session:#}");
        }
        Command::Start(selection) => client.start(selection.selector()?).await?,
        Command::Stop(selection) => client.stop(selection.selector()?).await?,
        Command::Verify(selection) => client.verify(selection.selector()?).await?,
        Command::Reannounce(selection) => client.reannounce(selection.selector()?).await?,
        Command::Add {
            source,
            download_dir,
            paused,
        } => {
            let mut request = if is_local_file(&source) {
                AddTorrent::from_file(&source)?
            } else {
                AddTorrent::from_url(source)?
            };
            request.download_dir = download_dir;
            request.paused = paused.then_some(true);
            let added = client.add_torrent(&request).await?;
            let verb = if added.is_duplicate {
                "Already present"
            } else {
                "Added"
            };
            println!("{verb}: {} {} ({})", added.id, added.name, added.hash_string);
        }
        Command::Remove {
            selection,
            delete_data,
        } => {
            client
                .remove_torrents(selection.selector()?, delete_data)
                .await?
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    init_tracing();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

//! # Transmission RPC client.
//!
//! A typed async client for the JSON-over-HTTP RPC protocol of the Transmission BitTorrent
//! daemon. It takes care of the CSRF session-id handshake and basic authentication, and
//! exposes every method as a typed request from [`requests`].
//!
//! usage:
//!
//! ```rust,ignore
//! use transrpc_client::{ClientConfig, TransmissionClient};
//! use transrpc_client::requests::AddTorrent;
//! use transrpc_types::{TorrentFields, TorrentSelector};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TransmissionClient::try_new(&ClientConfig::from_env()?)?;
//!     let added = client
//!         .add_torrent(&AddTorrent::from_file("path/to/file.torrent")?)
//!         .await?;
//!     println!("Added torrent: {added:?}");
//!
//!     let fields = [TorrentFields::NAME.id(), TorrentFields::PERCENT_DONE.id()];
//!     for torrent in client.get_torrents(TorrentSelector::All, &fields).await? {
//!         println!("{torrent}");
//!     }
//!     Ok(())
//! }
//! ```

#[cfg(test)]
use {httpmock as _, libc as _};

mod client;
mod config;
mod envelope;
pub mod requests;
mod transport;

#[cfg(test)]
mod testutil;

pub use client::TransmissionClient;
pub use config::{ClientConfig, Credentials, DEFAULT_RPC_URL, DEFAULT_TIMEOUT};
pub use transport::{HttpRequest, HttpResponse, HttpSend, ReqwestSender, SESSION_ID_HEADER};

//! The request catalog.
//!
//! Every RPC method is a plain value implementing [`RpcMethod`]: it serializes to the method's
//! `arguments` object and names the type its response `arguments` decode into. The
//! [`TransmissionClient`](crate::TransmissionClient) methods build these for you; they are
//! public so that callers can also send them through
//! [`TransmissionClient::call`](crate::TransmissionClient::call).

use serde::{Deserialize, Serialize, de::DeserializeOwned};

mod group;
mod queue;
mod session;
mod torrent;

pub use group::{GetGroups, GroupList, SetGroup};
pub use queue::{QueueMove, QueueMoveRequest};
pub use session::{
    BlocklistSize, BlocklistUpdate, CloseSession, FreeSpace, FreeSpaceResult, GetSession,
    GetSessionStats, PortTest, PortTestResult, SetSession,
};
pub use torrent::{
    AddTorrent, AddedTorrent, GetTorrents, RemoveTorrents, RenamePath, RenamedPath, SetLocation,
    SetTorrents, TorrentAction, TorrentActionRequest, TorrentList, TorrentMutation,
};

/// One RPC method: its name, its arguments (`Self`) and its response type.
pub trait RpcMethod: Serialize {
    /// What the response `arguments` object decodes into.
    type Response: DeserializeOwned;

    /// Whether the request carries an `arguments` object at all.
    const TAKES_ARGUMENTS: bool = true;

    /// The `method` string sent on the wire.
    fn method(&self) -> &'static str;
}

/// Response of methods that return nothing. Any `arguments` content is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct NoArguments {}

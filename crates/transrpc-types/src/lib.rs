//! # Transmission RPC types
//!
//! Value types shared by the Transmission RPC client: the present/absent [`Optional`] box,
//! torrent identities and selectors, the sparse torrent and session field records, and the
//! wire codecs the daemon uses for timestamps, speeds, bitsets and enumerations.
//!
//! ```rust,ignore
//! use transrpc_types::{TorrentFields, TorrentId, TorrentSelector};
//!
//! let selector = TorrentSelector::from(vec![
//!     TorrentId::local(7),
//!     TorrentId::hash("a".repeat(40)).unwrap(),
//! ]);
//! let fields = [TorrentFields::NAME.id(), TorrentFields::STATUS.id()];
//! # let _ = (selector, fields);
//! ```

#[cfg(test)]
use {proptest as _, serde_json as _};

mod bandwidth;
mod bitset;
pub mod codec;
mod enums;
mod error;
mod field;
mod id;
mod optional;
mod session;
mod torrent;
mod units;

pub use bandwidth::BandwidthGroup;
pub use bitset::Bitset;
pub use enums::{
    Availability, Encryption, IdleMode, IpProtocol, Priority, RatioMode, TorrentErrorKind,
    TorrentStatus, TrackerState,
};
pub use error::{AuthFailure, RpcError, RpcResult};
pub use field::{Field, FieldId, FieldRecord, wire_keys};
pub use id::{InfoHash, TorrentId, TorrentSelector};
pub use optional::Optional;
pub use session::{SessionFields, SessionRecord, SessionStats, SpeedSchedule, StatsDetails};
pub use torrent::{
    FileStats, Peer, PeersFrom, TorrentFields, TorrentFile, TorrentRecord, Tracker, TrackerStats,
};
pub use units::{ByteCount, Speed};

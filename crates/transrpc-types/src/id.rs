//! Torrent identities and the selectors used to address torrents.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer, ser};

use crate::error::{RpcError, RpcResult};

/// Length of a hex-encoded SHA-1 info hash.
const INFO_HASH_LEN: usize = 40;

/// Wire value for [`TorrentSelector::RecentlyActive`].
const RECENTLY_ACTIVE: &str = "recently-active";

/// A 40 character hex SHA-1 info hash. Stable across daemon restarts.
///
/// Validated on construction; either hex case is accepted and kept as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InfoHash(String);

impl InfoHash {
    /// Validates and wraps a hex info hash.
    pub fn new(hash: impl Into<String>) -> RpcResult<Self> {
        let hash = hash.into();
        if hash.len() != INFO_HASH_LEN {
            return Err(RpcError::construction(format!(
                "info hash must be {INFO_HASH_LEN} hex characters, got {} in {hash:?}",
                hash.len()
            )));
        }
        if let Some((index, c)) = hash.char_indices().find(|(_, c)| !c.is_ascii_hexdigit()) {
            return Err(RpcError::construction(format!(
                "illegal character {c:?} at index {index} in info hash {hash:?}"
            )));
        }
        Ok(Self(hash))
    }

    /// The hash as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for InfoHash {
    type Error = RpcError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<InfoHash> for String {
    fn from(value: InfoHash) -> Self {
        value.0
    }
}

impl FromStr for InfoHash {
    type Err = RpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies one torrent on the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TorrentId {
    /// The torrent's info hash; survives daemon restarts.
    Hash(InfoHash),
    /// The daemon-local numeric id; only valid for the current daemon run.
    Local(u32),
}

impl TorrentId {
    /// Builds a hash identity, validating the hash.
    pub fn hash(hash: impl Into<String>) -> RpcResult<Self> {
        InfoHash::new(hash).map(Self::Hash)
    }

    /// Builds a daemon-local identity.
    pub const fn local(id: u32) -> Self {
        Self::Local(id)
    }
}

impl From<InfoHash> for TorrentId {
    fn from(value: InfoHash) -> Self {
        Self::Hash(value)
    }
}

impl From<u32> for TorrentId {
    fn from(value: u32) -> Self {
        Self::Local(value)
    }
}

impl FromStr for TorrentId {
    type Err = RpcError;

    /// Parses a decimal local id or a 40 character hash.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<u32>() {
            Ok(id) if s.len() != INFO_HASH_LEN => Ok(Self::Local(id)),
            _ => Self::hash(s),
        }
    }
}

impl fmt::Display for TorrentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hash(hash) => hash.fmt(f),
            Self::Local(id) => id.fmt(f),
        }
    }
}

/// Which torrents an operation applies to.
///
/// [`TorrentSelector::All`] is expressed by leaving the `ids` key out of the request, so
/// request types skip it with [`TorrentSelector::is_all`]. Encoding it directly is a bug and
/// fails. Selectors are request-only and have no decoder.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TorrentSelector {
    /// Exactly these torrents.
    Ids(Vec<TorrentId>),
    /// Torrents active within the daemon's recent-activity window.
    RecentlyActive,
    /// Every torrent.
    #[default]
    All,
}

impl TorrentSelector {
    /// Returns `true` for [`TorrentSelector::All`], which must be omitted from requests.
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// A selector for a single torrent.
    pub fn single(id: impl Into<TorrentId>) -> Self {
        Self::Ids(vec![id.into()])
    }
}

impl From<Vec<TorrentId>> for TorrentSelector {
    fn from(value: Vec<TorrentId>) -> Self {
        Self::Ids(value)
    }
}

impl From<TorrentId> for TorrentSelector {
    fn from(value: TorrentId) -> Self {
        Self::Ids(vec![value])
    }
}

impl FromIterator<TorrentId> for TorrentSelector {
    fn from_iter<I: IntoIterator<Item = TorrentId>>(iter: I) -> Self {
        Self::Ids(iter.into_iter().collect())
    }
}

impl Serialize for TorrentSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Ids(ids) => ids.serialize(serializer),
            Self::RecentlyActive => serializer.serialize_str(RECENTLY_ACTIVE),
            Self::All => Err(ser::Error::custom(
                "TorrentSelector::All cannot be encoded; the `ids` key must be omitted instead",
            )),
        }
    }
}

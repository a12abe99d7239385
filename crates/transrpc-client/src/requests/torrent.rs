use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use transrpc_types::{
    Field, InfoHash, Priority, RpcError, RpcResult, TorrentId, TorrentRecord, TorrentSelector,
};

use super::{NoArguments, RpcMethod};

/// Actions that only take a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TorrentAction {
    /// Start, respecting the queue.
    Start,
    /// Start now, bypassing the queue.
    StartNow,
    /// Stop.
    Stop,
    /// Verify local data.
    Verify,
    /// Announce to trackers now.
    Reannounce,
}

impl TorrentAction {
    /// The method name for this action.
    pub const fn method(self) -> &'static str {
        match self {
            Self::Start => "torrent-start",
            Self::StartNow => "torrent-start-now",
            Self::Stop => "torrent-stop",
            Self::Verify => "torrent-verify",
            Self::Reannounce => "torrent-reannounce",
        }
    }
}

/// `torrent-start`, `torrent-start-now`, `torrent-stop`, `torrent-verify` or
/// `torrent-reannounce`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TorrentActionRequest {
    /// What to do.
    #[serde(skip)]
    pub action: TorrentAction,
    /// Which torrents to do it to.
    #[serde(skip_serializing_if = "TorrentSelector::is_all")]
    pub ids: TorrentSelector,
}

impl RpcMethod for TorrentActionRequest {
    type Response = NoArguments;

    fn method(&self) -> &'static str {
        self.action.method()
    }
}

/// `torrent-get`: reads the listed fields of the selected torrents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetTorrents {
    /// Which torrents to read.
    #[serde(skip_serializing_if = "TorrentSelector::is_all")]
    pub ids: TorrentSelector,
    /// Wire keys to read, already deduplicated.
    pub fields: Vec<&'static str>,
}

/// Result of [`GetTorrents`].
///
/// The daemon does not promise to return torrents in the order they were selected.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TorrentList {
    /// One sparse record per torrent.
    #[serde(default)]
    pub torrents: Vec<TorrentRecord>,
    /// Torrents removed within the recent-activity window. Only sent when the request
    /// selected recently active torrents.
    #[serde(default)]
    pub removed: Vec<TorrentId>,
}

impl RpcMethod for GetTorrents {
    type Response = TorrentList;

    fn method(&self) -> &'static str {
        "torrent-get"
    }
}

/// Changes applied by `torrent-set`.
///
/// Properties that live in the torrent record are set through [`TorrentMutation::fields`];
/// the remaining members are write-only arguments with no readable counterpart.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TorrentMutation {
    /// Record fields to write. Only present fields are sent.
    #[serde(flatten)]
    pub fields: TorrentRecord,
    /// Indices of files to download.
    #[serde(rename = "files-wanted", skip_serializing_if = "Vec::is_empty")]
    pub files_wanted: Vec<u32>,
    /// Indices of files to skip.
    #[serde(rename = "files-unwanted", skip_serializing_if = "Vec::is_empty")]
    pub files_unwanted: Vec<u32>,
    /// New data location, without moving existing data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Indices of files to fetch first.
    #[serde(rename = "priority-high", skip_serializing_if = "Vec::is_empty")]
    pub priority_high: Vec<u32>,
    /// Indices of files to fetch last.
    #[serde(rename = "priority-low", skip_serializing_if = "Vec::is_empty")]
    pub priority_low: Vec<u32>,
    /// Indices of files to fetch at normal priority.
    #[serde(rename = "priority-normal", skip_serializing_if = "Vec::is_empty")]
    pub priority_normal: Vec<u32>,
}

impl TorrentMutation {
    /// Sets one record field.
    pub fn set<T>(mut self, field: Field<TorrentRecord, T>, value: T) -> Self {
        field.set(&mut self.fields, value);
        self
    }
}

/// `torrent-set`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetTorrents {
    /// Which torrents to change.
    #[serde(skip_serializing_if = "TorrentSelector::is_all")]
    pub ids: TorrentSelector,
    /// What to change.
    #[serde(flatten)]
    pub mutation: TorrentMutation,
}

impl RpcMethod for SetTorrents {
    type Response = NoArguments;

    fn method(&self) -> &'static str {
        "torrent-set"
    }
}

/// `torrent-remove`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoveTorrents {
    /// Which torrents to remove.
    #[serde(skip_serializing_if = "TorrentSelector::is_all")]
    pub ids: TorrentSelector,
    /// Also delete downloaded data.
    #[serde(rename = "delete-local-data")]
    pub delete_local_data: bool,
}

impl RpcMethod for RemoveTorrents {
    type Response = NoArguments;

    fn method(&self) -> &'static str {
        "torrent-remove"
    }
}

/// `torrent-set-location`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetLocation {
    /// Which torrents to relocate.
    #[serde(skip_serializing_if = "TorrentSelector::is_all")]
    pub ids: TorrentSelector,
    /// New data directory.
    pub location: String,
    /// Move existing data there; otherwise the daemon looks for the data in the new place.
    #[serde(rename = "move")]
    pub move_data: bool,
}

impl RpcMethod for SetLocation {
    type Response = NoArguments;

    fn method(&self) -> &'static str {
        "torrent-set-location"
    }
}

/// `torrent-rename-path`: renames a file or directory inside one torrent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenamePath {
    ids: [TorrentId; 1],
    /// Current path inside the torrent.
    pub path: String,
    /// New last path component.
    pub name: String,
}

impl RenamePath {
    /// Renames `path` of torrent `id` to `name`.
    pub fn new(id: TorrentId, path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ids: [id],
            path: path.into(),
            name: name.into(),
        }
    }

    /// The torrent being changed.
    pub fn id(&self) -> &TorrentId {
        &self.ids[0]
    }
}

/// Result of [`RenamePath`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RenamedPath {
    /// Local id of the torrent.
    pub id: u32,
    /// The old path.
    pub path: String,
    /// The new name.
    pub name: String,
}

impl RpcMethod for RenamePath {
    type Response = RenamedPath;

    fn method(&self) -> &'static str {
        "torrent-rename-path"
    }
}

/// `torrent-add`.
///
/// A request names exactly one source: a path or URL the daemon can read, or the metainfo
/// itself as base64. The constructors enforce that; everything else is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddTorrent {
    #[serde(skip_serializing_if = "Option::is_none")]
    filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metainfo: Option<String>,
    /// HTTP cookies sent when the daemon fetches a URL, as `name=value; ...;`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookies: Option<String>,
    /// Where to store the data.
    #[serde(rename = "download-dir", skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<String>,
    /// User labels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    /// Add without starting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
    /// Maximum number of peers.
    #[serde(rename = "peer-limit", skip_serializing_if = "Option::is_none")]
    pub peer_limit: Option<u32>,
    /// Bandwidth priority.
    #[serde(rename = "bandwidthPriority", skip_serializing_if = "Option::is_none")]
    pub bandwidth_priority: Option<Priority>,
    /// Indices of files to download.
    #[serde(rename = "files-wanted", skip_serializing_if = "Vec::is_empty")]
    pub files_wanted: Vec<u32>,
    /// Indices of files to skip.
    #[serde(rename = "files-unwanted", skip_serializing_if = "Vec::is_empty")]
    pub files_unwanted: Vec<u32>,
    /// Indices of files to fetch first.
    #[serde(rename = "priority-high", skip_serializing_if = "Vec::is_empty")]
    pub priority_high: Vec<u32>,
    /// Indices of files to fetch last.
    #[serde(rename = "priority-low", skip_serializing_if = "Vec::is_empty")]
    pub priority_low: Vec<u32>,
    /// Indices of files to fetch at normal priority.
    #[serde(rename = "priority-normal", skip_serializing_if = "Vec::is_empty")]
    pub priority_normal: Vec<u32>,
    /// Download pieces in order.
    #[serde(rename = "sequential_download", skip_serializing_if = "Option::is_none")]
    pub sequential_download: Option<bool>,
}

impl AddTorrent {
    /// Adds a `.torrent` file from the local filesystem. The file must exist; its absolute path
    /// is sent, so the daemon must be able to read the same path.
    pub fn from_file(path: impl AsRef<Path>) -> RpcResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(RpcError::construction(format!(
                "torrent file {} does not exist",
                path.display()
            )));
        }
        let absolute = std::path::absolute(path).map_err(|e| {
            RpcError::construction(format!("cannot resolve {}: {e}", path.display()))
        })?;
        let filename = absolute.to_str().ok_or_else(|| {
            RpcError::construction(format!("{} is not valid UTF-8", absolute.display()))
        })?;
        Self::try_from_parts(Some(filename.to_owned()), None)
    }

    /// Adds from a URL or magnet link the daemon fetches itself.
    pub fn from_url(url: impl Into<String>) -> RpcResult<Self> {
        Self::try_from_parts(Some(url.into()), None)
    }

    /// Adds from base64-encoded metainfo. The text is checked against the base64 alphabet.
    pub fn from_metainfo_base64(metainfo: impl Into<String>) -> RpcResult<Self> {
        Self::try_from_parts(None, Some(metainfo.into()))
    }

    /// Adds from raw metainfo bytes.
    pub fn from_metainfo_bytes(metainfo: &[u8]) -> RpcResult<Self> {
        Self::try_from_parts(None, Some(STANDARD.encode(metainfo)))
    }

    /// Builds a request from its two possible sources, exactly one of which must be given.
    pub fn try_from_parts(filename: Option<String>, metainfo: Option<String>) -> RpcResult<Self> {
        match (&filename, &metainfo) {
            (Some(_), Some(_)) => {
                return Err(RpcError::construction(
                    "torrent-add takes either a filename or metainfo, not both",
                ));
            }
            (None, None) => {
                return Err(RpcError::construction(
                    "torrent-add needs a filename or metainfo",
                ));
            }
            (Some(name), None) if name.is_empty() => {
                return Err(RpcError::construction("torrent-add filename is empty"));
            }
            (None, Some(encoded)) => validate_base64(encoded)?,
            _ => {}
        }
        Ok(Self {
            filename,
            metainfo,
            cookies: None,
            download_dir: None,
            labels: None,
            paused: None,
            peer_limit: None,
            bandwidth_priority: None,
            files_wanted: Vec::new(),
            files_unwanted: Vec::new(),
            priority_high: Vec::new(),
            priority_low: Vec::new(),
            priority_normal: Vec::new(),
            sequential_download: None,
        })
    }

    /// Sets the cookies sent when fetching a URL, formatted as `name=value; ...;`.
    pub fn with_cookies<K, V>(mut self, cookies: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let formatted: String = cookies
            .into_iter()
            .map(|(name, value)| format!("{}={}; ", name.as_ref(), value.as_ref()))
            .collect();
        self.cookies = Some(formatted.trim_end().to_owned());
        self
    }

    /// The filename or URL, if this request uses one.
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// The base64 metainfo, if this request carries it.
    pub fn metainfo(&self) -> Option<&str> {
        self.metainfo.as_deref()
    }
}

fn validate_base64(encoded: &str) -> RpcResult<()> {
    if encoded.is_empty() {
        return Err(RpcError::construction("metainfo is empty"));
    }
    let is_base64 = |c: char| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=');
    match encoded.char_indices().find(|(_, c)| !is_base64(*c)) {
        Some((index, c)) => Err(RpcError::construction(format!(
            "metainfo is not base64: {c:?} at index {index}"
        ))),
        None => Ok(()),
    }
}

#[derive(Debug, Deserialize)]
struct AddedTorrentInfo {
    id: u32,
    name: String,
    #[serde(rename = "hashString")]
    hash_string: InfoHash,
}

#[derive(Debug, Deserialize)]
struct RawAddResult {
    #[serde(rename = "torrent-added")]
    added: Option<AddedTorrentInfo>,
    #[serde(rename = "torrent-duplicate")]
    duplicate: Option<AddedTorrentInfo>,
}

/// Result of [`AddTorrent`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawAddResult")]
pub struct AddedTorrent {
    /// Local id.
    pub id: u32,
    /// Torrent name.
    pub name: String,
    /// Info hash.
    pub hash_string: InfoHash,
    /// The daemon already had this torrent; nothing was added.
    pub is_duplicate: bool,
}

impl AddedTorrent {
    /// The torrent's stable identity.
    pub fn torrent_id(&self) -> TorrentId {
        TorrentId::Hash(self.hash_string.clone())
    }
}

impl TryFrom<RawAddResult> for AddedTorrent {
    type Error = String;

    fn try_from(raw: RawAddResult) -> Result<Self, Self::Error> {
        let (info, is_duplicate) = match (raw.added, raw.duplicate) {
            (Some(info), None) => (info, false),
            (None, Some(info)) => (info, true),
            (Some(_), Some(_)) => {
                return Err("both `torrent-added` and `torrent-duplicate` are present".into());
            }
            (None, None) => {
                return Err("neither `torrent-added` nor `torrent-duplicate` is present".into());
            }
        };
        Ok(Self {
            id: info.id,
            name: info.name,
            hash_string: info.hash_string,
            is_duplicate,
        })
    }
}

impl RpcMethod for AddTorrent {
    type Response = AddedTorrent;

    fn method(&self) -> &'static str {
        "torrent-add"
    }
}

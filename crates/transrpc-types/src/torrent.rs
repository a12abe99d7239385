//! The torrent field record and its nested sub-records.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::bitset::Bitset;
use crate::enums::{
    Availability, IdleMode, Priority, RatioMode, TorrentErrorKind, TorrentStatus, TrackerState,
};
use crate::field::field_record;
use crate::id::{InfoHash, TorrentId};
use crate::units::{ByteCount, Speed};

/// One file of a torrent (`files`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TorrentFile {
    /// Bytes of this file we already have.
    pub bytes_completed: ByteCount,
    /// Size of the file.
    pub length: ByteCount,
    /// Path of the file inside the torrent.
    pub name: String,
    /// Index of the first piece of the file. Older daemons omit it.
    #[serde(rename = "begin_piece", default)]
    pub begin_piece: u32,
    /// Index one past the last piece of the file. Older daemons omit it.
    #[serde(rename = "end_piece", default)]
    pub end_piece: u32,
}

/// Per-file download state (`fileStats`), in the same order as `files`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStats {
    /// Bytes of this file we already have.
    pub bytes_completed: ByteCount,
    /// Whether the file will be downloaded.
    pub wanted: bool,
    /// Download priority of the file.
    pub priority: Priority,
}

/// A connected peer (`peers`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Peer {
    /// Peer IP address.
    pub address: String,
    /// Client software the peer reports.
    pub client_name: String,
    /// We are choking the peer.
    pub client_is_choked: bool,
    /// We are interested in the peer's pieces.
    pub client_is_interested: bool,
    /// Compact status flags, as shown by the daemon's own clients.
    #[serde(rename = "flagStr")]
    pub flags: String,
    /// We are downloading from the peer.
    pub is_downloading_from: bool,
    /// The connection is encrypted.
    pub is_encrypted: bool,
    /// The peer connected to us.
    pub is_incoming: bool,
    /// We are uploading to the peer.
    pub is_uploading_to: bool,
    /// The connection uses µTP.
    #[serde(rename = "isUTP")]
    pub is_utp: bool,
    /// The peer is choking us.
    pub peer_is_choked: bool,
    /// The peer is interested in our pieces.
    pub peer_is_interested: bool,
    /// Peer port.
    pub port: u16,
    /// How much of the torrent the peer has, `0.0..=1.0`.
    pub progress: f64,
    /// Rate we download from the peer.
    #[serde(with = "crate::codec::speed_bytes")]
    pub rate_to_client: Speed,
    /// Rate we upload to the peer.
    #[serde(with = "crate::codec::speed_bytes")]
    pub rate_to_peer: Speed,
}

/// How many connected peers came from each discovery source (`peersFrom`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PeersFrom {
    /// Peers from the resume cache.
    pub from_cache: u32,
    /// Peers from the DHT.
    pub from_dht: u32,
    /// Peers that connected to us.
    pub from_incoming: u32,
    /// Peers from local peer discovery.
    pub from_lpd: u32,
    /// Peers from the extension protocol.
    pub from_ltep: u32,
    /// Peers from peer exchange.
    pub from_pex: u32,
    /// Peers from trackers.
    pub from_tracker: u32,
}

/// A tracker of the torrent (`trackers`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracker {
    /// Announce URL.
    pub announce: String,
    /// Tracker id, unique within the torrent.
    pub id: u32,
    /// Scrape URL.
    pub scrape: String,
    /// Site name derived from the announce host.
    #[serde(default)]
    pub sitename: String,
    /// Fallback tier; lower tiers are tried first.
    pub tier: u32,
}

/// Announce and scrape statistics for one tracker (`trackerStats`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerStats {
    /// Announce URL.
    pub announce: String,
    /// Announce state.
    pub announce_state: TrackerState,
    /// Completed downloads reported by the tracker, `-1` if unknown.
    pub download_count: i64,
    /// Whether an announce has been sent this session.
    pub has_announced: bool,
    /// Whether a scrape has been sent this session.
    pub has_scraped: bool,
    /// Tracker host.
    pub host: String,
    /// Tracker id, unique within the torrent.
    pub id: u32,
    /// Whether this is a backup tracker in its tier.
    pub is_backup: bool,
    /// Peers returned by the last announce.
    pub last_announce_peer_count: i64,
    /// Human readable result of the last announce.
    pub last_announce_result: String,
    /// When the last announce started.
    #[serde(with = "crate::codec::epoch")]
    pub last_announce_start_time: DateTime<Utc>,
    /// Whether the last announce succeeded.
    pub last_announce_succeeded: bool,
    /// When the last announce completed.
    #[serde(with = "crate::codec::epoch")]
    pub last_announce_time: DateTime<Utc>,
    /// Whether the last announce timed out.
    pub last_announce_timed_out: bool,
    /// Human readable result of the last scrape.
    pub last_scrape_result: String,
    /// When the last scrape started.
    #[serde(with = "crate::codec::epoch")]
    pub last_scrape_start_time: DateTime<Utc>,
    /// Whether the last scrape succeeded.
    pub last_scrape_succeeded: bool,
    /// When the last scrape completed.
    #[serde(with = "crate::codec::epoch")]
    pub last_scrape_time: DateTime<Utc>,
    /// Whether the last scrape timed out.
    pub last_scrape_timed_out: bool,
    /// Leechers reported by the tracker, `-1` if unknown.
    pub leecher_count: i64,
    /// When the next announce is due.
    #[serde(with = "crate::codec::epoch")]
    pub next_announce_time: DateTime<Utc>,
    /// When the next scrape is due.
    #[serde(with = "crate::codec::epoch")]
    pub next_scrape_time: DateTime<Utc>,
    /// Scrape URL.
    pub scrape: String,
    /// Scrape state.
    pub scrape_state: TrackerState,
    /// Seeders reported by the tracker, `-1` if unknown.
    pub seeder_count: i64,
    /// Site name derived from the announce host.
    #[serde(default)]
    pub sitename: String,
    /// Fallback tier.
    pub tier: u32,
}

field_record! {
    /// A sparse view of one torrent, as returned by `torrent-get`.
    ///
    /// Only the fields that were requested are present. Fields marked writable can be sent back
    /// through `torrent-set`.
    pub struct TorrentRecord;
    /// Descriptors for every [`TorrentRecord`] field.
    ///
    /// ```rust,ignore
    /// let fields = [TorrentFields::ID.id(), TorrentFields::PERCENT_DONE.id()];
    /// let torrents = client.get_torrents(TorrentSelector::All, &fields).await?;
    /// let done = TorrentFields::PERCENT_DONE.get(&torrents[0]);
    /// ```
    pub struct TorrentFields;
    {
        /// Last time data was transferred.
        ACTIVITY_DATE activity_date: DateTime<Utc> = "activityDate", ro,
            with = "crate::codec::epoch::optional";
        /// When the torrent was added.
        ADDED_DATE added_date: DateTime<Utc> = "addedDate", ro,
            with = "crate::codec::epoch::optional";
        /// Per-piece availability among connected peers.
        AVAILABILITY availability: Vec<Availability> = "availability", ro;
        /// Bandwidth priority of the torrent.
        BANDWIDTH_PRIORITY bandwidth_priority: Priority = "bandwidthPriority", rw;
        /// Comment from the metainfo.
        COMMENT comment: String = "comment", ro;
        /// Bytes discarded because they failed hash checks.
        CORRUPT_EVER corrupt_ever: ByteCount = "corruptEver", ro;
        /// Creator from the metainfo.
        CREATOR creator: String = "creator", ro;
        /// Creation date from the metainfo.
        DATE_CREATED date_created: DateTime<Utc> = "dateCreated", ro,
            with = "crate::codec::epoch::optional";
        /// Bytes of wanted data that connected peers can provide.
        DESIRED_AVAILABLE desired_available: ByteCount = "desiredAvailable", ro;
        /// When the download completed.
        DONE_DATE done_date: DateTime<Utc> = "doneDate", ro,
            with = "crate::codec::epoch::optional";
        /// Directory the data is stored in.
        DOWNLOAD_DIR download_dir: String = "downloadDir", ro;
        /// Bytes downloaded over the torrent's lifetime.
        DOWNLOADED_EVER downloaded_ever: ByteCount = "downloadedEver", ro;
        /// Download limit, in KB/s.
        DOWNLOAD_LIMIT download_limit: Speed = "downloadLimit", rw;
        /// Whether the download limit applies.
        DOWNLOAD_LIMITED download_limited: bool = "downloadLimited", rw;
        /// When the torrent's metadata was last edited.
        EDIT_DATE edit_date: DateTime<Utc> = "editDate", ro,
            with = "crate::codec::epoch::optional";
        /// Kind of error the torrent is in.
        ERROR error: TorrentErrorKind = "error", ro;
        /// Error message, empty when there is none.
        ERROR_STRING error_string: String = "errorString", ro;
        /// Estimated time to completion; negative when unknown.
        ETA eta: TimeDelta = "eta", ro, with = "crate::codec::duration::optional";
        /// Estimated time until the idle seeding limit is reached.
        ETA_IDLE eta_idle: TimeDelta = "etaIdle", ro, with = "crate::codec::duration::optional";
        /// Number of files.
        FILE_COUNT file_count: u32 = "file-count", ro;
        /// The files of the torrent.
        FILES files: Vec<TorrentFile> = "files", ro;
        /// Per-file download state, in the order of `files`.
        FILE_STATS file_stats: Vec<FileStats> = "fileStats", ro;
        /// Bandwidth group the torrent belongs to.
        GROUP group: String = "group", rw;
        /// Info hash.
        HASH_STRING hash_string: InfoHash = "hashString", ro;
        /// Bytes downloaded but not yet verified.
        HAVE_UNCHECKED have_unchecked: ByteCount = "haveUnchecked", ro;
        /// Bytes downloaded and verified.
        HAVE_VALID have_valid: ByteCount = "haveValid", ro;
        /// Whether session speed limits also apply to this torrent.
        HONORS_SESSION_LIMITS honors_session_limits: bool = "honorsSessionLimits", rw;
        /// Daemon-local id.
        ID id: u32 = "id", ro;
        /// Whether the torrent reached its seeding limit.
        IS_FINISHED is_finished: bool = "isFinished", ro;
        /// Whether the torrent is private.
        IS_PRIVATE is_private: bool = "isPrivate", ro;
        /// Whether the torrent has been idle long enough to count as stalled.
        IS_STALLED is_stalled: bool = "isStalled", ro;
        /// User labels.
        LABELS labels: Vec<String> = "labels", rw;
        /// Bytes still to download for the wanted files.
        LEFT_UNTIL_DONE left_until_done: ByteCount = "leftUntilDone", ro;
        /// Magnet link for the torrent.
        MAGNET_LINK magnet_link: String = "magnetLink", ro;
        /// Earliest time a manual announce is allowed, in seconds since the epoch.
        MANUAL_ANNOUNCE_TIME manual_announce_time: i64 = "manualAnnounceTime", ro;
        /// Maximum number of connected peers.
        MAX_CONNECTED_PEERS max_connected_peers: u32 = "maxConnectedPeers", ro;
        /// How much of the metadata is present, `0.0..=1.0`.
        METADATA_PERCENT_COMPLETE metadata_percent_complete: f64 = "metadataPercentComplete", ro;
        /// Torrent name.
        NAME name: String = "name", ro;
        /// Maximum number of peers.
        PEER_LIMIT peer_limit: u32 = "peer-limit", rw;
        /// Connected peers.
        PEERS peers: Vec<Peer> = "peers", ro;
        /// Number of connected peers.
        PEERS_CONNECTED peers_connected: u32 = "peersConnected", ro;
        /// Where connected peers came from.
        PEERS_FROM peers_from: PeersFrom = "peersFrom", ro;
        /// Number of peers we upload to.
        PEERS_GETTING_FROM_US peers_getting_from_us: u32 = "peersGettingFromUs", ro;
        /// Number of peers we download from.
        PEERS_SENDING_TO_US peers_sending_to_us: u32 = "peersSendingToUs", ro;
        /// How much of the whole torrent we have, `0.0..=1.0`.
        PERCENT_COMPLETE percent_complete: f64 = "percentComplete", ro;
        /// How much of the wanted files we have, `0.0..=1.0`.
        PERCENT_DONE percent_done: f64 = "percentDone", ro;
        /// Which pieces we have.
        PIECES pieces: Bitset = "pieces", ro, with = "crate::codec::bitset_base64::optional";
        /// Number of pieces.
        PIECE_COUNT piece_count: u32 = "pieceCount", ro;
        /// Size of one piece.
        PIECE_SIZE piece_size: ByteCount = "pieceSize", ro;
        /// Per-file priorities, in the order of `files`.
        PRIORITIES priorities: Vec<Priority> = "priorities", ro;
        /// MIME type of the largest file.
        PRIMARY_MIME_TYPE primary_mime_type: String = "primary-mime-type", ro;
        /// Position in the download or seed queue.
        QUEUE_POSITION queue_position: i64 = "queuePosition", rw;
        /// Current download rate.
        RATE_DOWNLOAD rate_download: Speed = "rateDownload", ro,
            with = "crate::codec::speed_bytes::optional";
        /// Current upload rate.
        RATE_UPLOAD rate_upload: Speed = "rateUpload", ro,
            with = "crate::codec::speed_bytes::optional";
        /// Verification progress, `0.0..=1.0`.
        RECHECK_PROGRESS recheck_progress: f64 = "recheckProgress", ro;
        /// Total time spent downloading.
        SECONDS_DOWNLOADING seconds_downloading: TimeDelta = "secondsDownloading", ro,
            with = "crate::codec::duration::optional";
        /// Total time spent seeding.
        SECONDS_SEEDING seconds_seeding: TimeDelta = "secondsSeeding", ro,
            with = "crate::codec::duration::optional";
        /// Idle seeding limit, in minutes.
        SEED_IDLE_LIMIT seed_idle_limit: i64 = "seedIdleLimit", rw;
        /// Which idle seeding limit applies.
        SEED_IDLE_MODE seed_idle_mode: IdleMode = "seedIdleMode", rw;
        /// Seed ratio limit.
        SEED_RATIO_LIMIT seed_ratio_limit: f64 = "seedRatioLimit", rw;
        /// Which seed ratio limit applies.
        SEED_RATIO_MODE seed_ratio_mode: RatioMode = "seedRatioMode", rw;
        /// Whether pieces are downloaded in order.
        SEQUENTIAL_DOWNLOAD sequential_download: bool = "sequential_download", rw;
        /// Bytes of the wanted files.
        SIZE_WHEN_DONE size_when_done: ByteCount = "sizeWhenDone", ro;
        /// When the torrent was last started.
        START_DATE start_date: DateTime<Utc> = "startDate", ro,
            with = "crate::codec::epoch::optional";
        /// What the torrent is doing.
        STATUS status: TorrentStatus = "status", ro;
        /// Trackers of the torrent.
        TRACKERS trackers: Vec<Tracker> = "trackers", ro;
        /// Announce URLs, one per line, tiers separated by a blank line.
        TRACKER_LIST tracker_list: String = "trackerList", rw;
        /// Statistics for each tracker.
        TRACKER_STATS tracker_stats: Vec<TrackerStats> = "trackerStats", ro;
        /// Size of all files.
        TOTAL_SIZE total_size: ByteCount = "totalSize", ro;
        /// Path of the `.torrent` file on the daemon host.
        TORRENT_FILE torrent_file: String = "torrentFile", ro;
        /// Bytes uploaded over the torrent's lifetime.
        UPLOADED_EVER uploaded_ever: ByteCount = "uploadedEver", ro;
        /// Upload limit, in KB/s.
        UPLOAD_LIMIT upload_limit: Speed = "uploadLimit", rw;
        /// Whether the upload limit applies.
        UPLOAD_LIMITED upload_limited: bool = "uploadLimited", rw;
        /// Upload ratio.
        UPLOAD_RATIO upload_ratio: f64 = "uploadRatio", ro;
        /// Which files are wanted, one bit per file.
        WANTED wanted: Bitset = "wanted", ro, with = "crate::codec::bitset_bits::optional";
        /// Web seed URLs.
        WEBSEEDS webseeds: Vec<String> = "webseeds", ro;
        /// Number of web seeds we download from.
        WEBSEEDS_SENDING_TO_US webseeds_sending_to_us: u32 = "webseedsSendingToUs", ro;
    }
}

impl TorrentRecord {
    /// The most stable identity present in the record: the hash if it was requested,
    /// otherwise the local id.
    pub fn identity(&self) -> Option<TorrentId> {
        self.hash_string
            .get()
            .cloned()
            .map(TorrentId::Hash)
            .or_else(|| self.id.get().copied().map(TorrentId::Local))
    }
}

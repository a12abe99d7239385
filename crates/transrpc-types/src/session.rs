//! The session field record and session statistics.

use std::fmt;

use chrono::{NaiveTime, TimeDelta, Weekday};
use serde::{Deserialize, Serialize};

use crate::enums::Encryption;
use crate::field::field_record;
use crate::units::{ByteCount, Speed};

const WEEK: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Days of the week on which the alternative speed limits are scheduled.
///
/// A bitmask with Sunday as bit 0 through Saturday as bit 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeedSchedule(pub u8);

impl SpeedSchedule {
    /// Every day of the week.
    pub const EVERY_DAY: Self = Self(0b111_1111);

    /// A schedule active on exactly `days`.
    pub fn from_days(days: impl IntoIterator<Item = Weekday>) -> Self {
        days.into_iter()
            .fold(Self(0), |schedule, day| schedule.with(day, true))
    }

    /// Whether the schedule is active on `day`.
    pub fn is_active(self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    /// A copy of the schedule with `day` switched on or off.
    pub fn with(self, day: Weekday, active: bool) -> Self {
        if active {
            Self(self.0 | Self::bit(day))
        } else {
            Self(self.0 & !Self::bit(day))
        }
    }

    /// Active days, starting from Sunday.
    pub fn days(self) -> impl Iterator<Item = Weekday> {
        WEEK.into_iter().filter(move |day| self.is_active(*day))
    }

    fn bit(day: Weekday) -> u8 {
        1 << day.num_days_from_sunday()
    }
}

impl fmt::Display for SpeedSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days: Vec<String> = self.days().map(|day| day.to_string()).collect();
        f.write_str(&days.join(", "))
    }
}

field_record! {
    /// A sparse view of the daemon's session settings, as returned by `session-get` and sent by
    /// `session-set`.
    pub struct SessionRecord;
    /// Descriptors for every [`SessionRecord`] field.
    pub struct SessionFields;
    {
        /// Alternative download limit, in KB/s.
        ALT_SPEED_DOWN alt_speed_down: Speed = "alt-speed-down", rw;
        /// Whether the alternative limits are in effect.
        ALT_SPEED_ENABLED alt_speed_enabled: bool = "alt-speed-enabled", rw;
        /// When the scheduled alternative limits start.
        ALT_SPEED_TIME_BEGIN alt_speed_time_begin: NaiveTime = "alt-speed-time-begin", rw,
            with = "crate::codec::minutes::optional";
        /// Days the alternative limit schedule runs on.
        ALT_SPEED_TIME_DAY alt_speed_time_day: SpeedSchedule = "alt-speed-time-day", rw;
        /// Whether the alternative limits follow the schedule.
        ALT_SPEED_TIME_ENABLED alt_speed_time_enabled: bool = "alt-speed-time-enabled", rw;
        /// When the scheduled alternative limits end.
        ALT_SPEED_TIME_END alt_speed_time_end: NaiveTime = "alt-speed-time-end", rw,
            with = "crate::codec::minutes::optional";
        /// Alternative upload limit, in KB/s.
        ALT_SPEED_UP alt_speed_up: Speed = "alt-speed-up", rw;
        /// Whether the blocklist is used.
        BLOCKLIST_ENABLED blocklist_enabled: bool = "blocklist-enabled", rw;
        /// Number of rules in the blocklist.
        BLOCKLIST_SIZE blocklist_size: u64 = "blocklist-size", ro;
        /// Where the blocklist is fetched from.
        BLOCKLIST_URL blocklist_url: String = "blocklist-url", rw;
        /// Disk cache size, in megabytes.
        CACHE_SIZE_MB cache_size_mb: u32 = "cache-size-mb", rw;
        /// Daemon configuration directory.
        CONFIG_DIR config_dir: String = "config-dir", ro;
        /// Announce URLs added to every public torrent.
        DEFAULT_TRACKERS default_trackers: String = "default-trackers", rw;
        /// Whether DHT is enabled.
        DHT_ENABLED dht_enabled: bool = "dht-enabled", rw;
        /// Default download directory.
        DOWNLOAD_DIR download_dir: String = "download-dir", rw;
        /// Whether the download queue is used.
        DOWNLOAD_QUEUE_ENABLED download_queue_enabled: bool = "download-queue-enabled", rw;
        /// Maximum number of simultaneous downloads.
        DOWNLOAD_QUEUE_SIZE download_queue_size: u32 = "download-queue-size", rw;
        /// Peer encryption preference.
        ENCRYPTION encryption: Encryption = "encryption", rw;
        /// Whether seeding stops after an idle period.
        IDLE_SEEDING_LIMIT_ENABLED idle_seeding_limit_enabled: bool = "idle-seeding-limit-enabled", rw;
        /// Idle period, in minutes, after which seeding stops.
        IDLE_SEEDING_LIMIT idle_seeding_limit: u32 = "idle-seeding-limit", rw;
        /// Whether incomplete data goes to a separate directory.
        INCOMPLETE_DIR_ENABLED incomplete_dir_enabled: bool = "incomplete-dir-enabled", rw;
        /// Directory for incomplete data.
        INCOMPLETE_DIR incomplete_dir: String = "incomplete-dir", rw;
        /// Whether local peer discovery is enabled.
        LPD_ENABLED lpd_enabled: bool = "lpd-enabled", rw;
        /// Maximum number of peers across all torrents.
        PEER_LIMIT_GLOBAL peer_limit_global: u32 = "peer-limit-global", rw;
        /// Default maximum number of peers per torrent.
        PEER_LIMIT_PER_TORRENT peer_limit_per_torrent: u32 = "peer-limit-per-torrent", rw;
        /// Whether the peer port is randomised on start.
        PEER_PORT_RANDOM_ON_START peer_port_random_on_start: bool = "peer-port-random-on-start", rw;
        /// Port for incoming peer connections.
        PEER_PORT peer_port: u16 = "peer-port", rw;
        /// Whether peer exchange is enabled.
        PEX_ENABLED pex_enabled: bool = "pex-enabled", rw;
        /// Whether UPnP/NAT-PMP port forwarding is enabled.
        PORT_FORWARDING_ENABLED port_forwarding_enabled: bool = "port-forwarding-enabled", rw;
        /// Whether stalled torrents stop counting towards the queue.
        QUEUE_STALLED_ENABLED queue_stalled_enabled: bool = "queue-stalled-enabled", rw;
        /// Idle minutes before a torrent counts as stalled.
        QUEUE_STALLED_MINUTES queue_stalled_minutes: u32 = "queue-stalled-minutes", rw;
        /// Whether incomplete files get a `.part` suffix.
        RENAME_PARTIAL_FILES rename_partial_files: bool = "rename-partial-files", rw;
        /// Number of outstanding block requests per peer.
        REQQ reqq: u32 = "reqq", rw;
        /// Oldest RPC version the daemon still supports.
        RPC_VERSION_MINIMUM rpc_version_minimum: u32 = "rpc-version-minimum", ro;
        /// RPC version as a semantic version string.
        RPC_VERSION_SEMVER rpc_version_semver: String = "rpc-version-semver", ro;
        /// Current RPC version.
        RPC_VERSION rpc_version: u32 = "rpc-version", ro;
        /// Whether a script runs when a torrent is added.
        SCRIPT_TORRENT_ADDED_ENABLED script_torrent_added_enabled: bool =
            "script-torrent-added-enabled", rw;
        /// Script run when a torrent is added.
        SCRIPT_TORRENT_ADDED_FILENAME script_torrent_added_filename: String =
            "script-torrent-added-filename", rw;
        /// Whether a script runs when a torrent finishes downloading.
        SCRIPT_TORRENT_DONE_ENABLED script_torrent_done_enabled: bool =
            "script-torrent-done-enabled", rw;
        /// Script run when a torrent finishes downloading.
        SCRIPT_TORRENT_DONE_FILENAME script_torrent_done_filename: String =
            "script-torrent-done-filename", rw;
        /// Whether a script runs when a torrent finishes seeding.
        SCRIPT_TORRENT_DONE_SEEDING_ENABLED script_torrent_done_seeding_enabled: bool =
            "script-torrent-done-seeding-enabled", rw;
        /// Script run when a torrent finishes seeding.
        SCRIPT_TORRENT_DONE_SEEDING_FILENAME script_torrent_done_seeding_filename: String =
            "script-torrent-done-seeding-filename", rw;
        /// Whether the seed queue is used.
        SEED_QUEUE_ENABLED seed_queue_enabled: bool = "seed-queue-enabled", rw;
        /// Maximum number of simultaneously seeding torrents.
        SEED_QUEUE_SIZE seed_queue_size: u32 = "seed-queue-size", rw;
        /// Default seed ratio limit.
        SEED_RATIO_LIMIT seed_ratio_limit: f64 = "seedRatioLimit", rw;
        /// Whether the default seed ratio limit applies.
        SEED_RATIO_LIMITED seed_ratio_limited: bool = "seedRatioLimited", rw;
        /// Whether new torrents download sequentially by default.
        SEQUENTIAL_DOWNLOAD sequential_download: bool = "sequential_download", rw;
        /// Current session id.
        SESSION_ID session_id: String = "session-id", ro;
        /// Whether the download limit applies.
        SPEED_LIMIT_DOWN_ENABLED speed_limit_down_enabled: bool = "speed-limit-down-enabled", rw;
        /// Download limit, in KB/s.
        SPEED_LIMIT_DOWN speed_limit_down: Speed = "speed-limit-down", rw;
        /// Whether the upload limit applies.
        SPEED_LIMIT_UP_ENABLED speed_limit_up_enabled: bool = "speed-limit-up-enabled", rw;
        /// Upload limit, in KB/s.
        SPEED_LIMIT_UP speed_limit_up: Speed = "speed-limit-up", rw;
        /// Whether added torrents start right away.
        START_ADDED_TORRENTS start_added_torrents: bool = "start-added-torrents", rw;
        /// Whether added `.torrent` files are deleted.
        TRASH_ORIGINAL_TORRENT_FILES trash_original_torrent_files: bool =
            "trash-original-torrent-files", rw;
        /// Whether µTP is enabled.
        UTP_ENABLED utp_enabled: bool = "utp-enabled", rw;
        /// Daemon version string.
        VERSION version: String = "version", ro;
    }
}

/// Transfer statistics over some period, part of [`SessionStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsDetails {
    /// Bytes uploaded.
    pub uploaded_bytes: ByteCount,
    /// Bytes downloaded.
    pub downloaded_bytes: ByteCount,
    /// Number of files added.
    pub files_added: u64,
    /// Number of daemon sessions.
    pub session_count: u64,
    /// Time the daemon was running.
    #[serde(with = "crate::codec::duration")]
    pub seconds_active: TimeDelta,
}

/// Result of `session-stats`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    /// Torrents currently transferring.
    pub active_torrent_count: u32,
    /// Total download rate.
    #[serde(with = "crate::codec::speed_bytes")]
    pub download_speed: Speed,
    /// Torrents that are paused.
    pub paused_torrent_count: u32,
    /// All torrents.
    pub torrent_count: u32,
    /// Total upload rate.
    #[serde(with = "crate::codec::speed_bytes")]
    pub upload_speed: Speed,
    /// Totals across every daemon run.
    #[serde(rename = "cumulative-stats")]
    pub cumulative: StatsDetails,
    /// Totals for the current daemon run.
    #[serde(rename = "current-stats")]
    pub current: StatsDetails,
}

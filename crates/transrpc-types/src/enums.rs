//! Enumerations the daemon sends as integers or short strings.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Declares an enum whose wire form is a fixed integer per variant. Decoding an integer that
/// maps to no variant is an error.
macro_rules! int_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every variant, in wire order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The integer sent on the wire.
            pub const fn wire_value(self) -> i64 {
                match self {
                    $(Self::$variant => $value,)+
                }
            }

            /// Looks up the variant for a wire integer.
            pub fn from_wire(value: i64) -> Option<Self> {
                match value {
                    $($value => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_i64(self.wire_value())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = i64::deserialize(deserializer)?;
                Self::from_wire(value).ok_or_else(|| {
                    de::Error::custom(format!(
                        "{value} is not a valid {}",
                        stringify!($name)
                    ))
                })
            }
        }
    };
}

int_enum! {
    /// Bandwidth priority of a torrent or file (`tr_priority_t`).
    pub enum Priority {
        /// Fetched after everything else.
        Low = -1,
        /// The default.
        Normal = 0,
        /// Fetched first.
        High = 1,
    }
}

int_enum! {
    /// What the torrent is doing right now.
    pub enum TorrentStatus {
        /// Paused.
        Stopped = 0,
        /// Waiting for a verify slot.
        QueuedVerify = 1,
        /// Checking local data.
        Verifying = 2,
        /// Waiting for a download slot.
        QueuedDownload = 3,
        /// Downloading.
        Downloading = 4,
        /// Waiting for a seed slot.
        QueuedSeed = 5,
        /// Seeding.
        Seeding = 6,
    }
}

int_enum! {
    /// Which seeding inactivity limit applies (`tr_idlelimit`).
    pub enum IdleMode {
        /// Follow the session setting.
        Global = 0,
        /// Stop seeding after this torrent's own idle limit.
        Single = 1,
        /// Seed regardless of activity.
        Unlimited = 2,
    }
}

int_enum! {
    /// Which seed ratio limit applies (`tr_ratiolimit`).
    pub enum RatioMode {
        /// Follow the session setting.
        Global = 0,
        /// Stop seeding at this torrent's own ratio.
        Single = 1,
        /// Seed regardless of ratio.
        Unlimited = 2,
    }
}

int_enum! {
    /// Kind of error a torrent is in.
    pub enum TorrentErrorKind {
        /// Everything is fine.
        Ok = 0,
        /// The tracker answered the last announce with a warning.
        TrackerWarning = 1,
        /// The tracker answered the last announce with an error.
        TrackerError = 2,
        /// Local trouble such as a full disk or missing permissions.
        LocalError = 3,
    }
}

int_enum! {
    /// Announce or scrape state of a tracker.
    pub enum TrackerState {
        /// Not doing anything.
        Inactive = 0,
        /// Waiting for the next scheduled request.
        Waiting = 1,
        /// Ready to send, waiting for a slot.
        Queued = 2,
        /// A request is in flight.
        Active = 3,
    }
}

impl fmt::Display for TorrentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Stopped => "stopped",
            Self::QueuedVerify => "queued to verify",
            Self::Verifying => "verifying",
            Self::QueuedDownload => "queued to download",
            Self::Downloading => "downloading",
            Self::QueuedSeed => "queued to seed",
            Self::Seeding => "seeding",
        };
        f.write_str(text)
    }
}

/// Availability of one piece, from the `availability` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Availability {
    /// We already have the piece (`-1` on the wire).
    HavePiece,
    /// We lack the piece; this many connected peers have it.
    Fetching(u32),
}

impl Serialize for Availability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::HavePiece => serializer.serialize_i64(-1),
            Self::Fetching(peers) => serializer.serialize_u32(*peers),
        }
    }
}

impl<'de> Deserialize<'de> for Availability {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        match value {
            -1 => Ok(Self::HavePiece),
            peers if peers >= 0 => u32::try_from(peers)
                .map(Self::Fetching)
                .map_err(de::Error::custom),
            _ => Err(de::Error::custom(format!(
                "{value} is not a valid piece availability"
            ))),
        }
    }
}

/// Session-wide peer encryption preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encryption {
    /// Only talk to peers that encrypt.
    Required,
    /// Prefer encryption but allow plaintext.
    Preferred,
    /// Accept either.
    Tolerated,
}

/// IP protocol for the `port-test` method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IpProtocol {
    /// IPv4.
    #[serde(rename = "ipv4")]
    V4,
    /// IPv6.
    #[serde(rename = "ipv6")]
    V6,
}

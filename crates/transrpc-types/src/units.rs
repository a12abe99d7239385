//! Byte counts and transfer speeds.
//!
//! The daemon uses decimal units: one kilobyte is 1000 bytes.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const KILO: f64 = 1000.0;

/// A number of bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ByteCount(pub u64);

impl ByteCount {
    /// The raw byte count.
    pub const fn bytes(self) -> u64 {
        self.0
    }

    /// Decimal kilobytes.
    pub fn kilobytes(self) -> f64 {
        self.0 as f64 / KILO
    }

    /// Decimal megabytes.
    pub fn megabytes(self) -> f64 {
        self.0 as f64 / (KILO * KILO)
    }

    /// Decimal gigabytes.
    pub fn gigabytes(self) -> f64 {
        self.0 as f64 / (KILO * KILO * KILO)
    }
}

impl fmt::Display for ByteCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
        if self.0 < 1000 {
            return write!(f, "{} bytes", self.0);
        }
        let mut value = self.kilobytes();
        let mut unit = 0;
        while value >= KILO && unit + 1 < UNITS.len() {
            value /= KILO;
            unit += 1;
        }
        write!(f, "{value:.3} {}", UNITS[unit])
    }
}

/// A transfer speed, held in decimal kilobytes per second.
///
/// Its own serde form is whole kilobytes per second, which is what speed limits use on the
/// wire. Rates the daemon reports in bytes per second go through
/// [`codec::speed_bytes`](crate::codec::speed_bytes) instead.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Speed {
    kilobytes_per_second: f64,
}

impl Speed {
    /// A speed in kilobytes per second.
    pub const fn from_kilobytes_per_second(kilobytes_per_second: f64) -> Self {
        Self {
            kilobytes_per_second,
        }
    }

    /// A speed in bytes per second.
    pub fn from_bytes_per_second(bytes_per_second: i64) -> Self {
        Self::from_kilobytes_per_second(bytes_per_second as f64 / KILO)
    }

    /// Kilobytes per second.
    pub const fn kilobytes_per_second(self) -> f64 {
        self.kilobytes_per_second
    }

    /// Bytes per second, rounded to the nearest byte.
    pub fn bytes_per_second(self) -> i64 {
        (self.kilobytes_per_second * KILO).round() as i64
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} KB/s", self.kilobytes_per_second)
    }
}

impl Serialize for Speed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.kilobytes_per_second.round() as i64)
    }
}

impl<'de> Deserialize<'de> for Speed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Self::from_kilobytes_per_second)
    }
}

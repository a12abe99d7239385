//! Custom wire encodings for individual fields, for use with `#[serde(with = "...")]`.
//!
//! Every module works on the bare value; its nested `optional` module does the same for an
//! [`Optional`](crate::Optional) field, which is how the field records use them:
//!
//! ```rust,ignore
//! use chrono::{DateTime, Utc};
//! use serde::{Deserialize, Serialize};
//! use transrpc_types::Optional;
//!
//! #[derive(Serialize, Deserialize)]
//! struct Sample {
//!     #[serde(
//!         rename = "addedDate",
//!         default,
//!         skip_serializing_if = "Optional::is_absent",
//!         with = "transrpc_types::codec::epoch::optional"
//!     )]
//!     added: Optional<DateTime<Utc>>,
//! }
//! ```

/// Generates the `optional` adapter for the enclosing codec module. The enclosing module
/// declares the codec's value type as `Value`.
macro_rules! optional_adapter {
    () => {
        /// The same encoding for an [`Optional`](crate::Optional) field. The field must also
        /// carry `default` and `skip_serializing_if = "Optional::is_absent"`.
        pub mod optional {
            use serde::{Deserializer, Serializer, ser};

            use crate::optional::{ABSENT_FIELD, Optional};

            /// Encodes a present value; absent values must have been skipped.
            pub fn serialize<S: Serializer>(
                value: &Optional<super::Value>,
                serializer: S,
            ) -> Result<S::Ok, S::Error> {
                match value {
                    Optional::Present(value) => super::serialize(value, serializer),
                    Optional::Absent => Err(ser::Error::custom(ABSENT_FIELD)),
                }
            }

            /// Decodes a key that is present on the wire.
            pub fn deserialize<'de, D: Deserializer<'de>>(
                deserializer: D,
            ) -> Result<Optional<super::Value>, D::Error> {
                super::deserialize(deserializer).map(Optional::Present)
            }
        }
    };
}

/// Whole seconds since the Unix epoch.
pub mod epoch {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    type Value = DateTime<Utc>;

    /// Encodes as seconds since the epoch.
    pub fn serialize<S: Serializer>(value: &Value, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.timestamp())
    }

    /// Decodes from seconds since the epoch.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
        let seconds = i64::deserialize(deserializer)?;
        DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| de::Error::custom(format!("timestamp {seconds} is out of range")))
    }

    optional_adapter!();
}

/// A whole number of seconds. Negative values are kept; the daemon uses them as
/// "unknown" markers in fields such as `eta`.
pub mod duration {
    use chrono::TimeDelta;
    use serde::{Deserialize, Deserializer, Serializer, de};

    type Value = TimeDelta;

    /// Encodes as whole seconds.
    pub fn serialize<S: Serializer>(value: &Value, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.num_seconds())
    }

    /// Decodes from whole seconds.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
        let seconds = i64::deserialize(deserializer)?;
        TimeDelta::try_seconds(seconds)
            .ok_or_else(|| de::Error::custom(format!("duration {seconds}s is out of range")))
    }

    optional_adapter!();
}

/// Minutes past midnight, `0..1440`, as a time of day.
pub mod minutes {
    use chrono::{NaiveTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer, de};

    type Value = NaiveTime;

    const MINUTES_PER_DAY: u32 = 24 * 60;

    /// Encodes as `hour * 60 + minute`; seconds are dropped.
    pub fn serialize<S: Serializer>(value: &Value, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(value.hour() * 60 + value.minute())
    }

    /// Decodes from minutes past midnight.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
        let minutes = u32::deserialize(deserializer)?;
        if minutes >= MINUTES_PER_DAY {
            return Err(de::Error::custom(format!(
                "{minutes} is not a minute of the day"
            )));
        }
        NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
            .ok_or_else(|| de::Error::custom(format!("{minutes} is not a minute of the day")))
    }

    optional_adapter!();
}

/// A rate in bytes per second, held as [`Speed`](crate::Speed).
pub mod speed_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::units::Speed;

    type Value = Speed;

    /// Encodes as bytes per second, rounded to the nearest byte.
    pub fn serialize<S: Serializer>(value: &Value, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.bytes_per_second())
    }

    /// Decodes from bytes per second.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
        i64::deserialize(deserializer).map(Speed::from_bytes_per_second)
    }

    optional_adapter!();
}

/// A base64 string whose bytes form a bitset, most significant bit first.
pub mod bitset_base64 {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer, de};

    use crate::bitset::Bitset;

    type Value = Bitset;

    /// Encodes the packed bytes as standard padded base64.
    pub fn serialize<S: Serializer>(value: &Value, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(value.to_bytes()))
    }

    /// Decodes standard base64 into a bitset.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD
            .decode(text.as_bytes())
            .map(Bitset::from_bytes)
            .map_err(|e| de::Error::custom(format!("invalid base64 bitset: {e}")))
    }

    optional_adapter!();
}

/// An array with one `0` or `1` per bit. Booleans are accepted on decode as well, since newer
/// daemons send them for the same fields.
pub mod bitset_bits {
    use serde::{Deserialize, Deserializer, Serializer, de, ser::SerializeSeq};

    use crate::bitset::Bitset;

    type Value = Bitset;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Bit {
        Int(i64),
        Bool(bool),
    }

    /// Encodes one integer per bit.
    pub fn serialize<S: Serializer>(value: &Value, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(value.len()))?;
        for index in 0..value.len() {
            seq.serialize_element(&u8::from(value.get(index)))?;
        }
        seq.end()
    }

    /// Decodes an array of `0`/`1` (or booleans).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
        let bits = Vec::<Bit>::deserialize(deserializer)?;
        bits.into_iter()
            .enumerate()
            .map(|(index, bit)| match bit {
                Bit::Int(0) | Bit::Bool(false) => Ok(false),
                Bit::Int(1) | Bit::Bool(true) => Ok(true),
                Bit::Int(other) => Err(de::Error::custom(format!(
                    "bit {index} has value {other}, expected 0 or 1"
                ))),
            })
            .collect()
    }

    optional_adapter!();
}

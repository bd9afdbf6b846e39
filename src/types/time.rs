//! Point-in-time values such as transaction expiration
//!
//! JSON uses `YYYY-MM-DDTHH:MM:SS` in UTC with no zone suffix. The wire form
//! is seconds since the Unix epoch as a little-endian u32.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::encoding::{Encode, Encoder};
use crate::error::{CodecError, Result};

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A UTC timestamp with whole-second precision on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(DateTime<Utc>);

impl Time {
    pub fn new(time: DateTime<Utc>) -> Self {
        Self(time)
    }

    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Build from seconds since the Unix epoch
    pub fn from_unix(seconds: i64) -> Result<Self> {
        Utc.timestamp_opt(seconds, 0)
            .single()
            .map(Self)
            .ok_or(CodecError::InvalidTimestamp(seconds))
    }

    /// Now plus `seconds`, truncated to whole seconds; the usual way to pick
    /// an expiration
    pub fn from_now(seconds: i64) -> Result<Self> {
        Utc::now()
            .timestamp()
            .checked_add(seconds)
            .ok_or(CodecError::InvalidTimestamp(seconds))
            .and_then(|target| {
                Self::from_unix(target).map_err(|_| CodecError::InvalidTimestamp(seconds))
            })
    }

    pub fn unix_seconds(&self) -> i64 {
        self.0.timestamp()
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    pub fn parse(text: &str) -> Result<Self> {
        let naive = NaiveDateTime::parse_from_str(text, TIME_FORMAT)
            .map_err(|e| CodecError::Decode(format!("invalid time {:?}: {}", text, e)))?;
        Ok(Self(Utc.from_utc_datetime(&naive)))
    }
}

impl From<DateTime<Utc>> for Time {
    fn from(time: DateTime<Utc>) -> Self {
        Self(time)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIME_FORMAT))
    }
}

impl Encode for Time {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        let seconds = self.unix_seconds();
        let seconds = u32::try_from(seconds).map_err(|_| CodecError::InvalidTimestamp(seconds))?;
        enc.encode(&seconds)
    }
}

impl Serialize for Time {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

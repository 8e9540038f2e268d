//! Document version token
//!
//! Every document revision is stamped with an [`Etag`]. Writes that carry an
//! expected Etag only succeed while the server still holds that revision,
//! which is how optimistic concurrency works end to end.
//!
//! ## Layout
//!
//! 16 opaque bytes. Servers fill them as two big-endian counters:
//!
//! ```text
//! [ restarts: u64 BE ][ changes: u64 BE ]
//! ```
//!
//! so byte-wise comparison equals (restarts, changes) comparison. Clients
//! should only ever rely on equality; ordering is exposed for sorting.
//!
//! ## Text form
//!
//! The 8-4-4-4-12 hexadecimal form used on the wire:
//! `01000000-0000-0001-0000-000000000005`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::EtagParseError;

/// Opaque, totally ordered 16-byte version token
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Etag([u8; 16]);

impl Etag {
    /// The all-zero Etag; never assigned to a stored document
    pub const EMPTY: Etag = Etag([0u8; 16]);

    /// Build an Etag from its two counters
    pub const fn new(restarts: u64, changes: u64) -> Self {
        let r = restarts.to_be_bytes();
        let c = changes.to_be_bytes();
        Etag([
            r[0], r[1], r[2], r[3], r[4], r[5], r[6], r[7], c[0], c[1], c[2], c[3], c[4], c[5],
            c[6], c[7],
        ])
    }

    /// Wrap raw bytes
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Etag(bytes)
    }

    /// A random Etag.
    ///
    /// Useful as an expected version that will never match a stored one.
    pub fn random() -> Self {
        Etag(*Uuid::new_v4().as_bytes())
    }

    /// Raw bytes
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// High counter (server restarts)
    pub fn restarts(&self) -> u64 {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&self.0[..8]);
        u64::from_be_bytes(buf)
    }

    /// Low counter (changes since restart)
    pub fn changes(&self) -> u64 {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&self.0[8..]);
        u64::from_be_bytes(buf)
    }

    /// Next Etag in the same restart epoch
    ///
    /// Saturates instead of wrapping, so the result is never smaller.
    pub fn increment(&self) -> Self {
        Etag::new(self.restarts(), self.changes().saturating_add(1))
    }

    /// True for [`Etag::EMPTY`]
    pub fn is_empty(&self) -> bool {
        self.0 == [0u8; 16]
    }
}

impl fmt::Display for Etag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Uuid::from_bytes(self.0).hyphenated(), f)
    }
}

impl fmt::Debug for Etag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Etag({})", self)
    }
}

impl FromStr for Etag {
    type Err = EtagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(|u| Etag(*u.as_bytes()))
            .map_err(|e| EtagParseError {
                input: s.to_string(),
                reason: e.to_string(),
            })
    }
}

impl From<Uuid> for Etag {
    fn from(u: Uuid) -> Self {
        Etag(*u.as_bytes())
    }
}

impl Serialize for Etag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Etag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

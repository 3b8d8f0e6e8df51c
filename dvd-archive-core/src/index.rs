//! Typed indices.
//!
//! DVD structures are full of small integers that number different things:
//! titles within a title set, titles across the whole disc, program chains,
//! cells, buttons, palette entries, sectors. [`Index<T>`] tags such a number
//! with the kind of thing it counts, so an index into one collection cannot
//! be used to look up an element of another.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An integer index tagged at the type level with the element it indexes.
///
/// The tag is only a marker and is never instantiated. Serialized as the bare
/// integer.
pub struct Index<T> {
    raw: u32,
    marker: PhantomData<fn() -> T>,
}

impl<T> Index<T> {
    pub const fn new(raw: u32) -> Self {
        Self {
            raw,
            marker: PhantomData,
        }
    }

    pub const fn get(self) -> u32 {
        self.raw
    }

    /// Numeric distance from `self` to `other` (negative when `other` comes first).
    pub fn distance_to(self, other: Self) -> i64 {
        i64::from(other.raw) - i64::from(self.raw)
    }
}

impl<T> From<u32> for Index<T> {
    fn from(raw: u32) -> Self {
        Self::new(raw)
    }
}

impl<T> From<u16> for Index<T> {
    fn from(raw: u16) -> Self {
        Self::new(u32::from(raw))
    }
}

impl<T> From<u8> for Index<T> {
    fn from(raw: u8) -> Self {
        Self::new(u32::from(raw))
    }
}

// Manual impls: deriving would require `T: Clone`, `T: Eq`, ... on markers
// that are uninhabited.

impl<T> Clone for Index<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Index<T> {}

impl<T> PartialEq for Index<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Index<T> {}

impl<T> PartialOrd for Index<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Index<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<T> Hash for Index<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> fmt::Debug for Index<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.raw)
    }
}

impl<T> fmt::Display for Index<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.raw.fmt(f)
    }
}

impl<T> Serialize for Index<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.raw)
    }
}

impl<'de, T> Deserialize<'de> for Index<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(Self::new)
    }
}

// ---------------------------------------------------------------------------
// Markers for indexed things that have no model type of their own
// ---------------------------------------------------------------------------

/// A 2048-byte sector on the disc, relative to the start of its VOB set.
pub enum Sector {}

/// A stream number as presented to the user.
pub enum LogicalAudioStream {}

/// A subpicture stream number as presented to the user.
pub enum LogicalSubpictureStream {}

/// An audio substream number inside the multiplexed VOB data.
pub enum VobAudioStream {}

/// A subpicture substream number inside the multiplexed VOB data.
pub enum VobSubpictureStream {}

/// Disc-wide title numbering, as opposed to numbering within a title set.
pub enum AllTitles {}

/// One of the 16 general purpose registers of the DVD virtual machine.
pub enum GeneralRegister {}

/// An inclusive range of indices.
///
/// `std::ops::RangeInclusive` has no serde support for the bare-integer
/// representation, so ranges are stored as explicit bounds.
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct IndexRange<T> {
    pub start: Index<T>,
    pub end: Index<T>,
}

impl<T> IndexRange<T> {
    pub fn new(start: Index<T>, end: Index<T>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, index: Index<T>) -> bool {
        self.start <= index && index <= self.end
    }

    /// Number of indices covered, zero for an inverted range.
    pub fn len(&self) -> u64 {
        if self.end < self.start {
            0
        } else {
            u64::from(self.end.get() - self.start.get()) + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Clone for IndexRange<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for IndexRange<T> {}

impl<T> PartialEq for IndexRange<T> {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl<T> Eq for IndexRange<T> {}

impl<T> fmt::Debug for IndexRange<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

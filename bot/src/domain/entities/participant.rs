//! Participant domain entity
//!
//! A registered player with per-region rating records. Rating records are
//! synced into the participant document by the account-linking layer; this
//! crate only reads them.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Rating assumed for participants without a usable rating record,
/// used whenever ratings are averaged.
pub const DEFAULT_RATING: i32 = 750;

/// Unique identifier for a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantId(pub Uuid);

impl ParticipantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ParticipantId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Game region a rating record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Na,
    Eu,
    Kr,
    Ap,
}

impl Region {
    /// Fixed iteration order; primary-rating ties are broken by the first
    /// region encountered in this order.
    pub const ALL: [Region; 4] = [Region::Na, Region::Eu, Region::Kr, Region::Ap];
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Na => write!(f, "na"),
            Region::Eu => write!(f, "eu"),
            Region::Kr => write!(f, "kr"),
            Region::Ap => write!(f, "ap"),
        }
    }
}

impl std::str::FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "na" => Ok(Region::Na),
            "eu" => Ok(Region::Eu),
            "kr" => Ok(Region::Kr),
            "ap" => Ok(Region::Ap),
            _ => Err(format!("Unknown region: {}", s)),
        }
    }
}

/// One per-region rating record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub puuid: String,
    pub rating: i32,
    pub tier: i32,
    pub tier_name: String,
    pub display_name: String,
    pub tag: String,
}

/// A registered player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    /// The participant's account id on the chat platform (used for mentions)
    pub platform_id: String,
    pub display_name: String,
    #[serde(default)]
    pub ratings: HashMap<Region, RatingRecord>,
}

impl Participant {
    /// The rating record with the highest positive rating across regions.
    ///
    /// Regions are scanned in [`Region::ALL`] order and a record only
    /// replaces the current best when strictly greater, so ties keep the
    /// first region encountered.
    pub fn primary_rating(&self) -> Option<(Region, &RatingRecord)> {
        let mut best: Option<(Region, &RatingRecord)> = None;
        for region in Region::ALL {
            if let Some(record) = self.ratings.get(&region) {
                if record.rating > 0 && best.map_or(true, |(_, b)| record.rating > b.rating) {
                    best = Some((region, record));
                }
            }
        }
        best
    }

    /// Rating value used for averaging; falls back to [`DEFAULT_RATING`]
    /// when the participant has no usable record.
    pub fn effective_rating(&self) -> i32 {
        self.primary_rating()
            .map(|(_, r)| r.rating)
            .unwrap_or(DEFAULT_RATING)
    }

    /// Rating record for a specific region, if any.
    pub fn rating_in(&self, region: Region) -> Option<&RatingRecord> {
        self.ratings.get(&region)
    }
}

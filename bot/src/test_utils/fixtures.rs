//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use std::collections::HashMap;

use crate::domain::entities::{
    ChannelId, NewTournament, Participant, ParticipantId, RatingRecord, Region, Tournament,
};

/// Create a test participant with a 1000 EU rating
pub fn test_participant(name: &str) -> Participant {
    test_participant_rated(name, Region::Eu, 1000)
}

/// Create a test participant with a specific rating record
pub fn test_participant_rated(name: &str, region: Region, rating: i32) -> Participant {
    Participant {
        id: ParticipantId::new(),
        platform_id: format!("pid-{}", name),
        display_name: name.to_string(),
        ratings: HashMap::from([(
            region,
            RatingRecord {
                puuid: format!("puuid-{}", name),
                rating,
                tier: 12,
                tier_name: "Platinum 1".to_string(),
                display_name: name.to_string(),
                tag: "0001".to_string(),
            },
        )]),
    }
}

/// Create a test participant without any rating record
pub fn test_participant_unrated(name: &str) -> Participant {
    Participant {
        id: ParticipantId::new(),
        platform_id: format!("pid-{}", name),
        display_name: name.to_string(),
        ratings: HashMap::new(),
    }
}

/// Create a test tournament in the EU region with default capacity
pub fn test_tournament() -> Tournament {
    Tournament::create(NewTournament {
        name: "Friday Cup".to_string(),
        description: Some("Weekly sign-up cup".to_string()),
        region: Region::Eu,
        channel_id: ChannelId::from("chan-1"),
        capacity: None,
    })
}

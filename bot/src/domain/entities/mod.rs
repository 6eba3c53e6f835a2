//! Domain entities
//!
//! Core types owned by the business logic, independent of persistence and
//! the chat platform.

pub mod declaration;
pub mod participant;
pub mod premade;
pub mod tournament;
pub mod view;

pub use declaration::{PremadeDeclaration, MAX_PREMADE_TARGETS};
pub use participant::{Participant, ParticipantId, RatingRecord, Region, DEFAULT_RATING};
pub use premade::{GroupMember, MemberStatus, MergedGroup, RawPreferenceGroup};
pub use tournament::{NewTournament, Tournament, TournamentId, TEAM_CAPACITY};
pub use view::{
    ButtonStyle, ChannelId, Control, MessageId, Page, PageField, SelectOption, ViewState,
    FIELD_BUDGET, GROUP_BLOCKS_PER_PAGE, PAGE_BUDGET,
};

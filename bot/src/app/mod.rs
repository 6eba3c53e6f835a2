//! Application layer
//!
//! The premade grouping engine, the view synchronization pipeline, the
//! per-tournament render queue and the tournament operations service.

pub mod premade;
pub mod render_queue;
pub mod sync;
pub mod tournament;

pub use premade::{build_preference_groups, cluster_groups, premade_grouping};
pub use render_queue::{RenderExecutor, RenderQueue};
pub use sync::ViewSyncService;
pub use tournament::TournamentService;

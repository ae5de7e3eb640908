//! Repository implementations for cache operations.
//!
//! Each upsert is a single atomic insert-or-update statement; field-level
//! merge rules (replace vs. sticky) live in the SQL so that concurrent
//! writers race per-field, never per-row.

pub mod circle;
pub mod invitation;
pub mod member;
pub mod stats;
pub mod task;

pub use circle::CircleRepository;
pub use invitation::{
    calculate_expiration, generate_invitation_token, AcceptOutcome, InvitationRepository,
};
pub use member::MemberRepository;
pub use stats::{CircleTotals, StatsRepository};
pub use task::{TaskRepository, TaskUpsert};

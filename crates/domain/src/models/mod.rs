//! Domain models for the CareCircle cache.

pub mod circle;
pub mod invitation;
pub mod member;
pub mod stats;
pub mod task;

pub use circle::{CircleResponse, UpsertCircleRequest, UpsertCircleResponse};
pub use invitation::{
    AcceptInvitationRequest, AcceptInvitationResponse, InvitationResponse, InvitationStatus,
    InvitationSummary, ListInvitationsQuery, ListInvitationsResponse, SendInvitationRequest,
    SendInvitationResponse,
};
pub use member::{MemberResponse, UpsertMemberRequest, UpsertMemberResponse};
pub use stats::CircleStatsResponse;
pub use task::{TaskPriority, TaskResponse, UpsertTaskRequest, UpsertTaskResponse};

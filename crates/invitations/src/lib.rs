//! Invitation domain module.
//!
//! Closed vocabularies for tagging invitations (`InvitationStatus`,
//! `InvitationType`), the event-sourced `Invitation` aggregate that enforces the
//! status lifecycle, and an in-memory directory projection. Pure domain logic:
//! no IO, no HTTP, no storage.

pub mod directory;
pub mod invitation;
pub mod kind;
pub mod status;

pub use directory::{InvitationDirectory, InvitationReadModel};
pub use invitation::{
    AcceptInvitation, CancelInvitation, ExpireInvitation, Invitation, InvitationAccepted,
    InvitationCancelled, InvitationCommand, InvitationEvent, InvitationExpired, InvitationId,
    InvitationIssued, InvitationRejected, IssueInvitation, RejectInvitation, AGGREGATE_TYPE,
};
pub use kind::InvitationType;
pub use status::InvitationStatus;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use invitekit_core::{Aggregate, AggregateId, AggregateRoot, DomainError, TenantId, UserId};
use invitekit_events::{Command, Event};

use crate::kind::InvitationType;
use crate::status::InvitationStatus;

/// Aggregate type name used on envelopes.
pub const AGGREGATE_TYPE: &str = "invitations.invitation";

/// Invitation identifier (tenant-scoped via `tenant_id` fields in events/commands).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvitationId(pub AggregateId);

impl InvitationId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for InvitationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Aggregate root: an invitation extended to an employee, client or supplier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invitation {
    id: InvitationId,
    tenant_id: Option<TenantId>,
    kind: InvitationType,
    email: String,
    issued_by: Option<UserId>,
    expires_at: Option<DateTime<Utc>>,
    status: InvitationStatus,
    responded_at: Option<DateTime<Utc>>,
    version: u64,
    created: bool,
}

impl Invitation {
    /// Create an empty, not-yet-issued aggregate instance for rehydration.
    pub fn empty(id: InvitationId) -> Self {
        Self {
            id,
            tenant_id: None,
            kind: InvitationType::Employee,
            email: String::new(),
            issued_by: None,
            expires_at: None,
            status: InvitationStatus::Pending,
            responded_at: None,
            version: 0,
            created: false,
        }
    }

    /// Rebuild an invitation from its event history.
    pub fn from_history<'a>(
        id: InvitationId,
        events: impl IntoIterator<Item = &'a InvitationEvent>,
    ) -> Self {
        let mut invitation = Self::empty(id);
        invitation.replay(events);
        invitation
    }

    pub fn id_typed(&self) -> InvitationId {
        self.id
    }

    pub fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    pub fn kind(&self) -> InvitationType {
        self.kind
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn issued_by(&self) -> Option<UserId> {
        self.issued_by
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn status(&self) -> InvitationStatus {
        self.status
    }

    /// When the invitation left `Pending`, if it has.
    pub fn responded_at(&self) -> Option<DateTime<Utc>> {
        self.responded_at
    }

    pub fn is_issued(&self) -> bool {
        self.created
    }

    /// Whether the recipient can still act on this invitation at `now`.
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.created
            && self.status == InvitationStatus::Pending
            && self.expires_at.is_some_and(|expires_at| now < expires_at)
    }
}

impl AggregateRoot for Invitation {
    type Id = InvitationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: IssueInvitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueInvitation {
    pub tenant_id: TenantId,
    pub invitation_id: InvitationId,
    pub kind: InvitationType,
    pub email: String,
    pub issued_by: UserId,
    pub expires_at: DateTime<Utc>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AcceptInvitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptInvitation {
    pub tenant_id: TenantId,
    pub invitation_id: InvitationId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RejectInvitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectInvitation {
    pub tenant_id: TenantId,
    pub invitation_id: InvitationId,
    pub reason: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ExpireInvitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpireInvitation {
    pub tenant_id: TenantId,
    pub invitation_id: InvitationId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CancelInvitation (issuer side).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelInvitation {
    pub tenant_id: TenantId,
    pub invitation_id: InvitationId,
    pub cancelled_by: UserId,
    pub reason: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvitationCommand {
    IssueInvitation(IssueInvitation),
    AcceptInvitation(AcceptInvitation),
    RejectInvitation(RejectInvitation),
    ExpireInvitation(ExpireInvitation),
    CancelInvitation(CancelInvitation),
}

impl Command for InvitationCommand {
    fn target_aggregate_id(&self) -> AggregateId {
        let id = match self {
            InvitationCommand::IssueInvitation(c) => c.invitation_id,
            InvitationCommand::AcceptInvitation(c) => c.invitation_id,
            InvitationCommand::RejectInvitation(c) => c.invitation_id,
            InvitationCommand::ExpireInvitation(c) => c.invitation_id,
            InvitationCommand::CancelInvitation(c) => c.invitation_id,
        };
        id.0
    }
}

/// Event: InvitationIssued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationIssued {
    pub tenant_id: TenantId,
    pub invitation_id: InvitationId,
    pub kind: InvitationType,
    pub email: String,
    pub issued_by: UserId,
    pub expires_at: DateTime<Utc>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: InvitationAccepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationAccepted {
    pub tenant_id: TenantId,
    pub invitation_id: InvitationId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: InvitationRejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationRejected {
    pub tenant_id: TenantId,
    pub invitation_id: InvitationId,
    pub reason: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: InvitationExpired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationExpired {
    pub tenant_id: TenantId,
    pub invitation_id: InvitationId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: InvitationCancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationCancelled {
    pub tenant_id: TenantId,
    pub invitation_id: InvitationId,
    pub cancelled_by: UserId,
    pub reason: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvitationEvent {
    InvitationIssued(InvitationIssued),
    InvitationAccepted(InvitationAccepted),
    InvitationRejected(InvitationRejected),
    InvitationExpired(InvitationExpired),
    InvitationCancelled(InvitationCancelled),
}

impl InvitationEvent {
    pub fn tenant_id(&self) -> TenantId {
        match self {
            InvitationEvent::InvitationIssued(e) => e.tenant_id,
            InvitationEvent::InvitationAccepted(e) => e.tenant_id,
            InvitationEvent::InvitationRejected(e) => e.tenant_id,
            InvitationEvent::InvitationExpired(e) => e.tenant_id,
            InvitationEvent::InvitationCancelled(e) => e.tenant_id,
        }
    }

    pub fn invitation_id(&self) -> InvitationId {
        match self {
            InvitationEvent::InvitationIssued(e) => e.invitation_id,
            InvitationEvent::InvitationAccepted(e) => e.invitation_id,
            InvitationEvent::InvitationRejected(e) => e.invitation_id,
            InvitationEvent::InvitationExpired(e) => e.invitation_id,
            InvitationEvent::InvitationCancelled(e) => e.invitation_id,
        }
    }

    /// Status the invitation is in once this event has been applied.
    pub fn resulting_status(&self) -> InvitationStatus {
        match self {
            InvitationEvent::InvitationIssued(_) => InvitationStatus::Pending,
            InvitationEvent::InvitationAccepted(_) => InvitationStatus::Accepted,
            InvitationEvent::InvitationRejected(_) => InvitationStatus::Rejected,
            InvitationEvent::InvitationExpired(_) => InvitationStatus::Expired,
            InvitationEvent::InvitationCancelled(_) => InvitationStatus::Cancelled,
        }
    }
}

impl Event for InvitationEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InvitationEvent::InvitationIssued(_) => "invitations.invitation.issued",
            InvitationEvent::InvitationAccepted(_) => "invitations.invitation.accepted",
            InvitationEvent::InvitationRejected(_) => "invitations.invitation.rejected",
            InvitationEvent::InvitationExpired(_) => "invitations.invitation.expired",
            InvitationEvent::InvitationCancelled(_) => "invitations.invitation.cancelled",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            InvitationEvent::InvitationIssued(e) => e.occurred_at,
            InvitationEvent::InvitationAccepted(e) => e.occurred_at,
            InvitationEvent::InvitationRejected(e) => e.occurred_at,
            InvitationEvent::InvitationExpired(e) => e.occurred_at,
            InvitationEvent::InvitationCancelled(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Invitation {
    type Command = InvitationCommand;
    type Event = InvitationEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            InvitationEvent::InvitationIssued(e) => {
                self.tenant_id = Some(e.tenant_id);
                self.kind = e.kind;
                self.email = e.email.clone();
                self.issued_by = Some(e.issued_by);
                self.expires_at = Some(e.expires_at);
                self.responded_at = None;
                self.created = true;
            }
            InvitationEvent::InvitationAccepted(e) => self.responded_at = Some(e.occurred_at),
            InvitationEvent::InvitationRejected(e) => self.responded_at = Some(e.occurred_at),
            InvitationEvent::InvitationExpired(e) => self.responded_at = Some(e.occurred_at),
            InvitationEvent::InvitationCancelled(e) => self.responded_at = Some(e.occurred_at),
        }
        self.status = event.resulting_status();

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            InvitationCommand::IssueInvitation(cmd) => self.handle_issue(cmd),
            InvitationCommand::AcceptInvitation(cmd) => self.handle_accept(cmd),
            InvitationCommand::RejectInvitation(cmd) => self.handle_reject(cmd),
            InvitationCommand::ExpireInvitation(cmd) => self.handle_expire(cmd),
            InvitationCommand::CancelInvitation(cmd) => self.handle_cancel(cmd),
        }
    }
}

impl Invitation {
    /// Common guard for every command that acts on an issued invitation.
    fn ensure_target(
        &self,
        tenant_id: TenantId,
        invitation_id: InvitationId,
    ) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        if self.tenant_id != Some(tenant_id) {
            return Err(DomainError::invariant("tenant mismatch"));
        }
        if self.id != invitation_id {
            return Err(DomainError::invariant("invitation_id mismatch"));
        }
        Ok(())
    }

    fn ensure_transition(&self, next: InvitationStatus) -> Result<(), DomainError> {
        if self.status.can_transition_to(next) {
            return Ok(());
        }
        tracing::debug!(
            invitation_id = %self.id,
            from = %self.status,
            to = %next,
            "rejected invitation status transition"
        );
        Err(DomainError::conflict(format!("invitation is {}", self.status)))
    }

    fn ensure_not_expired(&self, at: DateTime<Utc>) -> Result<(), DomainError> {
        match self.expires_at {
            Some(expires_at) if at >= expires_at => {
                tracing::debug!(
                    invitation_id = %self.id,
                    %expires_at,
                    %at,
                    "response after expiry"
                );
                Err(DomainError::conflict("invitation has expired"))
            }
            _ => Ok(()),
        }
    }

    fn handle_issue(&self, cmd: &IssueInvitation) -> Result<Vec<InvitationEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("invitation already issued"));
        }
        if self.id != cmd.invitation_id {
            return Err(DomainError::invariant("invitation_id mismatch"));
        }

        let email = cmd.email.trim();
        if email.is_empty() {
            return Err(DomainError::validation("email cannot be empty"));
        }
        if !email.contains('@') {
            return Err(DomainError::validation("email must contain '@'"));
        }
        if cmd.expires_at <= cmd.occurred_at {
            return Err(DomainError::validation(
                "expires_at must be after the issue time",
            ));
        }

        Ok(vec![InvitationEvent::InvitationIssued(InvitationIssued {
            tenant_id: cmd.tenant_id,
            invitation_id: cmd.invitation_id,
            kind: cmd.kind,
            email: email.to_string(),
            issued_by: cmd.issued_by,
            expires_at: cmd.expires_at,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_accept(&self, cmd: &AcceptInvitation) -> Result<Vec<InvitationEvent>, DomainError> {
        self.ensure_target(cmd.tenant_id, cmd.invitation_id)?;
        self.ensure_transition(InvitationStatus::Accepted)?;
        self.ensure_not_expired(cmd.occurred_at)?;

        Ok(vec![InvitationEvent::InvitationAccepted(InvitationAccepted {
            tenant_id: cmd.tenant_id,
            invitation_id: cmd.invitation_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_reject(&self, cmd: &RejectInvitation) -> Result<Vec<InvitationEvent>, DomainError> {
        self.ensure_target(cmd.tenant_id, cmd.invitation_id)?;
        self.ensure_transition(InvitationStatus::Rejected)?;
        self.ensure_not_expired(cmd.occurred_at)?;

        Ok(vec![InvitationEvent::InvitationRejected(InvitationRejected {
            tenant_id: cmd.tenant_id,
            invitation_id: cmd.invitation_id,
            reason: cmd.reason.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_expire(&self, cmd: &ExpireInvitation) -> Result<Vec<InvitationEvent>, DomainError> {
        self.ensure_target(cmd.tenant_id, cmd.invitation_id)?;
        self.ensure_transition(InvitationStatus::Expired)?;

        if self.expires_at.is_some_and(|expires_at| cmd.occurred_at < expires_at) {
            return Err(DomainError::validation(
                "invitation has not reached its expiry time",
            ));
        }

        Ok(vec![InvitationEvent::InvitationExpired(InvitationExpired {
            tenant_id: cmd.tenant_id,
            invitation_id: cmd.invitation_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_cancel(&self, cmd: &CancelInvitation) -> Result<Vec<InvitationEvent>, DomainError> {
        self.ensure_target(cmd.tenant_id, cmd.invitation_id)?;
        self.ensure_transition(InvitationStatus::Cancelled)?;

        Ok(vec![InvitationEvent::InvitationCancelled(InvitationCancelled {
            tenant_id: cmd.tenant_id,
            invitation_id: cmd.invitation_id,
            cancelled_by: cmd.cancelled_by,
            reason: cmd.reason.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }
}

//! Tenant-isolated invitation directory (read model).

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use invitekit_core::{AggregateId, TenantId, UserId};
use invitekit_events::{Event, EventEnvelope, Projection};

use crate::invitation::{InvitationEvent, InvitationId};
use crate::kind::InvitationType;
use crate::status::InvitationStatus;

/// Queryable invitation row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationReadModel {
    pub invitation_id: InvitationId,
    pub kind: InvitationType,
    pub email: String,
    pub issued_by: UserId,
    pub status: InvitationStatus,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tenant+aggregate cursor for at-least-once delivery.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
struct CursorKey {
    tenant_id: TenantId,
    aggregate_id: AggregateId,
}

/// Invitation directory projection.
///
/// Rows are keyed by tenant first, so a query can never see another tenant's
/// invitations. Each (tenant, invitation) stream is applied strictly in order:
/// envelopes at or below the cursor are duplicates and skipped, envelopes past
/// `cursor + 1` are held back until the missing ones arrive.
#[derive(Debug, Default)]
pub struct InvitationDirectory {
    rows: HashMap<TenantId, HashMap<InvitationId, InvitationReadModel>>,
    cursors: HashMap<CursorKey, u64>,
}

impl InvitationDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &self,
        tenant_id: TenantId,
        invitation_id: InvitationId,
    ) -> Option<&InvitationReadModel> {
        self.rows.get(&tenant_id)?.get(&invitation_id)
    }

    /// All invitations of a tenant, oldest issue first.
    pub fn list(&self, tenant_id: TenantId) -> Vec<&InvitationReadModel> {
        let mut rows: Vec<_> = self
            .rows
            .get(&tenant_id)
            .map(|rows| rows.values().collect())
            .unwrap_or_default();
        rows.sort_by_key(|row| (row.issued_at, row.invitation_id.0.to_string()));
        rows
    }

    pub fn by_status(
        &self,
        tenant_id: TenantId,
        status: InvitationStatus,
    ) -> Vec<&InvitationReadModel> {
        self.list(tenant_id)
            .into_iter()
            .filter(|row| row.status == status)
            .collect()
    }

    pub fn by_kind(
        &self,
        tenant_id: TenantId,
        kind: InvitationType,
    ) -> Vec<&InvitationReadModel> {
        self.list(tenant_id)
            .into_iter()
            .filter(|row| row.kind == kind)
            .collect()
    }

    /// Count per status; every status is present, zeros included.
    pub fn count_by_status(&self, tenant_id: TenantId) -> BTreeMap<&'static str, usize> {
        let mut counts: BTreeMap<&'static str, usize> = InvitationStatus::ALL
            .into_iter()
            .map(|status| (status.as_str(), 0))
            .collect();
        if let Some(rows) = self.rows.get(&tenant_id) {
            for row in rows.values() {
                *counts.entry(row.status.as_str()).or_default() += 1;
            }
        }
        counts
    }

    /// Drop every row and cursor of a tenant so its streams can be replayed.
    pub fn reset_tenant(&mut self, tenant_id: TenantId) {
        self.rows.remove(&tenant_id);
        self.cursors.retain(|key, _| key.tenant_id != tenant_id);
    }
}

impl Projection for InvitationDirectory {
    type Ev = InvitationEvent;

    fn apply(&mut self, envelope: &EventEnvelope<Self::Ev>) {
        let tenant_id = envelope.tenant_id();
        let event = envelope.payload();

        if event.tenant_id() != tenant_id {
            tracing::warn!(
                envelope_tenant = %tenant_id,
                payload_tenant = %event.tenant_id(),
                event_id = %envelope.event_id(),
                "dropping invitation event with mismatched tenant"
            );
            return;
        }

        let aggregate_id = envelope.aggregate_id();
        if event.invitation_id().0 != aggregate_id {
            tracing::warn!(
                %aggregate_id,
                payload_invitation = %event.invitation_id(),
                event_id = %envelope.event_id(),
                "dropping invitation event whose payload does not match its stream"
            );
            return;
        }

        let key = CursorKey {
            tenant_id,
            aggregate_id,
        };
        let seq = envelope.sequence_number();
        let last = self.cursors.get(&key).copied().unwrap_or(0);
        if seq == 0 {
            tracing::warn!(%aggregate_id, "invitation event with sequence number 0");
            return;
        }
        if seq <= last {
            tracing::debug!(
                %aggregate_id,
                sequence_number = seq,
                last,
                "skipping already applied invitation event"
            );
            return;
        }
        // Streams start at 1 and must be applied without gaps.
        if seq != last + 1 {
            tracing::warn!(
                %aggregate_id,
                sequence_number = seq,
                last,
                "non-monotonic sequence number; holding cursor"
            );
            return;
        }

        let rows = self.rows.entry(tenant_id).or_default();
        match event {
            InvitationEvent::InvitationIssued(e) => {
                rows.insert(
                    e.invitation_id,
                    InvitationReadModel {
                        invitation_id: e.invitation_id,
                        kind: e.kind,
                        email: e.email.clone(),
                        issued_by: e.issued_by,
                        status: InvitationStatus::Pending,
                        issued_at: e.occurred_at,
                        expires_at: e.expires_at,
                        updated_at: e.occurred_at,
                    },
                );
            }
            other => match rows.get_mut(&other.invitation_id()) {
                Some(row) => {
                    row.status = other.resulting_status();
                    row.updated_at = other.occurred_at();
                }
                None => {
                    tracing::warn!(
                        invitation_id = %other.invitation_id(),
                        "status change for unknown invitation"
                    );
                    return;
                }
            },
        }

        self.cursors.insert(key, seq);
        tracing::trace!(
            %aggregate_id,
            sequence_number = seq,
            "applied invitation event"
        );
    }
}

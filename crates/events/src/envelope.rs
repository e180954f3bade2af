use serde::{Deserialize, Serialize};
use uuid::Uuid;

use invitekit_core::{AggregateId, TenantId};

/// Envelope for an event, carrying tenant and stream metadata.
///
/// This is the unit appended to an event stream. `sequence_number` starts at 1
/// and grows by one per event within a single aggregate stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,
    tenant_id: TenantId,

    aggregate_id: AggregateId,
    aggregate_type: String,

    sequence_number: u64,

    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        event_id: Uuid,
        tenant_id: TenantId,
        aggregate_id: AggregateId,
        aggregate_type: impl Into<String>,
        sequence_number: u64,
        payload: E,
    ) -> Self {
        Self {
            event_id,
            tenant_id,
            aggregate_id,
            aggregate_type: aggregate_type.into(),
            sequence_number,
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    pub fn aggregate_id(&self) -> AggregateId {
        self.aggregate_id
    }

    pub fn aggregate_type(&self) -> &str {
        &self.aggregate_type
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}



impl<E: crate::Event> EventEnvelope<E> {
    /// Wrap a stream of freshly decided events, numbering them after `current_version`.
    pub fn wrap_all(
        tenant_id: TenantId,
        aggregate_id: AggregateId,
        aggregate_type: &str,
        current_version: u64,
        events: Vec<E>,
    ) -> Vec<Self> {
        events
            .into_iter()
            .zip(current_version + 1..)
            .map(|(payload, sequence_number)| {
                Self::new(
                    Uuid::now_v7(),
                    tenant_id,
                    aggregate_id,
                    aggregate_type,
                    sequence_number,
                    payload,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Event;
    use chrono::{DateTime, Utc};

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct Pinged {
        at: DateTime<Utc>,
    }

    impl Event for Pinged {
        fn event_type(&self) -> &'static str {
            "test.pinged"
        }

        fn version(&self) -> u32 {
            1
        }

        fn occurred_at(&self) -> DateTime<Utc> {
            self.at
        }
    }

    #[test]
    fn wrap_all_numbers_events_after_current_version() {
        let tenant_id = TenantId::new();
        let aggregate_id = AggregateId::new();
        let now = Utc::now();
        let events = vec![Pinged { at: now }, Pinged { at: now }];

        let envelopes = EventEnvelope::wrap_all(tenant_id, aggregate_id, "test", 4, events);

        let seqs: Vec<u64> = envelopes.iter().map(|e| e.sequence_number()).collect();
        assert_eq!(seqs, vec![5, 6]);
        assert!(envelopes.iter().all(|e| e.tenant_id() == tenant_id));
        assert!(envelopes.iter().all(|e| e.aggregate_type() == "test"));
        assert_ne!(envelopes[0].event_id(), envelopes[1].event_id());
    }

    #[test]
    fn envelope_survives_json() {
        let envelope = EventEnvelope::new(
            Uuid::now_v7(),
            TenantId::new(),
            AggregateId::new(),
            "test",
            1,
            Pinged { at: Utc::now() },
        );

        let json = serde_json::to_string(&envelope).unwrap();
        let back: EventEnvelope<Pinged> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, envelope);
    }
}

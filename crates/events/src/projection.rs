use crate::{Event, EventEnvelope};

/// A projection folds an append-only event stream into a read model.
///
/// `apply` must be idempotent: at-least-once delivery means the same envelope
/// can arrive more than once. Read models are disposable and can always be
/// rebuilt by replaying envelopes from sequence number 1.
pub trait Projection {
    type Ev: Event;

    fn apply(&mut self, envelope: &EventEnvelope<Self::Ev>);

    /// Apply a batch of envelopes in order.
    fn apply_all<'a, I>(&mut self, envelopes: I)
    where
        I: IntoIterator<Item = &'a EventEnvelope<Self::Ev>>,
    {
        for envelope in envelopes {
            self.apply(envelope);
        }
    }
}

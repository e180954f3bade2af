//! Aggregate traits for event-sourced domain models.

use crate::error::{DomainError, DomainResult};

/// Aggregate root: identity plus a stream version.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;

    /// Number of events applied to this instance so far.
    fn version(&self) -> u64;
}

/// Optimistic concurrency expectation for an aggregate.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip version checking.
    Any,
    /// Require the aggregate to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }

    pub fn check(self, actual: u64) -> DomainResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(DomainError::conflict(format!(
                "optimistic concurrency check failed (expected: {self:?}, actual: {actual})"
            )))
        }
    }
}

/// Aggregate execution semantics.
///
/// - `handle(&self, cmd)` decides which events to emit and never mutates.
/// - `apply(&mut self, event)` evolves state and must be deterministic.
///
/// No IO happens inside an aggregate.
pub trait Aggregate: AggregateRoot {
    type Command: Clone + core::fmt::Debug;
    type Event: Clone + core::fmt::Debug;
    type Error: core::fmt::Debug;

    /// Evolve in-memory state from a single event (+1 version per event).
    fn apply(&mut self, event: &Self::Event);

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error>;

    /// `handle`, guarded by an optimistic concurrency expectation.
    fn handle_expecting(
        &self,
        expected: ExpectedVersion,
        command: &Self::Command,
    ) -> Result<Vec<Self::Event>, Self::Error>
    where
        Self::Error: From<DomainError>,
    {
        expected.check(self.version())?;
        self.handle(command)
    }

    /// Replay a history of events onto `self`.
    fn replay<'a, I>(&mut self, events: I)
    where
        I: IntoIterator<Item = &'a Self::Event>,
        Self::Event: 'a,
    {
        for event in events {
            self.apply(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_matches_every_version() {
        assert!(ExpectedVersion::Any.matches(0));
        assert!(ExpectedVersion::Any.matches(42));
        assert!(ExpectedVersion::Any.check(7).is_ok());
    }

    #[test]
    fn exact_rejects_stale_version_with_conflict() {
        assert!(ExpectedVersion::Exact(3).check(3).is_ok());

        let err = ExpectedVersion::Exact(3).check(4).unwrap_err();
        match err {
            DomainError::Conflict(msg) => assert!(msg.contains("actual: 4")),
            other => panic!("expected Conflict, got {other:?}"),
        }
    }
}

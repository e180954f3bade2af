//! Invitation lifecycle status.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use invitekit_core::DomainError;

/// Where an invitation sits in its lifecycle.
///
/// Closed set. `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitationStatus {
    /// Awaiting the recipient's decision.
    Pending,
    /// The recipient accepted.
    Accepted,
    /// The recipient declined.
    Rejected,
    /// The validity window elapsed without a decision.
    Expired,
    /// The issuer withdrew the invitation before a decision.
    Cancelled,
}

impl InvitationStatus {
    pub const ALL: [InvitationStatus; 5] = [
        InvitationStatus::Pending,
        InvitationStatus::Accepted,
        InvitationStatus::Rejected,
        InvitationStatus::Expired,
        InvitationStatus::Cancelled,
    ];

    /// Canonical textual tag, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "PENDING",
            InvitationStatus::Accepted => "ACCEPTED",
            InvitationStatus::Rejected => "REJECTED",
            InvitationStatus::Expired => "EXPIRED",
            InvitationStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, InvitationStatus::Pending)
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    ///
    /// Only `Pending` has outgoing edges; staying in place is not a transition.
    pub fn can_transition_to(&self, next: InvitationStatus) -> bool {
        matches!(
            (self, next),
            (
                InvitationStatus::Pending,
                InvitationStatus::Accepted
                    | InvitationStatus::Rejected
                    | InvitationStatus::Expired
                    | InvitationStatus::Cancelled
            )
        )
    }

    /// Allowed targets from this status, in `ALL` order.
    pub fn next_states(&self) -> Vec<InvitationStatus> {
        Self::ALL
            .into_iter()
            .filter(|next| self.can_transition_to(*next))
            .collect()
    }
}

impl core::fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvitationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::unknown_value("InvitationStatus", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn all_is_exactly_the_five_statuses() {
        let tags: Vec<&str> = InvitationStatus::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            tags,
            vec!["PENDING", "ACCEPTED", "REJECTED", "EXPIRED", "CANCELLED"]
        );

        let unique: HashSet<_> = InvitationStatus::ALL.into_iter().collect();
        assert_eq!(unique.len(), 5);
    }

    #[test]
    fn every_status_round_trips_through_text_and_json() {
        for status in InvitationStatus::ALL {
            let text = status.to_string();
            assert_eq!(text.parse::<InvitationStatus>().unwrap(), status);

            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{text}\""));
            let back: InvitationStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn accepted_encodes_and_decodes_to_itself() {
        let text = InvitationStatus::Accepted.to_string();
        assert_eq!(text, "ACCEPTED");
        assert_eq!(
            "ACCEPTED".parse::<InvitationStatus>().unwrap(),
            InvitationStatus::Accepted
        );
    }

    #[test]
    fn unknown_tags_are_rejected() {
        for input in ["", "OPEN", "accepted", "Accepted", " PENDING", "PENDING "] {
            let err = input.parse::<InvitationStatus>().unwrap_err();
            assert_eq!(err, DomainError::unknown_value("InvitationStatus", input));
        }

        assert!(serde_json::from_str::<InvitationStatus>("\"DECLINED\"").is_err());
        assert!(serde_json::from_str::<InvitationStatus>("0").is_err());
    }

    #[test]
    fn only_pending_is_non_terminal() {
        let open: Vec<_> = InvitationStatus::ALL
            .into_iter()
            .filter(|s| !s.is_terminal())
            .collect();
        assert_eq!(open, vec![InvitationStatus::Pending]);
    }

    #[test]
    fn pending_can_reach_every_terminal_state() {
        assert_eq!(
            InvitationStatus::Pending.next_states(),
            vec![
                InvitationStatus::Accepted,
                InvitationStatus::Rejected,
                InvitationStatus::Expired,
                InvitationStatus::Cancelled,
            ]
        );
    }

    #[test]
    fn terminal_states_have_no_way_out() {
        for status in InvitationStatus::ALL.into_iter().filter(|s| s.is_terminal()) {
            assert!(status.next_states().is_empty(), "{status} should be terminal");
        }
    }

    fn any_status() -> impl Strategy<Value = InvitationStatus> {
        prop::sample::select(InvitationStatus::ALL.to_vec())
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: a transition exists iff it leaves `Pending` for a terminal state.
        #[test]
        fn transition_table_matches_terminality(from in any_status(), to in any_status()) {
            let expected = from == InvitationStatus::Pending && to.is_terminal();
            prop_assert_eq!(from.can_transition_to(to), expected);
        }

        /// Property: arbitrary text either decodes to the member it names or fails.
        #[test]
        fn decoding_never_coerces(input in "[A-Za-z ]{0,12}") {
            match input.parse::<InvitationStatus>() {
                Ok(status) => prop_assert_eq!(status.as_str(), input.as_str()),
                Err(err) => prop_assert!(
                    matches!(err, DomainError::UnknownValue { vocabulary: "InvitationStatus", .. }),
                    "unexpected error kind"
                ),
            }
        }
    }
}

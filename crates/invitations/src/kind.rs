//! Invitation type: who is being invited.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use invitekit_core::DomainError;

/// Relationship of the invited party to the inviting organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitationType {
    Employee,
    Client,
    Supplier,
}

impl InvitationType {
    pub const ALL: [InvitationType; 3] = [
        InvitationType::Employee,
        InvitationType::Client,
        InvitationType::Supplier,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationType::Employee => "EMPLOYEE",
            InvitationType::Client => "CLIENT",
            InvitationType::Supplier => "SUPPLIER",
        }
    }
}

impl core::fmt::Display for InvitationType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvitationType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DomainError::unknown_value("InvitationType", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_is_exactly_the_three_types() {
        let tags: Vec<&str> = InvitationType::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(tags, vec!["EMPLOYEE", "CLIENT", "SUPPLIER"]);

        let unique: HashSet<_> = InvitationType::ALL.into_iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn every_type_round_trips_through_text_and_json() {
        for kind in InvitationType::ALL {
            assert_eq!(kind.to_string().parse::<InvitationType>().unwrap(), kind);

            let json = serde_json::to_string(&kind).unwrap();
            let back: InvitationType = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn supplier_encodes_and_decodes_to_itself() {
        assert_eq!(InvitationType::Supplier.to_string(), "SUPPLIER");
        assert_eq!(
            "SUPPLIER".parse::<InvitationType>().unwrap(),
            InvitationType::Supplier
        );
        assert_eq!(
            serde_json::to_string(&InvitationType::Supplier).unwrap(),
            "\"SUPPLIER\""
        );
    }

    #[test]
    fn unknown_tags_are_rejected() {
        for input in ["", "CUSTOMER", "supplier", "Employee"] {
            match input.parse::<InvitationType>() {
                Err(DomainError::UnknownValue { vocabulary, value }) => {
                    assert_eq!(vocabulary, "InvitationType");
                    assert_eq!(value, input);
                }
                other => panic!("expected UnknownValue for {input:?}, got {other:?}"),
            }
        }

        assert!(serde_json::from_str::<InvitationType>("\"PARTNER\"").is_err());
    }
}

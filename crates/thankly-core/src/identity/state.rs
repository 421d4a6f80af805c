//! The identity state machine.
//!
//! [`resolve`] is the single transition function run on every page load.
//! It is pure: it takes the URL fragment and the durable record and returns
//! the state together with the record that should be written back.

use serde::{Deserialize, Serialize};

use super::{Identifier, IdentityRecord};

/// Who is looking at which journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum IdentityState {
    /// No usable identifier anywhere; the entry flow must run.
    Unauthenticated,
    /// The viewer is looking at their own journal.
    Owner { identifier: Identifier },
    /// The viewer is looking at someone else's journal.
    ReadOnly {
        target: Identifier,
        return_to: Identifier,
    },
}

/// `{ viewer, target, read_only }` as consumed by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub viewer: Identifier,
    pub target: Identifier,
    pub read_only: bool,
}

impl ViewState {
    /// Re-checks ownership against the durable record.
    ///
    /// A view claiming to own a journal other than the recorded original is
    /// downgraded to read-only. With no original recorded, the first-visit
    /// rule of [`resolve`] applies and the claim stands.
    pub fn confirmed(mut self, record: &IdentityRecord) -> Self {
        if record
            .original
            .as_ref()
            .is_some_and(|original| *original != self.target)
        {
            self.read_only = true;
        }
        self
    }
}

impl IdentityState {
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::ReadOnly { .. })
    }

    /// The journal being displayed, if any.
    pub fn target(&self) -> Option<&Identifier> {
        match self {
            Self::Unauthenticated => None,
            Self::Owner { identifier } => Some(identifier),
            Self::ReadOnly { target, .. } => Some(target),
        }
    }

    /// The viewer's own journal ("return to my journal").
    pub fn viewer(&self) -> Option<&Identifier> {
        match self {
            Self::Unauthenticated => None,
            Self::Owner { identifier } => Some(identifier),
            Self::ReadOnly { return_to, .. } => Some(return_to),
        }
    }

    pub fn view(&self) -> Option<ViewState> {
        Some(ViewState {
            viewer: self.viewer()?.clone(),
            target: self.target()?.clone(),
            read_only: self.is_read_only(),
        })
    }
}

/// Outcome of one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub state: IdentityState,
    pub record: IdentityRecord,
}

/// Resolves the viewer and target for a page load.
///
/// - A malformed fragment counts as no fragment; the last opened identifier
///   is used instead, and with neither the result is `Unauthenticated`.
/// - A pending login flag makes the target the viewer's own identifier and
///   is cleared.
/// - Otherwise the target is compared with the stored original: equal or
///   unset means owner (and the original is recorded), different means
///   read-only with the original as the way back.
pub fn resolve(fragment: Option<&str>, record: &IdentityRecord) -> Resolution {
    let target = fragment
        .and_then(Identifier::from_fragment)
        .or_else(|| record.current.clone());

    let Some(target) = target else {
        return Resolution {
            state: IdentityState::Unauthenticated,
            record: record.clone(),
        };
    };

    let mut next = record.clone();
    next.current = Some(target.clone());
    next.authenticated = true;

    let state = if record.came_from_login {
        next.came_from_login = false;
        next.original = Some(target.clone());
        IdentityState::Owner { identifier: target }
    } else {
        match &record.original {
            Some(original) if *original != target => IdentityState::ReadOnly {
                target,
                return_to: original.clone(),
            },
            Some(_) => IdentityState::Owner { identifier: target },
            None => {
                next.original = Some(target.clone());
                IdentityState::Owner { identifier: target }
            }
        }
    };

    Resolution {
        state,
        record: next,
    }
}

/// Login page guard: a valid fragment skips the entry flow.
pub fn should_skip_entry_flow(fragment: Option<&str>) -> bool {
    fragment.and_then(Identifier::from_fragment).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> Identifier {
        Identifier::parse(raw).unwrap()
    }

    fn record(original: Option<&str>, flag: bool) -> IdentityRecord {
        IdentityRecord {
            original: original.map(id),
            came_from_login: flag,
            ..Default::default()
        }
    }

    #[test]
    fn test_first_visit_becomes_owner_and_records_original() {
        let res = resolve(Some("#alice-9f2"), &record(None, false));
        assert_eq!(
            res.state,
            IdentityState::Owner {
                identifier: id("alice-9f2")
            }
        );
        assert_eq!(res.record.original, Some(id("alice-9f2")));
        assert_eq!(res.record.current, Some(id("alice-9f2")));
        assert!(res.record.authenticated);
    }

    #[test]
    fn test_foreign_identifier_is_read_only() {
        let res = resolve(Some("bob-3k1"), &record(Some("alice-9f2"), false));
        assert_eq!(
            res.state,
            IdentityState::ReadOnly {
                target: id("bob-3k1"),
                return_to: id("alice-9f2"),
            }
        );
        assert_eq!(res.record.original, Some(id("alice-9f2")));
        let view = res.state.view().unwrap();
        assert!(view.read_only);
        assert_eq!(view.viewer, id("alice-9f2"));
    }

    #[test]
    fn test_matching_original_is_owner() {
        let res = resolve(Some("alice-9f2"), &record(Some("alice-9f2"), false));
        assert!(!res.state.is_read_only());
        assert_eq!(res.state.target(), Some(&id("alice-9f2")));
    }

    #[test]
    fn test_login_flag_overrides_original_once() {
        let res = resolve(Some("carol-77"), &record(Some("alice-9f2"), true));
        assert_eq!(
            res.state,
            IdentityState::Owner {
                identifier: id("carol-77")
            }
        );
        assert_eq!(res.record.original, Some(id("carol-77")));
        assert!(!res.record.came_from_login);

        // The flag is gone, so the old identity is now foreign.
        let again = resolve(Some("alice-9f2"), &res.record);
        assert!(again.state.is_read_only());
    }

    #[test]
    fn test_malformed_fragment_without_stored_identifier_is_unauthenticated() {
        let res = resolve(Some("#alice"), &IdentityRecord::default());
        assert_eq!(res.state, IdentityState::Unauthenticated);
        assert_eq!(res.record, IdentityRecord::default());

        let res = resolve(None, &IdentityRecord::default());
        assert_eq!(res.state, IdentityState::Unauthenticated);
    }

    #[test]
    fn test_missing_fragment_falls_back_to_current() {
        let stored = IdentityRecord {
            current: Some(id("alice-9f2")),
            original: Some(id("alice-9f2")),
            ..Default::default()
        };
        let res = resolve(Some("garbage"), &stored);
        assert_eq!(res.state.target(), Some(&id("alice-9f2")));
        assert!(!res.state.is_read_only());
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let first = resolve(Some("alice-9f2"), &record(None, false));
        let second = resolve(Some("alice-9f2"), &first.record);
        assert_eq!(first, second);
    }

    #[test]
    fn test_entry_flow_guard() {
        assert!(should_skip_entry_flow(Some("#dave-1")));
        assert!(!should_skip_entry_flow(Some("#dave")));
        assert!(!should_skip_entry_flow(None));
    }
}

//! Property-based tests for core types.

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::json::{get_path, set_path};
    use crate::types::{EntityId, EntityKind, Phase, Transition};
    use proptest::prelude::*;
    use serde_json::{Value, json};

    fn any_phase() -> impl Strategy<Value = Phase> {
        prop_oneof![
            Just(Phase::Open),
            Just(Phase::Acknowledged),
            Just(Phase::Resolved),
            Just(Phase::Dismissed),
        ]
    }

    fn any_transition() -> impl Strategy<Value = Transition> {
        prop_oneof![
            Just(Transition::Acknowledge),
            Just(Transition::Resolve),
            Just(Transition::Dismiss),
        ]
    }

    proptest! {
        #[test]
        fn test_entity_id_roundtrip(s in "\\PC+") {
            let id = EntityId::new(s.clone());
            let json = serde_json::to_string(&id).unwrap();
            let back: EntityId = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(back.as_str(), s.as_str());
        }

        #[test]
        fn test_set_then_get_path(a in "[a-z]{1,8}", b in "[a-z]{1,8}", n in any::<i64>()) {
            let path = format!("{a}.{b}");
            let mut root = json!({});
            set_path(&mut root, &path, Value::from(n)).unwrap();
            prop_assert_eq!(get_path(&root, &path), Some(&Value::from(n)));
        }

        #[test]
        fn test_terminal_phases_never_move(phase in any_phase(), t in any_transition()) {
            if phase.is_terminal() {
                prop_assert!(phase.next(t).is_none());
            } else {
                // Every successful move lands somewhere different.
                if let Some(next) = phase.next(t) {
                    prop_assert_ne!(next, phase);
                }
            }
        }

        #[test]
        fn test_kind_name_roundtrip(index in 0usize..EntityKind::ALL.len()) {
            let kind = EntityKind::ALL[index];
            prop_assert_eq!(kind.to_string().parse::<EntityKind>().unwrap(), kind);
        }
    }
}

//! Property-based tests for identifiers and path splitting.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::model::{split_id, CharmId, SeriesSet};
    use crate::path::split_path;

    /// Strategy to generate valid charm names like "wordpress" or "mysql-5a-x"
    fn name_strategy() -> impl Strategy<Value = String> {
        (
            "[a-z][a-z0-9]{0,8}",
            prop::collection::vec("[a-z0-9]{0,3}[a-z][a-z0-9]{0,3}", 0..3),
        )
            .prop_map(|(first, rest)| {
                let mut name = first;
                for seg in rest {
                    name.push('-');
                    name.push_str(&seg);
                }
                name
            })
    }

    /// Strategy to generate ids with every optional part present or absent
    fn id_strategy() -> impl Strategy<Value = CharmId> {
        (
            prop::option::of("[a-z0-9][a-zA-Z0-9+.-]{1,10}"),
            prop::option::of("[a-z][a-z0-9]{0,8}"),
            name_strategy(),
            prop::option::of(0u32..100_000),
        )
            .prop_map(|(user, series, name, revision)| CharmId {
                user,
                series,
                name,
                revision,
            })
    }

    proptest! {
        #[test]
        fn test_id_format_parse_roundtrip(id in id_strategy()) {
            let formatted = id.to_string();
            let parsed = CharmId::parse(&formatted);
            prop_assert!(parsed.is_ok(), "Failed to reparse: {}", formatted);
            let parsed = parsed.unwrap();
            prop_assert_eq!(&parsed, &id);
            prop_assert_eq!(parsed.to_string(), formatted);
        }

        #[test]
        fn test_id_path_form_parses_without_schema(id in id_strategy()) {
            let parsed = CharmId::parse(&id.path()).unwrap();
            prop_assert_eq!(parsed, id);
        }

        #[test]
        fn test_split_id_recovers_known_series_id(
            id in id_strategy(),
            rest in prop::collection::vec("[a-z-]{1,8}", 0..3),
        ) {
            let series = SeriesSet::default();
            let id = match &id.series {
                Some(s) if !series.contains(s) => CharmId { series: None, ..id },
                _ => id,
            };
            // A name that is also a known series would be consumed as the series.
            prop_assume!(!series.contains(&id.name));
            let tail: String = rest.iter().map(|e| format!("/{e}")).collect();
            let path = format!("/{}{}", id.path(), tail);
            let (parsed, remainder) = split_id(&path, &series).unwrap();
            prop_assert_eq!(parsed, id);
            prop_assert_eq!(remainder, tail);
        }

        #[test]
        fn test_split_path_visits_every_element(
            elems in prop::collection::vec("[a-z0-9.~-]{1,10}", 1..8)
        ) {
            let path = format!("/{}", elems.join("/"));
            let mut seen = Vec::new();
            let mut rebuilt = String::new();
            let mut i = 0;
            while i < path.len() {
                let (elem, next) = split_path(&path, i);
                prop_assert!(next > i);
                rebuilt.push('/');
                rebuilt.push_str(elem);
                seen.push(elem.to_string());
                i = next;
            }
            prop_assert_eq!(seen, elems);
            prop_assert_eq!(rebuilt, path);
        }
    }
}

use crate::{
    address::PropertyDescriptor,
    client::{SlicePredicate, SliceRange},
    util::Slice,
};

/// Turn property descriptors into slice predicates.
///
/// Every range becomes its own predicate, in declaration order. All literal
/// names share one trailing `ColumnNames` predicate, emitted only when at
/// least one name is present. No descriptors, no predicates.
pub fn build_predicates(
    descriptors: &[PropertyDescriptor],
    default_limit: u32,
) -> Vec<SlicePredicate> {
    let mut predicates = Vec::new();
    let mut names = Vec::new();

    for descriptor in descriptors {
        match descriptor {
            PropertyDescriptor::Name(name) => names.push(name.clone()),
            PropertyDescriptor::Range(range) => {
                predicates.push(SlicePredicate::SliceRange(SliceRange {
                    start: range.start.clone().unwrap_or_else(Slice::empty),
                    finish: range.end.clone().unwrap_or_else(Slice::empty),
                    reversed: range.reversed,
                    count: range.limit.unwrap_or(default_limit),
                }))
            },
        }
    }

    if !names.is_empty() {
        predicates.push(SlicePredicate::ColumnNames(names));
    }
    predicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::RangeDescriptor;

    #[test]
    fn test_names_are_grouped() {
        let descriptors: Vec<PropertyDescriptor> = vec!["a".into(), "b".into(), "c".into()];
        let predicates = build_predicates(&descriptors, 100);
        assert_eq!(
            predicates,
            vec![SlicePredicate::ColumnNames(vec![
                Slice::from("a"),
                Slice::from("b"),
                Slice::from("c"),
            ])]
        );
    }

    #[test]
    fn test_range_defaults() {
        let descriptors = vec![PropertyDescriptor::from(RangeDescriptor::new())];
        let predicates = build_predicates(&descriptors, 100);
        assert_eq!(
            predicates,
            vec![SlicePredicate::SliceRange(SliceRange {
                start: Slice::empty(),
                finish: Slice::empty(),
                reversed: false,
                count: 100,
            })]
        );
    }

    #[test]
    fn test_mixed_names_and_ranges() {
        let descriptors: Vec<PropertyDescriptor> = vec![
            "name".into(),
            RangeDescriptor::new().start("a").end("f").reversed().limit(5).into(),
            "email".into(),
            RangeDescriptor::new().limit(1).into(),
        ];
        let predicates = build_predicates(&descriptors, 100);
        assert_eq!(predicates.len(), 3);
        assert_eq!(
            predicates[0],
            SlicePredicate::SliceRange(SliceRange {
                start: Slice::from("a"),
                finish: Slice::from("f"),
                reversed: true,
                count: 5,
            })
        );
        assert!(predicates[1].is_range());
        // Only the literal names go into the names predicate.
        assert_eq!(
            predicates[2],
            SlicePredicate::ColumnNames(vec![Slice::from("name"), Slice::from("email")])
        );
    }

    #[test]
    fn test_no_descriptors_no_predicates() {
        assert!(build_predicates(&[], 100).is_empty());
    }

    #[test]
    fn test_configured_default_limit() {
        let descriptors = vec![PropertyDescriptor::from(RangeDescriptor::new())];
        match &build_predicates(&descriptors, 7)[0] {
            SlicePredicate::SliceRange(range) => assert_eq!(range.count, 7),
            other => panic!("unexpected predicate {other:?}"),
        }
    }
}

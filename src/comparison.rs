// 🔍 Structural Equality - field-wise comparison of Person chains
//
// Compares name, age, height, weight at each level and walks both parent
// chains in lockstep. The id field is identity, not value: never compared.

use crate::entities::Person;
use tracing::debug;

/// True when both chains hold the same values level by level.
///
/// - Same reference (or both absent) → true
/// - Exactly one absent → false
/// - Any of name/age/height/weight differ → false
/// - Otherwise the parents decide
pub fn are_equal(actual: Option<&Person>, expected: Option<&Person>) -> bool {
    let (mut actual, mut expected) = (actual, expected);
    let mut level = 0usize;

    loop {
        match (actual, expected) {
            (None, None) => return true,
            (Some(a), Some(e)) if std::ptr::eq(a, e) => return true,
            (Some(a), Some(e)) => {
                if !a.same_values(e) {
                    debug!(level, actual = %a.name, expected = %e.name, "person values differ");
                    return false;
                }
                actual = a.parent();
                expected = e.parent();
                level += 1;
            }
            _ => {
                debug!(level, "parent chains have different lengths");
                return false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::TsarRegistry;
    use std::sync::Arc;

    fn expected_tsar() -> Person {
        Person::new(
            "Ivan IV The Terrible",
            54,
            170,
            70,
            Some(Person::new("Vasili III of Russia", 28, 170, 60, None)),
        )
    }

    #[test]
    fn test_same_reference_is_equal() {
        let p = TsarRegistry::current_tsar();
        assert!(are_equal(Some(&p), Some(&p)));
        assert!(are_equal(None, None));
    }

    #[test]
    fn test_one_absent_is_not_equal() {
        let p = TsarRegistry::current_tsar();
        assert!(!are_equal(Some(&p), None));
        assert!(!are_equal(None, Some(&p)));
    }

    #[test]
    fn test_current_tsar_matches_expected() {
        let actual = TsarRegistry::current_tsar();
        let expected = expected_tsar();

        assert_ne!(actual.id, expected.id);
        assert!(are_equal(Some(&actual), Some(&expected)));
    }

    #[test]
    fn test_each_field_is_compared() {
        let base = Person::new("N", 1, 2, 3, None);
        let variants = [
            Person::new("M", 1, 2, 3, None),
            Person::new("N", 9, 2, 3, None),
            Person::new("N", 1, 9, 3, None),
            Person::new("N", 1, 2, 9, None),
        ];

        for other in &variants {
            assert!(!are_equal(Some(&base), Some(other)), "{:?}", other);
        }
    }

    #[test]
    fn test_differing_id_only_is_equal() {
        let a = Person::new("N", 1, 2, 3, None);
        let mut b = a.clone();
        b.id += 100;

        assert!(are_equal(Some(&a), Some(&b)));
    }

    #[test]
    fn test_parent_difference_is_detected() {
        let actual = TsarRegistry::current_tsar();
        let expected = Person::new(
            "Ivan IV The Terrible",
            54,
            170,
            70,
            Some(Person::new("Vasili III of Russia", 29, 170, 60, None)),
        );

        assert!(!are_equal(Some(&actual), Some(&expected)));
    }

    #[test]
    fn test_chain_length_difference_is_detected() {
        let actual = TsarRegistry::current_tsar();
        let expected = Person::new("Ivan IV The Terrible", 54, 170, 70, None);

        assert!(!are_equal(Some(&actual), Some(&expected)));
        assert!(!are_equal(Some(&expected), Some(&actual)));
    }

    #[test]
    fn test_shared_parent_short_circuits() {
        let parent = Arc::new(Person::new("P", 50, 170, 70, None));
        let a = Person::with_shared_parent("C", 20, 180, 75, parent.clone());
        let b = Person::with_shared_parent("C", 20, 180, 75, parent);

        assert!(are_equal(Some(&a), Some(&b)));
    }

    #[test]
    fn test_long_chain_does_not_overflow() {
        let mut a = Person::new("root", 0, 0, 0, None);
        let mut b = Person::new("root", 0, 0, 0, None);
        for i in 1..10_000 {
            a = Person::new("x", i, 0, 0, Some(a));
            b = Person::new("x", i, 0, 0, Some(b));
        }

        assert!(are_equal(Some(&a), Some(&b)));
        drop(a);
        drop(b);
    }
}

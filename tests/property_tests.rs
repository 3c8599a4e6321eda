//! Property tests for the comparators and the differ.

use proptest::prelude::*;
use verity::diff::{diff, split, TextDiffer};
use verity::equality::{coerce_number, equal};
use verity::output::strip_markup;
use verity::thrown::{throws_match, ErrorDescriptor};
use verity::value::{render, Value};

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(Value::from),
        "[a-z0-9 ]{0,6}".prop_map(Value::from),
    ]
}

fn container() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(3, 16, 4, |inner| {
        prop::collection::vec(inner, 0..4).prop_map(Value::from)
    })
}

proptest! {
    #[test]
    fn numbers_compare_after_coercion(a in any::<i32>(), b in any::<i32>(), as_text in any::<bool>()) {
        let left = if as_text { Value::from(a.to_string()) } else { Value::from(a) };
        let right = Value::from(b);
        let expected = coerce_number(&left).unwrap().num_eq(coerce_number(&right).unwrap());
        prop_assert_eq!(equal(&left, &right), expected);
        prop_assert_eq!(expected, a == b);
    }

    #[test]
    fn containers_compare_by_rendering(a in container(), b in container()) {
        if let (Value::Array(_), Value::Array(_)) = (&a, &b) {
            prop_assert_eq!(equal(&a, &b), render(&a) == render(&b));
        }
    }

    #[test]
    fn throws_match_is_kind_and_code(k1 in "[A-C]", c1 in 0i64..3, k2 in "[A-C]", c2 in 0i64..3) {
        let e = ErrorDescriptor::new(k1.clone(), c1);
        let a = ErrorDescriptor::new(k2.clone(), c2);
        prop_assert_eq!(throws_match(Some(&e), Some(&a)), k1 == k2 && c1 == c2);
    }

    #[test]
    fn split_reassembles_both_sides(old in "\\PC{0,12}", new in "\\PC{0,12}") {
        let s = split(&old, &new);
        prop_assert_eq!(format!("{}{}{}", s.prefix, s.old_middle, s.suffix), old.clone());
        prop_assert_eq!(format!("{}{}{}", s.prefix, s.new_middle, s.suffix), new.clone());
    }

    #[test]
    fn identical_strings_round_trip(s in "[a-zA-Z0-9.,;:!?-]{0,20}") {
        let d = diff(&s, &s);
        prop_assert_eq!(strip_markup(&d.old), s.clone());
        prop_assert_eq!(strip_markup(&d.new), s.clone());
    }

    #[test]
    fn unmarked_spaces_round_trip(s in "[a-z ]{0,20}") {
        let d = TextDiffer { mark_spaces: false }.diff(&s, &s);
        prop_assert_eq!(strip_markup(&d.old), s.clone());
    }
}

#[test]
fn hello_world_vs_hello_earth() {
    let s = split("hello world", "hello earth");
    assert_eq!(s.prefix, "hello ");
    assert_eq!(s.old_middle, "world");
    assert_eq!(s.new_middle, "earth");
    assert_eq!(s.suffix, "");
}

#[test]
fn documented_equalities() {
    assert!(equal(&Value::from("3"), &Value::from(3)));
    assert!(equal(&Value::from("3.0"), &Value::from(3)));
    assert!(!equal(&Value::from("abc"), &Value::from(0)));
    assert!(equal(&Value::from(vec![1, 2]), &Value::from(vec![1, 2])));
    assert!(!equal(&Value::from(vec![1, 2]), &Value::from(vec![2, 1])));
}

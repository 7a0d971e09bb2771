//! Evaluation of comparison conditions against stored attribute values.

use std::cmp::Ordering;

use dynorm_core::storage::{AttributeValue, ComparisonOperator, Condition};

/// Checks whether `value` (the attribute as stored, if any) satisfies `condition`.
pub fn matches(value: Option<&AttributeValue>, condition: &Condition) -> bool {
    let operands = &condition.attribute_value_list;

    match condition.comparison_operator {
        ComparisonOperator::NotNull => value.is_some(),
        ComparisonOperator::Null => value.is_none(),
        ComparisonOperator::Eq => compare_first(value, operands) == Some(Ordering::Equal),
        ComparisonOperator::Ne => {
            !matches!(compare_first(value, operands), Some(Ordering::Equal))
        }
        ComparisonOperator::Lt => compare_first(value, operands) == Some(Ordering::Less),
        ComparisonOperator::Le => matches!(
            compare_first(value, operands),
            Some(Ordering::Less | Ordering::Equal)
        ),
        ComparisonOperator::Gt => compare_first(value, operands) == Some(Ordering::Greater),
        ComparisonOperator::Ge => matches!(
            compare_first(value, operands),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        ComparisonOperator::Contains => match (value, operands.first()) {
            (Some(value), Some(operand)) => contains(value, operand),
            _ => false,
        },
        ComparisonOperator::NotContains => match (value, operands.first()) {
            (Some(value), Some(operand)) => !contains(value, operand),
            _ => false,
        },
        ComparisonOperator::BeginsWith => match (value, operands.first()) {
            (Some(AttributeValue::S(s)), Some(AttributeValue::S(prefix)))
            | (Some(AttributeValue::B(s)), Some(AttributeValue::B(prefix))) => {
                s.starts_with(prefix.as_str())
            }
            _ => false,
        },
        ComparisonOperator::In => value.is_some_and(|value| {
            operands
                .iter()
                .any(|operand| compare(value, operand) == Some(Ordering::Equal))
        }),
        ComparisonOperator::Between => match (value, operands.first(), operands.get(1)) {
            (Some(value), Some(low), Some(high)) => {
                matches!(
                    compare(value, low),
                    Some(Ordering::Greater | Ordering::Equal)
                ) && matches!(
                    compare(value, high),
                    Some(Ordering::Less | Ordering::Equal)
                )
            }
            _ => false,
        },
    }
}

/// Orders two scalar values of the same type. `None` for mismatched or non-scalar types.
pub fn compare(left: &AttributeValue, right: &AttributeValue) -> Option<Ordering> {
    match (left, right) {
        (AttributeValue::S(a), AttributeValue::S(b)) | (AttributeValue::B(a), AttributeValue::B(b)) => {
            Some(a.cmp(b))
        }
        (AttributeValue::N(a), AttributeValue::N(b)) => compare_numbers(a, b),
        _ => None,
    }
}

fn compare_first(value: Option<&AttributeValue>, operands: &[AttributeValue]) -> Option<Ordering> {
    compare(value?, operands.first()?)
}

fn compare_numbers(a: &str, b: &str) -> Option<Ordering> {
    match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
        (Ok(a), Ok(b)) => Some(a.cmp(&b)),
        _ => {
            let a = a.trim().parse::<f64>().ok()?;
            let b = b.trim().parse::<f64>().ok()?;
            a.partial_cmp(&b)
        }
    }
}

fn contains(value: &AttributeValue, operand: &AttributeValue) -> bool {
    match (value, operand) {
        (AttributeValue::S(s), AttributeValue::S(needle))
        | (AttributeValue::B(s), AttributeValue::B(needle)) => s.contains(needle.as_str()),
        (AttributeValue::Ss(set), AttributeValue::S(member))
        | (AttributeValue::Bs(set), AttributeValue::B(member)) => set.contains(member),
        (AttributeValue::Ns(set), AttributeValue::N(member)) => set
            .iter()
            .any(|n| compare_numbers(n, member) == Some(Ordering::Equal)),
        (AttributeValue::L(list), operand) => list.contains(operand),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(value: &str) -> AttributeValue {
        AttributeValue::S(value.to_string())
    }

    fn n(value: &str) -> AttributeValue {
        AttributeValue::N(value.to_string())
    }

    fn condition(op: ComparisonOperator, operands: Vec<AttributeValue>) -> Condition {
        Condition::new(op, operands).unwrap()
    }

    #[test]
    fn test_numbers_compare_numerically() {
        assert_eq!(compare(&n("9"), &n("10")), Some(Ordering::Less));
        assert_eq!(compare(&s("9"), &s("10")), Some(Ordering::Greater));
        assert_eq!(compare(&n("1.5"), &n("1")), Some(Ordering::Greater));
        assert_eq!(compare(&s("1"), &n("1")), None);
    }

    #[test]
    fn test_null_checks() {
        let not_null = Condition::not_null();
        assert!(matches(Some(&s("x")), &not_null));
        assert!(!matches(None, &not_null));

        let null = condition(ComparisonOperator::Null, vec![]);
        assert!(matches(None, &null));
    }

    #[test]
    fn test_ordering_operators() {
        let gt = condition(ComparisonOperator::Gt, vec![n("10")]);
        assert!(matches(Some(&n("11")), &gt));
        assert!(!matches(Some(&n("10")), &gt));
        assert!(!matches(None, &gt));

        let le = condition(ComparisonOperator::Le, vec![s("m")]);
        assert!(matches(Some(&s("a")), &le));
        assert!(matches(Some(&s("m")), &le));
        assert!(!matches(Some(&s("z")), &le));
    }

    #[test]
    fn test_ne_matches_missing_and_mismatched() {
        let ne = condition(ComparisonOperator::Ne, vec![s("a")]);
        assert!(matches(Some(&s("b")), &ne));
        assert!(matches(None, &ne));
        assert!(!matches(Some(&s("a")), &ne));
    }

    #[test]
    fn test_contains_on_strings_and_sets() {
        let contains = condition(ComparisonOperator::Contains, vec![s("ell")]);
        assert!(matches(Some(&s("hello")), &contains));

        let member = condition(ComparisonOperator::Contains, vec![s("red")]);
        let set = AttributeValue::Ss(vec!["red".to_string(), "blue".to_string()]);
        assert!(matches(Some(&set), &member));

        let not_contains = condition(ComparisonOperator::NotContains, vec![s("green")]);
        assert!(matches(Some(&set), &not_contains));
        assert!(!matches(None, &not_contains));
    }

    #[test]
    fn test_begins_with_in_and_between() {
        let begins = condition(ComparisonOperator::BeginsWith, vec![s("2024-")]);
        assert!(matches(Some(&s("2024-06-01")), &begins));
        assert!(!matches(Some(&s("2023-06-01")), &begins));

        let one_of = condition(ComparisonOperator::In, vec![s("a"), s("b")]);
        assert!(matches(Some(&s("b")), &one_of));
        assert!(!matches(Some(&s("c")), &one_of));

        let between = condition(ComparisonOperator::Between, vec![n("1"), n("10")]);
        assert!(matches(Some(&n("1")), &between));
        assert!(matches(Some(&n("10")), &between));
        assert!(!matches(Some(&n("11")), &between));
    }
}

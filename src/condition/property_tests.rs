//! Property tests for condition extraction
//!
//! Property: a clause written in canonical form survives parse then
//! reconstruct byte for byte.

use proptest::prelude::*;

use crate::clause::render_condition;
use crate::condition::{Condition, ConditionValue, Operator, ValueType};
use crate::diagnostics::Diagnostics;
use crate::{parse_conditions, reconstruct, ParseStatus, ReconstructPath};

// ═══════════════════════════════════════════════════════════════════════════
// Strategy generators for property tests
// ═══════════════════════════════════════════════════════════════════════════

fn field_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("id".to_string()),
        Just("amount".to_string()),
        Just("t.status".to_string()),
        Just("u.name".to_string()),
        Just("created_at".to_string()),
        Just("c.region_code".to_string()),
    ]
}

fn comparison_strategy() -> impl Strategy<Value = Operator> {
    prop_oneof![
        Just(Operator::Equal),
        Just(Operator::NotEqual),
        Just(Operator::NotEqualAnsi),
        Just(Operator::Greater),
        Just(Operator::Less),
        Just(Operator::GreaterEqual),
        Just(Operator::LessEqual),
    ]
}

/// Letters only, so never a number or a date
fn text_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z]{1,8}"
}

fn date_strategy() -> impl Strategy<Value = String> {
    (1990..2030i32, 1..=12u32, 1..=28u32)
        .prop_map(|(y, m, d)| format!("{:04}-{:02}-{:02}", y, m, d))
}

/// Bind parameters and column references, written without quotes
fn bare_operand_strategy() -> impl Strategy<Value = String> {
    prop_oneof![":p_[a-z]{1,6}", "t\\.c_[a-z]{1,6}"]
}

/// A literal already in canonical SQL form
fn literal_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<i32>().prop_map(|n| n.to_string()),
        text_strategy().prop_map(|s| format!("'{}'", s)),
        date_strategy().prop_map(|d| format!("'{}'", d)),
        bare_operand_strategy(),
    ]
}

fn not_prefix(negated: bool) -> &'static str {
    if negated {
        "NOT "
    } else {
        ""
    }
}

/// One predicate in canonical form with its expected operator
fn predicate_strategy() -> impl Strategy<Value = (String, Operator)> {
    prop_oneof![
        (field_strategy(), comparison_strategy(), literal_strategy())
            .prop_map(|(f, op, lit)| (format!("{} {} {}", f, op, lit), op)),
        (field_strategy(), any::<bool>(), text_strategy()).prop_map(|(f, neg, s)| {
            (
                format!("{} {}LIKE '%{}%'", f, not_prefix(neg), s),
                if neg { Operator::NotLike } else { Operator::Like },
            )
        }),
        (field_strategy(), any::<bool>(), prop::collection::vec(any::<i16>(), 1..5)).prop_map(
            |(f, neg, items)| {
                let items = items.iter().map(|n| n.to_string()).collect::<Vec<_>>();
                (
                    format!("{} {}IN ({})", f, not_prefix(neg), items.join(", ")),
                    Operator::in_list(neg),
                )
            }
        ),
        (field_strategy(), any::<bool>(), prop::collection::vec(text_strategy(), 1..5)).prop_map(
            |(f, neg, items)| {
                let items = items.iter().map(|s| format!("'{}'", s)).collect::<Vec<_>>();
                (
                    format!("{} {}IN ({})", f, not_prefix(neg), items.join(", ")),
                    Operator::in_list(neg),
                )
            }
        ),
        (field_strategy(), any::<bool>(), prop::collection::vec(bare_operand_strategy(), 1..5))
            .prop_map(|(f, neg, items)| {
                (
                    format!("{} {}IN ({})", f, not_prefix(neg), items.join(", ")),
                    Operator::in_list(neg),
                )
            }),
        (field_strategy(), any::<bool>(), any::<i32>(), any::<i32>()).prop_map(
            |(f, neg, lo, hi)| {
                (
                    format!("{} {}BETWEEN {} AND {}", f, not_prefix(neg), lo, hi),
                    Operator::between(neg),
                )
            }
        ),
        (field_strategy(), any::<bool>()).prop_map(|(f, neg)| {
            (
                format!("{} IS {}NULL", f, not_prefix(neg)),
                Operator::null_check(neg),
            )
        }),
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
// Property Tests
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    /// Canonical clauses parse into one condition per predicate, in order
    #[test]
    fn prop_parse_recovers_operators(
        predicates in prop::collection::vec(predicate_strategy(), 1..6)
    ) {
        let clause = predicates.iter().map(|(p, _)| p.as_str()).collect::<Vec<_>>().join(" AND ");
        let sql = format!("SELECT * FROM t WHERE {} ORDER BY 1", clause);

        let outcome = parse_conditions(&sql);
        prop_assert_eq!(outcome.status, ParseStatus::Success);
        prop_assert!(outcome.warnings.is_empty(), "warnings: {:?}", outcome.warnings);

        let operators = outcome.conditions.iter().map(|c| c.operator).collect::<Vec<_>>();
        let expected = predicates.iter().map(|(_, op)| *op).collect::<Vec<_>>();
        prop_assert_eq!(operators, expected);

        let ids = outcome.conditions.iter().map(|c| c.id).collect::<Vec<_>>();
        prop_assert_eq!(ids, (0..predicates.len()).collect::<Vec<_>>());
    }

    /// Reconstructing unedited conditions reproduces the statement
    #[test]
    fn prop_round_trip_is_identity(
        predicates in prop::collection::vec(predicate_strategy(), 1..6)
    ) {
        let clause = predicates.iter().map(|(p, _)| p.as_str()).collect::<Vec<_>>().join(" AND ");
        let sql = format!("SELECT * FROM t WHERE {} ORDER BY 1", clause);

        let rebuilt = reconstruct(&sql, &parse_conditions(&sql).conditions);
        prop_assert_eq!(rebuilt.path, ReconstructPath::Spliced);
        prop_assert_eq!(rebuilt.query, sql);
    }

    /// Null checks render the field verbatim, whatever it looks like
    #[test]
    fn prop_null_check_renders_any_field(
        field in "[a-zA-Z_][a-zA-Z0-9_.]{0,16}",
        negated in any::<bool>()
    ) {
        let operator = Operator::null_check(negated);
        let cond = Condition::new(field.clone(), operator, ConditionValue::Null, ValueType::Null);
        let rendered = render_condition(&cond, &mut Diagnostics::new()).unwrap();
        prop_assert_eq!(rendered, format!("{} {}", field, operator));
    }
}

#[test]
fn test_between_and_is_not_a_separator() {
    let outcome = parse_conditions("SELECT * FROM t WHERE a BETWEEN 1 AND 2 AND b = 3");
    assert_eq!(outcome.conditions.len(), 2);
    assert_eq!(
        outcome.conditions[0].value,
        ConditionValue::Pair("1".into(), "2".into())
    );
}

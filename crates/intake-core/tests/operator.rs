use intake_core::models::{AnswerValue, Condition, Operator};
use intake_core::operator::compare;

fn cond(op: Operator, value: impl Into<AnswerValue>) -> Condition {
    Condition::new("q", op, Some(value.into()))
}

#[test]
fn equals_compares_numbers_across_text_and_number() {
    let c = cond(Operator::Equals, 3);
    assert!(c.holds(Some(&AnswerValue::from("3"))));
    assert!(c.holds(Some(&AnswerValue::from(3.0))));
    assert!(!c.holds(Some(&AnswerValue::from("4"))));
}

#[test]
fn equals_falls_back_to_text() {
    let c = cond(Operator::Equals, "yes");
    assert!(c.holds(Some(&AnswerValue::from("yes"))));
    assert!(!c.holds(Some(&AnswerValue::from("no"))));
    assert!(cond(Operator::Equals, "true").holds(Some(&AnswerValue::Bool(true))));
}

#[test]
fn missing_answer_never_equals() {
    assert!(!cond(Operator::Equals, "").holds(None));
    assert!(cond(Operator::NotEquals, "x").holds(None));
}

#[test]
fn single_element_list_equals_scalar() {
    let c = cond(Operator::Equals, "other");
    assert!(c.holds(Some(&AnswerValue::from(vec!["other"]))));
    assert!(!c.holds(Some(&AnswerValue::from(vec!["other", "pain"]))));
}

#[test]
fn includes_tests_list_membership_and_substrings() {
    let c = cond(Operator::Includes, "other");
    assert!(c.holds(Some(&AnswerValue::from(vec!["pain", "other"]))));
    assert!(!c.holds(Some(&AnswerValue::from(vec!["pain"]))));
    assert!(c.holds(Some(&AnswerValue::from("something other"))));
    assert!(!c.holds(None));

    let not = cond(Operator::NotIncludes, "other");
    assert!(not.holds(Some(&AnswerValue::from(vec!["pain"]))));
    assert!(not.holds(None));
}

#[test]
fn ordering_operators_coerce_or_fail() {
    assert!(cond(Operator::GreaterThan, 9).holds(Some(&AnswerValue::from(27.0))));
    assert!(cond(Operator::GreaterThan, "9").holds(Some(&AnswerValue::from(" 10 "))));
    assert!(!cond(Operator::GreaterThan, 9).holds(Some(&AnswerValue::from(9))));
    assert!(cond(Operator::LessThan, 5).holds(Some(&AnswerValue::from("4.5"))));
    // Non-numeric fails the condition instead of erroring.
    assert!(!cond(Operator::GreaterThan, 9).holds(Some(&AnswerValue::from("lots"))));
    assert!(!cond(Operator::LessThan, 9).holds(Some(&AnswerValue::from("lots"))));
    assert!(!cond(Operator::LessThan, 9).holds(None));
}

#[test]
fn emptiness_ignores_the_comparison_value() {
    let blank = AnswerValue::from("   ");
    let empty_list = AnswerValue::List(vec![]);
    assert!(compare(Operator::IsEmpty, None, None));
    assert!(compare(Operator::IsEmpty, Some(&blank), None));
    assert!(compare(Operator::IsEmpty, Some(&empty_list), None));
    assert!(compare(Operator::IsNotEmpty, Some(&AnswerValue::from(0)), None));
    assert!(!compare(Operator::IsNotEmpty, None, None));
}

#[test]
fn operator_names_round_trip() {
    for op in Operator::ALL {
        assert_eq!(Operator::parse(op.as_str()), Some(op));
    }
    assert_eq!(Operator::parse("contains"), None);
}

//! Declarative animation transitions.
//!
//! Each animation state may map target state names to a [`Condition`]. The
//! JSON forms accepted are the ones the authoring tool writes:
//!
//! ```json
//! true
//! "always"
//! [{ "minHorizontal": 0.2 }, { "isGrounded": false }]
//! { "velocityYLessThan": 0 }
//! { "property": "velocityY", "op": "gte", "value": 100 }
//! ```
//!
//! Arrays are OR-ed. A predicate object tests exactly one fact. Anything the
//! grammar does not recognise is kept as-is and evaluates to false.
//!
//! Evaluation is a pure function of a sampled [`TransitionInput`] and a
//! [`PhysicalState`] snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;

/// Comparison operators for generic property checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CmpOp {
    #[serde(rename = "lt")]
    Lt,
    #[serde(rename = "lte")]
    Le,
    #[serde(rename = "gt")]
    Gt,
    #[serde(rename = "gte")]
    Ge,
    #[serde(rename = "eq")]
    Eq,
    #[serde(rename = "ne")]
    Ne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Keyword {
    Always,
}

/// Single-fact predicate, written as a one-key JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Predicate {
    Always(bool),
    MinHorizontal(f32),
    MaxHorizontal(f32),
    JumpPressed(bool),
    IsGrounded(bool),
    VelocityYLessThan(f32),
    VelocityYGreaterThan(f32),
}

/// Generic comparison of a named fact against a literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyCmp {
    pub property: String,
    pub op: CmpOp,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    Literal(bool),
    Keyword(Keyword),
    AnyOf(Vec<Condition>),
    Predicate(Predicate),
    Compare(PropertyCmp),
    Unrecognized(Value),
}

impl Condition {
    pub fn always() -> Self {
        Condition::Keyword(Keyword::Always)
    }
}

/// Input sampled for one evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionInput {
    /// Horizontal axis in `[-1, 1]`.
    pub horizontal: f32,
    pub jump_pressed: bool,
}

/// Physical facts sampled for one evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalState {
    pub grounded: bool,
    pub velocity_y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Fact {
    Number(f64),
    Flag(bool),
}

fn lookup_fact(property: &str, input: &TransitionInput, physical: &PhysicalState) -> Option<Fact> {
    match property {
        "horizontal" => Some(Fact::Number(input.horizontal as f64)),
        "jumpPressed" => Some(Fact::Flag(input.jump_pressed)),
        "isGrounded" | "onGround" | "grounded" => Some(Fact::Flag(physical.grounded)),
        "velocityY" => Some(Fact::Number(physical.velocity_y as f64)),
        _ => None,
    }
}

fn compare(fact: Fact, op: CmpOp, value: &Value) -> bool {
    match (fact, value) {
        (Fact::Number(lhs), Value::Number(n)) => {
            let Some(rhs) = n.as_f64() else {
                return false;
            };
            match op {
                CmpOp::Lt => lhs < rhs,
                CmpOp::Le => lhs <= rhs,
                CmpOp::Gt => lhs > rhs,
                CmpOp::Ge => lhs >= rhs,
                CmpOp::Eq => lhs == rhs,
                CmpOp::Ne => lhs != rhs,
            }
        }
        (Fact::Flag(lhs), Value::Bool(rhs)) => match op {
            CmpOp::Eq => lhs == *rhs,
            CmpOp::Ne => lhs != *rhs,
            _ => false,
        },
        _ => false,
    }
}

/// Evaluate a transition condition against sampled input and physical state.
pub fn evaluate(condition: &Condition, input: &TransitionInput, physical: &PhysicalState) -> bool {
    match condition {
        Condition::Literal(b) => *b,
        Condition::Keyword(Keyword::Always) => true,
        Condition::AnyOf(conditions) => conditions
            .iter()
            .any(|cond| evaluate(cond, input, physical)),
        Condition::Predicate(predicate) => match *predicate {
            Predicate::Always(b) => b,
            Predicate::MinHorizontal(min) => input.horizontal.abs() >= min,
            Predicate::MaxHorizontal(max) => input.horizontal.abs() <= max,
            Predicate::JumpPressed(expected) => input.jump_pressed == expected,
            Predicate::IsGrounded(expected) => physical.grounded == expected,
            Predicate::VelocityYLessThan(threshold) => physical.velocity_y < threshold,
            Predicate::VelocityYGreaterThan(threshold) => physical.velocity_y > threshold,
        },
        Condition::Compare(cmp) => lookup_fact(&cmp.property, input, physical)
            .map(|fact| compare(fact, cmp.op, &cmp.value))
            .unwrap_or(false),
        Condition::Unrecognized(_) => false,
    }
}

/// Targets whose conditions currently hold, in map order.
pub fn active_transitions<'a>(
    transitions: &'a BTreeMap<String, Condition>,
    input: &TransitionInput,
    physical: &PhysicalState,
) -> SmallVec<[&'a str; 4]> {
    transitions
        .iter()
        .filter(|(_, cond)| evaluate(cond, input, physical))
        .map(|(target, _)| target.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Condition {
        serde_json::from_str(json).unwrap()
    }

    fn input(horizontal: f32, jump_pressed: bool) -> TransitionInput {
        TransitionInput {
            horizontal,
            jump_pressed,
        }
    }

    fn physical(grounded: bool, velocity_y: f32) -> PhysicalState {
        PhysicalState {
            grounded,
            velocity_y,
        }
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!(parse("true"), Condition::Literal(true));
        assert_eq!(parse("\"always\""), Condition::always());
        assert_eq!(
            parse("{\"minHorizontal\": 0.2}"),
            Condition::Predicate(Predicate::MinHorizontal(0.2))
        );
        assert_eq!(
            parse("{\"isGrounded\": false}"),
            Condition::Predicate(Predicate::IsGrounded(false))
        );
        assert!(matches!(
            parse("[{\"jumpPressed\": true}, false]"),
            Condition::AnyOf(ref v) if v.len() == 2
        ));
        assert!(matches!(
            parse("{\"property\": \"velocityY\", \"op\": \"gte\", \"value\": 10}"),
            Condition::Compare(PropertyCmp { op: CmpOp::Ge, .. })
        ));
    }

    #[test]
    fn test_unknown_shapes_are_kept_and_false() {
        let cond = parse("{\"teleport\": 3}");
        assert!(matches!(cond, Condition::Unrecognized(_)));
        assert!(!evaluate(&cond, &input(1.0, true), &physical(true, 0.0)));
        assert!(!evaluate(&parse("null"), &input(0.0, false), &physical(true, 0.0)));
        assert!(!evaluate(&parse("\"sometimes\""), &input(0.0, false), &physical(true, 0.0)));
    }

    #[test]
    fn test_min_horizontal() {
        let cond = parse("{\"minHorizontal\": 0.2}");
        assert!(evaluate(&cond, &input(0.5, false), &physical(true, 0.0)));
        assert!(evaluate(&cond, &input(-0.5, false), &physical(true, 0.0)));
        assert!(!evaluate(&cond, &input(0.1, false), &physical(true, 0.0)));
    }

    #[test]
    fn test_max_horizontal() {
        let cond = Condition::Predicate(Predicate::MaxHorizontal(0.1));
        assert!(evaluate(&cond, &input(0.0, false), &physical(true, 0.0)));
        assert!(!evaluate(&cond, &input(-0.5, false), &physical(true, 0.0)));
    }

    #[test]
    fn test_always_and_literals() {
        let i = input(0.0, false);
        let p = physical(false, 0.0);
        assert!(evaluate(&Condition::always(), &i, &p));
        assert!(evaluate(&Condition::Literal(true), &i, &p));
        assert!(!evaluate(&Condition::Literal(false), &i, &p));
        assert!(evaluate(&parse("{\"always\": true}"), &i, &p));
    }

    #[test]
    fn test_jump_and_grounded_equality() {
        let jump = Condition::Predicate(Predicate::JumpPressed(true));
        assert!(evaluate(&jump, &input(0.0, true), &physical(true, 0.0)));
        assert!(!evaluate(&jump, &input(0.0, false), &physical(true, 0.0)));

        let airborne = Condition::Predicate(Predicate::IsGrounded(false));
        assert!(evaluate(&airborne, &input(0.0, false), &physical(false, 0.0)));
        assert!(!evaluate(&airborne, &input(0.0, false), &physical(true, 0.0)));
    }

    #[test]
    fn test_velocity_thresholds_are_strict() {
        let rising = Condition::Predicate(Predicate::VelocityYLessThan(0.0));
        assert!(evaluate(&rising, &input(0.0, false), &physical(false, -10.0)));
        assert!(!evaluate(&rising, &input(0.0, false), &physical(false, 0.0)));

        let falling = Condition::Predicate(Predicate::VelocityYGreaterThan(0.0));
        assert!(evaluate(&falling, &input(0.0, false), &physical(false, 5.0)));
        assert!(!evaluate(&falling, &input(0.0, false), &physical(false, 0.0)));
    }

    #[test]
    fn test_any_of_semantics() {
        let cond = parse("[{\"jumpPressed\": true}, {\"minHorizontal\": 0.5}]");
        assert!(evaluate(&cond, &input(0.6, false), &physical(true, 0.0)));
        assert!(evaluate(&cond, &input(0.0, true), &physical(true, 0.0)));
        assert!(!evaluate(&cond, &input(0.2, false), &physical(true, 0.0)));
        assert!(!evaluate(&Condition::AnyOf(vec![]), &input(0.0, false), &physical(true, 0.0)));
    }

    #[test]
    fn test_property_compare() {
        let fast_fall = parse("{\"property\": \"velocityY\", \"op\": \"gte\", \"value\": 100}");
        assert!(evaluate(&fast_fall, &input(0.0, false), &physical(false, 100.0)));
        assert!(!evaluate(&fast_fall, &input(0.0, false), &physical(false, 99.0)));

        let on_ground = parse("{\"property\": \"onGround\", \"op\": \"eq\", \"value\": true}");
        assert!(evaluate(&on_ground, &input(0.0, false), &physical(true, 0.0)));

        // Ordering ops on flags and mismatched value types are false.
        let bad = parse("{\"property\": \"jumpPressed\", \"op\": \"lt\", \"value\": true}");
        assert!(!evaluate(&bad, &input(0.0, true), &physical(true, 0.0)));
        let missing = parse("{\"property\": \"mana\", \"op\": \"eq\", \"value\": 1}");
        assert!(!evaluate(&missing, &input(0.0, false), &physical(true, 0.0)));
    }

    #[test]
    fn test_active_transitions_in_order() {
        let mut transitions = BTreeMap::new();
        transitions.insert("run".to_string(), parse("{\"minHorizontal\": 0.5}"));
        transitions.insert("jump".to_string(), parse("{\"jumpPressed\": true}"));
        transitions.insert("fall".to_string(), parse("{\"velocityYGreaterThan\": 0}"));

        let active = active_transitions(&transitions, &input(1.0, true), &physical(true, 0.0));
        assert_eq!(active.as_slice(), &["jump", "run"]);

        let none = active_transitions(&transitions, &input(0.0, false), &physical(true, 0.0));
        assert!(none.is_empty());
    }

    #[test]
    fn test_serialize_keeps_authoring_shape() {
        let cond = Condition::Predicate(Predicate::MinHorizontal(0.5));
        assert_eq!(serde_json::to_string(&cond).unwrap(), "{\"minHorizontal\":0.5}");
        assert_eq!(serde_json::to_string(&Condition::always()).unwrap(), "\"always\"");
    }
}

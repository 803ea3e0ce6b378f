use serde_json::{Map, Number, Value};

/// Structural equality with numeric comparison of numbers.
///
/// Unlike `Value`'s `PartialEq`, `1` and `1.0` are equal here. Object key
/// order is ignored; array order is not.
pub fn equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(left), Value::Bool(right)) => left == right,
        (Value::Number(left), Value::Number(right)) => equal_numbers(left, right),
        (Value::String(left), Value::String(right)) => left == right,
        (Value::Array(left), Value::Array(right)) => equal_arrays(left, right),
        (Value::Object(left), Value::Object(right)) => equal_objects(left, right),
        _ => false,
    }
}

pub(crate) fn equal_numbers(left: &Number, right: &Number) -> bool {
    if let (Some(left), Some(right)) = (left.as_u64(), right.as_u64()) {
        return left == right;
    }
    if let (Some(left), Some(right)) = (left.as_i64(), right.as_i64()) {
        return left == right;
    }
    match (left.as_f64(), right.as_f64()) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}

fn equal_arrays(left: &[Value], right: &[Value]) -> bool {
    left.len() == right.len() && left.iter().zip(right).all(|(l, r)| equal(l, r))
}

fn equal_objects(left: &Map<String, Value>, right: &Map<String, Value>) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .all(|(key, l)| right.get(key).is_some_and(|r| equal(l, r)))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;

    use super::*;

    #[test_case(json!(null), json!(null); "null")]
    #[test_case(json!(1), json!(1.0); "integer and float")]
    #[test_case(json!(-7), json!(-7.0); "negative integer and float")]
    #[test_case(json!(0.0), json!(-0.0); "signed zeros")]
    #[test_case(json!("é"), json!("é"); "unicode string")]
    #[test_case(json!([1, [2.0, {"a": 3}]]), json!([1.0, [2, {"a": 3.0}]]); "nested numbers")]
    #[test_case(json!({"a": 1, "b": 2}), json!({"b": 2, "a": 1}); "object key order")]
    fn equal_values(left: Value, right: Value) {
        assert!(equal(&left, &right));
        assert!(equal(&right, &left));
    }

    #[test_case(json!(null), json!(false); "null and false")]
    #[test_case(json!(0), json!(false); "zero and false")]
    #[test_case(json!(1), json!("1"); "number and string")]
    #[test_case(json!(1), json!(1.5); "different numbers")]
    #[test_case(json!(-1), json!(18446744073709551615u64); "sign")]
    #[test_case(json!([1, 2]), json!([2, 1]); "array order")]
    #[test_case(json!([1]), json!([1, 1]); "array length")]
    #[test_case(json!({"a": 1}), json!({"a": 1, "b": 1}); "extra key")]
    #[test_case(json!({"a": 1}), json!({"b": 1}); "different key")]
    fn unequal_values(left: Value, right: Value) {
        assert!(!equal(&left, &right));
        assert!(!equal(&right, &left));
    }
}

use serde_json::Value;

/// Deep structural equality over JSON-like values.
///
/// Primitives compare by value (numbers numerically, so `1` and `1.0` are
/// equal), arrays by length then index-wise recursion, objects by identical
/// key-set then per-key recursion. Any type mismatch between the two sides is
/// unequal, and `null` compares equal only to `null` — an absent key is a
/// different thing from an explicit null and is handled by the caller.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(l), Value::Bool(r)) => l == r,
        (Value::Number(l), Value::Number(r)) => match (l.as_f64(), r.as_f64()) {
            (Some(lf), Some(rf)) => lf == rf,
            _ => l == r,
        },
        (Value::String(l), Value::String(r)) => l == r,
        (Value::Array(l), Value::Array(r)) => {
            l.len() == r.len() && l.iter().zip(r.iter()).all(|(lv, rv)| deep_equal(lv, rv))
        }
        (Value::Object(l), Value::Object(r)) => {
            l.len() == r.len()
                && l.iter()
                    .all(|(key, lv)| r.get(key).is_some_and(|rv| deep_equal(lv, rv)))
        }
        _ => false,
    }
}

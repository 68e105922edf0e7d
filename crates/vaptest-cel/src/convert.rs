use cel_interpreter::Value;
use cel_interpreter::objects::{Key, Map};
use serde_json::Value as Json;
use std::collections::HashMap;
use std::sync::Arc;
use vaptest_domain::RequestInfo;

/// JSON numbers become `int` whenever they fit, so YAML integers compare
/// against integer literals.
pub(crate) fn to_cel(value: &Json) -> Value {
    match value {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => Value::Int(i),
            (None, Some(u)) => Value::UInt(u),
            (None, None) => Value::Float(n.as_f64().unwrap_or_default()),
        },
        Json::String(s) => string(s),
        Json::Array(items) => Value::List(Arc::new(items.iter().map(to_cel).collect())),
        Json::Object(fields) => map(fields.iter().map(|(k, v)| (k.as_str(), to_cel(v)))),
    }
}

pub(crate) fn optional(value: Option<&Json>) -> Value {
    value.map(to_cel).unwrap_or(Value::Null)
}

pub(crate) fn string(s: &str) -> Value {
    Value::String(Arc::new(s.to_string()))
}

pub(crate) fn map<'a>(entries: impl IntoIterator<Item = (&'a str, Value)>) -> Value {
    let map: HashMap<Key, Value> = entries
        .into_iter()
        .map(|(k, v)| (Key::String(Arc::new(k.to_string())), v))
        .collect();
    Value::Map(Map { map: Arc::new(map) })
}

fn strings(items: &[String]) -> Value {
    Value::List(Arc::new(items.iter().map(|s| string(s)).collect()))
}

/// `request` as admission webhooks see it (the subset the harness knows).
pub(crate) fn request(info: &RequestInfo) -> Value {
    let user = &info.user_info;
    map([
        ("operation", string(info.operation.as_str())),
        (
            "kind",
            map([
                ("group", string(&info.kind.group)),
                ("version", string(&info.kind.version)),
                ("kind", string(&info.kind.kind)),
            ]),
        ),
        ("namespace", string(&info.namespace)),
        ("name", string(&info.name)),
        (
            "userInfo",
            map([
                ("username", string(&user.name)),
                ("groups", strings(&user.groups)),
                (
                    "extra",
                    map(user.extra.iter().map(|(k, v)| (k.as_str(), strings(v)))),
                ),
            ]),
        ),
    ])
}

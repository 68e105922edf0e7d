use serde::Deserialize;
use serde_json::Value;
use vaptest_types::ids;

/// Decode every document of a multi-document YAML stream.
///
/// Empty documents (`---` with nothing after it) are dropped. `kind: List`
/// documents are replaced by their items. The first document that fails to
/// decode ends the stream: it is returned as the last entry, and the documents
/// after it are skipped.
pub fn decode_documents(text: &str) -> Vec<anyhow::Result<Value>> {
    let mut out = Vec::new();
    for doc in serde_yaml_ng::Deserializer::from_str(text) {
        match Value::deserialize(doc) {
            Ok(Value::Null) => {}
            Ok(value) => expand_list(value, &mut out),
            Err(err) => {
                // The underlying parser repeats its error forever once it fails.
                out.push(Err(
                    anyhow::Error::from(err).context("remaining documents in this file are skipped")
                ));
                break;
            }
        }
    }
    out
}

fn expand_list(value: Value, out: &mut Vec<anyhow::Result<Value>>) {
    if value.get("kind").and_then(Value::as_str) != Some(ids::KIND_LIST) {
        out.push(Ok(value));
        return;
    }
    match value.get("items") {
        Some(Value::Array(items)) => {
            for item in items {
                expand_list(item.clone(), out);
            }
        }
        None | Some(Value::Null) => {}
        Some(_) => out.push(Err(anyhow::anyhow!("List items must be a sequence"))),
    }
}

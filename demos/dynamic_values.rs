//! Working with Value when the document type is not known.
//!
//! Run with: cargo run --example dynamic_values

use refjson::{from_str, to_string, value, Value};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let config = value!({
        "host": "localhost",
        "port": 8080,
        "features": ["auth", "logging"],
        "debug": true,
        "proxy": null
    });

    println!("Config:\n{}\n", to_string(&config)?);

    if let Some(host) = config.get("host").and_then(Value::as_str) {
        println!("Accessing field 'host': {}", host);
    }
    if let Some(port) = config.get("port").and_then(Value::as_i64) {
        println!("Accessing field 'port': {}", port);
    }
    if let Some(Value::Array(features)) = config.get("features") {
        println!("Accessing field 'features': {} items\n", features.len());
    }

    // A document with back-references decodes without a target type.
    let graph: Value = from_str(r#"{"name":"root","children":[{"name":"leaf","parent":$0$}]}"#)?;
    let leaf = graph
        .get("children")
        .and_then(Value::as_array)
        .and_then(|children| children.first())
        .ok_or("missing child")?;
    println!("Leaf parent: {:?}", leaf.get("parent"));
    println!("Re-encoded: {}", graph);

    // Serde interop with plain JSON.
    println!("As JSON:    {}", serde_json::to_string(&graph)?);

    Ok(())
}

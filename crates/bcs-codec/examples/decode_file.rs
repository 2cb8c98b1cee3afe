//! Simple decoder to inspect BCS payloads.
//!
//! Usage: `decode_file <type> <file> [hex|base58|base64|raw]`
//!
//! The file holds either raw bytes or text in the given encoding. `address`
//! is available as a type; anything else must be built from primitives and
//! containers, e.g. `vector<Option<u64>>`.

use std::fs;

use bcs_codec::{Bcs, Encoding, Value};

fn describe(value: &Value, indent: usize) {
    let pad = "  ".repeat(indent);
    match value {
        Value::Struct(fields) => {
            for (name, field) in fields {
                match field {
                    Value::Struct(_) | Value::Map(_) => {
                        println!("{}{}:", pad, name);
                        describe(field, indent + 1);
                    }
                    _ => println!("{}{}: {}", pad, name, field),
                }
            }
        }
        Value::Map(entries) => {
            for (k, v) in entries {
                println!("{}{} => {}", pad, k, v);
            }
        }
        Value::Vector(items) => {
            if let Some(bytes) = value.as_byte_array() {
                println!("{}0x{}", pad, hex::encode(bytes));
                return;
            }
            for (i, item) in items.iter().take(20).enumerate() {
                println!("{}[{}] {}", pad, i, item);
            }
            if items.len() > 20 {
                println!("{}... and {} more items", pad, items.len() - 20);
            }
        }
        other => println!("{}{}", pad, other),
    }
}

fn main() {
    let mut args = std::env::args().skip(1);
    let type_str = args.next().unwrap_or_else(|| "vector<u8>".to_string());
    let path = args.next().unwrap_or_else(|| "payload.bcs".to_string());
    let encoding = args.next().unwrap_or_else(|| "raw".to_string());

    println!("Reading: {} as {}", path, type_str);

    let data = fs::read(&path).expect("Failed to read file");
    println!("File size: {} bytes", data.len());

    let bcs = Bcs::with_move_prelude();
    let value = if encoding == "raw" {
        bcs.decode_str(&type_str, &data).expect("Failed to decode")
    } else {
        let encoding: Encoding = encoding.parse().expect("Unknown encoding");
        let text = String::from_utf8(data).expect("Input is not text");
        bcs.decode_encoded(&type_str, text.trim(), encoding)
            .expect("Failed to decode")
    };

    println!("\n=== Value ({}) ===", value.kind_name());
    describe(&value, 0);
}

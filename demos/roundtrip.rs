//! Your first round trip: encode a few values, print the payload, decode
//! it back.
//!
//! Run with: `cargo run --example roundtrip`

use textpack::{from_bytes, pack, to_bytes, Value};

fn main() {
    let profile = pack!({
        "name": "Alice",
        "admin": true,
        "level": 9,
        "tags": ["ops", "oncall"]
    });

    let values = vec![profile, Value::Nil, Value::from("trailing note")];

    let payload = to_bytes(&values).expect("these values are cycle-free");
    println!("payload: {} bytes", payload.len());
    println!("escaped: {:?}", String::from_utf8_lossy(&payload));

    let decoded = from_bytes(&payload).expect("we just encoded this");
    assert_eq!(decoded, values);

    for (slot, value) in decoded.iter().enumerate() {
        println!("slot {}: {}", slot, value);
    }
}

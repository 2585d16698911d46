//! Working with containers dynamically: building, sharing, and inspecting
//! values whose shape isn't known at compile time, plus what happens when
//! a container ends up inside itself.
//!
//! Run with: `cargo run --example dynamic_values`

use textpack::{from_bytes, to_bytes, Container, EncodeError, Value};

fn main() {
    // The same container referenced from two entries is fine: each
    // occurrence encodes independently and decodes as its own copy.
    let shared = Container::new();
    shared.insert("host", "node-3");
    shared.insert("port", 4222);

    let root = Container::new();
    root.insert("primary", shared.clone());
    root.insert("fallback", shared.clone());

    let payload = to_bytes(&[Value::Container(root)]).unwrap();
    let decoded = from_bytes(&payload).unwrap();
    let back = decoded[0].as_container().unwrap();

    let primary = back.get("primary").unwrap();
    let fallback = back.get("fallback").unwrap();
    println!(
        "decoded copies equal: {}",
        primary == fallback
    );
    println!(
        "decoded copies share identity: {}",
        primary
            .as_container()
            .unwrap()
            .same_as(fallback.as_container().unwrap())
    );

    // A cycle, on the other hand, is rejected before any output is
    // produced.
    shared.insert("loop", shared.clone());
    let err = to_bytes(&[Value::Container(shared)]).unwrap_err();
    assert_eq!(err, EncodeError::CircularReference);
    println!("cycle rejected: {}", err);
}

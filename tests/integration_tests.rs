use textpack::{from_bytes, pack, to_bytes, Container, DecodeError, EncodeError, Key, Value};

fn round_trip(values: &[Value]) -> Vec<Value> {
    let payload = to_bytes(values).expect("encode failed");
    from_bytes(&payload).expect("decode failed")
}

#[test]
fn test_primitive_round_trips() {
    for value in [
        Value::Nil,
        Value::Bool(true),
        Value::Bool(false),
        Value::from(0),
        Value::from(i64::MAX),
        Value::from(i64::MIN),
        Value::from(0.5),
        Value::from(-1234.25),
        Value::from(f64::INFINITY),
        Value::from(f64::NEG_INFINITY),
        Value::from(""),
        Value::from("plain ascii"),
        Value::from("unicode: héllo 👋"),
        Value::Text(vec![0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0xff]),
    ] {
        assert_eq!(round_trip(&[value.clone()]), vec![value]);
    }
}

#[test]
fn test_positional_multi_value_integrity() {
    let values = vec![Value::from("A"), Value::Nil, Value::from("C")];
    let decoded = round_trip(&values);
    assert_eq!(decoded.len(), 3);
    assert_eq!(decoded, values);
}

#[test]
fn test_nested_container_round_trip() {
    let value = pack!({
        "user": {
            "name": "Alice",
            "active": true,
            "scores": [90, 95, 100]
        },
        "attempts": 3,
        "ratio": 0.75,
        "note": nil
    });

    let decoded = round_trip(&[value.clone()]);
    assert_eq!(decoded, vec![value]);
}

#[test]
fn test_concrete_scenario_two_entry_container() {
    // {"a": 1, "b": true} comes back with exactly those entries, whatever
    // byte order the encoder picked for them.
    let container = Container::new();
    container.insert("a", 1);
    container.insert("b", true);

    let decoded = round_trip(&[Value::Container(container)]);
    let back = decoded[0].as_container().unwrap();
    assert_eq!(back.len(), 2);
    assert_eq!(back.get("a"), Some(Value::from(1)));
    assert_eq!(back.get("b"), Some(Value::from(true)));
}

#[test]
fn test_numeric_and_float_keys_round_trip() {
    let container = Container::new();
    container.insert(1i64, "first");
    container.insert(-3i64, "negative");
    container.insert(2.5f64, "half");
    container.insert("text", "key");

    let decoded = round_trip(&[Value::Container(container.clone())]);
    assert_eq!(decoded, vec![Value::Container(container)]);
}

#[test]
fn test_empty_container_round_trips() {
    let decoded = round_trip(&[Value::Container(Container::new())]);
    assert_eq!(decoded[0].as_container().unwrap().len(), 0);
}

#[test]
fn test_shared_container_decodes_as_independent_copies() {
    let shared = Container::new();
    shared.insert("x", 42);

    let root = Container::new();
    root.insert("a", shared.clone());
    root.insert("b", shared.clone());

    let decoded = round_trip(&[Value::Container(root)]);
    let back = decoded[0].as_container().unwrap();

    let a = back.get("a").unwrap();
    let b = back.get("b").unwrap();
    let a = a.as_container().unwrap();
    let b = b.as_container().unwrap();

    // Structurally equal, identity-distinct.
    assert_eq!(a, b);
    assert!(!a.same_as(b));
    assert_eq!(a.get("x"), Some(Value::from(42)));
}

#[test]
fn test_direct_cycle_is_rejected() {
    let container = Container::new();
    container.insert("me", container.clone());

    let err = to_bytes(&[Value::Container(container)]).unwrap_err();
    assert_eq!(err, EncodeError::CircularReference);
}

#[test]
fn test_transitive_cycle_is_rejected() {
    let a = Container::new();
    let b = Container::new();
    let c = Container::new();
    a.insert("b", b.clone());
    b.insert("c", c.clone());
    c.insert("a", a.clone());

    let err = to_bytes(&[Value::Container(a)]).unwrap_err();
    assert_eq!(err, EncodeError::CircularReference);
}

#[test]
fn test_same_container_twice_at_top_level_is_not_a_cycle() {
    let shared = Container::new();
    shared.insert("k", "v");

    let values = vec![
        Value::Container(shared.clone()),
        Value::Container(shared),
    ];
    let decoded = round_trip(&values);
    assert_eq!(decoded, values);
}

#[test]
fn test_malformed_inputs_fail_gracefully() {
    assert!(matches!(
        from_bytes(b"").unwrap_err(),
        DecodeError::InputTooShort { .. }
    ));
    assert!(matches!(
        from_bytes(&[0x05]).unwrap_err(),
        DecodeError::InputTooShort { .. }
    ));
    assert!(matches!(
        from_bytes(&[0x05, b'9']).unwrap_err(),
        DecodeError::UnsupportedVersion { .. }
    ));
    assert!(matches!(
        from_bytes(b"ZZ").unwrap_err(),
        DecodeError::InvalidHeader { .. }
    ));
}

#[test]
fn test_truncated_container_reports_end_of_input() {
    let container = Container::new();
    container.insert("key", "value");
    let mut payload = to_bytes(&[Value::Container(container)]).unwrap();

    // Drop the container-end tag.
    payload.truncate(payload.len() - 2);
    let err = from_bytes(&payload).unwrap_err();
    assert!(matches!(err, DecodeError::UnexpectedEndOfInput { .. }));
}

#[test]
fn test_every_truncation_fails_or_shortens_cleanly() {
    // Chopping a valid payload anywhere must never panic; each prefix
    // either fails with a diagnostic or decodes to fewer values.
    let values = vec![
        pack!({ "a": [1, 2.5, "three"], "b": nil }),
        Value::from("tail"),
    ];
    let payload = to_bytes(&values).unwrap();

    for end in 0..payload.len() {
        let _ = from_bytes(&payload[..end]);
    }
}

#[test]
fn test_error_messages_carry_context() {
    let err = from_bytes(&[0x05, b'7']).unwrap_err();
    assert!(err.to_string().contains("version"));

    let err = from_bytes(&[0x05, b'1', 0x05, b'?']).unwrap_err();
    assert!(err.to_string().contains("offset 2"));
}

#[test]
fn test_text_with_every_reserved_byte() {
    let mut content = Vec::new();
    for byte in 0x00u8..=0x10 {
        content.push(byte);
        content.extend_from_slice(b"gap");
    }
    let decoded = round_trip(&[Value::Text(content.clone())]);
    assert_eq!(decoded, vec![Value::Text(content)]);
}

#[test]
fn test_key_ordering_is_preserved_on_encode_but_not_required() {
    // Insertion order survives a round trip with this implementation, but
    // equality never depends on it.
    let forward = Container::new();
    forward.insert("one", 1);
    forward.insert("two", 2);

    let reverse = Container::new();
    reverse.insert("two", 2);
    reverse.insert("one", 1);

    let decoded = round_trip(&[Value::Container(forward.clone())]);
    assert_eq!(decoded[0].as_container().unwrap().entries()[0].0, Key::from("one"));
    assert_eq!(decoded, vec![Value::Container(reverse)]);
}

#[test]
fn test_many_values_in_one_payload() {
    let values: Vec<Value> = (0..200)
        .map(|i| match i % 4 {
            0 => Value::from(i),
            1 => Value::from(format!("value-{}", i)),
            2 => Value::Nil,
            _ => Value::from(i as f64 + 0.5),
        })
        .collect();

    assert_eq!(round_trip(&values), values);
}

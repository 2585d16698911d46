/// Builds a [`crate::Value`] from literal syntax.
///
/// Braces build containers with text keys; brackets build containers keyed
/// `1..=n`, the array convention of the source environment. `nil`, `true`,
/// `false`, numbers, and strings map to the obvious variants.
///
/// ```rust
/// use textpack::pack;
///
/// let value = pack!({
///     "name": "Alice",
///     "scores": [90, 95],
///     "active": true,
///     "note": nil
/// });
///
/// let container = value.as_container().unwrap();
/// assert_eq!(container.len(), 4);
/// assert_eq!(container.get("scores").unwrap().as_container().unwrap().len(), 2);
/// ```
#[macro_export]
macro_rules! pack {
    (nil) => {
        $crate::Value::Nil
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Container($crate::Container::new())
    };

    ([ $($elem:tt),* $(,)? ]) => {{
        let container = $crate::Container::new();
        let mut index: i64 = 0;
        $(
            index += 1;
            container.insert(index, $crate::pack!($elem));
        )*
        let _ = index;
        $crate::Value::Container(container)
    }};

    ({}) => {
        $crate::Value::Container($crate::Container::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let container = $crate::Container::new();
        $(
            container.insert($key, $crate::pack!($value));
        )*
        $crate::Value::Container(container)
    }};

    ($other:expr) => {
        $crate::Value::from($other)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Number, Value};

    #[test]
    fn primitives() {
        assert_eq!(pack!(nil), Value::Nil);
        assert_eq!(pack!(true), Value::Bool(true));
        assert_eq!(pack!(false), Value::Bool(false));
        assert_eq!(pack!(42), Value::Number(Number::Integer(42)));
        assert_eq!(pack!(3.5), Value::Number(Number::Float(3.5)));
        assert_eq!(pack!("hello"), Value::from("hello"));
    }

    #[test]
    fn lists_key_from_one() {
        assert_eq!(pack!([]).as_container().unwrap().len(), 0);

        let list = pack!([10, 20, 30]);
        let container = list.as_container().unwrap();
        assert_eq!(container.len(), 3);
        assert_eq!(container.get(1i64), Some(Value::from(10)));
        assert_eq!(container.get(3i64), Some(Value::from(30)));
    }

    #[test]
    fn nested_containers() {
        let value = pack!({
            "user": {
                "name": "Alice",
                "tags": ["admin", "user"]
            },
            "count": 2
        });

        let root = value.as_container().unwrap();
        assert_eq!(root.get("count"), Some(Value::from(2)));

        let user = root.get("user").unwrap();
        let user = user.as_container().unwrap();
        assert_eq!(user.get("name"), Some(Value::from("Alice")));

        let tags = user.get("tags").unwrap();
        let tags = tags.as_container().unwrap();
        assert_eq!(tags.get(2i64), Some(Value::from("user")));
    }
}

/// Registers the serializable members of a struct.
///
/// Implements [`Object`](crate::Object), [`ToJson`](crate::ToJson) and
/// [`FromJson`](crate::FromJson) for the struct. Members are listed with their
/// declared type, in the order they are written. A member can be renamed on the
/// wire with `as "name"` and excluded with `#[ignore]`. Doc comments on members
/// are accepted and skipped. Unlisted fields are never touched and keep their
/// default value after decoding.
///
/// The struct must implement [`Default`].
///
/// # Examples
///
/// ```rust
/// use refjson::{from_str, impl_object, to_string};
///
/// #[derive(Default, Debug, PartialEq)]
/// struct Account {
///     id: u64,
///     owner: String,
///     session: Option<String>,
/// }
///
/// impl_object!(Account {
///     id as "Id": u64,
///     owner: String,
///     #[ignore]
///     session: Option<String>,
/// });
///
/// let account = Account { id: 9, owner: "ana".to_string(), session: Some("tmp".to_string()) };
/// let json = to_string(&account).unwrap();
/// assert_eq!(json, r#"{"Id":9,"owner":"ana"}"#);
///
/// let back: Account = from_str(&json).unwrap();
/// assert_eq!(back.session, None);
/// ```
#[macro_export]
macro_rules! impl_object {
    ($ty:ident {
        $( $(#[$($attr:tt)*])* $field:ident $(as $rename:literal)? : $fty:ty ),* $(,)?
    }) => {
        impl $crate::Object for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);

            fn members() -> &'static [$crate::Member<Self>] {
                const MEMBERS: &[$crate::Member<$ty>] = &[
                    $(
                        $crate::impl_object!(@attrs $crate::Member::new(
                            $crate::impl_object!(@name $field $($rename)?),
                            <$fty as $crate::ToJson>::KIND,
                            <$fty as $crate::ToJson>::ELEMENT_KIND,
                            |object: &$ty, encoder: &mut $crate::Encoder| {
                                $crate::ToJson::to_json(&object.$field, encoder)
                            },
                            |object: &mut $ty, decoder: &mut $crate::Decoder| {
                                object.$field = <$fty as $crate::FromJson>::from_json(decoder)?;
                                Ok(())
                            },
                        ); $([ $($attr)* ])*)
                    ),*
                ];
                MEMBERS
            }
        }

        impl $crate::ToJson for $ty {
            const KIND: $crate::Kind = $crate::Kind::Composite;

            fn to_json(&self, encoder: &mut $crate::Encoder) -> $crate::Result<()> {
                encoder.write_object(self)
            }
        }

        impl $crate::FromJson for $ty {
            fn from_json(decoder: &mut $crate::Decoder) -> $crate::Result<Self> {
                decoder.read_object()
            }
        }
    };

    (@attrs $member:expr;) => {
        $member
    };

    (@attrs $member:expr; [ignore] $($rest:tt)*) => {
        $crate::impl_object!(@attrs $member.ignore(); $($rest)*)
    };

    (@attrs $member:expr; [doc = $doc:literal] $($rest:tt)*) => {
        $crate::impl_object!(@attrs $member; $($rest)*)
    };

    (@name $field:ident) => {
        stringify!($field)
    };

    (@name $field:ident $rename:literal) => {
        $rename
    };
}

/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// Numbers and booleans become primitives, string literals become strings.
/// Any other expression is converted with `Value::from`.
#[macro_export]
macro_rules! value {
    // Handle null
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Primitive("true".to_string())
    };

    (false) => {
        $crate::Value::Primitive("false".to_string())
    };

    // Handle empty array
    ([]) => {
        $crate::Value::Array(vec![])
    };

    // Handle non-empty array
    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::value!($elem)),*])
    };

    // Handle empty object
    ({}) => {
        $crate::Value::Object($crate::ObjectMap::new())
    };

    // Handle non-empty object
    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::ObjectMap::new();
        $(
            object.insert($key.to_string(), $crate::value!($value));
        )*
        $crate::Value::Object(object)
    }};

    ($other:expr) => {
        $crate::Value::from($other)
    };
}

#[cfg(test)]
mod tests {
    use crate::{ObjectMap, Value};

    #[test]
    fn test_value_macro_scalars() {
        assert_eq!(value!(null), Value::Null);
        assert_eq!(value!(true), Value::Primitive("true".to_string()));
        assert_eq!(value!(42), Value::Primitive("42".to_string()));
        assert_eq!(value!(2.5), Value::Primitive("2.5".to_string()));
        assert_eq!(value!("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn test_value_macro_nested() {
        let value = value!({
            "name": "Alice",
            "scores": [[1, 2], []],
            "manager": null
        });

        let mut expected = ObjectMap::new();
        expected.insert("name".to_string(), Value::from("Alice"));
        expected.insert(
            "scores".to_string(),
            Value::Array(vec![
                Value::Array(vec![Value::from(1), Value::from(2)]),
                Value::Array(vec![]),
            ]),
        );
        expected.insert("manager".to_string(), Value::Null);
        assert_eq!(value, Value::Object(expected));
    }
}

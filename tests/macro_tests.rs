use refjson::{
    describe, find_member, from_str, impl_object, to_string, value, Kind, ObjectMap, Object,
    Value,
};

#[test]
fn test_value_macro_null() {
    assert_eq!(value!(null), Value::Null);
}

#[test]
fn test_value_macro_booleans() {
    assert_eq!(value!(true), Value::Primitive("true".to_string()));
    assert_eq!(value!(false), Value::Primitive("false".to_string()));
    assert_eq!(value!(true).as_bool(), Some(true));
}

#[test]
fn test_value_macro_numbers() {
    assert_eq!(value!(42), Value::Primitive("42".to_string()));
    assert_eq!(value!(3.5), Value::Primitive("3.5".to_string()));
    assert_eq!(value!(-123).as_i64(), Some(-123));
}

#[test]
fn test_value_macro_strings() {
    assert_eq!(value!("hello world"), Value::String("hello world".to_string()));
    assert_eq!(value!(""), Value::String(String::new()));
}

#[test]
fn test_value_macro_arrays() {
    assert_eq!(value!([]), Value::Array(vec![]));
    assert_eq!(
        value!([1, "two", null]),
        Value::Array(vec![Value::from(1), Value::from("two"), Value::Null])
    );
    assert_eq!(value!([[1, 2], []]).to_string(), "[[1,2],[]]");
}

#[test]
fn test_value_macro_objects() {
    assert_eq!(value!({}), Value::Object(ObjectMap::new()));

    let person = value!({
        "name": "Alice",
        "age": 30,
        "address": {
            "city": "Paris"
        }
    });
    assert_eq!(
        person.to_string(),
        r#"{"name":"Alice","age":30,"address":{"city":"Paris"}}"#
    );
    assert_eq!(
        person.get("address").and_then(|a| a.get("city")),
        Some(&Value::from("Paris"))
    );
}

#[test]
fn test_value_macro_expressions() {
    let count = 5u8;
    let name = String::from("dyn");
    let value = value!({ "count": count, "name": name, "missing": (None::<i32>) });
    assert_eq!(value.to_string(), r#"{"count":5,"name":"dyn","missing":null}"#);
}

#[derive(Default, Debug, PartialEq)]
struct Widget {
    id: u32,
    title: String,
    weights: Vec<f32>,
    cache: Vec<u8>,
}

impl_object!(Widget {
    id as "Id": u32,
    title as "Title": String,
    weights: Vec<f32>,
    #[ignore]
    cache: Vec<u8>,
});

#[derive(Default, Debug, PartialEq)]
struct Gauge {
    label: String,
    reading: f64,
    smoothed: f64,
}

impl_object!(Gauge {
    /// Shown next to the dial.
    label: String,
    /// Raw sensor value.
    #[doc = "Written as a primitive."]
    reading: f64,
    /// Recomputed after loading.
    #[ignore]
    smoothed: f64,
});

#[derive(Default, Debug, PartialEq)]
struct Empty {}

impl_object!(Empty {});

#[test]
fn test_impl_object_renames_and_ignores() {
    let widget = Widget {
        id: 4,
        title: "knob".to_string(),
        weights: vec![0.5, 1.0],
        cache: vec![1, 2, 3],
    };
    let json = to_string(&widget).unwrap();
    assert_eq!(json, r#"{"Id":4,"Title":"knob","weights":[0.5,1]}"#);

    let back: Widget = from_str(&json).unwrap();
    assert_eq!(back.cache, Vec::<u8>::new());
    assert_eq!(back.weights, widget.weights);
}

#[test]
fn test_impl_object_metadata() {
    assert_eq!(Widget::TYPE_NAME, "Widget");
    assert_eq!(Widget::members().len(), 4);
    assert_eq!(describe::<Widget>().count(), 3);
    assert!(find_member::<Widget>("id").is_none());
    assert_eq!(
        find_member::<Widget>("weights").map(|m| (m.kind(), m.element_kind())),
        Some((Kind::Array, Some(Kind::Primitive)))
    );
}

#[test]
fn test_impl_object_accepts_doc_comments() {
    let gauge = Gauge {
        label: "tank".to_string(),
        reading: 0.75,
        smoothed: 0.7,
    };
    let json = to_string(&gauge).unwrap();
    assert_eq!(json, r#"{"label":"tank","reading":0.75}"#);
    assert_eq!(describe::<Gauge>().count(), 2);

    let back: Gauge = from_str(&json).unwrap();
    assert_eq!(back.reading, 0.75);
    assert_eq!(back.smoothed, 0.0);
}

#[test]
fn test_impl_object_without_members() {
    assert_eq!(to_string(&Empty {}).unwrap(), "{}");
    assert_eq!(from_str::<Empty>("{}").unwrap(), Empty {});
    assert!(from_str::<Empty>(r#"{"x":1}"#).is_err());
}

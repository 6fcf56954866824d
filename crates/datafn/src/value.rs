//! value representation
//!
//! Every function in this crate consumes and produces [Value]s. The model contains the following data types
//! - null
//! - boolean (true/false)
//! - integer (signed, i64)
//! - decimal (f64)
//! - string (utf-8)
//! - array (ordered "list" of values, see [Array])
//! - object (order-preserving "map"/"dictionary" from [Key] to [Value], see [Object])
//!
//! Additionally:
//! - `integer` and `decimal` are different kinds. `1` and `1.0` are not equal and never converted into each other.
//! - an [Array] remembers the concrete type of its elements. An array built from `Vec<i64>` is an array of integers,
//!   an array decoded from a JSON document is an array of anything ([ElementKind::Any]).
//!   Functions that select a part of an array go through [Array::rebuild] so the element type survives.
//! - object keys are scalars ([Key]). Key equality considers kind and value: `1` and `"1"` are distinct keys.
//!
use indexmap::IndexMap;
use serde::{
    de::{self, MapAccess, SeqAccess, Visitor},
    ser::{SerializeMap, SerializeSeq},
    Deserialize, Deserializer, Serialize, Serializer,
};
use std::fmt;
use std::hash::{Hash, Hasher};

/// All possible value types
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    String(String),
    Array(Array),
    Object(Object),
}

/// Runtime tag of a [Value]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Boolean,
    Integer,
    Decimal,
    String,
    Array,
    Object,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Null => f.write_str("null"),
            Kind::Boolean => f.write_str("boolean"),
            Kind::Integer => f.write_str("integer"),
            Kind::Decimal => f.write_str("decimal"),
            Kind::String => f.write_str("string"),
            Kind::Array => f.write_str("array"),
            Kind::Object => f.write_str("object"),
        }
    }
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Boolean(_) => Kind::Boolean,
            Value::Integer(_) => Kind::Integer,
            Value::Decimal(_) => Kind::Decimal,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Boolean(_) | Value::Integer(_) | Value::Decimal(_) | Value::String(_)
        )
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(int) => Some(*int),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Compact JSON rendering, used in error messages and logs
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

/// An ordered sequence that knows the concrete type of its elements
///
/// Equality is element-wise: `Array::Integer(vec![1])` equals `Array::Any(vec![Value::Integer(1)])`.
/// Use [Array::element_kind] to tell them apart.
#[derive(Debug, Clone)]
pub enum Array {
    Boolean(Vec<bool>),
    Integer(Vec<i64>),
    Decimal(Vec<f64>),
    String(Vec<String>),
    Any(Vec<Value>),
}

/// Concrete element type of an [Array]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Boolean,
    Integer,
    Decimal,
    String,
    Any,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Boolean => f.write_str("boolean"),
            ElementKind::Integer => f.write_str("integer"),
            ElementKind::Decimal => f.write_str("decimal"),
            ElementKind::String => f.write_str("string"),
            ElementKind::Any => f.write_str("any"),
        }
    }
}

/// Run `$body` against the inner vector and wrap the result in the same variant
macro_rules! map_array {
    ($array:expr, |$items:ident| $body:expr) => {
        match $array {
            Array::Boolean($items) => Array::Boolean($body),
            Array::Integer($items) => Array::Integer($body),
            Array::Decimal($items) => Array::Decimal($body),
            Array::String($items) => Array::String($body),
            Array::Any($items) => Array::Any($body),
        }
    };
}

impl Array {
    pub fn element_kind(&self) -> ElementKind {
        match self {
            Array::Boolean(_) => ElementKind::Boolean,
            Array::Integer(_) => ElementKind::Integer,
            Array::Decimal(_) => ElementKind::Decimal,
            Array::String(_) => ElementKind::String,
            Array::Any(_) => ElementKind::Any,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Array::Boolean(items) => items.len(),
            Array::Integer(items) => items.len(),
            Array::Decimal(items) => items.len(),
            Array::String(items) => items.len(),
            Array::Any(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        match self {
            Array::Boolean(items) => items.get(index).map(|v| Value::Boolean(*v)),
            Array::Integer(items) => items.get(index).map(|v| Value::Integer(*v)),
            Array::Decimal(items) => items.get(index).map(|v| Value::Decimal(*v)),
            Array::String(items) => items.get(index).map(|v| Value::String(v.clone())),
            Array::Any(items) => items.get(index).cloned(),
        }
    }

    /// Elements in order, each converted into a [Value]
    pub fn iter(&self) -> impl Iterator<Item = Value> + '_ {
        (0..self.len()).filter_map(move |index| self.get(index))
    }

    /// Build a new array of the same element kind containing the elements at `indices`
    ///
    /// Indices are taken in the given order. Indices past the end are skipped.
    pub fn rebuild<I>(&self, indices: I) -> Array
    where
        I: IntoIterator<Item = usize>,
    {
        let indices = indices.into_iter();
        map_array!(self, |items| select(items, indices))
    }

    pub fn into_values(self) -> Vec<Value> {
        match self {
            Array::Any(items) => items,
            other => other.iter().collect(),
        }
    }
}

fn select<T: Clone>(items: &[T], indices: impl Iterator<Item = usize>) -> Vec<T> {
    indices
        .filter_map(|index| items.get(index).cloned())
        .collect()
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Array::Boolean(a), Array::Boolean(b)) => a == b,
            (Array::Integer(a), Array::Integer(b)) => a == b,
            (Array::Decimal(a), Array::Decimal(b)) => a == b,
            (Array::String(a), Array::String(b)) => a == b,
            (Array::Any(a), Array::Any(b)) => a == b,
            (a, b) => a.len() == b.len() && a.iter().zip(b.iter()).all(|(a, b)| a == b),
        }
    }
}

/// Object key
///
/// Only scalar kinds can be keys. Decimal keys compare by bit pattern (`-0.0` is treated as `0.0`).
#[derive(Debug, Clone)]
pub enum Key {
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    String(String),
}

fn decimal_bits(value: f64) -> u64 {
    if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}

impl Key {
    pub fn kind(&self) -> Kind {
        match self {
            Key::Boolean(_) => Kind::Boolean,
            Key::Integer(_) => Kind::Integer,
            Key::Decimal(_) => Kind::Decimal,
            Key::String(_) => Kind::String,
        }
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Boolean(a), Key::Boolean(b)) => a == b,
            (Key::Integer(a), Key::Integer(b)) => a == b,
            (Key::Decimal(a), Key::Decimal(b)) => decimal_bits(*a) == decimal_bits(*b),
            (Key::String(a), Key::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        match self {
            Key::Boolean(b) => b.hash(state),
            Key::Integer(i) => i.hash(state),
            Key::Decimal(d) => decimal_bits(*d).hash(state),
            Key::String(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Boolean(b) => write!(f, "{b}"),
            Key::Integer(i) => write!(f, "{i}"),
            Key::Decimal(d) => write!(f, "{d}"),
            Key::String(s) => f.write_str(s),
        }
    }
}

/// Fails with the [Kind] of the value when it can not be used as a key
impl TryFrom<&Value> for Key {
    type Error = Kind;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Boolean(b) => Ok(Key::Boolean(*b)),
            Value::Integer(i) => Ok(Key::Integer(*i)),
            Value::Decimal(d) => Ok(Key::Decimal(*d)),
            Value::String(s) => Ok(Key::String(s.clone())),
            other => Err(other.kind()),
        }
    }
}

impl From<Key> for Value {
    fn from(key: Key) -> Self {
        match key {
            Key::Boolean(b) => Value::Boolean(b),
            Key::Integer(i) => Value::Integer(i),
            Key::Decimal(d) => Value::Decimal(d),
            Key::String(s) => Value::String(s),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::String(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::String(value)
    }
}

impl From<bool> for Key {
    fn from(value: bool) -> Self {
        Key::Boolean(value)
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Integer(value)
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Key::Integer(value.into())
    }
}

/// Order-preserving map from [Key] to [Value]
///
/// Iteration follows insertion order, equality does not. Keys and values have no narrower concrete type, so a
/// selection of entries is rebuilt with [Object::from] on an [IndexMap].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object(IndexMap<Key, Value>);

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &Key) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, Value> {
        self.0.iter()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, Key, Value> {
        self.0.keys()
    }

    pub fn entries(&self) -> &IndexMap<Key, Value> {
        &self.0
    }
}

impl From<IndexMap<Key, Value>> for Object {
    fn from(value: IndexMap<Key, Value>) -> Self {
        Object(value)
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for Object {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Object(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a Key, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Value::Array(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Value::Object(value)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

// integers that convert into i64 without loss
macro_rules! integer_conversions {
    ($($int:ty),*) => {
        $(
            impl From<$int> for Value {
                fn from(value: $int) -> Self {
                    Value::Integer(value.into())
                }
            }

            impl From<Vec<$int>> for Value {
                fn from(value: Vec<$int>) -> Self {
                    Value::Array(Array::Integer(value.into_iter().map(Into::into).collect()))
                }
            }
        )*
    };
}

integer_conversions!(i8, i16, i32, i64, u8, u16, u32);

impl From<Vec<bool>> for Value {
    fn from(value: Vec<bool>) -> Self {
        Value::Array(Array::Boolean(value))
    }
}

impl From<Vec<f64>> for Value {
    fn from(value: Vec<f64>) -> Self {
        Value::Array(Array::Decimal(value))
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Value::Array(Array::String(value))
    }
}

impl From<Vec<&str>> for Value {
    fn from(value: Vec<&str>) -> Self {
        Value::Array(Array::String(
            value.into_iter().map(ToString::to_string).collect(),
        ))
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(Array::Any(value))
    }
}

impl From<serde_json::Number> for Value {
    fn from(value: serde_json::Number) -> Self {
        if let Some(int) = value.as_i64() {
            return Value::Integer(int);
        }

        // without arbitrary_precision every number has an f64 representation
        Value::Decimal(value.as_f64().unwrap_or(f64::NAN))
    }
}

/// Decoded documents have no static element type, arrays become [ElementKind::Any]
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Value {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => b.into(),
            serde_json::Value::Number(n) => n.into(),
            serde_json::Value::String(s) => s.into(),
            serde_json::Value::Array(a) => {
                Value::Array(Array::Any(a.into_iter().map(Into::into).collect()))
            }
            serde_json::Value::Object(o) => Value::Object(
                o.into_iter()
                    .map(|(k, v)| (Key::String(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Boolean(value) => serializer.serialize_bool(*value),
            Value::Integer(value) => serializer.serialize_i64(*value),
            Value::Decimal(value) => serializer.serialize_f64(*value),
            Value::String(value) => serializer.serialize_str(value),
            Value::Array(value) => value.serialize(serializer),
            Value::Object(value) => value.serialize(serializer),
        }
    }
}

impl Serialize for Array {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut ser = serializer.serialize_seq(Some(self.len()))?;
        for element in self.iter() {
            ser.serialize_element(&element)?;
        }
        ser.end()
    }
}

impl Serialize for Object {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut ser = serializer.serialize_map(Some(self.len()))?;
        for (element_key, element_value) in self {
            ser.serialize_entry(element_key, element_value)?;
        }
        ser.end()
    }
}

/// Booleans and decimals are written as strings, not every format accepts them as map keys
///
/// Formats with string-only keys (JSON) render `1` and `"1"` the same way, an object holding both then has a
/// duplicate key in the output. YAML keeps them apart.
impl Serialize for Key {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Key::String(value) => serializer.serialize_str(value),
            Key::Integer(value) => serializer.serialize_i64(*value),
            Key::Boolean(_) | Key::Decimal(_) => serializer.collect_str(self),
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Boolean(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(i64::try_from(v).map_or(Value::Decimal(v as f64), Value::Integer))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Decimal(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(Array::Any(items)))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut object = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<Key, Value>()? {
            object.insert(key, value);
        }
        Ok(Value::Object(Object(object)))
    }
}

/// Decoded documents have no static element type, arrays become [ElementKind::Any]. Object order is kept.
impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct KeyVisitor;

impl<'de> Visitor<'de> for KeyVisitor {
    type Value = Key;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a boolean, number or string key")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Key, E> {
        Ok(Key::Boolean(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Key, E> {
        Ok(Key::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Key, E> {
        Ok(i64::try_from(v).map_or(Key::Decimal(v as f64), Key::Integer))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Key, E> {
        Ok(Key::Decimal(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Key, E> {
        Ok(Key::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Key, E> {
        Ok(Key::String(v))
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(KeyVisitor)
    }
}

/// Utility macro to create an argument list for the collection functions
///
/// Every argument is converted with [Value::from]
/// ```
/// # use datafn::args;
/// let args = args!["foo", 1, vec![1, 2, 3]];
/// assert_eq!(args.len(), 3);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::value::Value>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        vec![$($crate::value::Value::from($arg)),+]
    };
}

/// Utility macro to create a [Value::Object]
///
/// ```
/// # use datafn::object;
/// let object = object! { "foo" => "bar", "" => true };
/// assert_eq!(object.as_object().map(|o| o.len()), Some(2));
/// ```
#[macro_export]
macro_rules! object {
    ($($key:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut object = $crate::value::Object::new();
        $(
            object.insert($key, $value);
        )*
        $crate::value::Value::Object(object)
    }};
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn typed_arrays_keep_their_element_kind() {
        let Value::Array(ints) = Value::from(vec![1, 2, 3]) else {
            panic!("not an array");
        };
        assert_eq!(ints.element_kind(), ElementKind::Integer);

        let Value::Array(strings) = Value::from(vec!["a", "b"]) else {
            panic!("not an array");
        };
        assert_eq!(strings.element_kind(), ElementKind::String);
    }

    #[test]
    fn rebuild_keeps_element_kind() {
        let array = Array::String(vec!["foo".into(), "bar".into(), "baz".into()]);
        let rebuilt = array.rebuild([2, 0, 7]);

        assert_eq!(rebuilt.element_kind(), ElementKind::String);
        assert_eq!(
            rebuilt,
            Array::String(vec!["baz".to_string(), "foo".to_string()])
        );
    }

    #[test]
    fn array_equality_is_element_wise() {
        let typed = Array::Integer(vec![1, 2]);
        let boxed = Array::Any(vec![Value::Integer(1), Value::Integer(2)]);
        assert_eq!(typed, boxed);
        assert_ne!(typed, Array::Any(vec![Value::Integer(1), Value::Decimal(2.0)]));
    }

    #[test]
    fn keys_compare_by_kind_and_value() {
        assert_ne!(Key::Integer(1), Key::String("1".into()));
        assert_eq!(Key::Decimal(-0.0), Key::Decimal(0.0));
        assert_eq!(Key::try_from(&Value::from("")), Ok(Key::String(String::new())));
        assert_eq!(Key::try_from(&Value::Null), Err(Kind::Null));
        assert_eq!(Key::try_from(&object! {}), Err(Kind::Object));
    }

    #[test]
    fn object_equality_ignores_order() {
        let a = object! { "foo" => "bar", "bar" => true };
        let b = object! { "bar" => true, "foo" => "bar" };
        assert_eq!(a, b);
    }

    #[test]
    fn decoding_keeps_key_order() {
        let decoded: Value = serde_json::from_str(r#"{"b": 1, "a": 2, "c": {"z": 1, "y": 2}}"#).unwrap();
        let Value::Object(object) = &decoded else {
            panic!("not an object");
        };
        assert_eq!(
            object.keys().cloned().collect::<Vec<_>>(),
            vec![Key::from("b"), Key::from("a"), Key::from("c")]
        );
        assert_eq!(decoded.to_string(), r#"{"b":1,"a":2,"c":{"z":1,"y":2}}"#);

        let converted = Value::from(serde_json::json!({"b": 1, "a": 2}));
        assert_eq!(converted.to_string(), r#"{"b":1,"a":2}"#);
    }

    #[test]
    fn decode_yaml_scalar_keys() {
        let decoded: Value = serde_yaml::from_str("1: int
'1': str
true: yes
1.5: half
").unwrap();
        let Value::Object(object) = &decoded else {
            panic!("not an object");
        };

        assert_eq!(
            object.keys().cloned().collect::<Vec<_>>(),
            vec![
                Key::Integer(1),
                Key::from("1"),
                Key::Boolean(true),
                Key::Decimal(1.5)
            ]
        );
        assert_eq!(object.get(&Key::Integer(1)), Some(&Value::from("int")));
    }

    #[test]
    fn decode_numbers_and_nesting() {
        let decoded: Value = serde_json::from_str(r#"[1, -2, 2.5, null, true, "s", [], {}, 18446744073709551615]"#).unwrap();
        let expected = Value::from(vec![
            Value::Integer(1),
            Value::Integer(-2),
            Value::Decimal(2.5),
            Value::Null,
            Value::Boolean(true),
            Value::from("s"),
            Value::from(Vec::<Value>::new()),
            object! {},
            Value::Decimal(u64::MAX as f64),
        ]);
        assert_eq!(decoded, expected);
        assert_eq!(
            decoded.as_array().map(Array::element_kind),
            Some(ElementKind::Any)
        );
    }

    #[test]
    fn null_is_not_a_key() {
        let decoded = serde_yaml::from_str::<Value>("~: nothing
");
        assert!(decoded.is_err());
    }

    #[test]
    fn colliding_keys_stay_distinct_in_yaml() {
        let value = object! { 1 => "int", "1" => "str" };
        let rendered = serde_yaml::to_string(&value).unwrap();
        let back: Value = serde_yaml::from_str(&rendered).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn from_json() {
        let value = Value::from(serde_json::json!({
            "list": [1, "two", 3.5, null],
            "big": u64::MAX,
        }));

        let Value::Object(object) = &value else {
            panic!("not an object");
        };

        let list = object.get(&"list".into()).and_then(Value::as_array);
        assert_eq!(list.map(Array::element_kind), Some(ElementKind::Any));
        assert_eq!(
            object.get(&"big".into()),
            Some(&Value::Decimal(u64::MAX as f64))
        );
    }

    #[test]
    fn display_renders_json() {
        let value = object! { "foo" => vec![1, 2], 3 => Value::Null };
        assert_eq!(value.to_string(), r#"{"foo":[1,2],"3":null}"#);
    }
}

//! collection functions
//!
//! `flatten`, `pick`, `omit` and `slice` over [Value]s whose shape is only known at call time.
//!
//! The functions in this module are the variadic entry points a template calls with a raw argument list.
//! They split the list into parameters and subject ([Args]), check arity, kinds and keys, and only then hand
//! over to the strongly-typed functions in [algebra]. Nothing is built before all checks passed.
//!
//! | function  | arguments                  | subject |
//! |-----------|----------------------------|---------|
//! | `flatten` | `[depth] subject`          | array   |
//! | `pick`    | `key.. subject`            | object  |
//! | `omit`    | `key.. subject`            | object  |
//! | `slice`   | `subject [start] [end]`    | array   |
pub mod algebra;
mod args;

pub use args::{Args, Arity, SubjectPosition};

use crate::value::{Array, Key, Kind, Object, Value};
use std::collections::HashSet;

pub const FLATTEN: &str = "flatten";
pub const PICK: &str = "pick";
pub const OMIT: &str = "omit";
pub const SLICE: &str = "slice";

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum CollError {
    #[error("{op}: wrong number of args: wanted {wanted}, got {got}")]
    Arity {
        op: &'static str,
        wanted: Arity,
        got: usize,
    },
    #[error("{op}: {argument} must be {expected}, got {found}")]
    TypeMismatch {
        op: &'static str,
        argument: &'static str,
        expected: &'static str,
        found: Kind,
    },
    #[error("{op}: key #{position} must be a boolean, number or string, got {found}")]
    KeyType {
        op: &'static str,
        position: usize,
        found: Kind,
    },
    #[error("{op}: {argument} index {index} is not an integer in [{lower}, {upper}]")]
    IndexOutOfRange {
        op: &'static str,
        argument: &'static str,
        index: Value,
        lower: usize,
        upper: usize,
    },
}

/// `flatten [depth] subject`
#[tracing::instrument(level = "trace", skip_all, fields(args = args.len()))]
pub fn flatten(args: &[Value]) -> Result<Value, CollError> {
    let args = Args::split(FLATTEN, args, Arity::new(1, Some(2)), SubjectPosition::Last)?;
    let subject = expect_array(FLATTEN, args.subject)?;

    let depth = match args.params.first() {
        None => None,
        Some(depth) => Some(
            depth
                .as_integer()
                .and_then(|depth| usize::try_from(depth).ok())
                .ok_or(CollError::TypeMismatch {
                    op: FLATTEN,
                    argument: "depth",
                    expected: "a non-negative integer",
                    found: depth.kind(),
                })?,
        ),
    };

    tracing::trace!(?depth, len = subject.len(), "flatten");
    Ok(algebra::flatten(subject, depth).into())
}

/// `pick key.. subject`
#[tracing::instrument(level = "trace", skip_all, fields(args = args.len()))]
pub fn pick(args: &[Value]) -> Result<Value, CollError> {
    let args = Args::split(PICK, args, Arity::new(2, None), SubjectPosition::Last)?;
    let subject = expect_object(PICK, args.subject)?;
    let keys = keys(PICK, args.params)?;

    Ok(algebra::pick(subject, &keys).into())
}

/// `omit key.. subject`
#[tracing::instrument(level = "trace", skip_all, fields(args = args.len()))]
pub fn omit(args: &[Value]) -> Result<Value, CollError> {
    let args = Args::split(OMIT, args, Arity::new(2, None), SubjectPosition::Last)?;
    let subject = expect_object(OMIT, args.subject)?;
    let keys = keys(OMIT, args.params)?;

    Ok(algebra::omit(subject, &keys).into())
}

/// `slice subject [start] [end]`
#[tracing::instrument(level = "trace", skip_all, fields(args = args.len()))]
pub fn slice(args: &[Value]) -> Result<Value, CollError> {
    let args = Args::split(SLICE, args, Arity::new(1, Some(3)), SubjectPosition::First)?;
    let subject = expect_array(SLICE, args.subject)?;
    let len = subject.len();

    let start = bound("start", args.params.first(), 0, len)?.unwrap_or(0);
    let end = bound("end", args.params.get(1), start, len)?.unwrap_or(len);
    let range = start..end;

    tracing::trace!(?range, len, "slice");
    Ok(algebra::slice(subject, range).into())
}

fn expect_array<'a>(op: &'static str, subject: &'a Value) -> Result<&'a Array, CollError> {
    subject.as_array().ok_or(CollError::TypeMismatch {
        op,
        argument: "subject",
        expected: "an array",
        found: subject.kind(),
    })
}

fn expect_object<'a>(op: &'static str, subject: &'a Value) -> Result<&'a Object, CollError> {
    subject.as_object().ok_or(CollError::TypeMismatch {
        op,
        argument: "subject",
        expected: "an object",
        found: subject.kind(),
    })
}

fn keys(op: &'static str, params: &[Value]) -> Result<HashSet<Key>, CollError> {
    params
        .iter()
        .enumerate()
        .map(|(position, param)| {
            Key::try_from(param).map_err(|found| CollError::KeyType {
                op,
                position,
                found,
            })
        })
        .collect()
}

fn bound(
    argument: &'static str,
    index: Option<&Value>,
    lower: usize,
    upper: usize,
) -> Result<Option<usize>, CollError> {
    let Some(index) = index else {
        return Ok(None);
    };

    index
        .as_integer()
        .and_then(|index| usize::try_from(index).ok())
        .filter(|index| (lower..=upper).contains(index))
        .map(Some)
        .ok_or_else(|| CollError::IndexOutOfRange {
            op: SLICE,
            argument,
            index: index.clone(),
            lower,
            upper,
        })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::value::ElementKind;
    use crate::{args, object};
    use pretty_assertions::assert_eq;

    fn json(value: serde_json::Value) -> Value {
        value.into()
    }

    fn fixture() -> Value {
        object! {
            "foo" => "bar",
            "bar" => true,
            "" => "baz",
        }
    }

    #[test]
    fn flatten_errors() {
        assert!(matches!(flatten(&[]), Err(CollError::Arity { got: 0, .. })));
        assert!(matches!(
            flatten(&args![42]),
            Err(CollError::TypeMismatch { found: Kind::Integer, .. })
        ));
        assert!(matches!(
            flatten(&args![1, 2, vec![3]]),
            Err(CollError::Arity { got: 3, .. })
        ));
        assert!(matches!(
            flatten(&args![-1, vec![3]]),
            Err(CollError::TypeMismatch { argument: "depth", .. })
        ));
        assert!(matches!(
            flatten(&args!["1", vec![3]]),
            Err(CollError::TypeMismatch { argument: "depth", found: Kind::String, .. })
        ));
    }

    #[test]
    fn flatten_unlimited() {
        let out = flatten(&[json(serde_json::json!([1, [2, 3], [[4]]]))]).unwrap();
        assert_eq!(out, Value::from(vec![1, 2, 3, 4]));

        let out = flatten(&[Value::from(vec![
            Value::from(1),
            Value::from(vec![Value::from(vec![2]), Value::from(3)]),
        ])])
        .unwrap();
        assert_eq!(out, Value::from(vec![1, 2, 3]));
    }

    #[test]
    fn flatten_with_depth() {
        let out = flatten(&[Value::from(1), json(serde_json::json!([1, [2, [3]]]))]).unwrap();
        assert_eq!(out, json(serde_json::json!([1, 2, [3]])));

        let out = flatten(&[Value::from(1), json(serde_json::json!([1, [[2], 3]]))]).unwrap();
        assert_eq!(out, json(serde_json::json!([1, [2], 3])));
    }

    #[test]
    fn flatten_keeps_strings_and_objects() {
        let out = flatten(&[json(serde_json::json!(["ab", ["cd", {"e": [1]}]]))]).unwrap();
        assert_eq!(out, json(serde_json::json!(["ab", "cd", {"e": [1]}])));
    }

    #[test]
    fn pick_errors() {
        assert!(matches!(pick(&[]), Err(CollError::Arity { .. })));
        assert!(matches!(pick(&args![""]), Err(CollError::Arity { got: 1, .. })));
        assert!(matches!(
            pick(&args!["foo", ()]),
            Err(CollError::TypeMismatch { found: Kind::Null, .. })
        ));
        assert!(matches!(
            pick(&args!["foo", "bar"]),
            Err(CollError::TypeMismatch { found: Kind::String, .. })
        ));
        assert_eq!(
            pick(&args![object! {}, "foo", "bar", object! {}]),
            Err(CollError::KeyType {
                op: PICK,
                position: 0,
                found: Kind::Object
            })
        );
    }

    #[test]
    fn pick_keys() {
        let input = fixture();

        assert_eq!(pick(&args!["baz", input.clone()]), Ok(object! {}));
        assert_eq!(
            pick(&args!["foo", "bar", input.clone()]),
            Ok(object! { "foo" => "bar", "bar" => true })
        );
        assert_eq!(pick(&args!["", input.clone()]), Ok(object! { "" => "baz" }));
        assert_eq!(pick(&args!["foo", "bar", "", input.clone()]), Ok(input));
    }

    #[test]
    fn omit_errors() {
        assert!(matches!(omit(&[]), Err(CollError::Arity { .. })));
        assert!(matches!(omit(&args![""]), Err(CollError::Arity { .. })));
        assert!(matches!(
            omit(&args!["foo", ()]),
            Err(CollError::TypeMismatch { .. })
        ));
        assert!(matches!(
            omit(&args!["foo", "bar"]),
            Err(CollError::TypeMismatch { .. })
        ));
        assert!(matches!(
            omit(&args![object! {}, "foo", "bar", object! {}]),
            Err(CollError::KeyType { position: 0, .. })
        ));
    }

    #[test]
    fn omit_keys() {
        let input = fixture();

        assert_eq!(omit(&args!["baz", input.clone()]), Ok(input.clone()));
        assert_eq!(
            omit(&args!["", input.clone()]),
            Ok(object! { "foo" => "bar", "bar" => true })
        );
        assert_eq!(
            omit(&args!["foo", "bar", input.clone()]),
            Ok(object! { "" => "baz" })
        );
        assert_eq!(omit(&args!["foo", "bar", "", input]), Ok(object! {}));
    }

    #[test]
    fn keys_are_matched_by_kind() {
        let input = object! { 1 => "integer", "1" => "string", true => "boolean" };

        assert_eq!(
            pick(&args![1, input.clone()]),
            Ok(object! { 1 => "integer" })
        );
        assert_eq!(
            omit(&args!["1", true, input]),
            Ok(object! { 1 => "integer" })
        );
    }

    #[test]
    fn pick_and_omit_partition() {
        let input = fixture();
        let Value::Object(original) = &input else {
            unreachable!()
        };

        let key_sets = [
            args![""],
            args!["foo"],
            args!["foo", "missing"],
            args!["missing", 1, false],
            args!["foo", "bar", ""],
        ];

        for keys in key_sets {
            let mut call = keys.clone();
            call.push(input.clone());

            let Ok(Value::Object(picked)) = pick(&call) else {
                panic!("pick failed for {keys:?}");
            };
            let Ok(Value::Object(omitted)) = omit(&call) else {
                panic!("omit failed for {keys:?}");
            };

            assert_eq!(picked.len() + omitted.len(), original.len());
            assert!(picked.keys().all(|key| !omitted.contains_key(key)));
            for (key, value) in original {
                let found = picked.get(key).or_else(|| omitted.get(key));
                assert_eq!(found, Some(value));
            }
        }
    }

    #[test]
    fn slice_errors() {
        assert!(matches!(slice(&[]), Err(CollError::Arity { .. })));
        assert!(matches!(
            slice(&args![()]),
            Err(CollError::TypeMismatch { found: Kind::Null, .. })
        ));
        assert!(matches!(
            slice(&args![42]),
            Err(CollError::TypeMismatch { found: Kind::Integer, .. })
        ));
        assert!(matches!(
            slice(&args!["foo"]),
            Err(CollError::TypeMismatch { found: Kind::String, .. })
        ));

        // invalid index type
        let invalid = Value::from(vec![Value::from(vec![2])]);
        assert!(matches!(
            slice(&[Value::from(vec![Value::from(1)]), invalid]),
            Err(CollError::IndexOutOfRange { argument: "start", .. })
        ));

        assert!(matches!(
            slice(&args![vec![1, 2], 3]),
            Err(CollError::IndexOutOfRange { argument: "start", .. })
        ));
        assert!(matches!(
            slice(&args![vec![1, 2], -1]),
            Err(CollError::IndexOutOfRange { argument: "start", .. })
        ));
        assert!(matches!(
            slice(&args![vec![1, 2], 0, 3]),
            Err(CollError::IndexOutOfRange { argument: "end", .. })
        ));
        assert!(matches!(
            slice(&args![vec![1, 2], 2, 1]),
            Err(CollError::IndexOutOfRange { argument: "end", lower: 2, .. })
        ));
        assert!(matches!(
            slice(&args![vec![1, 2], 0, 1, 2]),
            Err(CollError::Arity { got: 4, .. })
        ));
    }

    #[test]
    fn slice_without_bounds_copies() {
        let input = Value::from(vec![1]);
        let out = slice(&[input.clone()]).unwrap();

        assert_eq!(out, input);
        assert_eq!(
            out.as_array().map(Array::element_kind),
            Some(ElementKind::Integer)
        );
    }

    #[test]
    fn slice_with_bounds() {
        let out = slice(&args![vec!["foo", "bar", "baz"], 1, 3]).unwrap();

        assert_eq!(out, Value::from(vec!["bar", "baz"]));
        assert_eq!(
            out.as_array().map(Array::element_kind),
            Some(ElementKind::String)
        );

        let out = slice(&args![vec!["foo", "bar", "baz"], 3]).unwrap();
        assert_eq!(out, Value::from(Vec::<String>::new()));
    }

    #[test]
    fn errors_name_the_operation() {
        let err = slice(&args![vec![1], 5]).expect_err("must fail");
        assert_eq!(
            err.to_string(),
            "slice: start index 5 is not an integer in [0, 1]"
        );

        let err = flatten(&args![1, 2, 3]).expect_err("must fail");
        assert_eq!(
            err.to_string(),
            "flatten: wrong number of args: wanted 1 or 2, got 3"
        );
    }
}

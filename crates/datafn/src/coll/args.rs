//! variadic argument lists split into parameters and subject
use super::CollError;
use crate::value::Value;
use std::fmt;

/// Where the subject sits in a variadic argument list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectPosition {
    /// `(subject, param..)`
    First,
    /// `(param.., subject)`
    Last,
}

/// Accepted number of arguments, subject included
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_new::new)]
pub struct Arity {
    pub min: usize,
    pub max: Option<usize>,
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            None => write!(f, "at least {}", self.min),
            Some(max) if max == self.min => write!(f, "{max}"),
            Some(max) if max == self.min + 1 => write!(f, "{} or {max}", self.min),
            Some(max) => write!(f, "{} to {max}", self.min),
        }
    }
}

/// An argument list with the subject taken out
#[derive(Debug, Clone, Copy, PartialEq, derive_new::new)]
pub struct Args<'a> {
    pub params: &'a [Value],
    pub subject: &'a Value,
}

impl<'a> Args<'a> {
    pub fn split(
        op: &'static str,
        args: &'a [Value],
        arity: Arity,
        position: SubjectPosition,
    ) -> Result<Self, CollError> {
        let arity_error = || CollError::Arity {
            op,
            wanted: arity,
            got: args.len(),
        };

        if !arity.accepts(args.len()) {
            return Err(arity_error());
        }

        let split = match position {
            SubjectPosition::First => args.split_first(),
            SubjectPosition::Last => args.split_last(),
        };

        let (subject, params) = split.ok_or_else(arity_error)?;
        Ok(Self::new(params, subject))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::args;

    #[test]
    fn arity_display() {
        assert_eq!(Arity::new(1, Some(2)).to_string(), "1 or 2");
        assert_eq!(Arity::new(1, Some(3)).to_string(), "1 to 3");
        assert_eq!(Arity::new(2, None).to_string(), "at least 2");
        assert_eq!(Arity::new(1, Some(1)).to_string(), "1");
    }

    #[test]
    fn subject_last() {
        let values = args!["a", "b", "subject"];
        let args = Args::split("test", &values, Arity::new(1, None), SubjectPosition::Last)
            .expect("valid");

        assert_eq!(args.subject, &Value::from("subject"));
        assert_eq!(args.params, &values[..2]);
    }

    #[test]
    fn subject_first() {
        let values = args!["subject", 1, 2];
        let args = Args::split("test", &values, Arity::new(1, Some(3)), SubjectPosition::First)
            .expect("valid");

        assert_eq!(args.subject, &Value::from("subject"));
        assert_eq!(args.params, &values[1..]);
    }

    #[test]
    fn empty_is_always_an_arity_error() {
        let err = Args::split("test", &[], Arity::new(0, None), SubjectPosition::Last)
            .expect_err("must fail");
        assert!(matches!(err, CollError::Arity { got: 0, .. }));
    }
}

//! Boundary term model
//!
//! Callers on the far side of the boundary pass dynamically typed terms. An
//! argument is accepted when it is a binary or an iolist (a possibly nested list
//! of binaries and byte-sized integers), which is flattened to one contiguous
//! byte range before the bridge runs. Anything else is a bad argument and never
//! reaches the engine.
//!
//! Outcomes render back as terms: `{ok, Binary}` and `{ok, Length}` for data,
//! a bare `true`/`false` for validity, and `{error, Reason}` for failures.

use crate::bridge::Bridge;
use crate::common::{Outcome, Reason};
use std::borrow::Cow;
use thiserror::Error;

/// Dynamically typed value crossing the boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// Byte string
    Binary(Vec<u8>),
    /// Integer
    Integer(i64),
    /// Named constant
    Atom(String),
    /// List of terms
    List(Vec<Term>),
    /// Fixed-size tuple of terms
    Tuple(Vec<Term>),
}

impl Term {
    /// Atom with the given name
    pub fn atom(name: &str) -> Self {
        Term::Atom(name.to_string())
    }

    /// `{ok, value}`
    pub fn ok(value: Term) -> Self {
        Term::Tuple(vec![Term::atom("ok"), value])
    }

    /// `{error, reason}`
    pub fn error(reason: Reason) -> Self {
        Term::Tuple(vec![Term::atom("error"), Term::atom(reason.atom())])
    }
}

impl From<&[u8]> for Term {
    fn from(bytes: &[u8]) -> Self {
        Term::Binary(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Term {
    fn from(bytes: Vec<u8>) -> Self {
        Term::Binary(bytes)
    }
}

/// The argument was not a binary or iolist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("bad argument: expected a binary or iolist")]
pub struct BadArgument;

/// Flatten a binary or iolist into one contiguous byte view
///
/// A binary is borrowed as-is; a list is copied into a new buffer. Returns
/// `None` for any other shape, or for an integer element outside `0..=255`.
pub fn inspect_iolist(term: &Term) -> Option<Cow<'_, [u8]>> {
    match term {
        Term::Binary(bytes) => Some(Cow::Borrowed(bytes.as_slice())),
        Term::List(items) => {
            let mut flat = Vec::new();
            let mut stack = vec![items.iter()];
            while let Some(level) = stack.last_mut() {
                match level.next() {
                    None => {
                        stack.pop();
                    }
                    Some(Term::Binary(bytes)) => flat.extend_from_slice(bytes),
                    Some(Term::Integer(value)) => flat.push(u8::try_from(*value).ok()?),
                    Some(Term::List(nested)) => stack.push(nested.iter()),
                    Some(Term::Atom(_)) | Some(Term::Tuple(_)) => return None,
                }
            }
            Some(Cow::Owned(flat))
        }
        Term::Integer(_) | Term::Atom(_) | Term::Tuple(_) => None,
    }
}

fn with_iolist<F>(arg: &Term, operation: F) -> Outcome
where
    F: FnOnce(&[u8]) -> Outcome,
{
    match inspect_iolist(arg) {
        Some(bytes) => operation(&bytes),
        None => Outcome::BadArgument,
    }
}

/// `compress/1`
pub fn compress(bridge: &Bridge, arg: &Term) -> Outcome {
    with_iolist(arg, |bytes| bridge.compress(bytes))
}

/// `decompress/1`
pub fn decompress(bridge: &Bridge, arg: &Term) -> Outcome {
    with_iolist(arg, |bytes| bridge.decompress(bytes))
}

/// `uncompressed_length/1`
pub fn uncompressed_length(bridge: &Bridge, arg: &Term) -> Outcome {
    with_iolist(arg, |bytes| bridge.uncompressed_length(bytes))
}

/// `is_valid/1`
pub fn is_valid(bridge: &Bridge, arg: &Term) -> Outcome {
    with_iolist(arg, |bytes| bridge.is_valid(bytes))
}

impl Outcome {
    /// Render as a boundary term, or signal a bad argument
    pub fn into_term(self) -> Result<Term, BadArgument> {
        match self {
            Outcome::Binary(bytes) => Ok(Term::ok(Term::Binary(bytes))),
            Outcome::Length(len) => Ok(Term::ok(Term::Integer(len as i64))),
            Outcome::Valid(valid) => Ok(Term::atom(if valid { "true" } else { "false" })),
            Outcome::Error(reason) => Ok(Term::error(reason)),
            Outcome::BadArgument => Err(BadArgument),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_binary_borrows() {
        let term = Term::Binary(b"abc".to_vec());
        let view = inspect_iolist(&term).unwrap();
        assert!(matches!(view, Cow::Borrowed(_)));
        assert_eq!(&*view, b"abc");
    }

    #[test]
    fn test_inspect_nested_iolist() {
        let term = Term::List(vec![
            Term::Binary(b"he".to_vec()),
            Term::Integer(b'l' as i64),
            Term::List(vec![
                Term::List(vec![]),
                Term::Integer(b'l' as i64),
                Term::Binary(b"o".to_vec()),
            ]),
            Term::Binary(Vec::new()),
        ]);
        assert_eq!(&*inspect_iolist(&term).unwrap(), b"hello");
        assert_eq!(&*inspect_iolist(&Term::List(vec![])).unwrap(), b"");
    }

    #[test]
    fn test_inspect_rejects_non_iolists() {
        assert!(inspect_iolist(&Term::Integer(5)).is_none());
        assert!(inspect_iolist(&Term::atom("hello")).is_none());
        assert!(inspect_iolist(&Term::Tuple(vec![])).is_none());
        assert!(inspect_iolist(&Term::List(vec![Term::Integer(256)])).is_none());
        assert!(inspect_iolist(&Term::List(vec![Term::Integer(-1)])).is_none());
        assert!(inspect_iolist(&Term::List(vec![Term::List(vec![Term::atom("x")])])).is_none());
    }

    #[test]
    fn test_outcome_rendering() {
        assert_eq!(
            Outcome::Binary(vec![1]).into_term(),
            Ok(Term::Tuple(vec![Term::atom("ok"), Term::Binary(vec![1])]))
        );
        assert_eq!(
            Outcome::Length(11).into_term(),
            Ok(Term::Tuple(vec![Term::atom("ok"), Term::Integer(11)]))
        );
        assert_eq!(Outcome::Valid(true).into_term(), Ok(Term::atom("true")));
        assert_eq!(Outcome::Valid(false).into_term(), Ok(Term::atom("false")));
        assert_eq!(
            Outcome::Error(Reason::CorruptedData).into_term(),
            Ok(Term::Tuple(vec![
                Term::atom("error"),
                Term::atom("corrupted_data")
            ]))
        );
        assert_eq!(Outcome::BadArgument.into_term(), Err(BadArgument));
    }

    #[test]
    fn test_bad_argument_skips_engine() {
        let bridge = Bridge::new();
        assert_eq!(compress(&bridge, &Term::Integer(1)), Outcome::BadArgument);
        assert_eq!(decompress(&bridge, &Term::atom("x")), Outcome::BadArgument);
        assert_eq!(
            uncompressed_length(&bridge, &Term::Tuple(vec![])),
            Outcome::BadArgument
        );
        assert_eq!(
            is_valid(&bridge, &Term::List(vec![Term::Integer(300)])),
            Outcome::BadArgument
        );
    }
}

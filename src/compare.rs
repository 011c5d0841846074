//! Key ordering.
//!
//! The skiplist never looks at keys itself; it only asks a [`Comparator`]
//! whether one key must be placed strictly before another. Reversing that
//! predicate reverses the whole list without changing any engine logic.
//!
//! [`Ascending`], [`Descending`] and [`ByFn`] cover statically typed keys.
//! [`Scalar`] with [`ScalarAscending`]/[`ScalarDescending`] covers callers
//! whose keys are only known at runtime, where operands can fail to compare.

use std::fmt;

use crate::error::{Error, Result};

/// A strict ordering over keys of type `K`.
pub trait Comparator<K: ?Sized> {
    /// Returns whether `a` must be placed strictly before `b`.
    fn before(&self, a: &K, b: &K) -> Result<bool>;

    /// Rejects keys that cannot be stored or searched for at all.
    fn validate(&self, _key: &K) -> Result<()> {
        Ok(())
    }

    /// Checks that two independently supplied range bounds can be compared.
    fn same_domain(&self, _lo: &K, _hi: &K) -> Result<()> {
        Ok(())
    }
}

/// Orders keys from smallest to largest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ascending;

impl<K: PartialOrd + ?Sized> Comparator<K> for Ascending {
    fn before(&self, a: &K, b: &K) -> Result<bool> {
        Ok(a < b)
    }
}

/// Orders keys from largest to smallest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Descending;

impl<K: PartialOrd + ?Sized> Comparator<K> for Descending {
    fn before(&self, a: &K, b: &K) -> Result<bool> {
        Ok(a > b)
    }
}

/// Adapts an infallible "strictly before" closure.
///
/// ```
/// use fingerskip::{ByFn, SkipList};
///
/// // order by string length, shortest first
/// let list = SkipList::new(ByFn(|a: &String, b: &String| a.len() < b.len()));
/// list.insert("ccc".to_string(), 3).unwrap();
/// list.insert("a".to_string(), 1).unwrap();
/// let all = list.snapshot();
/// assert_eq!(all.entries()[0].key(), "a");
/// ```
#[derive(Clone, Copy)]
pub struct ByFn<F>(pub F);

impl<F> fmt::Debug for ByFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ByFn(..)")
    }
}

impl<K: ?Sized, F> Comparator<K> for ByFn<F>
where
    F: Fn(&K, &K) -> bool,
{
    fn before(&self, a: &K, b: &K) -> Result<bool> {
        Ok((self.0)(a, b))
    }
}

/// A dynamically typed key.
///
/// Keys of different variants cannot be ordered against each other, and
/// `Null` cannot be ordered at all.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
}

impl Scalar {
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Int(_) => "int",
            Scalar::UInt(_) => "uint",
            Scalar::Float(_) => "float",
            Scalar::Str(_) => "str",
        }
    }

    /// Strict less-than between two scalars of the same variant.
    fn less(a: &Self, b: &Self) -> Result<bool> {
        match (a, b) {
            (Scalar::Int(a), Scalar::Int(b)) => Ok(a < b),
            (Scalar::UInt(a), Scalar::UInt(b)) => Ok(a < b),
            (Scalar::Float(a), Scalar::Float(b)) => Ok(a < b),
            (Scalar::Str(a), Scalar::Str(b)) => Ok(a < b),
            _ => Err(Error::ComparisonFailure(format!(
                "cannot order {} against {}",
                a.type_name(),
                b.type_name()
            ))),
        }
    }

    fn validate(key: &Self) -> Result<()> {
        match key {
            Scalar::Null => Err(Error::InvalidArgument("key must not be null".into())),
            Scalar::Float(f) if f.is_nan() => {
                Err(Error::InvalidArgument("key must not be NaN".into()))
            }
            _ => Ok(()),
        }
    }

    fn same_domain(lo: &Self, hi: &Self) -> Result<()> {
        if std::mem::discriminant(lo) == std::mem::discriminant(hi) {
            Ok(())
        } else {
            Err(Error::InvalidArgument(format!(
                "range bounds have different types: {} and {}",
                lo.type_name(),
                hi.type_name()
            )))
        }
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Scalar::UInt(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Str(value)
    }
}

/// Ascending order over [`Scalar`] keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScalarAscending;

impl Comparator<Scalar> for ScalarAscending {
    fn before(&self, a: &Scalar, b: &Scalar) -> Result<bool> {
        Scalar::less(a, b)
    }

    fn validate(&self, key: &Scalar) -> Result<()> {
        Scalar::validate(key)
    }

    fn same_domain(&self, lo: &Scalar, hi: &Scalar) -> Result<()> {
        Scalar::same_domain(lo, hi)
    }
}

/// Descending order over [`Scalar`] keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScalarDescending;

impl Comparator<Scalar> for ScalarDescending {
    fn before(&self, a: &Scalar, b: &Scalar) -> Result<bool> {
        Scalar::less(b, a)
    }

    fn validate(&self, key: &Scalar) -> Result<()> {
        Scalar::validate(key)
    }

    fn same_domain(&self, lo: &Scalar, hi: &Scalar) -> Result<()> {
        Scalar::same_domain(lo, hi)
    }
}

//! Optional numeric fields.
//!
//! Thresholds and window sizes on a monitor can be missing from a document,
//! explicitly `null`, or a number. On input the first two collapse into
//! [`OptionalValue::Unset`]. On output the owning field decides whether an
//! unset value is written as `null` or left out (see [`crate::policy`]).

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::ser::{self, Serializer};
use serde::{Deserialize, Serialize};

/// Largest integer an `f64` represents exactly (2^53).
const MAX_EXACT_F64: f64 = 9_007_199_254_740_992.0;

/// A numeric field that either holds an owned value or nothing.
///
/// Unlike a bare number with a sentinel, `Unset` and `Value(0.0)` are
/// different states and encode differently.
///
/// ```
/// use monitor_codec::OptionalValue;
///
/// let warning: OptionalValue<f64> = Some(20000.0).into();
/// assert_eq!(warning.get(), Some(20000.0));
/// assert!(OptionalValue::<u64>::Unset.is_unset());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptionalValue<T> {
    /// Missing from the input, or explicitly `null`.
    Unset,
    /// Present with a number.
    Value(T),
}

impl<T> OptionalValue<T> {
    /// Returns true when no value is held.
    pub const fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Returns true when a value is held.
    pub const fn is_set(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Borrow the held value.
    pub const fn as_ref(&self) -> Option<&T> {
        match self {
            Self::Unset => None,
            Self::Value(v) => Some(v),
        }
    }

    /// Convert into a plain `Option`.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Unset => None,
            Self::Value(v) => Some(v),
        }
    }
}

impl<T: Copy> OptionalValue<T> {
    /// Copy out the held value.
    pub fn get(&self) -> Option<T> {
        self.as_ref().copied()
    }
}

impl<T> Default for OptionalValue<T> {
    fn default() -> Self {
        Self::Unset
    }
}

impl<T> From<Option<T>> for OptionalValue<T> {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Unset, Self::Value)
    }
}

impl<T> From<OptionalValue<T>> for Option<T> {
    fn from(v: OptionalValue<T>) -> Self {
        v.into_option()
    }
}

impl<T: fmt::Display> fmt::Display for OptionalValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => write!(f, "unset"),
            Self::Value(v) => write!(f, "{v}"),
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for f64 {}
    impl Sealed for u64 {}
}

/// Numeric kinds an [`OptionalValue`] can carry.
///
/// `f64` backs thresholds, `u64` backs counts and day/minute windows.
pub trait Numeric: Copy + sealed::Sealed {
    /// Human-readable name used in error messages.
    const EXPECTING: &'static str;

    /// Convert from an unsigned JSON integer.
    fn from_u64(v: u64) -> Option<Self>;

    /// Convert from a signed JSON integer.
    fn from_i64(v: i64) -> Option<Self>;

    /// Convert from a JSON float.
    fn from_f64(v: f64) -> Option<Self>;

    /// Write the bare number.
    fn serialize_number<S: Serializer>(self, serializer: S) -> Result<S::Ok, S::Error>;
}

impl Numeric for f64 {
    const EXPECTING: &'static str = "a number or null";

    #[allow(clippy::cast_precision_loss)]
    fn from_u64(v: u64) -> Option<Self> {
        Some(v as f64)
    }

    #[allow(clippy::cast_precision_loss)]
    fn from_i64(v: i64) -> Option<Self> {
        Some(v as f64)
    }

    fn from_f64(v: f64) -> Option<Self> {
        Some(v)
    }

    // Whole values go out as integer literals (`400000`, not `400000.0`),
    // which is how the service itself writes thresholds.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn serialize_number<S: Serializer>(self, serializer: S) -> Result<S::Ok, S::Error> {
        if !self.is_finite() {
            return Err(ser::Error::custom(format!("non-finite threshold {self}")));
        }
        if self.fract() == 0.0 && self.abs() <= MAX_EXACT_F64 {
            if self >= 0.0 {
                return serializer.serialize_u64(self as u64);
            }
            return serializer.serialize_i64(self as i64);
        }
        serializer.serialize_f64(self)
    }
}

impl Numeric for u64 {
    const EXPECTING: &'static str = "a non-negative integer or null";

    fn from_u64(v: u64) -> Option<Self> {
        Some(v)
    }

    fn from_i64(v: i64) -> Option<Self> {
        u64::try_from(v).ok()
    }

    fn from_f64(_: f64) -> Option<Self> {
        None
    }

    fn serialize_number<S: Serializer>(self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self)
    }
}

impl<T: Numeric> Serialize for OptionalValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unset => serializer.serialize_none(),
            Self::Value(v) => v.serialize_number(serializer),
        }
    }
}

struct OptionalVisitor<T>(PhantomData<T>);

impl<'de, T: Numeric> Visitor<'de> for OptionalVisitor<T> {
    type Value = OptionalValue<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(T::EXPECTING)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(OptionalValue::Unset)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(OptionalValue::Unset)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        T::from_u64(v)
            .map(OptionalValue::Value)
            .ok_or_else(|| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        T::from_i64(v)
            .map(OptionalValue::Value)
            .ok_or_else(|| E::invalid_value(Unexpected::Signed(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        T::from_f64(v)
            .map(OptionalValue::Value)
            .ok_or_else(|| E::invalid_value(Unexpected::Float(v), &self))
    }
}

impl<'de, T: Numeric> Deserialize<'de> for OptionalValue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(OptionalVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_and_number_decode() {
        let unset: OptionalValue<f64> = serde_json::from_str("null").unwrap();
        assert!(unset.is_unset());

        let set: OptionalValue<f64> = serde_json::from_str("20000.0").unwrap();
        assert_eq!(set, OptionalValue::Value(20000.0));

        let from_int: OptionalValue<f64> = serde_json::from_str("5000").unwrap();
        assert_eq!(from_int.get(), Some(5000.0));
    }

    #[test]
    fn test_zero_is_not_unset() {
        let zero: OptionalValue<f64> = serde_json::from_str("0").unwrap();
        assert!(zero.is_set());
        assert_ne!(zero, OptionalValue::Unset);
    }

    #[test]
    fn test_unsigned_rejects_fraction_and_negative() {
        assert!(serde_json::from_str::<OptionalValue<u64>>("7.5").is_err());
        assert!(serde_json::from_str::<OptionalValue<u64>>("-3").is_err());
        assert_eq!(
            serde_json::from_str::<OptionalValue<u64>>("7").unwrap(),
            OptionalValue::Value(7)
        );
    }

    #[test]
    fn test_string_is_rejected() {
        let err = serde_json::from_str::<OptionalValue<f64>>("\"20\"").unwrap_err();
        assert!(err.to_string().contains("a number or null"));
    }

    #[test]
    fn test_encode_whole_float_as_integer() {
        let v = OptionalValue::Value(400_000.0_f64);
        assert_eq!(serde_json::to_string(&v).unwrap(), "400000");
        let v = OptionalValue::Value(-2.0_f64);
        assert_eq!(serde_json::to_string(&v).unwrap(), "-2");
        let v = OptionalValue::Value(0.5_f64);
        assert_eq!(serde_json::to_string(&v).unwrap(), "0.5");
    }

    #[test]
    fn test_encode_unset_as_null() {
        let v: OptionalValue<u64> = OptionalValue::Unset;
        assert_eq!(serde_json::to_string(&v).unwrap(), "null");
    }

    #[test]
    fn test_encode_non_finite_fails() {
        assert!(serde_json::to_string(&OptionalValue::Value(f64::NAN)).is_err());
        assert!(serde_json::to_string(&OptionalValue::Value(f64::INFINITY)).is_err());
    }

    #[test]
    fn test_option_conversions() {
        let v: OptionalValue<u64> = Some(30).into();
        assert_eq!(Option::from(v), Some(30));
        let v: OptionalValue<u64> = None.into();
        assert_eq!(v.into_option(), None);
        assert_eq!(format!("{}", OptionalValue::Value(15_u64)), "15");
        assert_eq!(format!("{}", OptionalValue::<u64>::Unset), "unset");
    }
}

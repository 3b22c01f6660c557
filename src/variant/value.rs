//! The dynamically typed value.

use std::fmt;
use std::ops::Index;

use super::map::{Map, Values};
use super::scalar::{Encoding, Integer, Real, Text};
use crate::bintoken::token::{RealWidth, Width};
use crate::error::BintokenError;

static NULL: Variant = Variant::Null;

/// A dynamically typed value, independent of any wire format.
///
/// Cloning is deep. [`take`](Variant::take) moves the content out and
/// leaves `Null` behind.
#[derive(Debug, Clone, Default)]
pub enum Variant {
    #[default]
    Null,
    Boolean(bool),
    Integer(Integer),
    Real(Real),
    String(Text),
    Array(Vec<Variant>),
    Map(Map),
}

/// The type tag of a [`Variant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Null,
    Boolean,
    Integer,
    Real,
    String,
    Array,
    Map,
}

impl Variant {
    /// Builds an array from anything convertible into variants.
    pub fn array<T: Into<Variant>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }

    /// Builds a map from key/value pairs; later duplicates replace earlier ones.
    pub fn map<K: Into<Variant>, V: Into<Variant>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        Self::Map(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// A binary string.
    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        Self::String(Text::binary(bytes))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Self::Null => Kind::Null,
            Self::Boolean(_) => Kind::Boolean,
            Self::Integer(_) => Kind::Integer,
            Self::Real(_) => Kind::Real,
            Self::String(_) => Kind::String,
            Self::Array(_) => Kind::Array,
            Self::Map(_) => Kind::Map,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Self::Boolean(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Integer(_))
    }

    pub fn is_real(&self) -> bool {
        matches!(self, Self::Real(_))
    }

    /// True for integers and reals.
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Real(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<Integer> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_integer().map(|i| i.value())
    }

    pub fn as_real(&self) -> Option<Real> {
        match self {
            Self::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// Numeric value of an integer or real.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(i.value() as f64),
            Self::Real(r) => Some(r.value()),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Self::String(t) => Some(t),
            _ => None,
        }
    }

    /// The content of a valid UTF-8 string.
    pub fn as_str(&self) -> Option<&str> {
        self.as_text().and_then(Text::as_str)
    }

    pub fn as_array(&self) -> Option<&Vec<Variant>> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Variant>> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Number of elements: children for containers, 0 for null, 1 for scalars.
    pub fn len(&self) -> usize {
        match self {
            Self::Null => 0,
            Self::Array(items) => items.len(),
            Self::Map(map) => map.len(),
            _ => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resets the content while keeping the type and width tag.
    ///
    /// Scalars become zero, false or empty; containers are emptied.
    pub fn clear(&mut self) {
        match self {
            Self::Null => {}
            Self::Boolean(b) => *b = false,
            Self::Integer(i) => *i = Integer::with_width(0, i.width()).unwrap_or(Integer::new(0)),
            Self::Real(r) => r.set(0.0),
            Self::String(t) => t.clear(),
            Self::Array(items) => items.clear(),
            Self::Map(map) => map.clear(),
        }
    }

    /// Moves the value out, leaving `Null` in its place.
    pub fn take(&mut self) -> Variant {
        std::mem::take(self)
    }

    /// Appends to an array. A null value first becomes an empty array.
    pub fn push(&mut self, value: impl Into<Variant>) -> Result<(), BintokenError> {
        if self.is_null() {
            *self = Self::Array(Vec::new());
        }
        match self {
            Self::Array(items) => {
                items.push(value.into());
                Ok(())
            }
            _ => Err(BintokenError::IncompatibleType),
        }
    }

    /// Inserts into a map. A null value first becomes an empty map.
    pub fn insert(
        &mut self,
        key: impl Into<Variant>,
        value: impl Into<Variant>,
    ) -> Result<Option<Variant>, BintokenError> {
        if self.is_null() {
            *self = Self::Map(Map::new());
        }
        match self {
            Self::Map(map) => Ok(map.insert(key.into(), value.into())),
            _ => Err(BintokenError::IncompatibleType),
        }
    }

    /// Element `index` of an array.
    pub fn get(&self, index: usize) -> Option<&Variant> {
        self.as_array().and_then(|items| items.get(index))
    }

    /// The value stored under `key` in a map.
    pub fn find(&self, key: &Variant) -> Option<&Variant> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Iterates the value: array elements, map values in key order, or the
    /// scalar itself. Null yields nothing.
    pub fn iter(&self) -> Iter<'_> {
        let inner = match self {
            Self::Null => IterInner::Empty,
            Self::Array(items) => IterInner::Array(items.iter()),
            Self::Map(map) => IterInner::Map(map.iter()),
            scalar => IterInner::Scalar(Some(scalar)),
        };
        Iter { inner }
    }
}

/// Iterator returned by [`Variant::iter`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: IterInner<'a>,
}

#[derive(Debug, Clone)]
enum IterInner<'a> {
    Empty,
    Scalar(Option<&'a Variant>),
    Array(std::slice::Iter<'a, Variant>),
    Map(Values<'a>),
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Variant;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IterInner::Empty => None,
            IterInner::Scalar(item) => item.take(),
            IterInner::Array(items) => items.next(),
            IterInner::Map(values) => values.next(),
        }
    }
}

impl<'a> IntoIterator for &'a Variant {
    type Item = &'a Variant;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Index<usize> for Variant {
    type Output = Variant;

    /// Returns `Null` when the value is not an array or the index is out of range.
    fn index(&self, index: usize) -> &Self::Output {
        self.get(index).unwrap_or(&NULL)
    }
}

impl Index<&str> for Variant {
    type Output = Variant;

    /// Returns `Null` when the value is not a map or has no such key.
    fn index(&self, key: &str) -> &Self::Output {
        self.find(&Variant::from(key)).unwrap_or(&NULL)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{}", i.value()),
            Self::Real(r) => match r.width() {
                RealWidth::W32 => write!(f, "{}", r.as_f32()),
                _ => write!(f, "{}", r.value()),
            },
            Self::String(t) => match t.encoding() {
                Encoding::Binary => write!(f, "<{} bytes>", t.len()),
                _ => write!(f, "\"{}\"", t.to_string_lossy()),
            },
            Self::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.entries().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

// -- Convenience conversions --

impl From<()> for Variant {
    fn from(_: ()) -> Self {
        Self::Null
    }
}

impl From<bool> for Variant {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Variant {
                fn from(i: $ty) -> Self {
                    Self::Integer(Integer::new(i64::from(i)))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Variant {
    fn from(f: f32) -> Self {
        Self::Real(Real::new32(f))
    }
}

impl From<f64> for Variant {
    fn from(f: f64) -> Self {
        Self::Real(Real::new64(f))
    }
}

impl From<Integer> for Variant {
    fn from(i: Integer) -> Self {
        Self::Integer(i)
    }
}

impl From<Real> for Variant {
    fn from(r: Real) -> Self {
        Self::Real(r)
    }
}

impl From<Text> for Variant {
    fn from(t: Text) -> Self {
        Self::String(t)
    }
}

impl From<&str> for Variant {
    fn from(s: &str) -> Self {
        Self::String(Text::utf8(s))
    }
}

impl From<String> for Variant {
    fn from(s: String) -> Self {
        Self::String(Text::utf8(s))
    }
}

impl From<Vec<Variant>> for Variant {
    fn from(v: Vec<Variant>) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Variant {
    fn from(m: Map) -> Self {
        Self::Map(m)
    }
}

impl<T: Into<Variant>> From<Option<T>> for Variant {
    fn from(o: Option<T>) -> Self {
        o.map_or(Self::Null, Into::into)
    }
}

impl TryFrom<&Variant> for bool {
    type Error = BintokenError;

    fn try_from(v: &Variant) -> Result<Self, Self::Error> {
        v.as_bool().ok_or(BintokenError::IncompatibleType)
    }
}

macro_rules! impl_try_from_integer {
    ($($ty:ty => $width:ident),*) => {
        $(
            impl TryFrom<&Variant> for $ty {
                type Error = BintokenError;

                /// Fails with `Overflow` when the width tag is wider than the target.
                fn try_from(v: &Variant) -> Result<Self, Self::Error> {
                    let i = v.as_integer().ok_or(BintokenError::IncompatibleType)?;
                    if i.width() > Width::$width {
                        return Err(BintokenError::Overflow);
                    }
                    <$ty>::try_from(i.value()).map_err(|_| BintokenError::Overflow)
                }
            }
        )*
    };
}

impl_try_from_integer!(i8 => W8, i16 => W16, i32 => W32, i64 => W64);

impl TryFrom<&Variant> for f32 {
    type Error = BintokenError;

    fn try_from(v: &Variant) -> Result<Self, Self::Error> {
        let r = v.as_real().ok_or(BintokenError::IncompatibleType)?;
        match r.width() {
            RealWidth::W32 => Ok(r.as_f32()),
            _ => Err(BintokenError::Overflow),
        }
    }
}

impl TryFrom<&Variant> for f64 {
    type Error = BintokenError;

    fn try_from(v: &Variant) -> Result<Self, Self::Error> {
        match v.as_real() {
            Some(r) if r.width() != RealWidth::Extended => Ok(r.value()),
            Some(_) => Err(BintokenError::Overflow),
            None => Err(BintokenError::IncompatibleType),
        }
    }
}

impl TryFrom<&Variant> for String {
    type Error = BintokenError;

    fn try_from(v: &Variant) -> Result<Self, Self::Error> {
        v.as_str().map(str::to_owned).ok_or(BintokenError::IncompatibleType)
    }
}

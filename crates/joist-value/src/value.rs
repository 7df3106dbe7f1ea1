use core::fmt;
use core::ops;

use crate::error::Error;
use crate::format::Format;
use crate::object::Object;
use crate::ser;

/// Discriminant of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Null,
    Bool,
    Int,
    Uint,
    Double,
    Str,
    Array,
    Object,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Double => "double",
            Self::Str => "string",
            Self::Array => "array",
            Self::Object => "object",
        };
        f.write_str(name)
    }
}

/// Any JSON value.
///
/// Numbers live in the narrowest of three carriers: values representable in
/// `i64` use [`Value::Int`], positive values beyond `i64::MAX` use
/// [`Value::Uint`], and anything with a fraction or exponent uses
/// [`Value::Double`]. Equality treats the two integer carriers as one numeric
/// domain, so `Int(1) == Uint(1)`.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Double(f64),
    Str(String),
    Array(Vec<Value>),
    Object(Object),
}

impl Value {
    /// An empty array value.
    pub fn array() -> Self {
        Self::Array(Vec::new())
    }

    /// An empty object value.
    pub fn object() -> Self {
        Self::Object(Object::new())
    }

    pub fn kind(&self) -> Kind {
        match self {
            Self::Null => Kind::Null,
            Self::Bool(_) => Kind::Bool,
            Self::Int(_) => Kind::Int,
            Self::Uint(_) => Kind::Uint,
            Self::Double(_) => Kind::Double,
            Self::Str(_) => Kind::Str,
            Self::Array(_) => Kind::Array,
            Self::Object(_) => Kind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Self::Int(_))
    }

    pub fn is_uint(&self) -> bool {
        matches!(self, Self::Uint(_))
    }

    pub fn is_double(&self) -> bool {
        matches!(self, Self::Double(_))
    }

    /// True for any of the three numeric carriers.
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Uint(_) | Self::Double(_))
    }

    pub fn is_str(&self) -> bool {
        matches!(self, Self::Str(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// The boolean payload.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] when the value is not a bool.
    pub fn as_bool(&self) -> Result<bool, Error> {
        match self {
            Self::Bool(b) => Ok(*b),
            other => Err(Error::type_mismatch(Kind::Bool, other.kind())),
        }
    }

    /// The string payload; booleans render as `"true"` / `"false"`.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] for every other kind.
    pub fn as_str(&self) -> Result<&str, Error> {
        match self {
            Self::Str(s) => Ok(s),
            Self::Bool(true) => Ok("true"),
            Self::Bool(false) => Ok("false"),
            other => Err(Error::type_mismatch(Kind::Str, other.kind())),
        }
    }

    /// The value as a signed 64-bit integer, converting from any numeric
    /// carrier when the conversion is lossless.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] for non-numeric kinds; [`Error::Numeric`] when
    /// the value does not fit (large unsigned, non-integral double).
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_i64(&self) -> Result<i64, Error> {
        match *self {
            Self::Int(n) => Ok(n),
            Self::Uint(n) => i64::try_from(n)
                .map_err(|_| Error::numeric(format!("{n} does not fit a signed 64-bit integer"))),
            Self::Double(d) if d.is_finite() && d.fract() == 0.0 => i64::try_from(d as i128)
                .map_err(|_| Error::numeric(format!("{d} does not fit a signed 64-bit integer"))),
            Self::Double(d) => Err(Error::numeric(format!("{d} is not an integer"))),
            ref other => Err(Error::type_mismatch(Kind::Int, other.kind())),
        }
    }

    /// The value as an unsigned 64-bit integer; see [`Value::as_i64`].
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] for non-numeric kinds; [`Error::Numeric`] when
    /// the value is negative or does not fit.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn as_u64(&self) -> Result<u64, Error> {
        match *self {
            Self::Uint(n) => Ok(n),
            Self::Int(n) => u64::try_from(n)
                .map_err(|_| Error::numeric(format!("{n} is negative"))),
            Self::Double(d) if d.is_finite() && d.fract() == 0.0 && d >= 0.0 => {
                u64::try_from(d as u128).map_err(|_| {
                    Error::numeric(format!("{d} does not fit an unsigned 64-bit integer"))
                })
            }
            Self::Double(d) => Err(Error::numeric(format!(
                "{d} is not a non-negative integer"
            ))),
            ref other => Err(Error::type_mismatch(Kind::Uint, other.kind())),
        }
    }

    /// The value as a double, converting from either integer carrier.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] for non-numeric kinds.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Result<f64, Error> {
        match *self {
            Self::Double(d) => Ok(d),
            Self::Int(n) => Ok(n as f64),
            Self::Uint(n) => Ok(n as f64),
            ref other => Err(Error::type_mismatch(Kind::Double, other.kind())),
        }
    }

    /// The value under `key`, inserting a null entry if absent.
    ///
    /// A null value silently becomes an empty object first, so a tree can be
    /// built by indexing alone.
    ///
    /// # Panics
    ///
    /// Panics when the value is neither null nor an object.
    pub fn entry(&mut self, key: &str) -> &mut Value {
        if self.is_null() {
            *self = Self::object();
        }
        match self {
            Self::Object(obj) => obj.entry(key),
            other => panic!("cannot index a {} value by key", other.kind()),
        }
    }

    /// The latest value under `key`, or `None` for missing keys and
    /// non-object values.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Object(obj) => obj.get(key),
            _ => None,
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Removes every object entry stored under `key`; returns the count
    /// removed (0 for non-objects).
    pub fn remove(&mut self, key: &str) -> usize {
        match self {
            Self::Object(obj) => obj.remove(key),
            _ => 0,
        }
    }

    /// Appends to an array value. A null value silently becomes an empty
    /// array first.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] when the value is some other kind.
    pub fn push(&mut self, item: impl Into<Value>) -> Result<(), Error> {
        if self.is_null() {
            *self = Self::array();
        }
        match self {
            Self::Array(items) => {
                items.push(item.into());
                Ok(())
            }
            other => Err(Error::type_mismatch(Kind::Array, other.kind())),
        }
    }

    /// The array element at `index`.
    ///
    /// # Errors
    ///
    /// [`Error::Index`] when out of range, [`Error::TypeMismatch`] for
    /// non-arrays.
    pub fn at(&self, index: usize) -> Result<&Value, Error> {
        match self {
            Self::Array(items) => items.get(index).ok_or(Error::Index {
                index,
                len: items.len(),
            }),
            other => Err(Error::type_mismatch(Kind::Array, other.kind())),
        }
    }

    /// Mutable counterpart of [`Value::at`].
    ///
    /// # Errors
    ///
    /// [`Error::Index`] when out of range, [`Error::TypeMismatch`] for
    /// non-arrays.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut Value, Error> {
        match self {
            Self::Array(items) => {
                let len = items.len();
                items.get_mut(index).ok_or(Error::Index { index, len })
            }
            other => Err(Error::type_mismatch(Kind::Array, other.kind())),
        }
    }

    /// Removes and returns the array element at `index`, shifting the rest.
    ///
    /// # Errors
    ///
    /// [`Error::Index`] when out of range, [`Error::TypeMismatch`] for
    /// non-arrays.
    pub fn remove_index(&mut self, index: usize) -> Result<Value, Error> {
        match self {
            Self::Array(items) => {
                if index < items.len() {
                    Ok(items.remove(index))
                } else {
                    Err(Error::Index {
                        index,
                        len: items.len(),
                    })
                }
            }
            other => Err(Error::type_mismatch(Kind::Array, other.kind())),
        }
    }

    /// Element count for arrays, entry count for objects, 0 otherwise.
    pub fn len(&self) -> usize {
        match self {
            Self::Array(items) => items.len(),
            Self::Object(obj) => obj.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serializes the tree in compact form.
    ///
    /// # Errors
    ///
    /// [`Error::Numeric`] when the tree contains a non-finite double.
    pub fn to_str(&self) -> Result<String, Error> {
        ser::to_string(self, &Format::compact())
    }

    /// Serializes the tree with an explicit [`Format`].
    ///
    /// # Errors
    ///
    /// [`Error::Numeric`] when the tree contains a non-finite double.
    pub fn to_str_fmt(&self, format: &Format) -> Result<String, Error> {
        ser::to_string(self, format)
    }
}

/// Structural equality; the two integer carriers compare by numeric value.
impl PartialEq for Value {
    #[allow(clippy::cast_sign_loss)]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Uint(a), Self::Uint(b)) => a == b,
            (Self::Int(a), Self::Uint(b)) | (Self::Uint(b), Self::Int(a)) => {
                *a >= 0 && *a as u64 == *b
            }
            (Self::Double(a), Self::Double(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

/// Chooses the narrowest carrier: values that fit `i64` use the signed one.
impl From<u64> for Value {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(signed) => Self::Int(signed),
            Err(_) => Self::Uint(n),
        }
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Self::Double(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Array(items)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Self::Object(obj)
    }
}

static NULL: Value = Value::Null;

/// Read-only key lookup; missing keys and non-objects yield a null value.
impl ops::Index<&str> for Value {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(&NULL)
    }
}

/// Key lookup that inserts a null entry if absent; see [`Value::entry`].
impl ops::IndexMut<&str> for Value {
    fn index_mut(&mut self, key: &str) -> &mut Value {
        self.entry(key)
    }
}

/// Array element access.
///
/// # Panics
///
/// Panics on out-of-range indices and non-array values; use [`Value::at`]
/// for a fallible lookup.
impl ops::Index<usize> for Value {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        match self {
            Self::Array(items) => &items[index],
            other => panic!("cannot index a {} value by position", other.kind()),
        }
    }
}

impl ops::IndexMut<usize> for Value {
    fn index_mut(&mut self, index: usize) -> &mut Value {
        match self {
            Self::Array(items) => &mut items[index],
            other => panic!("cannot index a {} value by position", other.kind()),
        }
    }
}

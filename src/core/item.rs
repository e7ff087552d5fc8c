use std::{borrow::Cow, fmt};

use crate::{core::class::Class, error::AccessError};

/// A domain object that can be decomposed into columns.
///
/// `invoke` plays the part of reflection: the registry discovers methods from
/// [`Record::class`], and the writer calls them by name.
///
/// ```
/// use csv_mapper::core::class::{Class, Method, STRING, I32};
/// use csv_mapper::core::item::{Record, Value};
/// use csv_mapper::AccessError;
///
/// struct Pet {
///     name: String,
///     age: i32,
/// }
///
/// static PET_METHODS: [Method; 2] = [
///     Method::getter("getName", &STRING),
///     Method::getter("getAge", &I32),
/// ];
/// static PET: Class = Class::object("Pet", &PET_METHODS);
///
/// impl Record for Pet {
///     fn class(&self) -> &'static Class {
///         &PET
///     }
///
///     fn invoke(&self, method: &str) -> Result<Value<'_>, AccessError> {
///         match method {
///             "getName" => Ok(self.name.as_str().into()),
///             "getAge" => Ok(self.age.into()),
///             _ => Err(AccessError::no_such_method(method)),
///         }
///     }
/// }
///
/// let pet = Pet { name: "Rex".to_string(), age: 3 };
/// assert!(matches!(pet.invoke("getAge"), Ok(Value::Int(3))));
/// ```
pub trait Record {
    /// Concrete runtime class of this object.
    fn class(&self) -> &'static Class;

    /// Calls the zero-argument method `method`.
    fn invoke(&self, method: &str) -> Result<Value<'_>, AccessError>;

    /// Text used when the object is rendered as a single opaque field.
    fn opaque_text(&self) -> String {
        self.class().name().to_string()
    }
}

/// Anything the writer can meet while walking an object graph.
///
/// Arrays and collections are both [`Value::Seq`].
#[derive(Clone)]
pub enum Value<'a> {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float32(f32),
    Float(f64),
    Text(Cow<'a, str>),
    Record(&'a dyn Record),
    Seq(Vec<Value<'a>>),
}

impl<'a> Value<'a> {
    pub fn record<R: Record>(record: &'a R) -> Value<'a> {
        Value::Record(record)
    }

    pub fn text(text: impl Into<Cow<'a, str>>) -> Value<'a> {
        Value::Text(text.into())
    }

    pub fn seq<I>(items: I) -> Value<'a>
    where
        I: IntoIterator,
        I::Item: Into<Value<'a>>,
    {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Runtime class of a record value.
    pub fn class(&self) -> Option<&'static Class> {
        match self {
            Value::Record(record) => Some(record.class()),
            _ => None,
        }
    }

    /// Textual form of booleans, numbers and text.
    pub fn scalar_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Bool(value) => Some(Cow::Owned(value.to_string())),
            Value::Int(value) => Some(Cow::Owned(value.to_string())),
            Value::UInt(value) => Some(Cow::Owned(value.to_string())),
            Value::Float32(value) => Some(Cow::Owned(value.to_string())),
            Value::Float(value) => Some(Cow::Owned(value.to_string())),
            Value::Text(text) => Some(Cow::Borrowed(text.as_ref())),
            _ => None,
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(value) => write!(f, "Bool({value})"),
            Value::Int(value) => write!(f, "Int({value})"),
            Value::UInt(value) => write!(f, "UInt({value})"),
            Value::Float32(value) => write!(f, "Float32({value})"),
            Value::Float(value) => write!(f, "Float({value})"),
            Value::Text(text) => write!(f, "Text({text:?})"),
            Value::Record(record) => write!(f, "Record({})", record.class().name()),
            Value::Seq(items) => f.debug_tuple("Seq").field(items).finish(),
        }
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(text: &'a str) -> Self {
        Value::Text(Cow::Borrowed(text))
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(text: &'a String) -> Self {
        Value::Text(Cow::Borrowed(text.as_str()))
    }
}

impl From<String> for Value<'_> {
    fn from(text: String) -> Self {
        Value::Text(Cow::Owned(text))
    }
}

impl<'a> From<Cow<'a, str>> for Value<'a> {
    fn from(text: Cow<'a, str>) -> Self {
        Value::Text(text)
    }
}

impl From<bool> for Value<'_> {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<char> for Value<'_> {
    fn from(value: char) -> Self {
        Value::Text(Cow::Owned(value.to_string()))
    }
}

macro_rules! signed_values {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Value<'_> {
            fn from(value: $ty) -> Self {
                Value::Int(value as i64)
            }
        })*
    };
}

macro_rules! unsigned_values {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Value<'_> {
            fn from(value: $ty) -> Self {
                Value::UInt(value as u64)
            }
        })*
    };
}

signed_values!(i8, i16, i32, i64, isize);
unsigned_values!(u8, u16, u32, u64, usize);

impl From<f32> for Value<'_> {
    fn from(value: f32) -> Self {
        Value::Float32(value)
    }
}

impl From<f64> for Value<'_> {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl<'a, T: Into<Value<'a>>> From<Option<T>> for Value<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<'a, T: Into<Value<'a>>> From<Vec<T>> for Value<'a> {
    fn from(items: Vec<T>) -> Self {
        Value::seq(items)
    }
}

impl<'a, T: Into<Value<'a>>> FromIterator<T> for Value<'a> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::seq(iter)
    }
}

use std::{any::Any, fmt};

use crate::descriptor::TypeKey;

/// A dynamically typed value tree, shaped by a [`crate::TypeDescriptor`].
#[derive(Debug)]
pub enum Value {
    /// An absent reference: a null array, or a null array element.
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    /// Position of the variant in its [`crate::EnumDescriptor`].
    Enum(u32),
    Array(Vec<Value>),
    Object(Object),
}

impl Value {
    pub fn object<T: Any + Send + Sync>(value: T) -> Self {
        Self::Object(Object::new(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Byte(_) => "i8",
            Self::Short(_) => "i16",
            Self::Int(_) => "i32",
            Self::Long(_) => "i64",
            Self::Float(_) => "f32",
            Self::Double(_) => "f64",
            Self::String(_) => "string",
            Self::Enum(_) => "enum",
            Self::Array(_) => "array",
            Self::Object(object) => object.key().name(),
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }
}

/// An owned instance of a registered type, erased behind [`Any`].
pub struct Object {
    key: TypeKey,
    inner: Box<dyn Any + Send + Sync>,
}

impl Object {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            key: TypeKey::of::<T>(),
            inner: Box::new(value),
        }
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }

    /// Takes the instance back out, or returns `self` untouched when it is
    /// not a `T`.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        let key = self.key;
        self.inner
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|inner| Self { key, inner })
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Object").field(&self.key.name()).finish()
    }
}

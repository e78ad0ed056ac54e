use std::any::Any;

use cobble_io::ReadingError;

use crate::{EnumDescriptor, PrimitiveKind, TypeDescriptor, Value};

/// A Rust type with a fixed [`TypeDescriptor`] and a lossless mapping to and
/// from [`Value`].
///
/// `Option<T>` maps `None` to [`Value::Null`] and so is only writable where
/// the descriptor has a presence flag: as an array, or as an array element.
pub trait Streamable: Sized {
    fn type_descriptor() -> TypeDescriptor;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, ReadingError>;
}

/// A fieldless enum with a declared variant order. Usually implemented
/// through [`crate::streamable_enum!`].
pub trait StreamEnum: Sized {
    const DESCRIPTOR: EnumDescriptor;

    fn ordinal(&self) -> u32;

    fn from_ordinal(ordinal: u32) -> Option<Self>;
}

fn unexpected<T: Streamable>(value: &Value) -> ReadingError {
    ReadingError::CorruptData(format!(
        "expected {}, got {}",
        T::type_descriptor(),
        value.kind_name()
    ))
}

macro_rules! impl_primitive {
    ($ty:ty, $variant:ident) => {
        impl Streamable for $ty {
            fn type_descriptor() -> TypeDescriptor {
                TypeDescriptor::Primitive(PrimitiveKind::$variant)
            }

            fn to_value(&self) -> Value {
                Value::$variant(Clone::clone(self))
            }

            fn from_value(value: Value) -> Result<Self, ReadingError> {
                match value {
                    Value::$variant(data) => Ok(data),
                    value => Err(unexpected::<Self>(&value)),
                }
            }
        }
    };
}

impl_primitive!(bool, Bool);
impl_primitive!(i8, Byte);
impl_primitive!(i16, Short);
impl_primitive!(i32, Int);
impl_primitive!(i64, Long);
impl_primitive!(f32, Float);
impl_primitive!(f64, Double);
impl_primitive!(String, String);

impl<T: Streamable> Streamable for Option<T> {
    fn type_descriptor() -> TypeDescriptor {
        T::type_descriptor()
    }

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, T::to_value)
    }

    fn from_value(value: Value) -> Result<Self, ReadingError> {
        match value {
            Value::Null => Ok(None),
            value => T::from_value(value).map(Some),
        }
    }
}

impl<T: Streamable> Streamable for Vec<T> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::array_of(T::type_descriptor())
    }

    fn to_value(&self) -> Value {
        Value::Array(self.iter().map(T::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, ReadingError> {
        match value {
            Value::Array(items) => items.into_iter().map(T::from_value).collect(),
            value => Err(unexpected::<Self>(&value)),
        }
    }
}

#[doc(hidden)]
pub fn enum_to_value<E: StreamEnum>(value: &E) -> Value {
    Value::Enum(value.ordinal())
}

#[doc(hidden)]
pub fn enum_from_value<E: StreamEnum>(value: Value) -> Result<E, ReadingError> {
    match value {
        Value::Enum(ordinal) => E::from_ordinal(ordinal).ok_or_else(|| {
            ReadingError::CorruptData(format!(
                "ordinal {ordinal} is not a variant of {}",
                E::DESCRIPTOR.name
            ))
        }),
        value => Err(ReadingError::CorruptData(format!(
            "expected enum {}, got {}",
            E::DESCRIPTOR.name,
            value.kind_name()
        ))),
    }
}

#[doc(hidden)]
pub fn object_from_value<T: Any>(value: Value) -> Result<T, ReadingError> {
    match value {
        Value::Object(object) => object.downcast::<T>().map_err(|object| {
            ReadingError::CorruptData(format!(
                "expected {}, got {}",
                std::any::type_name::<T>(),
                object.key()
            ))
        }),
        value => Err(ReadingError::CorruptData(format!(
            "expected {}, got {}",
            std::any::type_name::<T>(),
            value.kind_name()
        ))),
    }
}

/// Implements [`StreamEnum`] and [`Streamable`] for a fieldless enum.
///
/// Ordinals follow the order the variants are listed in, which should match
/// the declaration order.
///
/// ```
/// use cobble_serial::{StreamEnum, streamable_enum};
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Axis {
///     X,
///     Y,
///     Z,
/// }
///
/// streamable_enum!(Axis { X, Y, Z });
///
/// assert_eq!(Axis::Z.ordinal(), 2);
/// assert_eq!(Axis::from_ordinal(1), Some(Axis::Y));
/// ```
#[macro_export]
macro_rules! streamable_enum {
    ($name:ident { $($variant:ident),+ $(,)? }) => {
        impl $crate::StreamEnum for $name {
            const DESCRIPTOR: $crate::EnumDescriptor =
                $crate::EnumDescriptor::new(stringify!($name), &[$(stringify!($variant)),+]);

            fn ordinal(&self) -> u32 {
                let mut ordinal = 0;
                $(
                    if let $name::$variant = self {
                        return ordinal;
                    }
                    ordinal += 1;
                )+
                ordinal
            }

            fn from_ordinal(ordinal: u32) -> Option<Self> {
                let mut candidate = 0;
                $(
                    if ordinal == candidate {
                        return Some($name::$variant);
                    }
                    candidate += 1;
                )+
                let _ = candidate;
                None
            }
        }

        impl $crate::Streamable for $name {
            fn type_descriptor() -> $crate::TypeDescriptor {
                $crate::TypeDescriptor::Enum(<$name as $crate::StreamEnum>::DESCRIPTOR)
            }

            fn to_value(&self) -> $crate::Value {
                $crate::streamable::enum_to_value(self)
            }

            fn from_value(value: $crate::Value) -> Result<Self, $crate::ReadingError> {
                $crate::streamable::enum_from_value(value)
            }
        }
    };
}

/// Implements [`Streamable`] for types that are (de)serialized by a codec
/// registered at runtime.
///
/// The type must be `Clone`: [`Streamable::to_value`] copies the value into a
/// [`Value::Object`], so every typed write clones it once, and a `Vec` of
/// them is cloned element by element. Keep registered types cheap to clone
/// (or wrap shared state in an `Arc`), or write through
/// [`crate::SerializerRegistry::write_value`] with a prebuilt [`Value`].
///
/// ```
/// use cobble_serial::{Streamable, TypeDescriptor, streamable_object};
///
/// #[derive(Clone)]
/// struct Chunk {
///     sections: std::sync::Arc<[u8]>,
/// }
///
/// streamable_object!(Chunk);
///
/// assert_eq!(Chunk::type_descriptor(), TypeDescriptor::object::<Chunk>());
/// ```
#[macro_export]
macro_rules! streamable_object {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Streamable for $ty {
                fn type_descriptor() -> $crate::TypeDescriptor {
                    $crate::TypeDescriptor::object::<$ty>()
                }

                fn to_value(&self) -> $crate::Value {
                    $crate::Value::object(::std::clone::Clone::clone(self))
                }

                fn from_value(value: $crate::Value) -> Result<Self, $crate::ReadingError> {
                    $crate::streamable::object_from_value(value)
                }
            }
        )+
    };
}

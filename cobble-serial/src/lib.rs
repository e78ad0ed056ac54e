//! A registry of stream codecs.
//!
//! Values are described by a [`TypeDescriptor`] and written without any type
//! information on the wire: reader and writer must agree on the descriptor.
//! Primitives, strings, enums and arrays of any depth have built-in codecs.
//! Every other type needs a [`StreamSerializer`] or a [`StreamSerializable`]
//! registration before it can be read or written.

mod codec;
mod config;
mod descriptor;
mod registry;
mod serializer;
#[doc(hidden)]
pub mod streamable;
mod value;

pub use cobble_io::{ReadingError, WritingError};
pub use config::{ConfigError, SerializerConfig};
pub use descriptor::{EnumDescriptor, OrdinalWidth, PrimitiveKind, TypeDescriptor, TypeKey};
pub use registry::{RegistrationError, SerializerRegistry};
pub use serializer::{
    FnSerializer, InstanceFactory, StreamSerializable, StreamSerializer, from_fns,
};
pub use streamable::{StreamEnum, Streamable};
pub use value::{Object, Value};

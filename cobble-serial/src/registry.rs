use std::{
    any::Any,
    fmt,
    io::{Read, Write},
};

use bytes::Bytes;
use cobble_io::{ReadingError, WritingError};
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{
    EnumDescriptor, PrimitiveKind, SerializerConfig, Streamable, TypeDescriptor, TypeKey, Value,
    codec::{
        array::{read_array, write_array},
        mismatch, null_without_presence,
        ordinal::{read_ordinal, write_ordinal},
        primitive::{read_primitive, write_primitive},
    },
    serializer::{
        ErasedSerializer, InstanceFactory, SerializableEntry, SerializerEntry, StreamSerializable,
        StreamSerializer,
    },
};

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("a codec for {0} is already registered")]
    AlreadyRegistered(&'static str),
    #[error("{name} has the built-in encoding {descriptor} and can't take a custom codec")]
    BuiltInType {
        name: &'static str,
        descriptor: TypeDescriptor,
    },
}

/// The codec picked for one descriptor. Variant order is resolution order.
enum Resolved<'a> {
    Custom(&'a dyn ErasedSerializer),
    SelfDescribing(&'a dyn ErasedSerializer),
    Array(&'a TypeDescriptor),
    Enum(&'a EnumDescriptor),
    Primitive(PrimitiveKind),
}

/// Maps type descriptors to codecs and runs reads and writes through them.
///
/// Registration needs `&mut self` and reads/writes only `&self`, so a
/// registry that is fully set up can be shared between threads as is.
pub struct SerializerRegistry {
    config: SerializerConfig,
    serializers: FxHashMap<TypeKey, Box<dyn ErasedSerializer>>,
    serializables: FxHashMap<TypeKey, Box<dyn ErasedSerializer>>,
}

impl Default for SerializerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SerializerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializerRegistry")
            .field("config", &self.config)
            .field("serializers", &self.serializers.keys().collect::<Vec<_>>())
            .field("serializables", &self.serializables.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl SerializerRegistry {
    pub fn new() -> Self {
        Self::with_config(SerializerConfig::default())
    }

    pub fn with_config(config: SerializerConfig) -> Self {
        Self {
            config,
            serializers: FxHashMap::default(),
            serializables: FxHashMap::default(),
        }
    }

    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    /// Registers `serializer` as the codec for its `Target` type.
    ///
    /// Only object types can be registered: primitives, strings, enums,
    /// `Vec<T>` and `Option<T>` always use their built-in encoding and are
    /// rejected with [`RegistrationError::BuiltInType`].
    pub fn register<S>(&mut self, serializer: S) -> Result<(), RegistrationError>
    where
        S: StreamSerializer,
        S::Target: Streamable,
    {
        let key = object_key::<S::Target>()?;
        self.ensure_vacant(key)?;
        self.serializers
            .insert(key, Box::new(SerializerEntry(serializer)));
        log::debug!("registered stream serializer for {key}");
        Ok(())
    }

    /// Registers a self-describing type. `factory` supplies the blank
    /// instance every read starts from.
    pub fn register_serializable<T, F>(&mut self, factory: F) -> Result<(), RegistrationError>
    where
        T: StreamSerializable + Streamable,
        F: InstanceFactory<T>,
    {
        let key = object_key::<T>()?;
        self.ensure_vacant(key)?;
        self.serializables
            .insert(key, Box::new(SerializableEntry::new(factory)));
        log::debug!("registered serializable type {key}");
        Ok(())
    }

    pub fn is_registered<T: Any>(&self) -> bool {
        let key = TypeKey::of::<T>();
        self.serializers.contains_key(&key) || self.serializables.contains_key(&key)
    }

    fn ensure_vacant(&self, key: TypeKey) -> Result<(), RegistrationError> {
        if self.serializers.contains_key(&key) || self.serializables.contains_key(&key) {
            log::warn!("rejected second codec registration for {key}");
            return Err(RegistrationError::AlreadyRegistered(key.name()));
        }
        Ok(())
    }

    /// Whether every descriptor in the tree has a codec.
    ///
    /// Custom codecs are only ever consulted for [`TypeDescriptor::Object`];
    /// every other descriptor kind resolves to its built-in codec.
    pub fn supports(&self, descriptor: &TypeDescriptor) -> bool {
        self.find_unsupported(descriptor).is_none()
    }

    fn find_unsupported<'a>(&'a self, descriptor: &'a TypeDescriptor) -> Option<&'a TypeDescriptor> {
        match self.resolve(descriptor) {
            None => Some(descriptor),
            Some(Resolved::Array(element)) => self.find_unsupported(element),
            Some(_) => None,
        }
    }

    fn resolve<'a>(&'a self, descriptor: &'a TypeDescriptor) -> Option<Resolved<'a>> {
        if let TypeDescriptor::Object(key) = descriptor {
            if let Some(serializer) = self.serializers.get(key) {
                return Some(Resolved::Custom(serializer.as_ref()));
            }
            if let Some(serializable) = self.serializables.get(key) {
                return Some(Resolved::SelfDescribing(serializable.as_ref()));
            }
        }

        match descriptor {
            TypeDescriptor::Array(element) => Some(Resolved::Array(element)),
            TypeDescriptor::Enum(descriptor) => Some(Resolved::Enum(descriptor)),
            TypeDescriptor::Primitive(kind) => Some(Resolved::Primitive(*kind)),
            TypeDescriptor::Object(_) => None,
        }
    }

    /// Writes `value` as `descriptor`.
    ///
    /// The whole descriptor tree is resolved first: an unsupported type
    /// fails before anything reaches `write`.
    pub fn write_value<W: Write>(
        &self,
        write: &mut W,
        descriptor: &TypeDescriptor,
        value: &Value,
    ) -> Result<(), WritingError> {
        if let Some(unsupported) = self.find_unsupported(descriptor) {
            return Err(WritingError::UnsupportedType(unsupported.to_string()));
        }
        log::trace!("writing {} as {descriptor}", value.kind_name());
        self.write_resolved(write, descriptor, value)
    }

    /// Reads one value of `descriptor`.
    pub fn read_value<R: Read>(
        &self,
        read: &mut R,
        descriptor: &TypeDescriptor,
    ) -> Result<Value, ReadingError> {
        if let Some(unsupported) = self.find_unsupported(descriptor) {
            return Err(ReadingError::UnsupportedType(unsupported.to_string()));
        }
        log::trace!("reading {descriptor}");
        self.read_resolved(read, descriptor)
    }

    fn write_resolved(
        &self,
        write: &mut dyn Write,
        descriptor: &TypeDescriptor,
        value: &Value,
    ) -> Result<(), WritingError> {
        match self.resolve(descriptor) {
            Some(Resolved::Custom(serializer) | Resolved::SelfDescribing(serializer)) => {
                match value {
                    Value::Object(object) => serializer.write_object(object, write),
                    Value::Null => Err(null_without_presence(descriptor)),
                    value => Err(mismatch(descriptor, value)),
                }
            }
            Some(Resolved::Array(element)) => {
                write_array(write, value, self.config.max_array_length, |write, item| {
                    self.write_resolved(write, element, item)
                })
            }
            Some(Resolved::Enum(descriptor)) => write_ordinal(write, descriptor, value),
            Some(Resolved::Primitive(kind)) => {
                write_primitive(write, kind, value, self.config.max_string_length)
            }
            None => Err(WritingError::UnsupportedType(descriptor.to_string())),
        }
    }

    fn read_resolved(
        &self,
        read: &mut dyn Read,
        descriptor: &TypeDescriptor,
    ) -> Result<Value, ReadingError> {
        match self.resolve(descriptor) {
            Some(Resolved::Custom(serializer) | Resolved::SelfDescribing(serializer)) => {
                serializer.read_object(read).map(Value::Object)
            }
            Some(Resolved::Array(element)) => {
                read_array(read, self.config.max_array_length, |read| {
                    self.read_resolved(read, element)
                })
            }
            Some(Resolved::Enum(descriptor)) => read_ordinal(read, descriptor),
            Some(Resolved::Primitive(kind)) => {
                read_primitive(read, kind, self.config.max_string_length)
            }
            None => Err(ReadingError::UnsupportedType(descriptor.to_string())),
        }
    }

    pub fn write_to_stream<T: Streamable, W: Write>(
        &self,
        write: &mut W,
        value: &T,
    ) -> Result<(), WritingError> {
        self.write_value(write, &T::type_descriptor(), &value.to_value())
    }

    pub fn create_from_stream<T: Streamable, R: Read>(
        &self,
        read: &mut R,
    ) -> Result<T, ReadingError> {
        T::from_value(self.read_value(read, &T::type_descriptor())?)
    }

    pub fn to_bytes<T: Streamable>(&self, value: &T) -> Result<Bytes, WritingError> {
        let mut bytes = Vec::new();
        self.write_to_stream(&mut bytes, value)?;
        Ok(bytes.into())
    }

    pub fn from_bytes<T: Streamable>(&self, mut bytes: &[u8]) -> Result<T, ReadingError> {
        self.create_from_stream(&mut bytes)
    }
}

/// The key `T` is registered under, provided its descriptor is an object
/// descriptor for `T` itself.
fn object_key<T: Streamable + Any>() -> Result<TypeKey, RegistrationError> {
    let key = TypeKey::of::<T>();
    match T::type_descriptor() {
        TypeDescriptor::Object(described) if described == key => Ok(key),
        descriptor => {
            log::warn!("rejected codec registration for {key}, it is encoded as {descriptor}");
            Err(RegistrationError::BuiltInType {
                name: key.name(),
                descriptor,
            })
        }
    }
}

use std::{
    any::Any,
    io::{Read, Write},
    marker::PhantomData,
};

use cobble_io::{ReadingError, WritingError};

use crate::{TypeKey, value::Object};

/// An externally written codec for `Target`.
///
/// The registry keys the codec by `Target`, so a type can only ever have one.
/// `Target` has to be an object type, usually declared with
/// [`crate::streamable_object!`].
pub trait StreamSerializer: Send + Sync + 'static {
    type Target: Any + Send + Sync;

    fn read_from_stream(&self, read: &mut dyn Read) -> Result<Self::Target, ReadingError>;

    fn write_to_stream(
        &self,
        value: &Self::Target,
        write: &mut dyn Write,
    ) -> Result<(), WritingError>;
}

/// A type that reads and writes its own state.
///
/// Reading always happens on a blank instance obtained from the
/// [`InstanceFactory`] it was registered with.
pub trait StreamSerializable: Any + Send + Sync {
    fn read_from_stream(&mut self, read: &mut dyn Read) -> Result<(), ReadingError>;

    fn write_to_stream(&self, write: &mut dyn Write) -> Result<(), WritingError>;
}

pub trait InstanceFactory<T>: Send + Sync + 'static {
    fn create(&self) -> T;
}

impl<T, F> InstanceFactory<T> for F
where
    F: Fn() -> T + Send + Sync + 'static,
{
    fn create(&self) -> T {
        self()
    }
}

/// A [`StreamSerializer`] made of two closures.
pub struct FnSerializer<T, R, W> {
    read: R,
    write: W,
    _target: PhantomData<fn() -> T>,
}

/// Builds a serializer inline, without naming a type for it.
///
/// ```
/// use cobble_io::{StreamReadExt, StreamWriteExt};
/// use cobble_serial::{SerializerRegistry, from_fns, streamable_object};
///
/// #[derive(Clone)]
/// struct Light(u8);
///
/// streamable_object!(Light);
///
/// let mut registry = SerializerRegistry::new();
/// registry
///     .register(from_fns(
///         |read| Ok(Light(read.get_u8_be()?)),
///         |light: &Light, write| write.write_u8_be(light.0),
///     ))
///     .unwrap();
/// ```
pub fn from_fns<T, R, W>(read: R, write: W) -> FnSerializer<T, R, W>
where
    T: Any + Send + Sync,
    R: Fn(&mut dyn Read) -> Result<T, ReadingError> + Send + Sync + 'static,
    W: Fn(&T, &mut dyn Write) -> Result<(), WritingError> + Send + Sync + 'static,
{
    FnSerializer {
        read,
        write,
        _target: PhantomData,
    }
}

impl<T, R, W> StreamSerializer for FnSerializer<T, R, W>
where
    T: Any + Send + Sync,
    R: Fn(&mut dyn Read) -> Result<T, ReadingError> + Send + Sync + 'static,
    W: Fn(&T, &mut dyn Write) -> Result<(), WritingError> + Send + Sync + 'static,
{
    type Target = T;

    fn read_from_stream(&self, read: &mut dyn Read) -> Result<T, ReadingError> {
        (self.read)(read)
    }

    fn write_to_stream(&self, value: &T, write: &mut dyn Write) -> Result<(), WritingError> {
        (self.write)(value, write)
    }
}

/// Registry-side view of either kind of registration.
pub(crate) trait ErasedSerializer: Send + Sync {
    fn write_object(&self, object: &Object, write: &mut dyn Write) -> Result<(), WritingError>;

    fn read_object(&self, read: &mut dyn Read) -> Result<Object, ReadingError>;
}

fn wrong_object(expected: TypeKey, object: &Object) -> WritingError {
    WritingError::ContractViolation(format!(
        "codec for {expected} was handed a {}",
        object.key()
    ))
}

pub(crate) struct SerializerEntry<S>(pub S);

impl<S: StreamSerializer> ErasedSerializer for SerializerEntry<S> {
    fn write_object(&self, object: &Object, write: &mut dyn Write) -> Result<(), WritingError> {
        let value = object
            .downcast_ref::<S::Target>()
            .ok_or_else(|| wrong_object(TypeKey::of::<S::Target>(), object))?;
        self.0.write_to_stream(value, write)
    }

    fn read_object(&self, read: &mut dyn Read) -> Result<Object, ReadingError> {
        self.0.read_from_stream(read).map(Object::new)
    }
}

pub(crate) struct SerializableEntry<T, F> {
    factory: F,
    _instance: PhantomData<fn() -> T>,
}

impl<T, F> SerializableEntry<T, F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            _instance: PhantomData,
        }
    }
}

impl<T, F> ErasedSerializer for SerializableEntry<T, F>
where
    T: StreamSerializable,
    F: InstanceFactory<T>,
{
    fn write_object(&self, object: &Object, write: &mut dyn Write) -> Result<(), WritingError> {
        object
            .downcast_ref::<T>()
            .ok_or_else(|| wrong_object(TypeKey::of::<T>(), object))?
            .write_to_stream(write)
    }

    fn read_object(&self, read: &mut dyn Read) -> Result<Object, ReadingError> {
        let mut instance = self.factory.create();
        instance.read_from_stream(read)?;
        Ok(Object::new(instance))
    }
}

//! Built-in codecs. Each one handles a single descriptor kind and knows
//! nothing about the registry; nested element types are handed back to the
//! caller through a closure.

pub mod array;
pub mod ordinal;
pub mod primitive;

use cobble_io::WritingError;

use crate::{TypeDescriptor, Value};

pub(crate) fn mismatch(descriptor: impl std::fmt::Display, value: &Value) -> WritingError {
    WritingError::ContractViolation(format!(
        "cannot write {} as {descriptor}",
        value.kind_name()
    ))
}

pub(crate) fn null_without_presence(descriptor: &TypeDescriptor) -> WritingError {
    WritingError::ContractViolation(format!("{descriptor} has no encoding for null"))
}

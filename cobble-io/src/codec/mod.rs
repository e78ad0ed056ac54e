use std::{
    io::{Read, Write},
    num::NonZeroUsize,
};

use crate::{ReadingError, WritingError};

pub mod var_int;

pub trait Codec<T> {
    const MAX_SIZE: NonZeroUsize;

    fn encode<W: Write + ?Sized>(&self, write: &mut W) -> Result<(), WritingError>;

    fn decode<R: Read + ?Sized>(read: &mut R) -> Result<T, ReadingError>;
}

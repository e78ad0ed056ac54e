use std::{
    any::{Any, TypeId},
    fmt::{self, Display},
    hash::{Hash, Hasher},
};

/// Identifies the kind of value a codec reads or writes.
///
/// Descriptors are plain immutable data; the registry only ever uses them as
/// lookup keys and dispatch input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Primitive(PrimitiveKind),
    Enum(EnumDescriptor),
    /// Array of the boxed element type. Multi-dimensional arrays nest.
    Array(Box<TypeDescriptor>),
    /// A Rust type whose codec is registered at runtime.
    Object(TypeKey),
}

impl TypeDescriptor {
    pub fn array_of(element: TypeDescriptor) -> Self {
        Self::Array(Box::new(element))
    }

    pub fn object<T: Any>() -> Self {
        Self::Object(TypeKey::of::<T>())
    }

    /// Whether a top-level `Null` has an encoding for this descriptor.
    pub fn is_nullable(&self) -> bool {
        matches!(self, Self::Array(_))
    }
}

impl From<PrimitiveKind> for TypeDescriptor {
    fn from(kind: PrimitiveKind) -> Self {
        Self::Primitive(kind)
    }
}

impl From<EnumDescriptor> for TypeDescriptor {
    fn from(descriptor: EnumDescriptor) -> Self {
        Self::Enum(descriptor)
    }
}

impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => write!(f, "{kind}"),
            Self::Enum(descriptor) => write!(f, "enum {}", descriptor.name),
            Self::Array(element) => write!(f, "{element}[]"),
            Self::Object(key) => write!(f, "{key}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
}

impl Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bool => "bool",
            Self::Byte => "i8",
            Self::Short => "i16",
            Self::Int => "i32",
            Self::Long => "i64",
            Self::Float => "f32",
            Self::Double => "f64",
            Self::String => "string",
        })
    }
}

/// A fixed, ordered list of variants. Only the position of a variant in
/// `variants` ever reaches the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumDescriptor {
    pub name: &'static str,
    pub variants: &'static [&'static str],
}

/// Number of bytes used to store an ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrdinalWidth {
    U8,
    U16,
    U32,
}

impl EnumDescriptor {
    pub const fn new(name: &'static str, variants: &'static [&'static str]) -> Self {
        Self { name, variants }
    }

    pub const fn len(&self) -> usize {
        self.variants.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Smallest unsigned width that can address every variant.
    pub const fn ordinal_width(&self) -> OrdinalWidth {
        if self.variants.len() <= 1 << 8 {
            OrdinalWidth::U8
        } else if self.variants.len() <= 1 << 16 {
            OrdinalWidth::U16
        } else {
            OrdinalWidth::U32
        }
    }

    pub fn variant_name(&self, ordinal: u32) -> Option<&'static str> {
        self.variants.get(ordinal as usize).copied()
    }
}

/// Runtime identity of a registered Rust type.
///
/// Equality and hashing only look at the [`TypeId`]; the name is kept for
/// error messages and logs.
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const fn descriptor_with(variants: &'static [&'static str]) -> EnumDescriptor {
        EnumDescriptor::new("Test", variants)
    }

    static MANY: [&str; 300] = [""; 300];

    #[test]
    fn test_ordinal_width() {
        assert_eq!(descriptor_with(&[]).ordinal_width(), OrdinalWidth::U8);
        assert_eq!(descriptor_with(&["A", "B"]).ordinal_width(), OrdinalWidth::U8);
        assert_eq!(descriptor_with(&MANY).ordinal_width(), OrdinalWidth::U16);
        assert_eq!(descriptor_with(&MANY[..256]).ordinal_width(), OrdinalWidth::U8);
        assert_eq!(descriptor_with(&MANY[..257]).ordinal_width(), OrdinalWidth::U16);
    }

    #[test]
    fn test_type_key_identity() {
        struct Marker;
        assert_eq!(TypeKey::of::<Marker>(), TypeKey::of::<Marker>());
        assert_ne!(TypeKey::of::<Marker>(), TypeKey::of::<String>());
        assert!(TypeKey::of::<Marker>().name().ends_with("Marker"));
    }

    #[test]
    fn test_display() {
        let descriptor = TypeDescriptor::array_of(TypeDescriptor::array_of(
            PrimitiveKind::String.into(),
        ));
        assert_eq!(descriptor.to_string(), "string[][]");
        assert!(descriptor.is_nullable());
        assert!(!TypeDescriptor::from(PrimitiveKind::Int).is_nullable());
    }
}

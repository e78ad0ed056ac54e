#![no_main]

use cobble_serial::{
    EnumDescriptor, PrimitiveKind, SerializerConfig, SerializerRegistry, TypeDescriptor,
};
use libfuzzer_sys::fuzz_target;

const FACING: EnumDescriptor =
    EnumDescriptor::new("Facing", &["Down", "Up", "North", "South", "West", "East"]);

fuzz_target!(|data: &[u8]| {
    let registry = SerializerRegistry::with_config(SerializerConfig {
        max_string_length: 1024,
        max_array_length: 1024,
    });

    for descriptor in [
        TypeDescriptor::array_of(TypeDescriptor::array_of(PrimitiveKind::String.into())),
        TypeDescriptor::array_of(TypeDescriptor::array_of(FACING.into())),
        TypeDescriptor::array_of(PrimitiveKind::Double.into()),
    ] {
        let mut input = data;
        let _ = registry.read_value(&mut input, &descriptor);
    }
});

use ormx_core::{DataType, Escape, RawTypes, TypeBinding, TypeKey};

// no native UUID column, stored as text
pub(super) const fn binding() -> TypeBinding {
    TypeBinding::new(TypeKey::Uuid, RawTypes::Unsupported).with_declare(declare)
}

fn declare(_: &DataType, _: &dyn Escape) -> String {
    "CHAR(36) BINARY".to_owned()
}

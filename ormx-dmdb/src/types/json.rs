use ormx_core::{
    DataType, Error, Operation, RawTypes, SerializeOptions, TypeBinding, TypeKey, Value, WireValue,
};

pub(super) const fn binding() -> TypeBinding {
    TypeBinding::new(TypeKey::Json, RawTypes::Supported(&["JSON"])).with_serialize(serialize)
}

/// In a `WHERE` comparison a string is already the JSON text to compare against
/// and passes through as is. Everything else is JSON-encoded.
fn serialize(_: &DataType, value: &Value, options: &SerializeOptions) -> Result<WireValue, Error> {
    if let (Operation::Where, Value::Text(text)) = (options.operation, value) {
        return Ok(WireValue::Text(text.clone()));
    }

    let json = value
        .to_json()
        .map_err(|source| Error::encode(TypeKey::Json, source))?;

    serde_json::to_string(&json)
        .map(WireValue::Text)
        .map_err(|source| Error::encode(TypeKey::Json, source))
}

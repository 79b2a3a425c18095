use ormx_core::{
    DataType, Error, Escape, RawTypes, SerializeOptions, TypeBinding, TypeKey, Value, WireValue,
};

pub(super) const fn binding() -> TypeBinding {
    TypeBinding::new(TypeKey::Enum, RawTypes::Unsupported)
        .with_declare(declare)
        .with_serialize(serialize)
}

fn declare(data_type: &DataType, escape: &dyn Escape) -> String {
    let values: &[String] = match data_type {
        DataType::Enum { values } => values,
        _ => &[],
    };

    let values: Vec<String> = values.iter().map(|value| escape.escape(value)).collect();
    format!("ENUM({})", values.join(", "))
}

fn serialize(
    data_type: &DataType,
    value: &Value,
    _: &SerializeOptions,
) -> Result<WireValue, Error> {
    let DataType::Enum { values } = data_type else {
        return Err(Error::encode(TypeKey::Enum, "not an ENUM type"));
    };

    let Value::Text(text) = value else {
        return Err(Error::encode(
            TypeKey::Enum,
            format!("cannot use a {} value as an ENUM member", value.kind()),
        ));
    };

    if !values.iter().any(|v| v == text) {
        return Err(Error::encode(
            TypeKey::Enum,
            format!("{text:?} is not one of {values:?}"),
        ));
    }

    Ok(WireValue::Text(text.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ormx_core::escape_string;

    #[test]
    fn it_declares_values_through_the_escape_fn() {
        let mood = DataType::enumeration(["happy", "it's ok"]);
        assert_eq!(declare(&mood, &escape_string), "ENUM('happy', 'it\\'s ok')");

        let quoted = |value: &str| format!("\"{value}\"");
        assert_eq!(declare(&mood, &quoted), "ENUM(\"happy\", \"it's ok\")");
    }

    #[test]
    fn it_only_serializes_members() {
        let mood = DataType::enumeration(["happy", "sad"]);
        let options = SerializeOptions::default();

        assert_eq!(
            serialize(&mood, &Value::Text("sad".into()), &options).unwrap(),
            WireValue::Text("sad".into())
        );
        assert!(matches!(
            serialize(&mood, &Value::Text("angry".into()), &options),
            Err(Error::Encode { key: TypeKey::Enum, .. })
        ));
        assert!(serialize(&mood, &Value::Int(1), &options).is_err());
    }
}

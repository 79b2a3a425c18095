use ormx_core::timezone::{self, Timezone};
use ormx_core::types::base;
use ormx_core::{
    DataType, Error, Escape, ParseOptions, RawTypes, RawValueRef, SerializeOptions, TypeBinding,
    TypeKey, Value, WireValue,
};

pub(super) const fn binding() -> TypeBinding {
    TypeBinding::new(TypeKey::Date, RawTypes::Supported(&["DATETIME"]))
        .with_declare(declare)
        .with_serialize(serialize)
        .with_parse(parse)
}

pub(super) const fn date_only_binding() -> TypeBinding {
    TypeBinding::new(TypeKey::DateOnly, RawTypes::Supported(&["DATE"])).with_parse(parse_date_only)
}

fn declare(data_type: &DataType, _: &dyn Escape) -> String {
    match data_type {
        DataType::Date {
            precision: Some(precision),
        } if *precision > 0 => format!("DATETIME({precision})"),
        _ => "DATETIME".to_owned(),
    }
}

/// Renders the instant as wall-clock time in the session timezone, with
/// milliseconds only when the column has a fractional precision.
fn serialize(
    data_type: &DataType,
    value: &Value,
    options: &SerializeOptions,
) -> Result<WireValue, Error> {
    let instant = base::instant_of(value).map_err(|source| Error::encode(TypeKey::Date, source))?;
    let local = Timezone::resolve(&options.timezone)?.localize(&instant);

    let format = match data_type {
        DataType::Date {
            precision: Some(precision),
        } if *precision > 0 => "%Y-%m-%d %H:%M:%S%.3f",
        _ => "%Y-%m-%d %H:%M:%S",
    };

    Ok(WireValue::Text(local.format(format).to_string()))
}

/// A zone name interprets the stored wall-clock time in that zone. An offset
/// (`+08:00`, `+09`, `Z`) is applied to it directly.
fn parse(_: TypeKey, raw: &RawValueRef<'_>, options: &ParseOptions) -> Result<Value, Error> {
    let text = raw.as_str()?;

    timezone::parse_in_timezone(text, &options.timezone)
        .map(Value::DateTime)
        .map_err(|source| Error::parse(raw.type_tag(), source))
}

// the driver may hand DATE columns back with a zero time part
fn parse_date_only(_: TypeKey, raw: &RawValueRef<'_>, _: &ParseOptions) -> Result<Value, Error> {
    let text = raw.as_str()?.trim();
    let date = text.split([' ', 'T']).next().unwrap_or(text);

    base::parse_date(date)
        .map(Value::Date)
        .map_err(|source| Error::parse(raw.type_tag(), source))
}

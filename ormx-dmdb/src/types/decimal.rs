use ormx_core::types::base;
use ormx_core::{DataType, Escape, RawTypes, TypeBinding, TypeKey};

pub(super) const fn binding() -> TypeBinding {
    TypeBinding::new(TypeKey::Decimal, RawTypes::Supported(&["NEWDECIMAL"])).with_declare(declare)
}

// DMDB accepts the unsigned and zerofill attributes on fixed-point columns
fn declare(data_type: &DataType, escape: &dyn Escape) -> String {
    let mut definition = base::declare(data_type, escape);

    if let DataType::Decimal(options) = data_type {
        if options.unsigned {
            definition.push_str(" UNSIGNED");
        }
        if options.zerofill {
            definition.push_str(" ZEROFILL");
        }
    }

    definition
}

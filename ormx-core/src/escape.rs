/// Escapes a string into a quoted SQL literal.
///
/// Enum declarations render their values through this, so the active query
/// generator decides how literals are quoted.
pub trait Escape {
    fn escape(&self, value: &str) -> String;
}

impl<F> Escape for F
where
    F: Fn(&str) -> String,
{
    fn escape(&self, value: &str) -> String {
        self(value)
    }
}

/// Quotes `value` with single quotes, backslash-escaping the characters a
/// MySQL-family server treats specially inside string literals.
pub fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('\'');

    for ch in value.chars() {
        match ch {
            '\0' => escaped.push_str("\\0"),
            '\x08' => escaped.push_str("\\b"),
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\x1a' => escaped.push_str("\\Z"),
            '"' | '\'' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }

    escaped.push('\'');
    escaped
}

#[test]
fn it_escapes_quotes_and_control_characters() {
    assert_eq!(escape_string("plain"), "'plain'");
    assert_eq!(escape_string("it's"), "'it\\'s'");
    assert_eq!(escape_string("a\nb"), "'a\\nb'");
    assert_eq!(escape_string("back\\slash"), "'back\\\\slash'");
}

#[test]
fn it_accepts_closures_as_escapers() {
    let upper = |value: &str| format!("<{}>", value.to_uppercase());
    assert_eq!(upper.escape("x"), "<X>");
}

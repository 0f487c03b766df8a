//! MiniJinja filter registration.

use minijinja::{Environment, Error, ErrorKind, Value};

use crate::attributes::Attributes;
use crate::escape::esc;

/// Registers the view filters on a minijinja environment.
///
/// - `esc`: HTML-escapes a value, quotes included; the result is marked safe
///   so auto-escaping does not encode it twice. `none` renders as nothing.
/// - `attrs`: renders a map as HTML attributes (`{{ {"id": "x"} | attrs }}`),
///   with the same rules as asset tag attributes.
///
/// Both engines call this for environments they create. Call it yourself when
/// handing a hand-built environment to [`EnvironmentEngine`](super::EnvironmentEngine).
pub fn register_filters(env: &mut Environment<'static>) {
    env.add_filter("esc", |value: Value| -> Value { esc_value(&value) });

    env.add_filter("attrs", |value: Value| -> Result<Value, Error> {
        let json = serde_json::to_value(&value).map_err(|e| {
            Error::new(ErrorKind::InvalidOperation, "cannot convert attributes").with_source(e)
        })?;
        let serde_json::Value::Object(map) = json else {
            return Err(Error::new(
                ErrorKind::InvalidOperation,
                "the `attrs` filter expects a map of attribute names to values",
            ));
        };
        let attributes: Attributes = map.into_iter().collect();
        Ok(Value::from_safe_string(attributes.render()))
    });
}

/// Escapes `value` for HTML. `none` and undefined become an empty string.
pub(crate) fn esc_value(value: &Value) -> Value {
    if value.is_none() || value.is_undefined() {
        return Value::from_safe_string(String::new());
    }
    Value::from_safe_string(esc(&value.to_string()))
}

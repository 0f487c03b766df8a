//! The controller as seen from inside templates.

use std::sync::Arc;

use minijinja::value::{from_args, Kwargs, Object, Value};
use minijinja::{Error, ErrorKind, State};

use super::View;
use crate::assets::DEFAULT_ASSET_GROUP;
use crate::data::to_data_map;
use crate::engine::filters::esc_value;
use crate::error::ViewError;

/// Exposes a [`View`] as the template variable `view`.
///
/// | Method | Result |
/// |--------|--------|
/// | `render(name, data?)` | Rendered sub-view, marked safe |
/// | `exists(name)` | Whether the view can be rendered |
/// | `once(key)` | True on the first call per top-level render |
/// | `assets(group?)` | Placeholder for the group's tags |
/// | `asset(file, group=, order=, attributes=)` | Registers an asset, renders nothing |
/// | `esc(value)` | HTML-escaped value |
/// | `get(key, default?)` | Shared data value |
/// | `call(name, *args)` | Result of an extension |
///
/// Any other method name is looked up as an extension.
#[derive(Debug)]
pub(crate) struct ViewObject {
    view: View,
}

impl ViewObject {
    pub(crate) fn new(view: View) -> Self {
        Self { view }
    }

    fn render_view(&self, args: &[Value]) -> Result<Value, Error> {
        let (name, data): (String, Option<Value>) = from_args(args)?;
        let data = match data {
            Some(data) => to_data_map(&data).map_err(ViewError::into_template_error)?,
            None => Default::default(),
        };
        let content = self
            .view
            .render_map(&name, data)
            .map_err(ViewError::into_template_error)?;
        Ok(Value::from_safe_string(content))
    }

    fn asset(&self, args: &[Value]) -> Result<Value, Error> {
        let (file, kwargs): (String, Kwargs) = from_args(args)?;
        let group: Option<String> = kwargs.get("group")?;
        let order: Option<i32> = kwargs.get("order")?;
        let attributes: Option<Value> = kwargs.get("attributes")?;
        kwargs.assert_all_used()?;

        let attributes = match attributes {
            Some(value) => to_data_map(&value).map_err(ViewError::into_template_error)?,
            None => Default::default(),
        };

        let mut assets = self.view.assets();
        let asset = assets.asset(&file);
        if let Some(group) = group {
            asset.group(group);
        }
        if let Some(order) = order {
            asset.order(order);
        }
        for (name, value) in attributes {
            asset.attr(name, value);
        }
        Ok(Value::from(""))
    }

    fn extension(&self, name: &str, args: &[Value]) -> Result<Value, Error> {
        let args = args
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ViewError::from(e).into_template_error())?;
        let result = self
            .view
            .invoke(name, &args)
            .map_err(ViewError::into_template_error)?;
        Ok(Value::from_serialize(&result))
    }
}

impl Object for ViewObject {
    fn call_method(
        self: &Arc<Self>,
        _state: &State,
        name: &str,
        args: &[Value],
    ) -> Result<Value, Error> {
        match name {
            "render" => self.render_view(args),
            "exists" => {
                let (view,): (String,) = from_args(args)?;
                Ok(Value::from(self.view.exists(&view)))
            }
            "once" => {
                let (key,): (String,) = from_args(args)?;
                Ok(Value::from(self.view.once(&key)))
            }
            "assets" => {
                let (group,): (Option<String>,) = from_args(args)?;
                let group = group.as_deref().unwrap_or(DEFAULT_ASSET_GROUP);
                Ok(Value::from_safe_string(self.view.assets().render(group)))
            }
            "asset" => self.asset(args),
            "esc" => {
                let (value,): (Value,) = from_args(args)?;
                Ok(esc_value(&value))
            }
            "get" => {
                let (key, default): (String, Option<Value>) = from_args(args)?;
                Ok(self
                    .view
                    .get(&key)
                    .map(|value| Value::from_serialize(&value))
                    .or(default)
                    .unwrap_or(Value::from(())))
            }
            "call" => {
                let Some((name, rest)) = args.split_first() else {
                    return Err(Error::new(
                        ErrorKind::MissingArgument,
                        "call() requires an extension name",
                    ));
                };
                let name = name.as_str().ok_or_else(|| {
                    Error::new(ErrorKind::InvalidOperation, "call() name must be a string")
                })?;
                self.extension(name, rest)
            }
            _ if self.view.has_extension(name) => self.extension(name, args),
            _ => Err(Error::new(
                ErrorKind::UnknownMethod,
                format!("view has no method or extension '{}'", name),
            )),
        }
    }
}

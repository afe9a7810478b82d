//! Registration options and their normalization.
//!
//! Options arrive either as a bare name or as a JSON-like object with a
//! required `name` and optional `stage` and `before`. Any other field is kept
//! as opaque metadata on the resulting [`Tap`].

use crate::{
    error::HookError,
    tap::{Tap, TapFn},
};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Normalized registration options.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TapOptions {
    /// Tap name, non-empty.
    pub name: String,
    /// Priority, lower runs earlier. Anything but a number counts as unset.
    #[serde(default, deserialize_with = "lenient_stage")]
    pub stage: Option<f64>,
    /// Names this tap must precede. Accepts a single string or a list;
    /// anything else counts as no constraint.
    #[serde(default, deserialize_with = "lenient_before")]
    pub before: Vec<String>,
    /// Legacy field, accepted but deprecated.
    #[serde(default)]
    pub context: Option<Value>,
    /// Everything else.
    #[serde(flatten)]
    pub meta: Map<String, Value>,
}

fn lenient_stage<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_f64())
}

fn lenient_before<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(name) => vec![name],
        Value::Array(names) => names
            .into_iter()
            .filter_map(|name| match name {
                Value::String(name) => Some(name),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

impl TapOptions {
    /// Options with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the stage.
    pub fn stage(mut self, stage: impl Into<f64>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    /// Add a name to precede.
    pub fn before(mut self, name: impl Into<String>) -> Self {
        self.before.push(name.into());
        self
    }

    /// Set an extra metadata field.
    pub fn meta(mut self, key: impl Into<String>, value: Value) -> Self {
        self.meta.insert(key.into(), value);
        self
    }

    /// Validate raw options.
    ///
    /// A string is trimmed and used as the name. An object must carry a
    /// non-empty string `name`. Anything else is rejected.
    pub fn parse(raw: Value) -> Result<Self, HookError> {
        match raw {
            Value::String(name) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(HookError::invalid("missing name for tap"));
                }
                Ok(Self::new(name))
            }
            Value::Object(map) => {
                match map.get("name") {
                    Some(Value::String(name)) if !name.is_empty() => {}
                    _ => return Err(HookError::invalid("missing name for tap")),
                }
                serde_json::from_value(Value::Object(map))
                    .map_err(|err| HookError::invalid(err.to_string()))
            }
            other => Err(HookError::invalid(format!(
                "tap options must be a name or an object, got {}",
                json_type(&other)
            ))),
        }
    }

    /// Whether the deprecated `context` option was supplied.
    pub fn uses_context(&self) -> bool {
        self.context.is_some()
    }

    /// Back to the raw object form.
    pub fn into_map(self) -> Map<String, Value> {
        let mut map = self.meta;
        map.insert("name".into(), Value::String(self.name));
        if let Some(stage) = self.stage {
            map.insert("stage".into(), Value::from(stage));
        }
        if !self.before.is_empty() {
            map.insert(
                "before".into(),
                Value::Array(self.before.into_iter().map(Value::String).collect()),
            );
        }
        if let Some(context) = self.context {
            map.insert("context".into(), context);
        }
        map
    }

    /// Attach a callback, producing the tap to insert.
    pub fn into_tap<A, R>(self, callback: TapFn<A, R>) -> Tap<A, R> {
        Tap {
            name: self.name,
            stage: self.stage.unwrap_or(0.0),
            before: self.before,
            meta: self.meta,
            callback,
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Merge `defaults` under `options`; fields in `options` win.
///
/// Strings are treated as `{ "name": <string> }`, untrimmed. Values that are neither
/// a string nor an object are returned untouched so validation rejects them.
pub fn merge_defaults(defaults: &Map<String, Value>, options: Value) -> Value {
    let overrides = match options {
        Value::String(name) => {
            let mut map = Map::new();
            map.insert("name".into(), Value::String(name));
            map
        }
        Value::Object(map) => map,
        other => return other,
    };
    let mut merged = defaults.clone();
    merged.extend(overrides);
    Value::Object(merged)
}

/// Anything accepted as the options argument of a registration.
pub trait IntoTapOptions {
    /// The raw, unvalidated form.
    fn into_options_value(self) -> Value;
}

impl IntoTapOptions for &str {
    fn into_options_value(self) -> Value {
        Value::String(self.to_owned())
    }
}

impl IntoTapOptions for String {
    fn into_options_value(self) -> Value {
        Value::String(self)
    }
}

impl IntoTapOptions for &String {
    fn into_options_value(self) -> Value {
        Value::String(self.clone())
    }
}

impl IntoTapOptions for Value {
    fn into_options_value(self) -> Value {
        self
    }
}

impl IntoTapOptions for Map<String, Value> {
    fn into_options_value(self) -> Value {
        Value::Object(self)
    }
}

impl IntoTapOptions for TapOptions {
    fn into_options_value(self) -> Value {
        Value::Object(self.into_map())
    }
}

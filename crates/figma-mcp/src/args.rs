//! Typed access to the untyped `arguments` object of a tool call.
//!
//! Each accessor checks presence and JSON type and reports violations as
//! [`Error::Validation`], naming the tool and the offending field. Fields the
//! tool does not declare are never looked at.

use serde_json::{Map, Value};

use figma_core::error::Error;

/// Borrowed view over a tool's arguments.
pub struct Arguments<'a> {
    tool: &'a str,
    fields: Option<&'a Map<String, Value>>,
}

impl<'a> Arguments<'a> {
    /// Wrap the raw `arguments` value. `null` (absent) counts as an empty
    /// object; anything other than an object is rejected.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `raw` is neither `null` nor an object.
    pub fn new(tool: &'a str, raw: &'a Value) -> Result<Self, Error> {
        let fields = match raw {
            Value::Object(map) => Some(map),
            Value::Null => None,
            _ => {
                return Err(Error::validation(format!(
                    "Invalid arguments for {tool}: arguments must be an object"
                )))
            }
        };
        Ok(Self { tool, fields })
    }

    fn get(&self, field: &str) -> Option<&'a Value> {
        self.fields.and_then(|fields| fields.get(field))
    }

    fn invalid(&self, detail: impl std::fmt::Display) -> Error {
        Error::validation(format!("Invalid arguments for {}: {detail}", self.tool))
    }

    /// A required, non-empty string field.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the field is missing, not a string, or
    /// empty.
    pub fn required_str(&self, field: &str) -> Result<&'a str, Error> {
        match self.optional_str(field)? {
            Some("") => Err(self.invalid(format_args!("field '{field}' must not be empty"))),
            Some(value) => Ok(value),
            None => Err(self.invalid(format_args!("missing required field '{field}'"))),
        }
    }

    /// An optional string field.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the field is present but not a string.
    pub fn optional_str(&self, field: &str) -> Result<Option<&'a str>, Error> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(self.invalid(format_args!("field '{field}' must be a string"))),
        }
    }

    /// An optional numeric field.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the field is present but not a number.
    pub fn optional_number(&self, field: &str) -> Result<Option<f64>, Error> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.invalid(format_args!("field '{field}' is out of range"))),
            Some(_) => Err(self.invalid(format_args!("field '{field}' must be a number"))),
        }
    }

    /// An optional traversal depth. Zero counts as absent and means the
    /// whole tree.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the field is present but not a
    /// non-negative whole number.
    pub fn optional_depth(&self, field: &str) -> Result<Option<u32>, Error> {
        let Some(value) = self.optional_number(field)? else {
            return Ok(None);
        };
        if value.fract() != 0.0 || value < 0.0 || value > f64::from(u32::MAX) {
            return Err(self.invalid(format_args!(
                "field '{field}' must be a non-negative integer"
            )));
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let depth = value as u32;
        Ok((depth > 0).then_some(depth))
    }

    /// An optional string restricted to a set of literals, parsed into `T`.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the accepted values if the field is
    /// present but not one of them.
    pub fn optional_enum<T>(&self, field: &str, allowed: &[&str]) -> Result<Option<T>, Error>
    where
        T: std::str::FromStr,
    {
        let Some(raw) = self.optional_str(field)? else {
            return Ok(None);
        };
        raw.parse().map(Some).map_err(|_| {
            self.invalid(format_args!(
                "field '{field}' must be one of {}, got '{raw}'",
                allowed.join(", ")
            ))
        })
    }

    /// A required list of node ids given as one comma-separated string.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the field is missing or contains no
    /// usable id.
    pub fn required_ids(&self, field: &str) -> Result<Vec<String>, Error> {
        let raw = self.required_str(field)?;
        let ids: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();
        if ids.is_empty() {
            return Err(self.invalid(format_args!("field '{field}' must contain a node id")));
        }
        Ok(ids)
    }
}

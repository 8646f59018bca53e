use std::collections::HashMap;

use crate::error::BodyError;

/// Decoded `application/x-www-form-urlencoded` fields.
///
/// Repeated keys keep the first value.
#[derive(Debug, Clone, Default)]
pub struct FormFields {
    fields: HashMap<String, String>,
}

impl FormFields {
    pub fn parse(bytes: &[u8]) -> Self {
        let mut fields = HashMap::new();
        for (key, value) in url::form_urlencoded::parse(bytes) {
            fields.entry(key.into_owned()).or_insert_with(|| value.into_owned());
        }
        Self { fields }
    }

    /// Raw value of a field.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Reads a field that must be present and non-empty.
    pub fn required<T>(
        &self,
        name: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<T, BodyError> {
        self.optional(name, parse)?
            .ok_or_else(|| BodyError::MissingField(name.to_string()))
    }

    /// Reads a field that may be absent.
    pub fn optional<T>(
        &self,
        name: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>, BodyError> {
        field_value(name, self.get(name), parse)
    }
}

pub(crate) fn field_value<T>(
    name: &str,
    raw: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, BodyError> {
    match raw {
        None | Some("") => Ok(None),
        Some(value) => parse(value)
            .map(Some)
            .ok_or_else(|| BodyError::InvalidField(name.to_string())),
    }
}

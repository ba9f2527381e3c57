use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{ApiError, ValidationErrorSet};

/// A JSON object read field by field. A field of the wrong type is recorded
/// as a validation failure instead of rejecting the whole body.
pub struct JsonFields {
    body: Map<String, Value>,
    errors: ValidationErrorSet,
}

impl JsonFields {
    pub fn new(body: Value) -> Result<Self, ApiError> {
        match body {
            Value::Object(body) => Ok(JsonFields {
                body,
                errors: ValidationErrorSet::new(),
            }),
            _ => Err(ApiError::BadRequest(
                "The request body must be a JSON object.".to_string(),
            )),
        }
    }

    /// A string-valued field. Absent and `null` read as `None`.
    pub fn string<T: DeserializeOwned>(&mut self, field: &str) -> Option<T> {
        match self.body.remove(field) {
            None | Some(Value::Null) => None,
            Some(value @ Value::String(_)) => match serde_json::from_value(value) {
                Ok(parsed) => Some(parsed),
                Err(_) => {
                    self.type_error(field);
                    None
                }
            },
            Some(_) => {
                self.type_error(field);
                None
            }
        }
    }

    pub fn into_errors(self) -> ValidationErrorSet {
        self.errors
    }

    fn type_error(&mut self, field: &str) {
        self.errors
            .add(field, format!("The {} must be a string.", field.replace('_', " ")));
    }
}

//! Decoding of the remote employee API's `{data, status}` response envelope.

use serde_json::{Map, Value};
use shared::types::Employee;
use thiserror::Error;

/// A response body that does not match the expected envelope or payload shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DecodeError {
    /// Wire name of the offending field, when one can be pinned down.
    pub field: Option<String>,
    pub message: String,
}

impl DecodeError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }

    fn at(field: impl Into<String>, message: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            message: format!("field `{field}`: {}", message.into()),
            field: Some(field),
        }
    }
}

/// The remote's wrapper around every payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope<T> {
    pub data: T,
    pub status: Option<String>,
}

/// A payload shape that can be extracted from an envelope's `data` member.
pub trait Payload: Sized {
    /// Human-readable name of the shape, used in error messages.
    const SHAPE: &'static str;

    fn from_data(data: Value) -> Result<Self, DecodeError>;
}

impl Payload for Employee {
    const SHAPE: &'static str = "an employee";

    fn from_data(data: Value) -> Result<Self, DecodeError> {
        decode_employee(data, None)
    }
}

impl Payload for Vec<Employee> {
    const SHAPE: &'static str = "a list of employees";

    fn from_data(data: Value) -> Result<Self, DecodeError> {
        let Value::Array(items) = data else {
            return Err(DecodeError::at("data", format!("expected {}", Self::SHAPE)));
        };

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| decode_employee(item, Some(index)))
            .collect()
    }
}

/// Outcome flag reported by the remote for a delete.
impl Payload for bool {
    const SHAPE: &'static str = "a boolean";

    fn from_data(data: Value) -> Result<Self, DecodeError> {
        data.as_bool()
            .ok_or_else(|| DecodeError::at("data", format!("expected {}", Self::SHAPE)))
    }
}

#[derive(Debug, Clone, Copy)]
enum FieldKind {
    Text,
    Count,
    Positive,
}

impl FieldKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Text => value.is_string(),
            Self::Count => value
                .as_u64()
                .is_some_and(|n| u32::try_from(n).is_ok()),
            Self::Positive => value
                .as_u64()
                .is_some_and(|n| n > 0 && u32::try_from(n).is_ok()),
        }
    }

    fn expected(self) -> &'static str {
        match self {
            Self::Text => "expected a string",
            Self::Count => "expected a non-negative integer",
            Self::Positive => "expected a positive integer",
        }
    }
}

const EMPLOYEE_FIELDS: [(&str, FieldKind); 6] = [
    ("id", FieldKind::Text),
    ("employee_name", FieldKind::Text),
    ("employee_salary", FieldKind::Count),
    ("employee_age", FieldKind::Positive),
    ("employee_title", FieldKind::Text),
    ("employee_email", FieldKind::Text),
];

/// Decodes a response body into its envelope, with `data` in the shape `T`.
pub fn decode_envelope<T: Payload>(body: &str) -> Result<Envelope<T>, DecodeError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| DecodeError::new(format!("malformed response body: {e}")))?;

    let Value::Object(mut envelope) = value else {
        return Err(DecodeError::new("response envelope is not a JSON object"));
    };

    let status = match envelope.remove("status") {
        None | Some(Value::Null) => None,
        Some(Value::String(status)) => Some(status),
        Some(_) => return Err(DecodeError::at("status", "expected a string")),
    };

    let data = envelope
        .remove("data")
        .filter(|data| !data.is_null())
        .ok_or_else(|| DecodeError::at("data", format!("missing, expected {}", T::SHAPE)))?;

    Ok(Envelope {
        data: T::from_data(data)?,
        status,
    })
}

/// Decodes a response body and unwraps the payload.
pub fn decode<T: Payload>(body: &str) -> Result<T, DecodeError> {
    decode_envelope(body).map(|envelope| envelope.data)
}

/// Best-effort extraction of the remote's status description from any body,
/// including error bodies that carry no usable `data`.
pub fn remote_status(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["status", "error"]
        .into_iter()
        .find_map(|key| value.get(key)?.as_str().map(str::to_owned))
        .filter(|status| !status.trim().is_empty())
}

fn decode_employee(value: Value, index: Option<usize>) -> Result<Employee, DecodeError> {
    let located = |message: String| match index {
        Some(index) => format!("employee at index {index}: {message}"),
        None => message,
    };

    let Value::Object(record) = &value else {
        return Err(DecodeError::new(located(format!(
            "expected {}",
            Employee::SHAPE
        ))));
    };

    if let Some((field, problem)) = invalid_field(record) {
        return Err(DecodeError::at(field, located(problem.to_owned())));
    }

    serde_json::from_value(value).map_err(|e| DecodeError::new(located(e.to_string())))
}

fn invalid_field(record: &Map<String, Value>) -> Option<(&'static str, &'static str)> {
    EMPLOYEE_FIELDS
        .iter()
        .find_map(|&(field, kind)| match record.get(field) {
            None | Some(Value::Null) => Some((field, "missing")),
            Some(value) if !kind.accepts(value) => Some((field, kind.expected())),
            Some(_) => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn employee_json(id: &str, name: &str, salary: u32) -> Value {
        json!({
            "id": id,
            "employee_name": name,
            "employee_salary": salary,
            "employee_age": 30,
            "employee_title": "Developer",
            "employee_email": format!("{}@company.com", name.to_lowercase()),
        })
    }

    #[test]
    fn decodes_employee_list_in_order() {
        let body = json!({
            "data": [employee_json("1", "Ann", 90_000), employee_json("2", "Bo", 50_000)],
            "status": "Successfully processed request."
        })
        .to_string();

        let envelope = decode_envelope::<Vec<Employee>>(&body).unwrap();

        assert_eq!(envelope.status.as_deref(), Some("Successfully processed request."));
        let names: Vec<_> = envelope.data.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Ann", "Bo"]);
        assert_eq!(envelope.data[0].salary, 90_000);
        assert_eq!(envelope.data[1].email, "bo@company.com");
    }

    #[test]
    fn decodes_single_employee_and_ignores_unknown_fields() {
        let mut record = employee_json("7", "John Doe", 50_000);
        record["employee_nickname"] = json!("JD");
        let body = json!({ "data": record, "status": "ok", "trace": 1 }).to_string();

        let employee = decode::<Employee>(&body).unwrap();

        assert_eq!(employee.id, "7");
        assert_eq!(employee.name, "John Doe");
        assert_eq!(employee.title, "Developer");
    }

    #[test]
    fn missing_field_is_named() {
        let mut record = employee_json("1", "Ann", 1);
        record.as_object_mut().unwrap().remove("employee_name");
        let body = json!({ "data": record }).to_string();

        let err = decode::<Employee>(&body).unwrap_err();

        assert_eq!(err.field.as_deref(), Some("employee_name"));
        assert!(err.to_string().contains("employee_name"));
    }

    #[test]
    fn wrong_primitive_type_is_named_with_its_position() {
        let mut second = employee_json("2", "Bo", 1);
        second["employee_salary"] = json!("a lot");
        let body = json!({ "data": [employee_json("1", "Ann", 1), second] }).to_string();

        let err = decode::<Vec<Employee>>(&body).unwrap_err();

        assert_eq!(err.field.as_deref(), Some("employee_salary"));
        assert!(err.message.contains("index 1"));
    }

    #[test]
    fn negative_salary_is_rejected() {
        let mut record = employee_json("1", "Ann", 1);
        record["employee_salary"] = json!(-5);
        let body = json!({ "data": record }).to_string();

        let err = decode::<Employee>(&body).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("employee_salary"));
    }

    #[test]
    fn zero_age_is_rejected() {
        let mut record = employee_json("1", "Ann", 1);
        record["employee_age"] = json!(0);
        let body = json!({ "data": [record] }).to_string();

        let err = decode::<Vec<Employee>>(&body).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("employee_age"));
        assert!(err.message.contains("positive"));

        let mut record = employee_json("1", "Ann", 0);
        record["employee_age"] = json!(1);
        let body = json!({ "data": record }).to_string();
        assert_eq!(decode::<Employee>(&body).unwrap().salary, 0);
    }

    #[test]
    fn null_id_is_rejected() {
        let mut record = employee_json("1", "Ann", 1);
        record["id"] = Value::Null;
        let body = json!({ "data": record }).to_string();

        let err = decode::<Employee>(&body).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("id"));
    }

    #[test]
    fn malformed_envelopes_are_rejected() {
        for body in ["", "not json", "[1, 2]", r#"{"status": "ok"}"#, r#"{"data": null}"#] {
            assert!(decode::<Vec<Employee>>(body).is_err(), "accepted {body:?}");
        }

        let err = decode::<Employee>(r#"{"data": {"id": "1"}, "status": 200}"#).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("status"));
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let body = json!({ "data": employee_json("1", "Ann", 1) }).to_string();
        let err = decode::<Vec<Employee>>(&body).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("data"));

        let body = json!({ "data": [employee_json("1", "Ann", 1)] }).to_string();
        assert!(decode::<Employee>(&body).is_err());
    }

    #[test]
    fn decodes_delete_outcome() {
        assert!(decode::<bool>(r#"{"data": true, "status": "ok"}"#).unwrap());
        assert!(!decode::<bool>(r#"{"data": false}"#).unwrap());
        assert!(decode::<bool>(r#"{"data": "yes"}"#).is_err());
    }

    #[test]
    fn remote_status_reads_status_or_error() {
        assert_eq!(
            remote_status(r#"{"data": null, "status": "Employee not found"}"#).as_deref(),
            Some("Employee not found")
        );
        assert_eq!(
            remote_status(r#"{"error": "Too Many Requests"}"#).as_deref(),
            Some("Too Many Requests")
        );
        assert_eq!(remote_status("<html>502</html>"), None);
        assert_eq!(remote_status(r#"{"status": " "}"#), None);
    }
}

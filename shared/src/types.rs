use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// region: Employee Types

/// An employee record as owned by the remote employee API.
///
/// Field names on the wire follow the remote's `employee_<field>` convention,
/// except for `id`. The same names are used when the record is rendered back
/// to callers of this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Employee {
    pub id: String,
    #[serde(rename = "employee_name")]
    pub name: String,
    #[serde(rename = "employee_salary")]
    pub salary: u32,
    #[serde(rename = "employee_age")]
    pub age: u32,
    #[serde(rename = "employee_title")]
    pub title: String,
    #[serde(rename = "employee_email")]
    pub email: String,
}

// endregion: Employee Types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::EmployeeServiceError;

pub const MIN_AGE: u32 = 16;
pub const MAX_AGE: u32 = 75;

/// Fields accepted when creating an employee. Also the remote's create payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreateEmployeeRequest {
    pub name: String,
    pub salary: u32,
    pub age: u32,
    pub title: String,
}

impl CreateEmployeeRequest {
    /// Checks the structural constraints, reporting the first violation found
    /// in the order name, salary, age, title.
    pub fn validate(&self) -> Result<(), EmployeeServiceError> {
        if self.name.trim().is_empty() {
            return Err(invalid("name must not be blank"));
        }
        if self.salary == 0 {
            return Err(invalid("salary must be greater than zero"));
        }
        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(invalid(format!(
                "age must be between {MIN_AGE} and {MAX_AGE}, got {}",
                self.age
            )));
        }
        if self.title.trim().is_empty() {
            return Err(invalid("title must not be blank"));
        }
        Ok(())
    }
}

/// Payload of the remote's delete, which is keyed by name rather than id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteEmployeeRequest {
    name: String,
}

impl DeleteEmployeeRequest {
    pub fn new(name: impl Into<String>) -> Result<Self, EmployeeServiceError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(invalid("name of the employee to delete must not be blank"));
        }
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

fn invalid(message: impl Into<String>) -> EmployeeServiceError {
    EmployeeServiceError::Invalid(message.into())
}

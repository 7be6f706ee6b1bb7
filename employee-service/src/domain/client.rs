use async_trait::async_trait;
use shared::types::Employee;

use crate::domain::employee::{CreateEmployeeRequest, DeleteEmployeeRequest};
use crate::error::EmployeeServiceError;

/// Access to the remote employee API.
///
/// Implementations classify every failure into an [`EmployeeServiceError`] kind
/// before returning; callers never see raw transport or status details.
#[cfg_attr(feature = "test-support", mockall::automock)]
#[async_trait]
pub trait EmployeeApiClient: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Employee>, EmployeeServiceError>;

    async fn get_by_id(&self, id: &str) -> Result<Employee, EmployeeServiceError>;

    async fn create(&self, req: &CreateEmployeeRequest) -> Result<Employee, EmployeeServiceError>;

    /// Returns whether the remote reports that an employee was deleted.
    async fn delete_by_name(&self, req: &DeleteEmployeeRequest)
    -> Result<bool, EmployeeServiceError>;
}

use std::sync::Arc;

use async_trait::async_trait;
use shared::types::Employee;

use crate::domain::client::EmployeeApiClient;
use crate::domain::employee::{CreateEmployeeRequest, DeleteEmployeeRequest};
use crate::error::EmployeeServiceError;

/// Number of names returned by [`EmployeeService::top_ten_earners`].
pub const TOP_EARNERS_LIMIT: usize = 10;

/// Employee operations exposed to the HTTP layer.
#[cfg_attr(feature = "test-support", mockall::automock)]
#[async_trait]
pub trait EmployeeService: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Employee>, EmployeeServiceError>;

    /// Employees whose name contains `fragment`, ignoring case, in listing order.
    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Employee>, EmployeeServiceError>;

    async fn get_by_id(&self, id: &str) -> Result<Employee, EmployeeServiceError>;

    async fn highest_salary(&self) -> Result<u32, EmployeeServiceError>;

    /// Names of the best paid employees, highest salary first.
    async fn top_ten_earners(&self) -> Result<Vec<String>, EmployeeServiceError>;

    async fn create(&self, req: CreateEmployeeRequest) -> Result<Employee, EmployeeServiceError>;

    /// Deletes the employee with the given id and returns its name.
    async fn delete_by_id(&self, id: &str) -> Result<String, EmployeeServiceError>;
}

/// [`EmployeeService`] backed by the remote employee API.
///
/// Holds no employee data between calls; every operation fetches what it needs.
pub struct RemoteEmployeeService {
    client: Arc<dyn EmployeeApiClient>,
}

impl RemoteEmployeeService {
    pub fn new(client: Arc<dyn EmployeeApiClient>) -> Self {
        Self { client }
    }

    /// First phase of a delete: the remote deletes by name, so the id is
    /// resolved to the employee's current name.
    async fn resolve_delete_target(
        &self,
        id: &str,
    ) -> Result<DeleteEmployeeRequest, EmployeeServiceError> {
        let employee = self.client.get_by_id(id).await?;
        DeleteEmployeeRequest::new(employee.name)
    }

    /// Second phase of a delete. The remote's outcome is reported as is.
    async fn delete_resolved(
        &self,
        id: &str,
        target: DeleteEmployeeRequest,
    ) -> Result<String, EmployeeServiceError> {
        if self.client.delete_by_name(&target).await? {
            tracing::info!(%id, name = target.name(), "Employee deleted");
            return Ok(target.name().to_owned());
        }

        tracing::warn!(%id, name = target.name(), "Employee API reported nothing deleted");
        Err(EmployeeServiceError::NotFound(format!(
            "employee API reported nothing was deleted for employee {id} ({})",
            target.name()
        )))
    }
}

#[async_trait]
impl EmployeeService for RemoteEmployeeService {
    #[tracing::instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Employee>, EmployeeServiceError> {
        self.client.list_all().await
    }

    #[tracing::instrument(skip(self))]
    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Employee>, EmployeeServiceError> {
        let employees = self.client.list_all().await?;
        let matches = filter_by_name(employees, fragment);

        tracing::debug!(count = matches.len(), "Employees matched name search");
        Ok(matches)
    }

    #[tracing::instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> Result<Employee, EmployeeServiceError> {
        self.client.get_by_id(id).await
    }

    #[tracing::instrument(skip(self))]
    async fn highest_salary(&self) -> Result<u32, EmployeeServiceError> {
        let employees = self.client.list_all().await?;
        max_salary(&employees).ok_or(EmployeeServiceError::NoEmployeesFound)
    }

    #[tracing::instrument(skip(self))]
    async fn top_ten_earners(&self) -> Result<Vec<String>, EmployeeServiceError> {
        let employees = self.client.list_all().await?;
        Ok(top_earner_names(employees, TOP_EARNERS_LIMIT))
    }

    #[tracing::instrument(skip(self, req), fields(name = %req.name))]
    async fn create(&self, req: CreateEmployeeRequest) -> Result<Employee, EmployeeServiceError> {
        req.validate()?;

        let employee = self.client.create(&req).await?;
        tracing::info!(id = %employee.id, "Employee created");
        Ok(employee)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_by_id(&self, id: &str) -> Result<String, EmployeeServiceError> {
        let target = self.resolve_delete_target(id).await?;
        self.delete_resolved(id, target).await
    }
}

fn filter_by_name(employees: Vec<Employee>, fragment: &str) -> Vec<Employee> {
    let needle = fragment.to_lowercase();
    employees
        .into_iter()
        .filter(|e| e.name.to_lowercase().contains(&needle))
        .collect()
}

fn max_salary(employees: &[Employee]) -> Option<u32> {
    employees.iter().map(|e| e.salary).max()
}

/// Stable sort keeps listing order among equal salaries.
fn top_earner_names(mut employees: Vec<Employee>, limit: usize) -> Vec<String> {
    employees.sort_by(|a, b| b.salary.cmp(&a.salary));
    employees.into_iter().take(limit).map(|e| e.name).collect()
}

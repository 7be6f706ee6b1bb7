use std::sync::Arc;

use crate::domain::service::EmployeeService;

pub struct EmployeeAppState {
    pub employee_service: Arc<dyn EmployeeService>,
}

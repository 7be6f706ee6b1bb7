use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use shared::{responses::ApiResponse, types::Employee};

use crate::{
    api::state::EmployeeAppState, domain::employee::CreateEmployeeRequest,
    error::EmployeeServiceError,
};

#[utoipa::path(
    get,
    path = "/api/v1/employee",
    tag = "Employees",
    operation_id = "list_employees",
    responses(
        (status = 200, description = "List all employees", body = ApiResponse<Vec<Employee>>),
        (status = 502, description = "Employee API failed")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn find_all(
    State(state): State<Arc<EmployeeAppState>>,
) -> Result<Json<ApiResponse<Vec<Employee>>>, EmployeeServiceError> {
    let output = state.employee_service.list_all().await?;
    Ok(Json(ApiResponse::ok(output)))
}

#[utoipa::path(
    get,
    path = "/api/v1/employee/search/{search_string}",
    tag = "Employees",
    operation_id = "search_employees",
    params(
        ("search_string" = String, Path, description = "Case-insensitive name fragment")
    ),
    responses(
        (status = 200, description = "Employees whose name matches", body = ApiResponse<Vec<Employee>>)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn search_by_name(
    State(state): State<Arc<EmployeeAppState>>,
    Path(search_string): Path<String>,
) -> Result<Json<ApiResponse<Vec<Employee>>>, EmployeeServiceError> {
    let output = state.employee_service.search_by_name(&search_string).await?;
    Ok(Json(ApiResponse::ok(output)))
}

#[utoipa::path(
    get,
    path = "/api/v1/employee/{id}",
    tag = "Employees",
    operation_id = "get_employee",
    params(
        ("id" = String, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = ApiResponse<Employee>),
        (status = 404, description = "Employee not found")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn find_by_id(
    State(state): State<Arc<EmployeeAppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Employee>>, EmployeeServiceError> {
    let output = state.employee_service.get_by_id(&id).await?;
    Ok(Json(ApiResponse::ok(output)))
}

#[utoipa::path(
    get,
    path = "/api/v1/employee/highestSalary",
    tag = "Employees",
    operation_id = "highest_salary",
    responses(
        (status = 200, description = "Highest salary across all employees", body = ApiResponse<u32>),
        (status = 404, description = "There are no employees")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn highest_salary(
    State(state): State<Arc<EmployeeAppState>>,
) -> Result<Json<ApiResponse<u32>>, EmployeeServiceError> {
    let output = state.employee_service.highest_salary().await?;
    Ok(Json(ApiResponse::ok(output)))
}

#[utoipa::path(
    get,
    path = "/api/v1/employee/topTenHighestEarningEmployeeNames",
    tag = "Employees",
    operation_id = "top_ten_earners",
    responses(
        (status = 200, description = "Names of the ten best paid employees", body = ApiResponse<Vec<String>>)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn top_ten_earners(
    State(state): State<Arc<EmployeeAppState>>,
) -> Result<Json<ApiResponse<Vec<String>>>, EmployeeServiceError> {
    let output = state.employee_service.top_ten_earners().await?;
    Ok(Json(ApiResponse::ok(output)))
}

#[utoipa::path(
    post,
    path = "/api/v1/employee",
    tag = "Employees",
    operation_id = "create_employee",
    request_body = CreateEmployeeRequest,
    responses(
        (status = 200, description = "Employee created", body = ApiResponse<Employee>),
        (status = 400, description = "Invalid employee")
    )
)]
#[tracing::instrument(skip(state, req), fields(name = %req.name))]
pub async fn create(
    State(state): State<Arc<EmployeeAppState>>,
    Json(req): Json<CreateEmployeeRequest>,
) -> Result<Json<ApiResponse<Employee>>, EmployeeServiceError> {
    let output = state.employee_service.create(req).await?;
    Ok(Json(ApiResponse::ok(output)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/employee/{id}",
    tag = "Employees",
    operation_id = "delete_employee",
    params(
        ("id" = String, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Name of the deleted employee", body = ApiResponse<String>),
        (status = 404, description = "Employee not found")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<Arc<EmployeeAppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<String>>, EmployeeServiceError> {
    let output = state.employee_service.delete_by_id(&id).await?;
    Ok(Json(ApiResponse::ok(output)))
}

use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::models::dto::{EmployeeDto, EmployeeQueryParams};
use crate::services::employee::EmployeeService;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/employees")
            .route(web::get().to(get_employees))
            .route(web::post().to(create_employee)),
    )
    .service(
        web::resource("/api/employees/{id}")
            .route(web::get().to(get_employee))
            .route(web::put().to(update_employee))
            .route(web::delete().to(delete_employee)),
    );
}

pub async fn get_employees(
    service: web::Data<EmployeeService>,
    query: web::Query<EmployeeQueryParams>,
) -> Result<HttpResponse, AppError> {
    let page = service.list(&query).await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn get_employee(
    service: web::Data<EmployeeService>,
    id: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let employee = service.get(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(employee))
}

pub async fn create_employee(
    service: web::Data<EmployeeService>,
    new_employee: web::Json<EmployeeDto>,
) -> Result<HttpResponse, AppError> {
    let created = service.create(new_employee.into_inner()).await?;
    Ok(HttpResponse::Created()
        .insert_header(("Location", format!("/api/employees/{}", created.id)))
        .json(created))
}

pub async fn update_employee(
    service: web::Data<EmployeeService>,
    id: web::Path<i32>,
    updates: web::Json<EmployeeDto>,
) -> Result<HttpResponse, AppError> {
    service.update(id.into_inner(), updates.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn delete_employee(
    service: web::Data<EmployeeService>,
    id: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    service.delete(id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

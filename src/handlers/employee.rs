use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use log::error;
use serde::Serialize;

use crate::db::EmployeeStore;
use crate::handlers::form::read_employee_form;
use crate::models::attachment::StoredFile;
use crate::services::onboarding::{onboard_employee, OnboardingOutcome};
use crate::utils::uploads::UploadStore;

pub const ONBOARDING_SUCCESS_MESSAGE: &str = "เพิ่มข้อมูลพนักงานสำเร็จ";

#[derive(Serialize)]
struct CreateEmployeeResponse {
    message: &'static str,
    #[serde(flatten)]
    outcome: OnboardingOutcome,
}

pub async fn create_employee(
    store: web::Data<dyn EmployeeStore>,
    uploads: web::Data<UploadStore>,
    payload: Multipart,
) -> Result<HttpResponse, actix_web::Error> {
    let form = read_employee_form(payload, &uploads).await?;
    let stored: Vec<StoredFile> = form.files.iter().map(|file| file.stored.clone()).collect();

    let outcome = match onboard_employee(store.get_ref(), &form.employee, &stored).await {
        Ok(outcome) => outcome,
        Err(err) => {
            uploads.discard_all(form.files);
            return Err(err.into());
        }
    };

    // The rows are committed, so the response reports them even if a file
    // could not be moved into place.
    let failed = uploads.promote_all(form.files);
    if !failed.is_empty() {
        error!(
            "Employee {} committed but {} upload(s) could not be stored: {}",
            outcome.employee_id,
            failed.len(),
            failed.join(", ")
        );
    }

    Ok(HttpResponse::Ok().json(CreateEmployeeResponse {
        message: ONBOARDING_SUCCESS_MESSAGE,
        outcome,
    }))
}

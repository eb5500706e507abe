pub mod employee;
pub mod form;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/employee")
            .route("/addemployee", web::post().to(employee::create_employee)),
    );
}

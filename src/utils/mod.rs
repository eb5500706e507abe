pub mod lenient;
pub mod uploads;
pub mod validation;

pub mod attachment;
pub mod employee;

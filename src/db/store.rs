use async_trait::async_trait;

use crate::models::attachment::NewAttachment;
use crate::models::employee::{
    Address, AddressKind, ContactPerson, ContactSlot, EmployeeLinks, NewChild, NewEducation,
    NewEmployee, NewSibling, NewWorkExperience,
};

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn EmployeeTx>, sqlx::Error>;
}

/// A transaction dropped without `commit` rolls back.
#[async_trait]
pub trait EmployeeTx: Send {
    async fn insert_address(&mut self, kind: AddressKind, address: &Address) -> Result<i64, sqlx::Error>;

    async fn insert_attachment(&mut self, attachment: &NewAttachment<'_>) -> Result<i64, sqlx::Error>;

    /// Fills in the file columns of an existing attachment row.
    async fn set_attachment_file(
        &mut self,
        attachment_id: i64,
        file_name: &str,
        file_path: &str,
    ) -> Result<(), sqlx::Error>;

    async fn insert_contact_person(
        &mut self,
        slot: ContactSlot,
        person: &ContactPerson,
    ) -> Result<i64, sqlx::Error>;

    async fn insert_employee(
        &mut self,
        employee: &NewEmployee,
        links: &EmployeeLinks,
    ) -> Result<i64, sqlx::Error>;

    async fn insert_child(&mut self, employee_id: i64, child: &NewChild) -> Result<i64, sqlx::Error>;

    async fn insert_sibling(&mut self, employee_id: i64, sibling: &NewSibling) -> Result<i64, sqlx::Error>;

    async fn insert_education(
        &mut self,
        employee_id: i64,
        education: &NewEducation,
    ) -> Result<i64, sqlx::Error>;

    async fn insert_work_experience(
        &mut self,
        employee_id: i64,
        work: &NewWorkExperience,
    ) -> Result<i64, sqlx::Error>;

    /// Points an attachment at the record it documents.
    async fn link_attachment(&mut self, attachment_id: i64, reference_id: i64) -> Result<(), sqlx::Error>;

    async fn find_employee_type_name(&mut self, employee_type_id: i64) -> Result<Option<String>, sqlx::Error>;

    async fn commit(self: Box<Self>) -> Result<(), sqlx::Error>;

    async fn rollback(self: Box<Self>) -> Result<(), sqlx::Error>;
}

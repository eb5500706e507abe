//! In-memory [`EmployeeStore`] used by the tests.
//!
//! A transaction copies every table on `begin` and replaces them all on
//! `commit`. Transactions are not isolated from each other: two running at
//! once lose each other's rows, so tests drive one transaction at a time.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use super::store::{EmployeeStore, EmployeeTx};
use crate::models::attachment::NewAttachment;
use crate::models::employee::{
    Address, AddressKind, ContactPerson, ContactSlot, EmployeeLinks, NewChild, NewEducation,
    NewEmployee, NewSibling, NewWorkExperience,
};

#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentRow {
    pub file_name: Option<String>,
    pub file_path: Option<String>,
    pub reference_type: String,
    pub reference_id: Option<i64>,
    pub create_name: Option<String>,
    pub modify_name: Option<String>,
    pub create_date: DateTime<Utc>,
    pub modify_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct EmployeeRow {
    pub employee: NewEmployee,
    pub links: EmployeeLinks,
}

#[derive(Debug, Clone, Default)]
pub struct Tables {
    next_id: i64,
    pub employee_type: BTreeMap<i64, String>,
    pub address_card: BTreeMap<i64, Address>,
    pub address_house: BTreeMap<i64, Address>,
    pub attachment: BTreeMap<i64, AttachmentRow>,
    pub contact_person1: BTreeMap<i64, ContactPerson>,
    pub contact_person2: BTreeMap<i64, ContactPerson>,
    pub employee: BTreeMap<i64, EmployeeRow>,
    pub children: BTreeMap<i64, (i64, NewChild)>,
    pub siblings: BTreeMap<i64, (i64, NewSibling)>,
    pub education_history: BTreeMap<i64, (i64, NewEducation)>,
    pub work_experience: BTreeMap<i64, (i64, NewWorkExperience)>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Row counts of the ten tables an onboarding writes to.
    pub fn row_counts(&self) -> [usize; 10] {
        [
            self.address_card.len(),
            self.address_house.len(),
            self.attachment.len(),
            self.contact_person1.len(),
            self.contact_person2.len(),
            self.employee.len(),
            self.children.len(),
            self.siblings.len(),
            self.education_history.len(),
            self.work_experience.len(),
        ]
    }

    fn require_employee(&self, employee_id: i64) -> Result<(), sqlx::Error> {
        if !self.employee.contains_key(&employee_id) {
            return Err(fk_violation("employee", employee_id));
        }
        Ok(())
    }
}

fn fk_violation(table: &str, id: i64) -> sqlx::Error {
    sqlx::Error::Protocol(format!("foreign key violation: {} {} does not exist", table, id))
}

#[derive(Clone, Default)]
pub struct MemoryEmployeeStore {
    tables: Arc<Mutex<Tables>>,
    fail_on: Option<&'static str>,
}

impl MemoryEmployeeStore {
    pub fn with_employee_types(types: &[(i64, &str)]) -> Self {
        let mut tables = Tables::default();
        for (id, name) in types {
            tables.employee_type.insert(*id, name.to_string());
            tables.next_id = tables.next_id.max(*id);
        }
        MemoryEmployeeStore {
            tables: Arc::new(Mutex::new(tables)),
            fail_on: None,
        }
    }

    /// Every write to `table` fails from now on.
    pub fn failing_on(mut self, table: &'static str) -> Self {
        self.fail_on = Some(table);
        self
    }

    pub fn snapshot(&self) -> Tables {
        self.tables.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmployeeStore for MemoryEmployeeStore {
    async fn begin(&self) -> Result<Box<dyn EmployeeTx>, sqlx::Error> {
        Ok(Box::new(MemoryEmployeeTx {
            shared: Arc::clone(&self.tables),
            working: self.snapshot(),
            fail_on: self.fail_on,
        }))
    }
}

pub struct MemoryEmployeeTx {
    shared: Arc<Mutex<Tables>>,
    working: Tables,
    fail_on: Option<&'static str>,
}

impl MemoryEmployeeTx {
    fn check(&self, table: &str) -> Result<(), sqlx::Error> {
        if self.fail_on == Some(table) {
            return Err(sqlx::Error::Protocol(format!("injected failure writing {}", table)));
        }
        Ok(())
    }
}

#[async_trait]
impl EmployeeTx for MemoryEmployeeTx {
    async fn insert_address(&mut self, kind: AddressKind, address: &Address) -> Result<i64, sqlx::Error> {
        self.check(kind.table())?;
        let id = self.working.next_id();
        let table = match kind {
            AddressKind::Card => &mut self.working.address_card,
            AddressKind::House => &mut self.working.address_house,
        };
        table.insert(id, address.clone());
        Ok(id)
    }

    async fn insert_attachment(&mut self, attachment: &NewAttachment<'_>) -> Result<i64, sqlx::Error> {
        self.check("attachment")?;
        let id = self.working.next_id();
        let now = Utc::now();
        self.working.attachment.insert(
            id,
            AttachmentRow {
                file_name: attachment.file.map(|f| f.file_name.clone()),
                file_path: attachment.file.map(|f| f.file_path.clone()),
                reference_type: attachment.reference_type.to_string(),
                reference_id: None,
                create_name: attachment.create_name.map(str::to_string),
                modify_name: attachment.modify_name.map(str::to_string),
                create_date: now,
                modify_date: now,
            },
        );
        Ok(id)
    }

    async fn set_attachment_file(
        &mut self,
        attachment_id: i64,
        file_name: &str,
        file_path: &str,
    ) -> Result<(), sqlx::Error> {
        self.check("attachment")?;
        let row = self
            .working
            .attachment
            .get_mut(&attachment_id)
            .ok_or(sqlx::Error::RowNotFound)?;
        row.file_name = Some(file_name.to_string());
        row.file_path = Some(file_path.to_string());
        row.modify_date = Utc::now();
        Ok(())
    }

    async fn insert_contact_person(
        &mut self,
        slot: ContactSlot,
        person: &ContactPerson,
    ) -> Result<i64, sqlx::Error> {
        self.check(slot.table())?;
        let id = self.working.next_id();
        let table = match slot {
            ContactSlot::First => &mut self.working.contact_person1,
            ContactSlot::Second => &mut self.working.contact_person2,
        };
        table.insert(id, person.clone());
        Ok(id)
    }

    async fn insert_employee(
        &mut self,
        employee: &NewEmployee,
        links: &EmployeeLinks,
    ) -> Result<i64, sqlx::Error> {
        self.check("employee")?;
        let tables = &self.working;
        if !tables.address_card.contains_key(&links.address_card_id) {
            return Err(fk_violation("address_card", links.address_card_id));
        }
        if !tables.address_house.contains_key(&links.address_house_id) {
            return Err(fk_violation("address_house", links.address_house_id));
        }
        if !tables.attachment.contains_key(&links.attachment_id) {
            return Err(fk_violation("attachment", links.attachment_id));
        }
        if !tables.contact_person1.contains_key(&links.contact_person1_id) {
            return Err(fk_violation("contact_person1", links.contact_person1_id));
        }
        if !tables.contact_person2.contains_key(&links.contact_person2_id) {
            return Err(fk_violation("contact_person2", links.contact_person2_id));
        }
        if !tables.employee_type.contains_key(&employee.employee_type_id) {
            return Err(fk_violation("employee_type", employee.employee_type_id));
        }

        let id = self.working.next_id();
        self.working.employee.insert(
            id,
            EmployeeRow {
                employee: employee.clone(),
                links: links.clone(),
            },
        );
        Ok(id)
    }

    async fn insert_child(&mut self, employee_id: i64, child: &NewChild) -> Result<i64, sqlx::Error> {
        self.check("children")?;
        self.working.require_employee(employee_id)?;
        let id = self.working.next_id();
        self.working.children.insert(id, (employee_id, child.clone()));
        Ok(id)
    }

    async fn insert_sibling(&mut self, employee_id: i64, sibling: &NewSibling) -> Result<i64, sqlx::Error> {
        self.check("siblings")?;
        self.working.require_employee(employee_id)?;
        let id = self.working.next_id();
        self.working.siblings.insert(id, (employee_id, sibling.clone()));
        Ok(id)
    }

    async fn insert_education(
        &mut self,
        employee_id: i64,
        education: &NewEducation,
    ) -> Result<i64, sqlx::Error> {
        self.check("education_history")?;
        self.working.require_employee(employee_id)?;
        let id = self.working.next_id();
        self.working.education_history.insert(id, (employee_id, education.clone()));
        Ok(id)
    }

    async fn insert_work_experience(
        &mut self,
        employee_id: i64,
        work: &NewWorkExperience,
    ) -> Result<i64, sqlx::Error> {
        self.check("work_experience")?;
        self.working.require_employee(employee_id)?;
        let id = self.working.next_id();
        self.working.work_experience.insert(id, (employee_id, work.clone()));
        Ok(id)
    }

    async fn link_attachment(&mut self, attachment_id: i64, reference_id: i64) -> Result<(), sqlx::Error> {
        self.check("attachment")?;
        let row = self
            .working
            .attachment
            .get_mut(&attachment_id)
            .ok_or(sqlx::Error::RowNotFound)?;
        row.reference_id = Some(reference_id);
        Ok(())
    }

    async fn find_employee_type_name(&mut self, employee_type_id: i64) -> Result<Option<String>, sqlx::Error> {
        Ok(self.working.employee_type.get(&employee_type_id).cloned())
    }

    async fn commit(self: Box<Self>) -> Result<(), sqlx::Error> {
        let MemoryEmployeeTx { shared, working, .. } = *self;
        *shared.lock().unwrap() = working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), sqlx::Error> {
        Ok(())
    }
}

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use super::store::{EmployeeStore, EmployeeTx};
use crate::models::attachment::NewAttachment;
use crate::models::employee::{
    Address, AddressKind, ContactPerson, ContactSlot, EmployeeLinks, NewChild, NewEducation,
    NewEmployee, NewSibling, NewWorkExperience,
};

const EMPLOYEE_COLUMNS: &str = "first_name, last_name, nickname, pic_path, mobile_no, birth_date, gender, \
    nationality, religion, marital_status, email_person, line_id, \
    id_card_number, id_card_issued_date, id_card_expiry_date, \
    position, salary, start_date, probation_end_date, status_employee, \
    bank_name, account_number, account_name, \
    father_name, father_birthdate, father_occupation, \
    mother_name, mother_birthdate, mother_occupation, \
    spouse_name, spouse_birthdate, spouse_occupation, \
    total_siblings, order_of_siblings, total_children, total_boys, total_girls, \
    language_speaking, language_reading, language_writing, \
    criminal_record, upcountry_areas, \
    attachment_id, address_card_id, address_house_id, employee_type_id, \
    contact_person1_id, contact_person2_id";

#[derive(Clone)]
pub struct PgEmployeeStore {
    pool: PgPool,
}

impl PgEmployeeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeStore for PgEmployeeStore {
    async fn begin(&self) -> Result<Box<dyn EmployeeTx>, sqlx::Error> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgEmployeeTx { tx }))
    }
}

pub struct PgEmployeeTx {
    tx: Transaction<'static, Postgres>,
}

fn expect_one_row(rows_affected: u64) -> Result<(), sqlx::Error> {
    if rows_affected == 0 {
        return Err(sqlx::Error::RowNotFound);
    }
    Ok(())
}

#[async_trait]
impl EmployeeTx for PgEmployeeTx {
    async fn insert_address(&mut self, kind: AddressKind, address: &Address) -> Result<i64, sqlx::Error> {
        let table = kind.table();
        let sql = format!(
            "INSERT INTO {table} (address, sub_district, district, province, postal_code) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {table}_id"
        );
        sqlx::query_scalar(&sql)
            .bind(&address.address)
            .bind(&address.sub_district)
            .bind(&address.district)
            .bind(&address.province)
            .bind(&address.postal_code)
            .fetch_one(&mut *self.tx)
            .await
    }

    async fn insert_attachment(&mut self, attachment: &NewAttachment<'_>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            INSERT INTO attachment (file_name, file_path, reference_type, create_name, modify_name, create_date, modify_date)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            RETURNING attachment_id
            "#,
        )
        .bind(attachment.file.map(|f| f.file_name.as_str()))
        .bind(attachment.file.map(|f| f.file_path.as_str()))
        .bind(attachment.reference_type)
        .bind(attachment.create_name)
        .bind(attachment.modify_name)
        .fetch_one(&mut *self.tx)
        .await
    }

    async fn set_attachment_file(
        &mut self,
        attachment_id: i64,
        file_name: &str,
        file_path: &str,
    ) -> Result<(), sqlx::Error> {
        let result = sqlx::query(
            "UPDATE attachment SET file_name = $1, file_path = $2, modify_date = NOW() WHERE attachment_id = $3",
        )
        .bind(file_name)
        .bind(file_path)
        .bind(attachment_id)
        .execute(&mut *self.tx)
        .await?;
        expect_one_row(result.rows_affected())
    }

    async fn insert_contact_person(
        &mut self,
        slot: ContactSlot,
        person: &ContactPerson,
    ) -> Result<i64, sqlx::Error> {
        let table = slot.table();
        let sql = format!(
            "INSERT INTO {table} (name, relationship, mobile, address) \
             VALUES ($1, $2, $3, $4) RETURNING {table}_id"
        );
        sqlx::query_scalar(&sql)
            .bind(&person.name)
            .bind(&person.relationship)
            .bind(&person.mobile)
            .bind(&person.address)
            .fetch_one(&mut *self.tx)
            .await
    }

    async fn insert_employee(
        &mut self,
        employee: &NewEmployee,
        links: &EmployeeLinks,
    ) -> Result<i64, sqlx::Error> {
        let mut query: QueryBuilder<'_, Postgres> = QueryBuilder::new("INSERT INTO employee (");
        query.push(EMPLOYEE_COLUMNS);
        query.push(") VALUES (");

        let mut values = query.separated(", ");
        values.push_bind(&employee.first_name);
        values.push_bind(&employee.last_name);
        values.push_bind(&employee.nickname);
        values.push_bind(&links.pic_path);
        values.push_bind(&employee.mobile_no);
        values.push_bind(employee.birth_date);
        values.push_bind(&employee.gender);
        values.push_bind(&employee.nationality);
        values.push_bind(&employee.religion);
        values.push_bind(&employee.marital_status);
        values.push_bind(&employee.email_person);
        values.push_bind(&employee.line_id);
        values.push_bind(&employee.id_card_number);
        values.push_bind(employee.id_card_issued_date);
        values.push_bind(employee.id_card_expiry_date);
        values.push_bind(&employee.position);
        values.push_bind(employee.salary);
        values.push_bind(employee.start_date);
        values.push_bind(employee.probation_end_date);
        values.push_bind(&employee.status_employee);
        values.push_bind(&employee.bank_name);
        values.push_bind(&employee.account_number);
        values.push_bind(&employee.account_name);
        values.push_bind(&employee.father_name);
        values.push_bind(employee.father_birthdate);
        values.push_bind(&employee.father_occupation);
        values.push_bind(&employee.mother_name);
        values.push_bind(employee.mother_birthdate);
        values.push_bind(&employee.mother_occupation);
        values.push_bind(&employee.spouse_name);
        values.push_bind(employee.spouse_birthdate);
        values.push_bind(&employee.spouse_occupation);
        values.push_bind(employee.total_siblings);
        values.push_bind(employee.order_of_siblings);
        values.push_bind(employee.total_children);
        values.push_bind(employee.total_boys);
        values.push_bind(employee.total_girls);
        values.push_bind(&employee.language_speaking);
        values.push_bind(&employee.language_reading);
        values.push_bind(&employee.language_writing);
        values.push_bind(&employee.criminal_record);
        values.push_bind(&employee.upcountry_areas);
        values.push_bind(links.attachment_id);
        values.push_bind(links.address_card_id);
        values.push_bind(links.address_house_id);
        values.push_bind(employee.employee_type_id);
        values.push_bind(links.contact_person1_id);
        values.push_bind(links.contact_person2_id);
        query.push(") RETURNING employee_id");

        query
            .build_query_scalar::<i64>()
            .fetch_one(&mut *self.tx)
            .await
    }

    async fn insert_child(&mut self, employee_id: i64, child: &NewChild) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO children (child_name, child_birthdate, employee_id) VALUES ($1, $2, $3) RETURNING child_id",
        )
        .bind(&child.child_name)
        .bind(child.child_birthdate)
        .bind(employee_id)
        .fetch_one(&mut *self.tx)
        .await
    }

    async fn insert_sibling(&mut self, employee_id: i64, sibling: &NewSibling) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            INSERT INTO siblings (siblings_name, siblings_birthdate, siblings_mobile, siblings_occupation, employee_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING siblings_id
            "#,
        )
        .bind(&sibling.siblings_name)
        .bind(sibling.siblings_birthdate)
        .bind(&sibling.siblings_mobile)
        .bind(&sibling.siblings_occupation)
        .bind(employee_id)
        .fetch_one(&mut *self.tx)
        .await
    }

    async fn insert_education(
        &mut self,
        employee_id: i64,
        education: &NewEducation,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            INSERT INTO education_history (level, field, institution, year, employee_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING education_id
            "#,
        )
        .bind(&education.level)
        .bind(&education.field)
        .bind(&education.institution)
        .bind(education.year)
        .bind(employee_id)
        .fetch_one(&mut *self.tx)
        .await
    }

    async fn insert_work_experience(
        &mut self,
        employee_id: i64,
        work: &NewWorkExperience,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            INSERT INTO work_experience (company, position, from_date, to_date, salary, detail, employee_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING work_experience_id
            "#,
        )
        .bind(&work.company)
        .bind(&work.position)
        .bind(work.from_date)
        .bind(work.to_date)
        .bind(work.salary)
        .bind(&work.detail)
        .bind(employee_id)
        .fetch_one(&mut *self.tx)
        .await
    }

    async fn link_attachment(&mut self, attachment_id: i64, reference_id: i64) -> Result<(), sqlx::Error> {
        let result = sqlx::query("UPDATE attachment SET reference_id = $1 WHERE attachment_id = $2")
            .bind(reference_id)
            .bind(attachment_id)
            .execute(&mut *self.tx)
            .await?;
        expect_one_row(result.rows_affected())
    }

    async fn find_employee_type_name(&mut self, employee_type_id: i64) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT name FROM employee_type WHERE employee_type_id = $1")
            .bind(employee_type_id)
            .fetch_optional(&mut *self.tx)
            .await
    }

    async fn commit(self: Box<Self>) -> Result<(), sqlx::Error> {
        self.tx.commit().await
    }

    async fn rollback(self: Box<Self>) -> Result<(), sqlx::Error> {
        self.tx.rollback().await
    }
}

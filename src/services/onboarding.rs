use log::{error, info};
use serde::Serialize;

use crate::db::{EmployeeStore, EmployeeTx};
use crate::errors::AppError;
use crate::models::attachment::{NewAttachment, StoredFile, UploadedFileRecord, EMPLOYEE_REFERENCE};
use crate::models::employee::{
    AddressKind, ContactSlot, EmployeeLinks, NewChild, NewEducation, NewEmployee, NewSibling,
    NewWorkExperience,
};

#[derive(Debug, Clone, Serialize)]
pub struct InsertedChild {
    pub child_id: i64,
    #[serde(flatten)]
    pub child: NewChild,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsertedSibling {
    pub siblings_id: i64,
    #[serde(flatten)]
    pub sibling: NewSibling,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsertedEducation {
    pub education_id: i64,
    #[serde(flatten)]
    pub education: NewEducation,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsertedWorkExperience {
    pub work_experience_id: i64,
    #[serde(flatten)]
    pub work: NewWorkExperience,
}

/// Every identifier generated by one onboarding, enough to rebuild the
/// persisted graph without querying again.
#[derive(Debug, Clone, Serialize)]
pub struct OnboardingOutcome {
    #[serde(rename = "insertedId")]
    pub employee_id: i64,
    pub address_card_id: i64,
    pub address_house_id: i64,
    pub contact_person1_id: i64,
    pub contact_person2_id: i64,
    pub children_ids: Vec<InsertedChild>,
    pub siblings_ids: Vec<InsertedSibling>,
    pub education_ids: Vec<InsertedEducation>,
    pub work_experience_ids: Vec<InsertedWorkExperience>,
    pub main_attachment_id: i64,
    pub all_attachment_ids: Vec<i64>,
    pub uploaded_files: Vec<UploadedFileRecord>,
    pub employee_type_name: Option<String>,
}

pub async fn onboard_employee(
    store: &dyn EmployeeStore,
    employee: &NewEmployee,
    files: &[StoredFile],
) -> Result<OnboardingOutcome, AppError> {
    let mut tx = store.begin().await.map_err(onboarding_error)?;

    match write_employee(tx.as_mut(), employee, files).await {
        Ok(outcome) => {
            tx.commit().await.map_err(onboarding_error)?;
            info!(
                "Onboarded employee {} ({}) with {} attachment(s)",
                outcome.employee_id,
                employee.full_name(),
                outcome.all_attachment_ids.len()
            );
            Ok(outcome)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                error!("Rollback after failed onboarding also failed: {}", rollback_err);
            }
            error!("Employee onboarding rolled back: {}", err);
            Err(onboarding_error(err))
        }
    }
}

fn onboarding_error(err: sqlx::Error) -> AppError {
    AppError::Onboarding(err.to_string())
}

async fn write_employee(
    tx: &mut dyn EmployeeTx,
    employee: &NewEmployee,
    files: &[StoredFile],
) -> Result<OnboardingOutcome, sqlx::Error> {
    let address_card_id = tx
        .insert_address(AddressKind::Card, &employee.address(AddressKind::Card))
        .await?;
    let address_house_id = tx
        .insert_address(AddressKind::House, &employee.address(AddressKind::House))
        .await?;

    let main_attachment_id = tx
        .insert_attachment(&NewAttachment {
            file: None,
            reference_type: EMPLOYEE_REFERENCE,
            create_name: employee.create_name.as_deref(),
            modify_name: employee.modify_name.as_deref(),
        })
        .await?;

    // First file fills the placeholder, the rest get their own rows.
    let mut all_attachment_ids = vec![main_attachment_id];
    let mut uploaded_files = Vec::with_capacity(files.len());
    for (index, file) in files.iter().enumerate() {
        let attachment_id = if index == 0 {
            tx.set_attachment_file(main_attachment_id, &file.file_name, &file.file_path)
                .await?;
            main_attachment_id
        } else {
            let id = tx
                .insert_attachment(&NewAttachment {
                    file: Some(file),
                    reference_type: EMPLOYEE_REFERENCE,
                    create_name: employee.create_name.as_deref(),
                    modify_name: employee.modify_name.as_deref(),
                })
                .await?;
            all_attachment_ids.push(id);
            id
        };
        uploaded_files.push(UploadedFileRecord {
            attachment_id,
            file_name: file.file_name.clone(),
            file_path: file.file_path.clone(),
        });
    }

    let contact_person1_id = tx
        .insert_contact_person(ContactSlot::First, &employee.contact_person(ContactSlot::First))
        .await?;
    let contact_person2_id = tx
        .insert_contact_person(ContactSlot::Second, &employee.contact_person(ContactSlot::Second))
        .await?;

    let links = EmployeeLinks {
        pic_path: files.first().map(|f| f.file_path.clone()),
        attachment_id: main_attachment_id,
        address_card_id,
        address_house_id,
        contact_person1_id,
        contact_person2_id,
    };
    let employee_id = tx.insert_employee(employee, &links).await?;

    let mut children_ids = Vec::new();
    for child in employee.children_data.iter().filter_map(|entry| entry.accept()) {
        let child_id = tx.insert_child(employee_id, &child).await?;
        children_ids.push(InsertedChild { child_id, child });
    }

    let mut siblings_ids = Vec::new();
    for sibling in employee.siblings_data.iter().filter_map(|entry| entry.accept()) {
        let siblings_id = tx.insert_sibling(employee_id, &sibling).await?;
        siblings_ids.push(InsertedSibling { siblings_id, sibling });
    }

    let mut education_ids = Vec::new();
    for education in employee.education_history_data.iter().filter_map(|entry| entry.accept()) {
        let education_id = tx.insert_education(employee_id, &education).await?;
        education_ids.push(InsertedEducation { education_id, education });
    }

    let mut work_experience_ids = Vec::new();
    for work in employee.work_experience_data.iter().filter_map(|entry| entry.accept()) {
        let work_experience_id = tx.insert_work_experience(employee_id, &work).await?;
        work_experience_ids.push(InsertedWorkExperience { work_experience_id, work });
    }

    for attachment_id in &all_attachment_ids {
        tx.link_attachment(*attachment_id, employee_id).await?;
    }

    // Read-only: the type's own label is left untouched.
    let employee_type_name = tx.find_employee_type_name(employee.employee_type_id).await?;

    Ok(OnboardingOutcome {
        employee_id,
        address_card_id,
        address_house_id,
        contact_person1_id,
        contact_person2_id,
        children_ids,
        siblings_ids,
        education_ids,
        work_experience_ids,
        main_attachment_id,
        all_attachment_ids,
        uploaded_files,
        employee_type_name,
    })
}

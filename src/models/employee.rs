use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::lenient;

/// Field names whose multipart values are JSON-encoded arrays.
pub const LIST_FIELDS: [&str; 4] = [
    "children_data",
    "siblings_data",
    "education_history_data",
    "work_experience_data",
];

fn default_status() -> String {
    "ACTIVE".to_string()
}

/// Full onboarding payload. Every accepted field is listed; anything else is rejected.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct NewEmployee {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    pub nickname: Option<String>,
    pub mobile_no: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub religion: Option<String>,
    pub marital_status: Option<String>,
    #[validate(email)]
    pub email_person: Option<String>,
    pub line_id: Option<String>,

    pub id_card_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub id_card_issued_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub id_card_expiry_date: Option<NaiveDate>,

    pub position: Option<String>,
    #[validate(range(min = 0.0))]
    #[serde(default, deserialize_with = "lenient::optional")]
    pub salary: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub probation_end_date: Option<NaiveDate>,
    #[serde(default = "default_status")]
    pub status_employee: String,

    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub account_name: Option<String>,

    pub father_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub father_birthdate: Option<NaiveDate>,
    pub father_occupation: Option<String>,
    pub mother_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub mother_birthdate: Option<NaiveDate>,
    pub mother_occupation: Option<String>,
    pub spouse_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub spouse_birthdate: Option<NaiveDate>,
    pub spouse_occupation: Option<String>,

    #[validate(range(min = 0))]
    #[serde(default, deserialize_with = "lenient::optional")]
    pub total_siblings: Option<i32>,
    #[validate(range(min = 0))]
    #[serde(default, deserialize_with = "lenient::optional")]
    pub order_of_siblings: Option<i32>,
    #[validate(range(min = 0))]
    #[serde(default, deserialize_with = "lenient::optional")]
    pub total_children: Option<i32>,
    #[validate(range(min = 0))]
    #[serde(default, deserialize_with = "lenient::optional")]
    pub total_boys: Option<i32>,
    #[validate(range(min = 0))]
    #[serde(default, deserialize_with = "lenient::optional")]
    pub total_girls: Option<i32>,

    pub language_speaking: Option<String>,
    pub language_reading: Option<String>,
    pub language_writing: Option<String>,
    pub criminal_record: Option<String>,
    pub upcountry_areas: Option<String>,

    pub create_name: Option<String>,
    pub modify_name: Option<String>,

    pub address_card_address: Option<String>,
    pub address_card_sub_district: Option<String>,
    pub address_card_district: Option<String>,
    pub address_card_province: Option<String>,
    pub address_card_postal_code: Option<String>,

    pub address_house_address: Option<String>,
    pub address_house_sub_district: Option<String>,
    pub address_house_district: Option<String>,
    pub address_house_province: Option<String>,
    pub address_house_postal_code: Option<String>,

    #[serde(deserialize_with = "lenient::required")]
    pub employee_type_id: i64,

    pub contact_person1_name: Option<String>,
    pub contact_person1_relationship: Option<String>,
    pub contact_person1_mobile: Option<String>,
    pub contact_person1_address: Option<String>,

    pub contact_person2_name: Option<String>,
    pub contact_person2_relationship: Option<String>,
    pub contact_person2_mobile: Option<String>,
    pub contact_person2_address: Option<String>,

    #[serde(default)]
    pub children_data: Vec<ChildEntry>,
    #[serde(default)]
    pub siblings_data: Vec<SiblingEntry>,
    #[serde(default)]
    pub education_history_data: Vec<EducationEntry>,
    #[serde(default)]
    pub work_experience_data: Vec<WorkExperienceEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    Card,
    House,
}

impl AddressKind {
    pub fn table(self) -> &'static str {
        match self {
            AddressKind::Card => "address_card",
            AddressKind::House => "address_house",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactSlot {
    First,
    Second,
}

impl ContactSlot {
    pub fn table(self) -> &'static str {
        match self {
            ContactSlot::First => "contact_person1",
            ContactSlot::Second => "contact_person2",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    pub address: Option<String>,
    pub sub_district: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactPerson {
    pub name: Option<String>,
    pub relationship: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
}

impl NewEmployee {
    pub fn address(&self, kind: AddressKind) -> Address {
        match kind {
            AddressKind::Card => Address {
                address: self.address_card_address.clone(),
                sub_district: self.address_card_sub_district.clone(),
                district: self.address_card_district.clone(),
                province: self.address_card_province.clone(),
                postal_code: self.address_card_postal_code.clone(),
            },
            AddressKind::House => Address {
                address: self.address_house_address.clone(),
                sub_district: self.address_house_sub_district.clone(),
                district: self.address_house_district.clone(),
                province: self.address_house_province.clone(),
                postal_code: self.address_house_postal_code.clone(),
            },
        }
    }

    pub fn contact_person(&self, slot: ContactSlot) -> ContactPerson {
        match slot {
            ContactSlot::First => ContactPerson {
                name: self.contact_person1_name.clone(),
                relationship: self.contact_person1_relationship.clone(),
                mobile: self.contact_person1_mobile.clone(),
                address: self.contact_person1_address.clone(),
            },
            ContactSlot::Second => ContactPerson {
                name: self.contact_person2_name.clone(),
                relationship: self.contact_person2_relationship.clone(),
                mobile: self.contact_person2_mobile.clone(),
                address: self.contact_person2_address.clone(),
            },
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Foreign keys and derived columns written alongside the employee's own fields.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeLinks {
    pub pic_path: Option<String>,
    pub attachment_id: i64,
    pub address_card_id: i64,
    pub address_house_id: i64,
    pub contact_person1_id: i64,
    pub contact_person2_id: i64,
}

fn present(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChildEntry {
    pub child_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub child_birthdate: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewChild {
    pub child_name: String,
    pub child_birthdate: NaiveDate,
}

impl ChildEntry {
    pub fn accept(&self) -> Option<NewChild> {
        Some(NewChild {
            child_name: present(&self.child_name)?,
            child_birthdate: self.child_birthdate?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiblingEntry {
    pub siblings_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub siblings_birthdate: Option<NaiveDate>,
    pub siblings_mobile: Option<String>,
    pub siblings_occupation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSibling {
    pub siblings_name: String,
    pub siblings_birthdate: Option<NaiveDate>,
    pub siblings_mobile: Option<String>,
    pub siblings_occupation: Option<String>,
}

impl SiblingEntry {
    pub fn accept(&self) -> Option<NewSibling> {
        Some(NewSibling {
            siblings_name: present(&self.siblings_name)?,
            siblings_birthdate: self.siblings_birthdate,
            siblings_mobile: self.siblings_mobile.clone(),
            siblings_occupation: self.siblings_occupation.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EducationEntry {
    pub level: Option<String>,
    pub field: Option<String>,
    pub institution: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEducation {
    pub level: String,
    pub field: Option<String>,
    pub institution: Option<String>,
    pub year: Option<i32>,
}

impl EducationEntry {
    pub fn accept(&self) -> Option<NewEducation> {
        Some(NewEducation {
            level: present(&self.level)?,
            field: self.field.clone(),
            institution: self.institution.clone(),
            year: self.year,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkExperienceEntry {
    pub company: Option<String>,
    pub position: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub from_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub to_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub salary: Option<f64>,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewWorkExperience {
    pub company: String,
    pub position: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub salary: Option<f64>,
    pub detail: Option<String>,
}

impl WorkExperienceEntry {
    pub fn accept(&self) -> Option<NewWorkExperience> {
        Some(NewWorkExperience {
            company: present(&self.company)?,
            position: self.position.clone(),
            from_date: self.from_date,
            to_date: self.to_date,
            salary: self.salary,
            detail: self.detail.clone(),
        })
    }
}

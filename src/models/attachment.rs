use serde::Serialize;

/// `reference_type` written on every attachment created by onboarding.
pub const EMPLOYEE_REFERENCE: &str = "employee";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredFile {
    pub file_name: String,
    pub file_path: String,
}

#[derive(Debug, Clone)]
pub struct NewAttachment<'a> {
    pub file: Option<&'a StoredFile>,
    pub reference_type: &'static str,
    pub create_name: Option<&'a str>,
    pub modify_name: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedFileRecord {
    pub attachment_id: i64,
    pub file_name: String,
    pub file_path: String,
}

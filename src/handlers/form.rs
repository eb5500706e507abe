use actix_multipart::{Field, Multipart};
use futures_util::StreamExt;
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::errors::AppError;
use crate::models::employee::{NewEmployee, LIST_FIELDS};
use crate::utils::uploads::{StagedFile, UploadStore};
use crate::utils::validation::validate_payload;

/// Multipart part name carrying attachment files.
pub const FILE_FIELD: &str = "file_name";

const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

pub struct EmployeeForm {
    pub employee: NewEmployee,
    pub files: Vec<StagedFile>,
}

/// Reads the onboarding form. Files are staged as they arrive and discarded
/// if anything about the form is rejected.
pub async fn read_employee_form(payload: Multipart, uploads: &UploadStore) -> Result<EmployeeForm, AppError> {
    let mut files = Vec::new();
    match read_parts(payload, uploads, &mut files).await.and_then(parse_employee) {
        Ok(employee) => Ok(EmployeeForm { employee, files }),
        Err(err) => {
            uploads.discard_all(files);
            Err(err)
        }
    }
}

async fn read_parts(
    mut payload: Multipart,
    uploads: &UploadStore,
    files: &mut Vec<StagedFile>,
) -> Result<Map<String, Value>, AppError> {
    let limits = uploads.limits();
    let mut fields = Map::new();
    let mut seen = HashSet::new();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|err| AppError::BadRequest(format!("Malformed multipart body: {}", err)))?;
        let name = field.name().to_string();

        if name == FILE_FIELD {
            if files.len() >= limits.max_files {
                return Err(AppError::BadRequest(format!(
                    "Too many files: at most {} are accepted",
                    limits.max_files
                )));
            }
            let original_name = field.content_disposition().get_filename().map(str::to_string);
            let bytes = read_field(&mut field, &name, limits.max_file_bytes).await?;
            files.push(uploads.stage(original_name.as_deref(), &bytes).await?);
            continue;
        }

        if !seen.insert(name.clone()) {
            return Err(AppError::BadRequest(format!("Field `{}` was sent more than once", name)));
        }
        let bytes = read_field(&mut field, &name, MAX_TEXT_FIELD_BYTES).await?;
        let text = String::from_utf8(bytes)
            .map_err(|_| AppError::BadRequest(format!("Field `{}` is not valid UTF-8", name)))?;
        if let Some(value) = text_value(&name, text)? {
            fields.insert(name, value);
        }
    }

    Ok(fields)
}

async fn read_field(field: &mut Field, name: &str, limit: usize) -> Result<Vec<u8>, AppError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|err| AppError::BadRequest(format!("Malformed field `{}`: {}", name, err)))?;
        if bytes.len() + chunk.len() > limit {
            return Err(AppError::PayloadTooLarge(format!("Field `{}` exceeds {} bytes", name, limit)));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// Empty text means "not provided". List fields carry JSON arrays.
fn text_value(name: &str, text: String) -> Result<Option<Value>, AppError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    if LIST_FIELDS.contains(&name) {
        let value: Value = serde_json::from_str(&text)
            .map_err(|err| AppError::BadRequest(format!("Field `{}` must be a JSON array: {}", name, err)))?;
        if !value.is_array() {
            return Err(AppError::BadRequest(format!("Field `{}` must be a JSON array", name)));
        }
        return Ok(Some(value));
    }
    Ok(Some(Value::String(text)))
}

fn parse_employee(fields: Map<String, Value>) -> Result<NewEmployee, AppError> {
    let employee: NewEmployee = serde_json::from_value(Value::Object(fields))
        .map_err(|err| AppError::BadRequest(format!("Invalid employee payload: {}", err)))?;
    validate_payload(&employee)?;
    Ok(employee)
}

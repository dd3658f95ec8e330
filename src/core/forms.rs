use crate::core::records::{insert_row, row_id};
use crate::domain::model::{ApplicationDocument, JobApplication, Review};
use crate::domain::ports::{Database, Storage};
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{
    normalize_phone, validate_email, validate_file_extension, validate_max_length,
    validate_min_length, validate_non_empty_string, validate_phone, validate_range,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const DOCUMENT_EXTENSIONS: [&str; 4] = ["pdf", "jpg", "jpeg", "png"];
const DOCUMENT_TYPES: [&str; 5] = [
    "identity",
    "proof_of_address",
    "criminal_record",
    "diploma",
    "resume",
];
const MAX_DOCUMENT_BYTES: usize = 5 * 1024 * 1024;
const MIN_MOTIVATION_CHARS: usize = 20;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DocumentUploadRequest {
    pub application_id: String,
    pub document_type: String,
    pub file_name: String,
    pub content_base64: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submitted {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentStored {
    pub id: String,
    pub storage_path: String,
    pub size: usize,
}

pub struct FormService {
    database: Arc<dyn Database>,
    storage: Arc<dyn Storage>,
}

impl FormService {
    pub fn new(database: Arc<dyn Database>, storage: Arc<dyn Storage>) -> Self {
        Self { database, storage }
    }

    pub async fn submit_job_application(&self, mut application: JobApplication) -> Result<Submitted> {
        validate_non_empty_string("first_name", &application.first_name)?;
        validate_non_empty_string("last_name", &application.last_name)?;
        validate_email("email", &application.email)?;
        validate_phone("phone", &application.phone)?;
        validate_non_empty_string("city", &application.city)?;
        validate_range("experience_years", application.experience_years, 0, 60)?;
        validate_min_length("motivation", &application.motivation, MIN_MOTIVATION_CHARS)?;
        validate_max_length("motivation", &application.motivation, 2000)?;

        application.email = application.email.trim().to_lowercase();
        application.phone = normalize_phone(&application.phone);

        let mut row = serde_json::to_value(&application)?;
        row["status"] = serde_json::Value::String("pending".to_string());
        let inserted = self.database.insert("job_applications", row).await?;
        let id = row_id(&inserted)?;

        tracing::info!(
            "📨 Job application {} received for {}",
            id,
            application.category.as_str()
        );
        Ok(Submitted { id })
    }

    pub async fn upload_application_document(&self, request: DocumentUploadRequest) -> Result<DocumentStored> {
        validate_non_empty_string("application_id", &request.application_id)?;
        if !DOCUMENT_TYPES.contains(&request.document_type.as_str()) {
            return Err(AppError::validation(
                "document_type",
                format!(
                    "Unknown document type. Expected one of: {}",
                    DOCUMENT_TYPES.join(", ")
                ),
            ));
        }
        let extension = validate_file_extension("file_name", &request.file_name, &DOCUMENT_EXTENSIONS)?;

        let content = STANDARD.decode(request.content_base64.trim())?;
        if content.is_empty() {
            return Err(AppError::validation("content_base64", "The file is empty"));
        }
        if content.len() > MAX_DOCUMENT_BYTES {
            return Err(AppError::validation("content_base64", "The file exceeds 5 MB"));
        }

        let storage_path = format!(
            "applications/{}/{}.{}",
            request.application_id, request.document_type, extension
        );
        self.storage.write_file(&storage_path, &content).await?;
        tracing::debug!("Stored {} ({} bytes)", storage_path, content.len());

        let document = ApplicationDocument {
            application_id: request.application_id,
            document_type: request.document_type,
            storage_path: storage_path.clone(),
        };
        let inserted = insert_row(self.database.as_ref(), "application_documents", &document).await?;

        Ok(DocumentStored {
            id: row_id(&inserted)?,
            storage_path,
            size: content.len(),
        })
    }

    pub async fn submit_review(&self, review: Review) -> Result<Submitted> {
        validate_non_empty_string("booking_id", &review.booking_id)?;
        validate_non_empty_string("client_id", &review.client_id)?;
        validate_non_empty_string("provider_id", &review.provider_id)?;
        validate_range("rating", review.rating, 1, 5)?;
        if let Some(comment) = &review.comment {
            validate_max_length("comment", comment, 1000)?;
        }

        let inserted = insert_row(self.database.as_ref(), "reviews", &review).await?;
        Ok(Submitted {
            id: row_id(&inserted)?,
        })
    }
}

use serde::{Deserialize, Serialize};

use super::template::DOCX_MIME;
use crate::workflows::careers::{StoreError, ValidationError};

/// Uploaded template as listed by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDocument {
    #[serde(rename = "fileId")]
    pub file_id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: String,
}

/// Binary content of a template together with its declared content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateBinary {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// New template submitted for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateUpload {
    pub content: Vec<u8>,
    pub name: String,
    pub description: String,
}

impl TemplateUpload {
    /// File, name and description are all required.
    pub fn validate(self) -> Result<Self, ValidationError> {
        if self.content.is_empty() {
            return Err(ValidationError::MissingSelection("file"));
        }
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyField {
                field: "template name",
            });
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyField {
                field: "template description",
            });
        }

        Ok(Self {
            name: name.to_string(),
            description: description.to_string(),
            content: self.content,
        })
    }
}

/// Remote catalog of uploaded templates.
pub trait TemplateCatalog: Send + Sync {
    /// Stores a template and returns the store's confirmation text.
    fn upload(&self, upload: TemplateUpload) -> Result<String, StoreError>;
    fn list(&self) -> Result<Vec<TemplateDocument>, StoreError>;
    fn download(&self, file_id: &str) -> Result<TemplateBinary, StoreError>;
}

/// How a downloaded template can be shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplatePreview {
    Inline,
    /// Word documents cannot be previewed; they must be downloaded.
    DownloadOnly,
}

impl TemplatePreview {
    pub fn classify(name: &str, content_type: &str) -> Self {
        let name = name.to_ascii_lowercase();
        if content_type.contains("pdf") || name.ends_with(".pdf") {
            return Self::Inline;
        }
        if name.ends_with(".doc")
            || name.ends_with(".docx")
            || content_type.contains("word")
            || content_type.contains("document")
        {
            return Self::DownloadOnly;
        }
        Self::Inline
    }
}

/// File name offered when saving a template; adds an extension derived from
/// the content type when the stored name has none.
pub fn download_file_name(name: &str, content_type: &str) -> String {
    let name = if name.trim().is_empty() {
        "documento"
    } else {
        name.trim()
    };
    if name.contains('.') {
        return name.to_string();
    }

    let extension = if content_type.contains("pdf") {
        "pdf"
    } else if content_type == "application/msword" {
        "doc"
    } else {
        "docx"
    };
    format!("{name}.{extension}")
}

/// Content type to record for an uploaded file name.
pub fn guess_content_type(name: &str) -> String {
    if name.to_ascii_lowercase().ends_with(".docx") {
        return DOCX_MIME.to_string();
    }
    mime_guess::from_path(name)
        .first()
        .unwrap_or(mime::APPLICATION_OCTET_STREAM)
        .essence_str()
        .to_string()
}

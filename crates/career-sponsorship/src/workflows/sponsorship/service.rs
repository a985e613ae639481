use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::catalog::{TemplateCatalog, TemplateDocument};
use super::code::{CodeError, CodePeriod, SponsorshipCode, SponsorshipCodeGenerator};
use super::template::{DocumentTemplateEngine, TemplateError, DOCX_MIME};
use crate::workflows::careers::{Career, StoreError, Teacher, Training, ValidationError};

/// Everything the user picked before asking for a sponsorship document.
#[derive(Debug, Clone, Default)]
pub struct SponsorshipSelection {
    pub teacher: Option<Teacher>,
    pub career: Option<Career>,
    pub training: Option<Training>,
    pub template: Option<TemplateDocument>,
    /// Defaults to the current month when absent.
    pub period: Option<CodePeriod>,
}

/// Generated document ready to be offered for download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SponsorshipArtifact {
    pub code: SponsorshipCode,
    pub file_name: String,
    pub mime_type: &'static str,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum SponsorshipError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Code(#[from] CodeError),
    #[error("failed to download the selected template: {0}")]
    Catalog(#[from] StoreError),
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Fills the selected template with teacher, career and training data.
pub struct SponsorshipService<K> {
    catalog: Arc<K>,
    codes: SponsorshipCodeGenerator,
    engine: DocumentTemplateEngine,
}

impl<K> SponsorshipService<K>
where
    K: TemplateCatalog + 'static,
{
    pub fn new(catalog: Arc<K>, codes: SponsorshipCodeGenerator) -> Self {
        Self::with_engine(catalog, codes, DocumentTemplateEngine::sponsorship())
    }

    pub fn with_engine(
        catalog: Arc<K>,
        codes: SponsorshipCodeGenerator,
        engine: DocumentTemplateEngine,
    ) -> Self {
        Self {
            catalog,
            codes,
            engine,
        }
    }

    pub fn engine(&self) -> &DocumentTemplateEngine {
        &self.engine
    }

    /// Code the teacher would receive, without touching any template.
    pub fn preview_code(
        &self,
        teacher: &Teacher,
        period: Option<CodePeriod>,
    ) -> Result<SponsorshipCode, CodeError> {
        self.codes
            .generate(teacher.sequence, period.unwrap_or_else(CodePeriod::current))
    }

    pub fn generate(
        &self,
        selection: SponsorshipSelection,
    ) -> Result<SponsorshipArtifact, SponsorshipError> {
        let SponsorshipSelection {
            teacher,
            career,
            training,
            template,
            period,
        } = selection;
        let teacher = teacher.ok_or(ValidationError::MissingSelection("teacher"))?;
        let career = career.ok_or(ValidationError::MissingSelection("career"))?;
        let training = training.ok_or(ValidationError::MissingSelection("training"))?;
        let template = template.ok_or(ValidationError::MissingSelection("template"))?;

        let code = self.preview_code(&teacher, period)?;
        let fields = sponsorship_fields(&teacher, &career, &training, &code);

        let binary = self.catalog.download(&template.file_id).map_err(|err| {
            warn!(template = %template.file_id, error = %err, "template download failed");
            err
        })?;
        let bytes = self.engine.render(&binary.bytes, &fields).map_err(|err| {
            warn!(template = %template.name, error = %err, "sponsorship document rejected");
            err
        })?;
        drop(binary);

        info!(
            code = %code,
            teacher = %teacher.name,
            template = %template.name,
            "sponsorship document generated"
        );
        Ok(SponsorshipArtifact {
            file_name: format!("{}-{}.docx", code, teacher.name),
            code,
            mime_type: DOCX_MIME,
            bytes,
        })
    }
}

/// Values bound to the sponsorship placeholders.
pub fn sponsorship_fields(
    teacher: &Teacher,
    career: &Career,
    training: &Training,
    code: &SponsorshipCode,
) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("NombresC".to_string(), teacher.name.clone()),
        ("Cedula1".to_string(), teacher.cedula.clone()),
        ("Carrera1".to_string(), career.name.clone()),
        ("NombreCA".to_string(), training.name().to_string()),
        ("Codigo".to_string(), code.to_string()),
    ])
}

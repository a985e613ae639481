//! Sponsorship documents: codes, the template catalog and the `.docx` engine
//! that fills uploaded Word templates.

pub mod catalog;
pub mod code;
pub mod router;
pub mod service;
pub mod template;

#[cfg(test)]
mod tests;

pub use catalog::{
    download_file_name, guess_content_type, TemplateBinary, TemplateCatalog, TemplateDocument,
    TemplatePreview, TemplateUpload,
};
pub use code::{
    CodeError, CodePeriod, SponsorshipCode, SponsorshipCodeGenerator, DEFAULT_CODE_PREFIX,
    DEFAULT_PROGRAM_TOKEN,
};
pub use router::sponsorship_router;
pub use service::{
    sponsorship_fields, SponsorshipArtifact, SponsorshipError, SponsorshipSelection,
    SponsorshipService,
};
pub use template::{DocumentTemplateEngine, TemplateError, DOCX_MIME, SPONSORSHIP_PLACEHOLDERS};

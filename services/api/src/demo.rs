use crate::infra::{InMemoryCareerStore, InMemoryTeacherStore, InMemoryTemplateCatalog};
use career_sponsorship::config::AppConfig;
use career_sponsorship::error::AppError;
use career_sponsorship::workflows::careers::{
    CareerDraftBuilder, TeacherInput, TeacherRegistry, TrainingInput, TrainingRegistry,
};
use career_sponsorship::workflows::sponsorship::{
    CodePeriod, SponsorshipSelection, SponsorshipService, TemplateCatalog, TemplateUpload,
};
use career_sponsorship::workflows::Notice;
use clap::Args;
use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::sync::Arc;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Word template to fill. A built-in sample is used when omitted.
    #[arg(long)]
    pub(crate) template: Option<PathBuf>,
    /// Directory the generated document is written to.
    #[arg(long, default_value = ".")]
    pub(crate) output: PathBuf,
    /// Teacher name printed on the sponsorship letter.
    #[arg(long, default_value = "Ana Pérez")]
    pub(crate) teacher: String,
    /// Teacher national id (10 digits).
    #[arg(long, default_value = "0102030405")]
    pub(crate) cedula: String,
}

const SAMPLE_LINES: [&str; 5] = [
    "Código: {Codigo}",
    "Por medio de la presente se patrocina a {NombresC}, cédula {Cedula1},",
    "docente de la carrera {Carrera1},",
    "para la capacitación {NombreCA}.",
    "Atentamente, Coordinación Académica",
];

/// Minimal Word package carrying every sponsorship placeholder.
pub(crate) fn sample_template() -> Result<Vec<u8>, zip::result::ZipError> {
    let paragraphs: String = SAMPLE_LINES
        .iter()
        .map(|line| format!("<w:p><w:r><w:t xml:space=\"preserve\">{line}</w:t></w:r></w:p>"))
        .collect();
    let document = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{paragraphs}</w:body></w:document>"
    );
    let content_types = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
        <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
        <Override PartName=\"/word/document.xml\" \
        ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>\
        </Types>";

    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer.start_file("[Content_Types].xml", options)?;
    writer.write_all(content_types.as_bytes())?;
    writer.start_file("word/document.xml", options)?;
    writer.write_all(document.as_bytes())?;
    Ok(writer.finish()?.into_inner())
}

fn training(name: &str, hours: i64, duration: &str) -> TrainingInput {
    TrainingInput {
        name: name.to_string(),
        hours,
        duration: duration.to_string(),
        period: "2025-1".to_string(),
        kind: "Técnico".to_string(),
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        template,
        output,
        teacher,
        cedula,
    } = args;
    let config = AppConfig::load()?;

    let careers = Arc::new(InMemoryCareerStore::default());
    let teachers = Arc::new(InMemoryTeacherStore::default());
    let catalog = Arc::new(InMemoryTemplateCatalog::default());

    println!("Career sponsorship demo");
    let mut builder = CareerDraftBuilder::new(careers.clone());
    builder.create("Software")?;
    builder.add_training(&training("Java Básico", 40, "3 meses"))?;
    if let Err(err) = builder.add_training(&training("Taller de Git", 20, "1 semana")) {
        let notice = Notice::from(&err);
        println!("- {}: {}", notice.title, notice.message);
    }
    let career = builder.commit()?.clone();
    println!(
        "- Saved career {} with {} training(s)",
        career.name,
        career.trainings.len()
    );

    let mut registry = TrainingRegistry::new(careers);
    let career = match registry.add_training_to_existing(&career, &training("Docker", 45, "2 meses"))
    {
        Ok(listed) => listed
            .iter()
            .find(|listed| listed.id == career.id)
            .cloned()
            .unwrap_or(career),
        Err(err) => {
            println!("  Training not added: {err}");
            return Ok(());
        }
    };
    for training in &career.trainings {
        println!(
            "  - {} ({} h, {}, {})",
            training.name(),
            training.hours(),
            training.duration(),
            training.kind()
        );
    }

    let teacher = match TeacherRegistry::new(teachers).create(
        &career,
        &TeacherInput {
            name: teacher,
            cedula,
            ..TeacherInput::default()
        },
    ) {
        Ok(teacher) => teacher,
        Err(err) => {
            let notice = Notice::from(&err);
            println!("  {}: {}", notice.title, notice.message);
            return Ok(());
        }
    };
    println!(
        "- Registered teacher {} (sequence {})",
        teacher.name,
        teacher.sequence.unwrap_or_default()
    );

    let (name, content) = match template {
        Some(path) => {
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "plantilla.docx".to_string());
            (name, std::fs::read(&path)?)
        }
        None => (
            "patrocinio-ejemplo.docx".to_string(),
            sample_template().map_err(std::io::Error::from)?,
        ),
    };
    let upload = TemplateUpload {
        content,
        name,
        description: "Carta de patrocinio".to_string(),
    };
    let message = match upload.validate().map_err(|err| err.to_string()) {
        Ok(upload) => catalog.upload(upload).map_err(|err| err.user_message()),
        Err(reason) => Err(reason),
    };
    match message {
        Ok(message) => println!("- {message}"),
        Err(reason) => {
            println!("  Template rejected: {reason}");
            return Ok(());
        }
    }
    let template = catalog.list().map_err(|err| {
        std::io::Error::other(format!("template catalog unavailable: {err}"))
    })?;

    let service = SponsorshipService::new(catalog, config.sponsorship.code_generator());
    let artifact = service.generate(SponsorshipSelection {
        training: career.trainings.first().cloned(),
        career: Some(career),
        teacher: Some(teacher),
        template: template.into_iter().next(),
        period: Some(CodePeriod::current()),
    })?;

    std::fs::create_dir_all(&output)?;
    let path = output.join(&artifact.file_name);
    std::fs::write(&path, &artifact.bytes)?;
    println!("- Sponsorship code {}", artifact.code);
    println!("- Wrote {} ({})", path.display(), artifact.mime_type);

    Ok(())
}

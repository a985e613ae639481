use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::workflows::careers::{
    validate_training, Career, CareerId, CareerStore, StoreError, Teacher, TeacherId,
    TeacherStore, Training, TrainingInput,
};
use crate::workflows::sponsorship::{
    guess_content_type, TemplateBinary, TemplateCatalog, TemplateDocument, TemplateUpload,
};

pub(super) const LOGO_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot really an image";

pub(super) fn paragraph(runs: &[&str]) -> String {
    let runs: String = runs
        .iter()
        .map(|text| format!("<w:r><w:rPr><w:b/></w:rPr><w:t>{text}</w:t></w:r>"))
        .collect();
    format!("<w:p>{runs}</w:p>")
}

pub(super) fn document_xml(paragraphs: &[String]) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{}</w:body></w:document>",
        paragraphs.concat()
    )
}

/// Builds a package with the given parts plus a content-types entry and an
/// image that no substitution may touch.
pub(super) fn docx(parts: &[(&str, String)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let deflated = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let stored = FileOptions::default().compression_method(CompressionMethod::Stored);

    writer
        .start_file("[Content_Types].xml", deflated)
        .expect("content types entry");
    writer
        .write_all(b"<?xml version=\"1.0\"?><Types/>")
        .expect("content types");
    for (name, xml) in parts {
        writer.start_file(*name, deflated).expect("part entry");
        writer.write_all(xml.as_bytes()).expect("part body");
    }
    writer
        .start_file("word/media/image1.png", stored)
        .expect("media entry");
    writer.write_all(LOGO_BYTES).expect("media body");

    writer.finish().expect("finish package").into_inner()
}

/// Template carrying every sponsorship placeholder, two of them split over
/// several runs the way Word saves edited text.
pub(super) fn sponsorship_template() -> Vec<u8> {
    let body = document_xml(&[
        paragraph(&["Docente: {Nom", "bresC}"]),
        paragraph(&["Cédula: {Cedula1}"]),
        paragraph(&["Carrera: {Carrera1}"]),
        paragraph(&["Capacitación: {", "NombreCA", "} aprobada"]),
        paragraph(&["Código: {Codigo}"]),
    ]);
    let header = format!(
        "<w:hdr xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">{}</w:hdr>",
        paragraph(&["Ref. {Codigo}"])
    );
    docx(&[("word/document.xml", body), ("word/header1.xml", header)])
}

pub(super) fn read_entry(package: &[u8], name: &str) -> Vec<u8> {
    let mut archive = ZipArchive::new(Cursor::new(package)).expect("readable package");
    let mut file = archive.by_name(name).expect("entry present");
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).expect("entry bytes");
    bytes
}

pub(super) fn read_part(package: &[u8], name: &str) -> String {
    String::from_utf8(read_entry(package, name)).expect("utf-8 part")
}

pub(super) fn entry_names(package: &[u8]) -> Vec<String> {
    let mut archive = ZipArchive::new(Cursor::new(package)).expect("readable package");
    (0..archive.len())
        .map(|index| {
            archive
                .by_index_raw(index)
                .map(|entry| entry.name().to_string())
                .expect("entry present")
        })
        .collect()
}

pub(super) fn sponsorship_fields() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("NombresC".to_string(), "Ana Pérez".to_string()),
        ("Cedula1".to_string(), "0102030405".to_string()),
        ("Carrera1".to_string(), "Software".to_string()),
        ("NombreCA".to_string(), "Java Básico".to_string()),
        ("Codigo".to_string(), "UGPA-RGI2-07-PRO134-2025-03".to_string()),
    ])
}

pub(super) fn java_basico() -> Training {
    validate_training(&TrainingInput {
        name: "Java Básico".to_string(),
        hours: 40,
        duration: "3 meses".to_string(),
        period: "2025-1".to_string(),
        kind: "Técnico".to_string(),
    })
    .expect("valid training")
}

pub(super) fn software() -> Career {
    Career {
        id: Some(CareerId("car-000001".to_string())),
        name: "Software".to_string(),
        trainings: vec![java_basico()],
    }
}

pub(super) fn ana(sequence: Option<u32>) -> Teacher {
    Teacher {
        id: Some(TeacherId("doc-000001".to_string())),
        career_id: CareerId("car-000001".to_string()),
        name: "Ana Pérez".to_string(),
        cedula: "0102030405".to_string(),
        formation: "Magíster".to_string(),
        program: "Capacitación docente".to_string(),
        status: "Activo".to_string(),
        period: "2025-1".to_string(),
        sequence,
    }
}

/// Catalog double keeping uploads in memory and counting downloads.
#[derive(Default)]
pub(super) struct MemoryCatalog {
    entries: Mutex<Vec<(TemplateDocument, TemplateBinary)>>,
    next_id: AtomicU64,
    downloads: AtomicUsize,
}

impl MemoryCatalog {
    pub(super) fn with_template(name: &str, bytes: Vec<u8>) -> (Arc<Self>, String) {
        let catalog = Arc::new(Self::default());
        let upload = TemplateUpload {
            content: bytes,
            name: name.to_string(),
            description: "Formato oficial".to_string(),
        };
        catalog.upload(upload).expect("seed template");
        let file_id = catalog.list().expect("list")[0].file_id.clone();
        (catalog, file_id)
    }

    pub(super) fn downloads(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

impl TemplateCatalog for MemoryCatalog {
    fn upload(&self, upload: TemplateUpload) -> Result<String, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let document = TemplateDocument {
            file_id: format!("tpl-{id:06}"),
            name: upload.name.clone(),
            description: upload.description,
        };
        let binary = TemplateBinary {
            content_type: guess_content_type(&upload.name),
            bytes: upload.content,
        };
        self.entries
            .lock()
            .expect("catalog mutex poisoned")
            .push((document, binary));
        Ok("Documento subido correctamente".to_string())
    }

    fn list(&self) -> Result<Vec<TemplateDocument>, StoreError> {
        Ok(self
            .entries
            .lock()
            .expect("catalog mutex poisoned")
            .iter()
            .map(|(document, _)| document.clone())
            .collect())
    }

    fn download(&self, file_id: &str) -> Result<TemplateBinary, StoreError> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        self.entries
            .lock()
            .expect("catalog mutex poisoned")
            .iter()
            .find(|(document, _)| document.file_id == file_id)
            .map(|(_, binary)| binary.clone())
            .ok_or(StoreError::NotFound)
    }
}

/// Read-only career store serving a fixed list.
pub(super) struct FixedCareers(pub(super) Vec<Career>);

impl CareerStore for FixedCareers {
    fn create(&self, _career: Career) -> Result<Career, StoreError> {
        Err(StoreError::Unavailable("read only".to_string()))
    }

    fn list(&self) -> Result<Vec<Career>, StoreError> {
        Ok(self.0.clone())
    }

    fn update(&self, _id: &CareerId, _career: Career) -> Result<Career, StoreError> {
        Err(StoreError::Unavailable("read only".to_string()))
    }

    fn delete(&self, _id: &CareerId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("read only".to_string()))
    }
}

/// Read-only teacher store serving a fixed roster.
pub(super) struct FixedTeachers(pub(super) Vec<Teacher>);

impl TeacherStore for FixedTeachers {
    fn create(&self, _teacher: Teacher) -> Result<Teacher, StoreError> {
        Err(StoreError::Unavailable("read only".to_string()))
    }

    fn list(&self) -> Result<Vec<Teacher>, StoreError> {
        Ok(self.0.clone())
    }

    fn list_by_career(&self, career_id: &CareerId) -> Result<Vec<Teacher>, StoreError> {
        Ok(self
            .0
            .iter()
            .filter(|teacher| &teacher.career_id == career_id)
            .cloned()
            .collect())
    }

    fn fetch(&self, id: &TeacherId) -> Result<Option<Teacher>, StoreError> {
        Ok(self
            .0
            .iter()
            .find(|teacher| teacher.id.as_ref() == Some(id))
            .cloned())
    }

    fn update(&self, _id: &TeacherId, _teacher: Teacher) -> Result<Teacher, StoreError> {
        Err(StoreError::Unavailable("read only".to_string()))
    }

    fn delete(&self, _id: &TeacherId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("read only".to_string()))
    }
}

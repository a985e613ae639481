use career_sponsorship::workflows::careers::{
    Career, CareerId, CareerStore, StoreError, Teacher, TeacherId, TeacherStore,
};
use career_sponsorship::workflows::sponsorship::{
    guess_content_type, SponsorshipCodeGenerator, TemplateBinary, TemplateCatalog,
    TemplateDocument, TemplateUpload,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) codes: SponsorshipCodeGenerator,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::Unavailable("in-memory store poisoned".to_string()))
}

/// Process-local career store. Names are unique, matching the remote service.
#[derive(Default)]
pub(crate) struct InMemoryCareerStore {
    careers: Mutex<Vec<Career>>,
    next_id: AtomicU64,
}

impl CareerStore for InMemoryCareerStore {
    fn create(&self, mut career: Career) -> Result<Career, StoreError> {
        let mut guard = lock(&self.careers)?;
        if guard
            .iter()
            .any(|existing| existing.name.eq_ignore_ascii_case(&career.name))
        {
            return Err(StoreError::Duplicate(career.name));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        career.id = Some(CareerId(format!("car-{id:06}")));
        guard.push(career.clone());
        Ok(career)
    }

    fn list(&self) -> Result<Vec<Career>, StoreError> {
        Ok(lock(&self.careers)?.clone())
    }

    fn update(&self, id: &CareerId, career: Career) -> Result<Career, StoreError> {
        let mut guard = lock(&self.careers)?;
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id.as_ref() == Some(id))
            .ok_or(StoreError::NotFound)?;
        *slot = Career {
            id: Some(id.clone()),
            ..career
        };
        Ok(slot.clone())
    }

    fn delete(&self, id: &CareerId) -> Result<(), StoreError> {
        let mut guard = lock(&self.careers)?;
        let before = guard.len();
        guard.retain(|existing| existing.id.as_ref() != Some(id));
        if guard.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

/// Process-local teacher store; allocates ids and sequence numbers.
#[derive(Default)]
pub(crate) struct InMemoryTeacherStore {
    teachers: Mutex<Vec<Teacher>>,
    next_id: AtomicU64,
    next_sequence: AtomicU32,
}

impl TeacherStore for InMemoryTeacherStore {
    fn create(&self, mut teacher: Teacher) -> Result<Teacher, StoreError> {
        let mut guard = lock(&self.teachers)?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        teacher.id = Some(TeacherId(format!("doc-{id:06}")));
        teacher.sequence = Some(self.next_sequence.fetch_add(1, Ordering::SeqCst) + 1);
        guard.push(teacher.clone());
        Ok(teacher)
    }

    fn list(&self) -> Result<Vec<Teacher>, StoreError> {
        Ok(lock(&self.teachers)?.clone())
    }

    fn list_by_career(&self, career_id: &CareerId) -> Result<Vec<Teacher>, StoreError> {
        Ok(lock(&self.teachers)?
            .iter()
            .filter(|teacher| &teacher.career_id == career_id)
            .cloned()
            .collect())
    }

    fn fetch(&self, id: &TeacherId) -> Result<Option<Teacher>, StoreError> {
        Ok(lock(&self.teachers)?
            .iter()
            .find(|teacher| teacher.id.as_ref() == Some(id))
            .cloned())
    }

    fn update(&self, id: &TeacherId, teacher: Teacher) -> Result<Teacher, StoreError> {
        let mut guard = lock(&self.teachers)?;
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id.as_ref() == Some(id))
            .ok_or(StoreError::NotFound)?;
        *slot = teacher;
        Ok(slot.clone())
    }

    fn delete(&self, id: &TeacherId) -> Result<(), StoreError> {
        let mut guard = lock(&self.teachers)?;
        let before = guard.len();
        guard.retain(|teacher| teacher.id.as_ref() != Some(id));
        if guard.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

struct StoredTemplate {
    document: TemplateDocument,
    binary: TemplateBinary,
}

/// Process-local template catalog.
#[derive(Default)]
pub(crate) struct InMemoryTemplateCatalog {
    templates: Mutex<Vec<StoredTemplate>>,
    next_id: AtomicU64,
}

impl TemplateCatalog for InMemoryTemplateCatalog {
    fn upload(&self, upload: TemplateUpload) -> Result<String, StoreError> {
        let mut guard = lock(&self.templates)?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let content_type = guess_content_type(&upload.name);
        guard.push(StoredTemplate {
            document: TemplateDocument {
                file_id: format!("tpl-{id:06}"),
                name: upload.name.clone(),
                description: upload.description,
            },
            binary: TemplateBinary {
                bytes: upload.content,
                content_type,
            },
        });
        Ok(format!("Template '{}' uploaded", upload.name))
    }

    fn list(&self) -> Result<Vec<TemplateDocument>, StoreError> {
        Ok(lock(&self.templates)?
            .iter()
            .map(|stored| stored.document.clone())
            .collect())
    }

    fn download(&self, file_id: &str) -> Result<TemplateBinary, StoreError> {
        lock(&self.templates)?
            .iter()
            .find(|stored| stored.document.file_id == file_id)
            .map(|stored| stored.binary.clone())
            .ok_or(StoreError::NotFound)
    }
}

pub(crate) fn parse_month(raw: &str) -> Result<u32, String> {
    let month = raw
        .trim()
        .parse::<u32>()
        .map_err(|err| format!("failed to parse '{raw}' as a month ({err})"))?;
    if (1..=12).contains(&month) {
        Ok(month)
    } else {
        Err(format!("month must be between 1 and 12, got {month}"))
    }
}

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::careers::{
    validate_training, Career, CareerId, CareerStore, StoreError, Teacher, TeacherId,
    TeacherStore, Training, TrainingInput,
};

pub(super) fn training_input(name: &str, hours: i64) -> TrainingInput {
    TrainingInput {
        name: name.to_string(),
        hours,
        duration: "3 meses".to_string(),
        period: "2025-1".to_string(),
        kind: "Técnico".to_string(),
    }
}

pub(super) fn training(name: &str, hours: i64) -> Training {
    validate_training(&training_input(name, hours)).expect("valid training")
}

pub(super) fn committed_career(id: &str, name: &str, trainings: &[&str]) -> Career {
    Career {
        id: Some(CareerId(id.to_string())),
        name: name.to_string(),
        trainings: trainings.iter().map(|name| training(name, 40)).collect(),
    }
}

/// Career store double that records every call it receives.
#[derive(Default)]
pub(super) struct MemoryCareerStore {
    careers: Mutex<Vec<Career>>,
    calls: Mutex<Vec<&'static str>>,
    next_id: AtomicU64,
}

impl MemoryCareerStore {
    pub(super) fn seeded(careers: Vec<Career>) -> Arc<Self> {
        let store = Self::default();
        *store.careers.lock().expect("career mutex poisoned") = careers;
        Arc::new(store)
    }

    pub(super) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().expect("call mutex poisoned").clone()
    }

    pub(super) fn stored(&self) -> Vec<Career> {
        self.careers.lock().expect("career mutex poisoned").clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().expect("call mutex poisoned").push(call);
    }
}

impl CareerStore for MemoryCareerStore {
    fn create(&self, mut career: Career) -> Result<Career, StoreError> {
        self.record("create");
        let mut guard = self.careers.lock().expect("career mutex poisoned");
        if guard.iter().any(|existing| existing.name == career.name) {
            return Err(StoreError::Rejected {
                status: 500,
                message: None,
            });
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        career.id = Some(CareerId(format!("car-{id:06}")));
        guard.push(career.clone());
        Ok(career)
    }

    fn list(&self) -> Result<Vec<Career>, StoreError> {
        self.record("list");
        Ok(self.stored())
    }

    fn update(&self, id: &CareerId, career: Career) -> Result<Career, StoreError> {
        self.record("update");
        let mut guard = self.careers.lock().expect("career mutex poisoned");
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id.as_ref() == Some(id))
            .ok_or(StoreError::NotFound)?;
        *slot = career.clone();
        Ok(career)
    }

    fn delete(&self, id: &CareerId) -> Result<(), StoreError> {
        self.record("delete");
        let mut guard = self.careers.lock().expect("career mutex poisoned");
        let before = guard.len();
        guard.retain(|existing| existing.id.as_ref() != Some(id));
        if guard.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

/// Accepts writes but cannot list careers afterwards.
pub(super) struct ListFailsStore;

impl CareerStore for ListFailsStore {
    fn create(&self, career: Career) -> Result<Career, StoreError> {
        Ok(career)
    }

    fn list(&self) -> Result<Vec<Career>, StoreError> {
        Err(StoreError::Unavailable("connection reset".to_string()))
    }

    fn update(&self, _id: &CareerId, career: Career) -> Result<Career, StoreError> {
        Ok(career)
    }

    fn delete(&self, _id: &CareerId) -> Result<(), StoreError> {
        Ok(())
    }
}

pub(super) struct OfflineCareerStore;

impl CareerStore for OfflineCareerStore {
    fn create(&self, _career: Career) -> Result<Career, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Career>, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    fn update(&self, _id: &CareerId, _career: Career) -> Result<Career, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    fn delete(&self, _id: &CareerId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }
}

/// Accepts creates but never assigns an id.
pub(super) struct IdlessCareerStore;

impl CareerStore for IdlessCareerStore {
    fn create(&self, career: Career) -> Result<Career, StoreError> {
        Ok(career)
    }

    fn list(&self) -> Result<Vec<Career>, StoreError> {
        Ok(Vec::new())
    }

    fn update(&self, _id: &CareerId, career: Career) -> Result<Career, StoreError> {
        Ok(career)
    }

    fn delete(&self, _id: &CareerId) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Lists its single career until the first update, then an empty list.
pub(super) struct VanishingCareerStore {
    career: Career,
    updated: AtomicBool,
}

impl VanishingCareerStore {
    pub(super) fn new(career: Career) -> Arc<Self> {
        Arc::new(Self {
            career,
            updated: AtomicBool::new(false),
        })
    }
}

impl CareerStore for VanishingCareerStore {
    fn create(&self, career: Career) -> Result<Career, StoreError> {
        Ok(career)
    }

    fn list(&self) -> Result<Vec<Career>, StoreError> {
        if self.updated.load(Ordering::SeqCst) {
            Ok(Vec::new())
        } else {
            Ok(vec![self.career.clone()])
        }
    }

    fn update(&self, _id: &CareerId, career: Career) -> Result<Career, StoreError> {
        self.updated.store(true, Ordering::SeqCst);
        Ok(career)
    }

    fn delete(&self, _id: &CareerId) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Teacher store double; sequences start at one in creation order.
#[derive(Default)]
pub(super) struct MemoryTeacherStore {
    teachers: Mutex<Vec<Teacher>>,
    next_id: AtomicU64,
    next_sequence: AtomicU32,
}

impl MemoryTeacherStore {
    pub(super) fn stored(&self) -> Vec<Teacher> {
        self.teachers.lock().expect("teacher mutex poisoned").clone()
    }
}

impl TeacherStore for MemoryTeacherStore {
    fn create(&self, mut teacher: Teacher) -> Result<Teacher, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        teacher.id = Some(TeacherId(format!("doc-{id:06}")));
        teacher.sequence = Some(self.next_sequence.fetch_add(1, Ordering::SeqCst) + 1);
        self.teachers
            .lock()
            .expect("teacher mutex poisoned")
            .push(teacher.clone());
        Ok(teacher)
    }

    fn list(&self) -> Result<Vec<Teacher>, StoreError> {
        Ok(self.stored())
    }

    fn list_by_career(&self, career_id: &CareerId) -> Result<Vec<Teacher>, StoreError> {
        Ok(self
            .stored()
            .into_iter()
            .filter(|teacher| &teacher.career_id == career_id)
            .collect())
    }

    fn fetch(&self, id: &TeacherId) -> Result<Option<Teacher>, StoreError> {
        Ok(self
            .stored()
            .into_iter()
            .find(|teacher| teacher.id.as_ref() == Some(id)))
    }

    fn update(&self, id: &TeacherId, teacher: Teacher) -> Result<Teacher, StoreError> {
        let mut guard = self.teachers.lock().expect("teacher mutex poisoned");
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id.as_ref() == Some(id))
            .ok_or(StoreError::NotFound)?;
        *slot = teacher.clone();
        Ok(teacher)
    }

    fn delete(&self, id: &TeacherId) -> Result<(), StoreError> {
        let mut guard = self.teachers.lock().expect("teacher mutex poisoned");
        let before = guard.len();
        guard.retain(|existing| existing.id.as_ref() != Some(id));
        if guard.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

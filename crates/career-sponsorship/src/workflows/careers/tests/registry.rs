use super::common::*;
use std::sync::Arc;

use crate::workflows::careers::{
    Career, CareerId, RegistryError, StoreError, TrainingRegistry, ValidationError,
};

fn loaded_registry(store: &Arc<MemoryCareerStore>) -> TrainingRegistry<MemoryCareerStore> {
    let mut registry = TrainingRegistry::new(store.clone());
    registry.refresh().expect("initial load");
    registry
}

fn career_names(careers: &[Career], id: &str) -> Vec<String> {
    careers
        .iter()
        .find(|career| career.id == Some(CareerId(id.to_string())))
        .expect("career present")
        .trainings
        .iter()
        .map(|training| training.name().to_string())
        .collect()
}

#[test]
fn adding_a_training_updates_then_reloads_the_list() {
    let store = MemoryCareerStore::seeded(vec![committed_career("car-1", "Software", &["Git"])]);
    let mut registry = loaded_registry(&store);
    let career = registry.careers()[0].clone();

    let careers = registry
        .add_training_to_existing(&career, &training_input("Docker", 45))
        .expect("training added");

    assert_eq!(career_names(careers, "car-1"), vec!["Git", "Docker"]);
    assert_eq!(store.calls(), vec!["list", "update", "list"]);
}

#[test]
fn invalid_training_is_rejected_before_any_remote_call() {
    let store = MemoryCareerStore::seeded(vec![committed_career("car-1", "Software", &["Git"])]);
    let mut registry = loaded_registry(&store);
    let career = registry.careers()[0].clone();

    let err = registry
        .add_training_to_existing(&career, &training_input("Docker", 10))
        .expect_err("too short");

    assert!(matches!(
        err,
        RegistryError::Validation(ValidationError::InsufficientHours { .. })
    ));
    assert_eq!(store.calls(), vec!["list"]);
}

#[test]
fn draft_careers_cannot_be_edited() {
    let store = Arc::new(MemoryCareerStore::default());
    let mut registry = TrainingRegistry::new(store.clone());
    let draft = Career::draft("Software");

    for result in [
        registry
            .add_training_to_existing(&draft, &training_input("Git", 40))
            .map(|_| ()),
        registry.remove_training_at(&draft, 0).map(|_| ()),
        registry.rename_career(&draft, "Redes").map(|_| ()),
        registry.delete_career(&draft).map(|_| ()),
    ] {
        assert!(matches!(result, Err(RegistryError::MissingIdentifier(name)) if name == "Software"));
    }
    assert!(store.calls().is_empty());
}

#[test]
fn replace_and_remove_respect_positions() {
    let store = MemoryCareerStore::seeded(vec![committed_career(
        "car-1",
        "Software",
        &["Git", "Docker", "Rust"],
    )]);
    let mut registry = loaded_registry(&store);
    let career = registry.careers()[0].clone();

    let careers = registry
        .replace_training_at(&career, 1, &training_input("Kubernetes", 50))
        .expect("replaced");
    assert_eq!(career_names(careers, "car-1"), vec!["Git", "Kubernetes", "Rust"]);

    let career = registry.careers()[0].clone();
    let careers = registry.remove_training_at(&career, 0).expect("removed");
    assert_eq!(career_names(careers, "car-1"), vec!["Kubernetes", "Rust"]);

    let career = registry.careers()[0].clone();
    assert!(matches!(
        registry.remove_training_at(&career, 2),
        Err(RegistryError::TrainingIndex { index: 2, len: 2 })
    ));
    assert!(matches!(
        registry.replace_training_at(&career, 9, &training_input("Go", 40)),
        Err(RegistryError::TrainingIndex { index: 9, len: 2 })
    ));
}

#[test]
fn rename_validates_and_trims_the_new_name() {
    let store = MemoryCareerStore::seeded(vec![committed_career("car-1", "Software", &["Git"])]);
    let mut registry = loaded_registry(&store);
    let career = registry.careers()[0].clone();

    assert!(matches!(
        registry.rename_career(&career, "  "),
        Err(RegistryError::Validation(_))
    ));
    let careers = registry
        .rename_career(&career, "  Ingeniería de Software ")
        .expect("renamed");
    assert_eq!(careers[0].name, "Ingeniería de Software");
    assert_eq!(careers[0].trainings.len(), 1);
}

#[test]
fn delete_removes_the_career_and_reloads() {
    let store = MemoryCareerStore::seeded(vec![
        committed_career("car-1", "Software", &["Git"]),
        committed_career("car-2", "Redes", &["CCNA"]),
    ]);
    let mut registry = loaded_registry(&store);
    let career = registry.careers()[0].clone();

    let careers = registry.delete_career(&career).expect("deleted");
    assert_eq!(careers.len(), 1);
    assert_eq!(careers[0].name, "Redes");
    assert!(registry.find(&CareerId("car-1".to_string())).is_none());
}

#[test]
fn store_failures_leave_the_cached_list_untouched() {
    let store = MemoryCareerStore::seeded(vec![committed_career("car-1", "Software", &["Git"])]);
    let mut registry = loaded_registry(&store);
    let ghost = committed_career("car-9", "Fantasma", &["Git"]);

    let err = registry
        .add_training_to_existing(&ghost, &training_input("Docker", 40))
        .expect_err("unknown career");
    assert!(matches!(err, RegistryError::Store(StoreError::NotFound)));
    assert_eq!(registry.careers().len(), 1);
    assert_eq!(store.calls(), vec!["list", "update"]);
}

#[test]
fn failed_reload_after_a_stored_change_is_reported_separately() {
    let mut registry = TrainingRegistry::new(Arc::new(ListFailsStore));
    let career = committed_career("car-1", "Software", &["Git"]);

    let err = registry
        .add_training_to_existing(&career, &training_input("Docker", 40))
        .expect_err("reload fails");

    assert!(matches!(err, RegistryError::Refresh(StoreError::Unavailable(_))));
    assert!(err.to_string().starts_with("change saved"));
}

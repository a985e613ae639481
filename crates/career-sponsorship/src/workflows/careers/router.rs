use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;

use super::domain::{Career, CareerId, TeacherId, TeacherInput, TrainingInput};
use super::draft::{CareerDraftBuilder, DraftError};
use super::registry::{RegistryError, TrainingRegistry};
use super::repository::{CareerStore, StoreError, TeacherStore};
use super::teachers::{TeacherError, TeacherRegistry};
use crate::workflows::notice::error_response;

/// Shared handles for the career and teacher routes.
pub struct CareerRoutes<C, T> {
    pub careers: Arc<C>,
    pub teachers: Arc<T>,
}

impl<C, T> Clone for CareerRoutes<C, T> {
    fn clone(&self) -> Self {
        Self {
            careers: Arc::clone(&self.careers),
            teachers: Arc::clone(&self.teachers),
        }
    }
}

/// Payload for creating a career with its first trainings in one request.
#[derive(Debug, Clone, Deserialize)]
pub struct CareerRequest {
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "capacitaciones", default)]
    pub trainings: Vec<TrainingInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenameRequest {
    #[serde(rename = "nombre", default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeacherRequest {
    #[serde(rename = "carreraId")]
    pub career_id: CareerId,
    #[serde(flatten)]
    pub input: TeacherInput,
}

pub fn career_router<C, T>(careers: Arc<C>, teachers: Arc<T>) -> Router
where
    C: CareerStore + 'static,
    T: TeacherStore + 'static,
{
    Router::new()
        .route(
            "/api/carreras",
            get(list_careers_handler::<C, T>).post(create_career_handler::<C, T>),
        )
        .route(
            "/api/carreras/:career_id",
            put(rename_career_handler::<C, T>).delete(delete_career_handler::<C, T>),
        )
        .route(
            "/api/carreras/:career_id/capacitaciones",
            post(add_training_handler::<C, T>),
        )
        .route(
            "/api/carreras/:career_id/capacitaciones/:index",
            put(replace_training_handler::<C, T>).delete(remove_training_handler::<C, T>),
        )
        .route(
            "/api/docentes",
            get(list_teachers_handler::<C, T>).post(create_teacher_handler::<C, T>),
        )
        .route(
            "/api/docentes/:teacher_id",
            get(fetch_teacher_handler::<C, T>)
                .put(update_teacher_handler::<C, T>)
                .delete(delete_teacher_handler::<C, T>),
        )
        .route(
            "/api/docentes/carrera/:career_id",
            get(teachers_by_career_handler::<C, T>),
        )
        .with_state(CareerRoutes { careers, teachers })
}

pub(crate) fn store_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::Duplicate(_) => StatusCode::CONFLICT,
        StoreError::NotFound => StatusCode::NOT_FOUND,
        StoreError::Rejected { status, .. } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

fn draft_failure(err: DraftError) -> Response {
    let status = match &err {
        DraftError::Validation(_) | DraftError::NoTrainings => StatusCode::UNPROCESSABLE_ENTITY,
        DraftError::NoActiveDraft | DraftError::DraftInProgress => StatusCode::CONFLICT,
        DraftError::Store(store) => store_status(store),
    };
    error_response(status, &err)
}

fn registry_failure(err: RegistryError) -> Response {
    let status = match &err {
        RegistryError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RegistryError::MissingIdentifier(_) => StatusCode::BAD_REQUEST,
        RegistryError::TrainingIndex { .. } => StatusCode::NOT_FOUND,
        RegistryError::Store(store) | RegistryError::Refresh(store) => store_status(store),
    };
    error_response(status, &err)
}

fn teacher_failure(err: TeacherError) -> Response {
    let status = match &err {
        TeacherError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TeacherError::MissingIdentifier(_) => StatusCode::BAD_REQUEST,
        TeacherError::Store(store) => store_status(store),
    };
    error_response(status, &err)
}

/// Reloads the career list and picks the requested career.
fn load_career<C>(registry: &mut TrainingRegistry<C>, id: &CareerId) -> Result<Career, Response>
where
    C: CareerStore + 'static,
{
    registry
        .refresh()
        .map_err(|err| registry_failure(RegistryError::Store(err)))?;
    registry
        .find(id)
        .cloned()
        .ok_or_else(|| registry_failure(RegistryError::Store(StoreError::NotFound)))
}

fn career_in(careers: &[Career], id: &CareerId) -> Response {
    match careers.iter().find(|career| career.id.as_ref() == Some(id)) {
        Some(career) => (StatusCode::OK, Json(career.clone())).into_response(),
        None => registry_failure(RegistryError::Store(StoreError::NotFound)),
    }
}

pub(crate) async fn list_careers_handler<C, T>(State(routes): State<CareerRoutes<C, T>>) -> Response
where
    C: CareerStore + 'static,
    T: TeacherStore + 'static,
{
    let mut registry = TrainingRegistry::new(routes.careers);
    match registry.refresh() {
        Ok(careers) => (StatusCode::OK, Json(careers.to_vec())).into_response(),
        Err(err) => registry_failure(RegistryError::Store(err)),
    }
}

pub(crate) async fn create_career_handler<C, T>(
    State(routes): State<CareerRoutes<C, T>>,
    Json(request): Json<CareerRequest>,
) -> Response
where
    C: CareerStore + 'static,
    T: TeacherStore + 'static,
{
    let mut builder = CareerDraftBuilder::new(routes.careers);
    if let Err(err) = builder.create(&request.name) {
        return draft_failure(err);
    }
    for training in &request.trainings {
        if let Err(err) = builder.add_training(training) {
            return draft_failure(err);
        }
    }

    match builder.commit() {
        Ok(career) => (StatusCode::CREATED, Json(career.clone())).into_response(),
        Err(err) => draft_failure(err),
    }
}

pub(crate) async fn rename_career_handler<C, T>(
    State(routes): State<CareerRoutes<C, T>>,
    Path(career_id): Path<String>,
    Json(request): Json<RenameRequest>,
) -> Response
where
    C: CareerStore + 'static,
    T: TeacherStore + 'static,
{
    let id = CareerId(career_id);
    let mut registry = TrainingRegistry::new(routes.careers);
    let career = match load_career(&mut registry, &id) {
        Ok(career) => career,
        Err(response) => return response,
    };

    match registry.rename_career(&career, &request.name) {
        Ok(careers) => career_in(careers, &id),
        Err(err) => registry_failure(err),
    }
}

pub(crate) async fn delete_career_handler<C, T>(
    State(routes): State<CareerRoutes<C, T>>,
    Path(career_id): Path<String>,
) -> Response
where
    C: CareerStore + 'static,
    T: TeacherStore + 'static,
{
    let id = CareerId(career_id);
    let mut registry = TrainingRegistry::new(routes.careers);
    let career = match load_career(&mut registry, &id) {
        Ok(career) => career,
        Err(response) => return response,
    };

    match registry.delete_career(&career) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => registry_failure(err),
    }
}

pub(crate) async fn add_training_handler<C, T>(
    State(routes): State<CareerRoutes<C, T>>,
    Path(career_id): Path<String>,
    Json(input): Json<TrainingInput>,
) -> Response
where
    C: CareerStore + 'static,
    T: TeacherStore + 'static,
{
    let id = CareerId(career_id);
    let mut registry = TrainingRegistry::new(routes.careers);
    let career = match load_career(&mut registry, &id) {
        Ok(career) => career,
        Err(response) => return response,
    };

    match registry.add_training_to_existing(&career, &input) {
        Ok(careers) => {
            let mut response = career_in(careers, &id);
            *response.status_mut() = StatusCode::CREATED;
            response
        }
        Err(err) => registry_failure(err),
    }
}

pub(crate) async fn replace_training_handler<C, T>(
    State(routes): State<CareerRoutes<C, T>>,
    Path((career_id, index)): Path<(String, usize)>,
    Json(input): Json<TrainingInput>,
) -> Response
where
    C: CareerStore + 'static,
    T: TeacherStore + 'static,
{
    let id = CareerId(career_id);
    let mut registry = TrainingRegistry::new(routes.careers);
    let career = match load_career(&mut registry, &id) {
        Ok(career) => career,
        Err(response) => return response,
    };

    match registry.replace_training_at(&career, index, &input) {
        Ok(careers) => career_in(careers, &id),
        Err(err) => registry_failure(err),
    }
}

pub(crate) async fn remove_training_handler<C, T>(
    State(routes): State<CareerRoutes<C, T>>,
    Path((career_id, index)): Path<(String, usize)>,
) -> Response
where
    C: CareerStore + 'static,
    T: TeacherStore + 'static,
{
    let id = CareerId(career_id);
    let mut registry = TrainingRegistry::new(routes.careers);
    let career = match load_career(&mut registry, &id) {
        Ok(career) => career,
        Err(response) => return response,
    };

    match registry.remove_training_at(&career, index) {
        Ok(careers) => career_in(careers, &id),
        Err(err) => registry_failure(err),
    }
}

pub(crate) async fn list_teachers_handler<C, T>(
    State(routes): State<CareerRoutes<C, T>>,
) -> Response
where
    C: CareerStore + 'static,
    T: TeacherStore + 'static,
{
    match TeacherRegistry::new(routes.teachers).list_all() {
        Ok(teachers) => (StatusCode::OK, Json(teachers)).into_response(),
        Err(err) => teacher_failure(err),
    }
}

pub(crate) async fn create_teacher_handler<C, T>(
    State(routes): State<CareerRoutes<C, T>>,
    Json(request): Json<TeacherRequest>,
) -> Response
where
    C: CareerStore + 'static,
    T: TeacherStore + 'static,
{
    let mut careers = TrainingRegistry::new(routes.careers);
    let career = match load_career(&mut careers, &request.career_id) {
        Ok(career) => career,
        Err(response) => return response,
    };

    match TeacherRegistry::new(routes.teachers).create(&career, &request.input) {
        Ok(teacher) => (StatusCode::CREATED, Json(teacher)).into_response(),
        Err(err) => teacher_failure(err),
    }
}

pub(crate) async fn fetch_teacher_handler<C, T>(
    State(routes): State<CareerRoutes<C, T>>,
    Path(teacher_id): Path<String>,
) -> Response
where
    C: CareerStore + 'static,
    T: TeacherStore + 'static,
{
    match TeacherRegistry::new(routes.teachers).fetch(&TeacherId(teacher_id)) {
        Ok(teacher) => (StatusCode::OK, Json(teacher)).into_response(),
        Err(err) => teacher_failure(err),
    }
}

pub(crate) async fn update_teacher_handler<C, T>(
    State(routes): State<CareerRoutes<C, T>>,
    Path(teacher_id): Path<String>,
    Json(request): Json<TeacherRequest>,
) -> Response
where
    C: CareerStore + 'static,
    T: TeacherStore + 'static,
{
    let mut careers = TrainingRegistry::new(routes.careers);
    let career = match load_career(&mut careers, &request.career_id) {
        Ok(career) => career,
        Err(response) => return response,
    };

    let registry = TeacherRegistry::new(routes.teachers);
    match registry.update(&TeacherId(teacher_id), &career, &request.input) {
        Ok(teacher) => (StatusCode::OK, Json(teacher)).into_response(),
        Err(err) => teacher_failure(err),
    }
}

pub(crate) async fn delete_teacher_handler<C, T>(
    State(routes): State<CareerRoutes<C, T>>,
    Path(teacher_id): Path<String>,
) -> Response
where
    C: CareerStore + 'static,
    T: TeacherStore + 'static,
{
    match TeacherRegistry::new(routes.teachers).delete(&TeacherId(teacher_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => teacher_failure(err),
    }
}

pub(crate) async fn teachers_by_career_handler<C, T>(
    State(routes): State<CareerRoutes<C, T>>,
    Path(career_id): Path<String>,
) -> Response
where
    C: CareerStore + 'static,
    T: TeacherStore + 'static,
{
    let id = CareerId(career_id);
    let mut careers = TrainingRegistry::new(routes.careers);
    let career = match load_career(&mut careers, &id) {
        Ok(career) => career,
        Err(response) => return response,
    };

    match TeacherRegistry::new(routes.teachers).list_by_career(&career) {
        Ok(teachers) => (StatusCode::OK, Json(teachers)).into_response(),
        Err(err) => teacher_failure(err),
    }
}

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::catalog::{
    download_file_name, TemplateCatalog, TemplateDocument, TemplatePreview, TemplateUpload,
};
use super::code::CodePeriod;
use super::service::{SponsorshipArtifact, SponsorshipError, SponsorshipSelection, SponsorshipService};
use crate::workflows::careers::router::store_status;
use crate::workflows::careers::{
    CareerId, CareerStore, StoreError, TeacherError, TeacherId, TeacherRegistry, TeacherStore,
    TrainingRegistry,
};
use crate::workflows::notice::{error_response, Notice};

pub const SPONSORSHIP_CODE_HEADER: &str = "x-sponsorship-code";
pub const TEMPLATE_PREVIEW_HEADER: &str = "x-template-preview";

pub struct SponsorshipRoutes<C, T, K> {
    pub careers: Arc<C>,
    pub teachers: Arc<T>,
    pub catalog: Arc<K>,
    pub service: Arc<SponsorshipService<K>>,
}

impl<C, T, K> Clone for SponsorshipRoutes<C, T, K> {
    fn clone(&self) -> Self {
        Self {
            careers: Arc::clone(&self.careers),
            teachers: Arc::clone(&self.teachers),
            catalog: Arc::clone(&self.catalog),
            service: Arc::clone(&self.service),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadQuery {
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: String,
}

/// Identifiers picked in the sponsorship form. Missing ones are reported as
/// missing selections rather than rejected by the JSON extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SponsorshipRequest {
    #[serde(rename = "docenteId", default)]
    pub teacher_id: Option<TeacherId>,
    #[serde(rename = "carreraId", default)]
    pub career_id: Option<CareerId>,
    #[serde(rename = "capacitacion", default)]
    pub training_index: Option<usize>,
    #[serde(rename = "plantillaId", default)]
    pub template_id: Option<String>,
    #[serde(rename = "anio", default)]
    pub year: Option<i32>,
    #[serde(rename = "mes", default)]
    pub month: Option<u32>,
}

pub fn sponsorship_router<C, T, K>(
    careers: Arc<C>,
    teachers: Arc<T>,
    catalog: Arc<K>,
    service: Arc<SponsorshipService<K>>,
) -> Router
where
    C: CareerStore + 'static,
    T: TeacherStore + 'static,
    K: TemplateCatalog + 'static,
{
    Router::new()
        .route("/api/documentos/upload", post(upload_template_handler::<C, T, K>))
        .route("/api/documentos/list", get(list_templates_handler::<C, T, K>))
        .route(
            "/api/documentos/download/:file_id",
            get(download_template_handler::<C, T, K>),
        )
        .route("/api/patrocinios", post(generate_sponsorship_handler::<C, T, K>))
        .with_state(SponsorshipRoutes {
            careers,
            teachers,
            catalog,
            service,
        })
}

fn sponsorship_failure(err: SponsorshipError) -> Response {
    let status = match &err {
        SponsorshipError::Validation(_) | SponsorshipError::Code(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        SponsorshipError::Catalog(store) => store_status(store),
        SponsorshipError::Template(_) => StatusCode::UNPROCESSABLE_ENTITY,
    };
    error_response(status, &err)
}

fn catalog_failure(err: StoreError) -> Response {
    error_response(store_status(&err), &err)
}

fn attachment(file_name: &str) -> HeaderValue {
    let sanitized = file_name.replace(['"', '\\'], "'");
    HeaderValue::from_bytes(format!("attachment; filename=\"{sanitized}\"").as_bytes())
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

fn find_template(
    catalog: &impl TemplateCatalog,
    file_id: &str,
) -> Result<Option<TemplateDocument>, StoreError> {
    Ok(catalog
        .list()?
        .into_iter()
        .find(|document| document.file_id == file_id))
}

pub(crate) async fn upload_template_handler<C, T, K>(
    State(routes): State<SponsorshipRoutes<C, T, K>>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Response
where
    C: CareerStore + 'static,
    T: TeacherStore + 'static,
    K: TemplateCatalog + 'static,
{
    let upload = TemplateUpload {
        content: body.to_vec(),
        name: query.name,
        description: query.description,
    };
    let upload = match upload.validate() {
        Ok(upload) => upload,
        Err(err) => return error_response(StatusCode::UNPROCESSABLE_ENTITY, &err),
    };

    let name = upload.name.clone();
    match routes.catalog.upload(upload) {
        Ok(message) => {
            info!(template = %name, "template uploaded");
            let notice = Notice::success(message.clone());
            (
                StatusCode::CREATED,
                Json(json!({ "mensaje": message, "notice": notice })),
            )
                .into_response()
        }
        Err(err) => catalog_failure(err),
    }
}

pub(crate) async fn list_templates_handler<C, T, K>(
    State(routes): State<SponsorshipRoutes<C, T, K>>,
) -> Response
where
    C: CareerStore + 'static,
    T: TeacherStore + 'static,
    K: TemplateCatalog + 'static,
{
    match routes.catalog.list() {
        Ok(documents) => (StatusCode::OK, Json(documents)).into_response(),
        Err(err) => catalog_failure(err),
    }
}

pub(crate) async fn download_template_handler<C, T, K>(
    State(routes): State<SponsorshipRoutes<C, T, K>>,
    Path(file_id): Path<String>,
) -> Response
where
    C: CareerStore + 'static,
    T: TeacherStore + 'static,
    K: TemplateCatalog + 'static,
{
    let name = match find_template(routes.catalog.as_ref(), &file_id) {
        Ok(document) => document.map(|document| document.name).unwrap_or_default(),
        Err(err) => return catalog_failure(err),
    };
    let binary = match routes.catalog.download(&file_id) {
        Ok(binary) => binary,
        Err(err) => return catalog_failure(err),
    };

    let preview = match TemplatePreview::classify(&name, &binary.content_type) {
        TemplatePreview::Inline => "inline",
        TemplatePreview::DownloadOnly => "download_only",
    };
    let mut headers = HeaderMap::new();
    let content_type = HeaderValue::from_str(&binary.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    headers.insert(header::CONTENT_TYPE, content_type);
    headers.insert(
        header::CONTENT_DISPOSITION,
        attachment(&download_file_name(&name, &binary.content_type)),
    );
    headers.insert(
        HeaderName::from_static(TEMPLATE_PREVIEW_HEADER),
        HeaderValue::from_static(preview),
    );
    (StatusCode::OK, headers, binary.bytes).into_response()
}

/// Resolves the submitted identifiers against the stores. Unknown records are
/// reported as not found; absent identifiers stay empty in the selection.
fn resolve_selection<C, T, K>(
    routes: &SponsorshipRoutes<C, T, K>,
    request: &SponsorshipRequest,
) -> Result<SponsorshipSelection, Response>
where
    C: CareerStore + 'static,
    T: TeacherStore + 'static,
    K: TemplateCatalog + 'static,
{
    let not_found = |err: StoreError| error_response(store_status(&err), &err);

    let teacher = match &request.teacher_id {
        Some(id) => Some(
            TeacherRegistry::new(Arc::clone(&routes.teachers))
                .fetch(id)
                .map_err(|err| {
                    let status = match &err {
                        TeacherError::Store(store) => store_status(store),
                        _ => StatusCode::BAD_REQUEST,
                    };
                    error_response(status, &err)
                })?,
        ),
        None => None,
    };

    let career = match &request.career_id {
        Some(id) => {
            let mut registry = TrainingRegistry::new(Arc::clone(&routes.careers));
            registry.refresh().map_err(not_found)?;
            let career = registry
                .find(id)
                .cloned()
                .ok_or(StoreError::NotFound)
                .map_err(not_found)?;
            Some(career)
        }
        None => None,
    };

    let training = match (&career, request.training_index) {
        (Some(career), Some(index)) => Some(
            career
                .trainings
                .get(index)
                .cloned()
                .ok_or(StoreError::NotFound)
                .map_err(not_found)?,
        ),
        _ => None,
    };

    let template = match &request.template_id {
        Some(file_id) => Some(
            find_template(routes.catalog.as_ref(), file_id)
                .and_then(|document| document.ok_or(StoreError::NotFound))
                .map_err(not_found)?,
        ),
        None => None,
    };

    let period = match (request.year, request.month) {
        (None, None) => None,
        (year, month) => {
            let current = CodePeriod::current();
            let period = CodePeriod::new(
                year.unwrap_or(current.year),
                month.unwrap_or(current.month),
            )
            .map_err(|err| sponsorship_failure(err.into()))?;
            Some(period)
        }
    };

    Ok(SponsorshipSelection {
        teacher,
        career,
        training,
        template,
        period,
    })
}

fn artifact_response(artifact: SponsorshipArtifact) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(artifact.mime_type),
    );
    headers.insert(header::CONTENT_DISPOSITION, attachment(&artifact.file_name));
    if let Ok(code) = HeaderValue::from_str(artifact.code.as_str()) {
        headers.insert(HeaderName::from_static(SPONSORSHIP_CODE_HEADER), code);
    }
    (StatusCode::OK, headers, artifact.bytes).into_response()
}

pub(crate) async fn generate_sponsorship_handler<C, T, K>(
    State(routes): State<SponsorshipRoutes<C, T, K>>,
    Json(request): Json<SponsorshipRequest>,
) -> Response
where
    C: CareerStore + 'static,
    T: TeacherStore + 'static,
    K: TemplateCatalog + 'static,
{
    let selection = match resolve_selection(&routes, &request) {
        Ok(selection) => selection,
        Err(response) => return response,
    };

    match routes.service.generate(selection) {
        Ok(artifact) => artifact_response(artifact),
        Err(err) => sponsorship_failure(err),
    }
}

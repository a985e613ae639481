use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned by the remote store once a career is committed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CareerId(pub String);

impl fmt::Display for CareerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier assigned by the remote store when a teacher is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeacherId(pub String);

impl fmt::Display for TeacherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Academic program owning an ordered list of trainings.
///
/// A career without an `id` is a draft and has never reached the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Career {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CareerId>,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "capacitaciones", default)]
    pub trainings: Vec<Training>,
}

impl Career {
    pub fn draft(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            trainings: Vec::new(),
        }
    }

    pub fn is_draft(&self) -> bool {
        self.id.is_none()
    }
}

/// Validated training entry. Fields are read-only; edits replace the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Training {
    #[serde(rename = "nombre")]
    name: String,
    #[serde(rename = "horas")]
    hours: u32,
    #[serde(rename = "duracion")]
    duration: String,
    #[serde(rename = "periodo")]
    period: String,
    #[serde(rename = "tipo")]
    kind: String,
}

impl Training {
    /// Only reachable through [`super::validation::validate_training`].
    pub(crate) fn from_validated(
        name: String,
        hours: u32,
        duration: String,
        period: String,
        kind: String,
    ) -> Self {
        Self {
            name,
            hours,
            duration,
            period,
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn duration(&self) -> &str {
        &self.duration
    }

    pub fn period(&self) -> &str {
        &self.period
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }
}

/// Raw training form fields as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingInput {
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "horas", default)]
    pub hours: i64,
    #[serde(rename = "duracion", default)]
    pub duration: String,
    #[serde(rename = "periodo", default)]
    pub period: String,
    #[serde(rename = "tipo", default)]
    pub kind: String,
}

impl From<&Training> for TrainingInput {
    fn from(training: &Training) -> Self {
        Self {
            name: training.name.clone(),
            hours: i64::from(training.hours),
            duration: training.duration.clone(),
            period: training.period.clone(),
            kind: training.kind.clone(),
        }
    }
}

/// Teacher assigned to a career. `sequence` is allocated by the remote store and
/// feeds the sponsorship code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TeacherId>,
    #[serde(rename = "carreraId")]
    pub career_id: CareerId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(default)]
    pub cedula: String,
    #[serde(rename = "formacion", default)]
    pub formation: String,
    #[serde(rename = "programa", default)]
    pub program: String,
    #[serde(rename = "estado", default)]
    pub status: String,
    #[serde(rename = "periodo", default)]
    pub period: String,
    #[serde(rename = "secuencia", default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u32>,
}

/// Raw teacher form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherInput {
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(default)]
    pub cedula: String,
    #[serde(rename = "formacion", default)]
    pub formation: String,
    #[serde(rename = "programa", default)]
    pub program: String,
    #[serde(rename = "estado", default)]
    pub status: String,
    #[serde(rename = "periodo", default)]
    pub period: String,
}

impl From<&Teacher> for TeacherInput {
    fn from(teacher: &Teacher) -> Self {
        Self {
            name: teacher.name.clone(),
            cedula: teacher.cedula.clone(),
            formation: teacher.formation.clone(),
            program: teacher.program.clone(),
            status: teacher.status.clone(),
            period: teacher.period.clone(),
        }
    }
}

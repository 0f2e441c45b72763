//! Typed entity models and their partial-update inputs.
//!
//! Each entity has a model struct describing its persisted columns and a
//! patch struct describing a request body. Patches turn into a full model
//! either on their own (create) or merged over the stored state (update).

pub mod account;
pub mod contractor;
pub mod monitoring;
pub mod negotiation;
pub mod principal;
pub mod role;
pub mod setting;
pub mod union;

pub use account::Account;
pub use contractor::{Contractor, ContractorPatch};
pub use monitoring::{MonitoringPatch, MonitoringRecord};
pub use negotiation::{Negotiation, NegotiationPatch};
pub use principal::{Principal, PrincipalPatch};
pub use role::{Role, RolePatch};
pub use setting::Setting;
pub use union::{Union, UnionPatch};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::database::graph::{Entity, FieldKind};
use crate::database::record::{Record, RecordError};

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid {entity} body: {message}")]
    InvalidBody { entity: Entity, message: String },

    #[error("{0} records are read-only")]
    ReadOnly(Entity),

    #[error(transparent)]
    Record(#[from] RecordError),
}

/// A request body that can build a new model or update an existing one
pub trait Patch: DeserializeOwned + Send {
    type Target: Serialize + DeserializeOwned;

    fn into_new(self) -> Result<Self::Target, ModelError>;

    fn apply(self, current: Self::Target) -> Self::Target;
}

pub(crate) fn required<T>(value: Option<T>, field: &'static str) -> Result<T, ModelError> {
    value.ok_or(ModelError::MissingField(field))
}

/// Parsed request body for one of the writable entities
#[derive(Debug)]
pub enum Input {
    Principal(PrincipalPatch),
    Contractor(ContractorPatch),
    Union(UnionPatch),
    Negotiation(NegotiationPatch),
    Monitoring(MonitoringPatch),
    Role(RolePatch),
}

impl Input {
    pub fn from_json(entity: Entity, body: Value) -> Result<Self, ModelError> {
        let body = blank_dates_to_null(entity, body)?;
        Ok(match entity {
            Entity::Principal => Input::Principal(parse(entity, body)?),
            Entity::Contractor => Input::Contractor(parse(entity, body)?),
            Entity::Union => Input::Union(parse(entity, body)?),
            Entity::Negotiation => Input::Negotiation(parse(entity, body)?),
            Entity::Monitoring => Input::Monitoring(parse(entity, body)?),
            Entity::Role => Input::Role(parse(entity, body)?),
            Entity::Account => return Err(ModelError::ReadOnly(entity)),
        })
    }

    pub fn entity(&self) -> Entity {
        match self {
            Input::Principal(_) => Entity::Principal,
            Input::Contractor(_) => Entity::Contractor,
            Input::Union(_) => Entity::Union,
            Input::Negotiation(_) => Entity::Negotiation,
            Input::Monitoring(_) => Entity::Monitoring,
            Input::Role(_) => Entity::Role,
        }
    }

    /// Column values for a record created from this body
    pub fn into_new(self) -> Result<Map<String, Value>, ModelError> {
        match self {
            Input::Principal(p) => build(p),
            Input::Contractor(p) => build(p),
            Input::Union(p) => build(p),
            Input::Negotiation(p) => build(p),
            Input::Monitoring(p) => build(p),
            Input::Role(p) => build(p),
        }
    }

    /// Column values after merging this body over `current`
    pub fn apply_to(self, current: &Record) -> Result<Map<String, Value>, ModelError> {
        match self {
            Input::Principal(p) => merge(p, current),
            Input::Contractor(p) => merge(p, current),
            Input::Union(p) => merge(p, current),
            Input::Negotiation(p) => merge(p, current),
            Input::Monitoring(p) => merge(p, current),
            Input::Role(p) => merge(p, current),
        }
    }
}

fn parse<P: Patch>(entity: Entity, body: Value) -> Result<P, ModelError> {
    serde_json::from_value(body).map_err(|e| ModelError::InvalidBody {
        entity,
        message: e.to_string(),
    })
}

fn build<P: Patch>(patch: P) -> Result<Map<String, Value>, ModelError> {
    to_fields(&patch.into_new()?)
}

fn merge<P: Patch>(patch: P, current: &Record) -> Result<Map<String, Value>, ModelError> {
    let current: P::Target = current.decode()?;
    to_fields(&patch.apply(current))
}

pub(crate) fn to_fields<T: Serialize>(model: &T) -> Result<Map<String, Value>, ModelError> {
    match serde_json::to_value(model).map_err(RecordError::from)? {
        Value::Object(map) => Ok(map),
        other => Err(RecordError::InvalidJson(format!("model serialized to {}", other)).into()),
    }
}

/// Forms submit empty strings for untouched date inputs; treat them as null.
fn blank_dates_to_null(entity: Entity, body: Value) -> Result<Value, ModelError> {
    let mut map = match body {
        Value::Object(map) => map,
        _ => {
            return Err(ModelError::InvalidBody {
                entity,
                message: "expected a JSON object".to_string(),
            })
        }
    };
    for def in entity.fields().iter().filter(|f| f.kind == FieldKind::Date) {
        if let Some(value) = map.get_mut(def.name) {
            if value.as_str().is_some_and(|s| s.trim().is_empty()) {
                *value = Value::Null;
            }
        }
    }
    Ok(Value::Object(map))
}

//! Request extractors that report failures through [`AppError`].
//!
//! axum's own `Json`, `Path` and `Query` reject with plain-text bodies. The
//! wrappers here keep the `{error, code}` envelope, and [`Payload`] screens
//! the JSON field types itself so a wrong-typed field is reported next to
//! every other failing field instead of aborting deserialization.

use allowance_core::validation::FieldViolation;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::AppError;

/// JSON type a request field must have.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    String,
    Number,
    Integer,
    /// An array of objects with the given fields.
    List(&'static [(&'static str, FieldKind)]),
}

impl FieldKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Number => value.is_number(),
            FieldKind::Integer => value.is_i64(),
            FieldKind::List(_) => value.is_array(),
        }
    }

    fn message(self) -> &'static str {
        match self {
            FieldKind::String => "Must be a string",
            FieldKind::Number => "Must be a number",
            FieldKind::Integer => "Must be an integer",
            FieldKind::List(_) => "Must be a list",
        }
    }
}

/// Declares the JSON type of every field of a request body.
pub trait JsonShape {
    const FIELDS: &'static [(&'static str, FieldKind)];
}

/// A JSON request body plus the fields that had the wrong JSON type.
///
/// `null` counts as absent. Wrong-typed fields are dropped before
/// deserializing `T`, so `T` sees them as missing; the validator merges
/// [`Payload::shape`] into its violations.
#[derive(Debug)]
pub struct Payload<T> {
    pub body: T,
    pub shape: Vec<FieldViolation>,
}

impl<T> Payload<T> {
    pub fn into_parts(self) -> (T, Vec<FieldViolation>) {
        (self.body, self.shape)
    }
}

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned + JsonShape,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(mut value) = Json::<Value>::from_request(req, state).await?;

        let object = value
            .as_object_mut()
            .ok_or_else(|| AppError::BadRequest("Request body must be a JSON object".into()))?;
        let mut shape = Vec::new();
        screen(object, T::FIELDS, "", &mut shape);

        let body = serde_json::from_value(value).map_err(|e| AppError::BadRequest(e.to_string()))?;
        Ok(Self { body, shape })
    }
}

/// Drop null and wrong-typed fields from `object`, recording a violation for
/// each wrong type. Lists are screened element by element.
fn screen(
    object: &mut Map<String, Value>,
    fields: &[(&'static str, FieldKind)],
    prefix: &str,
    out: &mut Vec<FieldViolation>,
) {
    for &(name, kind) in fields {
        let path = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}.{name}")
        };
        let Some(value) = object.get_mut(name) else {
            continue;
        };

        let keep = match kind {
            _ if value.is_null() => false,
            FieldKind::List(inner) => match value.as_array_mut() {
                Some(elements) => {
                    for (index, element) in elements.iter_mut().enumerate() {
                        let element_path = format!("{path}[{index}]");
                        match element.as_object_mut() {
                            Some(element_fields) => screen(element_fields, inner, &element_path, out),
                            None => {
                                out.push(FieldViolation::new(element_path, "Must be an object"));
                                *element = Value::Object(Map::new());
                            }
                        }
                    }
                    true
                }
                None => {
                    out.push(FieldViolation::new(path, kind.message()));
                    false
                }
            },
            scalar if scalar.accepts(value) => true,
            scalar => {
                out.push(FieldViolation::new(path, scalar.message()));
                false
            }
        };

        if !keep {
            object.remove(name);
        }
    }
}

/// `Path` with rejections mapped to [`AppError`].
#[derive(Debug)]
pub struct AppPath<T>(pub T);

impl<T, S> FromRequestParts<S> for AppPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// `Query` with rejections mapped to [`AppError`].
#[derive(Debug)]
pub struct AppQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

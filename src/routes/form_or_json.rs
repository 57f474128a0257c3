use std::collections::BTreeMap;

use axum::{
    async_trait,
    extract::{
        rejection::{FormRejection, JsonRejection},
        FromRequest, Request,
    },
    Form, Json,
};
use http::{header, StatusCode};
use serde::de::{value::MapDeserializer, DeserializeOwned};

use crate::error::{Error, ErrorDetails, ResponseError};

/// Body extractor accepting both `application/json` and
/// `application/x-www-form-urlencoded` payloads.
///
/// Any other content type, or none, yields the value deserialized from an
/// empty map. Repeated form keys are joined with `,`.
#[derive(Debug)]
pub struct FormOrJson<T>(pub T);

#[derive(Debug, thiserror::Error)]
pub enum BodyRejection {
    #[error(transparent)]
    Json(#[from] JsonRejection),
    #[error(transparent)]
    Form(#[from] FormRejection),
    #[error("failed to deserialize form fields: {0}")]
    Fields(#[from] serde::de::value::Error),
}

impl ResponseError for BodyRejection {
    fn status_code(&self) -> StatusCode {
        match self {
            BodyRejection::Json(rejection) => rejection.status(),
            BodyRejection::Form(rejection) => rejection.status(),
            BodyRejection::Fields(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

#[derive(Debug)]
enum BodyKind {
    Json,
    Form,
}

fn body_kind(content_type: &str) -> Option<BodyKind> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if essence == "application/json" || essence.ends_with("+json") {
        Some(BodyKind::Json)
    } else if essence == "application/x-www-form-urlencoded" {
        Some(BodyKind::Form)
    } else {
        None
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for FormOrJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let details = req
            .extensions()
            .get::<ErrorDetails>()
            .copied()
            .unwrap_or_default();
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_owned();

        let value = match body_kind(&content_type) {
            Some(BodyKind::Json) => Json::<T>::from_request(req, state)
                .await
                .map(|Json(value)| value)
                .map_err(BodyRejection::from),
            Some(BodyKind::Form) => {
                match Form::<Vec<(String, String)>>::from_request(req, state).await {
                    Ok(Form(pairs)) => from_fields(join_repeated_keys(pairs)),
                    Err(rejection) => Err(rejection.into()),
                }
            }
            None => {
                tracing::debug!(content_type = %content_type, "no parsable body, using empty fields");
                from_fields(BTreeMap::new())
            }
        };

        value
            .map(FormOrJson)
            .map_err(|rejection| Error::from(rejection).with_details(details))
    }
}

fn join_repeated_keys(pairs: Vec<(String, String)>) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::<String, String>::new();
    for (key, value) in pairs {
        fields
            .entry(key)
            .and_modify(|joined| {
                joined.push(',');
                joined.push_str(&value);
            })
            .or_insert(value);
    }
    fields
}

fn from_fields<T: DeserializeOwned>(
    fields: BTreeMap<String, String>,
) -> Result<T, BodyRejection> {
    let deserializer = MapDeserializer::<_, serde::de::value::Error>::new(fields.into_iter());
    Ok(T::deserialize(deserializer)?)
}

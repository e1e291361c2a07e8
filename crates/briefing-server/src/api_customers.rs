//! API handlers for customer intake and listing.
//!
//! The intake form arrives as `multipart/form-data` so the optional
//! reference attachment can travel with the text fields. Database failures
//! surface to the client as fixed Portuguese messages matching the
//! frontend's expectations; the underlying error detail goes to the logs.

use crate::{upload::store_upload, AppState};
use axum::{
    body::Bytes,
    extract::{
        multipart::{Field, MultipartError},
        Extension, Json, Multipart,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use briefing_customers::{insert_customer, list_customers, Customer, NewCustomer};
use std::sync::Arc;
use thiserror::Error;

/// Acknowledgement returned on successful registration.
pub const MSG_CREATED: &str = "Cliente cadastrado com sucesso!";

/// Client-facing message when registration fails server-side.
pub const MSG_CREATE_FAILED: &str = "Erro ao cadastrar o cliente";

/// Client-facing message when the listing query fails.
pub const MSG_LIST_FAILED: &str = "Erro ao listar os clientes";

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

/// Fields collected from the intake form.
#[derive(Debug, Default)]
struct IntakeForm {
    name: Option<String>,
    project_type: Option<String>,
    urgency: Option<String>,
    email: Option<String>,
    description: Option<String>,
    attachment: Option<(String, Bytes)>,
}

fn bad_form(err: &MultipartError) -> ApiError {
    tracing::warn!(error = %err, "rejecting malformed multipart body");
    ApiError::BadRequest("Formulário inválido".to_string())
}

async fn read_text(field: Field<'_>) -> Result<String, ApiError> {
    field.text().await.map_err(|e| bad_form(&e))
}

/// Drains the multipart body into an [`IntakeForm`].
///
/// Unknown fields are ignored. A `referencia` part without a filename or
/// without content counts as "no attachment".
async fn read_form(multipart: &mut Multipart) -> Result<IntakeForm, ApiError> {
    let mut form = IntakeForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| bad_form(&e))? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "nome" => form.name = Some(read_text(field).await?),
            "tipo_projeto" => form.project_type = Some(read_text(field).await?),
            "urgencia" => form.urgency = Some(read_text(field).await?),
            "email" => form.email = Some(read_text(field).await?),
            "descricao" => form.description = Some(read_text(field).await?),
            "referencia" => {
                let original = field.file_name().map(str::to_string);
                let data = field.bytes().await.map_err(|e| bad_form(&e))?;
                if let Some(filename) = original {
                    if !filename.is_empty() && !data.is_empty() {
                        form.attachment = Some((filename, data));
                    }
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

fn missing_field(field: &str) -> ApiError {
    ApiError::BadRequest(format!("Campo obrigatório ausente: {field}"))
}

/// Required text fields must be present and non-blank.
fn require_filled(value: Option<String>, field: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(missing_field(field)),
    }
}

/// Handler for `POST /cadastrar_cliente`.
///
/// Validates the required fields before any file is written or any row is
/// inserted, stores the optional reference attachment, then persists the
/// record. Returns 201 with a fixed acknowledgement message.
pub async fn create_customer_handler(
    Extension(state): Extension<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = read_form(&mut multipart).await?;

    let name = require_filled(form.name, "nome")?;
    let email = form.email.ok_or_else(|| missing_field("email"))?;
    let description = require_filled(form.description, "descricao")?;

    // If the insert below fails the stored file is left orphaned on disk;
    // nothing references it, so it is harmless.
    let reference = match form.attachment {
        Some((original_name, data)) => {
            let stored = store_upload(&state.upload_dir, &original_name, &data)
                .await
                .map_err(|e| {
                    tracing::error!(
                        error = %e,
                        original_name = %original_name,
                        "failed to store reference attachment"
                    );
                    ApiError::InternalServerError(MSG_CREATE_FAILED.to_string())
                })?;
            Some(stored)
        }
        None => None,
    };

    let record = NewCustomer {
        name,
        project_type: form.project_type,
        urgency: form.urgency,
        email,
        description,
        reference: reference.clone(),
    };

    let state_clone = state.clone();
    let customer_id = tokio::task::spawn_blocking(move || {
        let conn = state_clone.pool.get().map_err(|e| {
            tracing::error!(error = %e, "db connection failed");
            ApiError::InternalServerError(MSG_CREATE_FAILED.to_string())
        })?;
        insert_customer(&conn, &record).map_err(|e| {
            tracing::error!(error = %e, "failed to insert customer");
            ApiError::InternalServerError(MSG_CREATE_FAILED.to_string())
        })
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "task join error");
        ApiError::InternalServerError(MSG_CREATE_FAILED.to_string())
    })??;

    tracing::info!(
        customer_id,
        reference = reference.as_deref().unwrap_or("-"),
        "customer registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": MSG_CREATED })),
    )
        .into_response())
}

/// Handler for `GET /clientes`.
///
/// Returns every stored customer, most recent first.
pub async fn list_customers_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    let state_clone = state.clone();

    let customers = tokio::task::spawn_blocking(move || {
        let conn = state_clone.pool.get().map_err(|e| {
            tracing::error!(error = %e, "db connection failed");
            ApiError::InternalServerError(MSG_LIST_FAILED.to_string())
        })?;
        list_customers(&conn).map_err(|e| {
            tracing::error!(error = %e, "failed to list customers");
            ApiError::InternalServerError(MSG_LIST_FAILED.to_string())
        })
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "task join error");
        ApiError::InternalServerError(MSG_LIST_FAILED.to_string())
    })??;

    Ok(Json(customers))
}

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, Error, HttpRequest, HttpResponse};

use super::controller::SubmitError;
use super::models::{
    ClientResponse, FormOptions, NewClientRequest, QuoteResponse, ValidationErrorResponse,
};
use crate::auth::middleware::{authorize_form_access, json_error};
use crate::ledger::LedgerError;
use crate::request::catalog::{
    sales_rep, ADD_NEW_CLIENT_OPTION, CONTAINER_TYPES, SELECTABLE_REPS, SERVICE_TYPES,
};
use crate::request::PaymentRequest;
use crate::{AppState, ErrorResponse};

pub const SUBMISSION_ID_HEADER: &str = "X-Submission-Id";

fn ledger_error(e: LedgerError) -> Error {
    log::error!("Spreadsheet operation failed: {}", e);
    let message = format!("Could not reach the request ledger: {}", e);
    json_error(
        HttpResponse::BadGateway().json(ErrorResponse::bad_gateway(&message)),
        &message,
    )
}

#[utoipa::path(
    context_path = "/api",
    tag = "Advance Requests",
    get,
    path = "/form/options",
    responses(
        (status = 200, description = "Option lists for the request form", body = FormOptions),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Role not allowed to use the form", body = ErrorResponse),
        (status = 502, description = "Client list unavailable", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_form_options(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    authorize_form_access(&req, &state.config.jwt_secret, &state.roles)?;
    let clients = state.clients.list().await.map_err(ledger_error)?;

    Ok(HttpResponse::Ok().json(FormOptions {
        sales_reps: SELECTABLE_REPS.iter().map(|name| sales_rep(name)).collect(),
        container_types: CONTAINER_TYPES.iter().map(|c| c.to_string()).collect(),
        service_types: SERVICE_TYPES.iter().map(|s| s.to_string()).collect(),
        clients,
        add_new_client_option: ADD_NEW_CLIENT_OPTION.to_string(),
    }))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Advance Requests",
    post,
    path = "/clients",
    request_body = NewClientRequest,
    responses(
        (status = 201, description = "Client added", body = ClientResponse),
        (status = 400, description = "Empty client name", body = ErrorResponse),
        (status = 409, description = "Client already exists", body = ErrorResponse),
        (status = 502, description = "Client list unavailable", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_client(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<NewClientRequest>,
) -> Result<HttpResponse, Error> {
    let user = authorize_form_access(&req, &state.config.jwt_secret, &state.roles)?;

    let name = body.name.trim();
    if name.is_empty() {
        return Ok(HttpResponse::BadRequest()
            .json(ErrorResponse::bad_request("Client name cannot be empty.")));
    }
    if state.clients.contains(name).await.map_err(ledger_error)? {
        return Ok(HttpResponse::Conflict().json(ErrorResponse::conflict(&format!(
            "Client '{}' already exists.",
            name
        ))));
    }

    state.clients.register(name).await.map_err(ledger_error)?;
    log::info!("Client '{}' created by {}", name, user.email);
    Ok(HttpResponse::Created().json(ClientResponse {
        name: name.to_string(),
    }))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Advance Requests",
    post,
    path = "/requests/quote",
    request_body = PaymentRequest,
    responses(
        (status = 200, description = "Current totals", body = QuoteResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn quote_request(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<PaymentRequest>,
) -> Result<HttpResponse, Error> {
    authorize_form_access(&req, &state.config.jwt_secret, &state.roles)?;
    let quote = state.controller.quote(&body);

    Ok(HttpResponse::Ok().json(QuoteResponse {
        total: quote.total.formatted(),
        amount: quote.total.amount,
        currency: quote.total.currency,
        needs_exchange_rate: quote.needs_exchange_rate,
        usd_subtotal: quote.subtotals.usd,
        cop_subtotal: quote.subtotals.cop,
    }))
}

/// Validate, record and render an advance payment request
#[utoipa::path(
    context_path = "/api",
    tag = "Advance Requests",
    post,
    path = "/requests",
    request_body = PaymentRequest,
    responses(
        (status = 200, description = "Rendered request document (application/pdf attachment)"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Role not allowed to submit", body = ErrorResponse),
        (status = 422, description = "Request failed validation", body = ValidationErrorResponse),
        (status = 502, description = "Ledger unavailable", body = ErrorResponse),
        (status = 500, description = "Document could not be rendered", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn submit_request(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<PaymentRequest>,
) -> Result<HttpResponse, Error> {
    let user = authorize_form_access(&req, &state.config.jwt_secret, &state.roles)?;
    log::info!(
        "Submission of operation {} by {}",
        body.operation_number.trim(),
        user.email
    );

    match state.controller.submit(body.into_inner()).await {
        Ok(submission) => {
            let disposition = ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(
                    submission.document.filename.clone(),
                )],
            };
            Ok(HttpResponse::Ok()
                .content_type(submission.document.mime)
                .insert_header(disposition)
                .insert_header((SUBMISSION_ID_HEADER, submission.id.to_string()))
                .body(submission.document.pdf))
        }
        Err(SubmitError::Validation(errors)) => Ok(HttpResponse::UnprocessableEntity()
            .json(ValidationErrorResponse::from_errors(&errors))),
        Err(SubmitError::Ledger(LedgerError::ClientListUpdate(e))) => {
            log::error!("Client list update failed after ledger append: {}", e);
            let message = format!(
                "The request was recorded but the client list could not be updated: {}",
                e
            );
            Err(json_error(
                HttpResponse::BadGateway().json(ErrorResponse::bad_gateway(&message)),
                &message,
            ))
        }
        Err(SubmitError::Ledger(e)) => Err(ledger_error(e)),
        Err(SubmitError::Document(e)) => {
            log::error!("Document rendering failed: {}", e);
            Ok(HttpResponse::InternalServerError().json(ErrorResponse::internal_error(
                "The request was recorded but its document could not be generated.",
            )))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/form/options").route(web::get().to(get_form_options)))
        .service(web::resource("/clients").route(web::post().to(create_client)))
        .service(web::resource("/requests/quote").route(web::post().to(quote_request)))
        .service(web::resource("/requests").route(web::post().to(submit_request)));
}

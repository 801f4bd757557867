use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    DateRange, ManagerChanges, ManagerId, NewManager, NewPremium, PremiumChanges, PremiumId,
};
use super::service::{CompensationError, CompensationService};
use super::store::RecordStore;

/// Optional inclusive bounds accepted by every history endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct RangeParams {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl RangeParams {
    fn range(&self) -> Result<DateRange, CompensationError> {
        DateRange::new(self.from, self.to)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CallParams {
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

type SharedService<S> = State<Arc<CompensationService<S>>>;

/// Router builder exposing manager, call processing, and premium endpoints.
pub fn compensation_router<S>(service: Arc<CompensationService<S>>) -> Router
where
    S: RecordStore + 'static,
{
    Router::new()
        .route(
            "/managers",
            get(list_managers_handler::<S>).post(create_manager_handler::<S>),
        )
        .route("/managers/bonuses", get(all_bonuses_handler::<S>))
        .route("/managers/calls", get(all_calls_handler::<S>))
        .route(
            "/managers/:id",
            get(get_manager_handler::<S>)
                .put(update_manager_handler::<S>)
                .delete(delete_manager_handler::<S>),
        )
        .route("/managers/:id/salary", get(salary_handler::<S>))
        .route("/managers/:id/call", post(call_handler::<S>))
        .route("/managers/:id/bonuses", get(manager_bonuses_handler::<S>))
        .route("/managers/:id/calls", get(manager_calls_handler::<S>))
        .route("/managers/:id/calls/count", get(calls_count_handler::<S>))
        .route(
            "/premiums",
            get(list_premiums_handler::<S>).post(create_premium_handler::<S>),
        )
        .route(
            "/premiums/employee/:id",
            get(employee_premiums_handler::<S>),
        )
        .route(
            "/premiums/:id",
            get(get_premium_handler::<S>)
                .put(update_premium_handler::<S>)
                .delete(delete_premium_handler::<S>),
        )
        .with_state(service)
}

impl IntoResponse for CompensationError {
    fn into_response(self) -> Response {
        let status = match &self {
            CompensationError::NotFound(_) => StatusCode::NOT_FOUND,
            CompensationError::Conflict(_) => StatusCode::CONFLICT,
            CompensationError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CompensationError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

impl From<QueryRejection> for CompensationError {
    fn from(rejection: QueryRejection) -> Self {
        CompensationError::InvalidInput(rejection.body_text())
    }
}

impl From<JsonRejection> for CompensationError {
    fn from(rejection: JsonRejection) -> Self {
        CompensationError::InvalidInput(rejection.body_text())
    }
}

fn accepted(location: String, message: String) -> Response {
    (
        StatusCode::ACCEPTED,
        [(header::LOCATION, location)],
        Json(json!({ "message": message })),
    )
        .into_response()
}

pub(crate) async fn list_managers_handler<S>(
    State(service): SharedService<S>,
) -> Result<Response, CompensationError>
where
    S: RecordStore + 'static,
{
    Ok(Json(service.list_managers()?).into_response())
}

pub(crate) async fn get_manager_handler<S>(
    State(service): SharedService<S>,
    Path(id): Path<u32>,
) -> Result<Response, CompensationError>
where
    S: RecordStore + 'static,
{
    Ok(Json(service.get_manager(ManagerId(id))?).into_response())
}

pub(crate) async fn create_manager_handler<S>(
    State(service): SharedService<S>,
    draft: Result<Json<NewManager>, JsonRejection>,
) -> Result<Response, CompensationError>
where
    S: RecordStore + 'static,
{
    let Json(draft) = draft?;
    let manager = service.create_manager(draft)?;
    let payload = json!({
        "message": format!("Manager {} created successfully.", manager.id),
        "manager": manager,
    });
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/managers/{}", manager.id))],
        Json(payload),
    )
        .into_response())
}

pub(crate) async fn update_manager_handler<S>(
    State(service): SharedService<S>,
    Path(id): Path<u32>,
    changes: Result<Json<ManagerChanges>, JsonRejection>,
) -> Result<Response, CompensationError>
where
    S: RecordStore + 'static,
{
    let Json(changes) = changes?;
    service.update_manager(ManagerId(id), changes)?;
    Ok(accepted(
        format!("/managers/{id}"),
        format!("Manager {id} updated successfully."),
    ))
}

pub(crate) async fn delete_manager_handler<S>(
    State(service): SharedService<S>,
    Path(id): Path<u32>,
) -> Result<Response, CompensationError>
where
    S: RecordStore + 'static,
{
    service.delete_manager(ManagerId(id))?;
    Ok(accepted(
        format!("/managers/{id}"),
        format!("Manager {id} deleted successfully."),
    ))
}

pub(crate) async fn salary_handler<S>(
    State(service): SharedService<S>,
    Path(id): Path<u32>,
) -> Result<Response, CompensationError>
where
    S: RecordStore + 'static,
{
    Ok(Json(service.salary(ManagerId(id))?).into_response())
}

pub(crate) async fn call_handler<S>(
    State(service): SharedService<S>,
    Path(id): Path<u32>,
    params: Result<Query<CallParams>, QueryRejection>,
) -> Result<Response, CompensationError>
where
    S: RecordStore + 'static,
{
    let Query(params) = params?;
    let count = params.count.unwrap_or(1);
    let outcome = service.apply_call_processing(ManagerId(id), count, params.date)?;
    let payload = json!({
        "message": format!("Manager {id} processed {count} call(s) successfully."),
        "outcome": outcome,
    });
    Ok((StatusCode::OK, Json(payload)).into_response())
}

pub(crate) async fn all_bonuses_handler<S>(
    State(service): SharedService<S>,
    params: Result<Query<RangeParams>, QueryRejection>,
) -> Result<Response, CompensationError>
where
    S: RecordStore + 'static,
{
    let Query(params) = params?;
    Ok(Json(service.bonus_history(None, params.range()?)?).into_response())
}

pub(crate) async fn manager_bonuses_handler<S>(
    State(service): SharedService<S>,
    Path(id): Path<u32>,
    params: Result<Query<RangeParams>, QueryRejection>,
) -> Result<Response, CompensationError>
where
    S: RecordStore + 'static,
{
    let Query(params) = params?;
    let range = params.range()?;
    Ok(Json(service.bonus_history(Some(ManagerId(id)), range)?).into_response())
}

pub(crate) async fn all_calls_handler<S>(
    State(service): SharedService<S>,
    params: Result<Query<RangeParams>, QueryRejection>,
) -> Result<Response, CompensationError>
where
    S: RecordStore + 'static,
{
    let Query(params) = params?;
    Ok(Json(service.processed_calls_history(None, params.range()?)?).into_response())
}

pub(crate) async fn manager_calls_handler<S>(
    State(service): SharedService<S>,
    Path(id): Path<u32>,
    params: Result<Query<RangeParams>, QueryRejection>,
) -> Result<Response, CompensationError>
where
    S: RecordStore + 'static,
{
    let Query(params) = params?;
    let range = params.range()?;
    Ok(Json(service.processed_calls_history(Some(ManagerId(id)), range)?).into_response())
}

pub(crate) async fn calls_count_handler<S>(
    State(service): SharedService<S>,
    Path(id): Path<u32>,
    params: Result<Query<RangeParams>, QueryRejection>,
) -> Result<Response, CompensationError>
where
    S: RecordStore + 'static,
{
    let Query(params) = params?;
    let range = params.range()?;
    let count = service.processed_calls_count(ManagerId(id), range)?;
    Ok(Json(json!({ "id": id, "count": count })).into_response())
}

pub(crate) async fn list_premiums_handler<S>(
    State(service): SharedService<S>,
) -> Result<Response, CompensationError>
where
    S: RecordStore + 'static,
{
    Ok(Json(service.list_premiums(None)?).into_response())
}

pub(crate) async fn employee_premiums_handler<S>(
    State(service): SharedService<S>,
    Path(id): Path<u32>,
) -> Result<Response, CompensationError>
where
    S: RecordStore + 'static,
{
    Ok(Json(service.list_premiums(Some(ManagerId(id)))?).into_response())
}

pub(crate) async fn get_premium_handler<S>(
    State(service): SharedService<S>,
    Path(id): Path<u32>,
) -> Result<Response, CompensationError>
where
    S: RecordStore + 'static,
{
    Ok(Json(service.get_premium(PremiumId(id))?).into_response())
}

pub(crate) async fn create_premium_handler<S>(
    State(service): SharedService<S>,
    draft: Result<Json<NewPremium>, JsonRejection>,
) -> Result<Response, CompensationError>
where
    S: RecordStore + 'static,
{
    let Json(draft) = draft?;
    let premium = service.create_premium(draft)?;
    let payload = json!({
        "message": format!("Premium {} created successfully.", premium.id),
        "premium": premium,
    });
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/premiums/{}", premium.id))],
        Json(payload),
    )
        .into_response())
}

pub(crate) async fn update_premium_handler<S>(
    State(service): SharedService<S>,
    Path(id): Path<u32>,
    changes: Result<Json<PremiumChanges>, JsonRejection>,
) -> Result<Response, CompensationError>
where
    S: RecordStore + 'static,
{
    let Json(changes) = changes?;
    service.update_premium(PremiumId(id), changes)?;
    Ok(accepted(
        format!("/premiums/{id}"),
        format!("Premium {id} updated successfully."),
    ))
}

pub(crate) async fn delete_premium_handler<S>(
    State(service): SharedService<S>,
    Path(id): Path<u32>,
) -> Result<Response, CompensationError>
where
    S: RecordStore + 'static,
{
    service.delete_premium(PremiumId(id))?;
    Ok(accepted(
        format!("/premiums/{id}"),
        format!("Premium {id} deleted successfully."),
    ))
}

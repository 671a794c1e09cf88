use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    commands::custody::{
        CreateTransferCommand, CreateTransferResult, OpenShiftCommand, OpenShiftResult,
        ReceiveTransferCommand, ReceiveTransferResult, RecordCountCommand, RecordCountResult,
        VendorPaymentInput,
    },
    entities::register,
    errors::ServiceError,
    models::RegisterKind,
    queries::custody_queries::{ActiveOpening, PendingTransfer, UntransferredCount},
    ApiResponse, ApiResult, AppState,
};

type Created<T> = (StatusCode, Json<ApiResponse<T>>);

fn created<T>(data: T) -> Created<T> {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}

/// POST /api/v1/shifts
pub async fn open_shift(
    State(state): State<AppState>,
    Json(command): Json<OpenShiftCommand>,
) -> Result<Created<OpenShiftResult>, ServiceError> {
    let result = state.custody.open_shift(command).await?;
    Ok(created(result))
}

#[derive(Debug, Deserialize)]
pub struct RecordCountRequest {
    pub opening_id: Uuid,
    pub counted_amount: rust_decimal::Decimal,
    pub final_amount: rust_decimal::Decimal,
    pub comment: Option<String>,
    #[serde(default)]
    pub vendor_payments: Vec<VendorPaymentInput>,
}

/// POST /api/v1/counts
pub async fn record_count(
    State(state): State<AppState>,
    Json(request): Json<RecordCountRequest>,
) -> Result<Created<RecordCountResult>, ServiceError> {
    let command = RecordCountCommand {
        opening_id: request.opening_id,
        counted_amount: request.counted_amount,
        final_amount: request.final_amount,
        comment: request.comment,
        vendor_payments: request.vendor_payments,
    };
    let result = state.custody.record_count(command).await?;
    Ok(created(result))
}

/// POST /api/v1/transfers
pub async fn create_transfer(
    State(state): State<AppState>,
    Json(command): Json<CreateTransferCommand>,
) -> Result<Created<CreateTransferResult>, ServiceError> {
    let result = state.custody.create_transfer(command).await?;
    Ok(created(result))
}

#[derive(Debug, Deserialize)]
pub struct ReceiveTransferRequest {
    pub receiving_user_id: Uuid,
    pub received_amount: rust_decimal::Decimal,
    pub comment: Option<String>,
}

/// POST /api/v1/transfers/{id}/reception
pub async fn receive_transfer(
    State(state): State<AppState>,
    Path(transfer_id): Path<Uuid>,
    Json(request): Json<ReceiveTransferRequest>,
) -> Result<Created<ReceiveTransferResult>, ServiceError> {
    let command = ReceiveTransferCommand {
        transfer_id,
        receiving_user_id: request.receiving_user_id,
        received_amount: request.received_amount,
        comment: request.comment,
    };
    let result = state.custody.receive_transfer(command).await?;
    Ok(created(result))
}

/// GET /api/v1/transfers/pending
pub async fn list_pending_transfers(State(state): State<AppState>) -> ApiResult<Vec<PendingTransfer>> {
    let pending = state.custody.pending_transfers().await?;
    Ok(Json(ApiResponse::success(pending)))
}

#[derive(Debug, Deserialize)]
pub struct ActiveOpeningParams {
    pub register_id: Uuid,
    pub user_id: Uuid,
}

/// GET /api/v1/openings/active?register_id=&user_id=
///
/// Returns `data: null` when the pair has no open shift; absence is a normal
/// answer here, not a 404.
pub async fn get_active_opening(
    State(state): State<AppState>,
    Query(params): Query<ActiveOpeningParams>,
) -> ApiResult<Option<ActiveOpening>> {
    let active = state
        .custody
        .active_opening(params.register_id, params.user_id)
        .await?;
    Ok(Json(ApiResponse::success(active)))
}

/// GET /api/v1/counts/latest-untransferred
pub async fn get_latest_untransferred_count(
    State(state): State<AppState>,
) -> ApiResult<Option<UntransferredCount>> {
    let latest = state.custody.latest_untransferred_count().await?;
    Ok(Json(ApiResponse::success(latest)))
}

#[derive(Debug, Deserialize)]
pub struct ListRegistersParams {
    pub kind: Option<RegisterKind>,
}

/// GET /api/v1/registers?kind=
pub async fn list_registers(
    State(state): State<AppState>,
    Query(params): Query<ListRegistersParams>,
) -> ApiResult<Vec<register::Model>> {
    let registers = state.custody.list_registers(params.kind).await?;
    Ok(Json(ApiResponse::success(registers)))
}

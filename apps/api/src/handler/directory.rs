//! # ディレクトリハンドラ
//!
//! Department / Company / Employee レコードを ID で削除するエンドポイントを
//! 提供する。
//!
//! ## エンドポイント
//!
//! - `POST /api/method/delete_department`
//! - `POST /api/method/delete_company`
//! - `POST /api/method/delete_employee`
//!
//! ## ステータスコード
//!
//! 削除の失敗（該当レコードなし・ストアエラー）でも HTTP 200 のまま
//! エンベロープの失敗形を返す。401 になるのはベアラートークン認証の
//! 失敗のみ。

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use ems_domain::record::{RecordId, RecordKind};
use ems_infra::repository::UserRepository;
use ems_shared::{ApiResponse, event_log::event, log_business_event};
use serde::Deserialize;

use crate::{
    error::{DirectoryError, authenticate},
    extract::JsonOrForm,
    usecase::DirectoryUseCase,
};

/// ディレクトリハンドラの共有状態
pub struct DirectoryState {
    /// ベアラートークン認証用
    pub user_repository: Arc<dyn UserRepository>,
    pub usecase:         Arc<dyn DirectoryUseCase>,
}

// --- リクエスト型 ---

/// 部署削除リクエスト
#[derive(Debug, Deserialize)]
pub struct DeleteDepartmentRequest {
    pub department_id: String,
}

/// 会社削除リクエスト
#[derive(Debug, Deserialize)]
pub struct DeleteCompanyRequest {
    pub company_id: String,
}

/// 従業員削除リクエスト
#[derive(Debug, Deserialize)]
pub struct DeleteEmployeeRequest {
    pub employee_id: String,
}

// --- ハンドラ ---

/// POST /api/method/delete_department
#[tracing::instrument(skip_all)]
pub async fn delete_department(
    State(state): State<Arc<DirectoryState>>,
    headers: HeaderMap,
    JsonOrForm(req): JsonOrForm<DeleteDepartmentRequest>,
) -> Response {
    if let Err(response) = authenticate(state.user_repository.as_ref(), &headers).await {
        return response;
    }
    delete_record_response(&state, RecordKind::Department, req.department_id).await
}

/// POST /api/method/delete_company
#[tracing::instrument(skip_all)]
pub async fn delete_company(
    State(state): State<Arc<DirectoryState>>,
    headers: HeaderMap,
    JsonOrForm(req): JsonOrForm<DeleteCompanyRequest>,
) -> Response {
    if let Err(response) = authenticate(state.user_repository.as_ref(), &headers).await {
        return response;
    }
    delete_record_response(&state, RecordKind::Company, req.company_id).await
}

/// POST /api/method/delete_employee
#[tracing::instrument(skip_all)]
pub async fn delete_employee(
    State(state): State<Arc<DirectoryState>>,
    headers: HeaderMap,
    JsonOrForm(req): JsonOrForm<DeleteEmployeeRequest>,
) -> Response {
    if let Err(response) = authenticate(state.user_repository.as_ref(), &headers).await {
        return response;
    }
    delete_record_response(&state, RecordKind::Employee, req.employee_id).await
}

/// 削除を実行し、結果をエンベロープに変換する（3 エンドポイント共通）
async fn delete_record_response(
    state: &DirectoryState,
    kind: RecordKind,
    raw_id: String,
) -> Response {
    let id = match RecordId::new(raw_id) {
        Ok(id) => id,
        Err(error) => {
            return Json(ApiResponse::<()>::failure(error.to_string())).into_response();
        }
    };

    match state.usecase.delete_record(kind, &id).await {
        Ok(()) => {
            log_business_event!(
                event.category = event::category::DIRECTORY,
                event.action = event::action::RECORD_DELETED,
                event.entity_type = event_entity_type(kind),
                event.entity_id = %id,
                event.result = event::result::SUCCESS,
                "レコード削除"
            );
            Json(ApiResponse::ok_empty()).into_response()
        }
        Err(error) => {
            if let DirectoryError::Infra(infra) = &error {
                tracing::error!(
                    error.category = "infrastructure",
                    error.kind = "record_deletion",
                    span_trace = %infra.span_trace(),
                    "レコード削除で内部エラー: {}",
                    infra
                );
            }
            Json(ApiResponse::<()>::failure(error.to_string())).into_response()
        }
    }
}

/// レコード種別をイベントログの entity_type 定数に対応付ける
fn event_entity_type(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Department => event::entity_type::DEPARTMENT,
        RecordKind::Company => event::entity_type::COMPANY,
        RecordKind::Employee => event::entity_type::EMPLOYEE,
    }
}

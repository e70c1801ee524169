//! # ログインハンドラ
//!
//! メール/パスワードでログインし、API トークンを払い出すエンドポイントを
//! 提供する。
//!
//! ## エンドポイント
//!
//! - `POST /api/method/login_with_credentials`
//!
//! ## ステータスコード
//!
//! このエンドポイントだけが明示的なステータスコードを設定する:
//! 400（フィールド欠落）/ 401（認証失敗）/ 500（内部エラー）。

use std::sync::Arc;

use axum::{Json, extract::State, response::{IntoResponse, Response}};
use ems_domain::role::AccessRole;
use ems_shared::{ApiResponse, event_log::event, log_business_event};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::LoginError,
    extract::JsonOrForm,
    usecase::AuthUseCase,
};

/// ログインハンドラの共有状態
pub struct AuthState {
    pub usecase: Arc<dyn AuthUseCase>,
}

// --- リクエスト/レスポンス型 ---

/// ログインリクエスト
///
/// 欠落チェックをハンドラで行うため、両フィールドとも Option で受ける。
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email:    Option<String>,
    pub password: Option<String>,
}

/// ログインレスポンスデータ
#[derive(Debug, Serialize)]
pub struct LoginResponseData {
    /// `<api_key>:<api_secret>` 形式のベアラークレデンシャル
    pub token: String,
    pub user:  LoginUserResponse,
}

/// ログインユーザー情報
#[derive(Debug, Serialize)]
pub struct LoginUserResponse {
    pub id:    Uuid,
    pub email: String,
    /// 表示名（未設定の場合はメールアドレス）
    pub name:  String,
    pub role:  AccessRole,
}

// --- ハンドラ ---

/// POST /api/method/login_with_credentials
///
/// メール/パスワードでログインし、API トークンを払い出す。
///
/// ## リクエストボディ
///
/// JSON またはフォームエンコード:
///
/// ```json
/// {
///   "email": "user@example.com",
///   "password": "password123"
/// }
/// ```
#[tracing::instrument(skip_all)]
pub async fn login_with_credentials(
    State(state): State<Arc<AuthState>>,
    JsonOrForm(req): JsonOrForm<LoginRequest>,
) -> Response {
    let email = req.email.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    if email.is_empty() || password.is_empty() {
        return LoginError::MissingCredentials.into_response();
    }

    match state.usecase.login(&email, &password).await {
        Ok(outcome) => {
            log_business_event!(
                event.category = event::category::AUTH,
                event.action = event::action::LOGIN_SUCCESS,
                event.entity_type = event::entity_type::USER,
                event.entity_id = %outcome.user.id(),
                event.result = event::result::SUCCESS,
                "ログイン成功"
            );

            let response = ApiResponse::ok(LoginResponseData {
                token: outcome.token.to_credential_string(),
                user:  LoginUserResponse {
                    id:    *outcome.user.id().as_uuid(),
                    email: outcome.user.email().as_str().to_string(),
                    name:  outcome.user.display_name().to_string(),
                    role:  outcome.role,
                },
            });

            Json(response).into_response()
        }
        Err(error) => {
            if matches!(error, LoginError::InvalidCredentials) {
                log_business_event!(
                    event.category = event::category::AUTH,
                    event.action = event::action::LOGIN_FAILURE,
                    event.entity_type = event::entity_type::USER,
                    event.result = event::result::FAILURE,
                    event.reason = "invalid_credentials",
                    "ログイン失敗"
                );
            }
            error.into_response()
        }
    }
}

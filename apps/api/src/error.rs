//! # API エラーハンドリング
//!
//! HTTP API のエラー定義と、axum レスポンスへの変換。
//!
//! ## ステータスコードの方針
//!
//! ログインだけが明示的なステータスコード（400 / 401 / 500）を設定する。
//! 削除・プロフィール更新・パスワード変更はビジネス的な失敗でも
//! HTTP 200 のまま `{"success": false, "message"}` を返す
//! （クライアントがエンベロープの `success` だけを見る設計のため）。
//! ベアラートークン認証の失敗のみ、これらのエンドポイントでも 401 になる。

use axum::{
    Json,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use ems_domain::{DomainError, token::ApiToken, user::User};
use ems_infra::{InfraError, repository::UserRepository};
use ems_shared::ApiResponse;
use subtle::ConstantTimeEq as _;
use thiserror::Error;

/// Authorization ヘッダーのスキーム
///
/// クライアントは `Authorization: token <api_key>:<api_secret>` を送信する。
const TOKEN_SCHEME: &str = "token ";

// --- エラー型 ---

/// ログイン処理で発生するエラー
///
/// ログインはスペック上ステータスコードを明示するため、
/// バリアントごとに HTTP ステータスとメッセージを対応付ける。
#[derive(Debug, Error)]
pub enum LoginError {
    /// email / password の欠落
    #[error("Email and password are required")]
    MissingCredentials,

    /// 認証失敗（ユーザー不存在・パスワード不一致）
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// インフラ起因の予期しないエラー
    #[error(transparent)]
    Infra(#[from] InfraError),
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            LoginError::MissingCredentials => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            LoginError::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            LoginError::Infra(e) => {
                tracing::error!(
                    error.category = "infrastructure",
                    error.kind = "database",
                    span_trace = %e.span_trace(),
                    "ログイン処理で内部エラー: {}",
                    e
                );
                // 内部向け管理ツールのため、エラー文字列をそのまま返す
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };

        (status, Json(ApiResponse::<()>::failure(message))).into_response()
    }
}

/// アカウント操作（プロフィール更新・パスワード変更）で発生するエラー
///
/// HTTP ステータスは変えず、ハンドラがエンベロープの失敗形に変換する。
#[derive(Debug, Error)]
pub enum AccountError {
    /// 入力値のバリデーションエラー
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// インフラ起因の予期しないエラー
    #[error(transparent)]
    Infra(#[from] InfraError),
}

/// ディレクトリレコード削除で発生するエラー
///
/// HTTP ステータスは変えず、ハンドラがエンベロープの失敗形に変換する。
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// 該当レコードなし（ストアの報告をそのまま表現する）
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// インフラ起因の予期しないエラー
    #[error(transparent)]
    Infra(#[from] InfraError),
}

// --- レスポンスヘルパー ---

/// 未認証レスポンス（401）
pub fn unauthorized_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::<()>::failure("Authentication required")),
    )
        .into_response()
}

/// 内部エラーレスポンス（500）
pub fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::failure("Internal server error")),
    )
        .into_response()
}

// --- ベアラートークン認証 ---

/// リクエストのベアラートークンを検証し、セッションユーザーを解決する
///
/// `Authorization: token <api_key>:<api_secret>` ヘッダーをパースし、
/// キーでユーザーを特定、シークレットを定数時間比較で照合する。
///
/// ハンドラ冒頭で呼び出し、`Err` の場合はレスポンスをそのまま返す:
///
/// ```ignore
/// let user = match authenticate(state.user_repository.as_ref(), &headers).await {
///     Ok(user) => user,
///     Err(response) => return response,
/// };
/// ```
pub async fn authenticate(
    user_repository: &dyn UserRepository,
    headers: &HeaderMap,
) -> Result<User, Response> {
    let header_value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(unauthorized_response)?;

    let credential = header_value
        .strip_prefix(TOKEN_SCHEME)
        .ok_or_else(unauthorized_response)?;

    let token = ApiToken::parse(credential.trim()).map_err(|_| unauthorized_response())?;

    let user = user_repository
        .find_by_api_key(token.key())
        .await
        .map_err(|e| {
            tracing::error!(
                error.category = "infrastructure",
                error.kind = "database",
                "トークン認証でユーザー検索に失敗: {}",
                e
            );
            internal_error_response()
        })?
        .ok_or_else(unauthorized_response)?;

    let Some(stored_secret) = user.api_secret() else {
        return Err(unauthorized_response());
    };

    let secret_matches: bool = stored_secret
        .as_str()
        .as_bytes()
        .ct_eq(token.secret().as_str().as_bytes())
        .into();

    if !secret_matches {
        return Err(unauthorized_response());
    }

    Ok(user)
}

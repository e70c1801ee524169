//! # アカウントハンドラ
//!
//! セッションユーザー自身のプロフィール更新とパスワード変更のエンドポイント
//! を提供する。
//!
//! ## エンドポイント
//!
//! - `POST /api/method/update_user_profile`
//! - `POST /api/method/change_user_password`
//!
//! ## ステータスコード
//!
//! ビジネス的な失敗（メール変更の拒否、旧パスワード不一致、ストアエラー）
//! でも HTTP 200 のままエンベロープの失敗形を返す。401 になるのは
//! ベアラートークン認証の失敗のみ。

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use ems_domain::password::PlainPassword;
use ems_infra::repository::UserRepository;
use ems_shared::{ApiResponse, event_log::event, log_business_event};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AccountError, authenticate},
    extract::JsonOrForm,
    usecase::{
        AccountUseCase,
        PasswordChangeOutcome,
        ProfileUpdateOutcome,
        UpdateProfileInput,
    },
};

/// メール変更拒否のメッセージ
const EMAIL_CHANGE_REJECTED_MESSAGE: &str = "Email cannot be changed. Contact admin.";

/// 旧パスワード不一致のメッセージ
const OLD_PASSWORD_MISMATCH_MESSAGE: &str = "Current password is incorrect";

/// アカウントハンドラの共有状態
pub struct AccountState {
    /// ベアラートークン認証用
    pub user_repository: Arc<dyn UserRepository>,
    pub usecase:         Arc<dyn AccountUseCase>,
}

// --- リクエスト/レスポンス型 ---

/// プロフィール更新リクエスト
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub email:     Option<String>,
}

/// プロフィール更新レスポンスデータ（更新後の状態）
#[derive(Debug, Serialize)]
pub struct ProfileResponseData {
    pub full_name: Option<String>,
    pub email:     String,
}

/// パスワード変更リクエスト
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

// --- ハンドラ ---

/// POST /api/method/update_user_profile
///
/// セッションユーザーの表示名を更新する。
/// メールアドレスの変更要求は拒否する（失敗として報告、エラーではない）。
#[tracing::instrument(skip_all)]
pub async fn update_user_profile(
    State(state): State<Arc<AccountState>>,
    headers: HeaderMap,
    JsonOrForm(req): JsonOrForm<UpdateProfileRequest>,
) -> Response {
    let user = match authenticate(state.user_repository.as_ref(), &headers).await {
        Ok(user) => user,
        Err(response) => return response,
    };

    let input = UpdateProfileInput {
        full_name: req.full_name,
        email:     req.email,
    };

    match state.usecase.update_profile(&user, input).await {
        Ok(ProfileUpdateOutcome::Updated { full_name, email }) => {
            log_business_event!(
                event.category = event::category::ACCOUNT,
                event.action = event::action::PROFILE_UPDATED,
                event.entity_type = event::entity_type::USER,
                event.entity_id = %user.id(),
                event.result = event::result::SUCCESS,
                "プロフィール更新"
            );
            Json(ApiResponse::ok(ProfileResponseData { full_name, email })).into_response()
        }
        Ok(ProfileUpdateOutcome::EmailChangeRejected) => {
            Json(ApiResponse::<()>::failure(EMAIL_CHANGE_REJECTED_MESSAGE)).into_response()
        }
        Err(error) => {
            log_account_error("プロフィール更新", &error);
            Json(ApiResponse::<()>::failure(error.to_string())).into_response()
        }
    }
}

/// POST /api/method/change_user_password
///
/// 旧パスワードを検証し、一致した場合のみセッションユーザーのパスワードを
/// 変更する。
#[tracing::instrument(skip_all)]
pub async fn change_user_password(
    State(state): State<Arc<AccountState>>,
    headers: HeaderMap,
    JsonOrForm(req): JsonOrForm<ChangePasswordRequest>,
) -> Response {
    let user = match authenticate(state.user_repository.as_ref(), &headers).await {
        Ok(user) => user,
        Err(response) => return response,
    };

    let old_password = PlainPassword::new(req.old_password);
    let new_password = PlainPassword::new(req.new_password);

    match state
        .usecase
        .change_password(&user, &old_password, &new_password)
        .await
    {
        Ok(PasswordChangeOutcome::Changed) => {
            log_business_event!(
                event.category = event::category::ACCOUNT,
                event.action = event::action::PASSWORD_CHANGED,
                event.entity_type = event::entity_type::USER,
                event.entity_id = %user.id(),
                event.result = event::result::SUCCESS,
                "パスワード変更"
            );
            Json(ApiResponse::ok_empty()).into_response()
        }
        Ok(PasswordChangeOutcome::OldPasswordMismatch) => {
            Json(ApiResponse::<()>::failure(OLD_PASSWORD_MISMATCH_MESSAGE)).into_response()
        }
        Err(error) => {
            log_account_error("パスワード変更", &error);
            Json(ApiResponse::<()>::failure(error.to_string())).into_response()
        }
    }
}

/// インフラ起因のアカウント操作エラーをログに出力する
///
/// バリデーションエラーはクライアント起因のためログ対象外。
fn log_account_error(context: &str, error: &AccountError) {
    if let AccountError::Infra(infra) = error {
        tracing::error!(
            error.category = "infrastructure",
            error.kind = "database",
            span_trace = %infra.span_trace(),
            "{}で内部エラー: {}",
            context,
            infra
        );
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::{
        Router,
        body::Body,
        http::{Method, Request, StatusCode},
        routing::post,
    };
    use chrono::DateTime;
    use ems_domain::{
        password::PasswordHash,
        token::{ApiKey, ApiSecret, ApiToken},
        user::{Email, User, UserId},
        value_objects::FullName,
    };
    use ems_infra::InfraError;
    use tower::ServiceExt as _;

    use super::*;

    // テスト用スタブ

    struct StubUserRepository {
        user: Option<User>,
    }

    #[async_trait]
    impl UserRepository for StubUserRepository {
        async fn find_by_email(&self, _email: &Email) -> Result<Option<User>, InfraError> {
            Ok(self.user.clone())
        }

        async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, InfraError> {
            Ok(self.user.clone())
        }

        async fn find_by_api_key(
            &self,
            _api_key: &ApiKey,
        ) -> Result<Option<User>, InfraError> {
            Ok(self.user.clone())
        }

        async fn update_full_name(
            &self,
            _id: &UserId,
            _full_name: &FullName,
        ) -> Result<(), InfraError> {
            Ok(())
        }

        async fn update_password_hash(
            &self,
            _id: &UserId,
            _password_hash: &PasswordHash,
        ) -> Result<(), InfraError> {
            Ok(())
        }

        async fn update_api_credentials(
            &self,
            _id: &UserId,
            _token: &ApiToken,
        ) -> Result<(), InfraError> {
            Ok(())
        }

        async fn update_last_login(&self, _id: &UserId) -> Result<(), InfraError> {
            Ok(())
        }
    }

    enum StubBehavior {
        Updated,
        EmailRejected,
        PasswordChanged,
        PasswordMismatch,
        InfraError,
    }

    struct StubAccountUseCase {
        behavior: StubBehavior,
    }

    #[async_trait]
    impl AccountUseCase for StubAccountUseCase {
        async fn update_profile(
            &self,
            user: &User,
            input: UpdateProfileInput,
        ) -> Result<ProfileUpdateOutcome, AccountError> {
            match self.behavior {
                StubBehavior::EmailRejected => Ok(ProfileUpdateOutcome::EmailChangeRejected),
                StubBehavior::InfraError => {
                    Err(AccountError::Infra(InfraError::unexpected("boom")))
                }
                _ => Ok(ProfileUpdateOutcome::Updated {
                    full_name: input.full_name,
                    email:     user.email().as_str().to_string(),
                }),
            }
        }

        async fn change_password(
            &self,
            _user: &User,
            _old_password: &PlainPassword,
            _new_password: &PlainPassword,
        ) -> Result<PasswordChangeOutcome, AccountError> {
            match self.behavior {
                StubBehavior::PasswordMismatch => {
                    Ok(PasswordChangeOutcome::OldPasswordMismatch)
                }
                StubBehavior::InfraError => {
                    Err(AccountError::Infra(InfraError::unexpected("boom")))
                }
                _ => Ok(PasswordChangeOutcome::Changed),
            }
        }
    }

    fn session_user() -> User {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        User::from_db(
            UserId::new(),
            Email::new("user@example.com").unwrap(),
            Some(FullName::new("Test User").unwrap()),
            PasswordHash::new("$argon2id$v=19$dummy"),
            Some(ApiKey::new("abc123")),
            Some(ApiSecret::new("xyz789")),
            None,
            now,
            now,
        )
    }

    fn create_test_app(behavior: StubBehavior) -> Router {
        let state = Arc::new(AccountState {
            user_repository: Arc::new(StubUserRepository {
                user: Some(session_user()),
            }),
            usecase:         Arc::new(StubAccountUseCase { behavior }),
        });

        Router::new()
            .route("/api/method/update_user_profile", post(update_user_profile))
            .route(
                "/api/method/change_user_password",
                post(change_user_password),
            )
            .with_state(state)
    }

    fn authed_json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .header("authorization", "token abc123:xyz789")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    }

    async fn response_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    // update_user_profile のテスト

    #[tokio::test]
    async fn test_update_profile_成功で更新後の状態が返る() {
        // Given
        let sut = create_test_app(StubBehavior::Updated);

        let request = authed_json_request(
            "/api/method/update_user_profile",
            serde_json::json!({ "full_name": "New Name" }),
        );

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["full_name"], "New Name");
        assert_eq!(json["data"]["email"], "user@example.com");
    }

    #[tokio::test]
    async fn test_update_profile_メール変更拒否は200のまま失敗形() {
        // Given
        let sut = create_test_app(StubBehavior::EmailRejected);

        let request = authed_json_request(
            "/api/method/update_user_profile",
            serde_json::json!({ "email": "someone-else@example.com" }),
        );

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Email cannot be changed. Contact admin.");
    }

    #[tokio::test]
    async fn test_update_profile_内部エラーも200のまま失敗形() {
        // Given
        let sut = create_test_app(StubBehavior::InfraError);

        let request = authed_json_request(
            "/api/method/update_user_profile",
            serde_json::json!({ "full_name": "New Name" }),
        );

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "boom");
    }

    #[tokio::test]
    async fn test_update_profile_未認証で401() {
        // Given
        let sut = create_test_app(StubBehavior::Updated);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/method/update_user_profile")
            .header("content-type", "application/json")
            // Authorization ヘッダーなし
            .body(Body::from(r#"{"full_name": "New Name"}"#))
            .unwrap();

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // change_user_password のテスト

    #[tokio::test]
    async fn test_change_password_成功でsuccessのみ返る() {
        // Given
        let sut = create_test_app(StubBehavior::PasswordChanged);

        let request = authed_json_request(
            "/api/method/change_user_password",
            serde_json::json!({
                "old_password": "oldpassword",
                "new_password": "newpassword"
            }),
        );

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json, serde_json::json!({ "success": true }));
    }

    #[tokio::test]
    async fn test_change_password_旧パスワード不一致は200のまま失敗形() {
        // Given
        let sut = create_test_app(StubBehavior::PasswordMismatch);

        let request = authed_json_request(
            "/api/method/change_user_password",
            serde_json::json!({
                "old_password": "wrongpassword",
                "new_password": "newpassword"
            }),
        );

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Current password is incorrect");
    }

    #[tokio::test]
    async fn test_change_password_未認証で401() {
        // Given
        let sut = create_test_app(StubBehavior::PasswordChanged);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/method/change_user_password")
            .header("content-type", "application/json")
            .header("authorization", "token abc123:wrongsecret")
            .body(Body::from(
                r#"{"old_password": "a", "new_password": "b"}"#,
            ))
            .unwrap();

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

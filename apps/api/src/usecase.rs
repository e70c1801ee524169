//! # ユースケース層
//!
//! API のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **トレイトベースの設計**: テスト可能性のためトレイトを定義
//! - **依存性注入**: リポジトリとパスワード検証器を外部から注入
//! - **薄いハンドラ**: ハンドラは薄く保ち、ロジックはユースケースに集約
//! - **ビジネス的な却下はエラーにしない**: メール変更の拒否や旧パスワード
//!   不一致は Outcome 列挙型の値として返し、`Err` はインフラ・バリデーション
//!   起因の失敗に限定する

pub mod account;
pub mod auth;
pub mod directory;

pub use account::{
    AccountUseCaseImpl,
    PasswordChangeOutcome,
    ProfileUpdateOutcome,
    UpdateProfileInput,
};
use async_trait::async_trait;
pub use auth::{AuthUseCaseImpl, LoginOutcome};
pub use directory::DirectoryUseCaseImpl;
use ems_domain::{
    password::PlainPassword,
    record::{RecordId, RecordKind},
    user::User,
};

use crate::error::{AccountError, DirectoryError, LoginError};

/// 認証ユースケーストレイト
#[async_trait]
pub trait AuthUseCase: Send + Sync {
    /// メール/パスワードでログインし、API トークンを払い出す
    ///
    /// ## 戻り値
    ///
    /// - `Ok(LoginOutcome)`: トークン・ユーザー・ロール
    /// - `Err(LoginError)`: 認証失敗またはインフラエラー
    async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, LoginError>;
}

/// アカウントユースケーストレイト
#[async_trait]
pub trait AccountUseCase: Send + Sync {
    /// セッションユーザーのプロフィールを更新する
    async fn update_profile(
        &self,
        user: &User,
        input: UpdateProfileInput,
    ) -> Result<ProfileUpdateOutcome, AccountError>;

    /// セッションユーザーのパスワードを変更する
    async fn change_password(
        &self,
        user: &User,
        old_password: &PlainPassword,
        new_password: &PlainPassword,
    ) -> Result<PasswordChangeOutcome, AccountError>;
}

/// ディレクトリユースケーストレイト
#[async_trait]
pub trait DirectoryUseCase: Send + Sync {
    /// ディレクトリレコードを ID で削除する
    async fn delete_record(&self, kind: RecordKind, id: &RecordId)
    -> Result<(), DirectoryError>;
}

/// AuthUseCaseImpl に AuthUseCase トレイトを実装
#[async_trait]
impl AuthUseCase for AuthUseCaseImpl {
    async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, LoginError> {
        self.login(email, password).await
    }
}

/// AccountUseCaseImpl に AccountUseCase トレイトを実装
#[async_trait]
impl AccountUseCase for AccountUseCaseImpl {
    async fn update_profile(
        &self,
        user: &User,
        input: UpdateProfileInput,
    ) -> Result<ProfileUpdateOutcome, AccountError> {
        self.update_profile(user, input).await
    }

    async fn change_password(
        &self,
        user: &User,
        old_password: &PlainPassword,
        new_password: &PlainPassword,
    ) -> Result<PasswordChangeOutcome, AccountError> {
        self.change_password(user, old_password, new_password).await
    }
}

/// DirectoryUseCaseImpl に DirectoryUseCase トレイトを実装
#[async_trait]
impl DirectoryUseCase for DirectoryUseCaseImpl {
    async fn delete_record(
        &self,
        kind: RecordKind,
        id: &RecordId,
    ) -> Result<(), DirectoryError> {
        self.delete_record(kind, id).await
    }
}

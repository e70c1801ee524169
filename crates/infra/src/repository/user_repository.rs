//! # UserRepository
//!
//! ユーザー情報の永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **粒度の細かい更新**: 表示名・パスワードハッシュ・API クレデンシャルを
//!   個別の UPDATE で書き込む（全カラム保存はしない）
//! - **実行時バインド**: `sqlx::query` + `try_get` で行をエンティティに
//!   マッピングする

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ems_domain::{
    password::PasswordHash,
    token::{ApiKey, ApiSecret, ApiToken},
    user::{Email, User, UserId},
    value_objects::FullName,
};
use sqlx::{PgPool, Row as _, postgres::PgRow};

use crate::error::InfraError;

/// ユーザーリポジトリトレイト
///
/// ユーザー情報の永続化操作を定義する。
/// インフラ層で具体的な実装を提供し、ユースケース層から利用する。
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// メールアドレスでユーザーを検索
    ///
    /// # 戻り値
    ///
    /// - `Ok(Some(user))`: ユーザーが見つかった場合
    /// - `Ok(None)`: ユーザーが見つからない場合
    /// - `Err(_)`: データベースエラー
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, InfraError>;

    /// ID でユーザーを検索
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError>;

    /// API キーでユーザーを検索
    ///
    /// ベアラートークン認証時のユーザー特定に使用する。
    async fn find_by_api_key(&self, api_key: &ApiKey) -> Result<Option<User>, InfraError>;

    /// 表示名を更新
    async fn update_full_name(
        &self,
        id: &UserId,
        full_name: &FullName,
    ) -> Result<(), InfraError>;

    /// パスワードハッシュを更新
    async fn update_password_hash(
        &self,
        id: &UserId,
        password_hash: &PasswordHash,
    ) -> Result<(), InfraError>;

    /// API クレデンシャルを更新
    ///
    /// ログイン時、キー/シークレットが未発行のユーザーに対して呼び出される。
    async fn update_api_credentials(
        &self,
        id: &UserId,
        token: &ApiToken,
    ) -> Result<(), InfraError>;

    /// 最終ログイン日時を更新
    async fn update_last_login(&self, id: &UserId) -> Result<(), InfraError>;
}

/// PostgreSQL 実装の UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// users テーブルの SELECT カラムリスト
const USER_COLUMNS: &str = "id, email, full_name, password_hash, api_key, api_secret, \
                            last_login_at, created_at, updated_at";

/// 行をユーザーエンティティにマッピングする
fn map_user_row(row: &PgRow) -> Result<User, InfraError> {
    let id: uuid::Uuid = row.try_get("id")?;
    let email: String = row.try_get("email")?;
    let full_name: Option<String> = row.try_get("full_name")?;
    let password_hash: String = row.try_get("password_hash")?;
    let api_key: Option<String> = row.try_get("api_key")?;
    let api_secret: Option<String> = row.try_get("api_secret")?;
    let last_login_at: Option<DateTime<Utc>> = row.try_get("last_login_at")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

    let full_name = full_name
        .map(FullName::new)
        .transpose()
        .map_err(|e| InfraError::unexpected(e.to_string()))?;

    Ok(User::from_db(
        UserId::from_uuid(id),
        Email::new(&email).map_err(|e| InfraError::unexpected(e.to_string()))?,
        full_name,
        PasswordHash::new(password_hash),
        api_key.map(ApiKey::new),
        api_secret.map(ApiSecret::new),
        last_login_at,
        created_at,
        updated_at,
    ))
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, InfraError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_user_row).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_user_row).transpose()
    }

    async fn find_by_api_key(&self, api_key: &ApiKey) -> Result<Option<User>, InfraError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE api_key = $1"
        ))
        .bind(api_key.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_user_row).transpose()
    }

    async fn update_full_name(
        &self,
        id: &UserId,
        full_name: &FullName,
    ) -> Result<(), InfraError> {
        sqlx::query("UPDATE users SET full_name = $2, updated_at = NOW() WHERE id = $1")
            .bind(id.as_uuid())
            .bind(full_name.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn update_password_hash(
        &self,
        id: &UserId,
        password_hash: &PasswordHash,
    ) -> Result<(), InfraError> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id.as_uuid())
            .bind(password_hash.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn update_api_credentials(
        &self,
        id: &UserId,
        token: &ApiToken,
    ) -> Result<(), InfraError> {
        sqlx::query(
            "UPDATE users SET api_key = $2, api_secret = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(token.key().as_str())
        .bind(token.secret().as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_last_login(&self, id: &UserId) -> Result<(), InfraError> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

//! # ユーザー
//!
//! ユーザーエンティティとそれに関連する値オブジェクトを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`User`] | ユーザー | ログイン可能なアカウント。API クレデンシャルの保有者 |
//! | [`Email`] | メールアドレス | ログイン ID。プロフィール更新では変更不可 |
//!
//! ## 設計方針
//!
//! - **Newtype パターン**: UserId は UUID をラップし、型安全性を確保
//! - **不変性**: エンティティフィールドは不変、変更は `with_*` メソッド経由
//! - **バリデーション**: 値オブジェクトの生成時に検証ロジックを実行
//!
//! このサービスはユーザーを新規作成しない（アカウントは外部でシードされる）
//! ため、エンティティの構築は [`User::from_db`] のみを提供する。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    DomainError,
    password::PasswordHash,
    token::{ApiKey, ApiSecret, ApiToken},
    value_objects::FullName,
};

define_uuid_id! {
    /// ユーザー ID（一意識別子）
    ///
    /// UUID v7 を使用し、生成順にソート可能。
    pub struct UserId;
}

/// メールアドレス（値オブジェクト）
///
/// ログイン ID として使用される。
/// 生成時にバリデーションを実行し、不正な値の作成を防ぐ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// メールアドレスを作成する
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない
    /// - `local@domain` の形式である
    /// - 最大 255 文字
    ///
    /// # エラー
    ///
    /// バリデーションに失敗した場合は `DomainError::Validation` を返す。
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.is_empty() {
            return Err(DomainError::Validation("Email is required".to_string()));
        }

        let Some((local, domain)) = value.split_once('@') else {
            return Err(DomainError::Validation(
                "Invalid email address format".to_string(),
            ));
        };

        if local.is_empty() || domain.is_empty() {
            return Err(DomainError::Validation(
                "Invalid email address format".to_string(),
            ));
        }

        if value.len() > 255 {
            return Err(DomainError::Validation(
                "Email must be 255 characters or fewer".to_string(),
            ));
        }

        Ok(Self(value))
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 所有権を持つ文字列に変換する
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ユーザーエンティティ
///
/// ログイン可能なアカウントを表現する。パスワードハッシュと、発行済みの
/// API クレデンシャル（キー/シークレット）を保持する。
///
/// # 不変条件
///
/// - `email` はシステム内で一意
/// - `api_key` は存在する場合システム内で一意
/// - `api_key` と `api_secret` は対で発行される（片方だけ存在する状態は
///   ログイン時に補完される）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: Email,
    full_name: Option<FullName>,
    password_hash: PasswordHash,
    api_key: Option<ApiKey>,
    api_secret: Option<ApiSecret>,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// 既存のデータからユーザーを復元する（データベースから取得時）
    #[allow(clippy::too_many_arguments)]
    pub fn from_db(
        id: UserId,
        email: Email,
        full_name: Option<FullName>,
        password_hash: PasswordHash,
        api_key: Option<ApiKey>,
        api_secret: Option<ApiSecret>,
        last_login_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            full_name,
            password_hash,
            api_key,
            api_secret,
            last_login_at,
            created_at,
            updated_at,
        }
    }

    // Getter メソッド

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn full_name(&self) -> Option<&FullName> {
        self.full_name.as_ref()
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn api_key(&self) -> Option<&ApiKey> {
        self.api_key.as_ref()
    }

    pub fn api_secret(&self) -> Option<&ApiSecret> {
        self.api_secret.as_ref()
    }

    pub fn last_login_at(&self) -> Option<DateTime<Utc>> {
        self.last_login_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // ビジネスロジックメソッド

    /// 画面表示用の名前を取得する
    ///
    /// 表示名が未設定の場合はメールアドレスにフォールバックする。
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_ref()
            .map(FullName::as_str)
            .unwrap_or_else(|| self.email.as_str())
    }

    /// 発行済みの API クレデンシャルを取得する
    ///
    /// キーとシークレットの両方が揃っている場合のみ `Some` を返す。
    pub fn api_credentials(&self) -> Option<ApiToken> {
        match (&self.api_key, &self.api_secret) {
            (Some(key), Some(secret)) => Some(ApiToken::new(key.clone(), secret.clone())),
            _ => None,
        }
    }

    /// API クレデンシャルを設定した新しいインスタンスを返す
    pub fn with_api_credentials(self, token: ApiToken, now: DateTime<Utc>) -> Self {
        Self {
            api_key: Some(token.key().clone()),
            api_secret: Some(token.secret().clone()),
            updated_at: now,
            ..self
        }
    }

    /// 表示名を変更した新しいインスタンスを返す
    pub fn with_full_name(self, full_name: FullName, now: DateTime<Utc>) -> Self {
        Self {
            full_name: Some(full_name),
            updated_at: now,
            ..self
        }
    }

    /// パスワードハッシュを差し替えた新しいインスタンスを返す
    pub fn with_password_hash(self, password_hash: PasswordHash, now: DateTime<Utc>) -> Self {
        Self {
            password_hash,
            updated_at: now,
            ..self
        }
    }

    /// 最終ログイン日時を更新した新しいインスタンスを返す
    pub fn with_last_login_updated(self, now: DateTime<Utc>) -> Self {
        Self {
            last_login_at: Some(now),
            updated_at: now,
            ..self
        }
    }
}

//! # API トークン
//!
//! ベアラートークン認証に使用する API キー/シークレットの値オブジェクトを
//! 定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`ApiKey`] | API キー | ユーザーを識別する公開側の値 |
//! | [`ApiSecret`] | API シークレット | キーと対で検証される秘密側の値 |
//! | [`ApiToken`] | API トークン | `<api_key>:<api_secret>` 形式のクレデンシャル |
//!
//! ## ワイヤ形式
//!
//! クライアントは `Authorization: token <api_key>:<api_secret>` ヘッダーで
//! トークンを送信する。ログインレスポンスの `data.token` も同じ
//! `<api_key>:<api_secret>` 文字列を返す。

use crate::DomainError;

/// API キー（値オブジェクト）
///
/// ユーザーごとに発行される長期クレデンシャルの公開側。
/// データベース上で一意であり、トークン認証時のユーザー特定に使う。
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ApiKey(String);

impl ApiKey {
    /// API キーを作成する
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
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

impl std::fmt::Display for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// API シークレット（値オブジェクト）
///
/// 長期クレデンシャルの秘密側。キーで特定したユーザーの保存値と
/// 定数時間比較で照合する。
///
/// # セキュリティ
///
/// Debug 出力ではシークレットの値をマスクする。Display は提供しない。
#[derive(Clone, PartialEq, Eq)]
pub struct ApiSecret(String);

impl std::fmt::Debug for ApiSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ApiSecret").field(&"[REDACTED]").finish()
    }
}

impl ApiSecret {
    /// API シークレットを作成する
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
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

/// API トークン（キーとシークレットの対）
///
/// ログインレスポンスで払い出され、以後のリクエストの認証に使われる。
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken {
    key:    ApiKey,
    secret: ApiSecret,
}

impl std::fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiToken")
            .field("key", &self.key)
            .field("secret", &self.secret)
            .finish()
    }
}

impl ApiToken {
    /// キーとシークレットからトークンを作成する
    pub fn new(key: ApiKey, secret: ApiSecret) -> Self {
        Self { key, secret }
    }

    /// `<api_key>:<api_secret>` 形式の文字列をパースする
    ///
    /// シークレット側に `:` が含まれていても、最初の区切りでのみ分割する。
    ///
    /// # エラー
    ///
    /// 区切り文字がない、またはどちらかが空の場合は
    /// `DomainError::Validation` を返す。
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let Some((key, secret)) = value.split_once(':') else {
            return Err(DomainError::Validation(
                "Invalid API token format".to_string(),
            ));
        };

        if key.is_empty() || secret.is_empty() {
            return Err(DomainError::Validation(
                "Invalid API token format".to_string(),
            ));
        }

        Ok(Self {
            key:    ApiKey::new(key),
            secret: ApiSecret::new(secret),
        })
    }

    pub fn key(&self) -> &ApiKey {
        &self.key
    }

    pub fn secret(&self) -> &ApiSecret {
        &self.secret
    }

    /// ワイヤ形式 `<api_key>:<api_secret>` の文字列を生成する
    ///
    /// ログインレスポンスの `data.token` に使用する。
    /// シークレットを含むため、この値をログに出力しないこと。
    pub fn to_credential_string(&self) -> String {
        format!("{}:{}", self.key.as_str(), self.secret.as_str())
    }
}

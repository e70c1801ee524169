//! # API クレデンシャル生成
//!
//! ログイン時に払い出す API キー/シークレットの採番を提供する。
//!
//! キーとシークレットは独立に生成される。片方だけ欠けているユーザーには
//! 欠けている側だけを補完するため、トレイトも片側ずつのメソッドに分ける。

use ems_domain::token::{ApiKey, ApiSecret};
use rand::{Rng as _, distr::Alphanumeric};

/// 生成するクレデンシャルの文字数
const TOKEN_LENGTH: usize = 15;

/// API クレデンシャルの採番を担当するトレイト
pub trait TokenGenerator: Send + Sync {
    /// 新しい API キーを生成する
    fn generate_key(&self) -> ApiKey;

    /// 新しい API シークレットを生成する
    fn generate_secret(&self) -> ApiSecret;
}

/// 乱数による API クレデンシャル生成の実装
///
/// 英数字 15 文字のランダム文字列を生成する。
pub struct RandTokenGenerator;

impl RandTokenGenerator {
    pub fn new() -> Self {
        Self
    }

    fn random_token(&self) -> String {
        rand::rng()
            .sample_iter(Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect()
    }
}

impl Default for RandTokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenGenerator for RandTokenGenerator {
    fn generate_key(&self) -> ApiKey {
        ApiKey::new(self.random_token())
    }

    fn generate_secret(&self) -> ApiSecret {
        ApiSecret::new(self.random_token())
    }
}

//! # アプリケーションロール
//!
//! ユーザーに割り当てられたロール名の集合から、アプリケーションが扱う
//! 3 区分のロールを導出する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`AccessRole`] | アプリケーションロール | ログインレスポンスの `role` フィールド |
//!
//! ## マッピング規則
//!
//! ロール名の membership を優先順で判定する:
//!
//! 1. `Administrator` または `EMS Admin` を含む → `admin`
//! 2. `EMS Manager` を含む → `manager`
//! 3. それ以外 → `employee`

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

/// システム管理者ロール名
pub const ADMINISTRATOR: &str = "Administrator";
/// EMS アプリケーション管理者ロール名
pub const EMS_ADMIN: &str = "EMS Admin";
/// EMS マネージャーロール名
pub const EMS_MANAGER: &str = "EMS Manager";

/// アプリケーションロール
///
/// クライアントが画面制御に使う 3 区分。小文字でシリアライズされる。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AccessRole {
    /// 管理者（Administrator / EMS Admin）
    Admin,
    /// マネージャー（EMS Manager）
    Manager,
    /// 一般従業員（上記以外すべて）
    Employee,
}

impl AccessRole {
    /// ロール名の集合からアプリケーションロールを導出する
    ///
    /// 管理者系ロールがマネージャーロールより優先される。
    /// 未知のロール名は無視され、どれにも該当しなければ `Employee` になる。
    pub fn from_role_names<S: AsRef<str>>(names: &[S]) -> Self {
        let has = |target: &str| names.iter().any(|n| n.as_ref() == target);

        if has(ADMINISTRATOR) || has(EMS_ADMIN) {
            Self::Admin
        } else if has(EMS_MANAGER) {
            Self::Manager
        } else {
            Self::Employee
        }
    }

    /// シリアライズ形式の文字列を取得する
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュールで re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、ビジネスロジックは usecase 層に委譲
//!
//! ## ハンドラ一覧
//!
//! - `health`: ヘルスチェック
//! - `auth`: ログイン（トークン払い出し）
//! - `account`: プロフィール更新・パスワード変更
//! - `directory`: Department / Company / Employee の削除

pub mod account;
pub mod auth;
pub mod directory;
pub mod health;

pub use account::{AccountState, change_user_password, update_user_profile};
pub use auth::{AuthState, login_with_credentials};
pub use directory::{DirectoryState, delete_company, delete_department, delete_employee};
pub use health::{ReadinessState, health_check, readiness_check};

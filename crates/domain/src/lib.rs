//! # EMS ドメイン層
//!
//! 従業員管理アプリケーションのドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **エンティティ**: 一意の識別子を持つオブジェクト（例: User）
//! - **値オブジェクト**: 識別子を持たない不変オブジェクト（例: Email,
//!   ApiToken）
//! - **ドメインエラー**: ビジネスルール違反を表現するエラー型
//!
//! ## 依存関係の方向
//!
//! ```text
//! api → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、外部サービス）には一切依存しない。
//! これにより、ビジネスロジックの純粋性が保たれる。
//!
//! ## モジュール構成
//!
//! - [`clock`] - 時刻プロバイダの抽象化
//! - [`error`] - ドメイン層で発生するエラーの定義
//! - [`password`] - パスワード関連の値オブジェクト
//! - [`record`] - ディレクトリレコード（Department / Company / Employee）の識別子
//! - [`role`] - アプリケーションロールとロール名からのマッピング
//! - [`token`] - API キー/シークレットとベアラートークン
//! - [`user`] - ユーザーエンティティ
//! - [`value_objects`] - 汎用の値オブジェクト

#[macro_use]
mod macros;

pub mod clock;
pub mod error;
pub mod password;
pub mod record;
pub mod role;
pub mod token;
pub mod user;
pub mod value_objects;

pub use error::DomainError;

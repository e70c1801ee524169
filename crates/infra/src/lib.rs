//! # EMS インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 設計方針
//!
//! このクレートはドメインモデルに対するリポジトリトレイトと、その
//! PostgreSQL 実装を提供する。外部システムの詳細をカプセル化し、
//! ユースケース層をインフラの変更から保護する。
//!
//! ## 責務
//!
//! - **データベース接続**: PostgreSQL への接続プール管理
//! - **リポジトリ実装**: ユーザー・ロール・ディレクトリレコードの永続化
//! - **パスワード検証/ハッシュ化**: Argon2id
//! - **API クレデンシャル生成**: ランダムなキー/シークレットの採番
//!
//! ## 依存関係
//!
//! ```text
//! api → infra → domain
//! ```
//!
//! ドメイン層はインフラ層に依存しない（依存性逆転の原則）。
//!
//! ## モジュール構成
//!
//! - [`db`] - PostgreSQL データベース接続管理
//! - [`error`] - インフラ層エラー定義
//! - [`password`] - Argon2id によるパスワード検証とハッシュ化
//! - [`repository`] - リポジトリ実装
//! - [`token`] - API クレデンシャル生成

pub mod db;
pub mod error;
pub mod password;
pub mod repository;
pub mod token;

pub use error::InfraError;
pub use password::{Argon2PasswordChecker, Argon2PasswordHasher, PasswordChecker, PasswordHasher};
pub use token::{RandTokenGenerator, TokenGenerator};

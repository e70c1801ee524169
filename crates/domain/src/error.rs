//! # ドメイン層エラー定義
//!
//! ビジネスルール違反やドメイン固有の例外状態を表現するエラー型。
//!
//! ## 設計方針
//!
//! - **型による分類**: エラーの種類を列挙型で明示し、パターンマッチで処理可能に
//! - **thiserror 活用**: `#[error(...)]` マクロでエラーメッセージを自動生成
//! - **メッセージは英語**: エラーメッセージはレスポンスエンベロープの
//!   `message` としてそのままクライアントに返るため、API 契約の一部となる

use thiserror::Error;

/// ドメイン層で発生するエラー
///
/// ビジネスロジックの実行中に発生する例外状態を表現する。
/// API 層でこのエラーを受け取り、レスポンスエンベロープに変換する。
#[derive(Debug, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 入力値がビジネスルールに違反している場合に使用する。
    ///
    /// # 例
    ///
    /// - 必須フィールドが未入力
    /// - 文字数制限の超過
    /// - 不正なフォーマット
    #[error("{0}")]
    Validation(String),

    /// エンティティが見つからない
    ///
    /// 指定された ID のエンティティがデータベースに存在しない場合に使用する。
    /// メッセージはストアが報告した内容をそのまま表現する
    /// （`"Department HR-001 does not exist"` 形式）。
    #[error("{entity_type} {id} does not exist")]
    NotFound {
        /// エンティティの種類（"Department", "Company", "Employee" など）
        entity_type: &'static str,
        /// 検索に使用した識別子
        id:          String,
    },
}

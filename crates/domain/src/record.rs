//! # ディレクトリレコード
//!
//! Department / Company / Employee のレコードを識別する値オブジェクトを
//! 定義する。
//!
//! この API はこれらのレコードを「ID で削除する」操作しか持たないため、
//! レコードの中身はモデリングしない。ID は外部システムが採番した不透明な
//! 文字列（例: `"HR-DEPT-001"`）として扱う。

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::DomainError;

/// レコード ID（値オブジェクト）
///
/// ディレクトリレコードを識別する不透明な文字列。
/// 形式には関知せず、空でないことだけを要求する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    /// レコード ID を作成する
    ///
    /// # エラー
    ///
    /// 空文字列（trim 後に空になるものを含む）は
    /// `DomainError::Validation` を返す。
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return Err(DomainError::Validation(
                "Record id is required".to_string(),
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

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ディレクトリレコードの種別
///
/// 削除対象のテーブルとエラーメッセージ上のエンティティ名を決める。
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr, strum::Display)]
pub enum RecordKind {
    Department,
    Company,
    Employee,
}

impl RecordKind {
    /// エラーメッセージに使うエンティティ名（`"Department"` など）
    pub fn entity_label(&self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_レコードidは正常な値を受け入れる() {
        let id = RecordId::new("HR-DEPT-001").unwrap();
        assert_eq!(id.as_str(), "HR-DEPT-001");
    }

    #[rstest]
    fn test_レコードidは前後の空白をトリムする() {
        let id = RecordId::new("  EMP-0042  ").unwrap();
        assert_eq!(id.as_str(), "EMP-0042");
    }

    #[rstest]
    #[case("", "空文字列")]
    #[case("   ", "空白のみ")]
    fn test_レコードidは空を拒否する(#[case] input: &str, #[case] _reason: &str) {
        assert!(RecordId::new(input).is_err());
    }

    #[rstest]
    #[case(RecordKind::Department, "Department")]
    #[case(RecordKind::Company, "Company")]
    #[case(RecordKind::Employee, "Employee")]
    fn test_レコード種別のエンティティ名(
        #[case] kind: RecordKind,
        #[case] expected: &str,
    ) {
        assert_eq!(kind.entity_label(), expected);
    }
}

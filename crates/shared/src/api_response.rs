//! # API レスポンスエンベロープ
//!
//! 全エンドポイント共通のレスポンス形式
//! `{ "success": bool, "data"?: T, "message"?: string }` を提供する。

use serde::{Deserialize, Serialize};

/// API の統一レスポンス型
///
/// すべてのエンドポイントはこのエンベロープ形式でレスポンスを返す。
/// 成功時は `success: true` と任意の `data`、失敗時は `success: false` と
/// 原因を示す `message` を設定する。`data` と `message` は `None` のとき
/// JSON に出力されない。
///
/// ## 使用例
///
/// ```
/// use ems_shared::ApiResponse;
///
/// let response = ApiResponse::ok("hello");
/// assert!(response.success);
/// assert_eq!(response.data, Some("hello"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data:    Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// 成功レスポンス（データ付き）を作成する
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data:    Some(data),
            message: None,
        }
    }

    /// 失敗レスポンスを作成する
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data:    None,
            message: Some(message.into()),
        }
    }
}

impl ApiResponse<()> {
    /// 成功レスポンス（データなし）を作成する
    ///
    /// 削除系エンドポイントの `{"success": true}` に使用する。
    pub fn ok_empty() -> Self {
        Self {
            success: true,
            data:    None,
            message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_okのserializeでsuccessとdataのみ出力される() {
        let response = ApiResponse::ok("hello");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "success": true, "data": "hello" })
        );
    }

    #[test]
    fn test_ok_emptyのserializeでsuccessのみ出力される() {
        let response = ApiResponse::ok_empty();
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json, serde_json::json!({ "success": true }));
    }

    #[test]
    fn test_failureのserializeでsuccessとmessageのみ出力される() {
        let response: ApiResponse<()> = ApiResponse::failure("something went wrong");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "success": false, "message": "something went wrong" })
        );
    }

    #[test]
    fn test_deserializeでjsonからオブジェクトに変換する() {
        let json = r#"{"success": true, "data": "world"}"#;
        let response: ApiResponse<String> = serde_json::from_str(json).unwrap();

        assert!(response.success);
        assert_eq!(response.data, Some("world".to_string()));
        assert_eq!(response.message, None);
    }

    #[test]
    fn test_serialize_deserializeのラウンドトリップ() {
        let original = ApiResponse::ok(42);
        let json = serde_json::to_string(&original).unwrap();
        let deserialized: ApiResponse<i32> = serde_json::from_str(&json).unwrap();

        assert_eq!(original, deserialized);
    }
}

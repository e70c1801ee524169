//! # リクエストボディ抽出
//!
//! JSON ボディとフォームエンコードの両方を受け付けるエクストラクタを提供する。
//!
//! クライアントの大半は JSON を送るが、旧クライアントはフォームエンコードで
//! 同じフィールドを送ってくるため、Content-Type で分岐して両対応する。

use axum::{
    Form,
    Json,
    extract::{FromRequest, Request},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use ems_shared::ApiResponse;
use serde::de::DeserializeOwned;

/// JSON またはフォームエンコードのボディを `T` にデシリアライズする
///
/// - `Content-Type: application/json` → [`Json`] としてパース
/// - それ以外 → [`Form`]（`application/x-www-form-urlencoded`）としてパース
///
/// パースに失敗した場合は 400 とエンベロープの失敗形を返す。
pub struct JsonOrForm<T>(pub T);

impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if content_type.starts_with("application/json") {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| bad_request_response(e.to_string()))?;
            return Ok(Self(value));
        }

        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(|e| bad_request_response(e.to_string()))?;
        Ok(Self(value))
    }
}

/// ボディ不正レスポンス（400）
fn bad_request_response(message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::failure(message)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::{Router, body::Body, http::Request as HttpRequest, routing::post};
    use serde::Deserialize;
    use tower::ServiceExt as _;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct EchoRequest {
        value: Option<String>,
    }

    async fn echo(JsonOrForm(req): JsonOrForm<EchoRequest>) -> String {
        req.value.unwrap_or_else(|| "<missing>".to_string())
    }

    fn create_test_app() -> Router {
        Router::new().route("/echo", post(echo))
    }

    #[tokio::test]
    async fn test_jsonボディをパースできる() {
        // Given
        let sut = create_test_app();

        let request = HttpRequest::builder()
            .method("POST")
            .uri("/echo")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"value": "from-json"}"#))
            .unwrap();

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"from-json");
    }

    #[tokio::test]
    async fn test_フォームエンコードのボディをパースできる() {
        // Given
        let sut = create_test_app();

        let request = HttpRequest::builder()
            .method("POST")
            .uri("/echo")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("value=from-form"))
            .unwrap();

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"from-form");
    }

    #[tokio::test]
    async fn test_フィールド欠落はnoneとしてパースされる() {
        // Given
        let sut = create_test_app();

        let request = HttpRequest::builder()
            .method("POST")
            .uri("/echo")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"<missing>");
    }

    #[tokio::test]
    async fn test_不正なjsonで400とエンベロープ失敗形() {
        // Given
        let sut = create_test_app();

        let request = HttpRequest::builder()
            .method("POST")
            .uri("/echo")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["message"].is_string());
    }
}

//! # EMS API サーバー
//!
//! 従業員管理アプリケーションの HTTP API サーバー。
//!
//! ## 役割
//!
//! - **ログイン**: メール/パスワード認証と API トークンの払い出し
//! - **ディレクトリ削除**: Department / Company / Employee の ID 削除
//! - **アカウント操作**: プロフィール更新・パスワード変更
//!
//! すべてのエンドポイントは `{success, data?, message?}` のエンベロープ形式で
//! レスポンスを返す。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `API_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `API_PORT` | **Yes** | ポート番号 |
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `LOG_FORMAT` | No | `json` / `pretty`（デフォルト: `pretty`） |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境
//! cargo run -p ems-api
//!
//! # 本番環境
//! API_PORT=13001 DATABASE_URL=postgres://... cargo run -p ems-api --release
//! ```

mod config;
mod error;
mod extract;
mod handler;
mod usecase;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use config::ApiConfig;
use ems_domain::clock::{Clock, SystemClock};
use ems_infra::{
    Argon2PasswordChecker,
    Argon2PasswordHasher,
    PasswordChecker,
    PasswordHasher,
    RandTokenGenerator,
    TokenGenerator,
    db,
    repository::{
        DirectoryRepository,
        PostgresDirectoryRepository,
        PostgresRoleRepository,
        PostgresUserRepository,
        RoleRepository,
        UserRepository,
    },
};
use ems_shared::observability::{MakeRequestUuidV7, TracingConfig, make_request_span};
use handler::{
    AccountState,
    AuthState,
    DirectoryState,
    ReadinessState,
    change_user_password,
    delete_company,
    delete_department,
    delete_employee,
    health_check,
    login_with_credentials,
    readiness_check,
    update_user_profile,
};
use tokio::net::TcpListener;
use tower_http::{request_id::SetRequestIdLayer, trace::TraceLayer};
use usecase::{AccountUseCaseImpl, AuthUseCaseImpl, DirectoryUseCaseImpl};

/// API サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    let tracing_config = TracingConfig::from_env("ems-api");
    ems_shared::observability::init_tracing(tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = "ems-api").entered();

    // 設定読み込み
    let config = ApiConfig::from_env().expect("設定の読み込みに失敗しました");

    tracing::info!(
        "API サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // データベース接続プールを作成
    let pool = db::create_pool(&config.database_url)
        .await
        .expect("データベース接続に失敗しました");
    tracing::info!("データベースに接続しました");

    // マイグレーション実行
    db::run_migrations(&pool)
        .await
        .expect("マイグレーションの実行に失敗しました");
    tracing::info!("マイグレーションを適用しました");

    // Readiness Check 用 State（pool が move される前に clone）
    let readiness_state = Arc::new(ReadinessState { pool: pool.clone() });

    // 依存コンポーネントを初期化
    let user_repository: Arc<dyn UserRepository> =
        Arc::new(PostgresUserRepository::new(pool.clone()));
    let role_repository: Arc<dyn RoleRepository> =
        Arc::new(PostgresRoleRepository::new(pool.clone()));
    let directory_repository: Arc<dyn DirectoryRepository> =
        Arc::new(PostgresDirectoryRepository::new(pool));
    let password_checker: Arc<dyn PasswordChecker> = Arc::new(Argon2PasswordChecker::new());
    let password_hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::new());
    let token_generator: Arc<dyn TokenGenerator> = Arc::new(RandTokenGenerator::new());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let auth_state = Arc::new(AuthState {
        usecase: Arc::new(AuthUseCaseImpl::new(
            user_repository.clone(),
            role_repository,
            password_checker.clone(),
            token_generator,
            clock.clone(),
        )),
    });
    let account_state = Arc::new(AccountState {
        user_repository: user_repository.clone(),
        usecase:         Arc::new(AccountUseCaseImpl::new(
            user_repository.clone(),
            password_checker,
            password_hasher,
            clock,
        )),
    });
    let directory_state = Arc::new(DirectoryState {
        user_repository,
        usecase: Arc::new(DirectoryUseCaseImpl::new(directory_repository)),
    });

    // ルーター構築
    let app = Router::new()
        .route("/health", get(health_check))
        .merge(
            Router::new()
                .route("/health/ready", get(readiness_check))
                .with_state(readiness_state),
        )
        .merge(
            Router::new()
                .route(
                    "/api/method/login_with_credentials",
                    post(login_with_credentials),
                )
                .with_state(auth_state),
        )
        .merge(
            Router::new()
                .route("/api/method/update_user_profile", post(update_user_profile))
                .route(
                    "/api/method/change_user_password",
                    post(change_user_password),
                )
                .with_state(account_state),
        )
        .merge(
            Router::new()
                .route("/api/method/delete_department", post(delete_department))
                .route("/api/method/delete_company", post(delete_company))
                .route("/api/method/delete_employee", post(delete_employee))
                .with_state(directory_state),
        )
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("アドレスのパースに失敗しました");

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("API サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

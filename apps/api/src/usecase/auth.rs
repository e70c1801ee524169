//! # 認証ユースケース
//!
//! ログイン処理のビジネスロジックを実装する。
//!
//! ## フロー
//!
//! 1. メールアドレスでユーザーを検索
//! 2. Argon2id でパスワードを検証
//! 3. API クレデンシャル（キー/シークレット）が未発行なら補完して永続化
//! 4. 最終ログイン日時を記録
//! 5. ロール名からアプリケーションロールを導出
//!
//! ## タイミング攻撃対策
//!
//! ユーザーが存在しない場合もダミーハッシュで検証を実行し、
//! 処理時間を均一化してユーザー存在確認攻撃を防ぐ。

use std::sync::Arc;

use ems_domain::{
    clock::Clock,
    password::{PasswordHash, PlainPassword},
    role::AccessRole,
    token::ApiToken,
    user::{Email, User},
};
use ems_infra::{
    PasswordChecker,
    TokenGenerator,
    repository::{RoleRepository, UserRepository},
};

use crate::error::LoginError;

/// ログイン結果
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// 払い出された API トークン
    pub token: ApiToken,
    /// ログインしたユーザー（クレデンシャル補完・ログイン日時反映済み）
    pub user:  User,
    /// 導出されたアプリケーションロール
    pub role:  AccessRole,
}

/// 認証ユースケースの実装
pub struct AuthUseCaseImpl {
    user_repository:  Arc<dyn UserRepository>,
    role_repository:  Arc<dyn RoleRepository>,
    password_checker: Arc<dyn PasswordChecker>,
    token_generator:  Arc<dyn TokenGenerator>,
    clock:            Arc<dyn Clock>,
}

impl AuthUseCaseImpl {
    /// 新しいユースケースインスタンスを作成
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        role_repository: Arc<dyn RoleRepository>,
        password_checker: Arc<dyn PasswordChecker>,
        token_generator: Arc<dyn TokenGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repository,
            role_repository,
            password_checker,
            token_generator,
            clock,
        }
    }

    /// メール/パスワードでログインする
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, LoginError> {
        let plain_password = PlainPassword::new(password);

        // 不正な形式のメールはユーザー不存在と同じ応答にする
        let Ok(email) = Email::new(email) else {
            self.dummy_verification(&plain_password);
            return Err(LoginError::InvalidCredentials);
        };

        let Some(user) = self.user_repository.find_by_email(&email).await? else {
            // タイミング攻撃対策: ユーザーが存在しない場合もダミー検証を実行
            self.dummy_verification(&plain_password);
            return Err(LoginError::InvalidCredentials);
        };

        let verified = self
            .password_checker
            .verify(&plain_password, user.password_hash())?;
        if verified.is_mismatch() {
            return Err(LoginError::InvalidCredentials);
        }

        let now = self.clock.now();

        // API クレデンシャルが未発行（片方だけの場合も含む）なら補完して永続化
        let (user, token) = match user.api_credentials() {
            Some(token) => (user, token),
            None => {
                let key = user
                    .api_key()
                    .cloned()
                    .unwrap_or_else(|| self.token_generator.generate_key());
                let secret = user
                    .api_secret()
                    .cloned()
                    .unwrap_or_else(|| self.token_generator.generate_secret());
                let token = ApiToken::new(key, secret);

                self.user_repository
                    .update_api_credentials(user.id(), &token)
                    .await?;

                (user.with_api_credentials(token.clone(), now), token)
            }
        };

        // 最終ログイン日時を記録
        self.user_repository.update_last_login(user.id()).await?;
        let user = user.with_last_login_updated(now);

        // ロール解決
        let role_names = self.role_repository.role_names_for(user.id()).await?;
        let role = AccessRole::from_role_names(&role_names);

        Ok(LoginOutcome { token, user, role })
    }

    /// ダミーハッシュで検証を実行する（タイミング攻撃対策）
    ///
    /// ユーザーが存在しない場合も実際のパスワード検証と同等の時間を消費する。
    /// 固定 sleep ではなく実際に Argon2id 検証を実行することで、
    /// CPU/メモリ状況による自然な変動も含めて同じ時間特性になる。
    fn dummy_verification(&self, password: &PlainPassword) {
        // ダミーハッシュ（有効な Argon2id 形式）
        let dummy_hash = PasswordHash::new(
            "$argon2id$v=19$m=65536,t=1,p=1$AAAAAAAAAAAAAAAAAAAAAA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
        );
        // 結果は無視（エラーでも問題ない）
        let _ = self.password_checker.verify(password, &dummy_hash);
    }
}

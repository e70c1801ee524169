//! # アカウントユースケース
//!
//! セッションユーザー自身に対するプロフィール更新とパスワード変更を
//! 実装する。
//!
//! ## ビジネスルール
//!
//! - メールアドレスはこの API からは変更できない。変更要求は失敗として
//!   報告するが、エラー（例外）ではない
//! - メール変更の拒否はいかなる変更よりも先に判定する（拒否時は
//!   一切の変更を行わない）
//! - 旧パスワードが一致しない場合も同様に、失敗として報告するのみ

use std::sync::Arc;

use ems_domain::{
    clock::Clock,
    password::PlainPassword,
    user::User,
    value_objects::FullName,
};
use ems_infra::{
    PasswordChecker,
    PasswordHasher,
    repository::UserRepository,
};

use crate::error::AccountError;

/// プロフィール更新の入力
///
/// どちらのフィールドも省略可能。`email` は検証用で、セッションユーザーの
/// メールアドレスと異なる値が来た場合は更新全体を拒否する。
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileInput {
    pub full_name: Option<String>,
    pub email:     Option<String>,
}

/// プロフィール更新の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileUpdateOutcome {
    /// 更新成功（更新後の状態を返す）
    Updated {
        full_name: Option<String>,
        email:     String,
    },
    /// メールアドレス変更の試みを拒否した
    EmailChangeRejected,
}

/// パスワード変更の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordChangeOutcome {
    /// 変更成功
    Changed,
    /// 旧パスワードが一致しなかった（パスワードは変更されていない）
    OldPasswordMismatch,
}

/// アカウントユースケースの実装
pub struct AccountUseCaseImpl {
    user_repository:  Arc<dyn UserRepository>,
    password_checker: Arc<dyn PasswordChecker>,
    password_hasher:  Arc<dyn PasswordHasher>,
    clock:            Arc<dyn Clock>,
}

impl AccountUseCaseImpl {
    /// 新しいユースケースインスタンスを作成
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_checker: Arc<dyn PasswordChecker>,
        password_hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repository,
            password_checker,
            password_hasher,
            clock,
        }
    }

    /// プロフィール（表示名）を更新する
    ///
    /// `email` にセッションユーザーと異なる値が指定された場合は、
    /// 表示名の更新を含む一切の変更を行わずに拒否を返す。
    /// 空の表示名は「変更なし」として無視する。
    pub async fn update_profile(
        &self,
        user: &User,
        input: UpdateProfileInput,
    ) -> Result<ProfileUpdateOutcome, AccountError> {
        // メール変更の判定はすべての変更より先に行う
        if let Some(email) = input.email.as_deref()
            && email != user.email().as_str()
        {
            return Ok(ProfileUpdateOutcome::EmailChangeRejected);
        }

        let mut updated = user.clone();
        if let Some(raw_name) = input.full_name.as_deref()
            && !raw_name.trim().is_empty()
        {
            let full_name = FullName::new(raw_name)?;
            self.user_repository
                .update_full_name(user.id(), &full_name)
                .await?;
            updated = updated.with_full_name(full_name, self.clock.now());
        }

        Ok(ProfileUpdateOutcome::Updated {
            full_name: updated.full_name().map(|n| n.as_str().to_string()),
            email:     updated.email().as_str().to_string(),
        })
    }

    /// パスワードを変更する
    ///
    /// 旧パスワードを検証し、一致した場合のみ新パスワードをハッシュ化して
    /// 保存する。
    pub async fn change_password(
        &self,
        user: &User,
        old_password: &PlainPassword,
        new_password: &PlainPassword,
    ) -> Result<PasswordChangeOutcome, AccountError> {
        let verified = self
            .password_checker
            .verify(old_password, user.password_hash())?;
        if verified.is_mismatch() {
            return Ok(PasswordChangeOutcome::OldPasswordMismatch);
        }

        let new_hash = self.password_hasher.hash(new_password)?;
        self.user_repository
            .update_password_hash(user.id(), &new_hash)
            .await?;

        Ok(PasswordChangeOutcome::Changed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use ems_domain::{
        clock::FixedClock,
        password::{PasswordHash, PasswordVerifyResult},
        token::{ApiKey, ApiToken},
        user::{Email, UserId},
    };
    use ems_infra::InfraError;
    use pretty_assertions::assert_eq;

    use super::*;

    // テスト用スタブ

    #[derive(Default)]
    struct StubUserRepository {
        updated_names:  Mutex<Vec<String>>,
        updated_hashes: Mutex<Vec<String>>,
    }

    impl StubUserRepository {
        fn recorded_names(&self) -> Vec<String> {
            self.updated_names.lock().unwrap().clone()
        }

        fn recorded_hashes(&self) -> Vec<String> {
            self.updated_hashes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl UserRepository for StubUserRepository {
        async fn find_by_email(&self, _email: &Email) -> Result<Option<User>, InfraError> {
            Ok(None)
        }

        async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, InfraError> {
            Ok(None)
        }

        async fn find_by_api_key(
            &self,
            _api_key: &ApiKey,
        ) -> Result<Option<User>, InfraError> {
            Ok(None)
        }

        async fn update_full_name(
            &self,
            _id: &UserId,
            full_name: &FullName,
        ) -> Result<(), InfraError> {
            self.updated_names
                .lock()
                .unwrap()
                .push(full_name.as_str().to_string());
            Ok(())
        }

        async fn update_password_hash(
            &self,
            _id: &UserId,
            password_hash: &PasswordHash,
        ) -> Result<(), InfraError> {
            self.updated_hashes
                .lock()
                .unwrap()
                .push(password_hash.as_str().to_string());
            Ok(())
        }

        async fn update_api_credentials(
            &self,
            _id: &UserId,
            _token: &ApiToken,
        ) -> Result<(), InfraError> {
            Ok(())
        }

        async fn update_last_login(&self, _id: &UserId) -> Result<(), InfraError> {
            Ok(())
        }
    }

    struct StubPasswordChecker {
        result: bool,
    }

    impl PasswordChecker for StubPasswordChecker {
        fn verify(
            &self,
            _password: &PlainPassword,
            _hash: &PasswordHash,
        ) -> Result<PasswordVerifyResult, InfraError> {
            Ok(PasswordVerifyResult::from(self.result))
        }
    }

    struct StubPasswordHasher;

    impl PasswordHasher for StubPasswordHasher {
        fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, InfraError> {
            Ok(PasswordHash::new(format!("hashed:{}", password.as_str())))
        }
    }

    // フィクスチャ

    fn fixed_time() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn test_user() -> User {
        let now = fixed_time();
        User::from_db(
            UserId::new(),
            Email::new("user@example.com").unwrap(),
            Some(FullName::new("Old Name").unwrap()),
            PasswordHash::new("$argon2id$v=19$dummy"),
            None,
            None,
            None,
            now,
            now,
        )
    }

    fn create_sut(repo: Arc<StubUserRepository>, password_matches: bool) -> AccountUseCaseImpl {
        AccountUseCaseImpl::new(
            repo,
            Arc::new(StubPasswordChecker {
                result: password_matches,
            }),
            Arc::new(StubPasswordHasher),
            Arc::new(FixedClock::new(fixed_time())),
        )
    }

    // update_profile のテスト

    #[tokio::test]
    async fn test_update_profile_表示名を更新できる() {
        // Given
        let repo = Arc::new(StubUserRepository::default());
        let sut = create_sut(repo.clone(), true);

        // When
        let outcome = sut
            .update_profile(
                &test_user(),
                UpdateProfileInput {
                    full_name: Some("New Name".to_string()),
                    email:     None,
                },
            )
            .await
            .unwrap();

        // Then
        assert_eq!(
            outcome,
            ProfileUpdateOutcome::Updated {
                full_name: Some("New Name".to_string()),
                email:     "user@example.com".to_string(),
            }
        );
        assert_eq!(repo.recorded_names(), vec!["New Name".to_string()]);
    }

    #[tokio::test]
    async fn test_update_profile_別メールへの変更は拒否され何も更新されない() {
        // Given
        let repo = Arc::new(StubUserRepository::default());
        let sut = create_sut(repo.clone(), true);

        // When
        let outcome = sut
            .update_profile(
                &test_user(),
                UpdateProfileInput {
                    full_name: Some("New Name".to_string()),
                    email:     Some("someone-else@example.com".to_string()),
                },
            )
            .await
            .unwrap();

        // Then
        assert_eq!(outcome, ProfileUpdateOutcome::EmailChangeRejected);
        assert!(repo.recorded_names().is_empty());
    }

    #[tokio::test]
    async fn test_update_profile_自分のメールなら拒否されない() {
        // Given
        let repo = Arc::new(StubUserRepository::default());
        let sut = create_sut(repo.clone(), true);

        // When
        let outcome = sut
            .update_profile(
                &test_user(),
                UpdateProfileInput {
                    full_name: Some("New Name".to_string()),
                    email:     Some("user@example.com".to_string()),
                },
            )
            .await
            .unwrap();

        // Then
        assert!(matches!(outcome, ProfileUpdateOutcome::Updated { .. }));
        assert_eq!(repo.recorded_names(), vec!["New Name".to_string()]);
    }

    #[tokio::test]
    async fn test_update_profile_表示名なしは現在の状態を返すだけ() {
        // Given
        let repo = Arc::new(StubUserRepository::default());
        let sut = create_sut(repo.clone(), true);

        // When
        let outcome = sut
            .update_profile(&test_user(), UpdateProfileInput::default())
            .await
            .unwrap();

        // Then
        assert_eq!(
            outcome,
            ProfileUpdateOutcome::Updated {
                full_name: Some("Old Name".to_string()),
                email:     "user@example.com".to_string(),
            }
        );
        assert!(repo.recorded_names().is_empty());
    }

    #[tokio::test]
    async fn test_update_profile_空の表示名は無視される() {
        // Given
        let repo = Arc::new(StubUserRepository::default());
        let sut = create_sut(repo.clone(), true);

        // When
        let outcome = sut
            .update_profile(
                &test_user(),
                UpdateProfileInput {
                    full_name: Some("   ".to_string()),
                    email:     None,
                },
            )
            .await
            .unwrap();

        // Then
        assert!(matches!(outcome, ProfileUpdateOutcome::Updated { .. }));
        assert!(repo.recorded_names().is_empty());
    }

    #[tokio::test]
    async fn test_update_profile_長すぎる表示名はバリデーションエラー() {
        // Given
        let repo = Arc::new(StubUserRepository::default());
        let sut = create_sut(repo.clone(), true);

        // When
        let result = sut
            .update_profile(
                &test_user(),
                UpdateProfileInput {
                    full_name: Some("a".repeat(141)),
                    email:     None,
                },
            )
            .await;

        // Then
        assert!(matches!(result, Err(AccountError::Domain(_))));
        assert!(repo.recorded_names().is_empty());
    }

    // change_password のテスト

    #[tokio::test]
    async fn test_change_password_旧パスワード一致で変更される() {
        // Given
        let repo = Arc::new(StubUserRepository::default());
        let sut = create_sut(repo.clone(), true);

        // When
        let outcome = sut
            .change_password(
                &test_user(),
                &PlainPassword::new("oldpassword"),
                &PlainPassword::new("newpassword"),
            )
            .await
            .unwrap();

        // Then
        assert_eq!(outcome, PasswordChangeOutcome::Changed);
        assert_eq!(repo.recorded_hashes(), vec!["hashed:newpassword".to_string()]);
    }

    #[tokio::test]
    async fn test_change_password_旧パスワード不一致で変更されない() {
        // Given
        let repo = Arc::new(StubUserRepository::default());
        let sut = create_sut(repo.clone(), false);

        // When
        let outcome = sut
            .change_password(
                &test_user(),
                &PlainPassword::new("wrongoldpassword"),
                &PlainPassword::new("newpassword"),
            )
            .await
            .unwrap();

        // Then
        assert_eq!(outcome, PasswordChangeOutcome::OldPasswordMismatch);
        assert!(repo.recorded_hashes().is_empty());
    }
}

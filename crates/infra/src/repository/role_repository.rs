//! # RoleRepository
//!
//! ユーザーに割り当てられたロール名の取得を担当するリポジトリ。
//!
//! ロールの作成・割り当ては管理ツール側の責務であり、この API は
//! ログイン時のロール解決で読み取りしか行わない。

use async_trait::async_trait;
use ems_domain::user::UserId;
use sqlx::PgPool;

use crate::error::InfraError;

/// ロールリポジトリトレイト
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// ユーザーに割り当てられたロール名の一覧を取得
    ///
    /// 割り当てがない場合は空の Vec を返す。
    async fn role_names_for(&self, user_id: &UserId) -> Result<Vec<String>, InfraError>;
}

/// PostgreSQL 実装の RoleRepository
#[derive(Debug, Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn role_names_for(&self, user_id: &UserId) -> Result<Vec<String>, InfraError> {
        // JOIN で一括取得（N+1 回避）
        let names: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT r.name
            FROM roles r
            INNER JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
            ORDER BY r.name
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PostgresRoleRepository>();
    }
}

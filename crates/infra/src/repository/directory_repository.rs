//! # DirectoryRepository
//!
//! ディレクトリレコード（Department / Company / Employee）の削除を担当する
//! リポジトリ。
//!
//! 単一テーブルの `DELETE FROM ... WHERE id = $1` パターンのみを提供し、
//! 削除された行数をそのまま報告する。存在チェックは行わない。

use async_trait::async_trait;
use ems_domain::record::{RecordId, RecordKind};
use sqlx::PgPool;

use crate::error::InfraError;

/// レコード削除の結果
#[derive(Debug, Clone)]
pub struct DeletionResult {
    /// 削除された件数（0 は該当行なし）
    pub deleted_count: u64,
}

/// ディレクトリレコードリポジトリトレイト
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// 指定種別のレコードを ID で削除する
    ///
    /// # 戻り値
    ///
    /// - `Ok(result)`: 実行成功。`deleted_count == 0` は該当行なしを意味する
    /// - `Err(_)`: データベースエラー
    async fn delete(&self, kind: RecordKind, id: &RecordId)
    -> Result<DeletionResult, InfraError>;
}

/// PostgreSQL 実装の DirectoryRepository
#[derive(Debug, Clone)]
pub struct PostgresDirectoryRepository {
    pool: PgPool,
}

impl PostgresDirectoryRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// レコード種別から対象テーブル名を返す
///
/// SQL に直接埋め込まれるため、必ずコンパイル時定数のみを返すこと。
fn table_for(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Department => "departments",
        RecordKind::Company => "companies",
        RecordKind::Employee => "employees",
    }
}

#[async_trait]
impl DirectoryRepository for PostgresDirectoryRepository {
    async fn delete(
        &self,
        kind: RecordKind,
        id: &RecordId,
    ) -> Result<DeletionResult, InfraError> {
        let table = table_for(kind);
        let result = sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(DeletionResult {
            deleted_count: result.rows_affected(),
        })
    }
}

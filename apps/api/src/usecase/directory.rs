//! # ディレクトリユースケース
//!
//! Department / Company / Employee レコードの削除を実装する。
//!
//! 権限チェックや存在チェックは行わず、ストアの実行結果をそのまま
//! 呼び出し元に報告する。削除された行が 0 件の場合は
//! 「レコードが存在しない」という失敗になる。

use std::sync::Arc;

use ems_domain::{
    DomainError,
    record::{RecordId, RecordKind},
};
use ems_infra::repository::DirectoryRepository;

use crate::error::DirectoryError;

/// ディレクトリユースケースの実装
pub struct DirectoryUseCaseImpl {
    directory_repository: Arc<dyn DirectoryRepository>,
}

impl DirectoryUseCaseImpl {
    /// 新しいユースケースインスタンスを作成
    pub fn new(directory_repository: Arc<dyn DirectoryRepository>) -> Self {
        Self {
            directory_repository,
        }
    }

    /// レコードを ID で削除する
    pub async fn delete_record(
        &self,
        kind: RecordKind,
        id: &RecordId,
    ) -> Result<(), DirectoryError> {
        let result = self.directory_repository.delete(kind, id).await?;

        if result.deleted_count == 0 {
            return Err(DomainError::NotFound {
                entity_type: kind.entity_label(),
                id:          id.as_str().to_string(),
            }
            .into());
        }

        Ok(())
    }
}

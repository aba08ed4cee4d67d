// 每个实体一个 JSON 文件，原子替换

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tokio::fs;
use uuid::Uuid;

use super::keys::{EntityKey, EntityKind, id_from_file_name, is_valid_id};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid entity id: {0:?}")]
    InvalidId(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt record in {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: Arc<PathBuf>,
}

impl FileStore {
    /// 打开存储，数据目录不存在时自动创建
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| io_error(&dir, e))?;
        tracing::info!("data directory ready at {}", dir.display());
        Ok(Self { dir: Arc::new(dir) })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &EntityKey) -> Result<PathBuf, StoreError> {
        if let Some(id) = key.id() {
            if !is_valid_id(id) {
                return Err(StoreError::InvalidId(id.to_string()));
            }
        }
        Ok(self.dir.join(key.file_name()))
    }

    /// 读取记录，不存在时返回 `Ok(None)`
    pub async fn read<T: DeserializeOwned>(&self, key: &EntityKey) -> Result<Option<T>, StoreError> {
        let path = self.path_for(key)?;
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&path, e)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Corrupt { path, source })
    }

    /// 先写入临时文件再重命名覆盖目标文件，读取方不会看到写了一半的文件
    pub async fn write<T: Serialize>(&self, key: &EntityKey, value: &T) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let json = serde_json::to_vec_pretty(value)?;

        let tmp_path = self
            .dir
            .join(format!(".{}.{}.tmp", key.file_name(), Uuid::new_v4()));
        if let Err(e) = fs::write(&tmp_path, &json).await {
            return Err(io_error(&tmp_path, e));
        }
        if let Err(e) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(io_error(&path, e));
        }

        tracing::debug!("wrote {}", path.display());
        Ok(())
    }

    /// 删除记录，记录不存在时不报错
    pub async fn delete(&self, key: &EntityKey) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!("deleted {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    pub async fn exists(&self, key: &EntityKey) -> Result<bool, StoreError> {
        let path = self.path_for(key)?;
        fs::try_exists(&path).await.map_err(|e| io_error(&path, e))
    }

    /// `kind` 类型所有记录的 id，已排序
    pub async fn list(&self, kind: EntityKind) -> Result<Vec<String>, StoreError> {
        let mut entries = fs::read_dir(self.dir.as_path())
            .await
            .map_err(|e| io_error(&self.dir, e))?;

        let mut ids = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_error(&self.dir, e))?
        {
            if let Some(id) = entry
                .file_name()
                .to_str()
                .and_then(|name| id_from_file_name(kind, name))
            {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }
}

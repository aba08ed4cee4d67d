// 文件存储模块
// 每个实体一个 JSON 文件，写入时先写临时文件再原子重命名

pub mod file_store;
pub mod keys;

pub use file_store::{FileStore, StoreError};
pub use keys::{EntityKey, EntityKind};

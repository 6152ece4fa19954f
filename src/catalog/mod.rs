//! 目录模块：文档编号到安装命令的映射及其版本列表

pub mod store;
pub mod sync;
pub mod types;

pub use store::Catalog;
pub use types::{CatalogEntry, ResolvedCommand, VersionVariant};

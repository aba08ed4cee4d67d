// 上游数据模块
// 抓取、缓存并规整 transit / events / tasks 三个数据源

pub mod cache;
pub mod client;
pub mod fields;
pub mod source;
pub mod transform;

pub use cache::{AllSourceData, UpstreamCache, UpstreamOptions};
pub use client::{FetchError, HttpFetcher, UpstreamFetcher};
pub use source::SourceKind;
pub use transform::{Item, NormalizedCardData};

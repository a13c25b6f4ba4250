//! 收藏模块
//!
//! 本地收藏集合的读写与变更回调

pub mod listener;
pub mod repo;

// 重新导出主要类型
pub use listener::{EmptyFavoritesListener, FavoritesListener};
pub use repo::{FavoritesRepo, FAVORITES_KEY};

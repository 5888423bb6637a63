//! 工具层：JSON文件IO与模板存储

pub mod fs;
pub mod store;

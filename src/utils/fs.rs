//! IO helper: safe file read/write for JSON

use std::{fs::File, io::BufReader, path::Path};

use serde::Serialize;
use serde_json::Value;

use crate::model::template_state::AppError;

/// 从文件读取JSON数据
pub fn read_json_file(p: &Path) -> Result<Value, AppError> {
    let f = File::open(p)?;
    let rdr = BufReader::new(f);
    let v: Value = serde_json::from_reader(rdr)?;
    Ok(v)
}

/// 将可序列化数据保存到文件（格式化输出）
pub fn write_json_file<T: Serialize>(p: &Path, value: &T) -> Result<(), AppError> {
    let f = File::create(p)?;
    serde_json::to_writer_pretty(f, value)?;
    Ok(())
}

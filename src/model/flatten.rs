//! 结构样例扁平化：嵌套JSON → 路径→值 / 路径→类型 两张平面映射
//!
//! 数组只采样第一个元素，采样路径追加 `<key>[i]` 段，
//! 以区分"数组字段本身"与"被采样的元素"

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// 结构字段的类型标签（封闭集合 + 未识别兜底）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Null,
    Undefined,
    Unclassified,
}

impl TypeTag {
    /// JSON值的类型判定：非null对象→object，数组→array，null→null，其余为原始类型
    pub fn of(value: &Value) -> TypeTag {
        match value {
            Value::Object(_) => TypeTag::Object,
            Value::Array(_) => TypeTag::Array,
            Value::Null => TypeTag::Null,
            Value::String(_) => TypeTag::String,
            Value::Number(_) => TypeTag::Number,
            Value::Bool(_) => TypeTag::Boolean,
        }
    }

    /// 从持久化的标签名还原；未知标签归入 Unclassified
    pub fn from_name(name: &str) -> TypeTag {
        match name {
            "string" => TypeTag::String,
            "number" => TypeTag::Number,
            "boolean" => TypeTag::Boolean,
            "object" => TypeTag::Object,
            "array" => TypeTag::Array,
            "null" => TypeTag::Null,
            "undefined" => TypeTag::Undefined,
            _ => TypeTag::Unclassified,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::String => "string",
            TypeTag::Number => "number",
            TypeTag::Boolean => "boolean",
            TypeTag::Object => "object",
            TypeTag::Array => "array",
            TypeTag::Null => "null",
            TypeTag::Undefined => "undefined",
            TypeTag::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TypeTag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(TypeTag::from_name(&name))
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

/// 容器的逐项枚举：对象按键声明顺序，数组按下标（下标的字符串形式作为键）
fn container_entries(value: &Value) -> Vec<(String, &Value)> {
    match value {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => Vec::new(),
    }
}

/// 将嵌套结构压平为 路径→值 映射（仅叶子；非空数组额外记录一个空数组哨兵）
///
/// - 对象：以 `prefix.key` 递归
/// - 非空数组：记录 `path → []`，再只采样首元素于 `path.key[i]`
/// - 空数组/原始值：直接记录为叶子
/// - 空对象：整个分支不产生任何条目
pub fn flatten_structure(value: &Value, prefix: &str) -> Map<String, Value> {
    let mut result = Map::new();
    walk_values(value, prefix, &mut result);
    result
}

fn walk_values(container: &Value, prefix: &str, out: &mut Map<String, Value>) {
    for (key, value) in container_entries(container) {
        let path = join_path(prefix, &key);
        match value {
            Value::Array(arr) if !arr.is_empty() => {
                out.insert(path.clone(), Value::Array(Vec::new()));
                let item_path = format!("{}.{}[i]", path, key);
                let first = &arr[0];
                if first.is_object() || first.is_array() {
                    walk_values(first, &item_path, out);
                } else {
                    out.insert(item_path, first.clone());
                }
            }
            Value::Object(_) => walk_values(value, &path, out),
            _ => {
                out.insert(path, value.clone());
            }
        }
    }
}

/// 与 [`flatten_structure`] 并行的类型提取：路径约定完全一致，两张映射按路径对齐
///
/// 与值映射不同，途经的每个对象路径也会得到类型条目
pub fn extract_structure_types(value: &Value, prefix: &str) -> indexmap::IndexMap<String, TypeTag> {
    let mut result = indexmap::IndexMap::new();
    walk_types(value, prefix, &mut result);
    result
}

fn walk_types(container: &Value, prefix: &str, out: &mut indexmap::IndexMap<String, TypeTag>) {
    for (key, value) in container_entries(container) {
        let path = join_path(prefix, &key);
        out.insert(path.clone(), TypeTag::of(value));
        match value {
            Value::Array(arr) if !arr.is_empty() => {
                let item_path = format!("{}.{}[i]", path, key);
                let first = &arr[0];
                if first.is_object() || first.is_array() {
                    walk_types(first, &item_path, out);
                } else {
                    out.insert(item_path, TypeTag::of(first));
                }
            }
            Value::Object(_) => walk_types(value, &path, out),
            _ => {}
        }
    }
}

//! 结构树：路径寻址的节点森林，支持正向（样例值）与反向（纯元数据）两种构建
//!
//! 节点存放在arena里，按完整路径索引；同一路径只会创建一次，
//! 重复遇到已有路径必须复用既有节点，绝不分叉出重复兄弟

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::flatten::TypeTag;
use crate::model::template::FieldMetadata;
use crate::model::template_state::AppError;

/// 节点元数据（正向构建时播种，反向构建时直接取自持久化映射）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeMetadata {
    pub description: String,
    #[serde(rename = "type")]
    pub type_tag: Option<TypeTag>,
    pub options: Vec<String>,
    pub optional: bool,
}

impl NodeMetadata {
    fn empty(type_tag: Option<TypeTag>, options: Vec<String>) -> Self {
        Self {
            description: String::new(),
            type_tag,
            options,
            optional: false,
        }
    }
}

impl From<&FieldMetadata> for NodeMetadata {
    fn from(meta: &FieldMetadata) -> Self {
        Self {
            description: meta.description.clone(),
            type_tag: meta.type_tag,
            options: meta.options.clone().unwrap_or_default(),
            optional: meta.optional,
        }
    }
}

/// 结构树中的一个位置
#[derive(Debug, Clone)]
pub struct Node {
    /// 路径的最后一段
    pub key: String,
    /// 点分隔的完整地址
    pub path: String,
    /// 距根的深度，根为1
    pub level: u32,
    pub metadata: NodeMetadata,
    /// 子节点的arena下标，保持首次出现顺序
    pub children: Vec<usize>,
}

/// 路径寻址的节点森林（arena + 路径索引）
#[derive(Debug, Clone, Default)]
pub struct StructureTree {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    roots: Vec<usize>,
}

/// 占位符形如 `{{name}}`：刻意压制类型推断，留待人工标注
fn is_placeholder(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.len() >= 4 && s.starts_with("{{") && s.ends_with("}}"))
}

/// 叶子值作为候选项的文本形式；null与空数组哨兵不产生候选项
fn option_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Array(arr) if arr.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// 路径去掉最后一段；单段路径没有父路径
fn parent_path(path: &str) -> Option<&str> {
    path.rfind('.').map(|i| &path[..i])
}

impl StructureTree {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&Node> {
        self.index.get(path).map(|&i| &self.nodes[i])
    }

    pub fn roots(&self) -> Vec<&Node> {
        self.roots.iter().map(|&i| &self.nodes[i]).collect()
    }

    pub fn child_nodes(&self, node: &Node) -> Vec<&Node> {
        node.children.iter().map(|&i| &self.nodes[i]).collect()
    }

    fn push_node(&mut self, node: Node, parent: Option<usize>) -> usize {
        let idx = self.nodes.len();
        self.index.insert(node.path.clone(), idx);
        self.nodes.push(node);
        match parent {
            Some(p) => self.nodes[p].children.push(idx),
            None => self.roots.push(idx),
        }
        idx
    }

    /// 正向构建：由同一样例产出的值映射与类型映射合成结构树
    ///
    /// 每条扁平路径按段逐级创建或复用节点。叶子播种规则：
    /// 类型取自类型映射；占位符字符串压制类型（置None）且不产生候选项；
    /// 具体值（含 `0`/`false`/空串）以其文本形式作为唯一候选项
    pub fn from_sample(values: &Map<String, Value>, types: &IndexMap<String, TypeTag>) -> Self {
        let mut tree = StructureTree::default();

        for (flat_path, value) in values {
            let parts: Vec<&str> = flat_path.split('.').collect();
            let mut parent: Option<usize> = None;

            for i in 0..parts.len() {
                let path = parts[..=i].join(".");
                let idx = match tree.index.get(&path) {
                    Some(&existing) => existing,
                    None => {
                        let mut type_tag = types.get(path.as_str()).copied();
                        let mut options = Vec::new();
                        // 仅最后一段是叶子，才播种样例值
                        if i + 1 == parts.len() {
                            if is_placeholder(value) {
                                type_tag = None;
                            } else if let Some(text) = option_text(value) {
                                options.push(text);
                            }
                        }
                        let node = Node {
                            key: parts[i].to_string(),
                            path: path.clone(),
                            level: (i + 1) as u32,
                            metadata: NodeMetadata::empty(type_tag, options),
                            children: Vec::new(),
                        };
                        tree.push_node(node, parent)
                    }
                };
                parent = Some(idx);
            }
        }

        tree
    }

    /// 反向构建：仅凭 路径→元数据 映射还原层级结构，没有任何样例值
    ///
    /// 元数据从不被凭空合成：每个节点的元数据必须在映射中按路径命中；
    /// 某条路径隐含的祖先路径缺席时返回 [`AppError::OrphanPath`]
    pub fn from_metadata(metadata: &IndexMap<String, FieldMetadata>) -> Result<Self, AppError> {
        let mut tree = StructureTree::default();
        for path in metadata.keys() {
            tree.ensure_metadata_node(path, metadata)?;
        }
        tracing::debug!("反向构建完成，共 {} 个节点", tree.len());
        Ok(tree)
    }

    /// 惰性记忆化递归：先确保父节点存在，再把自己挂到父节点名下
    fn ensure_metadata_node(
        &mut self,
        path: &str,
        metadata: &IndexMap<String, FieldMetadata>,
    ) -> Result<usize, AppError> {
        if let Some(&idx) = self.index.get(path) {
            return Ok(idx);
        }

        let meta = metadata
            .get(path)
            .ok_or_else(|| AppError::State(format!("路径元数据缺失: {}", path)))?;

        let parent = match parent_path(path) {
            Some(pp) if !metadata.contains_key(pp) => {
                return Err(AppError::OrphanPath {
                    path: path.to_string(),
                    parent: pp.to_string(),
                });
            }
            Some(pp) => Some(self.ensure_metadata_node(pp, metadata)?),
            None => None,
        };

        let parts: Vec<&str> = path.split('.').collect();
        let node = Node {
            key: parts[parts.len() - 1].to_string(),
            path: path.to_string(),
            level: parts.len() as u32,
            metadata: NodeMetadata::from(meta),
            children: Vec::new(),
        };
        Ok(self.push_node(node, parent))
    }
}

/// 渲染层消费的扁平节点记录
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNodeRecord {
    pub key: String,
    pub path: String,
    pub level: u32,
    /// 直接子节点数量，供折叠判断
    pub children: usize,
    pub metadata: NodeMetadata,
}

/// 前序深度优先展开：父节点严格先于其后代，兄弟按记录顺序
///
/// 纯函数，对同一棵树重复调用产出完全相同的序列
pub fn flatten_tree(tree: &StructureTree) -> Vec<TreeNodeRecord> {
    fn traverse(tree: &StructureTree, idx: usize, out: &mut Vec<TreeNodeRecord>) {
        let node = &tree.nodes[idx];
        out.push(TreeNodeRecord {
            key: node.key.clone(),
            path: node.path.clone(),
            level: node.level,
            children: node.children.len(),
            metadata: node.metadata.clone(),
        });
        for &child in &node.children {
            traverse(tree, child, out);
        }
    }

    let mut result = Vec::with_capacity(tree.nodes.len());
    for &root in &tree.roots {
        traverse(tree, root, &mut result);
    }
    result
}

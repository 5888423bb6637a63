//! 模板结构树引擎库
//!
//! 提供JSON样例扁平化、类型提取、结构树的正反向构建、
//! 前序展开与单选导航状态，以及模板实体的文件存储

pub mod model;
pub mod utils;

// 重新导出主要类型
pub use model::flatten::{extract_structure_types, flatten_structure, TypeTag};
pub use model::selection::{SelectionEntry, SelectionMap};
pub use model::structure_tree::{flatten_tree, Node, NodeMetadata, StructureTree, TreeNodeRecord};
pub use model::template::{
    example_template, validate_template, Category, FieldMetadata, Template,
};
pub use model::template_state::{AppError, TemplateState};
pub use utils::store::TemplateStore;

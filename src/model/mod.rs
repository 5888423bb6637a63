//! 数据模型层：扁平化、结构树、选择状态与模板实体

pub mod flatten;
pub mod selection;
pub mod structure_tree;
pub mod template;
pub mod template_state;

//! TemplateState：当前模板的核心状态，串起扁平化、树构建与单选导航

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::flatten::{extract_structure_types, flatten_structure};
use crate::model::selection::{SelectionEntry, SelectionMap};
use crate::model::structure_tree::{flatten_tree, StructureTree, TreeNodeRecord};
use crate::model::template::Template;
use crate::utils::fs::{read_json_file, write_json_file};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON解析失败: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("孤立路径: {path} 的父路径 {parent} 不在元数据中")]
    OrphanPath { path: String, parent: String },
    #[error("未找到: {0}")]
    NotFound(String),
    #[error("状态错误: {0}")]
    State(String),
}

type SelectionCallback = Box<dyn FnMut(Option<&TreeNodeRecord>)>;

/// 应用核心状态：已加载模板、其展开后的节点列表与选择映射
///
/// 树不做增量修改：来源变更时整棵重建并重置选择
#[derive(Default)]
pub struct TemplateState {
    pub source_path: Option<PathBuf>,
    pub template: Option<Template>,
    pub tree_flat: Vec<TreeNodeRecord>,
    pub selection: SelectionMap,
    on_selection_changed: Option<SelectionCallback>,
}

impl TemplateState {
    /// 加载模板并重建结构树
    ///
    /// 已有字段元数据时走反向构建（重新打开保存过的实体，样例值已不可得）；
    /// 否则由样例结构正向构建
    pub fn load_template(&mut self, template: Template) -> Result<(), AppError> {
        let tree = if template.fields_metadata.is_empty() {
            let flat = flatten_structure(&template.structure, "");
            let types = extract_structure_types(&template.structure, "");
            StructureTree::from_sample(&flat, &types)
        } else {
            StructureTree::from_metadata(&template.fields_metadata)?
        };

        self.tree_flat = flatten_tree(&tree);
        self.selection = SelectionMap::new(&self.tree_flat);
        self.template = Some(template);
        tracing::info!("结构树重建完成，共 {} 个节点", self.tree_flat.len());
        Ok(())
    }

    /// 从JSON文件加载模板
    pub fn load_file(&mut self, p: &Path) -> Result<(), AppError> {
        let value = read_json_file(p)?;
        let template: Template = serde_json::from_value(value)?;
        self.load_template(template)?;
        self.source_path = Some(p.to_path_buf());
        Ok(())
    }

    /// 将当前模板保存到指定路径（格式化输出）
    pub fn save_to_file(&self, p: &Path) -> Result<(), AppError> {
        let template = self
            .template
            .as_ref()
            .ok_or_else(|| AppError::State("模板尚未加载".into()))?;
        write_json_file(p, template)?;
        tracing::info!("模板已保存到: {}", p.display());
        Ok(())
    }

    /// 注册选中变化回调（选中节点记录，清空时为None）
    pub fn on_selection_changed(
        &mut self,
        callback: impl FnMut(Option<&TreeNodeRecord>) + 'static,
    ) {
        self.on_selection_changed = Some(Box::new(callback));
    }

    /// 切换某条路径的选中态，触发回调并返回新的选中记录
    pub fn toggle_selection(&mut self, path: &str) -> Option<TreeNodeRecord> {
        let selected = self.selection.toggle(path).map(str::to_string);
        let record = selected
            .as_deref()
            .and_then(|p| self.tree_flat.iter().find(|r| r.path == p))
            .cloned();
        if let Some(callback) = self.on_selection_changed.as_mut() {
            callback(record.as_ref());
        }
        record
    }

    /// 当前选择映射的视图
    pub fn selection_entries(&self) -> Vec<SelectionEntry> {
        self.selection.entries()
    }

    /// 选中节点的祖先路径集（这些分支必须渲染为展开）
    pub fn selected_parents(&self) -> Vec<String> {
        self.selection.ancestor_paths()
    }
}

//! 单选导航状态：整棵树至多一个节点处于选中态
//!
//! 内部只保存 `Option<路径>`，对外再派生 路径→布尔 的映射视图，
//! 从构造上排除"多个条目同时为true"的一类缺陷

use serde::Serialize;

use crate::model::structure_tree::TreeNodeRecord;

/// 选择映射的一条视图记录
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionEntry {
    pub path: String,
    pub status: bool,
}

/// 与一棵已展开的树并行的选择状态
#[derive(Debug, Clone, Default)]
pub struct SelectionMap {
    /// 树的全部路径，保持展开顺序
    paths: Vec<String>,
    selected: Option<String>,
}

/// 真正的分段前缀判定：`a` 是 `a.b` 的祖先，但不是 `a.bc`（字符串包含会误判）
fn is_segment_ancestor(ancestor: &str, path: &str) -> bool {
    path.strip_prefix(ancestor)
        .map_or(false, |rest| rest.starts_with('.'))
}

impl SelectionMap {
    /// 随一棵新展开的树初始化，每个节点一条记录，全部未选中
    pub fn new(records: &[TreeNodeRecord]) -> Self {
        Self {
            paths: records.iter().map(|r| r.path.clone()).collect(),
            selected: None,
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn selected_path(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// 切换某条路径的选中态并返回新的选中路径
    ///
    /// 再次切换当前选中路径回到无选中；切换其他已知路径无条件把
    /// 唯一的选中位挪过去；未知路径等价于"其余全部置false"，即清空
    pub fn toggle(&mut self, path: &str) -> Option<&str> {
        if self.selected.as_deref() == Some(path) {
            self.selected = None;
        } else if self.paths.iter().any(|p| p == path) {
            self.selected = Some(path.to_string());
        } else {
            self.selected = None;
        }
        self.selected.as_deref()
    }

    /// 派生 {path, status} 视图：至多一条status为true
    pub fn entries(&self) -> Vec<SelectionEntry> {
        self.paths
            .iter()
            .map(|p| SelectionEntry {
                path: p.clone(),
                status: self.selected.as_deref() == Some(p.as_str()),
            })
            .collect()
    }

    /// 当前选中路径的祖先集：这些折叠分支必须渲染为展开
    pub fn ancestor_paths(&self) -> Vec<String> {
        let Some(selected) = self.selected.as_deref() else {
            return Vec::new();
        };
        self.paths
            .iter()
            .filter(|p| is_segment_ancestor(p, selected))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::structure_tree::NodeMetadata;

    fn record(path: &str) -> TreeNodeRecord {
        TreeNodeRecord {
            key: path.rsplit('.').next().unwrap_or(path).to_string(),
            path: path.to_string(),
            level: path.split('.').count() as u32,
            children: 0,
            metadata: NodeMetadata {
                description: String::new(),
                type_tag: None,
                options: Vec::new(),
                optional: false,
            },
        }
    }

    fn sample_map() -> SelectionMap {
        let records: Vec<TreeNodeRecord> = ["a", "a.b", "a.bc", "a.b.c", "d"]
            .into_iter()
            .map(record)
            .collect();
        SelectionMap::new(&records)
    }

    #[test]
    fn test_initial_state_all_false() {
        let map = sample_map();
        assert_eq!(map.selected_path(), None);
        assert!(map.entries().iter().all(|e| !e.status), "初始全部未选中");
        assert_eq!(map.len(), 5);
    }

    #[test]
    fn test_toggle_exclusivity() {
        let mut map = sample_map();
        map.toggle("a.b");
        map.toggle("a.bc");

        let entries = map.entries();
        let selected: Vec<&SelectionEntry> = entries.iter().filter(|e| e.status).collect();
        assert_eq!(selected.len(), 1, "恰好一条为true");
        assert_eq!(selected[0].path, "a.bc", "选中位应挪到后切换的路径");
    }

    #[test]
    fn test_toggle_cancel() {
        let mut map = sample_map();
        assert_eq!(map.toggle("a.b"), Some("a.b"));
        assert_eq!(map.toggle("a.b"), None, "再次切换同一路径应清空");
        assert!(map.entries().iter().all(|e| !e.status));
    }

    #[test]
    fn test_toggle_unknown_path_clears() {
        let mut map = sample_map();
        map.toggle("a.b");
        assert_eq!(map.toggle("nope"), None, "未知路径等价于全部置false");
    }

    #[test]
    fn test_ancestor_paths_segment_prefix() {
        let mut map = sample_map();
        map.toggle("a.b.c");
        assert_eq!(map.ancestor_paths(), vec!["a".to_string(), "a.b".to_string()]);

        // 共享字符串前缀的兄弟不是祖先
        map.toggle("a.bc");
        assert_eq!(map.ancestor_paths(), vec!["a".to_string()], "a.b不是a.bc的祖先");
    }

    #[test]
    fn test_ancestor_paths_empty_without_selection() {
        let mut map = sample_map();
        map.toggle("a");
        map.toggle("a");
        assert!(map.ancestor_paths().is_empty());
    }
}

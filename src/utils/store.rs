//! 模板持久化：单个JSON文件承载一组模板，按id读写删除
//!
//! 文件不存在视为空集合；同id保存即覆盖

use std::path::PathBuf;

use uuid::Uuid;

use crate::model::template::Template;
use crate::model::template_state::AppError;
use crate::utils::fs::{read_json_file, write_json_file};

/// 文件后端的模板集合
#[derive(Debug, Clone)]
pub struct TemplateStore {
    path: PathBuf,
}

impl TemplateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 读出全部模板；后端文件缺席时返回空集合
    pub fn get_all(&self) -> Result<Vec<Template>, AppError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let value = read_json_file(&self.path)?;
        Ok(serde_json::from_value(value)?)
    }

    /// 按id取出模板
    pub fn get(&self, id: &str) -> Result<Template, AppError> {
        self.get_all()?
            .into_iter()
            .find(|t| t.id.as_deref() == Some(id))
            .ok_or_else(|| AppError::NotFound(format!("模板不存在: {}", id)))
    }

    /// 保存模板并返回其id；无id时生成一个，同id的旧版本被覆盖
    pub fn save(&self, mut template: Template) -> Result<String, AppError> {
        let id = match template.id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                let generated = format!("id_{}", Uuid::new_v4().simple());
                template.id = Some(generated.clone());
                generated
            }
        };

        let mut items: Vec<Template> = self
            .get_all()?
            .into_iter()
            .filter(|t| t.id.as_deref() != Some(id.as_str()))
            .collect();
        items.push(template);
        write_json_file(&self.path, &items)?;
        tracing::info!("模板已保存: {}", id);
        Ok(id)
    }

    /// 按id删除模板；id不存在时静默成功
    pub fn delete(&self, id: &str) -> Result<(), AppError> {
        let items: Vec<Template> = self
            .get_all()?
            .into_iter()
            .filter(|t| t.id.as_deref() != Some(id))
            .collect();
        write_json_file(&self.path, &items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::template::example_template;
    use serde_json::json;
    use tempfile::tempdir;

    fn template_named(id: Option<&str>, name: &str) -> Template {
        serde_json::from_value(json!({
            "id": id,
            "name": name,
            "description": "测试模板",
            "structure": {"event": name}
        }))
        .unwrap()
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let store = TemplateStore::new(dir.path().join("templates.json"));
        assert!(store.get_all().expect("缺席文件应视为空集合").is_empty());
    }

    #[test]
    fn test_save_and_get_round_trip() {
        let dir = tempdir().unwrap();
        let store = TemplateStore::new(dir.path().join("templates.json"));

        let id = store.save(example_template().unwrap()).expect("保存应成功");
        assert_eq!(id, "purchase");

        let fetched = store.get("purchase").expect("按id取出应成功");
        assert_eq!(fetched.name, "Purchase");
        assert_eq!(fetched.fields_metadata.len(), 8, "元数据映射应完整往返");
    }

    #[test]
    fn test_save_without_id_generates_one() {
        let dir = tempdir().unwrap();
        let store = TemplateStore::new(dir.path().join("templates.json"));

        let id = store.save(template_named(None, "anon")).unwrap();
        assert!(id.starts_with("id_"), "生成的id应带前缀: {}", id);
        assert_eq!(store.get(&id).unwrap().name, "anon");
    }

    #[test]
    fn test_save_same_id_overwrites() {
        let dir = tempdir().unwrap();
        let store = TemplateStore::new(dir.path().join("templates.json"));

        store.save(template_named(Some("t1"), "first")).unwrap();
        store.save(template_named(Some("t1"), "second")).unwrap();

        let all = store.get_all().unwrap();
        assert_eq!(all.len(), 1, "同id保存应覆盖而非追加");
        assert_eq!(all[0].name, "second");
    }

    #[test]
    fn test_get_unknown_id_not_found() {
        let dir = tempdir().unwrap();
        let store = TemplateStore::new(dir.path().join("templates.json"));
        store.save(template_named(Some("t1"), "first")).unwrap();

        assert!(matches!(store.get("nope"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_delete_removes_only_target() {
        let dir = tempdir().unwrap();
        let store = TemplateStore::new(dir.path().join("templates.json"));
        store.save(template_named(Some("t1"), "first")).unwrap();
        store.save(template_named(Some("t2"), "second")).unwrap();

        store.delete("t1").expect("删除应成功");

        let all = store.get_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id.as_deref(), Some("t2"));

        // 再删一个不存在的id：静默成功
        store.delete("t1").expect("重复删除应静默成功");
        assert_eq!(store.get_all().unwrap().len(), 1);
    }
}

//! 模板实体：样例结构 + 字段元数据 + 描述信息，与持久化JSON形状一一对应

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::flatten::TypeTag;

/// 模板分类标签
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub label: String,
    pub color: String,
}

/// 单条路径的字段元数据（持久化形状，options可以缺席）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMetadata {
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub type_tag: Option<TypeTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub optional: bool,
}

/// 模板实体：structure是原始样例JSON，fieldsMetadata是路径→元数据的平面映射
///
/// 字段全部带默认值，允许先加载再校验（与编辑器的工作流一致）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default)]
    pub structure: Value,
    #[serde(rename = "fieldsMetadata", default)]
    pub fields_metadata: IndexMap<String, FieldMetadata>,
}

/// 保存前的模板校验，返回人类可读的问题清单（空清单即通过）
pub fn validate_template(template: &Template) -> Vec<String> {
    let mut errors = Vec::new();

    if template.name.trim().is_empty() {
        errors.push("缺少或无效的 name".to_string());
    }
    if template.description.trim().is_empty() {
        errors.push("缺少或无效的 description".to_string());
    }
    if !template.structure.is_object() {
        errors.push("缺少或无效的 structure 对象".to_string());
    }
    if template.fields_metadata.is_empty() {
        errors.push("警告: fieldsMetadata 为空".to_string());
    }

    errors
}

/// 内置示例模板：元数据映射包含完整祖先链，可直接反向构建
pub const EXAMPLE_TEMPLATE: &str = r#"{
  "id": "purchase",
  "name": "Purchase",
  "category": {
    "label": "Omnichannel",
    "color": "green"
  },
  "description": "Triggered when a user completes a purchase online",
  "structure": {
    "event": "purchase",
    "ecommerce": {
      "items": [
        {
          "item_id": "{{item_id}}",
          "item_name": "{{item_name}}",
          "price": "{{price}}"
        }
      ],
      "payment_method": "{{payment_method}}"
    }
  },
  "fieldsMetadata": {
    "event": {
      "description": "Name of the event sent",
      "type": "string",
      "optional": false
    },
    "ecommerce": {
      "description": "Ecommerce payload",
      "type": "object",
      "optional": false
    },
    "ecommerce.items": {
      "description": "Products involved in the purchase",
      "type": "array",
      "optional": false
    },
    "ecommerce.items.items[i]": {
      "description": "Sampled product entry",
      "type": null,
      "optional": false
    },
    "ecommerce.items.items[i].item_id": {
      "description": "Unique ID of the product",
      "type": "string",
      "optional": false
    },
    "ecommerce.items.items[i].item_name": {
      "description": "Name of the product",
      "type": "string",
      "optional": true
    },
    "ecommerce.items.items[i].price": {
      "description": "Price displayed to the user",
      "type": "number",
      "optional": false
    },
    "ecommerce.payment_method": {
      "description": "Payment method used for the purchase",
      "type": "string",
      "optional": true,
      "options": ["digital wallet", "bnpl", "card-based", "cryptocurrency"]
    }
  }
}"#;

/// 解析内置示例模板
pub fn example_template() -> Result<Template, serde_json::Error> {
    serde_json::from_str(EXAMPLE_TEMPLATE)
}

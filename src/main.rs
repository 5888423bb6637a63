//! 程序入口：初始化日志，加载模板JSON并打印展开后的结构树

use std::path::PathBuf;

use tracing_subscriber::fmt::SubscriberBuilder;

use moban_shu::{example_template, validate_template, TemplateState};

fn main() -> anyhow::Result<()> {
    // 初始化日志输出
    let _ = SubscriberBuilder::default()
        .with_max_level(tracing::Level::INFO)
        .try_init();

    let mut state = TemplateState::default();
    match std::env::args().nth(1) {
        Some(p) => state.load_file(&PathBuf::from(p))?,
        None => {
            tracing::info!("未提供文件路径，使用内置示例模板");
            state.load_template(example_template()?)?;
        }
    }

    if let Some(template) = &state.template {
        println!("模板: {} ({})", template.name, template.description);
        for problem in validate_template(template) {
            tracing::warn!("{}", problem);
        }
    }

    for record in &state.tree_flat {
        let indent = "  ".repeat(record.level.saturating_sub(1) as usize);
        let type_label = record
            .metadata
            .type_tag
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());
        let optional = if record.metadata.optional { " (可选)" } else { "" };
        println!("{}{} [{}]{}  {}", indent, record.key, type_label, optional, record.path);
    }

    Ok(())
}

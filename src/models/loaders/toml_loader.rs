use crate::models::job::JobSpec;
use anyhow::{Context, Result};
use tokio::fs;

/// 从 TOML 文件加载任务描述
pub async fn load_job_file(path: &str) -> Result<JobSpec> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取任务文件: {}", path))?;

    let job: JobSpec =
        toml::from_str(&content).with_context(|| format!("无法解析任务文件: {}", path))?;

    tracing::info!("✓ 已加载任务文件: {}", path);

    Ok(job)
}

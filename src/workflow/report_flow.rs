//! 报表任务流程 - 流程层
//!
//! 核心职责：定义"一份问卷报表"的完整处理流程
//!
//! 流程顺序：
//! 1. 请求生成 student_analysis 报表
//! 2. 轮询进度直到完成（有轮询上限）
//! 3. 获取文件地址 → 下载 → 解析 CSV
//! 4. 打上课程 ID 与问卷标题两列

use crate::error::{AppError, AppResult};
use crate::models::report::ReportTable;
use crate::services::report_service::{self, ReportService};
use crate::workflow::report_ctx::ReportCtx;
use serde_json::Value;
use tracing::{info, warn};

/// 报表任务流程
///
/// - 编排 ReportService 的各步能力
/// - 每个任务使用独立连接
/// - 任何一步失败都转换为带问卷标题标签的错误消息，不影响其他任务
pub struct ReportFlow {
    service: ReportService,
}

impl ReportFlow {
    pub fn new(service: ReportService) -> Self {
        Self { service }
    }

    /// 执行一个报表任务
    ///
    /// 成功返回打好标签列的表格；失败返回 `[标题] 原因` 形式的错误消息
    pub async fn run(&self, ctx: &ReportCtx) -> Result<ReportTable, String> {
        match self.try_run(ctx).await {
            Ok(table) => {
                info!(
                    "[报表 {}] ✓ 完成: {} ({} 行)",
                    ctx.submission_index + 1,
                    ctx.title,
                    table.rows.len()
                );
                Ok(table)
            }
            Err(e) => {
                warn!("[报表 {}] ⚠️ 失败: {}", ctx.submission_index + 1, e);
                Err(format!("[{}] {}", ctx.title, e))
            }
        }
    }

    async fn try_run(&self, ctx: &ReportCtx) -> AppResult<ReportTable> {
        let client = self.service.session();

        info!(
            "[报表 {}] 📤 请求生成报表: {} (课程 {})",
            ctx.submission_index + 1,
            ctx.title,
            ctx.course_id
        );
        let report = self
            .service
            .create_report(&client, &ctx.course_id, ctx.quiz_id)
            .await?;

        let report_id = report
            .get("id")
            .and_then(Value::as_u64)
            .ok_or_else(|| AppError::report_missing_field("id"))?;
        let progress_url = report
            .get("progress_url")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::report_missing_field("progress_url"))?;

        self.service.wait_until_ready(&client, progress_url).await?;

        let file_url = self
            .service
            .fetch_file_url(&client, &ctx.course_id, ctx.quiz_id, report_id)
            .await?;
        let bytes = self.service.download_report(&client, &file_url).await?;

        let mut table = report_service::parse_report_csv(&bytes)?;
        table.push_column("Curso_ID", &ctx.course_id);
        table.push_column("Encuesta", &ctx.title);

        Ok(table)
    }
}

//! 报表批次 - 编排层
//!
//! 把选定的问卷按提交顺序扇出到工作池，汇合后恢复提交顺序。
//! 单个任务的失败记为带标签的错误消息，不会中断批次；
//! 提交多少个 SurveySpec 就产出多少个 ReportResult

use crate::models::report::{ReportResult, ReportTable};
use crate::models::survey::SurveySpec;
use crate::orchestrator::worker_pool;
use crate::services::ReportService;
use crate::utils::logging;
use crate::workflow::{ReportCtx, ReportFlow};
use anyhow::Result;

/// 并发生成所有选定问卷的报表
///
/// 返回按提交顺序排列的结果与错误消息列表。错误之间的顺序不承诺，
/// 结果的顺序严格等于 `specs` 的顺序
pub async fn run_batch(
    service: &ReportService,
    specs: &[SurveySpec],
    max_concurrent: usize,
) -> Result<(Vec<ReportResult>, Vec<String>)> {
    logging::log_report_batch_start(specs.len(), max_concurrent);

    let jobs: Vec<_> = specs
        .iter()
        .enumerate()
        .map(|(index, spec)| {
            let flow = ReportFlow::new(service.clone());
            let ctx = ReportCtx::new(index, spec);
            async move { flow.run(&ctx).await }
        })
        .collect();

    let slots = worker_pool::run_ordered(jobs, max_concurrent).await?;

    Ok(assemble_results(specs, slots))
}

/// 扇入：把按序号落位的任务结果转成 ReportResult 序列
///
/// 槽位下标就是提交序号，结果天然保持提交顺序；
/// panic 掉的任务（槽位为 None）也补上一条带标签的错误
fn assemble_results(
    specs: &[SurveySpec],
    slots: Vec<Option<Result<ReportTable, String>>>,
) -> (Vec<ReportResult>, Vec<String>) {
    let mut results = Vec::with_capacity(specs.len());
    let mut errors = Vec::new();

    for (index, (spec, slot)) in specs.iter().zip(slots).enumerate() {
        let table = match slot {
            Some(Ok(table)) => Some(table),
            Some(Err(message)) => {
                errors.push(message);
                None
            }
            None => {
                errors.push(format!("[{}] 任务执行失败", spec.title));
                None
            }
        };
        results.push(ReportResult {
            submission_index: index,
            course_id: spec.course_id.clone(),
            survey_title: spec.title.clone(),
            table,
        });
    }

    (results, errors)
}

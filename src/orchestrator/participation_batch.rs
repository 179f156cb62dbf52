//! 参与度统计批次 - 编排层
//!
//! 统计调用只读且开销小，用比报表批次更高的并发度，
//! 各任务共享同一个只读客户端

use crate::models::survey::{ParticipationRecord, SurveySpec};
use crate::orchestrator::worker_pool;
use crate::services::ParticipationService;
use anyhow::Result;
use std::collections::HashSet;
use tracing::warn;

/// 并发计算所有选定问卷的参与度，结果按提交顺序返回
pub async fn collect_participation(
    service: &ParticipationService,
    specs: &[SurveySpec],
    max_concurrent: usize,
) -> Result<Vec<ParticipationRecord>> {
    let jobs: Vec<_> = specs
        .iter()
        .map(|spec| {
            let service = service.clone();
            let spec = spec.clone();
            async move { service.compute(&spec).await }
        })
        .collect();

    let slots = worker_pool::run_ordered(jobs, max_concurrent).await?;

    let records = specs
        .iter()
        .zip(slots)
        .filter_map(|(spec, slot)| match slot {
            Some(record) => Some(record),
            None => {
                warn!("⚠️ 参与度统计任务失败: {}", spec.title);
                None
            }
        })
        .collect();

    Ok(records)
}

/// 按操作员输入的课程顺序分组（重复输入的课程只显示一组）
pub fn group_by_course<'a>(
    records: &'a [ParticipationRecord],
    course_ids: &[String],
) -> Vec<(String, Vec<&'a ParticipationRecord>)> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut groups = Vec::new();
    for course_id in course_ids {
        if !seen.insert(course_id.as_str()) {
            continue;
        }
        let group: Vec<&ParticipationRecord> = records
            .iter()
            .filter(|record| record.course_id == *course_id)
            .collect();
        groups.push((course_id.clone(), group));
    }
    groups
}

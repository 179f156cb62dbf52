//! 报表任务上下文

use crate::models::survey::SurveySpec;

/// 一个报表任务的上下文
///
/// `submission_index` 在提交时分配，贯穿任务始终，汇总阶段用它恢复
/// 提交顺序。关联键只用这个显式序号，绝不依赖任务对象的身份
#[derive(Debug, Clone)]
pub struct ReportCtx {
    pub submission_index: usize,
    pub course_id: String,
    pub quiz_id: u64,
    pub title: String,
}

impl ReportCtx {
    pub fn new(submission_index: usize, spec: &SurveySpec) -> Self {
        Self {
            submission_index,
            course_id: spec.course_id.clone(),
            quiz_id: spec.survey_id,
            title: spec.title.clone(),
        }
    }
}

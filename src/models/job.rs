//! 任务描述文件模型

use serde::Deserialize;

/// 操作员的任务描述
///
/// `course_ids` 是自由文本（逗号/空白/换行分隔均可），由
/// `utils::text::parse_course_ids` 解析；`titles` 为空表示选择所有发现的问卷标题
#[derive(Debug, Clone, Deserialize)]
pub struct JobSpec {
    pub course_ids: String,
    #[serde(default)]
    pub titles: Vec<String>,
}

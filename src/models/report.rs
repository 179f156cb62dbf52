//! 报表数据模型

/// 解析后的表格数据（列名 + 行）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 追加一列，每一行填入相同的值
    pub fn push_column(&mut self, header: impl Into<String>, value: &str) {
        self.headers.push(header.into());
        for row in &mut self.rows {
            row.push(value.to_string());
        }
    }
}

/// 一份问卷的报表结果
///
/// 每提交一个 SurveySpec 必定产生一个 ReportResult（成功或 table 为 None 的失败），
/// `submission_index` 是提交时分配的序号，汇总阶段用它恢复提交顺序
#[derive(Debug, Clone)]
pub struct ReportResult {
    pub submission_index: usize,
    pub course_id: String,
    pub survey_title: String,
    pub table: Option<ReportTable>,
}

/// 课程元数据（每个课程 ID 只抓取一次，之后只读）
#[derive(Debug, Clone, Default)]
pub struct CourseInfo {
    pub name: String,
    pub course_code: String,
    pub account_id: Option<u64>,
    pub subaccount_name: String,
}

impl CourseInfo {
    /// 抓取失败时的兜底元数据
    pub fn fallback(course_id: &str) -> Self {
        Self {
            name: format!("Curso {}", course_id),
            ..Self::default()
        }
    }
}

//! 问卷数据模型

use std::collections::HashMap;

/// 问卷类型：普通问卷或计分问卷之外的测验一律在发现阶段排除
pub const SURVEY_QUIZ_TYPES: [&str; 2] = ["survey", "graded_survey"];

/// 一门课程中发现的一份问卷
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveySpec {
    /// 所属课程 ID（保持操作员输入的字符串形式）
    pub course_id: String,
    /// Canvas 测验 ID
    pub survey_id: u64,
    /// 问卷标题
    pub title: String,
    /// 测验类型（survey / graded_survey）
    pub quiz_type: String,
}

/// 一次扫描的完整结果
///
/// 管线各阶段之间显式传递的状态对象，不依赖任何全局可变状态。
/// `course_ids` 保持操作员的输入顺序，`all` 按课程顺序、课程内按发现顺序排列
#[derive(Debug, Clone, Default)]
pub struct SurveyScan {
    pub course_ids: Vec<String>,
    pub by_course: HashMap<String, Vec<SurveySpec>>,
    pub all: Vec<SurveySpec>,
}

impl SurveyScan {
    pub fn new(course_ids: Vec<String>) -> Self {
        Self {
            course_ids,
            by_course: HashMap::new(),
            all: Vec::new(),
        }
    }

    /// 记录一门课程的发现结果
    pub fn add_course(&mut self, course_id: &str, surveys: Vec<SurveySpec>) {
        self.all.extend(surveys.iter().cloned());
        self.by_course.insert(course_id.to_string(), surveys);
    }
}

/// 一份问卷的参与度统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipationRecord {
    pub course_id: String,
    pub survey_title: String,
    /// 活跃学生人数（已排除 "Test Student"）
    pub enrolled: usize,
    /// 已作答的不同学生人数
    pub answered: usize,
    pub pct_answered: String,
    pub not_answered: usize,
    pub pct_not_answered: String,
}

impl ParticipationRecord {
    /// 由人数计算参与度
    ///
    /// 作答人数来自与选课名单不同的接口，可能出现 answered > enrolled，
    /// 未作答人数取非负下限。enrolled 为 0 时百分比固定显示 "0%"
    pub fn new(
        course_id: impl Into<String>,
        survey_title: impl Into<String>,
        enrolled: usize,
        answered: usize,
    ) -> Self {
        let not_answered = enrolled.saturating_sub(answered);
        let (pct_answered, pct_not_answered) = if enrolled > 0 {
            (
                format!("{:.1}%", answered as f64 / enrolled as f64 * 100.0),
                format!("{:.1}%", not_answered as f64 / enrolled as f64 * 100.0),
            )
        } else {
            ("0%".to_string(), "0%".to_string())
        };
        Self {
            course_id: course_id.into(),
            survey_title: survey_title.into(),
            enrolled,
            answered,
            pct_answered,
            not_answered,
            pct_not_answered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participation_zero_enrolled_renders_zero_percent() {
        let record = ParticipationRecord::new("101", "Encuesta", 0, 3);
        assert_eq!(record.pct_answered, "0%");
        assert_eq!(record.pct_not_answered, "0%");
        assert_eq!(record.not_answered, 0);
    }

    #[test]
    fn test_participation_percentages_one_decimal() {
        let record = ParticipationRecord::new("101", "Encuesta", 10, 3);
        assert_eq!(record.not_answered, 7);
        assert_eq!(record.pct_answered, "30.0%");
        assert_eq!(record.pct_not_answered, "70.0%");
    }

    #[test]
    fn test_participation_answered_exceeding_enrolled_floors_at_zero() {
        let record = ParticipationRecord::new("101", "Encuesta", 2, 5);
        assert_eq!(record.not_answered, 0);
        assert_eq!(record.pct_answered, "250.0%");
        assert_eq!(record.pct_not_answered, "0.0%");
    }
}

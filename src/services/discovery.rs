//! 问卷发现服务 - 业务能力层
//!
//! 只负责"列出一门课程里的问卷"能力，不关心批次与选择

use crate::clients::CanvasClient;
use crate::models::survey::{SurveySpec, SURVEY_QUIZ_TYPES};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// 问卷发现服务
pub struct SurveyDiscovery {
    client: Arc<CanvasClient>,
}

impl SurveyDiscovery {
    pub fn new(client: Arc<CanvasClient>) -> Self {
        Self { client }
    }

    /// 列出一门课程中的问卷
    ///
    /// 拉取分页的测验列表，保留 quiz_type 为 survey / graded_survey 的条目。
    /// 课程不可达或没有测验时返回空列表而不是错误：单个无效的课程 ID
    /// 不能中断其余课程的扫描
    pub async fn find_surveys(&self, course_id: &str) -> Vec<SurveySpec> {
        let endpoint = format!("/courses/{}/quizzes", course_id);
        let quizzes = match self.client.get_paginated(&endpoint).await {
            Ok(quizzes) => quizzes,
            Err(e) => {
                warn!("⚠️ 课程 {} 的测验列表拉取失败: {}", course_id, e);
                return Vec::new();
            }
        };

        let surveys: Vec<SurveySpec> = quizzes
            .iter()
            .filter_map(|quiz| survey_from_quiz(course_id, quiz))
            .collect();

        debug!("课程 {}: {} 份问卷", course_id, surveys.len());
        surveys
    }
}

/// 从测验 JSON 构造 SurveySpec（非问卷类型返回 None）
fn survey_from_quiz(course_id: &str, quiz: &Value) -> Option<SurveySpec> {
    let quiz_type = quiz.get("quiz_type")?.as_str()?;
    if !SURVEY_QUIZ_TYPES.contains(&quiz_type) {
        return None;
    }
    Some(SurveySpec {
        course_id: course_id.to_string(),
        survey_id: quiz.get("id")?.as_u64()?,
        title: quiz.get("title")?.as_str()?.to_string(),
        quiz_type: quiz_type.to_string(),
    })
}

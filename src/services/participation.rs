//! 参与度统计服务 - 业务能力层
//!
//! 只负责计算单份问卷的参与度，批次编排在 orchestrator

use crate::clients::CanvasClient;
use crate::models::survey::{ParticipationRecord, SurveySpec};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

/// 选课名单中需要排除的测试账号显示名
const TEST_STUDENT_NAME: &str = "Test Student";

/// 参与度统计服务
///
/// 各调用之间没有共享可变状态，只共享只读的网络连接，
/// 可以安全地在不相关的 (课程, 问卷) 之间并发执行
#[derive(Clone)]
pub struct ParticipationService {
    client: Arc<CanvasClient>,
}

impl ParticipationService {
    pub fn new(client: Arc<CanvasClient>) -> Self {
        Self { client }
    }

    /// 计算一份问卷的参与度
    ///
    /// 任一接口失败都降级为 0 并记录警告，不中断批次
    pub async fn compute(&self, spec: &SurveySpec) -> ParticipationRecord {
        let enrolled = self.count_enrolled_students(&spec.course_id).await;
        let answered = self
            .count_distinct_respondents(&spec.course_id, spec.survey_id)
            .await;
        ParticipationRecord::new(&spec.course_id, &spec.title, enrolled, answered)
    }

    /// 统计课程中活跃的学生人数（排除 "Test Student"）
    async fn count_enrolled_students(&self, course_id: &str) -> usize {
        let endpoint = format!(
            "/courses/{}/enrollments?type[]=StudentEnrollment&state[]=active&per_page=100",
            course_id
        );
        match self.client.get_paginated(&endpoint).await {
            Ok(enrollments) => count_active_students(&enrollments),
            Err(e) => {
                warn!("⚠️ 课程 {} 的选课名单拉取失败: {}", course_id, e);
                0
            }
        }
    }

    /// 统计已作答的不同学生人数
    async fn count_distinct_respondents(&self, course_id: &str, quiz_id: u64) -> usize {
        let endpoint = format!(
            "/courses/{}/quizzes/{}/submissions?per_page=100",
            course_id, quiz_id
        );
        match self.client.get(&endpoint).await {
            Ok(body) => count_respondents(&body),
            Err(e) => {
                warn!(
                    "⚠️ 课程 {} 测验 {} 的作答记录拉取失败: {}",
                    course_id, quiz_id, e
                );
                0
            }
        }
    }
}

/// 统计活跃学生（按显示名排除测试账号）
fn count_active_students(enrollments: &[Value]) -> usize {
    enrollments
        .iter()
        .filter(|entry| {
            entry
                .get("user")
                .and_then(|user| user.get("name"))
                .and_then(Value::as_str)
                != Some(TEST_STUDENT_NAME)
        })
        .count()
}

/// 统计作答人数
///
/// Canvas 返回 { "quiz_submissions": [...] }。同一学生的多次提交只计一次，
/// 只统计带 submitted_at 或 finished_at 时间戳的记录
fn count_respondents(body: &Value) -> usize {
    let submissions = match body.get("quiz_submissions").and_then(Value::as_array) {
        Some(submissions) => submissions,
        None => return 0,
    };

    let mut user_ids: HashSet<u64> = HashSet::new();
    for submission in submissions {
        let has_timestamp = submission
            .get("submitted_at")
            .is_some_and(|v| !v.is_null())
            || submission.get("finished_at").is_some_and(|v| !v.is_null());
        if !has_timestamp {
            continue;
        }
        if let Some(user_id) = submission.get("user_id").and_then(Value::as_u64) {
            user_ids.insert(user_id);
        }
    }
    user_ids.len()
}

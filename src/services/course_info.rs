//! 课程元数据服务 - 业务能力层
//!
//! 每个课程 ID 只抓取一次，结果缓存到批次结束。缓存是显式对象而不是
//! 全局状态，生命周期跟随一次运行

use crate::clients::CanvasClient;
use crate::models::report::CourseInfo;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

/// 按课程 ID 缓存的元数据查询
pub struct CourseInfoCache {
    client: Arc<CanvasClient>,
    cache: Mutex<HashMap<String, CourseInfo>>,
}

impl CourseInfoCache {
    pub fn new(client: Arc<CanvasClient>) -> Self {
        Self {
            client,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// 获取课程元数据（名称、课程代码、子账户名称）
    ///
    /// 任何一步失败都返回兜底值（"Curso {id}"、空代码），只记警告
    pub async fn get(&self, course_id: &str) -> CourseInfo {
        {
            let cache = self.cache.lock().await;
            if let Some(info) = cache.get(course_id) {
                return info.clone();
            }
        }

        let info = self.fetch(course_id).await;

        let mut cache = self.cache.lock().await;
        cache.entry(course_id.to_string()).or_insert(info).clone()
    }

    /// 解析一组课程 ID 的元数据（保持传入顺序无关，结果按 ID 建映射）
    pub async fn resolve(&self, course_ids: &[String]) -> HashMap<String, CourseInfo> {
        let mut infos = HashMap::new();
        for course_id in course_ids {
            if infos.contains_key(course_id) {
                continue;
            }
            infos.insert(course_id.clone(), self.get(course_id).await);
        }
        infos
    }

    async fn fetch(&self, course_id: &str) -> CourseInfo {
        let course = match self.client.get(&format!("/courses/{}", course_id)).await {
            Ok(course) => course,
            Err(e) => {
                warn!("⚠️ 课程 {} 的元数据拉取失败: {}", course_id, e);
                return CourseInfo::fallback(course_id);
            }
        };

        let name = course
            .get("name")
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or_else(|| format!("Curso {}", course_id));
        let course_code = course
            .get("course_code")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let account_id = course.get("account_id").and_then(Value::as_u64);

        let subaccount_name = match account_id {
            Some(account_id) => self.fetch_account_name(account_id).await,
            None => String::new(),
        };

        CourseInfo {
            name,
            course_code,
            account_id,
            subaccount_name,
        }
    }

    async fn fetch_account_name(&self, account_id: u64) -> String {
        match self.client.get(&format!("/accounts/{}", account_id)).await {
            Ok(account) => account
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            Err(e) => {
                warn!("⚠️ 子账户 {} 的信息拉取失败: {}", account_id, e);
                String::new()
            }
        }
    }
}

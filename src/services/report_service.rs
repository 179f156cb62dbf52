//! 报表任务服务 - 业务能力层
//!
//! 提供单个报表任务的各步能力：请求生成、轮询进度、获取文件地址、
//! 下载与解析。完整流程的编排在 workflow

use crate::clients::CanvasClient;
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult, ReportError};
use crate::models::report::ReportTable;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// 报表进度的终态标记
const REPORT_COMPLETED_STATE: &str = "completed";

/// 报表任务服务
#[derive(Clone)]
pub struct ReportService {
    base_url: String,
    token: String,
    poll_interval: Duration,
    poll_max_attempts: usize,
}

impl ReportService {
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.canvas_base_url.clone(),
            token: config.canvas_api_token.clone(),
            poll_interval: Duration::from_secs(config.report_poll_interval_secs),
            poll_max_attempts: config.report_poll_max_attempts,
        }
    }

    /// 为一个报表任务建立独立连接
    ///
    /// 报表任务持有长时间的轮询循环，远端在任务过程中可能设置
    /// 重定向等连接级状态，各任务之间不共用连接
    pub fn session(&self) -> CanvasClient {
        CanvasClient::from_parts(&self.base_url, &self.token)
    }

    /// 请求生成 student_analysis 报表（包含全部历史版本）
    ///
    /// 返回远端的报表描述（含 id 与 progress_url）。
    /// 请求被拒绝（非 2xx）映射为 SubmissionRejected
    pub async fn create_report(
        &self,
        client: &CanvasClient,
        course_id: &str,
        quiz_id: u64,
    ) -> AppResult<Value> {
        let endpoint = format!("/courses/{}/quizzes/{}/reports", course_id, quiz_id);
        let payload = json!({
            "quiz_report": {
                "report_type": "student_analysis",
                "includes_all_versions": true
            }
        });

        match client.post(&endpoint, &payload).await {
            Ok(report) => Ok(report),
            Err(AppError::Api(ApiError::BadResponse { status, .. })) => {
                Err(AppError::Report(ReportError::SubmissionRejected { status }))
            }
            Err(e) => Err(e),
        }
    }

    /// 轮询进度接口直到报表生成完成
    ///
    /// 固定间隔轮询，超过最大次数返回 Timeout。超时只影响当前任务
    pub async fn wait_until_ready(
        &self,
        client: &CanvasClient,
        progress_url: &str,
    ) -> AppResult<()> {
        for attempt in 0..self.poll_max_attempts {
            let progress = client.get_absolute(progress_url).await?;
            let state = progress
                .get("workflow_state")
                .and_then(Value::as_str)
                .unwrap_or_default();
            if state == REPORT_COMPLETED_STATE {
                debug!("报表生成完成 (第 {} 次轮询)", attempt + 1);
                return Ok(());
            }
            sleep(self.poll_interval).await;
        }
        Err(AppError::Report(ReportError::Timeout {
            attempts: self.poll_max_attempts,
        }))
    }

    /// 获取已完成报表的文件下载地址
    pub async fn fetch_file_url(
        &self,
        client: &CanvasClient,
        course_id: &str,
        quiz_id: u64,
        report_id: u64,
    ) -> AppResult<String> {
        let endpoint = format!(
            "/courses/{}/quizzes/{}/reports/{}",
            course_id, quiz_id, report_id
        );
        let report = client.get(&endpoint).await?;
        report
            .get("file")
            .and_then(|file| file.get("url"))
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| AppError::report_missing_field("file.url"))
    }

    /// 下载报表文件
    pub async fn download_report(&self, client: &CanvasClient, url: &str) -> AppResult<Vec<u8>> {
        client.download(url).await
    }
}

/// 把下载的 CSV 内容解析为表格
pub fn parse_report_csv(bytes: &[u8]) -> AppResult<ReportTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(AppError::from)?
        .iter()
        .map(String::from)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(AppError::from)?;
        let mut row: Vec<String> = record.iter().map(String::from).collect();
        // 宽度不足的行补空，保证与列名对齐
        if row.len() < headers.len() {
            row.resize(headers.len(), String::new());
        }
        rows.push(row);
    }

    Ok(ReportTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &[u8] =
        b"name,id,attempt,1234: Pregunta 1\nAna,11,1,Si\nLuis,12,1,No\n";

    #[test]
    fn test_parse_report_csv_headers_and_rows() {
        let table = parse_report_csv(SAMPLE_CSV).unwrap();
        assert_eq!(table.headers, vec!["name", "id", "attempt", "1234: Pregunta 1"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["Ana", "11", "1", "Si"]);
    }

    #[test]
    fn test_parse_report_csv_pads_short_rows() {
        let table = parse_report_csv(b"a,b,c\n1,2\n").unwrap();
        assert_eq!(table.rows[0], vec!["1", "2", ""]);
    }

    #[test]
    fn test_parse_report_csv_deterministic() {
        // 相同输入重复解析得到完全一致的表格
        let first = parse_report_csv(SAMPLE_CSV).unwrap();
        let second = parse_report_csv(SAMPLE_CSV).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_report_csv_empty_body() {
        let table = parse_report_csv(b"").unwrap();
        assert!(table.headers.is_empty());
        assert!(table.is_empty());
    }
}

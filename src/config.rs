use crate::error::{AppError, AppResult, ConfigError};

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// Canvas API 基础 URL（例如 https://xxx.instructure.com/api/v1）
    pub canvas_base_url: String,
    /// Canvas API Bearer 令牌
    pub canvas_api_token: String,
    /// 任务描述文件（课程 ID 与选定的问卷标题）
    pub job_file: String,
    /// 导出的 Excel 文件路径
    pub output_file: String,
    /// 输出日志文件
    pub output_log_file: String,
    /// 同时执行的报表任务数量
    pub max_concurrent_reports: usize,
    /// 同时执行的参与度统计数量
    pub max_concurrent_participation: usize,
    /// 报表生成的轮询间隔（秒）
    pub report_poll_interval_secs: u64,
    /// 报表生成的最大轮询次数
    pub report_poll_max_attempts: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            canvas_base_url: String::new(),
            canvas_api_token: String::new(),
            job_file: "job.toml".to_string(),
            output_file: "reporte_general_encuestas.xlsx".to_string(),
            output_log_file: "output.txt".to_string(),
            max_concurrent_reports: 4,
            max_concurrent_participation: 8,
            report_poll_interval_secs: 2,
            report_poll_max_attempts: 120,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            canvas_base_url: std::env::var("CANVAS_BASE_URL").unwrap_or(default.canvas_base_url),
            canvas_api_token: std::env::var("CANVAS_API_TOKEN").unwrap_or(default.canvas_api_token),
            job_file: std::env::var("JOB_FILE").unwrap_or(default.job_file),
            output_file: std::env::var("OUTPUT_FILE").unwrap_or(default.output_file),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            max_concurrent_reports: std::env::var("MAX_CONCURRENT_REPORTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_reports),
            max_concurrent_participation: std::env::var("MAX_CONCURRENT_PARTICIPATION").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_participation),
            report_poll_interval_secs: std::env::var("REPORT_POLL_INTERVAL_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.report_poll_interval_secs),
            report_poll_max_attempts: std::env::var("REPORT_POLL_MAX_ATTEMPTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.report_poll_max_attempts),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 启动前检查：基础 URL 与令牌缺失是致命错误，必须在任何请求之前拦截
    pub fn validate(&self) -> AppResult<()> {
        if self.canvas_base_url.trim().is_empty() {
            return Err(AppError::Config(ConfigError::BaseUrlNotSet));
        }
        if self.canvas_api_token.trim().is_empty() {
            return Err(AppError::Config(ConfigError::TokenNotSet));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty_base_url() {
        let config = Config::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        let config = Config {
            canvas_base_url: "https://canvas.example.com/api/v1".to_string(),
            canvas_api_token: "token".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }
}

//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责管线各阶段的衔接和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：配置预检（基础 URL / 令牌缺失直接终止）、建立共享客户端
//! 2. **任务加载**：读取任务文件，解析课程 ID 列表
//! 3. **扫描**：按输入顺序逐课程发现问卷
//! 4. **选择**：按归一化标题匹配选定的问卷
//! 5. **两个批次**：参与度统计（高并发）与报表生成（低并发）
//! 6. **汇总**：按提交顺序写出工作簿，输出全局统计
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个问卷的细节
//! - **显式状态**：扫描结果通过 SurveyScan 值在阶段之间传递
//! - **部分失败不致命**：除配置预检外，任何失败都降级为警告继续执行

use crate::clients::CanvasClient;
use crate::config::Config;
use crate::error::AppError;
use crate::models::survey::{SurveyScan, SurveySpec};
use crate::models::{load_job_file, CourseInfo, ParticipationRecord};
use crate::orchestrator::{participation_batch, report_batch};
use crate::services::{
    CourseInfoCache, ParticipationService, ReportService, SpreadsheetAssembler, SurveyDiscovery,
};
use crate::utils::logging;
use crate::utils::text::{clean_string, parse_course_ids};
use anyhow::Result;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    client: Arc<CanvasClient>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 配置预检：在任何请求之前拦截缺失的基础 URL / 令牌
        config.validate()?;

        // 初始化日志文件
        logging::init_log_file(&config.output_log_file)?;

        logging::log_startup(
            config.max_concurrent_reports,
            config.max_concurrent_participation,
        );

        let client = Arc::new(CanvasClient::new(&config));

        Ok(Self { config, client })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        // 加载任务文件
        let job = load_job_file(&self.config.job_file).await?;
        let course_ids = parse_course_ids(&job.course_ids);
        if course_ids.is_empty() {
            warn!("⚠️ 任务文件中没有有效的课程 ID，程序结束");
            return Ok(());
        }
        info!("📋 课程 ID: {:?}", course_ids);

        // 扫描所有课程
        let scan = self.scan_courses(course_ids).await;
        logging::log_scan_summary(scan.course_ids.len(), scan.all.len());
        if scan.all.is_empty() {
            warn!("⚠️ 所有课程中都没有发现问卷，程序结束");
            return Ok(());
        }

        // 按标题选定问卷
        let selected = select_surveys(&scan, &job.titles);
        if selected.is_empty() {
            warn!("⚠️ 没有匹配选定标题的问卷，程序结束");
            return Ok(());
        }
        info!("✅ 选定 {} 份问卷", selected.len());

        // 详细日志（如果启用）：按课程列出发现的问卷
        if self.config.verbose_logging {
            log_discovered_surveys(&scan, &selected);
        }

        // 课程元数据（名称、子账户、课程代码），每个课程只抓取一次
        let cache = CourseInfoCache::new(self.client.clone());
        let course_infos = cache.resolve(&scan.course_ids).await;

        // 参与度统计批次
        info!("\n📊 正在统计参与度...");
        let participation_service = ParticipationService::new(self.client.clone());
        let records = participation_batch::collect_participation(
            &participation_service,
            &selected,
            self.config.max_concurrent_participation,
        )
        .await?;
        log_participation_summary(&records, &scan.course_ids, &course_infos);

        // 报表批次
        let report_service = ReportService::new(&self.config);
        let (results, errors) = report_batch::run_batch(
            &report_service,
            &selected,
            self.config.max_concurrent_reports,
        )
        .await?;

        // 汇总工作簿
        let assembled = SpreadsheetAssembler::assemble(&results, &course_infos)?;
        tokio::fs::write(&self.config.output_file, &assembled.bytes)
            .await
            .map_err(|e| AppError::file_write_failed(&self.config.output_file, e))?;

        // 输出最终统计
        for error in &errors {
            warn!("⚠️ {}", error);
        }
        let success = results.iter().filter(|r| r.table.is_some()).count();
        logging::print_final_stats(
            success,
            errors.len(),
            selected.len(),
            &self.config.output_file,
            &self.config.output_log_file,
        );

        Ok(())
    }

    /// 按输入顺序逐课程扫描问卷
    ///
    /// 重复输入的课程 ID 会被再扫描一次，其问卷也会重复进入候选列表
    async fn scan_courses(&self, course_ids: Vec<String>) -> SurveyScan {
        info!("\n🔍 正在扫描课程中的问卷...");
        let discovery = SurveyDiscovery::new(self.client.clone());
        let mut scan = SurveyScan::new(course_ids);

        for course_id in scan.course_ids.clone() {
            let surveys = discovery.find_surveys(&course_id).await;
            if surveys.is_empty() {
                info!("课程 {}: 没有发现问卷", course_id);
            } else {
                info!("课程 {}: 发现 {} 份问卷", course_id, surveys.len());
            }
            scan.add_course(&course_id, surveys);
        }

        scan
    }
}

/// 按标题选定问卷
///
/// 标题列表为空表示全选。匹配基于归一化后的标题，选中一个标题
/// 意味着选中所有课程中同名的问卷；返回顺序保持扫描顺序
fn select_surveys(scan: &SurveyScan, titles: &[String]) -> Vec<SurveySpec> {
    if titles.is_empty() {
        return scan.all.clone();
    }
    let wanted: HashSet<String> = titles.iter().map(|t| clean_string(t)).collect();
    scan.all
        .iter()
        .filter(|spec| wanted.contains(&clean_string(&spec.title)))
        .cloned()
        .collect()
}

/// 按课程列出发现的问卷，选中的条目带标记
fn log_discovered_surveys(scan: &SurveyScan, selected: &[SurveySpec]) {
    let selected_titles: HashSet<String> = selected
        .iter()
        .map(|spec| clean_string(&spec.title))
        .collect();
    let mut seen: HashSet<&str> = HashSet::new();
    for course_id in &scan.course_ids {
        if !seen.insert(course_id.as_str()) {
            continue;
        }
        let surveys = match scan.by_course.get(course_id) {
            Some(surveys) if !surveys.is_empty() => surveys,
            _ => continue,
        };
        info!("📚 课程 {}:", course_id);
        for survey in surveys {
            let mark = if selected_titles.contains(&clean_string(&survey.title)) {
                "✅ "
            } else {
                ""
            };
            info!("  {}{} (ID: {})", mark, survey.title, survey.survey_id);
        }
    }
}

/// 按课程输出参与度统计
fn log_participation_summary(
    records: &[ParticipationRecord],
    course_ids: &[String],
    course_infos: &HashMap<String, CourseInfo>,
) {
    for (course_id, group) in participation_batch::group_by_course(records, course_ids) {
        if group.is_empty() {
            continue;
        }
        let course_name = course_infos
            .get(&course_id)
            .map(|info| info.name.clone())
            .unwrap_or_else(|| format!("Curso {}", course_id));
        info!("📚 {}:", course_name);
        for record in group {
            info!(
                "  {} | 已答: {}/{} ({}) | 未答: {} ({})",
                record.survey_title,
                record.answered,
                record.enrolled,
                record.pct_answered,
                record.not_answered,
                record.pct_not_answered
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(course_id: &str, survey_id: u64, title: &str) -> SurveySpec {
        SurveySpec {
            course_id: course_id.to_string(),
            survey_id,
            title: title.to_string(),
            quiz_type: "survey".to_string(),
        }
    }

    fn scan_with(specs: Vec<SurveySpec>) -> SurveyScan {
        let mut scan = SurveyScan::new(vec!["1".to_string(), "2".to_string()]);
        let mut by_course: HashMap<String, Vec<SurveySpec>> = HashMap::new();
        for s in &specs {
            by_course.entry(s.course_id.clone()).or_default().push(s.clone());
        }
        for (course_id, surveys) in by_course {
            scan.by_course.insert(course_id, surveys);
        }
        scan.all = specs;
        scan
    }

    #[test]
    fn test_select_surveys_empty_titles_selects_all() {
        let scan = scan_with(vec![spec("1", 10, "A"), spec("2", 20, "B")]);
        assert_eq!(select_surveys(&scan, &[]).len(), 2);
    }

    #[test]
    fn test_select_surveys_matches_normalized_titles_across_courses() {
        let scan = scan_with(vec![
            spec("1", 10, "Encuesta Café"),
            spec("2", 20, "encuesta cafe"),
            spec("2", 21, "Otra"),
        ]);
        let selected = select_surveys(&scan, &["ENCUESTA CAFE".to_string()]);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].course_id, "1");
        assert_eq!(selected[1].course_id, "2");
    }

    #[test]
    fn test_select_surveys_keeps_scan_order() {
        let scan = scan_with(vec![
            spec("1", 10, "B"),
            spec("1", 11, "A"),
            spec("2", 20, "B"),
        ]);
        let selected = select_surveys(&scan, &["B".to_string(), "A".to_string()]);
        let order: Vec<_> = selected.iter().map(|s| s.survey_id).collect();
        assert_eq!(order, vec![10, 11, 20]);
    }
}

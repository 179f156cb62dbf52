//! 日志工具模块
//!
//! 提供 tracing 初始化与各阶段横幅/统计输出的辅助函数

use anyhow::Result;
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志
///
/// 默认 info 级别，可通过 RUST_LOG 覆盖
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // 重复初始化（例如测试里）直接忽略
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// 初始化日志文件
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n问卷报表日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(max_concurrent_reports: usize, max_concurrent_participation: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 问卷报表汇总模式");
    info!("📊 报表并发数: {}", max_concurrent_reports);
    info!("📊 参与度统计并发数: {}", max_concurrent_participation);
    info!("{}", "=".repeat(60));
}

/// 记录扫描结果
pub fn log_scan_summary(course_count: usize, survey_count: usize) {
    info!("✓ 扫描完成: {} 个课程，共发现 {} 份问卷", course_count, survey_count);
}

/// 记录报表批次开始信息
pub fn log_report_batch_start(total: usize, max_concurrent: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始生成 {} 份问卷报表", total);
    info!("📋 将以最多 {} 个并发任务处理", max_concurrent);
    info!("{}", "=".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(
    success: usize,
    failed: usize,
    total: usize,
    output_file: &str,
    log_file_path: &str,
) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("📥 报表文件: {}", output_file);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

//! # Survey Report Finder
//!
//! 一个用于汇总 Canvas 问卷报表的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - 持有稀缺资源（带鉴权的 HTTP 连接），只暴露能力
//! - `CanvasClient` - 统一的 API 调用入口，透明跟随分页
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个工作单元
//! - `SurveyDiscovery` - 单课程问卷发现能力
//! - `ParticipationService` - 单份问卷参与度统计能力
//! - `ReportService` - 报表任务的各步能力（生成/轮询/下载/解析）
//! - `CourseInfoCache` - 课程元数据查询（带显式缓存）
//! - `SpreadsheetAssembler` - 工作簿汇总能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一份报表"的完整处理流程
//! - `ReportCtx` - 上下文封装（提交序号 + 课程 + 测验 + 标题）
//! - `ReportFlow` - 流程编排（生成 → 轮询 → 下载 → 解析 → 打标签）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 应用入口，衔接管线各阶段
//! - `orchestrator/worker_pool` - 有界并发池，按提交顺序汇合结果
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::CanvasClient;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{CourseInfo, JobSpec, ParticipationRecord, ReportResult, ReportTable, SurveySpec};
pub use orchestrator::App;
pub use workflow::{ReportCtx, ReportFlow};

//! 编排层
//!
//! - `batch_processor` - 应用入口，衔接扫描/选择/统计/报表/汇总各阶段
//! - `worker_pool` - 有界并发工作池，提交顺序在汇合时恢复
//! - `participation_batch` - 参与度统计批次（高并发，共享连接）
//! - `report_batch` - 报表生成批次（低并发，任务各自持有连接）

pub mod batch_processor;
pub mod participation_batch;
pub mod report_batch;
pub mod worker_pool;

pub use batch_processor::App;
pub use report_batch::run_batch;
pub use worker_pool::run_ordered;

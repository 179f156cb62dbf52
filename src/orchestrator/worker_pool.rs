//! 有界并发工作池
//!
//! 参与度统计与报表生成两个批次共用的扇出/扇入核心：
//! 提交时为每个任务分配序号，Semaphore 限制并发，全部任务汇合后
//! 按序号落位，无论完成顺序如何，输出都保持提交顺序

use anyhow::Result;
use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::error;

/// 在有界并发池中执行一组任务，按提交顺序返回结果
///
/// 每个任务的结果落在它提交序号对应的槽位；任务 panic 时该槽位为
/// `None`，不影响其他任务
pub async fn run_ordered<T, Fut>(jobs: Vec<Fut>, max_concurrent: usize) -> Result<Vec<Option<T>>>
where
    Fut: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(max_concurrent));
    let total = jobs.len();
    let mut handles = Vec::with_capacity(total);

    for (index, job) in jobs.into_iter().enumerate() {
        let permit = semaphore.clone().acquire_owned().await?;
        let handle = tokio::spawn(async move {
            let _permit = permit;
            (index, job.await)
        });
        handles.push(handle);
    }

    let mut slots: Vec<Option<T>> = Vec::with_capacity(total);
    slots.resize_with(total, || None);

    for joined in join_all(handles).await {
        match joined {
            Ok((index, value)) => slots[index] = Some(value),
            Err(e) => {
                // 槽位保持 None，由调用方按序号补记错误
                error!("任务执行失败: {}", e);
            }
        }
    }

    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::sleep;

    #[tokio::test]
    async fn test_run_ordered_restores_submission_order() {
        // 完成顺序为 C, B, A，输出仍按提交顺序 A, B, C
        let delays = [60u64, 30, 10];
        let jobs: Vec<_> = delays
            .iter()
            .enumerate()
            .map(|(index, &delay)| async move {
                sleep(Duration::from_millis(delay)).await;
                index
            })
            .collect();

        let slots = run_ordered(jobs, 3).await.unwrap();
        assert_eq!(slots, vec![Some(0), Some(1), Some(2)]);
    }

    #[tokio::test]
    async fn test_run_ordered_panicked_job_leaves_slot_empty() {
        let jobs: Vec<_> = (0..3)
            .map(|index| async move {
                if index == 1 {
                    panic!("boom");
                }
                index
            })
            .collect();

        let slots = run_ordered(jobs, 2).await.unwrap();
        assert_eq!(slots, vec![Some(0), None, Some(2)]);
    }

    #[tokio::test]
    async fn test_run_ordered_respects_concurrency_limit() {
        static IN_FLIGHT: AtomicUsize = AtomicUsize::new(0);
        static MAX_SEEN: AtomicUsize = AtomicUsize::new(0);

        let jobs: Vec<_> = (0..8)
            .map(|index| async move {
                let current = IN_FLIGHT.fetch_add(1, Ordering::SeqCst) + 1;
                MAX_SEEN.fetch_max(current, Ordering::SeqCst);
                sleep(Duration::from_millis(20)).await;
                IN_FLIGHT.fetch_sub(1, Ordering::SeqCst);
                index
            })
            .collect();

        let slots = run_ordered(jobs, 2).await.unwrap();
        assert_eq!(slots.len(), 8);
        assert!(MAX_SEEN.load(Ordering::SeqCst) <= 2);
    }
}

use survey_report_finder::services::{CourseInfoCache, ParticipationService, SurveyDiscovery};
use survey_report_finder::utils::logging;
use survey_report_finder::{CanvasClient, Config};
use std::sync::Arc;

#[tokio::test]
#[ignore] // 默认忽略，需要配置 CANVAS_BASE_URL / CANVAS_API_TOKEN 后手动运行：cargo test -- --ignored
async fn test_scan_single_course() {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();
    config.validate().expect("配置不完整");

    // 注意：请根据实际情况修改课程 ID
    let course_id = std::env::var("TEST_COURSE_ID").unwrap_or_else(|_| "12345".to_string());

    let client = Arc::new(CanvasClient::new(&config));
    let discovery = SurveyDiscovery::new(client);

    let surveys = discovery.find_surveys(&course_id).await;
    println!("课程 {} 中发现 {} 份问卷", course_id, surveys.len());
    for survey in &surveys {
        println!("  {} (ID: {}, 类型: {})", survey.title, survey.survey_id, survey.quiz_type);
    }
}

#[tokio::test]
#[ignore]
async fn test_participation_for_first_survey() {
    logging::init();

    let config = Config::from_env();
    config.validate().expect("配置不完整");

    let course_id = std::env::var("TEST_COURSE_ID").unwrap_or_else(|_| "12345".to_string());

    let client = Arc::new(CanvasClient::new(&config));
    let discovery = SurveyDiscovery::new(client.clone());

    let surveys = discovery.find_surveys(&course_id).await;
    let first = surveys.first().expect("课程中没有问卷");

    let participation = ParticipationService::new(client);
    let record = participation.compute(first).await;

    println!(
        "{} | 已答: {}/{} ({})",
        record.survey_title, record.answered, record.enrolled, record.pct_answered
    );
    assert_eq!(record.survey_title, first.title);
}

#[tokio::test]
#[ignore]
async fn test_course_info_cache_hits_once() {
    logging::init();

    let config = Config::from_env();
    config.validate().expect("配置不完整");

    let course_id = std::env::var("TEST_COURSE_ID").unwrap_or_else(|_| "12345".to_string());

    let client = Arc::new(CanvasClient::new(&config));
    let cache = CourseInfoCache::new(client);

    let first = cache.get(&course_id).await;
    let second = cache.get(&course_id).await;

    println!("课程: {} | 子账户: {}", first.name, first.subaccount_name);
    assert_eq!(first.name, second.name);
}

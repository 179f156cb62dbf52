pub mod course_info;
pub mod discovery;
pub mod participation;
pub mod report_service;
pub mod spreadsheet;

pub use course_info::CourseInfoCache;
pub use discovery::SurveyDiscovery;
pub use participation::ParticipationService;
pub use report_service::ReportService;
pub use spreadsheet::{AssembledReport, SpreadsheetAssembler};

pub mod job;
pub mod loaders;
pub mod report;
pub mod survey;

pub use job::JobSpec;
pub use loaders::load_job_file;
pub use report::{CourseInfo, ReportResult, ReportTable};
pub use survey::{ParticipationRecord, SurveyScan, SurveySpec};

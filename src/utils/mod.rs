pub mod logging;
pub mod text;

pub use text::{clean_string, normalize_course_code, parse_course_ids};

//! 报表汇总工作簿 - 业务能力层
//!
//! 把按提交顺序排好的报表结果写入单个 "Reportes" 工作表：
//! 每份问卷一个标签行，整个表只在第一个非空块写一次列名行，
//! 后续块在同一游标下顺序追加；空结果写占位行并记录警告

use crate::error::AppResult;
use crate::models::report::{CourseInfo, ReportResult, ReportTable};
use crate::utils::text::normalize_course_code;
use rust_xlsxwriter::Workbook;
use std::collections::HashMap;
use tracing::warn;

/// 工作表名称
const SHEET_NAME: &str = "Reportes";
/// 空结果的占位文本
const NO_DATA_MARKER: &str = "Sin datos para esta encuesta.";

/// 汇总完成的工作簿
pub struct AssembledReport {
    pub bytes: Vec<u8>,
    pub warnings: Vec<String>,
}

/// 工作表中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
enum SheetRow {
    /// 标签行（问卷 + 课程）
    Label(String),
    /// 列名行（整个表只出现一次）
    Header(Vec<String>),
    /// 数据行
    Data(Vec<String>),
    /// 空结果占位行
    Marker(String),
    /// 空行（只推进游标）
    Blank,
}

/// 报表汇总器
pub struct SpreadsheetAssembler;

impl SpreadsheetAssembler {
    /// 汇总所有报表结果为 xlsx 字节
    ///
    /// `results` 必须已按提交顺序排列；失败的结果（table 为 None）
    /// 也会占据一个标签 + 占位块
    pub fn assemble(
        results: &[ReportResult],
        course_infos: &HashMap<String, CourseInfo>,
    ) -> AppResult<AssembledReport> {
        let (rows, warnings) = plan_rows(results, course_infos);
        for warning in &warnings {
            warn!("⚠️ {}", warning);
        }

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        for (row_index, row) in rows.iter().enumerate() {
            let row_index = row_index as u32;
            match row {
                SheetRow::Label(text) | SheetRow::Marker(text) => {
                    worksheet.write_string(row_index, 0, text)?;
                }
                SheetRow::Header(cells) | SheetRow::Data(cells) => {
                    for (col_index, cell) in cells.iter().enumerate() {
                        worksheet.write_string(row_index, col_index as u16, cell)?;
                    }
                }
                SheetRow::Blank => {}
            }
        }

        let bytes = workbook.save_to_buffer()?;
        Ok(AssembledReport { bytes, warnings })
    }
}

/// 规划工作表的行布局
///
/// 纯函数：输入结果与课程元数据，输出行序列与警告列表
fn plan_rows(
    results: &[ReportResult],
    course_infos: &HashMap<String, CourseInfo>,
) -> (Vec<SheetRow>, Vec<String>) {
    let mut rows = Vec::new();
    let mut warnings = Vec::new();
    let mut header_written = false;

    for result in results {
        let info = course_infos.get(&result.course_id);
        let course_name = info
            .map(|i| i.name.clone())
            .unwrap_or_else(|| format!("Curso {}", result.course_id));

        rows.push(SheetRow::Label(format!(
            "Encuesta: {} | Curso: {}",
            result.survey_title, course_name
        )));

        match &result.table {
            Some(table) if !table.is_empty() => {
                let enriched = enrich_table(table, info);
                if !header_written {
                    rows.push(SheetRow::Header(enriched.headers.clone()));
                    header_written = true;
                }
                for data_row in &enriched.rows {
                    rows.push(SheetRow::Data(data_row.clone()));
                }
                rows.push(SheetRow::Blank);
            }
            _ => {
                rows.push(SheetRow::Marker(NO_DATA_MARKER.to_string()));
                rows.push(SheetRow::Blank);
                rows.push(SheetRow::Blank);
                warnings.push(format!(
                    "[{}] 该问卷没有可用的报表数据 (课程 {})",
                    result.survey_title, result.course_id
                ));
            }
        }
    }

    (rows, warnings)
}

/// 追加子账户名称与规整后的课程代码两列
fn enrich_table(table: &ReportTable, info: Option<&CourseInfo>) -> ReportTable {
    let mut enriched = table.clone();
    let (subaccount, course_code) = match info {
        Some(info) => (
            info.subaccount_name.clone(),
            normalize_course_code(&info.course_code),
        ),
        None => (String::new(), String::new()),
    };
    enriched.push_column("Subcuenta", &subaccount);
    enriched.push_column("Sigla", &course_code);
    enriched
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with_data(index: usize, course_id: &str, title: &str) -> ReportResult {
        ReportResult {
            submission_index: index,
            course_id: course_id.to_string(),
            survey_title: title.to_string(),
            table: Some(ReportTable {
                headers: vec!["name".to_string(), "id".to_string()],
                rows: vec![vec!["Ana".to_string(), "11".to_string()]],
            }),
        }
    }

    fn empty_result(index: usize, course_id: &str, title: &str) -> ReportResult {
        ReportResult {
            submission_index: index,
            course_id: course_id.to_string(),
            survey_title: title.to_string(),
            table: None,
        }
    }

    fn infos() -> HashMap<String, CourseInfo> {
        let mut map = HashMap::new();
        map.insert(
            "101".to_string(),
            CourseInfo {
                name: "Álgebra".to_string(),
                course_code: "MAT101-02-2025".to_string(),
                account_id: Some(5),
                subaccount_name: "Ingeniería".to_string(),
            },
        );
        map
    }

    #[test]
    fn test_plan_rows_header_only_on_first_block() {
        let results = vec![
            result_with_data(0, "101", "Encuesta A"),
            result_with_data(1, "101", "Encuesta B"),
        ];
        let (rows, warnings) = plan_rows(&results, &infos());
        assert!(warnings.is_empty());

        let header_count = rows
            .iter()
            .filter(|r| matches!(r, SheetRow::Header(_)))
            .count();
        assert_eq!(header_count, 1);
        // 第二个块的标签后直接跟数据行
        assert!(matches!(rows[4], SheetRow::Label(_)));
        assert!(matches!(rows[5], SheetRow::Data(_)));
    }

    #[test]
    fn test_plan_rows_empty_second_survey_gets_marker_not_header() {
        let results = vec![
            result_with_data(0, "101", "Encuesta A"),
            empty_result(1, "101", "Encuesta B"),
        ];
        let (rows, warnings) = plan_rows(&results, &infos());

        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("[Encuesta B]"));

        // 布局: 标签, 列名, 数据, 空行, 标签, 占位, 空行, 空行
        assert!(matches!(rows[0], SheetRow::Label(_)));
        assert!(matches!(rows[1], SheetRow::Header(_)));
        assert!(matches!(rows[2], SheetRow::Data(_)));
        assert_eq!(rows[3], SheetRow::Blank);
        assert!(matches!(rows[4], SheetRow::Label(_)));
        assert_eq!(rows[5], SheetRow::Marker(NO_DATA_MARKER.to_string()));
    }

    #[test]
    fn test_plan_rows_label_uses_course_name_fallback() {
        let results = vec![empty_result(0, "999", "Encuesta X")];
        let (rows, _) = plan_rows(&results, &HashMap::new());
        assert_eq!(
            rows[0],
            SheetRow::Label("Encuesta: Encuesta X | Curso: Curso 999".to_string())
        );
    }

    #[test]
    fn test_enrich_table_appends_subaccount_and_code() {
        let table = ReportTable {
            headers: vec!["name".to_string()],
            rows: vec![vec!["Ana".to_string()]],
        };
        let info = CourseInfo {
            name: "Álgebra".to_string(),
            course_code: "MAT101-02-2025".to_string(),
            account_id: Some(5),
            subaccount_name: "Ingeniería".to_string(),
        };
        let enriched = enrich_table(&table, Some(&info));
        assert_eq!(enriched.headers, vec!["name", "Subcuenta", "Sigla"]);
        assert_eq!(enriched.rows[0], vec!["Ana", "Ingeniería", "MAT101-02-2025"]);
    }

    #[test]
    fn test_assemble_produces_workbook_bytes() {
        let results = vec![
            result_with_data(0, "101", "Encuesta A"),
            empty_result(1, "101", "Encuesta B"),
        ];
        let assembled = SpreadsheetAssembler::assemble(&results, &infos()).unwrap();
        assert!(!assembled.bytes.is_empty());
        assert_eq!(assembled.warnings.len(), 1);
    }
}

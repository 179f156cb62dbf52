//! 文本处理工具
//!
//! 问卷标题的归一化、课程 ID 的解析、课程代码的规整

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// 归一化自由文本（用于问卷标题的去重与匹配）
///
/// 处理顺序：去除首尾空白 → 转小写 → NFD 分解 → 去掉组合变音符号 →
/// 去掉字母/数字/空白/`.,!?-` 之外的字符
///
/// 结果是确定且幂等的：`clean_string(clean_string(s)) == clean_string(s)`
pub fn clean_string(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let decomposed: String = lowered
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect();
    match Regex::new(r"[^\w\s.,!?\-]") {
        Ok(re) => re.replace_all(&decomposed, "").into_owned(),
        Err(_) => decomposed,
    }
}

/// 从操作员输入中解析课程 ID 列表
///
/// 按空白或逗号切分，只保留纯数字的 token，保持首次出现的顺序。
/// 不做去重：重复输入的课程 ID 会被下游按值独立处理
pub fn parse_course_ids(text: &str) -> Vec<String> {
    let re = match Regex::new(r"[\s,]+") {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };
    re.split(text)
        .map(str::trim)
        .filter(|token| !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()))
        .map(String::from)
        .collect()
}

/// 规整课程代码
///
/// Canvas 的 course_code 一般形如 "MAT101-02-2025"（科目-班次-年份），
/// 但分隔与顺序不固定。提取科目、班次、年份三段，按 `-` 拼接非空段
pub fn normalize_course_code(raw: &str) -> String {
    let mut tokens: Vec<String> = Vec::new();

    if let Ok(re) = Regex::new(r"[A-Za-z]{2,}[0-9]*") {
        if let Some(m) = re.find(raw) {
            tokens.push(m.as_str().to_uppercase());
        }
    }
    let year = Regex::new(r"\b20[0-9]{2}\b")
        .ok()
        .and_then(|re| re.find(raw).map(|m| m.as_str().to_string()));
    if let Ok(re) = Regex::new(r"\b[0-9]{1,2}\b") {
        if let Some(m) = re.find(raw) {
            tokens.push(m.as_str().to_string());
        }
    }
    if let Some(year) = year {
        tokens.push(year);
    }

    tokens.retain(|t| !t.is_empty());
    tokens.join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_course_ids_keeps_digit_tokens_in_order() {
        assert_eq!(parse_course_ids("12, a, 34 56"), vec!["12", "34", "56"]);
    }

    #[test]
    fn test_parse_course_ids_mixed_separators() {
        assert_eq!(
            parse_course_ids("12345, 67890\n11223"),
            vec!["12345", "67890", "11223"]
        );
    }

    #[test]
    fn test_parse_course_ids_keeps_duplicates() {
        // 重复的课程 ID 不去重，按出现顺序保留
        assert_eq!(parse_course_ids("7 7 8"), vec!["7", "7", "8"]);
    }

    #[test]
    fn test_parse_course_ids_discards_non_digit_tokens() {
        assert!(parse_course_ids("abc, 12a, ①②").is_empty());
        assert!(parse_course_ids("").is_empty());
    }

    #[test]
    fn test_clean_string_case_and_diacritic_insensitive() {
        assert_eq!(clean_string("Café ENCUESTA"), clean_string("cafe encuesta"));
        assert_eq!(clean_string("Café ENCUESTA"), "cafe encuesta");
    }

    #[test]
    fn test_clean_string_idempotent() {
        let once = clean_string("  Encuesta Año 2025: ¿satisfacción? ");
        assert_eq!(clean_string(&once), once);
    }

    #[test]
    fn test_clean_string_strips_disallowed_punctuation() {
        assert_eq!(clean_string("a:b;c(d)"), "abcd");
        assert_eq!(clean_string("a.b,c!d?e-f"), "a.b,c!d?e-f");
    }

    #[test]
    fn test_normalize_course_code_full_shape() {
        assert_eq!(normalize_course_code("MAT101-02-2025"), "MAT101-02-2025");
    }

    #[test]
    fn test_normalize_course_code_partial_tokens() {
        assert_eq!(normalize_course_code("MAT101 2025"), "MAT101-2025");
        assert_eq!(normalize_course_code("MAT101"), "MAT101");
        assert_eq!(normalize_course_code(""), "");
    }
}

//! Answer option input parsing

/// Split free-form option input into a clean option list.
///
/// Options may be separated by newlines or commas. Each entry is trimmed
/// and blank entries are dropped; order and case are preserved.
pub fn parse_answer_options(input: &str) -> Vec<String> {
    input
        .split(['\n', ','])
        .map(str::trim)
        .filter(|option| !option.is_empty())
        .map(str::to_string)
        .collect()
}

/// Merge repeated `--option` flags with an `--options` list.
///
/// Repeated flags are kept verbatim apart from trimming, so a single option
/// may still contain a comma.
pub fn collect_answer_options(flags: &[String], list: Option<&str>) -> Vec<String> {
    let mut options: Vec<String> = flags
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();
    if let Some(list) = list {
        options.extend(parse_answer_options(list));
    }
    options
}

//! Best-effort parsing of collaborator replies. The model is asked for a
//! fixed `Header: value` section format, but the reply is still treated as
//! untrusted text: anything that does not match degrades to nothing here
//! and to a labelled default record in the callers.

use regex::Regex;

/// Splits a reply into sections, one per `Category:` header. Text before
/// the first header is ignored.
pub(crate) fn split_category_sections(text: &str) -> Vec<&str> {
    let re = match Regex::new(r"(?m)^\s*Category:") {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };
    let starts: Vec<usize> = re.find_iter(text).map(|m| m.start()).collect();
    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            text[start..end].trim()
        })
        .collect()
}

/// Extracts the value of a `Label: value` line within a section. Only the
/// first matching line counts; the value runs to the end of the line.
pub(crate) fn field(section: &str, label: &str) -> Option<String> {
    let pattern = format!(r"(?m)^\s*{}:\s*(.+)$", regex::escape(label));
    let re = Regex::new(&pattern).ok()?;
    re.captures(section)
        .map(|captures| captures[1].trim().to_string())
}

/// Removes a Markdown code fence around a JSON reply, if present.
pub(crate) fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sections() {
        let reply = "Here is my analysis.\n\
                     Category: Math Teachers\n\
                     Insight: Up 5%.\n\
                     \n\
                     Category: Smartboards\n\
                     Insight: Down $10,000.\n";
        let sections = split_category_sections(reply);
        assert_eq!(sections.len(), 2);
        assert!(sections[0].starts_with("Category: Math Teachers"));
        assert!(sections[1].starts_with("Category: Smartboards"));
    }

    #[test]
    fn test_split_no_headers() {
        assert!(split_category_sections("no structured output at all").is_empty());
    }

    #[test]
    fn test_field_extraction() {
        let section = "Category: Math Teachers\nInsight: The budget rose.\nImpact: More staff.";
        assert_eq!(
            field(section, "Category").as_deref(),
            Some("Math Teachers")
        );
        assert_eq!(field(section, "Insight").as_deref(), Some("The budget rose."));
        assert_eq!(field(section, "Recommendation"), None);
    }

    #[test]
    fn test_field_with_regex_metacharacters_in_label() {
        let section = "Trade-off: Less equipment.\nRisk Level: High";
        assert_eq!(field(section, "Trade-off").as_deref(), Some("Less equipment."));
        assert_eq!(field(section, "Risk Level").as_deref(), Some("High"));
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }
}

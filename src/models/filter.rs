use serde::Deserialize;

/// Query parameters shared by the back-office list screens. Each list
/// applies the fields it has columns for and ignores the rest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListFilter {
    pub search: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub day_of_week: Option<i64>,
}

fn selected(value: Option<&String>) -> Option<&str> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

impl ListFilter {
    /// Case-insensitive substring pattern for `lower(col) LIKE ? ESCAPE '\'`.
    pub fn search_pattern(&self) -> Option<String> {
        let term = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
        let escaped = term
            .to_lowercase()
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        Some(format!("%{}%", escaped))
    }

    /// `None` when blank or `all`.
    pub fn status(&self) -> Option<&str> {
        selected(self.status.as_ref())
    }

    pub fn category(&self) -> Option<&str> {
        selected(self.category.as_ref())
    }

    /// Programs have an active flag rather than a status column.
    pub fn active_flag(&self) -> Option<bool> {
        match self.status()? {
            "active" => Some(true),
            "inactive" => Some(false),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search(term: &str) -> ListFilter {
        ListFilter { search: Some(term.to_string()), ..Default::default() }
    }

    #[test]
    fn blank_search_matches_everything() {
        assert_eq!(search("  ").search_pattern(), None);
        assert_eq!(ListFilter::default().search_pattern(), None);
    }

    #[test]
    fn search_is_lower_cased_and_wildcards_are_escaped() {
        assert_eq!(search(" Alice ").search_pattern().as_deref(), Some("%alice%"));
        assert_eq!(search("50%_off").search_pattern().as_deref(), Some("%50\\%\\_off%"));
    }

    #[test]
    fn all_means_no_status_filter() {
        let filter = ListFilter { status: Some("all".to_string()), ..Default::default() };
        assert_eq!(filter.status(), None);

        let filter = ListFilter { status: Some("inactive".to_string()), ..Default::default() };
        assert_eq!(filter.status(), Some("inactive"));
        assert_eq!(filter.active_flag(), Some(false));
    }
}

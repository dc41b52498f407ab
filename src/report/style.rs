//! Keyword → style lookup for table cells.
//!
//! Two independent families are checked against the upper-cased cell text,
//! each in the fixed order of its table: a SWOT category (only inside SWOT
//! tables) and a severity (any table). Within a family the first rule whose
//! keyword occurs in the text wins, so a cell carries at most one category
//! style and at most one severity style.

/// Quadrant of a SWOT (DAFO) matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwotCategory {
    Strength,
    Opportunity,
    Weakness,
    Threat,
}

/// Group classification of the D'Anchiano model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Critical,
    Notable,
    Irrelevant,
}

/// Category labels in priority order. Keywords are upper-case.
pub const CATEGORY_RULES: &[(SwotCategory, &[&str])] = &[
    (SwotCategory::Strength, &["FORTALESES", "STRENGTHS"]),
    (SwotCategory::Opportunity, &["OPORTUNITATS", "OPPORTUNITIES"]),
    (SwotCategory::Weakness, &["DEBILITATS", "WEAKNESSES"]),
    (SwotCategory::Threat, &["AMENACES", "THREATS"]),
];

/// Severity labels in priority order. Keywords are upper-case.
pub const SEVERITY_RULES: &[(Severity, &[&str])] = &[
    (Severity::Critical, &["CRÍTICA", "CRÍTIQUES", "CRITICAL"]),
    (Severity::Notable, &["DESTACADA", "DESTACADES", "NOTABLE"]),
    (Severity::Irrelevant, &["IRRELLEVANT", "IRRELEVANT"]),
];

fn first_match<T: Copy>(rules: &[(T, &[&str])], text: &str) -> Option<T> {
    let upper = text.to_uppercase();
    rules
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| upper.contains(k)))
        .map(|(tag, _)| *tag)
}

/// SWOT category named by `text`, if any.
pub fn category_of(text: &str) -> Option<SwotCategory> {
    first_match(CATEGORY_RULES, text)
}

/// Severity named by `text`, if any.
pub fn severity_of(text: &str) -> Option<Severity> {
    first_match(SEVERITY_RULES, text)
}

impl SwotCategory {
    pub fn css_class(&self) -> &'static str {
        match self {
            SwotCategory::Strength => "swot-strength",
            SwotCategory::Opportunity => "swot-opportunity",
            SwotCategory::Weakness => "swot-weakness",
            SwotCategory::Threat => "swot-threat",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SwotCategory::Strength => "✚",
            SwotCategory::Opportunity => "➚",
            SwotCategory::Weakness => "✖",
            SwotCategory::Threat => "⚠",
        }
    }
}

impl Severity {
    pub fn css_class(&self) -> &'static str {
        match self {
            Severity::Critical => "severity-critical",
            Severity::Notable => "severity-notable",
            Severity::Irrelevant => "severity-irrelevant",
        }
    }
}

/// Resolved styling of one body cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellStyle {
    pub category: Option<SwotCategory>,
    pub severity: Option<Severity>,
}

impl CellStyle {
    /// Style of a body cell; categories only apply inside SWOT tables.
    pub fn for_cell(text: &str, swot: bool) -> Self {
        Self {
            category: if swot { category_of(text) } else { None },
            severity: severity_of(text),
        }
    }

    /// Value of the `class` attribute for the `<td>`.
    pub fn class_attr(&self) -> String {
        let mut class = String::from("report-td");
        for extra in [
            self.category.map(|c| c.css_class()),
            self.severity.map(|s| s.css_class()),
        ]
        .into_iter()
        .flatten()
        {
            class.push(' ');
            class.push_str(extra);
        }
        class
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_are_case_insensitive() {
        assert_eq!(category_of("Fortaleses"), Some(SwotCategory::Strength));
        assert_eq!(category_of("**amenaces**"), Some(SwotCategory::Threat));
        assert_eq!(category_of("Opportunities"), Some(SwotCategory::Opportunity));
        assert_eq!(category_of("Lideratge"), None);
    }

    #[test]
    fn first_category_in_priority_order_wins() {
        assert_eq!(
            category_of("Debilitats i Fortaleses"),
            Some(SwotCategory::Strength)
        );
    }

    #[test]
    fn severity_keywords_with_accents() {
        assert_eq!(severity_of("crítica"), Some(Severity::Critical));
        assert_eq!(severity_of("DESTACADA"), Some(Severity::Notable));
        assert_eq!(severity_of("Irrellevant"), Some(Severity::Irrelevant));
        assert_eq!(severity_of("IRRELEVANT"), Some(Severity::Irrelevant));
        assert_eq!(severity_of("pensament crític"), None);
    }

    #[test]
    fn cell_style_outside_swot_ignores_categories() {
        let style = CellStyle::for_cell("Fortaleses CRÍTICA", false);
        assert_eq!(style.category, None);
        assert_eq!(style.severity, Some(Severity::Critical));
        assert_eq!(style.class_attr(), "report-td severity-critical");
    }

    #[test]
    fn cell_style_in_swot_combines_families() {
        let style = CellStyle::for_cell("Debilitats crítiques", true);
        assert_eq!(style.category, Some(SwotCategory::Weakness));
        assert_eq!(style.severity, Some(Severity::Critical));
        assert_eq!(
            style.class_attr(),
            "report-td swot-weakness severity-critical"
        );
        assert_eq!(CellStyle::default().class_attr(), "report-td");
    }
}

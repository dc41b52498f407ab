//! Analysis request types: dimensions, profiles and their attached documents.
//!
//! A request compares a *Group* profile (what the context needs) with a
//! *Commission* profile (what the working commission actually has) for up to
//! three dimensions. Each side can be free text, an attached document, or
//! both.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three dimensions an analysis can cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dimension {
    Competencies,
    Values,
    Personality,
}

impl Dimension {
    /// All dimensions, in report order.
    pub const ALL: [Dimension; 3] = [
        Dimension::Competencies,
        Dimension::Values,
        Dimension::Personality,
    ];

    /// Label used in prompts and page headings.
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Competencies => "Competències",
            Dimension::Values => "Valors",
            Dimension::Personality => "Personalitat",
        }
    }

    /// English label; also recognised when splitting a report.
    pub fn english_label(&self) -> &'static str {
        match self {
            Dimension::Competencies => "Competencies",
            Dimension::Values => "Values",
            Dimension::Personality => "Personality",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A document sent to the provider as an inline part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Standard base64 of the raw bytes.
    pub data: String,
    pub mime_type: String,
    /// Display name (file name or last URL segment).
    pub name: String,
}

impl Attachment {
    /// Size of the decoded payload in bytes.
    pub fn decoded_len(&self) -> usize {
        let padding = self.data.bytes().rev().take_while(|&b| b == b'=').count();
        (self.data.len() / 4 * 3).saturating_sub(padding)
    }
}

/// One side of a comparison: free text and/or an attached document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub text: String,
    pub attachment: Option<Attachment>,
}

impl Profile {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// True when neither text nor a document was provided.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.attachment.is_none()
    }
}

/// Group (ideal) and Commission (reality) profiles for one dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionProfiles {
    pub group: Profile,
    pub commission: Profile,
}

impl DimensionProfiles {
    pub fn is_empty(&self) -> bool {
        self.group.is_empty() && self.commission.is_empty()
    }
}

/// Everything the provider needs for one analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub competencies: DimensionProfiles,
    pub values: DimensionProfiles,
    pub personality: DimensionProfiles,
}

impl AnalysisRequest {
    pub fn dimension(&self, dimension: Dimension) -> &DimensionProfiles {
        match dimension {
            Dimension::Competencies => &self.competencies,
            Dimension::Values => &self.values,
            Dimension::Personality => &self.personality,
        }
    }

    pub fn dimension_mut(&mut self, dimension: Dimension) -> &mut DimensionProfiles {
        match dimension {
            Dimension::Competencies => &mut self.competencies,
            Dimension::Values => &mut self.values,
            Dimension::Personality => &mut self.personality,
        }
    }

    /// Dimensions with at least one non-empty profile, in report order.
    pub fn provided_dimensions(&self) -> Vec<Dimension> {
        Dimension::ALL
            .into_iter()
            .filter(|d| !self.dimension(*d).is_empty())
            .collect()
    }

    /// Attachments in content-part order: dimension order, group before commission.
    pub fn attachments(&self) -> Vec<&Attachment> {
        Dimension::ALL
            .iter()
            .flat_map(|d| {
                let profiles = self.dimension(*d);
                [&profiles.group, &profiles.commission]
            })
            .filter_map(|p| p.attachment.as_ref())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.provided_dimensions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(name: &str) -> Attachment {
        Attachment {
            data: "JVBERi0=".into(),
            mime_type: "application/pdf".into(),
            name: name.into(),
        }
    }

    #[test]
    fn blank_text_profile_is_empty() {
        assert!(Profile::from_text("   \n").is_empty());
        assert!(!Profile::from_text("Lideratge").is_empty());
        assert!(!Profile::default().with_attachment(attachment("a.pdf")).is_empty());
    }

    #[test]
    fn provided_dimensions_keep_report_order() {
        let mut req = AnalysisRequest::default();
        req.personality.commission = Profile::from_text("Extravertits");
        req.competencies.group = Profile::from_text("Comunicació");
        assert_eq!(
            req.provided_dimensions(),
            vec![Dimension::Competencies, Dimension::Personality]
        );
        assert!(!req.is_empty());
        assert!(AnalysisRequest::default().is_empty());
    }

    #[test]
    fn attachments_group_before_commission() {
        let mut req = AnalysisRequest::default();
        req.values.commission = Profile::default().with_attachment(attachment("comissio-valors.pdf"));
        req.competencies.commission = Profile::default().with_attachment(attachment("comissio.pdf"));
        req.competencies.group = Profile::default().with_attachment(attachment("grup.pdf"));

        let names: Vec<&str> = req.attachments().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["grup.pdf", "comissio.pdf", "comissio-valors.pdf"]);
    }

    #[test]
    fn decoded_len_accounts_for_padding() {
        // "%PDF-" is 5 bytes
        assert_eq!(attachment("a.pdf").decoded_len(), 5);
    }

    #[test]
    fn labels() {
        assert_eq!(Dimension::Values.label(), "Valors");
        assert_eq!(Dimension::Personality.english_label(), "Personality");
        assert_eq!(Dimension::Competencies.to_string(), "Competències");
    }
}

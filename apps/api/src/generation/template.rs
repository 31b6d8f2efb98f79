//! Document template with named slots.
//!
//! The template is compiled once into literal and slot segments. Rendering
//! concatenates segments, so substituted fragments are never re-scanned for
//! `{{...}}` tokens.

use std::path::Path;

use thiserror::Error;

const BUILTIN_TEMPLATE: &str = include_str!("../../templates/base_document.html");

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read template {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("template is missing placeholder {{{{{0}}}}}")]
    MissingPlaceholder(&'static str),

    #[error("template placeholder {{{{{0}}}}} appears more than once")]
    DuplicatePlaceholder(&'static str),
}

/// Every slot the document template must contain exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    ProjectName,
    ProjectType,
    Location,
    MeetingDate,
    HeaderContent,
    ZoningContent,
    CommercialStandardsContent,
    GeneralStandardsContent,
}

impl Placeholder {
    pub const ALL: [Placeholder; 8] = [
        Placeholder::ProjectName,
        Placeholder::ProjectType,
        Placeholder::Location,
        Placeholder::MeetingDate,
        Placeholder::HeaderContent,
        Placeholder::ZoningContent,
        Placeholder::CommercialStandardsContent,
        Placeholder::GeneralStandardsContent,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Placeholder::ProjectName => "project_name",
            Placeholder::ProjectType => "project_type",
            Placeholder::Location => "location",
            Placeholder::MeetingDate => "meeting_date",
            Placeholder::HeaderContent => "header_content",
            Placeholder::ZoningContent => "zoning_content",
            Placeholder::CommercialStandardsContent => "commercial_standards_content",
            Placeholder::GeneralStandardsContent => "general_standards_content",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// Values for every slot. Static fields come from the request, the rest from providers.
#[derive(Debug, Clone, Default)]
pub struct TemplateValues {
    pub project_name: String,
    pub project_type: String,
    pub location: String,
    pub meeting_date: String,
    pub header_content: String,
    pub zoning_content: String,
    pub commercial_standards_content: String,
    pub general_standards_content: String,
}

impl TemplateValues {
    fn get(&self, placeholder: Placeholder) -> &str {
        match placeholder {
            Placeholder::ProjectName => &self.project_name,
            Placeholder::ProjectType => &self.project_type,
            Placeholder::Location => &self.location,
            Placeholder::MeetingDate => &self.meeting_date,
            Placeholder::HeaderContent => &self.header_content,
            Placeholder::ZoningContent => &self.zoning_content,
            Placeholder::CommercialStandardsContent => &self.commercial_standards_content,
            Placeholder::GeneralStandardsContent => &self.general_standards_content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(Placeholder),
}

#[derive(Debug, Clone)]
pub struct DocumentTemplate {
    segments: Vec<Segment>,
}

impl DocumentTemplate {
    /// The template compiled into the binary.
    pub fn builtin() -> Result<Self, TemplateError> {
        Self::parse(BUILTIN_TEMPLATE)
    }

    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let text = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Compiles template text, failing fast unless every placeholder appears exactly once.
    /// Unrecognised `{{...}}` tokens stay literal.
    pub fn parse(text: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = text;

        while let Some(open) = rest.find("{{") {
            let after_open = &rest[open + 2..];
            let slot = after_open
                .find("}}")
                .and_then(|close| Placeholder::from_name(&after_open[..close]).map(|p| (p, close)));

            match slot {
                Some((placeholder, close)) => {
                    literal.push_str(&rest[..open]);
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    if segments.contains(&Segment::Slot(placeholder)) {
                        return Err(TemplateError::DuplicatePlaceholder(placeholder.name()));
                    }
                    segments.push(Segment::Slot(placeholder));
                    rest = &after_open[close + 2..];
                }
                None => {
                    literal.push_str(&rest[..open + 2]);
                    rest = after_open;
                }
            }
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        for placeholder in Placeholder::ALL {
            if !segments.contains(&Segment::Slot(placeholder)) {
                return Err(TemplateError::MissingPlaceholder(placeholder.name()));
            }
        }

        Ok(Self { segments })
    }

    pub fn render(&self, values: &TemplateValues) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(placeholder) => out.push_str(values.get(*placeholder)),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_slots() -> String {
        Placeholder::ALL
            .iter()
            .map(|p| format!("<div>{{{{{}}}}}</div>", p.name()))
            .collect()
    }

    fn sample_values() -> TemplateValues {
        TemplateValues {
            project_name: "New Office Building".to_string(),
            project_type: "Commercial".to_string(),
            location: "Not specified".to_string(),
            meeting_date: "April 27, 2025".to_string(),
            header_content: "<p>Intro</p>".to_string(),
            zoning_content: "<p>Zoning</p>".to_string(),
            commercial_standards_content: "<p>Commercial</p>".to_string(),
            general_standards_content: "<p>General</p>".to_string(),
        }
    }

    #[test]
    fn test_builtin_template_contains_every_placeholder() {
        let template = DocumentTemplate::builtin().unwrap();
        let rendered = template.render(&sample_values());
        assert!(!rendered.contains("{{"), "no placeholder may survive rendering");
        assert!(rendered.trim_start().starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_render_substitutes_every_slot() {
        let template = DocumentTemplate::parse(&all_slots()).unwrap();
        let rendered = template.render(&sample_values());
        assert!(rendered.contains("<div>New Office Building</div>"));
        assert!(rendered.contains("<div>April 27, 2025</div>"));
        assert!(rendered.contains("<div><p>General</p></div>"));
    }

    #[test]
    fn test_missing_placeholder_is_rejected() {
        let text = all_slots().replace("{{zoning_content}}", "");
        let err = DocumentTemplate::parse(&text).unwrap_err();
        assert!(matches!(err, TemplateError::MissingPlaceholder("zoning_content")));
    }

    #[test]
    fn test_duplicate_placeholder_is_rejected() {
        let text = format!("{}{{{{location}}}}", all_slots());
        let err = DocumentTemplate::parse(&text).unwrap_err();
        assert!(matches!(err, TemplateError::DuplicatePlaceholder("location")));
    }

    #[test]
    fn test_fragment_placeholders_are_not_reinterpreted() {
        let template = DocumentTemplate::parse(&all_slots()).unwrap();
        let mut values = sample_values();
        values.header_content = "<p>{{project_name}}</p>".to_string();
        let rendered = template.render(&values);
        assert!(rendered.contains("<div><p>{{project_name}}</p></div>"));
    }

    #[test]
    fn test_unknown_tokens_stay_literal() {
        let text = format!("{{{{not_a_slot}}}} {{{{ {}", all_slots());
        let template = DocumentTemplate::parse(&text).unwrap();
        let rendered = template.render(&sample_values());
        assert!(rendered.starts_with("{{not_a_slot}} {{ <div>"));
    }

    #[test]
    fn test_load_reads_template_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.html");
        std::fs::write(&path, all_slots()).unwrap();
        assert!(DocumentTemplate::load(&path).is_ok());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DocumentTemplate::load(&dir.path().join("absent.html")).unwrap_err();
        assert!(matches!(err, TemplateError::Io { .. }));
    }
}

//! Content providers — one generation call per document section.
//!
//! Each provider builds a single (system, user) prompt pair from the request and
//! returns the capability's raw output. Providers hold no state between calls.

use tracing::debug;

use crate::generation::prompts::{
    COMMERCIAL_STANDARDS_PROMPT_TEMPLATE, COMMERCIAL_STANDARDS_SYSTEM,
    GENERAL_STANDARDS_PROMPT_TEMPLATE, GENERAL_STANDARDS_SYSTEM, HEADER_PROMPT_TEMPLATE,
    HEADER_SYSTEM, HTML_ONLY_INSTRUCTION, ZONING_PROMPT_TEMPLATE, ZONING_SYSTEM,
};
use crate::generation::DocumentError;
use crate::llm_client::ContentGenerator;
use crate::models::document::DocumentRequest;

/// Standards categories a provider knows how to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardsCategory {
    Commercial,
    General,
}

impl StandardsCategory {
    /// Case-insensitive. Unknown categories are `None`, not an error.
    pub fn parse(category: &str) -> Option<Self> {
        if category.eq_ignore_ascii_case("commercial") {
            Some(Self::Commercial)
        } else if category.eq_ignore_ascii_case("general") {
            Some(Self::General)
        } else {
            None
        }
    }

    fn section(self) -> &'static str {
        match self {
            Self::Commercial => "commercial_standards",
            Self::General => "general_standards",
        }
    }
}

pub async fn generate_header(
    request: &DocumentRequest,
    llm: &dyn ContentGenerator,
) -> Result<String, DocumentError> {
    let location = request
        .location
        .as_deref()
        .unwrap_or("the specified location");
    let prompt = HEADER_PROMPT_TEMPLATE
        .replace("{project_type}", &request.project_type)
        .replace("{project_name}", &request.project_name)
        .replace("{location}", location)
        .replace("{meeting_date}", &request.formatted_meeting_date())
        .replace("{html_only}", HTML_ONLY_INSTRUCTION);

    let intro = call(llm, "header", HEADER_SYSTEM, &prompt).await?;
    Ok(wrap_in_paragraph(intro))
}

pub async fn generate_zoning(
    request: &DocumentRequest,
    llm: &dyn ContentGenerator,
) -> Result<String, DocumentError> {
    let location = request.location.as_deref().unwrap_or("the project site");
    let prompt = ZONING_PROMPT_TEMPLATE
        .replace("{project_type}", &request.project_type)
        .replace("{location}", location)
        .replace("{html_only}", HTML_ONLY_INSTRUCTION);

    call(llm, "zoning", ZONING_SYSTEM, &prompt).await
}

/// Unknown categories return an empty fragment without calling the capability.
pub async fn generate_standards(
    request: &DocumentRequest,
    category: &str,
    llm: &dyn ContentGenerator,
) -> Result<String, DocumentError> {
    let Some(category) = StandardsCategory::parse(category) else {
        debug!("Unknown standards category {category:?}; returning empty fragment");
        return Ok(String::new());
    };

    let (system, template) = match category {
        StandardsCategory::Commercial => (
            COMMERCIAL_STANDARDS_SYSTEM,
            COMMERCIAL_STANDARDS_PROMPT_TEMPLATE,
        ),
        StandardsCategory::General => {
            (GENERAL_STANDARDS_SYSTEM, GENERAL_STANDARDS_PROMPT_TEMPLATE)
        }
    };
    let prompt = template
        .replace("{project_type}", &request.project_type)
        .replace("{html_only}", HTML_ONLY_INSTRUCTION);

    call(llm, category.section(), system, &prompt).await
}

async fn call(
    llm: &dyn ContentGenerator,
    section: &'static str,
    system: &str,
    prompt: &str,
) -> Result<String, DocumentError> {
    debug!("Requesting {section} content");
    llm.generate(system, prompt)
        .await
        .map_err(|source| DocumentError::GenerationFailure { section, source })
}

fn wrap_in_paragraph(content: String) -> String {
    if content.trim_start().starts_with("<p") {
        content
    } else {
        format!("<p>{content}</p>")
    }
}

//! Document Orchestrator — runs the providers concurrently and assembles the result.
//!
//! Flow: launch header / zoning / general (+ commercial when applicable) →
//!       await all → fill template slots → sanitize → return.
//!
//! Failure policy is fail-fast: `try_join!` resolves on the first provider error and
//! drops the sibling futures still in flight. No partial document is ever returned.

use tracing::{debug, info};

use crate::generation::providers::{generate_header, generate_standards, generate_zoning};
use crate::generation::sanitizer::validate_document;
use crate::generation::template::{DocumentTemplate, TemplateValues};
use crate::generation::DocumentError;
use crate::llm_client::ContentGenerator;
use crate::models::document::DocumentRequest;

/// Used in place of commercial standards for non-commercial projects.
pub const NO_COMMERCIAL_STANDARDS: &str = "<p>No commercial-specific standards applicable.</p>";

const LOCATION_NOT_SPECIFIED: &str = "Not specified";

pub async fn generate_document(
    request: &DocumentRequest,
    llm: &dyn ContentGenerator,
    template: &DocumentTemplate,
) -> Result<String, DocumentError> {
    let commercial = request.is_commercial();
    if !commercial {
        debug!(
            "Skipping commercial standards for project type {:?}",
            request.project_type
        );
    }

    let (header_content, zoning_content, general_content, commercial_content) = tokio::try_join!(
        generate_header(request, llm),
        generate_zoning(request, llm),
        generate_standards(request, "general", llm),
        async {
            if commercial {
                generate_standards(request, "commercial", llm).await.map(Some)
            } else {
                Ok(None)
            }
        }
    )?;

    let values = TemplateValues {
        project_name: request.project_name.clone(),
        project_type: request.project_type.clone(),
        location: request
            .location
            .clone()
            .unwrap_or_else(|| LOCATION_NOT_SPECIFIED.to_string()),
        meeting_date: request.formatted_meeting_date(),
        header_content,
        zoning_content,
        commercial_standards_content: commercial_content
            .unwrap_or_else(|| NO_COMMERCIAL_STANDARDS.to_string()),
        general_standards_content: general_content,
    };

    let assembled = template.render(&values);
    let document = validate_document(&assembled)?;

    info!(
        "Assembled document for {:?} ({} bytes)",
        request.project_name,
        document.len()
    );
    Ok(document)
}

// All LLM prompt constants for the document generation module.
// Templates use `{name}` markers filled with `str::replace` before sending.

/// Shared formatting rule appended to every section prompt.
pub const HTML_ONLY_INSTRUCTION: &str = "\
    Respond with the HTML fragment only. \
    Do NOT wrap it in markdown code fences. \
    Do NOT include <html>, <head>, <body>, <script> or inline style attributes.";

pub const HEADER_SYSTEM: &str = "You are a highly skilled report writer assistant. \
    You will generate an introduction section for a document.";

/// Replace: {project_type}, {project_name}, {location}, {meeting_date}, {html_only}
pub const HEADER_PROMPT_TEMPLATE: &str = "Write an introductory section for a pre-application \
review document for a {project_type} project. The project name is '{project_name}'. \
The project is located at {location}. The meeting took place on {meeting_date}. \
Provide a brief introduction summarizing these details. \
Write the introduction as a short paragraph wrapped in a <p> tag. {html_only}";

pub const ZONING_SYSTEM: &str = "You are an expert urban planner providing zoning analysis.";

/// Replace: {project_type}, {location}, {html_only}
pub const ZONING_PROMPT_TEMPLATE: &str = "Provide content for a 'Zoning' section in a \
development review document for a {project_type} project. The project location is {location}. \
Include two subsections: one describing the zoning classification and requirements for this \
project, and another describing any special zoning considerations or exceptions. \
Format each subsection as an HTML <div class=\"subsection\">, with a \
<h4 class=\"subsection-title\"> followed by a paragraph of explanation. {html_only}";

pub const COMMERCIAL_STANDARDS_SYSTEM: &str =
    "You are a building code expert focusing on commercial development standards.";

/// Replace: {project_type}, {html_only}
pub const COMMERCIAL_STANDARDS_PROMPT_TEMPLATE: &str = "Provide a brief summary of key \
commercial development standards relevant to a {project_type} project. Focus on regulations \
that specifically apply to commercial projects (e.g., building codes, occupancy requirements). \
Respond with a concise explanation in HTML (e.g., a short paragraph). {html_only}";

pub const GENERAL_STANDARDS_SYSTEM: &str =
    "You are a building code expert focusing on general development standards.";

/// Replace: {project_type}, {html_only}
pub const GENERAL_STANDARDS_PROMPT_TEMPLATE: &str = "Provide content for a 'General Standards' \
section for a {project_type} project. Include two different subsections covering general \
development standards (for example, building height restrictions and parking requirements). \
Each subsection should be formatted as an HTML <div class=\"subsection\"> with a \
<h4 class=\"subsection-title\"> and a brief explanation. {html_only}";

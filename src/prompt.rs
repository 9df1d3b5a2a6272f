/// The fixed instruction every generation starts from.
pub const DEFAULT_TEMPLATE: &str = "Create a vivid, highly detailed digital artwork. \
Use a rich and harmonious color palette, dramatic cinematic lighting and a single clear focal point. \
Compose the scene with depth, balanced negative space and crisp professional finishing, \
suitable for printing as a poster.";

pub const REQUIREMENTS_LABEL: &str = "Additional requirements: ";

/// Builds the prompt sent to the image service.
///
/// A requirement that is empty or only whitespace leaves the template
/// untouched. Anything else is appended verbatim in a labeled section.
pub fn assemble_prompt(template: &str, requirement: &str) -> String {
    if requirement.trim().is_empty() {
        return template.to_string();
    }

    format!("{}\n\n{}{}", template, REQUIREMENTS_LABEL, requirement)
}

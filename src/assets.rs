//! Embedded template content for document scaffolding and site builds.

use include_dir::{Dir, include_dir};

use crate::error::AppError;

static TEMPLATE_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/templates");

/// Standard module documentation template.
pub const STANDARD_DOC_TEMPLATE: &str = "module_doc.md";
/// Module documentation template carrying AI fill markers.
pub const AI_DOC_TEMPLATE: &str = "module_doc_ai.md";
/// Self-contained HTML viewer template.
pub const VIEWER_TEMPLATE: &str = "viewer.html";

/// Fetch an embedded template by name.
pub fn template(name: &str) -> Result<&'static str, AppError> {
    TEMPLATE_DIR
        .get_file(name)
        .and_then(|file| file.contents_utf8())
        .ok_or_else(|| AppError::TemplateNotFound(name.to_string()))
}

/// Select the document template for a scaffold run.
///
/// The AI fill variant falls back to the standard template when absent
/// from the bundle. Returns the template name with its content.
pub fn doc_template(ai_fill: bool) -> Result<(&'static str, &'static str), AppError> {
    if ai_fill {
        match template(AI_DOC_TEMPLATE) {
            Ok(content) => return Ok((AI_DOC_TEMPLATE, content)),
            Err(_) => {
                println!("[WARN] AI fill template not found, falling back to standard template");
            }
        }
    }
    template(STANDARD_DOC_TEMPLATE).map(|content| (STANDARD_DOC_TEMPLATE, content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_templates_are_present() {
        assert!(template(STANDARD_DOC_TEMPLATE).is_ok());
        assert!(template(AI_DOC_TEMPLATE).is_ok());
        assert!(template(VIEWER_TEMPLATE).is_ok());
    }

    #[test]
    fn unknown_template_is_reported() {
        let result = template("no_such.md");
        assert!(matches!(result, Err(AppError::TemplateNotFound(_))));
    }

    #[test]
    fn ai_template_carries_fill_markers() {
        let content = template(AI_DOC_TEMPLATE).unwrap();
        assert!(content.contains("<!-- AI_FILL_START:overview"));
        assert!(content.contains("<!-- AI_FILL_END:overview -->"));
    }

    #[test]
    fn viewer_template_carries_injection_tokens() {
        let content = template(VIEWER_TEMPLATE).unwrap();
        for token in ["/*__DOCS_DATA__*/", "/*__TREE_DATA__*/", "__BUILD_TIME__", "__DOC_COUNT__", "__PROJECT_NAME__"] {
            assert!(content.contains(token), "missing token {}", token);
        }
    }

    #[test]
    fn doc_template_selects_by_mode() {
        let (name, _) = doc_template(false).unwrap();
        assert_eq!(name, STANDARD_DOC_TEMPLATE);

        let (name, content) = doc_template(true).unwrap();
        assert_eq!(name, AI_DOC_TEMPLATE);
        assert!(content.contains("AI_FILL_START"));
    }
}

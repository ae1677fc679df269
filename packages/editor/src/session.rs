//! # Edit Session
//!
//! One open template: its name, the structured document or the freeform
//! markup that replaced it, and the renderers used to show and export it.
//!
//! Switching to freeform compiles the document once and from then on the
//! markup is edited directly. Switching back is lossy: the markup is
//! discarded and an empty document takes its place.

use crate::store::{SavedTemplate, TemplateStore};
use crate::{Document, EditorError, Mutation, MutationResult};
use maildraft_blocks::{blocks_from_json, Block};
use maildraft_compiler_html::{CompileOptions, HtmlCompiler};
use maildraft_preview::{Renderer, VirtualDomDocument};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    Structured,
    Freeform,
}

impl fmt::Display for EditorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorMode::Structured => f.write_str("structured"),
            EditorMode::Freeform => f.write_str("freeform"),
        }
    }
}

/// A downloadable HTML file
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFile {
    pub file_name: String,
    pub html: String,
}

#[derive(Debug)]
pub struct EditSession {
    name: String,

    mode: EditorMode,

    document: Document,

    /// Markup edited directly in freeform mode
    freeform_html: String,

    compiler: HtmlCompiler,

    renderer: Renderer,
}

impl EditSession {
    /// Structured session over an existing document
    pub fn new(name: impl Into<String>, document: Document) -> Self {
        Self {
            name: name.into(),
            mode: EditorMode::Structured,
            document,
            freeform_html: String::new(),
            compiler: HtmlCompiler::default(),
            renderer: Renderer::default(),
        }
    }

    /// Open a stored template
    ///
    /// Without blocks (absent or empty) the session starts in freeform
    /// mode holding `stored_html`.
    pub fn open(
        name: impl Into<String>,
        initial_blocks: Option<Vec<Block>>,
        stored_html: Option<String>,
    ) -> Result<Self, EditorError> {
        let name = name.into();

        match initial_blocks.filter(|blocks| !blocks.is_empty()) {
            Some(blocks) => {
                let document = Document::from_blocks(&name, blocks)?;
                Ok(Self::new(name, document))
            }
            None => {
                let document = Document::new(&name);
                let mut session = Self::new(name, document);
                session.mode = EditorMode::Freeform;
                session.freeform_html = stored_html.unwrap_or_default();
                Ok(session)
            }
        }
    }

    /// Open a template from a persisted JSON block array
    pub fn open_json(
        name: impl Into<String>,
        blocks_json: Option<&str>,
        stored_html: Option<String>,
    ) -> Result<Self, EditorError> {
        let blocks = blocks_json.map(blocks_from_json).transpose()?;
        Self::open(name, blocks, stored_html)
    }

    /// Open a template from a store by name
    pub fn load(store: &dyn TemplateStore, name: &str) -> Result<Self, EditorError> {
        let template = store.load(name)?;
        Self::open(template.name, template.blocks, Some(template.html))
    }

    pub fn with_compiler(mut self, compiler: HtmlCompiler) -> Self {
        self.compiler = compiler;
        self
    }

    /// Replace the compiler with one built from `options`
    pub fn with_compile_options(self, options: CompileOptions) -> Result<Self, EditorError> {
        let compiler = HtmlCompiler::new(options)?;
        Ok(self.with_compiler(compiler))
    }

    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable document access, structured mode only
    pub fn document_mut(&mut self) -> Result<&mut Document, EditorError> {
        self.expect_mode(EditorMode::Structured)?;
        Ok(&mut self.document)
    }

    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        Ok(self.document_mut()?.apply(mutation)?)
    }

    /// Markup being edited, freeform mode only
    pub fn freeform_html(&self) -> Option<&str> {
        match self.mode {
            EditorMode::Freeform => Some(&self.freeform_html),
            EditorMode::Structured => None,
        }
    }

    pub fn set_freeform_html(&mut self, html: impl Into<String>) -> Result<(), EditorError> {
        self.expect_mode(EditorMode::Freeform)?;
        self.freeform_html = html.into();
        Ok(())
    }

    /// Compile the document once and continue in freeform mode
    pub fn switch_to_freeform(&mut self) {
        if self.mode == EditorMode::Freeform {
            return;
        }

        self.freeform_html = self.compiler.compile(self.document.blocks());
        self.mode = EditorMode::Freeform;
        info!(
            template = %self.name,
            blocks = self.document.len(),
            "Switched to freeform mode"
        );
    }

    /// Return to structured editing with an empty document
    ///
    /// The freeform markup is not parsed back into blocks. `confirm` is
    /// asked first and a `false` answer leaves the session untouched.
    /// Returns whether the session is now structured.
    pub fn switch_to_structured(&mut self, confirm: impl FnOnce() -> bool) -> bool {
        if self.mode == EditorMode::Structured {
            return true;
        }

        if !confirm() {
            warn!(template = %self.name, "Switch to structured mode declined");
            return false;
        }

        self.document.clear();
        self.freeform_html.clear();
        self.mode = EditorMode::Structured;
        info!(template = %self.name, "Switched to structured mode with an empty document");
        true
    }

    /// Full HTML of the template in its current mode
    pub fn render_html(&self) -> String {
        match self.mode {
            EditorMode::Structured => self.compiler.compile(self.document.blocks()),
            EditorMode::Freeform => self.freeform_html.clone(),
        }
    }

    /// Editing canvas, structured mode only
    pub fn preview(&self) -> Result<VirtualDomDocument, EditorError> {
        self.expect_mode(EditorMode::Structured)?;
        Ok(self
            .renderer
            .render_document(self.document.blocks(), self.document.selected()))
    }

    pub fn export(&self) -> ExportedFile {
        ExportedFile {
            file_name: format!("{}.html", self.name),
            html: self.render_html(),
        }
    }

    /// Persist blocks and markup under `name`
    ///
    /// Both halves come from one snapshot, so they always describe the
    /// same version of the document.
    pub fn save(&self, store: &mut dyn TemplateStore, name: &str) -> Result<SavedTemplate, EditorError> {
        let template = match self.mode {
            EditorMode::Structured => {
                let snapshot = self.document.snapshot();
                SavedTemplate {
                    name: name.to_string(),
                    html: self.compiler.compile(&snapshot),
                    blocks: Some(snapshot.to_vec()),
                }
            }
            EditorMode::Freeform => SavedTemplate {
                name: name.to_string(),
                blocks: None,
                html: self.freeform_html.clone(),
            },
        };

        store.save(&template)?;
        info!(
            template = name,
            mode = %self.mode,
            bytes = template.html.len(),
            "Saved template"
        );
        Ok(template)
    }

    fn expect_mode(&self, expected: EditorMode) -> Result<(), EditorError> {
        if self.mode != expected {
            return Err(EditorError::WrongMode {
                expected,
                actual: self.mode,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maildraft_blocks::BlockType;

    #[test]
    fn test_open_without_blocks_is_freeform() {
        let session = EditSession::open("promo", Some(vec![]), Some("<p>hi</p>".to_string())).unwrap();

        assert_eq!(session.mode(), EditorMode::Freeform);
        assert_eq!(session.freeform_html(), Some("<p>hi</p>"));
    }

    #[test]
    fn test_freeform_rejects_mutations() {
        let mut session = EditSession::open("promo", None, None).unwrap();

        let result = session.apply(Mutation::AddBlock {
            block_type: BlockType::Text,
        });
        assert!(matches!(
            result,
            Err(EditorError::WrongMode {
                expected: EditorMode::Structured,
                actual: EditorMode::Freeform
            })
        ));
    }

    #[test]
    fn test_declined_switch_keeps_markup() {
        let mut session = EditSession::open("promo", None, Some("<p>keep</p>".to_string())).unwrap();

        assert!(!session.switch_to_structured(|| false));
        assert_eq!(session.mode(), EditorMode::Freeform);
        assert_eq!(session.freeform_html(), Some("<p>keep</p>"));
    }

    #[test]
    fn test_open_json_decodes_blocks() {
        let json = r#"[{"id":"h1","type":"header","content":{"title":"Hello"},"settings":{}}]"#;
        let session = EditSession::open_json("weekly", Some(json), None).unwrap();

        assert_eq!(session.mode(), EditorMode::Structured);
        assert_eq!(session.document().get("h1").map(|b| b.block_type()), Some(BlockType::Header));

        let err = EditSession::open_json("weekly", Some(r#"[{"id":"x","type":"carousel"}]"#), None).unwrap_err();
        assert!(matches!(err, EditorError::Block(_)));
        assert!(err.to_string().contains("carousel"));
    }

    #[test]
    fn test_invalid_compile_options_are_rejected() {
        let session = EditSession::new("weekly", Document::new("weekly"));
        let options = CompileOptions {
            content_width: 0,
            ..Default::default()
        };

        assert!(matches!(
            session.with_compile_options(options),
            Err(EditorError::Compile(_))
        ));
    }

    #[test]
    fn test_export_file_name() {
        let session = EditSession::new("weekly", Document::new("weekly"));
        let file = session.export();

        assert_eq!(file.file_name, "weekly.html");
        assert!(file.html.starts_with("<!DOCTYPE html>"));
    }
}

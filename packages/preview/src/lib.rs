//! # Maildraft Preview
//!
//! On-screen representation of an email template for the editing canvas.
//! Blocks render to a [`VirtualDomDocument`] that a host page can mount
//! directly or serialize with [`VirtualDomDocument::to_html`].

pub mod render;
pub mod vdom;


pub use render::{render_document, PreviewOptions, Renderer};
pub use vdom::{CssRule, VNode, VirtualDomDocument};

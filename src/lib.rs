mod canvas;
mod card_render;
mod config;
mod error;
mod font;
mod hash;
mod model;
pub mod organizer;
mod page_layout;
mod pdf;
mod text_flow;
mod types;
mod warnings;

pub use canvas::{Bookmark, Canvas, Command, Document, Page};
pub use card_render::{render_background, render_card, render_placeholder};
pub use config::{
    ColorRole, LayoutConfiguration, LayoutConfigurationBuilder, LayoutSettings, Preset,
    PresetStyle, StructuralColors, TextFonts, TextRole,
};
pub use error::CardPressError;
pub use font::{BuiltinFont, FontSpec};
pub use hash::{FINGERPRINT_ALPHABET, FINGERPRINT_LEN, fingerprint, fingerprint_parts};
pub use model::{Card, CardCollection, Section};
pub use page_layout::{CardStamp, LayoutOutcome, PageLayout, SlotGrid};
pub use pdf::{DocumentInfo, PdfOptions, encode_winansi, write_document};
pub use text_flow::TextFlow;
pub use types::{Color, PageFormat, Pt, Rect, Size};
pub use warnings::{LayoutWarning, LayoutWarnings, SlotRef, WarningKind};

use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Result of one export run.
#[derive(Debug, Clone)]
pub struct ExportReport {
    /// The finished file. Empty when the bytes went straight to a writer.
    pub pdf: Vec<u8>,
    pub warnings: Vec<LayoutWarning>,
    pub pages: usize,
    pub stamps: Vec<CardStamp>,
}

impl ExportReport {
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Exports card collections to PDF using one frozen configuration.
#[derive(Debug, Clone)]
pub struct CardPress {
    config: LayoutConfiguration,
    info: DocumentInfo,
    pdf_options: PdfOptions,
}

impl CardPress {
    pub fn new(config: LayoutConfiguration) -> Self {
        Self {
            config,
            info: DocumentInfo::default(),
            pdf_options: PdfOptions::default(),
        }
    }

    pub fn document_info(mut self, info: DocumentInfo) -> Self {
        self.info = info;
        self
    }

    pub fn document_title(mut self, title: impl Into<String>) -> Self {
        self.info.title = Some(title.into());
        self
    }

    pub fn pdf_options(mut self, options: PdfOptions) -> Self {
        self.pdf_options = options;
        self
    }

    pub fn config(&self) -> &LayoutConfiguration {
        &self.config
    }

    /// Lays the collection out without serializing it.
    pub fn lay_out(&self, collection: &CardCollection) -> LayoutOutcome {
        PageLayout::new(&self.config).lay_out(collection)
    }

    /// Lays out and serializes the collection. Layout problems come back as
    /// warnings in the report; only serialization failures are errors.
    pub fn export(&self, collection: &CardCollection) -> Result<ExportReport, CardPressError> {
        let outcome = self.lay_out(collection);
        let pages = outcome.document.pages.len();
        let pdf = write_document(&outcome.document, &self.info, &self.pdf_options)?;
        log::info!(
            "exported {} cards in {} sections to {pages} pages ({} bytes, {} warnings)",
            collection.card_count(),
            collection.sections.len(),
            pdf.len(),
            outcome.warnings.len()
        );
        Ok(ExportReport {
            pdf,
            warnings: outcome.warnings.into_vec(),
            pages,
            stamps: outcome.stamps,
        })
    }

    /// Like [`CardPress::export`], but writes the finished file to `writer`.
    /// Nothing is written unless the whole document was built.
    pub fn export_to<W: Write>(
        &self,
        collection: &CardCollection,
        writer: &mut W,
    ) -> Result<ExportReport, CardPressError> {
        let mut report = self.export(collection)?;
        writer.write_all(&report.pdf)?;
        writer.flush()?;
        report.pdf = Vec::new();
        Ok(report)
    }

    /// Writes the finished file next to `path` and renames it into place, so
    /// `path` is either left untouched or holds the complete document.
    pub fn export_to_file(
        &self,
        collection: &CardCollection,
        path: impl AsRef<Path>,
    ) -> Result<ExportReport, CardPressError> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut report = self.export(collection)?;
        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(&report.pdf)?;
        staged.as_file().sync_all()?;
        staged.persist(path).map_err(|err| CardPressError::Io(err.error))?;
        log::debug!("wrote {} bytes to {}", report.pdf.len(), path.display());
        report.pdf = Vec::new();
        Ok(report)
    }
}

impl Default for CardPress {
    fn default() -> Self {
        Self::new(LayoutConfiguration::default())
    }
}

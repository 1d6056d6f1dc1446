use std::fs;
use std::path::Path;

use tracing::{debug, error};

use crate::blank_lines::insert_padding;
use crate::code_item::{DeclarationItem, Kind};
use crate::code_tree::build_tree;
use crate::comment_helper::CodeLanguage;
use crate::config::ReorganizeConfig;
use crate::error::{CleanUpError, CleanUpResult};
use crate::ordering::ItemComparer;
use crate::region_cleaner::remove_regions;
use crate::reorganizer::CodeItemReorganizer;
use crate::retriever::{CodeItemRetriever, DeclarationSource};
use crate::text_buffer::{TextBuffer, TextSurface};

const UNDO_UNIT_NAME: &str = "Reorganize declarations";

/// One open document: its name, language and editable text.
#[derive(Debug, Clone)]
pub struct Document {
    name: String,
    language: CodeLanguage,
    buffer: TextBuffer,
}

impl Document {
    /// Creates a document, detecting the language from the name's extension.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> CleanUpResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CleanUpError::InvalidArgument("document name is empty".to_string()));
        }
        let language = CodeLanguage::from_path(Path::new(&name));
        Ok(Self {
            name,
            language,
            buffer: TextBuffer::new(text),
        })
    }

    /// Opens the file at `path` as a document.
    pub fn open(path: &Path) -> CleanUpResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::new(path.to_string_lossy(), text)
    }

    pub fn with_cursor(mut self, offset: usize) -> CleanUpResult<Self> {
        if offset > self.buffer.len() || !self.buffer.as_str().is_char_boundary(offset) {
            return Err(CleanUpError::InvalidArgument(format!(
                "cursor {offset} is outside '{}' ({} bytes)",
                self.name,
                self.buffer.len()
            )));
        }
        self.buffer.set_cursor(offset);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn language(&self) -> CodeLanguage {
        self.language
    }

    pub fn text(&self) -> &str {
        self.buffer.as_str()
    }

    pub fn cursor(&self) -> usize {
        self.buffer.cursor()
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }

    pub fn into_text(self) -> String {
        self.buffer.into_string()
    }
}

/// What a clean-up pass did.
#[derive(Debug, Default)]
pub struct CleanUpReport {
    pub moves: usize,
    pub blank_lines_inserted: usize,
    pub region_lines_removed: usize,
    /// Failures that were logged and skipped.
    pub errors: Vec<CleanUpError>,
}

impl CleanUpReport {
    pub fn changed(&self) -> bool {
        self.moves > 0 || self.blank_lines_inserted > 0 || self.region_lines_removed > 0
    }
}

/// Runs the reorganize clean-up on documents.
pub struct CleanUpManager<'a> {
    source: &'a dyn DeclarationSource,
    config: ReorganizeConfig,
}

impl<'a> CleanUpManager<'a> {
    pub fn new(source: &'a dyn DeclarationSource, config: ReorganizeConfig) -> Self {
        Self { source, config }
    }

    /// Reorganizes `document` as a single undo unit.
    ///
    /// A document that cannot be parsed is left untouched and reported through
    /// [`CleanUpReport::errors`]. An `Err` means the pass stopped early; edits
    /// made up to that point stay applied and can be undone as one unit.
    pub fn execute(&self, document: &mut Document) -> CleanUpResult<CleanUpReport> {
        let name = document.name.clone();
        let language = document.language;

        let result = document
            .buffer
            .run_undo_unit(UNDO_UNIT_NAME, |buffer| self.run_pass(&name, language, buffer));

        match &result {
            Ok(report) => debug!(
                document = %name,
                moves = report.moves,
                blank_lines = report.blank_lines_inserted,
                "clean-up pass finished"
            ),
            Err(err) => error!(document = %name, error = %err, "clean-up pass failed"),
        }
        result
    }

    fn run_pass(&self, name: &str, language: CodeLanguage, buffer: &mut TextBuffer) -> CleanUpResult<CleanUpReport> {
        let text = buffer.as_str().to_string();
        let (mut items, errors) = CodeItemRetriever::new(self.source)
            .with_lazy_values(self.config.load_lazy_values)
            .retrieve(name, &text, language);

        items.retain(|item| item.kind != Kind::UsingStatement);
        validate_ranges(&text, &items)?;

        let region_lines_removed = remove_regions(buffer, &mut items);
        let mut tree = build_tree(items);

        let comparer = ItemComparer::new(self.config.secondary_order_by_name);
        let mut reorganizer = CodeItemReorganizer::new(language, &self.config.blank_lines).with_comparer(comparer);
        reorganizer.reorganize(buffer, &mut tree);

        let blank_lines_inserted = insert_padding(buffer, language, &self.config.blank_lines, &tree);

        Ok(CleanUpReport {
            moves: reorganizer.moves(),
            blank_lines_inserted,
            region_lines_removed,
            errors,
        })
    }
}

fn validate_ranges(text: &str, items: &[DeclarationItem]) -> CleanUpResult<()> {
    for item in items {
        let valid = item.start <= item.end
            && item.end <= text.len()
            && text.is_char_boundary(item.start)
            && text.is_char_boundary(item.end);
        if !valid {
            return Err(CleanUpError::InvalidArgument(format!(
                "{item} does not fit a document of {} bytes",
                text.len()
            )));
        }
    }
    Ok(())
}

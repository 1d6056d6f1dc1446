pub mod blank_lines;
pub mod cleanup;
pub mod code_item;
pub mod code_tree;
pub mod comment_helper;
pub mod config;
pub mod error;
pub mod file_handler;
pub mod ordering;
pub mod parser;
pub mod region_cleaner;
pub mod reorganizer;
pub mod retriever;
pub mod text_buffer;

use cleanup::{CleanUpManager, Document};
use config::ReorganizeConfig;
use error::CleanUpResult;
use parser::TypeScriptSource;

/// Reorders the declarations of a TypeScript/JavaScript source.
///
/// This is the main entry point for programmatic use: it runs one full clean-up
/// pass over an in-memory document and returns the rewritten text. Sources that
/// fail to parse come back unchanged.
pub fn reorganize_source(source: &str, filename: &str, config: &ReorganizeConfig) -> CleanUpResult<String> {
    let declarations = TypeScriptSource::new();
    let manager = CleanUpManager::new(&declarations, config.clone());

    let mut document = Document::new(filename, source)?;
    manager.execute(&mut document)?;
    Ok(document.into_text())
}

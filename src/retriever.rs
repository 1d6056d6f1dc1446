use tracing::warn;

use crate::code_item::DeclarationItem;
use crate::comment_helper::CodeLanguage;
use crate::error::{CleanUpError, CleanUpResult};

/// Produces the declarations of one document snapshot.
pub trait DeclarationSource: Send + Sync {
    /// Returns a flat list of items; nesting is rebuilt later from the ranges.
    fn retrieve(&self, name: &str, text: &str, language: CodeLanguage) -> CleanUpResult<Vec<DeclarationItem>>;

    /// Resolves values the source defers until asked, such as attribute
    /// arguments. Sources without deferred values keep the default.
    fn load_lazy_values(&self, _item: &mut DeclarationItem) -> CleanUpResult<()> {
        Ok(())
    }
}

/// Wraps a source with the failure handling one clean-up pass needs.
pub struct CodeItemRetriever<'a> {
    source: &'a dyn DeclarationSource,
    load_lazy_values: bool,
}

impl<'a> CodeItemRetriever<'a> {
    pub fn new(source: &'a dyn DeclarationSource) -> Self {
        Self {
            source,
            load_lazy_values: false,
        }
    }

    pub fn with_lazy_values(mut self, enabled: bool) -> Self {
        self.load_lazy_values = enabled;
        self
    }

    /// Retrieves the items of a document. Failures never abort the pass: an
    /// unparseable document yields no items and a failed lazy load keeps the
    /// item as retrieved. Every swallowed failure is returned alongside.
    pub fn retrieve(
        &self,
        name: &str,
        text: &str,
        language: CodeLanguage,
    ) -> (Vec<DeclarationItem>, Vec<CleanUpError>) {
        let mut errors = Vec::new();
        let mut items = match self.source.retrieve(name, text, language) {
            Ok(items) => items,
            Err(err) => {
                warn!(document = name, error = %err, "no code model, skipping reorganization");
                errors.push(err);
                Vec::new()
            }
        };

        if self.load_lazy_values {
            for item in &mut items {
                if let Err(err) = self.source.load_lazy_values(item) {
                    warn!(item = %item, error = %err, "failed to load lazy values");
                    errors.push(err);
                }
            }
        }

        (items, errors)
    }
}

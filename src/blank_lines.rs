use std::collections::HashSet;

use crate::code_item::{DeclarationItem, Kind};
use crate::comment_helper::{attached_comment_start, CodeLanguage, CommentMatcher};
use crate::reorganizer::should_reorganize_children;
use crate::text_buffer::TextSurface;

/// Decides which declarations are set apart by blank lines.
pub trait BlankLinePolicy {
    fn wants_leading_blank_line(&self, item: &DeclarationItem) -> bool;

    fn wants_trailing_blank_line(&self, item: &DeclarationItem) -> bool;
}

/// Pads every declaration whose kind is in `padded_kinds`, both above and below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultBlankLinePolicy {
    padded_kinds: HashSet<Kind>,
}

impl Default for DefaultBlankLinePolicy {
    fn default() -> Self {
        Self::new([
            Kind::Constructor,
            Kind::Destructor,
            Kind::Method,
            Kind::TestMethod,
            Kind::Property,
            Kind::Indexer,
            Kind::Class,
            Kind::Struct,
            Kind::Interface,
            Kind::Enum,
            Kind::Namespace,
            Kind::Function,
        ])
    }
}

impl DefaultBlankLinePolicy {
    pub fn new(kinds: impl IntoIterator<Item = Kind>) -> Self {
        Self {
            padded_kinds: kinds.into_iter().collect(),
        }
    }

    /// A policy that never asks for blank lines.
    pub fn none() -> Self {
        Self::new([])
    }

    pub fn is_padded(&self, kind: Kind) -> bool {
        self.padded_kinds.contains(&kind)
    }
}

impl BlankLinePolicy for DefaultBlankLinePolicy {
    fn wants_leading_blank_line(&self, item: &DeclarationItem) -> bool {
        self.is_padded(item.kind)
    }

    fn wants_trailing_blank_line(&self, item: &DeclarationItem) -> bool {
        self.is_padded(item.kind)
    }
}

/// Inserts a blank line between consecutive sibling elements whenever the
/// policy asks for one and none is present. Members of containers whose order
/// is significant are left as they are. Returns the number of lines added.
///
/// Levels are processed back to front, so every insertion lands after all
/// offsets that are still to be read.
pub fn insert_padding(
    surface: &mut dyn TextSurface,
    language: CodeLanguage,
    policy: &dyn BlankLinePolicy,
    items: &[DeclarationItem],
) -> usize {
    let matcher = CommentMatcher::for_language(language);
    pad_level(surface, matcher.as_ref(), policy, items)
}

fn pad_level(
    surface: &mut dyn TextSurface,
    matcher: Option<&CommentMatcher>,
    policy: &dyn BlankLinePolicy,
    items: &[DeclarationItem],
) -> usize {
    let mut siblings: Vec<&DeclarationItem> = Vec::new();
    for item in items {
        if !siblings.iter().any(|seen| seen.start == item.start) {
            siblings.push(item);
        }
    }
    siblings.sort_by_key(|item| item.start);

    let mut inserted = 0;
    for index in (0..siblings.len()).rev() {
        let item = siblings[index];
        if should_reorganize_children(item) {
            inserted += pad_level(surface, matcher, policy, &item.children);
        }
        if !item.is_element() {
            continue;
        }

        let Some(previous) = siblings[..index].iter().rev().find(|it| it.is_element()) else {
            continue;
        };
        if !policy.wants_trailing_blank_line(previous) && !policy.wants_leading_blank_line(item) {
            continue;
        }

        let block_start = attached_comment_start(surface, matcher, item.start);
        if block_start <= previous.end {
            continue;
        }
        let above = surface.line_range(block_start - 1);
        if surface.text(above).trim().is_empty() {
            continue;
        }
        let line_break = surface.line_break();
        surface.insert(block_start, line_break);
        inserted += 1;
    }
    inserted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code_item::Access;
    use crate::text_buffer::TextBuffer;
    use pretty_assertions::assert_eq;

    fn element(source: &str, kind: Kind, text: &str) -> DeclarationItem {
        let start = source.find(text).unwrap();
        DeclarationItem::new(kind, text, start..start + text.len()).with_access(Access::Public)
    }

    #[test]
    fn test_default_policy() {
        let policy = DefaultBlankLinePolicy::default();
        let method = DeclarationItem::new(Kind::Method, "m", 0..0);
        let field = DeclarationItem::new(Kind::Field, "f", 0..0);

        assert!(policy.wants_leading_blank_line(&method));
        assert!(policy.wants_trailing_blank_line(&method));
        assert!(!policy.wants_leading_blank_line(&field));
        assert!(!DefaultBlankLinePolicy::none().is_padded(Kind::Method));
    }

    #[test]
    fn test_padding_between_methods() {
        let source = "class A {\n  x = 1;\n  y = 2;\n  // doc\n  run() {}\n  stop() {}\n}\n";
        let items = vec![element(source, Kind::Class, source.trim_end()).with_children(vec![
            element(source, Kind::Field, "x = 1;"),
            element(source, Kind::Field, "y = 2;"),
            element(source, Kind::Method, "run() {}"),
            element(source, Kind::Method, "stop() {}"),
        ])];

        let mut buffer = TextBuffer::new(source);
        let policy = DefaultBlankLinePolicy::default();
        let inserted = insert_padding(&mut buffer, CodeLanguage::TypeScript, &policy, &items);

        assert_eq!(inserted, 2);
        assert_eq!(
            buffer.as_str(),
            "class A {\n  x = 1;\n  y = 2;\n\n  // doc\n  run() {}\n\n  stop() {}\n}\n"
        );
    }

    #[test]
    fn test_order_significant_container_is_not_padded() {
        let source = "class Native {\n  run() {}\n  stop() {}\n}\n";
        let items = vec![element(source, Kind::Class, source.trim_end())
            .with_attribute("ComImport")
            .with_children(vec![
                element(source, Kind::Method, "run() {}"),
                element(source, Kind::Method, "stop() {}"),
            ])];

        let mut buffer = TextBuffer::new(source);
        let policy = DefaultBlankLinePolicy::default();

        assert_eq!(insert_padding(&mut buffer, CodeLanguage::TypeScript, &policy, &items), 0);
        assert_eq!(buffer.as_str(), source);
    }

    #[test]
    fn test_padding_uses_document_line_break() {
        let source = "class A {\r\n  run() {}\r\n  stop() {}\r\n}\r\n";
        let items = vec![element(source, Kind::Class, source.trim_end()).with_children(vec![
            element(source, Kind::Method, "run() {}"),
            element(source, Kind::Method, "stop() {}"),
        ])];

        let mut buffer = TextBuffer::new(source);
        let policy = DefaultBlankLinePolicy::default();

        assert_eq!(insert_padding(&mut buffer, CodeLanguage::TypeScript, &policy, &items), 1);
        assert_eq!(buffer.as_str(), "class A {\r\n  run() {}\r\n\r\n  stop() {}\r\n}\r\n");
    }

    #[test]
    fn test_existing_blank_line_is_kept() {
        let source = "x = 1;\n\nrun() {}\n";
        let items = vec![
            element(source, Kind::Field, "x = 1;"),
            element(source, Kind::Method, "run() {}"),
        ];

        let mut buffer = TextBuffer::new(source);
        let inserted = insert_padding(
            &mut buffer,
            CodeLanguage::TypeScript,
            &DefaultBlankLinePolicy::default(),
            &items,
        );

        assert_eq!(inserted, 0);
        assert_eq!(buffer.as_str(), source);
    }
}

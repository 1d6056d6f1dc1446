use std::fmt;
use std::ops::Range;

/// The declaration kinds a source can report.
///
/// Only a subset takes part in ordering; see [`crate::ordering`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Constant,
    Field,
    Constructor,
    Method,
    TestMethod,
    Property,
    Destructor,
    Indexer,
    Event,
    Delegate,
    Enum,
    EnumMember,
    Interface,
    Class,
    Struct,
    Namespace,
    Function,
    Variable,
    Region,
    UsingStatement,
}

impl Kind {
    pub fn is_field(self) -> bool {
        matches!(self, Kind::Field | Kind::Constant)
    }
}

/// Access levels, most visible first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    Public,
    ProtectedInternal,
    Protected,
    Internal,
    Default,
    PrivateProtected,
    Private,
}

/// One declaration in a document.
///
/// `start..end` is a byte range into the buffer the item was parsed from. It is
/// only valid for the snapshot it came from; the reorganizer refreshes it after
/// every pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationItem {
    pub kind: Kind,
    pub name: String,
    /// `None` for non-element items such as regions.
    pub access: Option<Access>,
    pub is_constant: bool,
    pub is_read_only: bool,
    pub attributes: Vec<String>,
    pub start: usize,
    pub end: usize,
    pub children: Vec<DeclarationItem>,
}

impl DeclarationItem {
    pub fn new(kind: Kind, name: impl Into<String>, range: Range<usize>) -> Self {
        debug_assert!(range.start <= range.end);
        Self {
            kind,
            name: name.into(),
            access: None,
            is_constant: false,
            is_read_only: false,
            attributes: Vec::new(),
            start: range.start,
            end: range.end,
            children: Vec::new(),
        }
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = Some(access);
        self
    }

    pub fn constant(mut self) -> Self {
        self.is_constant = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.is_read_only = true;
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    pub fn with_children(mut self, children: Vec<DeclarationItem>) -> Self {
        self.children = children;
        self
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Element items carry an access modifier and a concrete definition.
    /// Only elements are ever moved.
    pub fn is_element(&self) -> bool {
        self.access.is_some()
    }

    /// Shifts this item (and its children) to account for `deleted` having been
    /// removed from the buffer.
    pub fn adjust_for_delete(&mut self, deleted: Range<usize>) {
        let adjust = |pos: usize| {
            if pos >= deleted.end {
                pos - deleted.len()
            } else if pos > deleted.start {
                deleted.start
            } else {
                pos
            }
        };
        self.start = adjust(self.start);
        self.end = adjust(self.end);
        for child in &mut self.children {
            child.adjust_for_delete(deleted.clone());
        }
    }
}

impl fmt::Display for DeclarationItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {} [{}..{}]", self.kind, self.name, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_is_not_element() {
        let region = DeclarationItem::new(Kind::Region, "Fields", 0..10);
        let field = DeclarationItem::new(Kind::Field, "x", 0..10).with_access(Access::Private);

        assert!(!region.is_element());
        assert!(field.is_element());
    }

    #[test]
    fn test_adjust_for_delete() {
        let mut item = DeclarationItem::new(Kind::Class, "A", 10..50).with_children(vec![
            DeclarationItem::new(Kind::Field, "before", 12..20),
            DeclarationItem::new(Kind::Field, "inside", 22..28),
            DeclarationItem::new(Kind::Field, "after", 30..40),
        ]);

        item.adjust_for_delete(21..29);

        assert_eq!(item.range(), 10..42);
        assert_eq!(item.children[0].range(), 12..20);
        assert_eq!(item.children[1].range(), 21..21);
        assert_eq!(item.children[2].range(), 22..32);
    }
}

use std::cmp::Ordering;

use crate::code_item::{Access, DeclarationItem, Kind};

/// Kinds that take part in ordering, in the order they should appear.
const KIND_ORDER: [Kind; 7] = [
    Kind::Constant,
    Kind::Field,
    Kind::Constructor,
    Kind::Method,
    Kind::TestMethod,
    Kind::Property,
    Kind::Destructor,
];

/// Access levels from most to least visible.
const ACCESS_ORDER: [Access; 7] = [
    Access::Public,
    Access::ProtectedInternal,
    Access::Protected,
    Access::Internal,
    Access::Default,
    Access::PrivateProtected,
    Access::Private,
];

/// Sortable key for an item.
///
/// Each factor is weighted so that it only ever breaks ties of the factor
/// before it: kind, then constant, then read-only, then access.
pub fn rank(item: &DeclarationItem) -> u32 {
    kind_index(item) * 1000
        + constant_offset(item) * 100
        + read_only_offset(item) * 10
        + access_index(item)
}

fn kind_index(item: &DeclarationItem) -> u32 {
    KIND_ORDER
        .iter()
        .position(|kind| *kind == item.kind)
        .map_or(0, |index| index as u32 + 1)
}

fn constant_offset(item: &DeclarationItem) -> u32 {
    if !item.kind.is_field() || item.kind == Kind::Constant || item.is_constant {
        0
    } else {
        1
    }
}

fn read_only_offset(item: &DeclarationItem) -> u32 {
    if !item.kind.is_field() || item.kind == Kind::Constant || item.is_read_only {
        0
    } else {
        1
    }
}

fn access_index(item: &DeclarationItem) -> u32 {
    item.access
        .and_then(|access| ACCESS_ORDER.iter().position(|a| *a == access))
        .map_or(0, |index| index as u32 + 1)
}

/// Compares items by rank, optionally breaking ties by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemComparer {
    secondary_order_by_name: bool,
}

impl ItemComparer {
    pub fn new(secondary_order_by_name: bool) -> Self {
        Self {
            secondary_order_by_name,
        }
    }

    pub fn compare(&self, x: &DeclarationItem, y: &DeclarationItem) -> Ordering {
        match rank(x).cmp(&rank(y)) {
            Ordering::Equal if self.secondary_order_by_name => x.name.cmp(&y.name),
            other => other,
        }
    }
}

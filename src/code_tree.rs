use crate::code_item::DeclarationItem;

/// Nests a flat list of items by range containment.
///
/// An item becomes the child of the smallest earlier item that strictly
/// contains it. Items covering identical ranges stay siblings so grouped
/// definitions keep sharing one level.
pub fn build_tree(mut items: Vec<DeclarationItem>) -> Vec<DeclarationItem> {
    // Outer items first; for equal starts the longer range encloses the shorter.
    items.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut roots = Vec::new();
    let mut stack: Vec<DeclarationItem> = Vec::new();
    for item in items {
        while let Some(top) = stack.last() {
            if strictly_contains(top, &item) {
                break;
            }
            close_top(&mut stack, &mut roots);
        }
        stack.push(item);
    }
    while !stack.is_empty() {
        close_top(&mut stack, &mut roots);
    }
    roots
}

fn strictly_contains(outer: &DeclarationItem, inner: &DeclarationItem) -> bool {
    outer.start <= inner.start
        && inner.end <= outer.end
        && (outer.start, outer.end) != (inner.start, inner.end)
}

fn close_top(stack: &mut Vec<DeclarationItem>, roots: &mut Vec<DeclarationItem>) {
    let Some(done) = stack.pop() else {
        return;
    };
    match stack.last_mut() {
        Some(parent) => parent.children.push(done),
        None => roots.push(done),
    }
}

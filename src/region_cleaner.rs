use std::ops::Range;

use tracing::debug;

use crate::code_item::{DeclarationItem, Kind};
use crate::text_buffer::TextSurface;

/// Removes region items and their marker lines from the buffer.
///
/// A region item spans from its opening marker to its closing marker; both
/// marker lines are deleted while the code between them stays. Remaining items
/// are shifted to match. Returns the number of lines removed.
pub fn remove_regions(surface: &mut dyn TextSurface, items: &mut Vec<DeclarationItem>) -> usize {
    let mut lines: Vec<Range<usize>> = Vec::new();
    for region in items.iter().filter(|item| item.kind == Kind::Region) {
        debug!(region = %region.name, "removing region markers");
        for offset in [region.start, region.end.saturating_sub(1).max(region.start)] {
            let line = full_line(&*surface, offset);
            if !lines.contains(&line) {
                lines.push(line);
            }
        }
    }
    items.retain(|item| item.kind != Kind::Region);

    // Back to front, so earlier marker offsets stay valid.
    lines.sort_by(|a, b| b.start.cmp(&a.start));
    for line in &lines {
        surface.delete(line.clone());
        for item in items.iter_mut() {
            item.adjust_for_delete(line.clone());
        }
    }
    lines.len()
}

fn full_line(surface: &dyn TextSurface, offset: usize) -> Range<usize> {
    let line = surface.line_range(offset);
    if line.end < surface.len() {
        line.start..line.end + 1
    } else {
        line
    }
}

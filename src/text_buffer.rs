use std::ops::Range;

/// Handle to a range that the surface keeps current across edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Anchor(usize);

/// The editing operations the reorganizer needs from a text surface.
///
/// Offsets are byte offsets. Every edit must keep tracked ranges and the
/// cursor current so that callers can re-query positions after each mutation.
pub trait TextSurface {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn text(&self, range: Range<usize>) -> String;

    fn insert(&mut self, offset: usize, text: &str);

    fn delete(&mut self, range: Range<usize>);

    fn cursor(&self) -> usize;

    fn set_cursor(&mut self, offset: usize);

    /// The line terminator used by the document, `"\r\n"` or `"\n"`.
    fn line_break(&self) -> &'static str;

    /// The line holding `offset`, without its line terminator.
    fn line_range(&self, offset: usize) -> Range<usize>;

    /// Re-indents the lines of `range` to match the code that follows it.
    fn reformat_indent(&mut self, range: Range<usize>);

    /// Removes blank lines directly above and at the line starting at `offset`.
    /// Does nothing when `offset` is not at the start of a line.
    fn delete_surrounding_blank_lines(&mut self, offset: usize);

    fn track(&mut self, range: Range<usize>) -> Anchor;

    fn resolve(&self, anchor: Anchor) -> Range<usize>;

    fn retrack(&mut self, anchor: Anchor, range: Range<usize>);

    /// Stops tracking `anchor`; its handle must not be resolved afterwards.
    fn untrack(&mut self, anchor: Anchor);
}

/// In-memory text surface with tracked ranges, a cursor and undo units.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    text: String,
    cursor: usize,
    anchors: Vec<Option<Range<usize>>>,
    undo_stack: Vec<UndoEntry>,
    open_unit: Option<UndoEntry>,
    unit_depth: usize,
}

#[derive(Debug, Clone)]
struct UndoEntry {
    name: String,
    text: String,
    cursor: usize,
}

impl TextBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Starts an undo unit. Units nest; only the outermost one is recorded.
    pub fn begin_undo_unit(&mut self, name: &str) {
        if self.unit_depth == 0 {
            self.open_unit = Some(UndoEntry {
                name: name.to_string(),
                text: self.text.clone(),
                cursor: self.cursor,
            });
        }
        self.unit_depth += 1;
    }

    /// Closes the current undo unit. Closing the outermost unit records it when
    /// anything changed.
    pub fn end_undo_unit(&mut self) {
        if self.unit_depth == 0 {
            return;
        }
        self.unit_depth -= 1;
        if self.unit_depth == 0 {
            if let Some(entry) = self.open_unit.take() {
                if entry.text != self.text {
                    self.undo_stack.push(entry);
                }
            }
        }
    }

    /// Runs `f` inside one undo unit. The unit is closed whatever `f` returns,
    /// so partially applied edits stay recorded and undoable.
    pub fn run_undo_unit<T>(&mut self, name: &str, f: impl FnOnce(&mut Self) -> T) -> T {
        self.begin_undo_unit(name);
        let result = f(self);
        self.end_undo_unit();
        result
    }

    /// Reverts the most recent undo unit, returning its name.
    pub fn undo(&mut self) -> Option<String> {
        let entry = self.undo_stack.pop()?;
        self.text = entry.text;
        self.cursor = entry.cursor.min(self.text.len());
        self.anchors.clear();
        Some(entry.name)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    fn shift_for_insert(pos: usize, at: usize, len: usize) -> usize {
        if pos >= at {
            pos + len
        } else {
            pos
        }
    }

    fn shift_for_delete(pos: usize, deleted: &Range<usize>) -> usize {
        if pos >= deleted.end {
            pos - deleted.len()
        } else if pos > deleted.start {
            deleted.start
        } else {
            pos
        }
    }

    fn line_indent(&self, line: Range<usize>) -> String {
        self.text[line]
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect()
    }

    fn is_blank(&self, line: &Range<usize>) -> bool {
        self.text[line.clone()].trim().is_empty()
    }

    /// Full line range including its `\n`, if any.
    fn line_with_terminator(&self, offset: usize) -> Range<usize> {
        let line = self.line_range(offset);
        let end = if line.end < self.text.len() {
            line.end + 1
        } else {
            line.end
        };
        line.start..end
    }
}

impl TextSurface for TextBuffer {
    fn len(&self) -> usize {
        self.text.len()
    }

    fn text(&self, range: Range<usize>) -> String {
        self.text[range].to_string()
    }

    fn insert(&mut self, offset: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        self.text.insert_str(offset, text);
        let len = text.len();
        for anchor in self.anchors.iter_mut().flatten() {
            let start = Self::shift_for_insert(anchor.start, offset, len);
            let end = if anchor.end > offset {
                anchor.end + len
            } else {
                anchor.end
            };
            *anchor = start..end.max(start);
        }
        self.cursor = Self::shift_for_insert(self.cursor, offset, len);
    }

    fn delete(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        self.text.replace_range(range.clone(), "");
        for anchor in self.anchors.iter_mut().flatten() {
            *anchor =
                Self::shift_for_delete(anchor.start, &range)..Self::shift_for_delete(anchor.end, &range);
        }
        self.cursor = Self::shift_for_delete(self.cursor, &range);
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn set_cursor(&mut self, offset: usize) {
        self.cursor = offset.min(self.text.len());
    }

    fn line_break(&self) -> &'static str {
        match self.text.find('\n') {
            Some(end) if self.text[..end].ends_with('\r') => "\r\n",
            _ => "\n",
        }
    }

    fn line_range(&self, offset: usize) -> Range<usize> {
        let offset = offset.min(self.text.len());
        let start = self.text[..offset].rfind('\n').map_or(0, |i| i + 1);
        let end = self.text[offset..]
            .find('\n')
            .map_or(self.text.len(), |i| offset + i);
        start..end
    }

    fn reformat_indent(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }

        let mut target = None;
        let mut next = self.line_with_terminator(range.end - 1).end;
        while next < self.text.len() {
            let line = self.line_with_terminator(next);
            let content = self.line_range(next);
            if !self.is_blank(&content) {
                target = Some(self.line_indent(content));
                break;
            }
            next = line.end;
        }
        let Some(target) = target else {
            return;
        };

        let source = self.line_indent(self.line_range(range.start));
        if source == target {
            return;
        }

        // Walk the lines back to front so earlier offsets stay valid.
        let mut line_starts = Vec::new();
        let mut pos = self.line_range(range.start).start;
        while pos < range.end {
            line_starts.push(pos);
            pos = self.line_with_terminator(pos).end;
            if pos == self.text.len() {
                break;
            }
        }
        for start in line_starts.into_iter().rev() {
            let line = self.line_range(start);
            if self.is_blank(&line) || !self.text[line].starts_with(&source) {
                continue;
            }
            self.delete(start..start + source.len());
            self.insert(start, &target);
        }
    }

    fn delete_surrounding_blank_lines(&mut self, offset: usize) {
        let line = self.line_range(offset);
        if line.start != offset.min(self.text.len()) {
            return;
        }

        let mut start = line.start;
        while start > 0 {
            let above = self.line_range(start - 1);
            if !self.is_blank(&above) {
                break;
            }
            start = above.start;
        }

        let mut end = line.start;
        while end < self.text.len() {
            let current = self.line_with_terminator(end);
            let content = self.line_range(end);
            if !self.is_blank(&content) || current.end == content.end {
                break;
            }
            end = current.end;
        }

        self.delete(start..end);
    }

    fn track(&mut self, range: Range<usize>) -> Anchor {
        match self.anchors.iter().position(Option::is_none) {
            Some(slot) => {
                self.anchors[slot] = Some(range);
                Anchor(slot)
            }
            None => {
                self.anchors.push(Some(range));
                Anchor(self.anchors.len() - 1)
            }
        }
    }

    fn resolve(&self, anchor: Anchor) -> Range<usize> {
        self.anchors
            .get(anchor.0)
            .cloned()
            .flatten()
            .unwrap_or_default()
    }

    fn retrack(&mut self, anchor: Anchor, range: Range<usize>) {
        if let Some(slot) = self.anchors.get_mut(anchor.0) {
            *slot = Some(range);
        }
    }

    fn untrack(&mut self, anchor: Anchor) {
        if let Some(slot) = self.anchors.get_mut(anchor.0) {
            *slot = None;
        }
    }
}

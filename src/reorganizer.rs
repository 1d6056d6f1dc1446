use std::ops::Range;

use tracing::debug;

use crate::blank_lines::BlankLinePolicy;
use crate::code_item::{DeclarationItem, Kind};
use crate::comment_helper::{attached_comment_start, CodeLanguage, CommentMatcher};
use crate::ordering::ItemComparer;
use crate::text_buffer::{Anchor, TextSurface};

/// Attributes that pin the member order of the declaration they decorate
/// (COM interop vtable order, explicit memory layout).
const ORDER_SIGNIFICANT_ATTRIBUTES: [&str; 2] = ["ComImport", "StructLayout"];

/// Whether the members of `parent` may be reordered.
pub fn should_reorganize_children(parent: &DeclarationItem) -> bool {
    if parent.kind == Kind::Enum {
        return false;
    }
    !parent
        .attributes
        .iter()
        .any(|attribute| is_order_significant(attribute))
}

fn is_order_significant(attribute: &str) -> bool {
    let name = attribute.rsplit('.').next().unwrap_or(attribute);
    let name = name.strip_suffix("Attribute").unwrap_or(name);
    ORDER_SIGNIFICANT_ATTRIBUTES.contains(&name)
}

/// An item of the tree being reorganized, bound to a tracked buffer range.
struct Node<'t> {
    item: &'t DeclarationItem,
    anchor: Anchor,
    children: Vec<usize>,
}

/// The text a relocation removes and where it came from.
struct Cut {
    /// Start of the cut text in the buffer (comment block included).
    start: usize,
    end: usize,
    /// Indentation prepended when the item did not start its line.
    prefix: String,
    /// Ranges to delete, back to front.
    deletions: Vec<Range<usize>>,
}

/// Indentation of the sibling level being reorganized.
struct LevelIndent {
    /// Indentation of members that start their own line.
    body: String,
    /// Indentation of the line the enclosing container starts on.
    closing: String,
}

impl Cut {
    fn relative(&self, pos: usize) -> usize {
        pos.saturating_sub(self.start) + self.prefix.len()
    }
}

/// Moves declarations so every sibling level of a tree follows rank order.
///
/// One reorganizer serves one document; it is cheap to build and keeps only the
/// move count between calls.
pub struct CodeItemReorganizer<'a> {
    comparer: ItemComparer,
    policy: &'a dyn BlankLinePolicy,
    comments: Option<CommentMatcher>,
    moves: usize,
}

impl<'a> CodeItemReorganizer<'a> {
    pub fn new(language: CodeLanguage, policy: &'a dyn BlankLinePolicy) -> Self {
        Self {
            comparer: ItemComparer::default(),
            policy,
            comments: CommentMatcher::for_language(language),
            moves: 0,
        }
    }

    pub fn with_comparer(mut self, comparer: ItemComparer) -> Self {
        self.comparer = comparer;
        self
    }

    /// Number of relocations performed so far.
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// Reorders `items` and their eligible descendants in `surface`.
    ///
    /// On return every item's range describes its new location and each
    /// sibling list is sorted by position.
    pub fn reorganize(&mut self, surface: &mut dyn TextSurface, items: &mut [DeclarationItem]) {
        if items.is_empty() {
            return;
        }

        let mut nodes = Vec::new();
        let roots: Vec<usize> = items
            .iter()
            .map(|item| track_tree(surface, &mut nodes, item))
            .collect();

        self.reorganize_level(surface, &nodes, &roots, None);

        let ranges: Vec<Range<usize>> = nodes
            .iter()
            .map(|node| surface.resolve(node.anchor))
            .collect();
        for node in &nodes {
            surface.untrack(node.anchor);
        }

        refresh_ranges(items, &mut ranges.into_iter());
        items.sort_by_key(|item| item.start);
    }

    fn reorganize_level(
        &mut self,
        surface: &mut dyn TextSurface,
        nodes: &[Node],
        level: &[usize],
        container: Option<usize>,
    ) {
        if level.is_empty() {
            return;
        }
        let indent = level_indent(&*surface, nodes, level, container);

        // Non-element containers stay put, but their members are still ordered.
        for &id in level {
            let node = &nodes[id];
            if !node.item.is_element() && should_reorganize_children(node.item) {
                self.reorganize_level(surface, nodes, &node.children, Some(id));
            }
        }

        let groups = reorganizable_groups(&*surface, nodes, level);
        let mut current: Vec<usize> = groups.iter().map(|group| group[0]).collect();
        let mut desired = current.clone();
        let comparer = self.comparer;
        desired.sort_by(|a, b| comparer.compare(nodes[*a].item, nodes[*b].item));

        for (index, &id) in desired.iter().enumerate() {
            let node = &nodes[id];
            if should_reorganize_children(node.item) {
                self.reorganize_level(surface, nodes, &node.children, Some(id));
            } else {
                debug!(item = %node.item, "member order is significant, leaving children alone");
            }

            let Some(current_index) = current.iter().position(|other| *other == id) else {
                continue;
            };
            if current_index == index {
                continue;
            }

            let base = current[index];
            if let Some(group) = groups.iter().find(|group| group[0] == id) {
                self.relocate(surface, nodes, group, base, &indent);
            }

            current.remove(current_index);
            current.insert(index, id);
        }
    }

    /// Cuts the item heading `group` (with its aliases and descendants) and
    /// pastes it directly above `base`.
    fn relocate(
        &mut self,
        surface: &mut dyn TextSurface,
        nodes: &[Node],
        group: &[usize],
        base: usize,
        indent: &LevelIndent,
    ) {
        let id = group[0];
        if id == base {
            return;
        }

        let item = nodes[id].item;
        let base_item = nodes[base].item;
        let separate = self.policy.wants_trailing_blank_line(item)
            || self.policy.wants_leading_blank_line(base_item);

        let span = surface.resolve(nodes[id].anchor);
        let cursor = surface.cursor();
        let cursor_offset = (span.start..=span.end)
            .contains(&cursor)
            .then(|| cursor - span.start);

        let cut = self.cut_range(&*surface, span, &indent.closing);
        let mut anchors = Vec::new();
        for &member in group {
            collect_anchors(nodes, member, &mut anchors);
        }
        let relative: Vec<(Anchor, Range<usize>)> = anchors
            .into_iter()
            .map(|anchor| {
                let range = surface.resolve(anchor);
                (anchor, cut.relative(range.start)..cut.relative(range.end))
            })
            .collect();

        let mut text = cut.prefix.clone();
        text.push_str(&surface.text(cut.start..cut.end));
        for deletion in &cut.deletions {
            surface.delete(deletion.clone());
        }
        if let Some(first) = cut.deletions.last() {
            surface.delete_surrounding_blank_lines(first.start);
        }

        let line_break = surface.line_break();
        let base_start = surface.resolve(nodes[base].anchor).start;
        let base_line = surface.line_range(base_start);
        let base_leading = surface.text(base_line.start..base_start);
        let shares_line = !base_leading.trim().is_empty();

        let paste_at = if shares_line {
            // The base gets a line of its own; drop the spaces in front of it.
            let code_end = base_line.start + base_leading.trim_end().len();
            surface.delete(code_end..base_start);
            code_end
        } else {
            attached_comment_start(&*surface, self.comments.as_ref(), base_start)
        };

        let mut inserted = String::with_capacity(text.len() + 3 * line_break.len() + indent.body.len());
        if shares_line {
            inserted.push_str(line_break);
        }
        let block_start = paste_at + inserted.len();
        inserted.push_str(&text);
        inserted.push_str(line_break);
        if separate {
            inserted.push_str(line_break);
        }
        if shares_line {
            inserted.push_str(&indent.body);
        }
        surface.insert(paste_at, &inserted);

        for (anchor, range) in relative {
            surface.retrack(anchor, block_start + range.start..block_start + range.end);
        }
        surface.reformat_indent(block_start..block_start + text.len());

        if let Some(offset) = cursor_offset {
            let start = surface.resolve(nodes[id].anchor).start;
            surface.set_cursor(start + offset);
        }

        self.moves += 1;
        debug!(item = %item, base = %base_item, separate, "relocated declaration");
    }

    fn cut_range(&self, surface: &dyn TextSurface, span: Range<usize>, closing_indent: &str) -> Cut {
        let line = surface.line_range(span.start);
        let leading = surface.text(line.start..span.start);
        let starts_line = leading.trim().is_empty();

        let end_line = surface.line_range(span.end);
        let tail = surface.text(span.end..end_line.end);
        let ends_line = tail.trim().is_empty()
            || self
                .comments
                .as_ref()
                .is_some_and(|matcher| matcher.is_comment_line(&tail));

        match (starts_line, ends_line) {
            (true, true) => {
                let start = attached_comment_start(surface, self.comments.as_ref(), span.start);
                let delete_end = if end_line.end < surface.len() {
                    end_line.end + 1
                } else {
                    end_line.end
                };
                Cut {
                    start,
                    end: content_end(surface, &end_line).max(span.end),
                    prefix: String::new(),
                    deletions: vec![start..delete_end],
                }
            }
            (true, false) => {
                let start = attached_comment_start(surface, self.comments.as_ref(), span.start);
                let rest = tail.trim_start();
                let spaces = tail.len() - rest.len();
                // Another declaration shares the last line and keeps its
                // indentation; a lone closing token takes the container's.
                let from = if rest.starts_with(['}', ')', ']']) {
                    let kept = if leading.starts_with(closing_indent) {
                        closing_indent.len()
                    } else {
                        0
                    };
                    line.start + kept
                } else {
                    span.start
                };
                Cut {
                    start,
                    end: span.end,
                    prefix: String::new(),
                    deletions: vec![from..span.end + spaces, start..line.start],
                }
            }
            (false, _) => {
                let end = if ends_line {
                    content_end(surface, &end_line).max(span.end)
                } else {
                    span.end
                };
                let delete_start = line.start + leading.trim_end().len();
                Cut {
                    start: span.start,
                    end,
                    prefix: leading_indent(&surface.text(line)),
                    deletions: vec![delete_start..end],
                }
            }
        }
    }
}

fn leading_indent(line: &str) -> String {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').collect()
}

/// End of `line`'s content, before a `\r` that belongs to its terminator.
fn content_end(surface: &dyn TextSurface, line: &Range<usize>) -> usize {
    if surface.text(line.clone()).ends_with('\r') {
        line.end - 1
    } else {
        line.end
    }
}

fn level_indent(surface: &dyn TextSurface, nodes: &[Node], level: &[usize], container: Option<usize>) -> LevelIndent {
    let closing = container
        .map(|id| {
            let start = surface.resolve(nodes[id].anchor).start;
            leading_indent(&surface.text(surface.line_range(start)))
        })
        .unwrap_or_default();
    let body = level
        .iter()
        .filter(|&&id| nodes[id].item.is_element())
        .find_map(|&id| {
            let start = surface.resolve(nodes[id].anchor).start;
            let leading = surface.text(surface.line_range(start).start..start);
            leading.trim().is_empty().then_some(leading)
        })
        .unwrap_or_else(|| closing.clone());
    LevelIndent { body, closing }
}

fn track_tree<'t>(
    surface: &mut dyn TextSurface,
    nodes: &mut Vec<Node<'t>>,
    item: &'t DeclarationItem,
) -> usize {
    let id = nodes.len();
    nodes.push(Node {
        item,
        anchor: surface.track(item.range()),
        children: Vec::new(),
    });
    let children = item
        .children
        .iter()
        .map(|child| track_tree(surface, nodes, child))
        .collect();
    nodes[id].children = children;
    id
}

fn collect_anchors(nodes: &[Node], id: usize, anchors: &mut Vec<Anchor>) {
    anchors.push(nodes[id].anchor);
    for &child in &nodes[id].children {
        collect_anchors(nodes, child, anchors);
    }
}

/// Element items of one level grouped by shared start offset, in source order.
/// The first item of each group stands in for the whole group.
fn reorganizable_groups(surface: &dyn TextSurface, nodes: &[Node], level: &[usize]) -> Vec<Vec<usize>> {
    let mut groups: Vec<(usize, Vec<usize>)> = Vec::new();
    for &id in level {
        if !nodes[id].item.is_element() {
            continue;
        }
        let start = surface.resolve(nodes[id].anchor).start;
        match groups.iter_mut().find(|(offset, _)| *offset == start) {
            Some((_, members)) => members.push(id),
            None => groups.push((start, vec![id])),
        }
    }
    groups.sort_by_key(|(offset, _)| *offset);
    groups.into_iter().map(|(_, members)| members).collect()
}

fn refresh_ranges(items: &mut [DeclarationItem], ranges: &mut impl Iterator<Item = Range<usize>>) {
    for item in items.iter_mut() {
        if let Some(range) = ranges.next() {
            item.start = range.start;
            item.end = range.end;
        }
        refresh_ranges(&mut item.children, ranges);
        item.children.sort_by_key(|child| child.start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blank_lines::DefaultBlankLinePolicy;
    use crate::code_item::Access;
    use crate::text_buffer::TextBuffer;
    use pretty_assertions::assert_eq;

    fn decl(source: &str, kind: Kind, access: Access, text: &str) -> DeclarationItem {
        let start = source.find(text).unwrap();
        DeclarationItem::new(kind, text, start..start + text.len()).with_access(access)
    }

    fn run(
        source: &str,
        items: &mut [DeclarationItem],
        policy: &DefaultBlankLinePolicy,
    ) -> (TextBuffer, usize) {
        let mut buffer = TextBuffer::new(source);
        let mut reorganizer = CodeItemReorganizer::new(CodeLanguage::CSharp, policy);
        reorganizer.reorganize(&mut buffer, items);
        (buffer, reorganizer.moves())
    }

    fn scenario_class(source: &str) -> Vec<DeclarationItem> {
        vec![decl(source, Kind::Class, Access::Public, source.trim_end()).with_children(vec![
            decl(source, Kind::Method, Access::Public, "public void Run() {}"),
            decl(source, Kind::Field, Access::Public, "public const int Max = 1;").constant(),
            decl(source, Kind::Constructor, Access::Public, "public A() {}"),
        ])]
    }

    const SCENARIO: &str = "class A {\n    public void Run() {}\n    public const int Max = 1;\n    public A() {}\n}\n";

    #[test]
    fn test_kind_priority_scenario() {
        let mut items = scenario_class(SCENARIO);
        let (buffer, moves) = run(SCENARIO, &mut items, &DefaultBlankLinePolicy::none());

        assert_eq!(moves, 2);
        assert_eq!(
            buffer.as_str(),
            "class A {\n    public const int Max = 1;\n    public A() {}\n    public void Run() {}\n}\n"
        );
    }

    #[test]
    fn test_moved_items_are_separated_by_policy() {
        let mut items = scenario_class(SCENARIO);
        let (buffer, _) = run(SCENARIO, &mut items, &DefaultBlankLinePolicy::default());

        assert_eq!(
            buffer.as_str(),
            "class A {\n    public const int Max = 1;\n\n    public A() {}\n\n    public void Run() {}\n}\n"
        );
    }

    #[test]
    fn test_ranges_are_refreshed() {
        let mut items = scenario_class(SCENARIO);
        let (buffer, _) = run(SCENARIO, &mut items, &DefaultBlankLinePolicy::none());

        let names: Vec<_> = items[0].children.iter().map(|it| it.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["public const int Max = 1;", "public A() {}", "public void Run() {}"]
        );
        for child in &items[0].children {
            assert_eq!(buffer.text(child.range()), child.name);
        }
        assert_eq!(buffer.text(items[0].range()), buffer.as_str().trim_end());
    }

    #[test]
    fn test_reorganize_is_idempotent() {
        let mut items = scenario_class(SCENARIO);
        let (mut buffer, _) = run(SCENARIO, &mut items, &DefaultBlankLinePolicy::default());
        let once = buffer.as_str().to_string();

        let policy = DefaultBlankLinePolicy::default();
        let mut reorganizer = CodeItemReorganizer::new(CodeLanguage::CSharp, &policy);
        reorganizer.reorganize(&mut buffer, &mut items);

        assert_eq!(reorganizer.moves(), 0);
        assert_eq!(buffer.as_str(), once);
    }

    #[test]
    fn test_cursor_follows_moved_item() {
        let mut items = scenario_class(SCENARIO);
        let mut buffer = TextBuffer::new(SCENARIO);
        let max = SCENARIO.find("Max").unwrap();
        buffer.set_cursor(max);

        let policy = DefaultBlankLinePolicy::none();
        let mut reorganizer = CodeItemReorganizer::new(CodeLanguage::CSharp, &policy);
        reorganizer.reorganize(&mut buffer, &mut items);

        let relative = max - SCENARIO.find("public const").unwrap();
        let new_start = buffer.as_str().find("public const").unwrap();
        assert_eq!(buffer.cursor(), new_start + relative);
        assert_eq!(&buffer.as_str()[buffer.cursor()..buffer.cursor() + 3], "Max");
    }

    #[test]
    fn test_comments_travel_with_item() {
        let source = "class A {\n    /// Runs.\n    // twice\n    public void Run() {}\n\n    // counter\n    private int count;\n}\n";
        let mut items = vec![decl(source, Kind::Class, Access::Public, source.trim_end()).with_children(vec![
            decl(source, Kind::Method, Access::Public, "public void Run() {}"),
            decl(source, Kind::Field, Access::Private, "private int count;"),
        ])];

        let (buffer, _) = run(source, &mut items, &DefaultBlankLinePolicy::default());

        assert_eq!(
            buffer.as_str(),
            "class A {\n    // counter\n    private int count;\n\n    /// Runs.\n    // twice\n    public void Run() {}\n}\n"
        );
    }

    #[test]
    fn test_grouped_definition_moves_as_one() {
        let source = "class A {\n    public void Run() {}\n    int a, b;\n}\n";
        let field = source.find("int a, b;").unwrap();
        let range = field..field + "int a, b;".len();
        let mut items = vec![decl(source, Kind::Class, Access::Public, source.trim_end()).with_children(vec![
            decl(source, Kind::Method, Access::Public, "public void Run() {}"),
            DeclarationItem::new(Kind::Field, "a", range.clone()).with_access(Access::Private),
            DeclarationItem::new(Kind::Field, "b", range).with_access(Access::Private),
        ])];

        let (buffer, moves) = run(source, &mut items, &DefaultBlankLinePolicy::none());

        assert_eq!(moves, 1);
        assert_eq!(buffer.as_str(), "class A {\n    int a, b;\n    public void Run() {}\n}\n");
        let children = &items[0].children;
        assert_eq!(children[0].name, "a");
        assert_eq!(children[1].name, "b");
        assert_eq!(children[0].range(), children[1].range());
        assert_eq!(buffer.text(children[0].range()), "int a, b;");
    }

    #[test]
    fn test_enum_members_never_move() {
        let source = "enum E {\n    void Late() {}\n    int early;\n}\n";
        let mut items = vec![decl(source, Kind::Enum, Access::Public, source.trim_end()).with_children(vec![
            decl(source, Kind::Method, Access::Public, "void Late() {}"),
            decl(source, Kind::Field, Access::Public, "int early;"),
        ])];

        let (buffer, moves) = run(source, &mut items, &DefaultBlankLinePolicy::default());

        assert_eq!(moves, 0);
        assert_eq!(buffer.as_str(), source);
    }

    #[test]
    fn test_struct_layout_keeps_field_order() {
        let source = "struct Point {\n    public void Reset() {}\n    public int x;\n}\n";
        let mut items = vec![decl(source, Kind::Struct, Access::Public, source.trim_end())
            .with_attribute("System.Runtime.InteropServices.StructLayoutAttribute")
            .with_children(vec![
                decl(source, Kind::Method, Access::Public, "public void Reset() {}"),
                decl(source, Kind::Field, Access::Public, "public int x;"),
            ])];

        let (buffer, moves) = run(source, &mut items, &DefaultBlankLinePolicy::default());

        assert_eq!(moves, 0);
        assert_eq!(buffer.as_str(), source);
    }

    #[test]
    fn test_order_significant_attribute_names() {
        let item = |attr: &str| DeclarationItem::new(Kind::Class, "C", 0..0).with_attribute(attr);

        assert!(!should_reorganize_children(&item("ComImport")));
        assert!(!should_reorganize_children(&item("StructLayout")));
        assert!(!should_reorganize_children(&item("System.Runtime.InteropServices.ComImportAttribute")));
        assert!(should_reorganize_children(&item("Serializable")));
        assert!(should_reorganize_children(&DeclarationItem::new(Kind::Class, "C", 0..0)));
        assert!(!should_reorganize_children(&DeclarationItem::new(Kind::Enum, "E", 0..0)));
    }

    #[test]
    fn test_nested_container_is_sorted_before_moving() {
        let source = "class Outer {\n    public void Run() {}\n    class Inner {\n        public void Go() {}\n        private int count;\n    }\n    private int total;\n}\n";
        let inner_text = &source[source.find("class Inner").unwrap()..source.find("    private int total").unwrap() - 1];
        let mut items = vec![decl(source, Kind::Class, Access::Public, source.trim_end()).with_children(vec![
            decl(source, Kind::Method, Access::Public, "public void Run() {}"),
            decl(source, Kind::Class, Access::Private, inner_text).with_children(vec![
                decl(source, Kind::Method, Access::Public, "public void Go() {}"),
                decl(source, Kind::Field, Access::Private, "private int count;"),
            ]),
            decl(source, Kind::Field, Access::Private, "private int total;"),
        ])];

        let (buffer, moves) = run(source, &mut items, &DefaultBlankLinePolicy::none());

        assert_eq!(moves, 3);
        assert_eq!(
            buffer.as_str(),
            "class Outer {\n    class Inner {\n        private int count;\n        public void Go() {}\n    }\n    private int total;\n    public void Run() {}\n}\n"
        );
        let inner = &items[0].children[0];
        assert_eq!(buffer.text(inner.children[0].range()), "private int count;");
        assert_eq!(buffer.text(inner.children[1].range()), "public void Go() {}");
    }

    #[test]
    fn test_members_of_non_element_container_are_ordered() {
        let source = "class A {\n    run() {}\n    x = 1;\n}\nfunction after() {}\n";
        let class_text = &source[..source.find("\nfunction").unwrap()];
        let mut items = vec![
            DeclarationItem::new(Kind::Class, "A", 0..class_text.len()).with_children(vec![
                decl(source, Kind::Method, Access::Default, "run() {}"),
                decl(source, Kind::Field, Access::Default, "x = 1;"),
            ]),
            decl(source, Kind::Function, Access::Default, "function after() {}"),
        ];
        items[1].access = None;

        let (buffer, moves) = run(source, &mut items, &DefaultBlankLinePolicy::none());

        assert_eq!(moves, 1);
        assert_eq!(buffer.as_str(), "class A {\n    x = 1;\n    run() {}\n}\nfunction after() {}\n");
    }

    #[test]
    fn test_regions_are_never_moved() {
        let source = "class A {\n    public void Run() {}\n    #region Fields\n    int x;\n    #endregion\n}\n";
        let region_start = source.find("#region").unwrap();
        let region_end = source.find("#endregion").unwrap() + "#endregion".len();
        let mut items = vec![decl(source, Kind::Class, Access::Public, source.trim_end()).with_children(vec![
            decl(source, Kind::Method, Access::Public, "public void Run() {}"),
            DeclarationItem::new(Kind::Region, "Fields", region_start..region_end),
        ])];

        let (buffer, moves) = run(source, &mut items, &DefaultBlankLinePolicy::none());

        assert_eq!(moves, 0);
        assert_eq!(buffer.as_str(), source);
    }

    fn method_then_field(source: &str) -> Vec<DeclarationItem> {
        vec![decl(source, Kind::Class, Access::Public, source.trim_end()).with_children(vec![
            decl(source, Kind::Method, Access::Public, "public void Run() {}"),
            decl(source, Kind::Field, Access::Private, "private int x;"),
        ])]
    }

    #[test]
    fn test_base_on_opening_brace_line_gets_body_indent() {
        let source = "class A { public void Run() {}\n    private int x;\n}\n";
        let mut items = method_then_field(source);

        let (buffer, moves) = run(source, &mut items, &DefaultBlankLinePolicy::none());

        assert_eq!(moves, 1);
        assert_eq!(
            buffer.as_str(),
            "class A {\n    private int x;\n    public void Run() {}\n}\n"
        );
    }

    #[test]
    fn test_closing_brace_keeps_container_indent() {
        let source = "class A {\n    public void Run() {}\n    private int x; }\n";
        let mut items = method_then_field(source);

        let (buffer, _) = run(source, &mut items, &DefaultBlankLinePolicy::none());

        assert_eq!(
            buffer.as_str(),
            "class A {\n    private int x;\n    public void Run() {}\n}\n"
        );
    }

    #[test]
    fn test_crlf_line_breaks_are_kept() {
        let source = "class A {\r\n    public void Run() {}\r\n    private int x;\r\n}\r\n";
        let mut items = method_then_field(source);

        let (buffer, _) = run(source, &mut items, &DefaultBlankLinePolicy::default());

        assert_eq!(
            buffer.as_str(),
            "class A {\r\n    private int x;\r\n\r\n    public void Run() {}\r\n}\r\n"
        );
    }
}

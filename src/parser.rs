use std::ops::Range;

use swc_common::{sync::Lrc, FileName, SourceMap, Span, Spanned};
use swc_ecma_ast::*;
use swc_ecma_parser::{lexer::Lexer, Parser, StringInput, Syntax, TsSyntax};

use crate::code_item::{Access, DeclarationItem, Kind};
use crate::comment_helper::CodeLanguage;
use crate::error::{CleanUpError, CleanUpResult};
use crate::retriever::DeclarationSource;

/// Declaration source for TypeScript and JavaScript documents.
///
/// Module and namespace scope declarations are reported without an access
/// level: their textual order is evaluation order, so they are never moved,
/// while the members of classes and interfaces they contain are.
#[derive(Debug, Default)]
pub struct TypeScriptSource;

impl TypeScriptSource {
    pub fn new() -> Self {
        Self
    }

    /// Parses `source` into an swc module plus the position its first byte was
    /// assigned in the source map.
    pub fn parse(&self, source: &str, filename: &str) -> CleanUpResult<(Module, u32)> {
        let source_map: Lrc<SourceMap> = Default::default();
        let fm = source_map.new_source_file(FileName::Custom(filename.to_string()).into(), source.to_string());

        let syntax = Syntax::Typescript(TsSyntax {
            tsx: filename.ends_with(".tsx") || filename.ends_with(".jsx"),
            decorators: true,
            no_early_errors: true,
            ..Default::default()
        });

        let lexer = Lexer::new(syntax, Default::default(), StringInput::from(&*fm), None);

        let mut parser = Parser::new_from(lexer);

        let module = parser
            .parse_module()
            .map_err(|err| CleanUpError::ParseUnavailable {
                document: filename.to_string(),
                reason: format!("{:?}", err.kind()),
            })?;
        Ok((module, fm.start_pos.0))
    }
}

impl DeclarationSource for TypeScriptSource {
    fn retrieve(&self, name: &str, text: &str, language: CodeLanguage) -> CleanUpResult<Vec<DeclarationItem>> {
        if !matches!(language, CodeLanguage::TypeScript | CodeLanguage::JavaScript) {
            return Err(CleanUpError::ParseUnavailable {
                document: name.to_string(),
                reason: format!("no declaration source for {language:?}"),
            });
        }

        let (module, base) = self.parse(text, name)?;
        let mut collector = Collector {
            text,
            base,
            items: Vec::new(),
        };
        collector.module_items(&module.body);

        let mut items = collector.items;
        items.extend(scan_regions(text));
        Ok(items)
    }
}

struct Collector<'s> {
    text: &'s str,
    base: u32,
    items: Vec<DeclarationItem>,
}

impl Collector<'_> {
    fn range(&self, span: Span) -> Range<usize> {
        let clamp = |pos: u32| (pos.saturating_sub(self.base) as usize).min(self.text.len());
        clamp(span.lo.0)..clamp(span.hi.0)
    }

    fn slice(&self, span: Span) -> &str {
        self.text.get(self.range(span)).unwrap_or_default()
    }

    /// The item's range widened to cover its decorators.
    fn decorated_range(&self, span: Span, decorators: &[Decorator]) -> Range<usize> {
        let mut range = self.range(span);
        for decorator in decorators {
            range.start = range.start.min(self.range(decorator.span).start);
        }
        range
    }

    fn attributes(&self, decorators: &[Decorator]) -> Vec<String> {
        decorators
            .iter()
            .map(|decorator| decorator_name(self.slice(decorator.span)))
            .collect()
    }

    /// Records `item`, widened over its doc comments and its `;`/`,` terminator
    /// so that moving the range moves the whole member.
    fn push(&mut self, mut item: DeclarationItem) {
        item.start = block_comment_start(self.text, item.start);
        item.end = terminator_end(self.text, item.end);
        self.items.push(item);
    }

    fn module_items(&mut self, body: &[ModuleItem]) {
        for item in body {
            match item {
                ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
                    let source = self.slice(import.src.span).trim_matches(['"', '\'']).to_string();
                    self.push(DeclarationItem::new(Kind::UsingStatement, source, self.range(import.span)));
                }
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => self.decl(&export.decl, export.span),
                ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export)) => match &export.decl {
                    DefaultDecl::Class(class) => {
                        let name = class.ident.as_ref().map_or("default".to_string(), |id| id.sym.to_string());
                        self.class(name, &class.class, export.span);
                    }
                    DefaultDecl::Fn(function) => {
                        let name = function.ident.as_ref().map_or("default".to_string(), |id| id.sym.to_string());
                        self.push(DeclarationItem::new(Kind::Function, name, self.range(export.span)));
                    }
                    DefaultDecl::TsInterfaceDecl(interface) => self.interface(interface, export.span),
                },
                ModuleItem::Stmt(Stmt::Decl(decl)) => self.decl(decl, decl.span()),
                _ => {}
            }
        }
    }

    fn decl(&mut self, decl: &Decl, span: Span) {
        match decl {
            Decl::Class(class) => self.class(class.ident.sym.to_string(), &class.class, span),
            Decl::Fn(function) => {
                let item = DeclarationItem::new(Kind::Function, function.ident.sym.to_string(), self.range(span));
                self.push(item);
            }
            Decl::Var(var) => {
                // Declarators of one statement share its text.
                for declarator in &var.decls {
                    let name = match &declarator.name {
                        Pat::Ident(binding) => binding.id.sym.to_string(),
                        other => self.slice(other.span()).to_string(),
                    };
                    let mut item = DeclarationItem::new(Kind::Variable, name, self.range(span));
                    if var.kind == VarDeclKind::Const {
                        item = item.constant().read_only();
                    }
                    self.push(item);
                }
            }
            Decl::TsInterface(interface) => self.interface(interface, span),
            Decl::TsEnum(enumeration) => {
                self.push(DeclarationItem::new(Kind::Enum, enumeration.id.sym.to_string(), self.range(span)));
                for member in &enumeration.members {
                    let item = DeclarationItem::new(Kind::EnumMember, self.slice(member.id.span()), self.range(member.span))
                        .with_access(Access::Public);
                    self.push(item);
                }
            }
            Decl::TsModule(module) => {
                let name = self.slice(module.id.span()).to_string();
                self.push(DeclarationItem::new(Kind::Namespace, name, self.range(span)));
                if let Some(body) = &module.body {
                    self.namespace_body(body);
                }
            }
            _ => {}
        }
    }

    fn namespace_body(&mut self, body: &TsNamespaceBody) {
        match body {
            TsNamespaceBody::TsModuleBlock(block) => self.module_items(&block.body),
            TsNamespaceBody::TsNamespaceDecl(inner) => self.namespace_body(&inner.body),
        }
    }

    fn class(&mut self, name: String, class: &Class, span: Span) {
        let mut item = DeclarationItem::new(Kind::Class, name, self.decorated_range(span, &class.decorators));
        item.attributes = self.attributes(&class.decorators);
        self.push(item);

        for member in &class.body {
            self.class_member(member);
        }
    }

    fn class_member(&mut self, member: &ClassMember) {
        let item = match member {
            ClassMember::Constructor(ctor) => {
                DeclarationItem::new(Kind::Constructor, self.slice(ctor.key.span()), self.range(ctor.span))
                    .with_access(member_access(ctor.accessibility))
            }
            ClassMember::Method(method) => self.method(
                method.kind,
                self.slice(method.key.span()).to_string(),
                member_access(method.accessibility),
                method.span,
                &method.function.decorators,
            ),
            ClassMember::PrivateMethod(method) => self.method(
                method.kind,
                self.slice(method.key.span).to_string(),
                Access::Private,
                method.span,
                &method.function.decorators,
            ),
            ClassMember::ClassProp(prop) => self.field(
                self.slice(prop.key.span()).to_string(),
                member_access(prop.accessibility),
                prop.span,
                &prop.decorators,
                prop.is_static,
                prop.readonly,
            ),
            ClassMember::PrivateProp(prop) => self.field(
                self.slice(prop.key.span).to_string(),
                Access::Private,
                prop.span,
                &prop.decorators,
                prop.is_static,
                prop.readonly,
            ),
            ClassMember::AutoAccessor(accessor) => {
                let access = match &accessor.key {
                    Key::Private(_) => Access::Private,
                    Key::Public(_) => member_access(accessor.accessibility),
                };
                let mut item = DeclarationItem::new(
                    Kind::Property,
                    self.slice(accessor.key.span()),
                    self.decorated_range(accessor.span, &accessor.decorators),
                )
                .with_access(access);
                item.attributes = self.attributes(&accessor.decorators);
                item
            }
            ClassMember::TsIndexSignature(signature) => self.indexer(signature),
            _ => return,
        };
        self.push(item);
    }

    fn method(
        &self,
        kind: MethodKind,
        name: String,
        access: Access,
        span: Span,
        decorators: &[Decorator],
    ) -> DeclarationItem {
        let attributes = self.attributes(decorators);
        let kind = match kind {
            MethodKind::Method if attributes.iter().any(|name| is_test_attribute(name)) => Kind::TestMethod,
            MethodKind::Method => Kind::Method,
            MethodKind::Getter | MethodKind::Setter => Kind::Property,
        };
        let mut item = DeclarationItem::new(kind, name, self.decorated_range(span, decorators)).with_access(access);
        item.attributes = attributes;
        item
    }

    fn field(
        &self,
        name: String,
        access: Access,
        span: Span,
        decorators: &[Decorator],
        is_static: bool,
        readonly: bool,
    ) -> DeclarationItem {
        let mut item = DeclarationItem::new(Kind::Field, name, self.decorated_range(span, decorators)).with_access(access);
        item.attributes = self.attributes(decorators);
        if readonly {
            item = item.read_only();
            if is_static {
                item = item.constant();
            }
        }
        item
    }

    fn indexer(&self, signature: &TsIndexSignature) -> DeclarationItem {
        let mut item = DeclarationItem::new(Kind::Indexer, "[]", self.range(signature.span)).with_access(Access::Default);
        if signature.readonly {
            item = item.read_only();
        }
        item
    }

    fn interface(&mut self, interface: &TsInterfaceDecl, span: Span) {
        self.push(DeclarationItem::new(Kind::Interface, interface.id.sym.to_string(), self.range(span)));

        for element in &interface.body.body {
            let item = match element {
                TsTypeElement::TsPropertySignature(property) => {
                    let item = DeclarationItem::new(Kind::Property, self.slice(property.key.span()), self.range(property.span));
                    if property.readonly {
                        item.read_only()
                    } else {
                        item
                    }
                }
                TsTypeElement::TsMethodSignature(method) => {
                    DeclarationItem::new(Kind::Method, self.slice(method.key.span()), self.range(method.span))
                }
                TsTypeElement::TsGetterSignature(getter) => {
                    DeclarationItem::new(Kind::Property, self.slice(getter.key.span()), self.range(getter.span))
                }
                TsTypeElement::TsSetterSignature(setter) => {
                    DeclarationItem::new(Kind::Property, self.slice(setter.key.span()), self.range(setter.span))
                }
                TsTypeElement::TsIndexSignature(signature) => self.indexer(signature),
                _ => continue,
            };
            self.push(item.with_access(Access::Default));
        }
    }
}

fn member_access(accessibility: Option<Accessibility>) -> Access {
    match accessibility {
        Some(Accessibility::Public) => Access::Public,
        Some(Accessibility::Protected) => Access::Protected,
        Some(Accessibility::Private) => Access::Private,
        None => Access::Default,
    }
}

/// `@ns.Name(args)` -> `Name`
fn decorator_name(text: &str) -> String {
    let text = text.trim_start_matches('@');
    let end = text
        .find(|c: char| c == '(' || c == '<' || c.is_whitespace())
        .unwrap_or(text.len());
    let path = &text[..end];
    path.rsplit('.').next().unwrap_or(path).to_string()
}

/// Start of the `/* */` comments that sit on their own lines directly above
/// `start`.
fn block_comment_start(text: &str, mut start: usize) -> usize {
    loop {
        let before = text[..start].trim_end();
        if !before.ends_with("*/") {
            return start;
        }
        let Some(open) = before.rfind("/*") else {
            return start;
        };
        let line_start = text[..open].rfind('\n').map_or(0, |i| i + 1);
        if !text[line_start..open].trim().is_empty() {
            return start;
        }
        start = open;
    }
}

fn terminator_end(text: &str, end: usize) -> usize {
    let rest = &text[end..];
    let trimmed = rest.trim_start_matches([' ', '\t']);
    if trimmed.starts_with([';', ',']) {
        end + (rest.len() - trimmed.len()) + 1
    } else {
        end
    }
}

fn is_test_attribute(name: &str) -> bool {
    name == "Test" || name == "test"
}

/// Finds `// #region name` ... `// #endregion` marker pairs. Each region spans
/// from its opening marker to the end of its closing marker; a region that is
/// never closed covers only its opening marker.
fn scan_regions(text: &str) -> Vec<DeclarationItem> {
    let mut regions = Vec::new();
    let mut open: Vec<(Range<usize>, String)> = Vec::new();
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let content = line.trim();
        let start = offset + (line.len() - line.trim_start().len());
        let marker = start..start + content.len();
        offset += line.len();

        let Some(comment) = content.strip_prefix("//").map(str::trim_start) else {
            continue;
        };
        if let Some(name) = comment.strip_prefix("#region") {
            open.push((marker, name.trim().to_string()));
        } else if comment.starts_with("#endregion") {
            if let Some((opening, name)) = open.pop() {
                regions.push(DeclarationItem::new(Kind::Region, name, opening.start..marker.end));
            }
        }
    }

    for (opening, name) in open {
        regions.push(DeclarationItem::new(Kind::Region, name, opening));
    }
    regions
}

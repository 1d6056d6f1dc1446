use std::path::Path;

use regex::Regex;

use crate::text_buffer::TextSurface;

/// Languages whose comment syntax we know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeLanguage {
    CPlusPlus,
    CSharp,
    Css,
    FSharp,
    JavaScript,
    Less,
    Php,
    Scss,
    TypeScript,
    PowerShell,
    R,
    VisualBasic,
    Unknown,
}

impl CodeLanguage {
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(CodeLanguage::Unknown)
    }

    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "c" | "cc" | "cpp" | "cxx" | "h" | "hpp" => CodeLanguage::CPlusPlus,
            "cs" => CodeLanguage::CSharp,
            "css" => CodeLanguage::Css,
            "fs" | "fsi" | "fsx" => CodeLanguage::FSharp,
            "js" | "jsx" | "mjs" | "cjs" => CodeLanguage::JavaScript,
            "less" => CodeLanguage::Less,
            "php" => CodeLanguage::Php,
            "scss" => CodeLanguage::Scss,
            "ts" | "tsx" | "mts" | "cts" => CodeLanguage::TypeScript,
            "ps1" | "psm1" => CodeLanguage::PowerShell,
            "r" => CodeLanguage::R,
            "vb" => CodeLanguage::VisualBasic,
            _ => CodeLanguage::Unknown,
        }
    }

    /// The comment prefix pattern for this language, without trailing spaces.
    pub fn comment_prefix(self) -> Option<&'static str> {
        match self {
            CodeLanguage::CPlusPlus
            | CodeLanguage::CSharp
            | CodeLanguage::Css
            | CodeLanguage::FSharp
            | CodeLanguage::JavaScript
            | CodeLanguage::Less
            | CodeLanguage::Php
            | CodeLanguage::Scss
            | CodeLanguage::TypeScript => Some("///?"),
            CodeLanguage::PowerShell | CodeLanguage::R => Some("#+"),
            CodeLanguage::VisualBasic => Some("'+"),
            CodeLanguage::Unknown => None,
        }
    }
}

/// A single comment line split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentLine {
    pub prefix: String,
    pub indent: String,
    pub list_prefix: Option<String>,
    pub words: Vec<String>,
}

/// Matches whole comment lines for one language.
#[derive(Debug, Clone)]
pub struct CommentMatcher {
    regex: Regex,
}

impl CommentMatcher {
    /// Returns `None` for languages without a known comment prefix.
    pub fn for_language(language: CodeLanguage) -> Option<Self> {
        let prefix = language.comment_prefix()?;
        let pattern = format!(
            r"^(?P<prefix>[\t ]*{prefix})(?P<spacer>[ \t])?(?P<indent>[\t ]*)(?P<line>(?P<listprefix>[-=*+]+[ \t]*|\w+[):][ \t]+|\d+\.[ \t]+)?(?P<rest>.*?))[\t ]*\r?$"
        );
        // The pattern is assembled from fixed prefixes, so it always compiles.
        Regex::new(&pattern).ok().map(|regex| Self { regex })
    }

    pub fn is_comment_line(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }

    pub fn parse(&self, line: &str) -> Option<CommentLine> {
        let caps = self.regex.captures(line)?;
        let text = |name: &str| caps.name(name).map_or("", |m| m.as_str());

        Some(CommentLine {
            prefix: text("prefix").trim_start().to_string(),
            indent: text("indent").to_string(),
            list_prefix: caps
                .name("listprefix")
                .map(|m| m.as_str().trim_end().to_string()),
            words: text("rest").split_whitespace().map(str::to_string).collect(),
        })
    }

    /// Start of the comment block attached directly above the line that holds
    /// `offset`. Returns the start of that line when nothing is attached.
    pub fn comment_block_start(&self, surface: &dyn TextSurface, offset: usize) -> usize {
        let mut start = surface.line_range(offset).start;
        while start > 0 {
            let above = surface.line_range(start - 1);
            if !self.is_comment_line(&surface.text(above.clone())) {
                break;
            }
            start = above.start;
        }
        start
    }
}

/// Upward extent of the comment block attached to a declaration starting at
/// `offset`. Without a matcher (no comment syntax) the block is just the
/// declaration's own line.
pub fn attached_comment_start(
    surface: &dyn TextSurface,
    matcher: Option<&CommentMatcher>,
    offset: usize,
) -> usize {
    match matcher {
        Some(matcher) => matcher.comment_block_start(surface, offset),
        None => surface.line_range(offset).start,
    }
}

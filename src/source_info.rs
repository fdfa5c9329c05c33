//! Heuristic extraction of structural facts from C-like source files.
//!
//! These are regex passes, not a parser: multi-line signatures are missed
//! and macro invocations shaped like declarations can match. The output is
//! "likely useful context" for prompt assembly, nothing more.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

static FUNCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*([\w*]+)\s+(\w+)\s*\((.*?)\)\s*[;{]").expect("Invalid function regex")
});

static STRUCT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)typedef\s+struct\s*\{(.*?)\}\s*(\w+);").expect("Invalid struct regex")
});

static ENUM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)typedef\s+enum\s*\{(.*?)\}\s*(\w+);").expect("Invalid enum regex")
});

static INCLUDE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"#include\s+[<"]([^>"]+)[>"]"#).expect("Invalid include regex"));

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*\*?(.*?)\*/").expect("Invalid comment regex"));

/// Marker words that make a comment block worth keeping.
const IMPORTANT_MARKERS: [&str; 6] = ["WARNING", "FIXME", "TODO", "NOTE", "HACK", "ATTENTION"];

/// Maximum number of retained comment blocks per file.
const COMMENT_CAP: usize = 10;

/// A matched function signature, raw text per capture group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSig {
    pub name: String,
    pub return_type: String,
    pub params: String,
}

/// A matched `typedef struct`/`typedef enum` with its unparsed body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    pub name: String,
    pub body: String,
}

/// Structural facts about one source file, recomputed on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceInfo {
    pub functions: Vec<FunctionSig>,
    pub structs: Vec<TypeDef>,
    pub enums: Vec<TypeDef>,
    pub includes: Vec<String>,
    pub comments: Vec<String>,
}

impl SourceInfo {
    /// Extract from a file on disk.
    ///
    /// A missing or unreadable file yields the all-empty aggregate;
    /// non-UTF-8 content is decoded lossily rather than rejected.
    pub fn from_file(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read(path) {
            Ok(bytes) => Self::from_text(&String::from_utf8_lossy(&bytes)),
            Err(_) => Self::default(),
        }
    }

    /// Extract from already-loaded source text.
    pub fn from_text(content: &str) -> Self {
        Self {
            functions: extract_functions(content),
            structs: extract_typedefs(&STRUCT_RE, content),
            enums: extract_typedefs(&ENUM_RE, content),
            includes: extract_includes(content),
            comments: extract_important_comments(content),
        }
    }

    /// Merge another file's info into this one, list by list, preserving
    /// order and duplicates.
    pub fn extend(&mut self, other: SourceInfo) {
        self.functions.extend(other.functions);
        self.structs.extend(other.structs);
        self.enums.extend(other.enums);
        self.includes.extend(other.includes);
        self.comments.extend(other.comments);
    }
}

fn extract_functions(content: &str) -> Vec<FunctionSig> {
    FUNCTION_RE
        .captures_iter(content)
        .map(|caps| FunctionSig {
            return_type: caps[1].trim().to_string(),
            name: caps[2].trim().to_string(),
            params: caps[3].trim().to_string(),
        })
        .collect()
}

fn extract_typedefs(re: &Regex, content: &str) -> Vec<TypeDef> {
    re.captures_iter(content)
        .map(|caps| TypeDef {
            body: caps[1].trim().to_string(),
            name: caps[2].trim().to_string(),
        })
        .collect()
}

fn extract_includes(content: &str) -> Vec<String> {
    INCLUDE_RE.captures_iter(content).map(|caps| caps[1].to_string()).collect()
}

/// Keep a `/* ... */` block only if it carries a marker word or a
/// `@brief`/`@file` doc tag, capped at [`COMMENT_CAP`] entries.
fn extract_important_comments(content: &str) -> Vec<String> {
    let mut comments = Vec::new();

    for caps in COMMENT_RE.captures_iter(content) {
        let text = caps[1].trim().to_string();
        let has_marker = IMPORTANT_MARKERS.iter().any(|marker| text.contains(marker));
        if has_marker || text.contains("@brief") || text.contains("@file") {
            comments.push(text);
        }
    }

    comments.truncate(COMMENT_CAP);
    comments
}

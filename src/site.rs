//! Static HTML viewer generation for the wiki tree.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, Local};
use regex::Regex;
use serde::Serialize;

use crate::assets;
use crate::error::AppError;
use crate::workspace::Workspace;

static FRONTMATTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A---\s*\n(.*?)\n---\s*\n").expect("Invalid frontmatter regex")
});

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").expect("Invalid heading regex"));

static ANCHOR_STRIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("Invalid anchor strip regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// A frontmatter value: scalar text or a `[a, b]` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaValue {
    Text(String),
    List(Vec<String>),
}

impl MetaValue {
    fn as_text(&self) -> Option<&str> {
        match self {
            MetaValue::Text(value) => Some(value),
            MetaValue::List(_) => None,
        }
    }

    fn as_list(&self) -> Vec<String> {
        match self {
            MetaValue::Text(_) => Vec::new(),
            MetaValue::List(values) => values.clone(),
        }
    }
}

/// Lenient frontmatter metadata with per-key default lookups.
pub type Frontmatter = BTreeMap<String, MetaValue>;

/// One heading of a document's outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub level: usize,
    pub text: String,
    pub anchor: String,
}

/// One scanned wiki document, ready for template injection.
#[derive(Debug, Clone, Serialize)]
pub struct DocEntry {
    pub path: String,
    pub title: String,
    pub category: String,
    pub date: String,
    pub author: String,
    pub tags: Vec<String>,
    pub status: String,
    pub content: String,
    pub headings: Vec<Heading>,
    pub modified: String,
}

/// One category of the navigation tree.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryNode {
    pub name: String,
    pub docs: Vec<TreeDoc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TreeDoc {
    pub path: String,
    pub title: String,
    pub status: String,
    pub date: String,
}

/// Result of a site build.
#[derive(Debug)]
pub struct SiteOutcome {
    pub output_path: PathBuf,
    pub doc_count: usize,
}

/// Parse `key: value` frontmatter delimited by `---` lines.
///
/// Values in `[brackets]` become lists; surrounding single or double
/// quotes are stripped. Returns the metadata and the remaining body.
pub fn parse_frontmatter(content: &str) -> (Frontmatter, &str) {
    let mut meta = Frontmatter::new();
    let Some(caps) = FRONTMATTER_RE.captures(content) else {
        return (meta, content);
    };

    for line in caps[1].trim().split('\n') {
        let line = line.trim();
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        let parsed = if value.starts_with('[') && value.ends_with(']') {
            MetaValue::List(
                value[1..value.len() - 1]
                    .split(',')
                    .map(|item| item.trim().trim_matches('\'').trim_matches('"').to_string())
                    .filter(|item| !item.is_empty())
                    .collect(),
            )
        } else {
            MetaValue::Text(strip_quotes(value).to_string())
        };
        meta.insert(key.to_string(), parsed);
    }

    let body = &content[caps.get(0).map(|m| m.end()).unwrap_or(0)..];
    (meta, body)
}

fn strip_quotes(value: &str) -> &str {
    if (value.starts_with('"') && value.ends_with('"') && value.len() >= 2)
        || (value.starts_with('\'') && value.ends_with('\'') && value.len() >= 2)
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Extract the heading outline, skipping fenced code blocks.
pub fn extract_headings(body: &str) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut in_code = false;

    for line in body.split('\n') {
        let line = line.trim();
        if line.starts_with("```") {
            in_code = !in_code;
            continue;
        }
        if in_code {
            continue;
        }
        if let Some(caps) = HEADING_RE.captures(line) {
            let text = caps[2].trim().to_string();
            let anchor = ANCHOR_STRIP_RE.replace_all(&text, "");
            let anchor = WHITESPACE_RE.replace_all(&anchor, "-").to_lowercase();
            headings.push(Heading { level: caps[1].len(), text, anchor });
        }
    }

    headings
}

/// Scan the wiki tree for markdown documents, skipping `_site/`.
/// Unreadable files are warned about and skipped rather than aborting.
pub fn scan_wiki(wiki_dir: &Path) -> Result<Vec<DocEntry>, AppError> {
    let mut paths = Vec::new();
    collect_markdown(wiki_dir, &mut paths)?;
    paths.sort();

    let mut docs = Vec::new();
    for md_path in paths {
        let rel = md_path
            .strip_prefix(wiki_dir)
            .unwrap_or(&md_path)
            .to_string_lossy()
            .replace('\\', "/");
        if rel.starts_with("_site/") {
            continue;
        }

        let content = match fs::read_to_string(&md_path) {
            Ok(content) => content,
            Err(err) => {
                println!("[WARN] Cannot read {}: {}", md_path.display(), err);
                continue;
            }
        };

        let (meta, body) = parse_frontmatter(&content);
        let headings = extract_headings(body);

        let parts: Vec<&str> = rel.split('/').collect();
        let path_category = if parts.len() > 1 { parts[0] } else { "root" };
        let category = meta
            .get("category")
            .and_then(MetaValue::as_text)
            .unwrap_or(path_category)
            .to_string();

        let stem = md_path.file_stem().and_then(|s| s.to_str()).unwrap_or("untitled");
        let title = match meta.get("title").and_then(MetaValue::as_text) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => headings
                .first()
                .map(|h| h.text.clone())
                .unwrap_or_else(|| title_case(&stem.replace('_', " "))),
        };

        let modified = fs::metadata(&md_path)?.modified()?;

        docs.push(DocEntry {
            path: rel,
            title,
            category,
            date: meta.get("date").and_then(MetaValue::as_text).unwrap_or("").to_string(),
            author: meta
                .get("author")
                .and_then(MetaValue::as_text)
                .unwrap_or("Unknown")
                .to_string(),
            tags: meta.get("tags").map(MetaValue::as_list).unwrap_or_default(),
            status: meta
                .get("status")
                .and_then(MetaValue::as_text)
                .unwrap_or("draft")
                .to_string(),
            content,
            headings,
            modified: DateTime::<Local>::from(modified).format("%Y-%m-%d %H:%M").to_string(),
        });
    }

    Ok(docs)
}

fn collect_markdown(dir: &Path, paths: &mut Vec<PathBuf>) -> Result<(), AppError> {
    if !dir.exists() {
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_markdown(&path, paths)?;
        } else if path.extension().is_some_and(|ext| ext == "md") {
            paths.push(path);
        }
    }
    Ok(())
}

fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Display names for the conventional category directories.
fn category_display_name(category: &str) -> String {
    match category {
        "root" => "Project Overview".to_string(),
        "modules" => "Modules".to_string(),
        "api" => "API Reference".to_string(),
        "design" => "Design Documents".to_string(),
        "hardware" => "Hardware Interfaces".to_string(),
        "changelog" => "Changelog".to_string(),
        other => title_case(other),
    }
}

/// Group documents into the navigation tree by category.
pub fn build_tree(docs: &[DocEntry]) -> BTreeMap<String, CategoryNode> {
    let mut tree: BTreeMap<String, CategoryNode> = BTreeMap::new();
    for doc in docs {
        let node = tree.entry(doc.category.clone()).or_insert_with(|| CategoryNode {
            name: category_display_name(&doc.category),
            docs: Vec::new(),
        });
        node.docs.push(TreeDoc {
            path: doc.path.clone(),
            title: doc.title.clone(),
            status: doc.status.clone(),
            date: doc.date.clone(),
        });
    }
    tree
}

/// Inject documents and tree into the embedded viewer template.
pub fn generate_html(
    docs: &[DocEntry],
    tree: &BTreeMap<String, CategoryNode>,
    project_name: &str,
) -> Result<String, AppError> {
    let docs_json = serde_json::to_string(docs)
        .map_err(|err| AppError::config_error(format!("Failed to serialize documents: {}", err)))?;
    let tree_json = serde_json::to_string(tree)
        .map_err(|err| AppError::config_error(format!("Failed to serialize tree: {}", err)))?;

    let html = assets::template(assets::VIEWER_TEMPLATE)?
        .replace("/*__DOCS_DATA__*/", &docs_json)
        .replace("/*__TREE_DATA__*/", &tree_json)
        .replace("__BUILD_TIME__", &Local::now().format("%Y-%m-%d %H:%M:%S").to_string())
        .replace("__DOC_COUNT__", &docs.len().to_string())
        .replace("__PROJECT_NAME__", project_name);

    Ok(html)
}

/// Build `_site/index.html` for the workspace.
pub fn build(workspace: &Workspace, project_name: &str) -> Result<SiteOutcome, AppError> {
    let site_dir = workspace.site_dir();
    fs::create_dir_all(&site_dir)?;

    let docs = scan_wiki(&workspace.wiki_dir())?;
    println!("[INFO] Found {} document(s)", docs.len());

    if docs.is_empty() {
        println!("[WARN] No documents found in {}", workspace.wiki_dir().display());
        println!("[HINT] Create .md files in subdirectories: modules/, api/, design/, hardware/, changelog/");
    }

    let tree = build_tree(&docs);
    let categories: Vec<String> =
        tree.iter().map(|(key, node)| format!("{}({})", key, node.docs.len())).collect();
    println!(
        "[INFO] Categories: {}",
        if categories.is_empty() { "(none)".to_string() } else { categories.join(", ") }
    );

    let html = generate_html(&docs, &tree, project_name)?;

    let output_path = site_dir.join("index.html");
    fs::write(&output_path, html)?;

    Ok(SiteOutcome { output_path, doc_count: docs.len() })
}

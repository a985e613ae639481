//! Placeholder substitution inside Word (`.docx`) packages.
//!
//! A `.docx` file is a zip archive of XML parts. Placeholders are written in
//! the template as `{Name}`. Word freely splits typed text into several runs,
//! so a single placeholder may be spread over many `<w:t>` nodes of the same
//! paragraph; tokens are therefore matched against the joined text of each
//! paragraph and the value is written into the node where the token starts.
//! Every other byte of the package is carried over untouched.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::{Cursor, Read, Write};
use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;
use zip::result::ZipError;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Placeholder names a sponsorship template must contain.
pub const SPONSORSHIP_PLACEHOLDERS: [&str; 5] =
    ["NombresC", "Cedula1", "Carrera1", "NombreCA", "Codigo"];

const MAIN_PART: &str = "word/document.xml";

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern compiles")
    })
}

fn text_open_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<w:t(?:\s[^>]*)?>").expect("text node pattern compiles"))
}

fn text_part_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^word/(document|header\d*|footer\d*|footnotes|endnotes)\.xml$")
            .expect("part name pattern compiles")
    })
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("template is not a valid document package: {reason}")]
    Malformed {
        reason: String,
        required: Vec<String>,
    },
    #[error("template is missing placeholders: {}", .missing.join(", "))]
    MissingPlaceholders {
        missing: Vec<String>,
        required: Vec<String>,
    },
    #[error("no value bound for placeholders: {}", .unbound.join(", "))]
    UnboundPlaceholders {
        unbound: Vec<String>,
        required: Vec<String>,
    },
    #[error("failed to write the generated document: {reason}")]
    Serialize {
        reason: String,
        required: Vec<String>,
    },
}

impl TemplateError {
    pub fn required(&self) -> &[String] {
        match self {
            TemplateError::Malformed { required, .. }
            | TemplateError::MissingPlaceholders { required, .. }
            | TemplateError::UnboundPlaceholders { required, .. }
            | TemplateError::Serialize { required, .. } => required,
        }
    }

    /// Message telling the user which fields the template must carry.
    pub fn user_message(&self) -> String {
        format!(
            "Could not process the document. Check that the template has the fields: {}",
            self.required().join(", ")
        )
    }
}

/// Fills `{Name}` placeholders of a `.docx` template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTemplateEngine {
    required: Vec<String>,
}

impl Default for DocumentTemplateEngine {
    fn default() -> Self {
        Self::sponsorship()
    }
}

impl DocumentTemplateEngine {
    pub fn new<I, S>(required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: required.into_iter().map(Into::into).collect(),
        }
    }

    pub fn sponsorship() -> Self {
        Self::new(SPONSORSHIP_PLACEHOLDERS)
    }

    pub fn required_placeholders(&self) -> &[String] {
        &self.required
    }

    /// Placeholder names present in the template, in name order.
    pub fn inspect(&self, template: &[u8]) -> Result<BTreeSet<String>, TemplateError> {
        let mut archive = self.open(template)?;
        let parts = self.read_parts(&mut archive)?;
        Ok(parts
            .iter()
            .flat_map(|part| part.scan.tokens().map(|token| token.name.clone()))
            .collect())
    }

    /// Substitutes every placeholder and returns the new package bytes.
    ///
    /// Fails without output when the package is unreadable, a required
    /// placeholder is absent, or a placeholder in the template has no value.
    pub fn render(
        &self,
        template: &[u8],
        fields: &BTreeMap<String, String>,
    ) -> Result<Vec<u8>, TemplateError> {
        let mut archive = self.open(template)?;
        let parts = self.read_parts(&mut archive)?;

        let found: BTreeSet<&str> = parts
            .iter()
            .flat_map(|part| part.scan.tokens().map(|token| token.name.as_str()))
            .collect();

        let missing: Vec<String> = self
            .required
            .iter()
            .filter(|name| !found.contains(name.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(TemplateError::MissingPlaceholders {
                missing,
                required: self.required.clone(),
            });
        }

        let unbound: Vec<String> = found
            .iter()
            .filter(|name| !fields.contains_key(**name))
            .map(|name| name.to_string())
            .collect();
        if !unbound.is_empty() {
            return Err(TemplateError::UnboundPlaceholders {
                unbound,
                required: self.required.clone(),
            });
        }

        let rewritten: HashMap<usize, String> = parts
            .iter()
            .filter(|part| part.scan.has_tokens())
            .map(|part| (part.index, part.scan.substitute(&part.xml, fields)))
            .collect();
        debug!(
            parts = rewritten.len(),
            placeholders = found.len(),
            "template placeholders substituted"
        );

        self.write(&mut archive, &rewritten)
    }

    fn open<'a>(&self, template: &'a [u8]) -> Result<ZipArchive<Cursor<&'a [u8]>>, TemplateError> {
        ZipArchive::new(Cursor::new(template)).map_err(|err| self.malformed(err.to_string()))
    }

    fn read_parts(
        &self,
        archive: &mut ZipArchive<Cursor<&[u8]>>,
    ) -> Result<Vec<TextPart>, TemplateError> {
        let mut parts = Vec::new();
        for index in 0..archive.len() {
            let mut file = archive
                .by_index(index)
                .map_err(|err| self.malformed(err.to_string()))?;
            let name = file.name().to_string();
            if !text_part_pattern().is_match(&name) {
                continue;
            }

            let mut xml = String::new();
            file.read_to_string(&mut xml)
                .map_err(|err| self.malformed(format!("{name}: {err}")))?;
            let scan = PartScan::new(&xml);
            parts.push(TextPart {
                index,
                name,
                xml,
                scan,
            });
        }

        if !parts.iter().any(|part| part.name == MAIN_PART) {
            return Err(self.malformed(format!("missing {MAIN_PART}")));
        }
        Ok(parts)
    }

    fn write(
        &self,
        archive: &mut ZipArchive<Cursor<&[u8]>>,
        rewritten: &HashMap<usize, String>,
    ) -> Result<Vec<u8>, TemplateError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        for index in 0..archive.len() {
            let file = archive
                .by_index_raw(index)
                .map_err(|err| self.malformed(err.to_string()))?;

            match rewritten.get(&index) {
                Some(xml) => {
                    let name = file.name().to_string();
                    drop(file);
                    writer
                        .start_file(name, options)
                        .map_err(|err| self.serialize(err))?;
                    writer
                        .write_all(xml.as_bytes())
                        .map_err(|err| self.serialize(ZipError::Io(err)))?;
                }
                None => writer
                    .raw_copy_file(file)
                    .map_err(|err| self.serialize(err))?,
            }
        }

        let output = writer.finish().map_err(|err| self.serialize(err))?;
        Ok(output.into_inner())
    }

    fn malformed(&self, reason: String) -> TemplateError {
        TemplateError::Malformed {
            reason,
            required: self.required.clone(),
        }
    }

    fn serialize(&self, err: ZipError) -> TemplateError {
        TemplateError::Serialize {
            reason: err.to_string(),
            required: self.required.clone(),
        }
    }
}

struct TextPart {
    index: usize,
    name: String,
    xml: String,
    scan: PartScan,
}

/// `<w:t>` node located in a part.
struct TextNode {
    open: Range<usize>,
    content: Range<usize>,
}

/// Joined text of one paragraph and where each node starts inside it.
struct Paragraph {
    nodes: Vec<usize>,
    spans: Vec<Range<usize>>,
    text: String,
    tokens: Vec<Token>,
}

struct Token {
    name: String,
    span: Range<usize>,
}

struct PartScan {
    nodes: Vec<TextNode>,
    paragraphs: Vec<Paragraph>,
}

impl PartScan {
    fn new(xml: &str) -> Self {
        let nodes = text_nodes(xml);
        let breaks: Vec<usize> = xml.match_indices("</w:p>").map(|(at, _)| at).collect();

        let mut paragraphs: Vec<Paragraph> = Vec::new();
        let mut current: Option<usize> = None;
        for (index, node) in nodes.iter().enumerate() {
            let group = breaks.partition_point(|at| *at < node.open.start);
            if current != Some(group) {
                paragraphs.push(Paragraph {
                    nodes: Vec::new(),
                    spans: Vec::new(),
                    text: String::new(),
                    tokens: Vec::new(),
                });
                current = Some(group);
            }
            if let Some(paragraph) = paragraphs.last_mut() {
                let start = paragraph.text.len();
                paragraph.text.push_str(&xml[node.content.clone()]);
                paragraph.nodes.push(index);
                paragraph.spans.push(start..paragraph.text.len());
            }
        }

        for paragraph in &mut paragraphs {
            paragraph.tokens = placeholder_pattern()
                .captures_iter(&paragraph.text)
                .filter_map(|caps| {
                    let whole = caps.get(0)?;
                    let name = caps.get(1)?;
                    Some(Token {
                        name: name.as_str().to_string(),
                        span: whole.range(),
                    })
                })
                .collect();
        }

        Self { nodes, paragraphs }
    }

    fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.paragraphs.iter().flat_map(|p| p.tokens.iter())
    }

    fn has_tokens(&self) -> bool {
        self.tokens().next().is_some()
    }

    fn substitute(&self, xml: &str, fields: &BTreeMap<String, String>) -> String {
        let mut replacements: BTreeMap<usize, String> = BTreeMap::new();
        for paragraph in self.paragraphs.iter().filter(|p| !p.tokens.is_empty()) {
            for (node, text) in paragraph.nodes.iter().zip(paragraph.rewrite(fields)) {
                replacements.insert(*node, text);
            }
        }

        let mut out = String::with_capacity(xml.len());
        let mut last = 0;
        for (index, text) in replacements {
            let node = &self.nodes[index];
            out.push_str(&xml[last..node.open.start]);
            let open = &xml[node.open.clone()];
            if open.contains("xml:space") {
                out.push_str(open);
            } else {
                out.push_str("<w:t xml:space=\"preserve\"");
                out.push_str(&open["<w:t".len()..]);
            }
            out.push_str(&text);
            last = node.content.end;
        }
        out.push_str(&xml[last..]);
        out
    }
}

impl Paragraph {
    /// New content for each node of the paragraph, in node order.
    fn rewrite(&self, fields: &BTreeMap<String, String>) -> Vec<String> {
        let mut out = vec![String::new(); self.nodes.len()];
        let mut cursor = 0;
        for token in &self.tokens {
            self.copy_into(&mut out, cursor..token.span.start);
            let owner = self
                .spans
                .iter()
                .position(|span| span.start <= token.span.start && token.span.start < span.end)
                .unwrap_or(0);
            if let Some(value) = fields.get(&token.name) {
                out[owner].push_str(&escape_xml(value));
            }
            cursor = token.span.end;
        }
        self.copy_into(&mut out, cursor..self.text.len());
        out
    }

    fn copy_into(&self, out: &mut [String], range: Range<usize>) {
        for (slot, span) in out.iter_mut().zip(&self.spans) {
            let start = span.start.max(range.start);
            let end = span.end.min(range.end);
            if start < end {
                slot.push_str(&self.text[start..end]);
            }
        }
    }
}

fn text_nodes(xml: &str) -> Vec<TextNode> {
    let mut nodes = Vec::new();
    for open in text_open_pattern().find_iter(xml) {
        if open.as_str().ends_with("/>") {
            continue;
        }
        let Some(length) = xml[open.end()..].find("</w:t>") else {
            continue;
        };
        nodes.push(TextNode {
            open: open.range(),
            content: open.end()..open.end() + length,
        });
    }
    nodes
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

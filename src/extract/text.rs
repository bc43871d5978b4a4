//! Paragraph-level boilerplate removal
//!
//! The document is cut into paragraphs at block-level elements. Every
//! paragraph is first classified on its own (length, link density, stopword
//! density), then short and borderline paragraphs are resolved from their
//! neighbours, so that a short line inside an article survives while the same
//! line inside a navigation block does not.

use ego_tree::iter::Edge;
use scraper::{Html, Node};
use std::collections::HashSet;

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "caption", "center", "dd", "details",
    "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3",
    "h4", "h5", "h6", "header", "hr", "legend", "li", "main", "nav", "ol", "option", "p", "pre",
    "section", "summary", "table", "td", "textarea", "tfoot", "th", "thead", "tr", "ul",
];

const SKIPPED_TAGS: &[&str] = &[
    "head", "script", "style", "noscript", "template", "svg", "iframe", "object", "embed",
    "select", "button",
];

const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Thresholds of the paragraph classifier
#[derive(Debug, Clone, Copy)]
pub struct ClassifierParams {
    /// Paragraphs shorter than this (characters) are "short"
    pub length_low: usize,
    /// Stopword-rich paragraphs longer than this are "good" outright
    pub length_high: usize,
    pub stopwords_low: f64,
    pub stopwords_high: f64,
    /// Share of characters inside links above which a paragraph is "bad"
    pub max_link_density: f64,
    /// How far (characters) a heading may precede good text to be kept
    pub max_heading_distance: usize,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            length_low: 10,
            length_high: 100,
            stopwords_low: 0.1,
            stopwords_high: 0.2,
            max_link_density: 0.2,
            max_heading_distance: 150,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphClass {
    Good,
    NearGood,
    Short,
    Bad,
}

/// One block of text and its classification
#[derive(Debug, Clone)]
pub struct Paragraph {
    pub text: String,
    pub link_chars: usize,
    pub heading: bool,
    /// Classification from the paragraph alone
    pub initial: ParagraphClass,
    /// Classification after looking at neighbours; only `Good` is kept
    pub class: ParagraphClass,
}

impl Paragraph {
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_boilerplate(&self) -> bool {
        self.class != ParagraphClass::Good
    }
}

#[derive(Default)]
struct ParagraphBuilder {
    raw: String,
    link_chars: usize,
    heading: bool,
}

impl ParagraphBuilder {
    fn flush(&mut self, out: &mut Vec<Paragraph>) {
        let text = self.raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if !text.is_empty() {
            out.push(Paragraph {
                text,
                link_chars: self.link_chars,
                heading: self.heading,
                initial: ParagraphClass::Bad,
                class: ParagraphClass::Bad,
            });
        }
        *self = Self::default();
    }
}

/// Extracts article text from HTML documents
#[derive(Debug, Clone)]
pub struct TextExtractor {
    stopwords: HashSet<String>,
    params: ClassifierParams,
}

impl TextExtractor {
    pub fn new<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_params(stopwords, ClassifierParams::default())
    }

    pub fn with_params<I, S>(stopwords: I, params: ClassifierParams) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stopwords: stopwords
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
            params,
        }
    }

    /// Returns the non-boilerplate paragraphs of `html` joined by single spaces
    pub fn extract(&self, html: &str) -> String {
        self.paragraphs(html)
            .into_iter()
            .filter(|p| !p.is_boilerplate())
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Segments and classifies every paragraph of `html`
    pub fn paragraphs(&self, html: &str) -> Vec<Paragraph> {
        let mut paragraphs = segment(html);
        for paragraph in &mut paragraphs {
            paragraph.initial = self.classify(paragraph);
        }
        self.resolve_context(&mut paragraphs);
        paragraphs
    }

    fn stopword_density(&self, text: &str) -> f64 {
        let mut words = 0usize;
        let mut stops = 0usize;
        for word in text.split_whitespace() {
            let word = word
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            if word.is_empty() {
                continue;
            }
            words += 1;
            if self.stopwords.contains(&word) {
                stops += 1;
            }
        }
        if words == 0 {
            0.0
        } else {
            stops as f64 / words as f64
        }
    }

    fn classify(&self, paragraph: &Paragraph) -> ParagraphClass {
        let p = &self.params;
        let length = paragraph.len();
        let link_density = paragraph.link_chars as f64 / length.max(1) as f64;

        if link_density > p.max_link_density {
            return ParagraphClass::Bad;
        }
        if paragraph.text.contains('\u{a9}') || paragraph.text.contains("&copy") {
            return ParagraphClass::Bad;
        }
        if length < p.length_low {
            return if paragraph.link_chars > 0 {
                ParagraphClass::Bad
            } else {
                ParagraphClass::Short
            };
        }

        let density = self.stopword_density(&paragraph.text);
        if density >= p.stopwords_high {
            if length > p.length_high {
                ParagraphClass::Good
            } else {
                ParagraphClass::NearGood
            }
        } else if density >= p.stopwords_low {
            ParagraphClass::NearGood
        } else {
            ParagraphClass::Bad
        }
    }

    fn resolve_context(&self, paragraphs: &mut [Paragraph]) {
        let distance = self.params.max_heading_distance;

        // Short headings right before good text count as borderline
        let promoted: Vec<usize> = {
            let view: &[Paragraph] = paragraphs;
            (0..view.len())
                .filter(|&i| {
                    view[i].heading
                        && view[i].initial == ParagraphClass::Short
                        && good_within(view, i, distance, |p| p.initial)
                })
                .collect()
        };
        for i in promoted {
            paragraphs[i].initial = ParagraphClass::NearGood;
        }

        let initial: Vec<ParagraphClass> = paragraphs.iter().map(|p| p.initial).collect();
        for (i, paragraph) in paragraphs.iter_mut().enumerate() {
            paragraph.class = match initial[i] {
                ParagraphClass::Short => resolve_short(&initial, i),
                ParagraphClass::NearGood => {
                    let prev = neighbour(&initial, i, Direction::Back, true);
                    let next = neighbour(&initial, i, Direction::Forward, true);
                    if prev == ParagraphClass::Bad && next == ParagraphClass::Bad {
                        ParagraphClass::Bad
                    } else {
                        ParagraphClass::Good
                    }
                }
                class => class,
            };
        }

        // Headings that lost out but lead into good text are kept
        let revived: Vec<usize> = {
            let view: &[Paragraph] = paragraphs;
            (0..view.len())
                .filter(|&i| {
                    view[i].heading
                        && view[i].class == ParagraphClass::Bad
                        && view[i].initial != ParagraphClass::Bad
                        && good_within(view, i, distance, |p| p.class)
                })
                .collect()
        };
        for i in revived {
            paragraphs[i].class = ParagraphClass::Good;
        }
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new(super::stoplist::DEFAULT_STOPWORDS)
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Back,
    Forward,
}

/// Nearest decisive class in `direction`; the document edges count as bad
fn neighbour(
    classes: &[ParagraphClass],
    i: usize,
    direction: Direction,
    ignore_neargood: bool,
) -> ParagraphClass {
    let found = match direction {
        Direction::Back => classes[..i]
            .iter()
            .rev()
            .find(|c| decisive(**c, ignore_neargood)),
        Direction::Forward => classes[i + 1..]
            .iter()
            .find(|c| decisive(**c, ignore_neargood)),
    };
    found.copied().unwrap_or(ParagraphClass::Bad)
}

fn decisive(class: ParagraphClass, ignore_neargood: bool) -> bool {
    match class {
        ParagraphClass::Good | ParagraphClass::Bad => true,
        ParagraphClass::NearGood => !ignore_neargood,
        ParagraphClass::Short => false,
    }
}

fn resolve_short(classes: &[ParagraphClass], i: usize) -> ParagraphClass {
    use ParagraphClass::{Bad, Good, NearGood};

    let prev = neighbour(classes, i, Direction::Back, true);
    let next = neighbour(classes, i, Direction::Forward, true);

    match (prev, next) {
        (Good, Good) => Good,
        (Bad, Bad) => Bad,
        _ if prev == Bad && neighbour(classes, i, Direction::Back, false) == NearGood => Good,
        _ if next == Bad && neighbour(classes, i, Direction::Forward, false) == NearGood => Good,
        _ => Bad,
    }
}

/// Whether a good paragraph starts within `distance` characters after `i`
fn good_within<F>(paragraphs: &[Paragraph], i: usize, distance: usize, class_of: F) -> bool
where
    F: Fn(&Paragraph) -> ParagraphClass,
{
    let mut travelled = 0;
    for paragraph in &paragraphs[i + 1..] {
        if travelled > distance {
            break;
        }
        if class_of(paragraph) == ParagraphClass::Good {
            return true;
        }
        travelled += paragraph.len();
    }
    false
}

/// Cuts a document into paragraphs at block-level element boundaries
fn segment(html: &str) -> Vec<Paragraph> {
    let document = Html::parse_document(html);
    let mut paragraphs = Vec::new();
    let mut current = ParagraphBuilder::default();
    let mut skip_depth = 0usize;
    let mut link_depth = 0usize;
    let mut heading_depth = 0usize;

    for edge in document.root_element().traverse() {
        match edge {
            Edge::Open(node) => match node.value() {
                Node::Element(element) => {
                    let name = element.name();
                    if SKIPPED_TAGS.contains(&name) {
                        skip_depth += 1;
                    } else if skip_depth == 0 {
                        if BLOCK_TAGS.contains(&name) {
                            current.flush(&mut paragraphs);
                        } else if name == "br" {
                            current.raw.push(' ');
                        }
                    }
                    if name == "a" {
                        link_depth += 1;
                    }
                    if HEADING_TAGS.contains(&name) {
                        heading_depth += 1;
                    }
                }
                Node::Text(text) if skip_depth == 0 => {
                    let text: &str = text;
                    current.raw.push_str(text);
                    if link_depth > 0 {
                        current.link_chars += text
                            .split_whitespace()
                            .map(|w| w.chars().count())
                            .sum::<usize>();
                    }
                    if heading_depth > 0 && !text.trim().is_empty() {
                        current.heading = true;
                    }
                }
                _ => {}
            },
            Edge::Close(node) => {
                if let Node::Element(element) = node.value() {
                    let name = element.name();
                    if SKIPPED_TAGS.contains(&name) {
                        skip_depth = skip_depth.saturating_sub(1);
                    } else if skip_depth == 0 && BLOCK_TAGS.contains(&name) {
                        current.flush(&mut paragraphs);
                    }
                    if name == "a" {
                        link_depth = link_depth.saturating_sub(1);
                    }
                    if HEADING_TAGS.contains(&name) {
                        heading_depth = heading_depth.saturating_sub(1);
                    }
                }
            }
        }
    }
    current.flush(&mut paragraphs);

    paragraphs
}

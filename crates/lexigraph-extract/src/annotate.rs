//! Local linguistic annotation — named spans found without a model.
//!
//! [`HeuristicAnnotator`] tags spans using titles, corporate suffixes,
//! date/time/money patterns, known technology names, code identifiers,
//! quoted terms and runs of capitalized words. Overlapping candidates are
//! resolved by pattern priority, so every character belongs to at most one
//! span.

use lexigraph_core::ExtractionError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A labelled span of the annotated text. Offsets are byte offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    pub label: String,
    pub start: usize,
    pub end: usize,
}

/// A local named-entity annotator.
pub trait LinguisticAnnotator: Send + Sync {
    fn name(&self) -> &str;

    fn annotate(&self, text: &str) -> Result<Vec<Span>, ExtractionError>;
}

static PERSON_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:Mr|Mrs|Ms|Dr|Prof)\.?\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)").unwrap()
});

static ORGANIZATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\s+(?:Inc\.|Corp\.|LLC|Ltd\.|Co\.)").unwrap()
});

static DATES: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2}(?:st|nd|rd|th)?,?\s*\d{4}\b",
        r"\b(?:Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\.?\s+\d{1,2}(?:st|nd|rd|th)?,?\s*\d{4}\b",
        r"\b\d{4}[-/]\d{1,2}[-/]\d{1,2}\b",
        r"\b\d{1,2}[-/]\d{1,2}[-/]\d{2,4}\b",
        r"\bQ[1-4]\s*\d{4}\b",
    ])
});

static TIMES: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b\d{1,2}:\d{2}\s*(?:AM|PM|am|pm)?\b",
        r"\b\d{1,2}\s*(?:AM|PM|am|pm)\b",
    ])
});

static MONEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\d[\d,]*(?:\.\d+)?(?:\s*(?:million|billion|M|B|K)\b)?").unwrap()
});

static QUANTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d+(?:,\d{3})*(?:\.\d+)?\s*(?:users|customers|employees|people|items|orders|requests|GB|MB|KB|TB|ms|seconds|minutes|hours|days|weeks|percent)\b").unwrap()
});

static TECH_KEYWORDS: &[&str] = &[
    "Python", "JavaScript", "TypeScript", "Java", "Go", "Rust", "Ruby", "PHP",
    "Swift", "Kotlin", "React", "Angular", "Vue", "Node.js", "Django", "Flask",
    "FastAPI", "Spring", "Rails", "PostgreSQL", "MySQL", "MongoDB", "Redis",
    "Elasticsearch", "SQLite", "Docker", "Kubernetes", "AWS", "Azure", "GCP",
    "Terraform", "Ansible", "Git", "GitHub", "GitLab", "Jenkins", "TensorFlow",
    "PyTorch", "Keras", "REST", "GraphQL", "gRPC", "WebSocket", "HTTP", "API",
    "Linux", "Windows", "macOS", "Ubuntu", "OAuth", "JWT", "Kafka", "RabbitMQ",
    "Jira", "Slack",
];

static TECH: Lazy<Regex> = Lazy::new(|| {
    let alternatives: Vec<String> = TECH_KEYWORDS.iter().map(|k| regex::escape(k)).collect();
    Regex::new(&format!(r"\b(?:{})\b", alternatives.join("|"))).unwrap()
});

static CODE_IDENTIFIERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b[a-z]+(?:[A-Z][a-z0-9]+)+\b", // camelCase
        r"\b[a-z]+(?:_[a-z0-9]+)+\b",     // snake_case
    ])
});

static QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"\n]{2,30})""#).unwrap());

static CAPITALIZED_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][A-Za-z0-9]*(?:[ \t]+[A-Z][A-Za-z0-9]*)*").unwrap());

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z0-9]+").unwrap());

/// Capitalized words that open sentences rather than name things.
static LEADING_STOPWORDS: &[&str] = &[
    "a", "about", "after", "also", "an", "and", "as", "at", "because", "before", "but",
    "dr", "for", "hello", "hi", "his", "her", "here", "how", "i", "if", "in", "it", "its",
    "let", "mr", "mrs", "ms", "my", "next", "no", "now", "ok", "okay", "on", "or", "our",
    "prof", "she", "so", "thanks", "that", "the", "their", "then", "there", "these",
    "they", "this", "those", "today", "we", "well", "what", "when", "where", "who",
    "why", "with", "yes", "you", "your", "he",
];

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
}

/// Regex-driven annotator; the default local extraction strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicAnnotator;

impl HeuristicAnnotator {
    pub fn new() -> Self {
        Self
    }
}

impl LinguisticAnnotator for HeuristicAnnotator {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn annotate(&self, text: &str) -> Result<Vec<Span>, ExtractionError> {
        let mut spans = SpanSet::default();

        for cap in PERSON_TITLE.captures_iter(text) {
            if let Some(m) = cap.get(1) {
                spans.offer(text, m.start(), m.end(), "PERSON");
            }
        }
        for m in ORGANIZATION.find_iter(text) {
            spans.offer(text, m.start(), m.end(), "ORG");
        }
        for re in DATES.iter() {
            for m in re.find_iter(text) {
                spans.offer(text, m.start(), m.end(), "DATE");
            }
        }
        for re in TIMES.iter() {
            for m in re.find_iter(text) {
                spans.offer(text, m.start(), m.end(), "TIME");
            }
        }
        for m in MONEY.find_iter(text) {
            spans.offer(text, m.start(), m.end(), "MONEY");
        }
        for m in QUANTITY.find_iter(text) {
            spans.offer(text, m.start(), m.end(), "QUANTITY");
        }
        for m in TECH.find_iter(text) {
            spans.offer(text, m.start(), m.end(), "PRODUCT");
        }
        for re in CODE_IDENTIFIERS.iter() {
            for m in re.find_iter(text) {
                spans.offer(text, m.start(), m.end(), "TERM");
            }
        }
        for cap in QUOTED.captures_iter(text) {
            if let Some(m) = cap.get(1) {
                spans.offer(text, m.start(), m.end(), "CONCEPT");
            }
        }
        for m in CAPITALIZED_RUN.find_iter(text) {
            if let Some(start) = skip_leading_stopwords(text, m.start(), m.end()) {
                spans.offer(text, start, m.end(), "CONCEPT");
            }
        }

        Ok(spans.into_sorted())
    }
}

/// Byte offset where the run starts once sentence-opening words are dropped.
fn skip_leading_stopwords(text: &str, start: usize, end: usize) -> Option<usize> {
    for word in WORD.find_iter(&text[start..end]) {
        if !LEADING_STOPWORDS.contains(&word.as_str().to_lowercase().as_str()) {
            return Some(start + word.start());
        }
    }
    None
}

/// Accepted spans; a candidate overlapping an accepted span is rejected.
#[derive(Default)]
struct SpanSet {
    spans: Vec<Span>,
}

impl SpanSet {
    fn offer(&mut self, text: &str, start: usize, end: usize, label: &str) {
        let surface = text[start..end].trim();
        if surface.is_empty() {
            return;
        }
        if self.spans.iter().any(|s| start < s.end && s.start < end) {
            return;
        }
        self.spans.push(Span {
            text: surface.to_string(),
            label: label.to_string(),
            start,
            end,
        });
    }

    fn into_sorted(mut self) -> Vec<Span> {
        self.spans.sort_by_key(|s| s.start);
        self.spans
    }
}

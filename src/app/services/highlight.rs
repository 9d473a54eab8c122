//! Rule-based syntax highlighting.
//!
//! A [`Highlighter`] holds an ordered list of `(pattern, style)` rules. Each
//! rule is applied independently over the whole block, in list order, so a
//! later rule overwrites an earlier one wherever their spans overlap.
//!
//! The string rules are greedy (`".*"`): a line holding two quoted strings is
//! styled as one span running from the first quote to the last. Text between
//! the strings is therefore shown as string text too.

use regex_lite::Regex;

const PYTHON_KEYWORDS: &[&str] = &[
    "and", "as", "assert", "break", "class", "continue", "def", "del", "elif", "else", "except",
    "False", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda", "None",
    "nonlocal", "not", "or", "pass", "raise", "return", "True", "try", "while", "with", "yield",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightStyle {
    Plain,
    Keyword,
    String,
    Comment,
}

impl HighlightStyle {
    /// Style character used in an FLTK style buffer.
    pub fn style_char(self) -> char {
        match self {
            HighlightStyle::Plain => 'A',
            HighlightStyle::Keyword => 'B',
            HighlightStyle::String => 'C',
            HighlightStyle::Comment => 'D',
        }
    }
}

/// A styled byte range within one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub len: usize,
    pub style: HighlightStyle,
}

struct Rule {
    pattern: Regex,
    style: HighlightStyle,
}

pub struct Highlighter {
    rules: Vec<Rule>,
}

impl Highlighter {
    /// Python keywords, quoted strings and `#` comments.
    pub fn new() -> Self {
        let mut rules: Vec<(String, HighlightStyle)> = PYTHON_KEYWORDS
            .iter()
            .map(|word| (format!(r"\b{word}\b"), HighlightStyle::Keyword))
            .collect();
        rules.push((r#"".*""#.to_string(), HighlightStyle::String));
        rules.push((r"'.*'".to_string(), HighlightStyle::String));
        rules.push((r"#.*".to_string(), HighlightStyle::Comment));

        Self::with_rules(&rules).expect("built-in highlight patterns are valid")
    }

    pub fn with_rules<S: AsRef<str>>(rules: &[(S, HighlightStyle)]) -> Result<Self, regex_lite::Error> {
        let rules = rules
            .iter()
            .map(|(pattern, style)| -> Result<Rule, regex_lite::Error> {
                Ok(Rule {
                    pattern: Regex::new(pattern.as_ref())?,
                    style: *style,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Spans for one block, in the order the rules produced them.
    pub fn highlight(&self, block: &str) -> Vec<Span> {
        self.rules
            .iter()
            .flat_map(|rule| {
                rule.pattern.find_iter(block).filter(|m| !m.is_empty()).map(|m| Span {
                    start: m.start(),
                    len: m.len(),
                    style: rule.style,
                })
            })
            .collect()
    }

    /// One style character per byte of `text`, highlighting line by line.
    pub fn style_string(&self, text: &str) -> String {
        let mut styles = Vec::with_capacity(text.len());
        for line in text.split_inclusive('\n') {
            let base = styles.len();
            styles.resize(base + line.len(), HighlightStyle::Plain.style_char());
            for span in self.highlight(line) {
                for slot in &mut styles[base + span.start..base + span.start + span.len] {
                    *slot = span.style.style_char();
                }
            }
        }
        styles.into_iter().collect()
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

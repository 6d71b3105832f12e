//! Font usage aggregation.
//!
//! Fonts are collected as [`FontVariant`]s, one per distinct
//! `(family, size, weight, style)` seen on the page, with heading and body
//! usage counted separately. [`FontAnalysis::from_variants`] groups the variants
//! by primary family, classifies each family and ranks them.
//!
//! ```rust
//! use swatch_tokens::font::{categorize_font_type, is_web_font, parse_font_family, FontType};
//!
//! let stack = parse_font_family(r#""Inter", -apple-system, sans-serif"#);
//! assert_eq!(stack, vec!["Inter", "-apple-system", "sans-serif"]);
//! assert_eq!(categorize_font_type(&stack[0]), FontType::SansSerif);
//! assert!(is_web_font(&stack[0]));
//! assert!(!is_web_font("Georgia"));
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder reported when no family is used in a context.
pub const NOT_DETECTED: &str = "Not detected";

/// Primary font name used when a variant's family stack is empty.
const UNKNOWN_FAMILY: &str = "unknown";

/// Generic font classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontType {
    Serif,
    SansSerif,
    Monospace,
    Cursive,
    Fantasy,
    Custom,
}

impl fmt::Display for FontType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FontType::Serif => "serif",
            FontType::SansSerif => "sans-serif",
            FontType::Monospace => "monospace",
            FontType::Cursive => "cursive",
            FontType::Fantasy => "fantasy",
            FontType::Custom => "custom",
        };
        f.write_str(name)
    }
}

struct FontCategory {
    font_type: FontType,
    keywords: &'static [&'static str],
    /// A name containing any of these never falls in this category.
    unless: &'static [&'static str],
}

/// Checked in order; the first match wins.
const CATEGORIES: [FontCategory; 5] = [
    FontCategory {
        font_type: FontType::Serif,
        keywords: &[
            "times", "times new roman", "georgia", "garamond", "baskerville", "minion", "caslon",
            "palatino", "book antiqua", "serif",
        ],
        unless: &["sans", "mono"],
    },
    FontCategory {
        font_type: FontType::SansSerif,
        keywords: &[
            "arial", "helvetica", "verdana", "tahoma", "trebuchet ms", "geneva", "lucida grande",
            "lucida sans unicode", "ms sans serif", "sans-serif", "roboto", "open sans", "lato",
            "montserrat", "source sans pro", "ubuntu", "nunito", "poppins", "inter", "system-ui",
        ],
        unless: &["mono"],
    },
    FontCategory {
        font_type: FontType::Monospace,
        keywords: &[
            "courier", "courier new", "monaco", "menlo", "consolas", "lucida console",
            "monospace", "source code pro", "fira code", "inconsolata", "roboto mono", "mono",
        ],
        unless: &[],
    },
    FontCategory {
        font_type: FontType::Cursive,
        keywords: &[
            "comic sans ms", "brush script mt", "lucida handwriting", "cursive", "dancing script",
            "pacifico", "great vibes",
        ],
        unless: &[],
    },
    FontCategory {
        font_type: FontType::Fantasy,
        keywords: &["fantasy"],
        unless: &[],
    },
];

/// Families that ship with common operating systems, plus the generic names.
const SYSTEM_FONTS: &[&str] = &[
    "arial", "helvetica", "times", "times new roman", "courier", "courier new", "verdana",
    "georgia", "palatino", "garamond", "bookman", "comic sans ms", "trebuchet ms", "arial black",
    "impact", "lucida sans unicode", "tahoma", "lucida console", "monaco", "serif", "sans-serif",
    "monospace", "cursive", "fantasy",
];

const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];
const BODY_TAGS: &[&str] = &["p", "div", "span", "a", "li", "td", "th", "body"];
const NON_CONTENT_TAGS: &[&str] = &["script", "style", "meta", "link", "title"];

/// Splits a `font-family` value into its font names, unquoted.
///
/// `inherit`, `initial` and empty values yield no fonts.
pub fn parse_font_family(value: &str) -> Vec<String> {
    let value = value.trim();
    if value.is_empty() || value == "inherit" || value == "initial" {
        return Vec::new();
    }

    value
        .split(',')
        .map(|font| font.trim().replace(['\'', '"'], ""))
        .filter(|font| !font.is_empty())
        .collect()
}

/// Classifies a font name by case-insensitive keyword match.
pub fn categorize_font_type(name: &str) -> FontType {
    let lower = name.to_lowercase();
    CATEGORIES
        .iter()
        .find(|category| {
            category.keywords.iter().any(|k| lower.contains(k))
                && !category.unless.iter().any(|u| lower.contains(u))
        })
        .map(|category| category.font_type)
        .unwrap_or(FontType::Custom)
}

/// True unless the name is a well-known system or generic family.
pub fn is_web_font(name: &str) -> bool {
    let lower = name.to_lowercase();
    !SYSTEM_FONTS.contains(&lower.as_str())
}

/// How an element's text counts toward font usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRole {
    Heading,
    Body,
    /// Counted in the total only.
    Other,
}

/// Classifies an element by its lowercase tag name.
pub fn classify_element(tag: &str) -> ElementRole {
    if HEADING_TAGS.contains(&tag) {
        ElementRole::Heading
    } else if BODY_TAGS.contains(&tag) || !NON_CONTENT_TAGS.contains(&tag) {
        ElementRole::Body
    } else {
        ElementRole::Other
    }
}

/// The computed font properties of one element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontKey {
    pub font_family: String,
    pub font_size: String,
    pub font_weight: String,
    pub font_style: String,
}

/// A sampled element shown as an example of a variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleElement {
    pub tag_name: String,
    pub class_name: String,
    pub text_content: String,
}

impl SampleElement {
    /// Builds a sample, keeping at most `excerpt_chars` characters of text.
    pub fn new(
        tag_name: impl Into<String>,
        class_name: impl Into<String>,
        text: &str,
        excerpt_chars: usize,
    ) -> Self {
        SampleElement {
            tag_name: tag_name.into(),
            class_name: class_name.into(),
            text_content: text.chars().take(excerpt_chars).collect(),
        }
    }
}

/// Usage of one `(family, size, weight, style)` combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontVariant {
    #[serde(flatten)]
    pub key: FontKey,
    pub heading_count: usize,
    pub body_count: usize,
    pub total_count: usize,
    pub elements: Vec<SampleElement>,
}

/// Builds [`FontVariant`]s from per-element observations.
#[derive(Debug, Clone)]
pub struct FontVariants {
    index: HashMap<FontKey, usize>,
    variants: Vec<FontVariant>,
    sample_limit: usize,
}

impl FontVariants {
    /// Keeps at most `sample_limit` sample elements per variant.
    pub fn new(sample_limit: usize) -> Self {
        FontVariants {
            index: HashMap::new(),
            variants: Vec::new(),
            sample_limit,
        }
    }

    /// Counts one element. `sample` is only called while the variant still has
    /// room for samples.
    pub fn observe(
        &mut self,
        key: FontKey,
        role: ElementRole,
        sample: impl FnOnce() -> SampleElement,
    ) {
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                let slot = self.variants.len();
                self.index.insert(key.clone(), slot);
                self.variants.push(FontVariant {
                    key,
                    heading_count: 0,
                    body_count: 0,
                    total_count: 0,
                    elements: Vec::new(),
                });
                slot
            }
        };

        let variant = &mut self.variants[slot];
        variant.total_count += 1;
        match role {
            ElementRole::Heading => variant.heading_count += 1,
            ElementRole::Body => variant.body_count += 1,
            ElementRole::Other => {}
        }
        if variant.elements.len() < self.sample_limit {
            variant.elements.push(sample());
        }
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Variants in first-seen order.
    pub fn into_variants(self) -> Vec<FontVariant> {
        self.variants
    }
}

/// One entry of the heading or body ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopFont {
    /// Primary (first) font of the stack.
    pub font_family: String,
    pub full_font_family: String,
    pub font_size: String,
    pub font_weight: String,
    pub font_style: String,
    pub font_type: FontType,
    pub is_web_font: bool,
    /// Usage in the ranked context (heading or body).
    pub usage: usize,
    pub total_usage: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyVariant {
    pub font_size: String,
    pub font_weight: String,
    pub font_style: String,
    pub usage: usize,
}

/// All variants sharing a primary font name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontFamily {
    pub name: String,
    pub font_type: FontType,
    pub is_web_font: bool,
    pub total_usage: usize,
    pub heading_usage: usize,
    pub body_usage: usize,
    pub variants: Vec<FamilyVariant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSummary {
    pub total_font_families: usize,
    pub web_fonts: usize,
    pub system_fonts: usize,
    pub type_distribution: BTreeMap<FontType, usize>,
    pub primary_heading_font: String,
    pub primary_body_font: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontAnalysis {
    pub headings: Vec<TopFont>,
    pub body: Vec<TopFont>,
    pub all_fonts: Vec<FontFamily>,
    pub summary: FontSummary,
}

/// The primary heading and body font names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontUsage {
    pub headings: String,
    pub body: String,
}

struct ProcessedVariant<'a> {
    variant: &'a FontVariant,
    primary: String,
    font_type: FontType,
    is_web_font: bool,
}

impl ProcessedVariant<'_> {
    fn top_font(&self, usage: usize) -> TopFont {
        let key = &self.variant.key;
        TopFont {
            font_family: self.primary.clone(),
            full_font_family: key.font_family.clone(),
            font_size: key.font_size.clone(),
            font_weight: key.font_weight.clone(),
            font_style: key.font_style.clone(),
            font_type: self.font_type,
            is_web_font: self.is_web_font,
            usage,
            total_usage: self.variant.total_count,
        }
    }
}

impl FontAnalysis {
    /// Groups, classifies and ranks collected variants. Heading and body
    /// rankings keep the first `top` entries.
    pub fn from_variants(variants: &[FontVariant], top: usize) -> Self {
        let mut processed: Vec<ProcessedVariant<'_>> = variants
            .iter()
            .map(|variant| {
                let primary = parse_font_family(&variant.key.font_family)
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| UNKNOWN_FAMILY.to_string());
                ProcessedVariant {
                    variant,
                    font_type: categorize_font_type(&primary),
                    is_web_font: is_web_font(&primary),
                    primary,
                }
            })
            .collect();
        processed.sort_by(|a, b| b.variant.total_count.cmp(&a.variant.total_count));

        let headings = rank_context(&processed, top, |v| v.heading_count);
        let body = rank_context(&processed, top, |v| v.body_count);
        let all_fonts = group_families(&processed);
        let summary = summarize(&all_fonts);

        FontAnalysis {
            headings,
            body,
            all_fonts,
            summary,
        }
    }

    pub fn usage(&self) -> FontUsage {
        let first = |fonts: &[TopFont]| {
            fonts
                .first()
                .map(|f| f.font_family.clone())
                .unwrap_or_else(|| NOT_DETECTED.to_string())
        };
        FontUsage {
            headings: first(&self.headings),
            body: first(&self.body),
        }
    }
}

fn rank_context(
    processed: &[ProcessedVariant<'_>],
    top: usize,
    usage: impl Fn(&FontVariant) -> usize,
) -> Vec<TopFont> {
    let mut ranked: Vec<&ProcessedVariant<'_>> = processed
        .iter()
        .filter(|p| usage(p.variant) > 0)
        .collect();
    ranked.sort_by(|a, b| usage(b.variant).cmp(&usage(a.variant)));
    ranked
        .into_iter()
        .take(top)
        .map(|p| p.top_font(usage(p.variant)))
        .collect()
}

fn group_families(processed: &[ProcessedVariant<'_>]) -> Vec<FontFamily> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut families: Vec<FontFamily> = Vec::new();

    for p in processed {
        let slot = *index.entry(p.primary.to_lowercase()).or_insert_with(|| {
            families.push(FontFamily {
                name: p.primary.clone(),
                font_type: p.font_type,
                is_web_font: p.is_web_font,
                total_usage: 0,
                heading_usage: 0,
                body_usage: 0,
                variants: Vec::new(),
            });
            families.len() - 1
        });

        let family = &mut families[slot];
        family.total_usage += p.variant.total_count;
        family.heading_usage += p.variant.heading_count;
        family.body_usage += p.variant.body_count;
        family.variants.push(FamilyVariant {
            font_size: p.variant.key.font_size.clone(),
            font_weight: p.variant.key.font_weight.clone(),
            font_style: p.variant.key.font_style.clone(),
            usage: p.variant.total_count,
        });
    }

    families.sort_by(|a, b| b.total_usage.cmp(&a.total_usage));
    families
}

fn summarize(families: &[FontFamily]) -> FontSummary {
    let web_fonts = families.iter().filter(|f| f.is_web_font).count();
    let mut type_distribution = BTreeMap::new();
    for family in families {
        *type_distribution.entry(family.font_type).or_insert(0) += 1;
    }

    FontSummary {
        total_font_families: families.len(),
        web_fonts,
        system_fonts: families.len() - web_fonts,
        type_distribution,
        primary_heading_font: busiest(families, |f| f.heading_usage),
        primary_body_font: busiest(families, |f| f.body_usage),
    }
}

/// Name of the family with the highest nonzero usage; earliest wins ties.
fn busiest(families: &[FontFamily], usage: impl Fn(&FontFamily) -> usize) -> String {
    let mut best: Option<&FontFamily> = None;
    for family in families.iter().filter(|f| usage(f) > 0) {
        if best.map_or(true, |b| usage(family) > usage(b)) {
            best = Some(family);
        }
    }
    best.map(|f| f.name.clone())
        .unwrap_or_else(|| NOT_DETECTED.to_string())
}

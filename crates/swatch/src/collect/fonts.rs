use swatch_dispatch::{StyledDocument, TypedProbe};
use swatch_tokens::{classify_element, FontKey, FontVariant, FontVariants, Limits, SampleElement};

/// Groups elements by `(family, size, weight, style)`.
#[derive(Debug, Clone, Copy)]
pub struct FontProbe {
    pub sample_elements: usize,
    pub excerpt_chars: usize,
}

impl FontProbe {
    pub fn new(limits: &Limits) -> Self {
        FontProbe {
            sample_elements: limits.sample_elements,
            excerpt_chars: limits.excerpt_chars,
        }
    }
}

impl Default for FontProbe {
    fn default() -> Self {
        Self::new(&Limits::default())
    }
}

impl TypedProbe for FontProbe {
    type Output = Vec<FontVariant>;
    const NAME: &'static str = "fonts";

    fn collect(&self, document: &dyn StyledDocument) -> Vec<FontVariant> {
        let mut variants = FontVariants::new(self.sample_elements);

        for element in document.elements() {
            let style = |property: &str| document.computed_style(element, property).unwrap_or_default();
            let family = style("font-family");
            if family.trim().is_empty() || family == "inherit" {
                continue;
            }

            let tag = document.tag_name(element);
            let key = FontKey {
                font_family: family,
                font_size: style("font-size"),
                font_weight: style("font-weight"),
                font_style: style("font-style"),
            };
            variants.observe(key, classify_element(&tag), || {
                SampleElement::new(
                    tag.clone(),
                    document.class_name(element),
                    &document.text_content(element),
                    self.excerpt_chars,
                )
            });
        }

        variants.into_variants()
    }
}

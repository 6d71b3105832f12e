use swatch_dispatch::{StyledDocument, TypedProbe};
use swatch_tokens::border::SIDES;
use swatch_tokens::{BorderSample, BorderTables};

/// Counts border radius, width and color over every element.
#[derive(Debug, Clone, Copy, Default)]
pub struct BorderProbe;

impl BorderProbe {
    fn sample(document: &dyn StyledDocument, element: usize) -> BorderSample {
        let style = |property: &str| document.computed_style(element, property).unwrap_or_default();
        BorderSample {
            radius: style("border-radius"),
            widths: SIDES.map(|side| style(&format!("border-{}-width", side))),
            colors: SIDES.map(|side| style(&format!("border-{}-color", side))),
            shorthand: style("border"),
        }
    }
}

impl TypedProbe for BorderProbe {
    type Output = BorderTables;
    const NAME: &'static str = "borders";

    fn collect(&self, document: &dyn StyledDocument) -> BorderTables {
        let mut tables = BorderTables::default();
        for element in document.elements() {
            tables.observe(&Self::sample(document, element));
        }
        tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swatch_test::{Element, SyntheticDocument};
    use swatch_tokens::to_hex;

    #[test]
    fn test_counts_every_side_and_shorthand() {
        let mut doc = SyntheticDocument::new();
        doc.append_to_body(
            Element::new("div")
                .style("border-radius", "4px")
                .border("2px", "solid", "rgb(255, 0, 0)"),
        );
        doc.append_to_body(Element::new("div").style("border-radius", "0px"));

        let tables = BorderProbe.collect(&doc);
        assert_eq!(tables.radius.ranked(), vec![("4px".to_string(), 1)]);
        // Four sides plus the shorthand.
        assert_eq!(tables.width.count(&"2px".to_string()), 5);
        assert_eq!(tables.color.count(&to_hex("#ff0000").unwrap()), 5);
    }

    #[test]
    fn test_unstyled_document_is_empty() {
        let tables = BorderProbe.collect(&SyntheticDocument::new());
        assert!(tables.radius.is_empty());
        assert!(tables.width.is_empty());
        assert!(tables.color.is_empty());
    }

    #[test]
    fn test_malformed_shorthand_is_dropped() {
        let mut doc = SyntheticDocument::new();
        doc.append_to_body(Element::new("div").style("border", "solid 1px red"));
        doc.append_to_body(Element::new("div").style("border", "0px none rgba(0, 0, 0, 0)"));

        let tables = BorderProbe.collect(&doc);
        assert!(tables.width.is_empty());
        assert!(tables.color.is_empty());
    }
}

use swatch_dispatch::{ElementId, StyledDocument, TypedProbe};
use swatch_tokens::{ColorPair, ColorSample};

/// Tried in order; the first selector that matches picks the header.
pub const HEADER_SELECTORS: &[&str] = &["header", "nav", ".header", "#header"];

/// Tried in order; the first selector that matches picks the footer.
pub const FOOTER_SELECTORS: &[&str] = &["footer", ".footer", "#footer"];

/// Everything that is, or is styled as, a button.
pub const BUTTON_SELECTORS: &str = "button, .button, .btn, \
    input[type=\"button\"], input[type=\"submit\"], input[type=\"reset\"], \
    [role=\"button\"], \
    a.button, a.btn, a[class*=\"button\"], a[class*=\"btn\"], \
    div.button, div.btn, div[class*=\"button\"], div[class*=\"btn\"], \
    span.button, span.btn, span[class*=\"button\"], span[class*=\"btn\"], \
    .cta, .call-to-action, .action-button, .primary-button, .secondary-button, \
    .submit-button, .form-button";

/// Samples landmark and button colors.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorProbe;

fn colors_of(document: &dyn StyledDocument, element: ElementId) -> (String, String) {
    let style = |property: &str| document.computed_style(element, property).unwrap_or_default();
    (style("background-color"), style("color"))
}

fn pair_of(document: &dyn StyledDocument, element: ElementId) -> ColorPair {
    let (background, foreground) = colors_of(document, element);
    ColorPair::from_raw(&background, &foreground)
}

fn first_match(document: &dyn StyledDocument, selectors: &[&str]) -> Option<ElementId> {
    selectors
        .iter()
        .find_map(|selector| document.query_selector(selector))
}

impl TypedProbe for ColorProbe {
    type Output = ColorSample;
    const NAME: &'static str = "colors";

    fn collect(&self, document: &dyn StyledDocument) -> ColorSample {
        let mut sample = ColorSample {
            body: document.body().map(|body| pair_of(document, body)),
            header: first_match(document, HEADER_SELECTORS).map(|el| pair_of(document, el)),
            footer: first_match(document, FOOTER_SELECTORS).map(|el| pair_of(document, el)),
            ..Default::default()
        };

        for button in document.query_selector_all(BUTTON_SELECTORS) {
            let (background, foreground) = colors_of(document, button);
            if !sample.observe_button(&background, &foreground) {
                tracing::trace!(%background, %foreground, "skipping button colors");
            }
        }
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swatch_test::{Element, SyntheticDocument};
    use swatch_tokens::to_hex;

    fn button(tag: &str, bg: &str, fg: &str) -> Element {
        Element::new(tag)
            .style("background-color", bg)
            .style("color", fg)
    }

    #[test]
    fn test_header_selector_priority() {
        let mut doc = SyntheticDocument::new();
        doc.append_to_body(button("div", "rgb(1, 1, 1)", "rgb(2, 2, 2)").class("header"));
        doc.append_to_body(button("nav", "rgb(3, 3, 3)", "rgb(4, 4, 4)"));

        let sample = ColorProbe.collect(&doc);
        // `nav` is tried before `.header`, whatever the document order.
        assert_eq!(sample.header.unwrap().background, to_hex("#030303"));
        assert_eq!(sample.footer, None);
    }

    #[test]
    fn test_button_selector_superset() {
        let mut doc = SyntheticDocument::new();
        doc.append_to_body(button("button", "rgb(0, 85, 255)", "rgb(255, 255, 255)"));
        doc.append_to_body(
            button("input", "rgb(0, 85, 255)", "rgb(255, 255, 255)").attr("type", "submit"),
        );
        doc.append_to_body(
            button("a", "rgb(255, 0, 0)", "rgb(255, 255, 255)").class("my-btn-large"),
        );
        doc.append_to_body(button("span", "rgb(0, 128, 0)", "rgb(0, 0, 0)").attr("role", "button"));
        doc.append_to_body(button("section", "rgb(9, 9, 9)", "rgb(0, 0, 0)").class("cta"));
        // Not a button.
        doc.append_to_body(button("input", "rgb(7, 7, 7)", "rgb(0, 0, 0)").attr("type", "text"));

        let sample = ColorProbe.collect(&doc);
        assert_eq!(sample.buttons.total(), 5);
        assert_eq!(sample.buttons.len(), 4);
    }

    #[test]
    fn test_invalid_buttons_are_not_counted() {
        let mut doc = SyntheticDocument::new();
        doc.append_to_body(button("button", "rgb(255, 255, 255)", "rgb(0, 0, 0)"));
        doc.append_to_body(button("button", "rgba(0, 0, 0, 0)", "rgb(255, 255, 255)"));
        doc.append_to_body(button("button", "#000", "rgb(0, 0, 0)"));

        let sample = ColorProbe.collect(&doc);
        assert!(sample.buttons.is_empty());
    }

    #[test]
    fn test_missing_body() {
        let sample = ColorProbe.collect(&SyntheticDocument::without_body());
        assert_eq!(sample, ColorSample::default());
    }
}

use swatch_dispatch::{StyledDocument, TypedProbe};
use swatch_tokens::{ThemeReading, DARK_CLASSES};

/// Reads the evidence the theme classifier uses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThemeProbe;

impl TypedProbe for ThemeProbe {
    type Output = ThemeReading;
    const NAME: &'static str = "theme";

    fn collect(&self, document: &dyn StyledDocument) -> ThemeReading {
        let body = document.body();
        let root = document.root();
        let style = |element: Option<usize>, property: &str| {
            element.and_then(|el| document.computed_style(el, property))
        };

        let has_dark_class = [body, root].into_iter().flatten().any(|el| {
            DARK_CLASSES
                .iter()
                .any(|class| document.has_class(el, class))
        });

        ThemeReading {
            body_background: style(body, "background-color"),
            root_background: style(root, "background-color"),
            text_color: style(body, "color"),
            has_dark_class,
            color_scheme: style(root, "color-scheme"),
            prefers_dark: document.matches_media("(prefers-color-scheme: dark)"),
        }
    }
}

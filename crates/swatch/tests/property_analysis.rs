use proptest::prelude::*;
use swatch::{ColorMode, ExportFormat, Swatch, SwatchConfig};
use swatch_test::{Element, SyntheticDocument, SyntheticProvider};

const URL: &str = "https://prop.example.test/";

fn page() -> SyntheticDocument {
    SyntheticDocument::new()
}

fn rgb(c: (u8, u8, u8)) -> String {
    format!("rgb({}, {}, {})", c.0, c.1, c.2)
}

fn channel_strategy() -> impl Strategy<Value = (u8, u8, u8)> {
    (any::<u8>(), any::<u8>(), any::<u8>())
}

fn format_strategy() -> impl Strategy<Value = ExportFormat> {
    prop_oneof![
        Just(ExportFormat::Json),
        Just(ExportFormat::Yaml),
        Just(ExportFormat::Csv),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_theme_follows_background_luma(color in channel_strategy()) {
        let mut doc = page();
        let body = doc.body_id().unwrap();
        doc.set_style(body, "background-color", &rgb(color));
        let mut swatch = Swatch::new(SyntheticProvider::new().route(URL, doc));

        let (r, g, b) = (color.0 as f64, color.1 as f64, color.2 as f64);
        let luma = (r * 299.0 + g * 587.0 + b * 114.0) / 1000.0;
        let expected = if luma < 128.0 { ColorMode::Dark } else { ColorMode::Light };
        prop_assert_eq!(swatch.detect_theme(URL).unwrap(), expected);
    }

    #[test]
    fn test_button_rankings_are_bounded(
        buttons in prop::collection::vec((channel_strategy(), channel_strategy()), 0..12)
    ) {
        let mut doc = page();
        for (bg, fg) in &buttons {
            doc.append_to_body(
                Element::new("button")
                    .style("background-color", &rgb(*bg))
                    .style("color", &rgb(*fg)),
            );
        }
        let mut swatch = Swatch::new(SyntheticProvider::new().route(URL, doc));
        let colors = swatch.get_colors(Some(URL)).unwrap();

        let scores: Vec<usize> = colors.elements.button.iter().map(|b| b.score).collect();
        prop_assert!(!scores.is_empty() && scores.len() <= 3);
        prop_assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        prop_assert!(scores.iter().sum::<usize>() <= buttons.len());
        prop_assert_eq!(swatch.provider().log().open_pages(), 0);
    }

    #[test]
    fn test_reports_export_in_every_format(
        background in channel_strategy(),
        format in format_strategy(),
    ) {
        let mut doc = page();
        let body = doc.body_id().unwrap();
        doc.set_style(body, "background-color", &rgb(background));
        doc.append_to_body(Element::new("p").style("font-family", "Inter").text("Body"));

        let config = SwatchConfig { format, ..Default::default() };
        let mut swatch = Swatch::with_config(SyntheticProvider::new().route(URL, doc), config);
        let report = swatch.report(URL).unwrap();
        prop_assert!(report.contains(URL));
    }
}

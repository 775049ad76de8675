//! Caret locator and popup anchoring tests

mod common;

use common::*;
use tagline::caret::{
    CaretLocator, GlyphMetrics, LocateError, MirrorLocator, MonospaceMetrics, Point, Rect,
};
use tagline::config::CaretConfig;
use tagline::Composer;

/// Narrow glyphs for `i`, wide for everything else
struct Proportional;

impl GlyphMetrics for Proportional {
    fn advance(&self, ch: char) -> f32 {
        if ch == 'i' {
            4.0
        } else {
            10.0
        }
    }

    fn line_height(&self) -> f32 {
        18.0
    }
}

fn field() -> Rect {
    Rect::new(40.0, 100.0, 100.0, 60.0)
}

#[test]
fn test_position_is_relative_to_field() {
    let locator = MirrorLocator::new(MonospaceMetrics::new(10.0, 20.0));
    assert_eq!(locator.locate("abc", 0, &field()).unwrap(), Point::new(40.0, 100.0));
    assert_eq!(locator.locate("abc", 3, &field()).unwrap(), Point::new(70.0, 100.0));
}

#[test]
fn test_proportional_advances() {
    let locator = MirrorLocator::new(Proportional);
    let p = locator.locate("iiab", 4, &field()).unwrap();
    assert_eq!(p, Point::new(68.0, 100.0));
}

#[test]
fn test_wrapping_changes_with_width() {
    let locator = MirrorLocator::new(MonospaceMetrics::new(10.0, 20.0));
    let text = "one two three";
    let wide = locator
        .locate(text, 13, &Rect::new(0.0, 0.0, 200.0, 20.0))
        .unwrap();
    let narrow = locator
        .locate(text, 13, &Rect::new(0.0, 0.0, 80.0, 20.0))
        .unwrap();
    assert_eq!(wide, Point::new(130.0, 0.0));
    assert_eq!(narrow, Point::new(50.0, 20.0));
}

#[test]
fn test_measurement_failures() {
    let locator = MirrorLocator::new(MonospaceMetrics::new(10.0, 20.0));
    assert!(matches!(
        locator.locate("abc", 1, &Rect::new(0.0, 0.0, -5.0, 0.0)),
        Err(LocateError::NoLayoutWidth { .. })
    ));
    assert!(matches!(
        locator.locate("abc", 4, &field()),
        Err(LocateError::CaretOutOfRange { caret: 4, len: 3 })
    ));
}

#[test]
fn test_popup_anchor_follows_caret_and_layout() {
    let locator = MirrorLocator::new(MonospaceMetrics::new(10.0, 20.0));
    let mut composer = Composer::default();
    composer.on_text_change("go @ma", 6);
    populate(&mut composer, vec![mention("u", "Mara")]);

    let wide = composer.popup_anchor(&locator, &Rect::new(0.0, 0.0, 200.0, 40.0));
    assert_eq!(wide, Some(Point::new(60.0, 20.0)));

    // Narrow field: "@ma" wraps to the second line
    let narrow = composer.popup_anchor(&locator, &Rect::new(0.0, 0.0, 50.0, 40.0));
    assert_eq!(narrow, Some(Point::new(30.0, 40.0)));
}

#[test]
fn test_no_anchor_without_popup() {
    let locator = MirrorLocator::new(MonospaceMetrics::new(10.0, 20.0));
    let (composer, _) = composer_with("go @ma", 6);
    assert_eq!(composer.popup_anchor(&locator, &field()), None);
}

#[test]
fn test_configured_locator() {
    let caret = CaretConfig {
        font_size: 10.0,
        line_height: Some(24.0),
        padding_x: 5.0,
        padding_y: 3.0,
        ..CaretConfig::default()
    };
    let locator = caret.locator();
    let p = locator.locate("ab\ncd", 4, &Rect::new(0.0, 0.0, 110.0, 60.0)).unwrap();
    assert!((p.x - 11.0).abs() < 1e-4);
    assert!((p.y - 27.0).abs() < 1e-4);
    assert_eq!(locator.line_height(), 24.0);
}

//! Mirror-layout caret locator.

use super::metrics::GlyphMetrics;
use super::{CaretLocator, LocateError, Point, Rect};

/// Default tab width in spaces
pub const TABULATOR_WIDTH: usize = 4;

/// Locates the caret by wrapping `value[..caret]` the way the live field
/// does (pre-wrap, break long words) and reading the end of the layout.
#[derive(Debug, Clone)]
pub struct MirrorLocator<M: GlyphMetrics> {
    metrics: M,
    padding_x: f32,
    padding_y: f32,
    tab_width: usize,
    line_height: Option<f32>,
}

/// Pen position at the end of a layout
#[derive(Debug, Clone, Copy, PartialEq)]
struct LayoutEnd {
    x: f32,
    line: usize,
}

impl<M: GlyphMetrics> MirrorLocator<M> {
    pub fn new(metrics: M) -> Self {
        Self {
            metrics,
            padding_x: 0.0,
            padding_y: 0.0,
            tab_width: TABULATOR_WIDTH,
            line_height: None,
        }
    }

    /// Inner padding of the field (builder pattern)
    pub fn with_padding(mut self, x: f32, y: f32) -> Self {
        self.padding_x = x;
        self.padding_y = y;
        self
    }

    /// Tab width in spaces (builder pattern)
    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width.max(1);
        self
    }

    /// CSS-style line height override (builder pattern)
    pub fn with_line_height(mut self, line_height: f32) -> Self {
        self.line_height = Some(line_height);
        self
    }

    fn advance_at(&self, ch: char, x: f32) -> f32 {
        if ch == '\t' {
            let stop = self.metrics.advance(' ') * self.tab_width as f32;
            if stop <= 0.0 {
                return 0.0;
            }
            ((x / stop).floor() + 1.0) * stop - x
        } else {
            self.metrics.advance(ch)
        }
    }

    /// Lay out `text` into lines no wider than `width`.
    ///
    /// Words move to the next line when they do not fit; a word wider than
    /// a whole line breaks between characters. Whitespace hangs at the end
    /// of a line instead of wrapping, as `white-space: pre-wrap` does.
    fn layout(&self, text: &str, width: f32) -> LayoutEnd {
        let mut end = LayoutEnd { x: 0.0, line: 0 };

        for (i, hard_line) in text.split('\n').enumerate() {
            if i > 0 {
                end.line += 1;
                end.x = 0.0;
            }

            for run in split_runs(hard_line) {
                if run.starts_with(char::is_whitespace) {
                    for ch in run.chars() {
                        end.x += self.advance_at(ch, end.x);
                    }
                    continue;
                }

                let run_width: f32 = run.chars().map(|ch| self.metrics.advance(ch)).sum();
                if end.x > 0.0 && end.x + run_width > width {
                    end.line += 1;
                    end.x = 0.0;
                }

                if run_width <= width {
                    end.x += run_width;
                    continue;
                }

                for ch in run.chars() {
                    let advance = self.metrics.advance(ch);
                    if end.x > 0.0 && end.x + advance > width {
                        end.line += 1;
                        end.x = 0.0;
                    }
                    end.x += advance;
                }
            }
        }

        end
    }
}

impl<M: GlyphMetrics> CaretLocator for MirrorLocator<M> {
    fn locate(&self, value: &str, caret: usize, bounds: &Rect) -> Result<Point, LocateError> {
        let width = bounds.width - 2.0 * self.padding_x;
        if width <= 0.0 || !width.is_finite() {
            return Err(LocateError::NoLayoutWidth { width });
        }

        let len = value.chars().count();
        if caret > len {
            return Err(LocateError::CaretOutOfRange { caret, len });
        }

        let prefix: String = value.chars().take(caret).collect();
        let end = self.layout(&prefix, width);

        Ok(Point {
            x: bounds.x + self.padding_x + end.x.min(width),
            y: bounds.y + self.padding_y + end.line as f32 * self.line_height(),
        })
    }

    fn line_height(&self) -> f32 {
        self.line_height.unwrap_or_else(|| self.metrics.line_height())
    }
}

/// Split a line into alternating whitespace / non-whitespace runs
fn split_runs(line: &str) -> Vec<&str> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;

    for (i, ch) in line.char_indices() {
        let is_space = ch.is_whitespace();
        match in_space {
            Some(prev) if prev != is_space => {
                runs.push(&line[start..i]);
                start = i;
            }
            _ => {}
        }
        in_space = Some(is_space);
    }
    if start < line.len() {
        runs.push(&line[start..]);
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caret::MonospaceMetrics;

    fn locator() -> MirrorLocator<MonospaceMetrics> {
        MirrorLocator::new(MonospaceMetrics::new(10.0, 20.0))
    }

    #[test]
    fn test_split_runs() {
        assert_eq!(split_runs("ab  cd"), vec!["ab", "  ", "cd"]);
        assert_eq!(split_runs(" a"), vec![" ", "a"]);
        assert!(split_runs("").is_empty());
    }

    #[test]
    fn test_single_line_offset() {
        let bounds = Rect::new(100.0, 50.0, 200.0, 40.0);
        let p = locator().locate("Hello @Jan", 10, &bounds).unwrap();
        assert_eq!(p, Point::new(200.0, 50.0));
    }

    #[test]
    fn test_word_wraps_to_next_line() {
        // 10 chars per line; "hello " fits, "world" would end at 11
        let bounds = Rect::new(0.0, 0.0, 100.0, 40.0);
        let p = locator().locate("hello world", 11, &bounds).unwrap();
        assert_eq!(p, Point::new(50.0, 20.0));
    }

    #[test]
    fn test_long_word_breaks() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 40.0);
        let p = locator().locate("abcdefghijklm", 13, &bounds).unwrap();
        assert_eq!(p, Point::new(30.0, 20.0));
    }

    #[test]
    fn test_hard_newline() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 40.0);
        let p = locator().locate("ab\ncd", 5, &bounds).unwrap();
        assert_eq!(p, Point::new(20.0, 20.0));
    }

    #[test]
    fn test_padding_and_line_height_override() {
        let loc = locator().with_padding(4.0, 2.0).with_line_height(24.0);
        let bounds = Rect::new(0.0, 0.0, 108.0, 40.0);
        let p = loc.locate("ab\nc", 4, &bounds).unwrap();
        assert_eq!(p, Point::new(14.0, 26.0));
        assert_eq!(loc.line_height(), 24.0);
    }

    #[test]
    fn test_tab_advances_to_stop() {
        let bounds = Rect::new(0.0, 0.0, 400.0, 40.0);
        let p = locator().locate("a\tb", 2, &bounds).unwrap();
        assert_eq!(p.x, 40.0);
    }

    #[test]
    fn test_zero_width_fails() {
        let err = locator()
            .locate("abc", 1, &Rect::new(0.0, 0.0, 0.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, LocateError::NoLayoutWidth { .. }));
    }

    #[test]
    fn test_caret_out_of_range_fails() {
        let err = locator()
            .locate("abc", 9, &Rect::new(0.0, 0.0, 100.0, 20.0))
            .unwrap_err();
        assert_eq!(err, LocateError::CaretOutOfRange { caret: 9, len: 3 });
    }
}

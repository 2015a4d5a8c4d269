//! Greedy word wrap with shrink-to-fit font sizing
//!
//! Pure given a [`TextMeasure`] implementation: the same text, box and
//! measurer always produce the same [`FittedText`].

use serde::{Deserialize, Serialize};

use crate::consts::{
    FONT_SIZE_FLOOR, FONT_SIZE_MAX, FONT_SIZE_START_MIN, FONT_SIZE_WIDTH_RATIO, LINE_HEIGHT_RATIO,
    MAX_LINES,
};

/// Font family and weight; the size is chosen by the fitter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub weight: u16,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, weight: u16) -> Self {
        Self {
            family: family.into(),
            weight,
        }
    }

    /// CSS font shorthand, e.g. `900 14px system-ui`
    pub fn css(&self, size: u32) -> String {
        format!("{} {}px {}", self.weight, size, self.family)
    }
}

/// Text measurement capability (canvas `measureText` on the web)
pub trait TextMeasure {
    /// Rendered width of `text` in px. Unmeasurable text should report
    /// `f32::INFINITY` so the fitter degrades to the floor size.
    fn measure_width(&self, text: &str, font: &FontSpec, size: u32) -> f32;
}

/// Fixed-advance approximation: every char is `size * advance` px wide.
///
/// Used for headless runs and tests where no canvas is available.
#[derive(Debug, Clone, Copy)]
pub struct ApproxMeasure {
    pub advance: f32,
}

impl Default for ApproxMeasure {
    fn default() -> Self {
        // Heavy sans-serif averages a little over half an em per glyph
        Self { advance: 0.58 }
    }
}

impl TextMeasure for ApproxMeasure {
    fn measure_width(&self, text: &str, _font: &FontSpec, size: u32) -> f32 {
        text.chars().count() as f32 * size as f32 * self.advance
    }
}

/// Result of fitting text into a box. Computed once per sticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedText {
    pub size: u32,
    /// At most [`MAX_LINES`] lines, top to bottom
    pub lines: Vec<String>,
    pub line_height: u32,
    pub total_height: u32,
}

impl FittedText {
    fn new(size: u32, lines: Vec<String>) -> Self {
        let line_height = line_height_for(size);
        let total_height = line_height * lines.len() as u32;
        Self {
            size,
            lines,
            line_height,
            total_height,
        }
    }

    /// Y offset of the first line's middle, relative to the box center
    pub fn first_line_offset(&self) -> f32 {
        -(self.total_height as f32 / 2.0) + self.line_height as f32 / 2.0
    }
}

#[inline]
pub fn line_height_for(size: u32) -> u32 {
    (size as f32 * LINE_HEIGHT_RATIO).floor() as u32
}

/// First candidate size for a box of width `max_w`
#[inline]
pub fn start_size(max_w: f32) -> u32 {
    let scaled = (max_w * FONT_SIZE_WIDTH_RATIO).floor().max(0.0) as u32;
    scaled.clamp(FONT_SIZE_START_MIN, FONT_SIZE_MAX)
}

/// Greedy word wrap at one font size.
///
/// Explicit `\n` breaks are kept. A word is appended to the current line only
/// if the joined line still measures within `max_w`; a single word wider
/// than `max_w` occupies its own line. Output is capped at [`MAX_LINES`].
pub fn wrap_lines<M: TextMeasure + ?Sized>(
    measure: &M,
    text: &str,
    max_w: f32,
    font: &FontSpec,
    size: u32,
) -> Vec<String> {
    let mut out = Vec::new();

    for raw in text.split('\n') {
        let mut words = raw.split_whitespace();
        let Some(first) = words.next() else {
            out.push(String::new());
            continue;
        };

        let mut current = first.to_string();
        for word in words {
            let candidate = format!("{current} {word}");
            if measure.measure_width(&candidate, font, size) <= max_w {
                current = candidate;
            } else {
                out.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        out.push(current);
    }

    out.truncate(MAX_LINES);
    out
}

/// Pick the largest font size whose wrapped lines fit `max_w` x `max_h`.
///
/// Sizes are tried from [`start_size`] down to [`FONT_SIZE_FLOOR`]. If none
/// fits, the floor size is returned anyway and the text may overflow.
pub fn fit<M: TextMeasure + ?Sized>(
    measure: &M,
    text: &str,
    max_w: f32,
    max_h: f32,
    font: &FontSpec,
) -> FittedText {
    for size in (FONT_SIZE_FLOOR..=start_size(max_w)).rev() {
        let lines = wrap_lines(measure, text, max_w, font, size);
        let fits_width = lines
            .iter()
            .all(|line| measure.measure_width(line, font, size) <= max_w);
        let total = line_height_for(size) * lines.len() as u32;

        if fits_width && total as f32 <= max_h {
            return FittedText::new(size, lines);
        }
    }

    log::debug!("Text overflows {max_w}x{max_h} at floor size: {text:?}");
    let lines = wrap_lines(measure, text, max_w, font, FONT_SIZE_FLOOR);
    FittedText::new(FONT_SIZE_FLOOR, lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn font() -> FontSpec {
        FontSpec::new("system-ui", 900)
    }

    /// Unmeasurable text never fits
    struct Broken;

    impl TextMeasure for Broken {
        fn measure_width(&self, _text: &str, _font: &FontSpec, _size: u32) -> f32 {
            f32::INFINITY
        }
    }

    #[test]
    fn test_start_size_clamped() {
        assert_eq!(start_size(40.0), 10);
        assert_eq!(start_size(130.0), 15);
        assert_eq!(start_size(500.0), 18);
    }

    #[test]
    fn test_line_height() {
        assert_eq!(line_height_for(18), 19);
        assert_eq!(line_height_for(10), 11);
        assert_eq!(line_height_for(8), 8);
    }

    #[test]
    fn test_wrap_keeps_explicit_breaks() {
        let m = ApproxMeasure { advance: 0.5 };
        let lines = wrap_lines(&m, "\"Det føles\naggressivt.\"", 1000.0, &font(), 10);
        assert_eq!(lines, vec!["\"Det føles", "aggressivt.\""]);
    }

    #[test]
    fn test_wrap_greedy_packing() {
        // 10px font, 0.5 advance: 5px per char, 40px = 8 chars
        let m = ApproxMeasure { advance: 0.5 };
        let lines = wrap_lines(&m, "aa bb cc dd ee", 40.0, &font(), 10);
        assert_eq!(lines, vec!["aa bb cc", "dd ee"]);
    }

    #[test]
    fn test_wrap_caps_at_four_lines() {
        let m = ApproxMeasure { advance: 0.5 };
        let lines = wrap_lines(&m, "one two three four five six", 10.0, &font(), 10);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "one");
        assert_eq!(lines[3], "four");
    }

    #[test]
    fn test_empty_text_gives_one_empty_line() {
        let m = ApproxMeasure::default();
        let fitted = fit(&m, "", 100.0, 60.0, &font());
        assert_eq!(fitted.lines, vec![String::new()]);
        assert_eq!(fitted.size, start_size(100.0));
    }

    #[test]
    fn test_fit_shrinks_until_it_fits() {
        let m = ApproxMeasure { advance: 0.5 };
        // Two lines at the start size are too tall for 30px
        let fitted = fit(&m, "Hvorfor er det\nstadig tilladt?", 150.0, 30.0, &font());
        assert!(fitted.size < 18);
        assert!(fitted.total_height as f32 <= 30.0);
        for line in &fitted.lines {
            assert!(m.measure_width(line, &font(), fitted.size) <= 150.0);
        }
    }

    #[test]
    fn test_unmeasurable_text_falls_back_to_floor() {
        let fitted = fit(&Broken, "Ingen tager\nhensyn.", 120.0, 80.0, &font());
        assert_eq!(fitted.size, FONT_SIZE_FLOOR);
        // Nothing measures, so every word lands on its own line
        assert_eq!(fitted.lines, vec!["Ingen", "tager", "hensyn."]);
        assert_eq!(fitted.line_height, line_height_for(FONT_SIZE_FLOOR));
    }

    #[test]
    fn test_first_line_offset_centers_block() {
        let fitted = FittedText::new(10, vec!["a".into(), "b".into()]);
        // Two 11px lines: block spans -11..11, first line middle at -5.5
        assert!((fitted.first_line_offset() + 5.5).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_fit_respects_box(
            text in "[a-zA-Zæøå\"?.]{1,12}( [a-zA-Zæøå\"?.]{1,12}){0,8}(\n[a-z ]{0,24})?",
            max_w in 30.0f32..260.0,
            max_h in 20.0f32..140.0,
        ) {
            let m = ApproxMeasure::default();
            let fitted = fit(&m, &text, max_w, max_h, &font());

            prop_assert!(fitted.lines.len() <= MAX_LINES);
            prop_assert!(fitted.size >= FONT_SIZE_FLOOR);
            prop_assert!(fitted.size <= start_size(max_w));
            prop_assert_eq!(fitted.total_height, fitted.line_height * fitted.lines.len() as u32);

            if fitted.size > FONT_SIZE_FLOOR {
                for line in &fitted.lines {
                    prop_assert!(m.measure_width(line, &font(), fitted.size) <= max_w);
                }
                prop_assert!(fitted.total_height as f32 <= max_h);
            }
        }
    }
}

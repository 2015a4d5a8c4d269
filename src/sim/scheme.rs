//! Weighted color scheme selection
//!
//! Schemes are drawn from a fixed `(weight, variant)` table by cumulative
//! lookup. Whether the inner line is rendered is a separate, independent draw.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::INNER_LINE_CHANCE;

/// Named palette entries; hex values live in [`crate::Palette`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaletteColor {
    Orange,
    Pink,
    Blue,
    Black,
}

/// Fill/text/line colors of one sticker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub fill: PaletteColor,
    pub text: PaletteColor,
    pub inner: Option<PaletteColor>,
    pub outer: Option<PaletteColor>,
}

/// The five fixed scheme variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemeVariant {
    /// Pink fill, black text and line
    Pink,
    /// Orange fill, black text and line
    Orange,
    /// Black fill, pink text and line
    BlackPink,
    /// Black fill, orange text and line
    BlackOrange,
    /// Black fill, orange text and line, blue outer rim
    BlackOrangeRimmed,
}

impl SchemeVariant {
    pub const ALL: [SchemeVariant; 5] = [
        SchemeVariant::Pink,
        SchemeVariant::Orange,
        SchemeVariant::BlackPink,
        SchemeVariant::BlackOrange,
        SchemeVariant::BlackOrangeRimmed,
    ];

    pub fn scheme(self) -> ColorScheme {
        use PaletteColor::*;
        let (fill, text, outer) = match self {
            SchemeVariant::Pink => (Pink, Black, None),
            SchemeVariant::Orange => (Orange, Black, None),
            SchemeVariant::BlackPink => (Black, Pink, None),
            SchemeVariant::BlackOrange => (Black, Orange, None),
            SchemeVariant::BlackOrangeRimmed => (Black, Orange, Some(Blue)),
        };
        // The inner line always matches the text color
        ColorScheme {
            fill,
            text,
            inner: Some(text),
            outer,
        }
    }
}

/// Draw probabilities; weights sum to 1
pub const SCHEME_TABLE: [(f64, SchemeVariant); 5] = [
    (0.28, SchemeVariant::Pink),
    (0.28, SchemeVariant::Orange),
    (0.22, SchemeVariant::BlackPink),
    (0.14, SchemeVariant::BlackOrange),
    (0.08, SchemeVariant::BlackOrangeRimmed),
];

/// Map a uniform draw `r` in [0, 1) to a variant
pub fn variant_for_draw(r: f64) -> SchemeVariant {
    let mut cumulative = 0.0;
    for (weight, variant) in SCHEME_TABLE {
        cumulative += weight;
        if r < cumulative {
            return variant;
        }
    }
    SCHEME_TABLE[SCHEME_TABLE.len() - 1].1
}

pub fn pick_variant<R: Rng>(rng: &mut R) -> SchemeVariant {
    variant_for_draw(rng.random::<f64>())
}

/// One uniform draw mapped through [`SCHEME_TABLE`]
pub fn pick_scheme<R: Rng>(rng: &mut R) -> ColorScheme {
    pick_variant(rng).scheme()
}

/// Independent draw deciding whether the inner line is rendered
pub fn draw_inner_line<R: Rng>(rng: &mut R) -> bool {
    rng.random_bool(INNER_LINE_CHANCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_weights_sum_to_one() {
        let total: f64 = SCHEME_TABLE.iter().map(|(w, _)| w).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_draw_ranges() {
        assert_eq!(variant_for_draw(0.0), SchemeVariant::Pink);
        assert_eq!(variant_for_draw(0.279), SchemeVariant::Pink);
        assert_eq!(variant_for_draw(0.281), SchemeVariant::Orange);
        assert_eq!(variant_for_draw(0.559), SchemeVariant::Orange);
        assert_eq!(variant_for_draw(0.561), SchemeVariant::BlackPink);
        assert_eq!(variant_for_draw(0.779), SchemeVariant::BlackPink);
        assert_eq!(variant_for_draw(0.781), SchemeVariant::BlackOrange);
        assert_eq!(variant_for_draw(0.919), SchemeVariant::BlackOrange);
        assert_eq!(variant_for_draw(0.921), SchemeVariant::BlackOrangeRimmed);
        assert_eq!(variant_for_draw(0.99999), SchemeVariant::BlackOrangeRimmed);
    }

    #[test]
    fn test_scheme_colors() {
        let rimmed = SchemeVariant::BlackOrangeRimmed.scheme();
        assert_eq!(rimmed.fill, PaletteColor::Black);
        assert_eq!(rimmed.text, PaletteColor::Orange);
        assert_eq!(rimmed.inner, Some(PaletteColor::Orange));
        assert_eq!(rimmed.outer, Some(PaletteColor::Blue));

        let pink = SchemeVariant::Pink.scheme();
        assert_eq!(pink.inner, Some(PaletteColor::Black));
        assert_eq!(pink.outer, None);
    }

    #[test]
    fn test_distribution_chi_squared() {
        const DRAWS: usize = 10_000;
        let mut rng = Pcg32::seed_from_u64(0x5eed);
        let mut counts = [0usize; 5];
        for _ in 0..DRAWS {
            let v = pick_variant(&mut rng);
            let idx = SchemeVariant::ALL.iter().position(|x| *x == v).unwrap();
            counts[idx] += 1;
        }

        let chi2: f64 = SCHEME_TABLE
            .iter()
            .zip(counts)
            .map(|((w, _), observed)| {
                let expected = w * DRAWS as f64;
                (observed as f64 - expected).powi(2) / expected
            })
            .sum();

        // 4 degrees of freedom, p = 0.001
        assert!(chi2 < 18.47, "chi² = {chi2}, counts = {counts:?}");
    }

    #[test]
    fn test_inner_line_rate() {
        let mut rng = Pcg32::seed_from_u64(7);
        let hits = (0..10_000).filter(|_| draw_inner_line(&mut rng)).count();
        assert!((5_200..5_800).contains(&hits), "hits = {hits}");
    }
}

//! Minimal stroke font for numeric labels.
//!
//! Glyphs live on a grid 14 units wide and 21 units tall with y pointing
//! down, so one unit maps to `font_scale` pixels.

pub const GLYPH_WIDTH: f64 = 14.0;
pub const GLYPH_HEIGHT: f64 = 21.0;
/// Horizontal distance between glyph origins
pub const GLYPH_ADVANCE: f64 = 18.0;

type Stroke = &'static [(f64, f64)];

const ZERO: &[Stroke] = &[&[
    (4.0, 0.0),
    (10.0, 0.0),
    (14.0, 4.0),
    (14.0, 17.0),
    (10.0, 21.0),
    (4.0, 21.0),
    (0.0, 17.0),
    (0.0, 4.0),
    (4.0, 0.0),
]];
const ONE: &[Stroke] = &[&[(3.0, 4.0), (8.0, 0.0), (8.0, 21.0)]];
const TWO: &[Stroke] = &[&[
    (0.0, 4.0),
    (4.0, 0.0),
    (10.0, 0.0),
    (14.0, 4.0),
    (14.0, 8.0),
    (0.0, 21.0),
    (14.0, 21.0),
]];
const THREE: &[Stroke] = &[&[
    (0.0, 0.0),
    (14.0, 0.0),
    (7.0, 8.0),
    (10.0, 8.0),
    (14.0, 12.0),
    (14.0, 17.0),
    (10.0, 21.0),
    (4.0, 21.0),
    (0.0, 17.0),
]];
const FOUR: &[Stroke] = &[&[(10.0, 21.0), (10.0, 0.0), (0.0, 14.0), (14.0, 14.0)]];
const FIVE: &[Stroke] = &[&[
    (14.0, 0.0),
    (1.0, 0.0),
    (0.0, 9.0),
    (4.0, 7.0),
    (10.0, 7.0),
    (14.0, 11.0),
    (14.0, 17.0),
    (10.0, 21.0),
    (4.0, 21.0),
    (0.0, 17.0),
]];
const SIX: &[Stroke] = &[&[
    (13.0, 3.0),
    (10.0, 0.0),
    (4.0, 0.0),
    (0.0, 4.0),
    (0.0, 17.0),
    (4.0, 21.0),
    (10.0, 21.0),
    (14.0, 17.0),
    (14.0, 12.0),
    (10.0, 8.0),
    (4.0, 8.0),
    (0.0, 12.0),
]];
const SEVEN: &[Stroke] = &[&[(0.0, 0.0), (14.0, 0.0), (4.0, 21.0)]];
const EIGHT: &[Stroke] = &[
    &[
        (4.0, 0.0),
        (10.0, 0.0),
        (13.0, 3.0),
        (13.0, 6.0),
        (10.0, 9.0),
        (4.0, 9.0),
        (1.0, 6.0),
        (1.0, 3.0),
        (4.0, 0.0),
    ],
    &[
        (4.0, 9.0),
        (10.0, 9.0),
        (14.0, 13.0),
        (14.0, 17.0),
        (10.0, 21.0),
        (4.0, 21.0),
        (0.0, 17.0),
        (0.0, 13.0),
        (4.0, 9.0),
    ],
];
const NINE: &[Stroke] = &[&[
    (14.0, 9.0),
    (10.0, 13.0),
    (4.0, 13.0),
    (0.0, 9.0),
    (0.0, 4.0),
    (4.0, 0.0),
    (10.0, 0.0),
    (14.0, 4.0),
    (14.0, 17.0),
    (10.0, 21.0),
    (4.0, 21.0),
    (1.0, 18.0),
]];

/// Polylines for a decimal digit; `None` for anything else
pub fn glyph(c: char) -> Option<&'static [Stroke]> {
    let strokes = match c {
        '0' => ZERO,
        '1' => ONE,
        '2' => TWO,
        '3' => THREE,
        '4' => FOUR,
        '5' => FIVE,
        '6' => SIX,
        '7' => SEVEN,
        '8' => EIGHT,
        '9' => NINE,
        _ => return None,
    };
    Some(strokes)
}

/// Width and height in glyph units of a rendered string
pub fn text_extent(text: &str) -> (f64, f64) {
    let n = text.chars().count();
    if n == 0 {
        return (0.0, 0.0);
    }
    ((n - 1) as f64 * GLYPH_ADVANCE + GLYPH_WIDTH, GLYPH_HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_digit_has_a_glyph() {
        for c in '0'..='9' {
            let strokes = glyph(c).unwrap();
            assert!(strokes.iter().all(|s| s.len() >= 2));
        }
        assert!(glyph('x').is_none());
    }

    #[test]
    fn glyphs_stay_inside_cell() {
        for c in '0'..='9' {
            for stroke in glyph(c).unwrap() {
                for &(x, y) in stroke.iter() {
                    assert!((0.0..=GLYPH_WIDTH).contains(&x));
                    assert!((0.0..=GLYPH_HEIGHT).contains(&y));
                }
            }
        }
    }

    #[test]
    fn extent_grows_by_advance() {
        assert_eq!(text_extent("7"), (14.0, 21.0));
        assert_eq!(text_extent("12"), (32.0, 21.0));
        assert_eq!(text_extent(""), (0.0, 0.0));
    }
}

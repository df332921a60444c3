//! Attribute value grammars: lengths, viewBox, point lists and transform lists.

use std::f32::consts::PI;

use radsvg_canvas::{Point, Rect, Transform};

use crate::scanner::{parse_number_list, Scanner};

// ==================== SVG Length ====================

/// Font size used to resolve `em` units.
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// SVG length value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SvgLength {
    /// User units (no unit specified).
    User(f32),
    Px(f32),
    Pt(f32),
    Pc(f32),
    Mm(f32),
    Cm(f32),
    In(f32),
    Em(f32),
    Percent(f32),
}

impl SvgLength {
    /// Parse length string.
    pub fn parse(s: &str) -> Option<Self> {
        let mut scanner = Scanner::new(s.trim());
        let value = scanner.number()?;
        let unit = std::str::from_utf8(scanner.rest()).ok()?.trim();

        let length = match unit {
            "" => SvgLength::User(value),
            "px" => SvgLength::Px(value),
            "pt" => SvgLength::Pt(value),
            "pc" => SvgLength::Pc(value),
            "mm" => SvgLength::Mm(value),
            "cm" => SvgLength::Cm(value),
            "in" => SvgLength::In(value),
            "em" => SvgLength::Em(value),
            "%" => SvgLength::Percent(value),
            _ => return None,
        };
        Some(length)
    }

    /// Convert to user units at 96 dpi. Percentages resolve against `percent_base`.
    pub fn to_px(&self, percent_base: f32) -> f32 {
        match *self {
            SvgLength::User(v) | SvgLength::Px(v) => v,
            SvgLength::Pt(v) => v * 4.0 / 3.0,
            SvgLength::Pc(v) => v * 16.0,
            SvgLength::Mm(v) => v * 96.0 / 25.4,
            SvgLength::Cm(v) => v * 96.0 / 2.54,
            SvgLength::In(v) => v * 96.0,
            SvgLength::Em(v) => v * DEFAULT_FONT_SIZE,
            SvgLength::Percent(p) => percent_base * p / 100.0,
        }
    }

    pub fn is_percent(&self) -> bool {
        matches!(self, SvgLength::Percent(_))
    }
}

// ==================== ViewBox ====================

/// Why a viewBox value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewBoxError {
    NotNumeric,
    WrongCount,
    Negative,
}

/// Parse a `viewBox` attribute: four numbers, non-negative width and height.
pub fn parse_view_box(s: &str) -> Result<Rect, ViewBoxError> {
    let numbers = parse_number_list(s).ok_or(ViewBoxError::NotNumeric)?;
    let &[min_x, min_y, width, height] = numbers.as_slice() else {
        return Err(ViewBoxError::WrongCount);
    };
    if width < 0.0 || height < 0.0 {
        return Err(ViewBoxError::Negative);
    }
    Ok(Rect::new(min_x, min_y, width, height))
}

// ==================== Points ====================

/// Parse a polyline/polygon `points` list. The flag is false when a trailing odd
/// coordinate was dropped.
pub fn parse_points(s: &str) -> (Vec<Point>, bool) {
    // Like path data, keep everything up to the first bad token.
    let mut scanner = Scanner::new(s);
    let mut numbers = Vec::new();
    while let Some(n) = scanner.number() {
        numbers.push(n);
    }
    let well_formed = numbers.len() % 2 == 0 && scanner.at_end();

    let points = numbers
        .chunks_exact(2)
        .map(|c| Point::new(c[0], c[1]))
        .collect();
    (points, well_formed)
}

// ==================== Transform ====================

/// Parse an SVG `transform` list such as `translate(10 20) rotate(45)`.
pub fn parse_transform(s: &str) -> Option<Transform> {
    let mut result = Transform::identity();
    let mut scanner = Scanner::new(s);

    loop {
        scanner.skip_separators();
        if scanner.at_end() {
            return Some(result);
        }

        let name_start = scanner.position();
        while scanner.peek().is_some_and(|b| b.is_ascii_alphabetic()) {
            scanner.bump();
        }
        let name = s.get(name_start..scanner.position())?;

        scanner.skip_whitespace();
        if scanner.peek() != Some(b'(') {
            return None;
        }
        scanner.bump();

        let mut args = Vec::with_capacity(6);
        while let Some(n) = scanner.number() {
            args.push(n);
        }
        scanner.skip_whitespace();
        if scanner.peek() != Some(b')') {
            return None;
        }
        scanner.bump();

        result = result.multiply(&transform_function(name, &args)?);
    }
}

fn transform_function(name: &str, args: &[f32]) -> Option<Transform> {
    let deg = |a: f32| a * PI / 180.0;
    let t = match (name, args) {
        ("matrix", &[a, b, c, d, e, f]) => Transform::from_row(a, b, c, d, e, f),
        ("translate", &[tx]) => Transform::translate(tx, 0.0),
        ("translate", &[tx, ty]) => Transform::translate(tx, ty),
        ("scale", &[s]) => Transform::scale(s, s),
        ("scale", &[sx, sy]) => Transform::scale(sx, sy),
        ("rotate", &[a]) => Transform::rotate(deg(a)),
        ("rotate", &[a, cx, cy]) => Transform::translate(cx, cy)
            .multiply(&Transform::rotate(deg(a)))
            .multiply(&Transform::translate(-cx, -cy)),
        ("skewX", &[a]) => Transform::skew_x(deg(a)),
        ("skewY", &[a]) => Transform::skew_y(deg(a)),
        _ => return None,
    };
    Some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_length_parse() {
        assert_eq!(SvgLength::parse("100"), Some(SvgLength::User(100.0)));
        assert_eq!(SvgLength::parse("50px"), Some(SvgLength::Px(50.0)));
        assert_eq!(SvgLength::parse("50%"), Some(SvgLength::Percent(50.0)));
        assert_eq!(SvgLength::parse("1.5em"), Some(SvgLength::Em(1.5)));
        assert_eq!(SvgLength::parse("12furlongs"), None);
        assert_eq!(SvgLength::parse(""), None);
    }

    #[test]
    fn test_svg_length_to_px() {
        assert_eq!(SvgLength::In(1.0).to_px(0.0), 96.0);
        assert_eq!(SvgLength::Pt(3.0).to_px(0.0), 4.0);
        assert_eq!(SvgLength::Percent(50.0).to_px(300.0), 150.0);
    }

    #[test]
    fn test_viewbox_parse() {
        let vb = parse_view_box("0 0 100 50").unwrap();
        assert_eq!(vb, Rect::new(0.0, 0.0, 100.0, 50.0));

        let vb = parse_view_box("10,20,30,40").unwrap();
        assert_eq!((vb.x, vb.y), (10.0, 20.0));

        assert_eq!(parse_view_box("0 0 100"), Err(ViewBoxError::WrongCount));
        assert_eq!(parse_view_box("0 0 a b"), Err(ViewBoxError::NotNumeric));
        assert_eq!(parse_view_box("0 0 -1 10"), Err(ViewBoxError::Negative));
        assert!(parse_view_box("0 0 0 0").is_ok());
    }

    #[test]
    fn test_parse_points() {
        let (points, ok) = parse_points("10,20 30,40 50,60");
        assert!(ok);
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], Point::new(10.0, 20.0));
        assert_eq!(points[2], Point::new(50.0, 60.0));

        let (points, ok) = parse_points("1 2 3");
        assert!(!ok);
        assert_eq!(points, vec![Point::new(1.0, 2.0)]);
    }

    #[test]
    fn test_transform_parse() {
        let t = parse_transform("translate(10, 20)").unwrap();
        assert_eq!(t.apply(0.0, 0.0), (10.0, 20.0));

        let t = parse_transform("scale(2)").unwrap();
        assert_eq!(t.apply(5.0, 5.0), (10.0, 10.0));

        let t = parse_transform("translate(10) scale(2, 3)").unwrap();
        assert_eq!(t.apply(1.0, 1.0), (12.0, 3.0));

        let t = parse_transform("matrix(1 0 0 1 5 6)").unwrap();
        assert_eq!(t, Transform::translate(5.0, 6.0));
    }

    #[test]
    fn test_transform_rotate_about_center() {
        let t = parse_transform("rotate(90 10 10)").unwrap();
        let (x, y) = t.apply(20.0, 10.0);
        assert!((x - 10.0).abs() < 1e-4);
        assert!((y - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_transform_malformed() {
        assert!(parse_transform("translate(10").is_none());
        assert!(parse_transform("wobble(3)").is_none());
        assert!(parse_transform("scale(1 2 3)").is_none());
        assert_eq!(parse_transform("  "), Some(Transform::identity()));
    }
}

//! Path data (`d` attribute) parser.
//!
//! Produces absolute geometry: relative commands are resolved against the pen, H/V become
//! lines, S/T reflections are expanded and elliptical arcs are approximated with cubics.

use std::f32::consts::{FRAC_PI_2, PI};
use radsvg_canvas::{Path2D, Point};
use thiserror::Error;

use crate::scanner::Scanner;

/// Why a path data string was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathDataError {
    /// The first command is not a moveto.
    #[error("path data must begin with a moveto")]
    MissingMoveTo,
    /// A byte that is neither a command letter nor part of a number.
    #[error("unknown command '{found}' at offset {offset}")]
    UnknownCommand { offset: usize, found: char },
    /// A command ended before all its numeric arguments were read.
    #[error("missing argument for '{command}' at offset {offset}")]
    MissingArgument { offset: usize, command: char },
    /// An arc flag that is not `0` or `1`.
    #[error("invalid arc flag at offset {offset}")]
    InvalidFlag { offset: usize },
}

/// Control point kept for S/T reflection.
#[derive(Clone, Copy)]
enum LastControl {
    None,
    Cubic(Point),
    Quad(Point),
}

/// Parse SVG path data into an absolute path.
///
/// An empty or all-whitespace string yields an empty path.
pub fn parse_path_data(d: &str) -> Result<Path2D, PathDataError> {
    let mut scanner = Scanner::new(d);
    let mut path = Path2D::new();
    let mut command: Option<u8> = None;
    let mut last_control = LastControl::None;

    while !scanner.at_end() {
        let offset = scanner.position();
        let cmd = match scanner.peek() {
            Some(b) if b.is_ascii_alphabetic() => {
                scanner.bump();
                b
            }
            // Implicit repeat of the previous command; after a moveto it is a lineto.
            _ if scanner.at_number() => match command {
                Some(b'M') => b'L',
                Some(b'm') => b'l',
                Some(b'Z' | b'z') | None => {
                    return Err(if path.is_empty() {
                        PathDataError::MissingMoveTo
                    } else {
                        PathDataError::UnknownCommand {
                            offset,
                            found: char::from(scanner.peek().unwrap_or(b'?')),
                        }
                    })
                }
                Some(prev) => prev,
            },
            Some(b) => {
                return Err(PathDataError::UnknownCommand {
                    offset,
                    found: char::from(b),
                })
            }
            None => break,
        };

        if path.is_empty() && !matches!(cmd, b'M' | b'm') {
            return Err(PathDataError::MissingMoveTo);
        }

        last_control = apply_command(&mut scanner, &mut path, cmd, last_control)?;
        command = Some(cmd);
        scanner.skip_separators();
    }

    Ok(path)
}

fn apply_command(
    scanner: &mut Scanner<'_>,
    path: &mut Path2D,
    cmd: u8,
    last_control: LastControl,
) -> Result<LastControl, PathDataError> {
    let relative = cmd.is_ascii_lowercase();
    let pen = path.current_point();
    let (ox, oy) = if relative { (pen.x, pen.y) } else { (0.0, 0.0) };

    let mut num = || {
        let offset = scanner.position();
        scanner.number().ok_or(PathDataError::MissingArgument {
            offset,
            command: char::from(cmd),
        })
    };

    let next = match cmd.to_ascii_uppercase() {
        b'M' => {
            let (x, y) = (num()? + ox, num()? + oy);
            path.move_to(x, y);
            LastControl::None
        }
        b'L' => {
            let (x, y) = (num()? + ox, num()? + oy);
            path.line_to(x, y);
            LastControl::None
        }
        b'H' => {
            let x = num()? + ox;
            path.line_to(x, pen.y);
            LastControl::None
        }
        b'V' => {
            let y = num()? + oy;
            path.line_to(pen.x, y);
            LastControl::None
        }
        b'C' => {
            let (x1, y1) = (num()? + ox, num()? + oy);
            let (x2, y2) = (num()? + ox, num()? + oy);
            let (x, y) = (num()? + ox, num()? + oy);
            path.cubic_to(x1, y1, x2, y2, x, y);
            LastControl::Cubic(Point::new(x2, y2))
        }
        b'S' => {
            let c1 = match last_control {
                LastControl::Cubic(c) => reflect(c, pen),
                _ => pen,
            };
            let (x2, y2) = (num()? + ox, num()? + oy);
            let (x, y) = (num()? + ox, num()? + oy);
            path.cubic_to(c1.x, c1.y, x2, y2, x, y);
            LastControl::Cubic(Point::new(x2, y2))
        }
        b'Q' => {
            let (x1, y1) = (num()? + ox, num()? + oy);
            let (x, y) = (num()? + ox, num()? + oy);
            path.quad_to(x1, y1, x, y);
            LastControl::Quad(Point::new(x1, y1))
        }
        b'T' => {
            let c = match last_control {
                LastControl::Quad(c) => reflect(c, pen),
                _ => pen,
            };
            let (x, y) = (num()? + ox, num()? + oy);
            path.quad_to(c.x, c.y, x, y);
            LastControl::Quad(c)
        }
        b'A' => {
            let rx = num()?;
            let ry = num()?;
            let rotation = num()?;
            drop(num);
            let large_arc = read_flag(scanner)?;
            let sweep = read_flag(scanner)?;
            let offset = scanner.position();
            let missing = PathDataError::MissingArgument {
                offset,
                command: char::from(cmd),
            };
            let x = scanner.number().ok_or_else(|| missing.clone())? + ox;
            let y = scanner.number().ok_or(missing)? + oy;
            arc_to(path, pen, rx, ry, rotation, large_arc, sweep, Point::new(x, y));
            LastControl::None
        }
        b'Z' => {
            path.close();
            LastControl::None
        }
        _ => {
            return Err(PathDataError::UnknownCommand {
                offset: scanner.position().saturating_sub(1),
                found: char::from(cmd),
            })
        }
    };
    Ok(next)
}

fn read_flag(scanner: &mut Scanner<'_>) -> Result<bool, PathDataError> {
    scanner.skip_separators();
    let offset = scanner.position();
    scanner.flag().ok_or(PathDataError::InvalidFlag { offset })
}

fn reflect(control: Point, about: Point) -> Point {
    Point::new(2.0 * about.x - control.x, 2.0 * about.y - control.y)
}

// ==================== Arc Conversion ====================

/// Append an elliptical arc from `from` to `to` as cubic segments of at most 90 degrees.
#[allow(clippy::too_many_arguments)]
fn arc_to(
    path: &mut Path2D,
    from: Point,
    rx: f32,
    ry: f32,
    x_rotation_deg: f32,
    large_arc: bool,
    sweep: bool,
    to: Point,
) {
    if from == to {
        return;
    }
    let mut rx = rx.abs();
    let mut ry = ry.abs();
    if rx == 0.0 || ry == 0.0 {
        path.line_to(to.x, to.y);
        return;
    }

    let phi = x_rotation_deg * PI / 180.0;
    let (sin_phi, cos_phi) = phi.sin_cos();

    // Endpoint to center parameterization.
    let dx = (from.x - to.x) / 2.0;
    let dy = (from.y - to.y) / 2.0;
    let x1p = cos_phi * dx + sin_phi * dy;
    let y1p = -sin_phi * dx + cos_phi * dy;

    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        rx *= s;
        ry *= s;
    }

    let rx2 = rx * rx;
    let ry2 = ry * ry;
    let num = rx2 * ry2 - rx2 * y1p * y1p - ry2 * x1p * x1p;
    let den = rx2 * y1p * y1p + ry2 * x1p * x1p;
    let mut coef = if den == 0.0 { 0.0 } else { (num / den).max(0.0).sqrt() };
    if large_arc == sweep {
        coef = -coef;
    }
    let cxp = coef * rx * y1p / ry;
    let cyp = -coef * ry * x1p / rx;

    let cx = cos_phi * cxp - sin_phi * cyp + (from.x + to.x) / 2.0;
    let cy = sin_phi * cxp + cos_phi * cyp + (from.y + to.y) / 2.0;

    let theta1 = angle(1.0, 0.0, (x1p - cxp) / rx, (y1p - cyp) / ry);
    let mut delta = angle(
        (x1p - cxp) / rx,
        (y1p - cyp) / ry,
        (-x1p - cxp) / rx,
        (-y1p - cyp) / ry,
    );
    if !sweep && delta > 0.0 {
        delta -= 2.0 * PI;
    } else if sweep && delta < 0.0 {
        delta += 2.0 * PI;
    }

    let segments = (delta.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
    let step = delta / segments as f32;
    let k = 4.0 / 3.0 * (step / 4.0).tan();

    let map = |ux: f32, uy: f32| {
        let x = rx * ux;
        let y = ry * uy;
        Point::new(cos_phi * x - sin_phi * y + cx, sin_phi * x + cos_phi * y + cy)
    };

    let mut theta = theta1;
    for i in 0..segments {
        let (s1, c1) = theta.sin_cos();
        let (s2, c2) = (theta + step).sin_cos();
        let p1 = map(c1 - k * s1, s1 + k * c1);
        let p2 = map(c2 + k * s2, s2 - k * c2);
        // Land exactly on the requested endpoint.
        let end = if i + 1 == segments { to } else { map(c2, s2) };
        path.cubic_to(p1.x, p1.y, p2.x, p2.y, end.x, end.y);
        theta += step;
    }
}

fn angle(ux: f32, uy: f32, vx: f32, vy: f32) -> f32 {
    let cross = ux * vy - uy * vx;
    let dot = ux * vx + uy * vy;
    cross.atan2(dot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use radsvg_canvas::{PathCommand, Rect};

    fn commands(d: &str) -> Vec<PathCommand> {
        parse_path_data(d).unwrap().commands().to_vec()
    }

    #[test]
    fn test_absolute_and_relative() {
        assert_eq!(
            commands("M10 10 L20 10 l0 10 z"),
            vec![
                PathCommand::MoveTo(10.0, 10.0),
                PathCommand::LineTo(20.0, 10.0),
                PathCommand::LineTo(20.0, 20.0),
                PathCommand::Close,
            ]
        );
    }

    #[test]
    fn test_implicit_lineto_after_moveto() {
        assert_eq!(
            commands("m1 1 2 0 0 2"),
            vec![
                PathCommand::MoveTo(1.0, 1.0),
                PathCommand::LineTo(3.0, 1.0),
                PathCommand::LineTo(3.0, 3.0),
            ]
        );
    }

    #[test]
    fn test_horizontal_vertical() {
        assert_eq!(
            commands("M0 0H10V5h-2v-1"),
            vec![
                PathCommand::MoveTo(0.0, 0.0),
                PathCommand::LineTo(10.0, 0.0),
                PathCommand::LineTo(10.0, 5.0),
                PathCommand::LineTo(8.0, 5.0),
                PathCommand::LineTo(8.0, 4.0),
            ]
        );
    }

    #[test]
    fn test_smooth_cubic_reflects() {
        let cmds = commands("M0 0 C0 10 10 10 10 0 S20 -10 20 0");
        assert_eq!(cmds[2], PathCommand::CubicTo(10.0, -10.0, 20.0, -10.0, 20.0, 0.0));
    }

    #[test]
    fn test_smooth_quad_reflects() {
        let cmds = commands("M0 0 Q5 10 10 0 T20 0");
        assert_eq!(cmds[2], PathCommand::QuadTo(15.0, -10.0, 20.0, 0.0));
        // Without a preceding quad the control point is the pen.
        let cmds = commands("M0 0 T10 0");
        assert_eq!(cmds[1], PathCommand::QuadTo(0.0, 0.0, 10.0, 0.0));
    }

    #[test]
    fn test_compact_arc_flags() {
        let path = parse_path_data("M0 0a5 5 0 1110 0").unwrap();
        let last = *path.commands().last().unwrap();
        assert!(matches!(last, PathCommand::CubicTo(.., x, y) if x == 10.0 && y == 0.0));
    }

    #[test]
    fn test_arc_semicircle_bounds() {
        let path = parse_path_data("M0 0 A10 10 0 0 1 20 0").unwrap();
        let b = path.bounds().unwrap();
        assert!((b.x - 0.0).abs() < 1e-3);
        assert!((b.right() - 20.0).abs() < 1e-3);
        // sweep=1 from left to right goes through negative y
        assert!(b.y < -9.0);
    }

    #[test]
    fn test_arc_zero_radius_is_line() {
        assert_eq!(
            commands("M0 0 A0 5 0 0 1 10 10"),
            vec![PathCommand::MoveTo(0.0, 0.0), PathCommand::LineTo(10.0, 10.0)]
        );
    }

    #[test]
    fn test_arc_radius_scaled_up() {
        let path = parse_path_data("M0 0 A1 1 0 0 0 40 0").unwrap();
        let b = path.bounds().unwrap();
        assert!((b.right() - 40.0).abs() < 1e-3);
        assert!(b.bottom() > 19.0);
    }

    #[test]
    fn test_empty_data() {
        assert!(parse_path_data("").unwrap().is_empty());
        assert!(parse_path_data("   ").unwrap().is_empty());
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_path_data("L10 10"), Err(PathDataError::MissingMoveTo));
        assert_eq!(parse_path_data("10 10"), Err(PathDataError::MissingMoveTo));
        assert!(matches!(
            parse_path_data("M0 0 L10"),
            Err(PathDataError::MissingArgument { command: 'L', .. })
        ));
        assert!(matches!(
            parse_path_data("M0 0 X5 5"),
            Err(PathDataError::UnknownCommand { found: 'X', .. })
        ));
        assert!(matches!(
            parse_path_data("M0 0 A5 5 0 2 0 10 10"),
            Err(PathDataError::InvalidFlag { .. })
        ));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            PathDataError::MissingMoveTo.to_string(),
            "path data must begin with a moveto"
        );
        let err = parse_path_data("M0 0 X5 5").unwrap_err();
        assert_eq!(err.to_string(), "unknown command 'X' at offset 5");
    }

    #[test]
    fn test_rect_path_bounds() {
        let path = parse_path_data("M25 25 h50 v50 h-50 Z").unwrap();
        assert_eq!(path.bounds(), Some(Rect::new(25.0, 25.0, 50.0, 50.0)));
    }
}

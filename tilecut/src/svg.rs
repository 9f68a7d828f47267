use crate::curve::Curve;
use crate::error::PathDataError;
use crate::geometry::arc::Arc;
use crate::geometry::cubic::CubicBezier;
use crate::geometry::limits;
use crate::geometry::line::Line;
use crate::geometry::primitive::{Primitive, Segment};
use crate::geometry::quad::QuadBezier;
use crate::geometry::tolerance::EPS_POS;
use crate::model::Vec2;

/// Serialize a curve to path data, starting a new subpath with `M` whenever
/// a segment does not continue from the previous one.
pub fn write_path_data(curve: &Curve) -> String {
    let mut out = String::new();
    let mut prev_end: Option<Vec2> = None;
    for seg in curve.segments() {
        let s = seg.start();
        if !prev_end.is_some_and(|p| p.approx_eq(s, EPS_POS)) {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&format!("M {} {}", s.x, s.y));
        }
        out.push(' ');
        seg.write_path_data(&mut out);
        prev_end = Some(seg.end());
    }
    out
}

struct Lexer<'a> {
    bytes: &'a [u8],
    i: usize,
}

impl<'a> Lexer<'a> {
    fn skip_ws(&mut self) {
        while self.i < self.bytes.len() {
            let c = self.bytes[self.i];
            if c == b' ' || c == b'\n' || c == b'\t' || c == b'\r' || c == b',' {
                self.i += 1;
            } else {
                break;
            }
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_ws();
        self.bytes.get(self.i).copied()
    }

    fn at_number(&mut self) -> bool {
        matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == b'.' || c == b'-' || c == b'+')
    }

    fn number(&mut self) -> Result<f64, PathDataError> {
        self.skip_ws();
        let start = self.i;
        let b = self.bytes;
        let mut j = self.i;
        if j < b.len() && (b[j] == b'-' || b[j] == b'+') {
            j += 1;
        }
        let int_start = j;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        let mut digits = j > int_start;
        if j < b.len() && b[j] == b'.' {
            j += 1;
            let frac_start = j;
            while j < b.len() && b[j].is_ascii_digit() {
                j += 1;
            }
            digits |= j > frac_start;
        }
        if !digits {
            return Err(PathDataError::MissingNumber { pos: start });
        }
        if j < b.len() && (b[j] == b'e' || b[j] == b'E') {
            let mut k = j + 1;
            if k < b.len() && (b[k] == b'-' || b[k] == b'+') {
                k += 1;
            }
            let exp_start = k;
            while k < b.len() && b[k].is_ascii_digit() {
                k += 1;
            }
            if k > exp_start {
                j = k;
            }
        }
        let v = std::str::from_utf8(&b[start..j])
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .ok_or(PathDataError::MissingNumber { pos: start })?;
        self.i = j;
        if limits::in_coord_bounds(v) {
            Ok(v)
        } else {
            Err(PathDataError::OutOfBounds { pos: start })
        }
    }

    // Arc flags are single characters and may be packed: "a1 1 0 0110 10"
    fn flag(&mut self) -> Result<bool, PathDataError> {
        match self.peek() {
            Some(b'0') => {
                self.i += 1;
                Ok(false)
            }
            Some(b'1') => {
                self.i += 1;
                Ok(true)
            }
            _ => Err(PathDataError::MissingNumber { pos: self.i }),
        }
    }

    fn point(&mut self, rel: bool, cur: Vec2) -> Result<Vec2, PathDataError> {
        let x = self.number()?;
        let y = self.number()?;
        Ok(if rel { Vec2::new(cur.x + x, cur.y + y) } else { Vec2::new(x, y) })
    }
}

fn push(segs: &mut Vec<Segment>, s: Segment) -> Result<(), PathDataError> {
    if segs.len() >= limits::MAX_PATH_SEGMENTS {
        return Err(PathDataError::TooManyCommands);
    }
    segs.push(s);
    Ok(())
}

fn is_command(c: u8) -> bool {
    matches!(
        c,
        b'M' | b'm' | b'L' | b'l' | b'H' | b'h' | b'V' | b'v' | b'C' | b'c' | b'S' | b's' | b'Q' | b'q' | b'T'
            | b't' | b'A' | b'a' | b'Z' | b'z'
    )
}

/// Parse SVG path data into a curve.
///
/// Zero-length pieces are dropped; a `Z` that is not already at the subpath
/// start closes it with a line.
pub fn parse_path_data(d: &str) -> Result<Curve, PathDataError> {
    if d.len() > limits::MAX_PATH_DATA_LEN {
        return Err(PathDataError::TooLong { len: d.len() });
    }
    let mut lx = Lexer { bytes: d.as_bytes(), i: 0 };
    let mut segs: Vec<Segment> = Vec::new();
    let mut cur = Vec2::default();
    let mut start_sub = Vec2::default();
    let mut last_cmd: Option<u8> = None;
    // Reflection sources for S/T
    let mut last_cubic_ctrl: Option<Vec2> = None;
    let mut last_quad_ctrl: Option<Vec2> = None;
    let mut cmd_count = 0usize;

    while let Some(c) = lx.peek() {
        let cmd = if is_command(c) {
            lx.i += 1;
            c
        } else {
            match last_cmd {
                Some(b'M') if lx.at_number() => b'L',
                Some(b'm') if lx.at_number() => b'l',
                Some(prev) if prev != b'Z' && prev != b'z' && lx.at_number() => prev,
                _ => return Err(PathDataError::UnexpectedChar { pos: lx.i, ch: c as char }),
            }
        };
        if last_cmd.is_none() && cmd != b'M' && cmd != b'm' {
            return Err(PathDataError::MissingMoveTo);
        }
        cmd_count += 1;
        if cmd_count > limits::MAX_PATH_COMMANDS {
            return Err(PathDataError::TooManyCommands);
        }
        let rel = cmd.is_ascii_lowercase();
        let mut cubic_ctrl = None;
        let mut quad_ctrl = None;
        match cmd.to_ascii_uppercase() {
            b'M' => {
                cur = lx.point(rel, cur)?;
                start_sub = cur;
            }
            b'L' => {
                let p = lx.point(rel, cur)?;
                if !p.approx_eq(cur, EPS_POS) {
                    push(&mut segs, Line::new(cur, p).into())?;
                }
                cur = p;
            }
            b'H' => {
                let x = lx.number()?;
                let p = Vec2::new(if rel { cur.x + x } else { x }, cur.y);
                if !p.approx_eq(cur, EPS_POS) {
                    push(&mut segs, Line::new(cur, p).into())?;
                }
                cur = p;
            }
            b'V' => {
                let y = lx.number()?;
                let p = Vec2::new(cur.x, if rel { cur.y + y } else { y });
                if !p.approx_eq(cur, EPS_POS) {
                    push(&mut segs, Line::new(cur, p).into())?;
                }
                cur = p;
            }
            b'C' | b'S' => {
                let c1 = if cmd.to_ascii_uppercase() == b'S' {
                    match last_cubic_ctrl {
                        Some(c2) => Vec2::new(2.0 * cur.x - c2.x, 2.0 * cur.y - c2.y),
                        None => cur,
                    }
                } else {
                    lx.point(rel, cur)?
                };
                let c2 = lx.point(rel, cur)?;
                let p = lx.point(rel, cur)?;
                let bez = CubicBezier::new(cur, c1, c2, p);
                if !(p.approx_eq(cur, EPS_POS) && c1.approx_eq(cur, EPS_POS) && c2.approx_eq(cur, EPS_POS)) {
                    push(&mut segs, bez.into())?;
                }
                cubic_ctrl = Some(c2);
                cur = p;
            }
            b'Q' | b'T' => {
                let c1 = if cmd.to_ascii_uppercase() == b'T' {
                    match last_quad_ctrl {
                        Some(q) => Vec2::new(2.0 * cur.x - q.x, 2.0 * cur.y - q.y),
                        None => cur,
                    }
                } else {
                    lx.point(rel, cur)?
                };
                let p = lx.point(rel, cur)?;
                if !(p.approx_eq(cur, EPS_POS) && c1.approx_eq(cur, EPS_POS)) {
                    push(&mut segs, QuadBezier::new(cur, c1, p).into())?;
                }
                quad_ctrl = Some(c1);
                cur = p;
            }
            b'A' => {
                let rx = lx.number()?;
                let ry = lx.number()?;
                let rotation = lx.number()?;
                let large_arc = lx.flag()?;
                let sweep = lx.flag()?;
                let p = lx.point(rel, cur)?;
                match Arc::from_endpoints(cur, rx, ry, rotation, large_arc, sweep, p) {
                    Some(arc) => push(&mut segs, arc.into())?,
                    None if !p.approx_eq(cur, EPS_POS) => push(&mut segs, Line::new(cur, p).into())?,
                    None => {}
                }
                cur = p;
            }
            b'Z' => {
                if !cur.approx_eq(start_sub, EPS_POS) {
                    push(&mut segs, Line::new(cur, start_sub).into())?;
                }
                cur = start_sub;
            }
            _ => return Err(PathDataError::UnexpectedChar { pos: lx.i - 1, ch: c as char }),
        }
        last_cubic_ctrl = cubic_ctrl;
        last_quad_ctrl = quad_ctrl;
        last_cmd = Some(cmd);
    }

    Ok(Curve::new(segs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_absolute_and_relative_lines() {
        let c = parse_path_data("M 10 10 L 20 10 l 0 10 h -10 V 10").unwrap();
        assert_eq!(c.len(), 4);
        assert_eq!(c.end(), Some(Vec2::new(10.0, 10.0)));
        assert!(c.is_closed());
    }

    #[test]
    fn implicit_lineto_after_moveto() {
        let c = parse_path_data("m0 0 10 0 0 10z").unwrap();
        assert_eq!(c.len(), 3);
        assert!(matches!(c.segments()[2], Segment::Line(_)));
    }

    #[test]
    fn compact_numbers() {
        let c = parse_path_data("M0-5L.5.5-1e1-2").unwrap();
        assert_eq!(c.start(), Some(Vec2::new(0.0, -5.0)));
        let Segment::Line(l) = c.segments()[1] else { panic!("expected line") };
        assert_eq!(l.p1, Vec2::new(-10.0, -2.0));
    }

    #[test]
    fn smooth_cubic_reflects_control() {
        let c = parse_path_data("M0 0 C 0 10 10 10 10 0 S 20 -10 20 0").unwrap();
        let Segment::Cubic(s) = c.segments()[1] else { panic!("expected cubic") };
        assert_eq!(s.p1, Vec2::new(10.0, -10.0));
    }

    #[test]
    fn packed_arc_flags() {
        let c = parse_path_data("M0 0a5 5 0 0110 0").unwrap();
        let Segment::Arc(a) = c.segments()[0] else { panic!("expected arc") };
        assert!(a.sweep && !a.large_arc);
        assert_eq!(a.p1, Vec2::new(10.0, 0.0));
    }

    #[test]
    fn zero_radius_arc_is_a_line() {
        let c = parse_path_data("M0 0 A 0 5 0 0 1 10 0").unwrap();
        assert!(matches!(c.segments()[0], Segment::Line(_)));
    }

    #[test]
    fn errors_are_typed() {
        assert_eq!(parse_path_data("L 1 1"), Err(PathDataError::MissingMoveTo));
        assert!(matches!(parse_path_data("M 0 0 L 1"), Err(PathDataError::MissingNumber { .. })));
        assert!(matches!(parse_path_data("M 0 0 X 1 1"), Err(PathDataError::UnexpectedChar { ch: 'X', .. })));
        assert!(matches!(parse_path_data("M 0 0 L 1e30 0"), Err(PathDataError::OutOfBounds { .. })));
        assert_eq!(parse_path_data("").map(|c| c.len()), Ok(0));
    }

    #[test]
    fn writer_round_trips_geometry() {
        let src = "M 0 0 L 10 0 Q 15 5 10 10 C 5 15 0 15 0 10 A 5 5 0 0 1 0 0 M 20 20 L 30 30";
        let c = parse_path_data(src).unwrap();
        let d = write_path_data(&c);
        assert_eq!(d.matches('M').count(), 2);
        let again = parse_path_data(&d).unwrap();
        assert_eq!(again.len(), c.len());
        for (a, b) in c.segments().iter().zip(again.segments()) {
            assert!(a.start().approx_eq(b.start(), 1e-9));
            assert!(a.point(0.5).approx_eq(b.point(0.5), 1e-6));
        }
    }
}

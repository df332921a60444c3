//! Byte scanner for the SVG number grammar shared by path data, lists and transforms.

pub(crate) struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(s: &'a str) -> Self {
        Self {
            bytes: s.as_bytes(),
            pos: 0,
        }
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    pub(crate) fn bump(&mut self) {
        self.pos += 1;
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn rest(&self) -> &'a [u8] {
        &self.bytes[self.pos.min(self.bytes.len())..]
    }

    pub(crate) fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Skip whitespace and at most one comma.
    pub(crate) fn skip_separators(&mut self) {
        self.skip_whitespace();
        if self.peek() == Some(b',') {
            self.pos += 1;
            self.skip_whitespace();
        }
    }

    pub(crate) fn at_end(&mut self) -> bool {
        self.skip_whitespace();
        self.pos >= self.bytes.len()
    }

    /// True if the next token can start a number.
    pub(crate) fn at_number(&mut self) -> bool {
        self.skip_whitespace();
        matches!(self.peek(), Some(b'0'..=b'9' | b'.' | b'-' | b'+'))
    }

    /// Read one number, leaving the position untouched on failure.
    pub(crate) fn number(&mut self) -> Option<f32> {
        self.skip_separators();
        let start = self.pos;

        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        let int_digits = self.digits();
        let mut frac_digits = 0;
        if self.peek() == Some(b'.') {
            self.pos += 1;
            frac_digits = self.digits();
        }
        if int_digits + frac_digits == 0 {
            self.pos = start;
            return None;
        }

        if matches!(self.peek(), Some(b'e' | b'E')) {
            let mantissa_end = self.pos;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if self.digits() == 0 {
                // "1em": the exponent marker belongs to a unit
                self.pos = mantissa_end;
            }
        }

        let text = std::str::from_utf8(&self.bytes[start..self.pos]).ok()?;
        match text.parse::<f32>() {
            Ok(v) if v.is_finite() => Some(v),
            _ => {
                self.pos = start;
                None
            }
        }
    }

    /// Read an arc flag: a single `0` or `1`, which may be packed against the next token.
    pub(crate) fn flag(&mut self) -> Option<bool> {
        self.skip_separators();
        let flag = match self.peek()? {
            b'0' => false,
            b'1' => true,
            _ => return None,
        };
        self.pos += 1;
        Some(flag)
    }

    fn digits(&mut self) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        self.pos - start
    }
}

/// Parse a whitespace/comma separated list of numbers. Fails on any non-numeric token.
pub(crate) fn parse_number_list(s: &str) -> Option<Vec<f32>> {
    let mut scanner = Scanner::new(s);
    let mut numbers = Vec::new();
    while !scanner.at_end() {
        numbers.push(scanner.number()?);
        scanner.skip_separators();
    }
    Some(numbers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_numbers() {
        assert_eq!(parse_number_list("1.5.5"), Some(vec![1.5, 0.5]));
        assert_eq!(parse_number_list("10-5"), Some(vec![10.0, -5.0]));
        assert_eq!(parse_number_list("1e2,-.5E-1"), Some(vec![100.0, -0.05]));
        assert_eq!(parse_number_list(" 3 , 4 "), Some(vec![3.0, 4.0]));
        assert_eq!(parse_number_list("1 x"), None);
    }

    #[test]
    fn test_exponent_vs_unit() {
        let mut s = Scanner::new("2em");
        assert_eq!(s.number(), Some(2.0));
        assert_eq!(s.rest(), b"em");
    }

    #[test]
    fn test_flags() {
        let mut s = Scanner::new("01 1");
        assert_eq!(s.flag(), Some(false));
        assert_eq!(s.flag(), Some(true));
        assert_eq!(s.flag(), Some(true));
        assert_eq!(s.flag(), None);
    }
}

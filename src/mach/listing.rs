use crate::error;
use crate::lang::{Error, LineNumber};
use std::collections::BTreeMap;
use std::rc::Rc;

/// ## Program store
///
/// Sparse, keyed by line number. Each line keeps its text after the
/// line number, leading blanks removed, with the newline attached so a
/// cursor always finds the end of the line.

#[derive(Debug, Clone, Default)]
pub struct Listing {
    source: BTreeMap<LineNumber, Rc<[u8]>>,
}

impl Listing {
    pub fn clear(&mut self) {
        self.source.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn first(&self) -> Option<LineNumber> {
        self.source.keys().next().copied()
    }

    pub fn last(&self) -> Option<LineNumber> {
        self.source.keys().next_back().copied()
    }

    pub fn get(&self, line_number: LineNumber) -> Option<&Rc<[u8]>> {
        self.source.get(&line_number)
    }

    /// Store `text` as line `line_number`, replacing whatever was there.
    /// Text that is blank up to the newline deletes the line instead.
    /// Returns true if a line was stored.
    pub fn insert(&mut self, line_number: LineNumber, text: &[u8]) -> bool {
        let start = text
            .iter()
            .position(|&c| c != b' ' && c != b'\t')
            .unwrap_or(text.len());
        let end = text[start..]
            .iter()
            .position(|&c| c == b'\n')
            .map_or(text.len(), |n| start + n);
        if start == end {
            self.source.remove(&line_number);
            return false;
        }
        let mut line = text[start..end].to_vec();
        line.push(b'\n');
        self.source.insert(line_number, line.into());
        true
    }

    /// The line after `line_number`. Zero means from the top.
    pub fn next_line(&self, line_number: LineNumber) -> Option<LineNumber> {
        if line_number == 0 {
            return self.first();
        }
        self.source
            .range(line_number.checked_add(1)?..)
            .next()
            .map(|(&ln, _)| ln)
    }

    /// Lines `first` through `last` as they appear in a listing. A
    /// `last` of zero means the end of the program.
    pub fn list(&self, first: LineNumber, last: LineNumber) -> Result<Vec<Vec<u8>>, Error> {
        if last != 0 && first > last {
            return Err(error!(Syntax));
        }
        let (lo, hi) = match (self.first(), self.last()) {
            (Some(lo), Some(hi)) => (lo, hi),
            _ => return Ok(vec![]),
        };
        let first = first.max(lo);
        let last = if last == 0 { hi } else { last.min(hi) };
        if first > last {
            return Ok(vec![]);
        }
        let width = last.to_string().len();
        Ok(self
            .source
            .range(first..=last)
            .map(|(ln, text)| {
                let mut line = format!("{:>width$} ", ln, width = width).into_bytes();
                line.extend_from_slice(text);
                line
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(lines: &[(LineNumber, &str)]) -> Listing {
        let mut l = Listing::default();
        for (ln, text) in lines {
            l.insert(*ln, text.as_bytes());
        }
        l
    }

    fn text(lines: Vec<Vec<u8>>) -> String {
        String::from_utf8(lines.concat()).unwrap()
    }

    #[test]
    fn test_insert_and_delete() {
        let mut l = listing(&[(20, "  PRINT 2\n"), (10, "PRINT 1\n"), (30, "END\n")]);
        assert_eq!(l.first(), Some(10));
        assert_eq!(l.last(), Some(30));
        assert_eq!(&l.get(20).unwrap()[..], b"PRINT 2\n");
        assert!(!l.insert(10, b"   \n"));
        assert_eq!(l.first(), Some(20));
        assert!(!l.insert(30, b"\n"));
        assert_eq!(l.last(), Some(20));
        assert!(!l.insert(20, b""));
        assert_eq!(l.first(), None);
        assert_eq!(l.last(), None);
    }

    #[test]
    fn test_next_line() {
        let l = listing(&[(10, "A\n"), (65535, "B\n")]);
        assert_eq!(l.next_line(0), Some(10));
        assert_eq!(l.next_line(10), Some(65535));
        assert_eq!(l.next_line(65535), None);
        assert_eq!(Listing::default().next_line(0), None);
    }

    #[test]
    fn test_list_width() {
        let l = listing(&[(5, "REM A\n"), (10, "REM B\n"), (100, "REM C\n")]);
        assert_eq!(text(l.list(0, 0).unwrap()), "  5 REM A\n 10 REM B\n100 REM C\n");
        assert_eq!(text(l.list(6, 50).unwrap()), "10 REM B\n");
        assert_eq!(text(l.list(200, 0).unwrap()), "");
        assert!(l.list(20, 10).is_err());
        assert!(Listing::default().list(0, 0).unwrap().is_empty());
    }
}

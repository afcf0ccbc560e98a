//! Template scanner.
//!
//! Splits a grok template into literal regex text and reference tokens
//! (`%{NAME}`, `%{NAME:field}`, `%{NAME:field:type}`). Anything that starts
//! with `%{` but isn't a complete token stays literal.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference<'a> {
    pub pattern: &'a str,
    pub field: Option<&'a str>,
    pub type_tag: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Reference(Reference<'a>),
}

pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn bytes(&self) -> &'a [u8] {
        self.input.as_bytes()
    }

    fn read_while(&self, start: usize, pred: impl Fn(u8) -> bool) -> usize {
        let bytes = self.bytes();
        let mut end = start;
        while end < bytes.len() && pred(bytes[end]) {
            end += 1;
        }
        end
    }

    /// Parse a reference token starting at `start`. Returns the token and the
    /// offset just past its closing brace.
    fn reference_at(&self, start: usize) -> Option<(Reference<'a>, usize)> {
        let bytes = self.bytes();
        if bytes.get(start) != Some(&b'%') || bytes.get(start + 1) != Some(&b'{') {
            return None;
        }

        let name_start = start + 2;
        let name_end = self.read_while(name_start, is_pattern_name_char);
        if name_end == name_start {
            return None;
        }
        let mut reference = Reference {
            pattern: &self.input[name_start..name_end],
            field: None,
            type_tag: None,
        };

        let mut pos = name_end;
        if bytes.get(pos) == Some(&b':') {
            let field_end = self.read_while(pos + 1, is_field_char);
            if field_end == pos + 1 {
                return None;
            }
            reference.field = Some(&self.input[pos + 1..field_end]);
            pos = field_end;

            if bytes.get(pos) == Some(&b':') {
                let type_end = self.read_while(pos + 1, is_type_char);
                if type_end == pos + 1 {
                    return None;
                }
                reference.type_tag = Some(&self.input[pos + 1..type_end]);
                pos = type_end;
            }
        }

        if bytes.get(pos) != Some(&b'}') {
            return None;
        }
        Some((reference, pos + 1))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        let len = self.input.len();
        if self.pos >= len {
            return None;
        }

        if let Some((reference, end)) = self.reference_at(self.pos) {
            self.pos = end;
            return Some(Segment::Reference(reference));
        }

        // Literal run up to the next complete token.
        let start = self.pos;
        let mut search = start + 1;
        while let Some(offset) =
            self.bytes()[search.min(len)..].iter().position(|&b| b == b'%')
        {
            let at = search + offset;
            if self.reference_at(at).is_some() {
                self.pos = at;
                return Some(Segment::Literal(&self.input[start..at]));
            }
            search = at + 1;
        }
        self.pos = len;
        Some(Segment::Literal(&self.input[start..]))
    }
}

fn is_pattern_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'.' || b == b'-'
}

fn is_field_char(b: u8) -> bool {
    is_pattern_name_char(b) || b == b'@' || b == b'[' || b == b']'
}

fn is_type_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// True if `name` can be addressed by a `%{NAME}` token.
pub fn is_pattern_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(is_pattern_name_char)
}

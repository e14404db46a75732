/// One field of a slash-delimited path.
///
/// A field starting with `:` is a parameter segment; the remainder is the
/// parameter name. Everything else matches literally.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Segment<'a> {
    Literal(&'a str),
    Param(&'a str),
}

impl<'a> From<&'a str> for Segment<'a> {
    fn from(field: &'a str) -> Self {
        match field.strip_prefix(':') {
            Some(name) => Segment::Param(name),
            None => Segment::Literal(field),
        }
    }
}

impl Segment<'_> {
    pub fn is_param(&self) -> bool {
        matches!(self, Segment::Param(_))
    }
}

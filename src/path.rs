use crate::{ParamsPos, Segment};
use smartstring::alias::String as SmartString;
use std::fmt::{self, Debug, Display, Formatter};

/// A normalized slash-delimited path.
///
/// Construction cleans the raw text: a leading slash is guaranteed, empty
/// and `.` fields collapse away, `..` swallows the field before it (never
/// climbing above the root), and the trailing slash is stripped everywhere
/// but the root itself. Two paths that clean to the same text are equal.
///
/// Fields starting with `:` are parameter segments and match any single
/// field during structural comparisons.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Path(SmartString);

impl Path {
    /// Builds a path from raw text, normalizing it.
    pub fn new(raw: &str) -> Self {
        let mut fields: Vec<&str> = vec![];
        for field in raw.split('/') {
            match field {
                "" | "." => {}
                ".." => {
                    fields.pop();
                }
                field => fields.push(field),
            }
        }

        if fields.is_empty() {
            return Self(SmartString::from("/"));
        }

        let mut cleaned = SmartString::new();
        for field in fields {
            cleaned.push('/');
            cleaned.push_str(field);
        }
        Self(cleaned)
    }

    /// Root path, `/`.
    pub fn root() -> Self {
        Self(SmartString::from("/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.as_str() == "/"
    }

    /// The non-empty slash-separated fields, in order.
    pub fn fields(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.split('/').filter(|field| !field.is_empty())
    }

    /// Whether `prefix` matches the front of this path, field by field.
    ///
    /// The root prefixes everything. A prefix with more fields than the
    /// path never matches. At each position a parameter segment on either
    /// side matches; literal fields must be equal.
    pub fn has_prefix(&self, prefix: &Path) -> bool {
        if prefix.fields().count() > self.fields().count() {
            return false;
        }
        if prefix.is_root() {
            return true;
        }

        self.fields()
            .zip(prefix.fields())
            .all(|(ours, theirs)| match (Segment::from(ours), Segment::from(theirs)) {
                (Segment::Param(_), _) | (_, Segment::Param(_)) => true,
                (Segment::Literal(ours), Segment::Literal(theirs)) => ours == theirs,
            })
    }

    /// Whether `candidate` matches this path exactly: same number of
    /// fields, and every position passes the [`has_prefix`][Self::has_prefix]
    /// comparison.
    pub fn matches(&self, candidate: &Path) -> bool {
        self.fields().count() == candidate.fields().count() && self.has_prefix(candidate)
    }

    /// Appends each of `elements` in order and renormalizes.
    pub fn join<'a>(&self, elements: impl IntoIterator<Item = &'a str>) -> Path {
        let mut joined = String::from(self.as_str());
        for element in elements {
            joined.push('/');
            joined.push_str(element);
        }
        Path::new(&joined)
    }

    /// The parameter names in this path with their field positions.
    ///
    /// # Panics
    ///
    /// Panics if the same parameter name appears twice.
    pub fn params_pos(&self) -> ParamsPos {
        let mut params_pos = ParamsPos::default();
        for (position, field) in self.fields().enumerate() {
            if let Segment::Param(name) = Segment::from(field) {
                if params_pos.get(name).is_some() {
                    panic!("duplicate param '{}' in path '{}'", name, self);
                }
                params_pos.insert(name, position);
            }
        }
        params_pos
    }
}

impl Default for Path {
    fn default() -> Self {
        Self::root()
    }
}

impl From<&str> for Path {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Path {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl AsRef<str> for Path {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<&str> for Path {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Debug for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

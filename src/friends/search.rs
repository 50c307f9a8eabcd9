/// Name predicate applied to an owner's friends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameFilter {
    /// Blank query: no filtering.
    Any,
    /// Single word: first name or last name contains it.
    Either(String),
    /// `"<first> <last>"`, split at the first space: both must match, in order.
    Both { first: String, last: String },
}

impl NameFilter {
    /// Trims and lowercases the term before splitting.
    pub fn parse(term: &str) -> Self {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Self::Any;
        }
        match term.split_once(' ') {
            Some((first, last)) => Self::Both {
                first: first.to_string(),
                last: last.to_string(),
            },
            None => Self::Either(term),
        }
    }

    /// Case-insensitive containment check against a friend's names.
    pub fn matches(&self, first_name: &str, last_name: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Either(q) => {
                first_name.to_lowercase().contains(q.as_str())
                    || last_name.to_lowercase().contains(q.as_str())
            }
            Self::Both { first, last } => {
                first_name.to_lowercase().contains(first.as_str())
                    && last_name.to_lowercase().contains(last.as_str())
            }
        }
    }

    /// SQL parameters as `(either, first, last)`; `None` disables that clause.
    pub(crate) fn sql_params(&self) -> (Option<&str>, Option<&str>, Option<&str>) {
        match self {
            Self::Any => (None, None, None),
            Self::Either(q) => (Some(q.as_str()), None, None),
            Self::Both { first, last } => (None, Some(first.as_str()), Some(last.as_str())),
        }
    }
}

use std::fmt;
use std::str::FromStr;

/// Inline `keyword:value` filters understood by the search box
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Label,
    Status,
    Assignee,
    Creator,
}

pub struct FilterDef {
    pub kind: FilterKind,
    pub keyword: &'static str,
    pub description: &'static str,
}

pub static FILTER_DEFINITIONS: &[FilterDef] = &[
    FilterDef {
        kind: FilterKind::Label,
        keyword: "label",
        description: "Ticket must carry the label (repeat for several)",
    },
    FilterDef {
        kind: FilterKind::Status,
        keyword: "status",
        description: "open, closed or all",
    },
    FilterDef {
        kind: FilterKind::Assignee,
        keyword: "assignee",
        description: "Assigned user id",
    },
    FilterDef {
        kind: FilterKind::Creator,
        keyword: "creator",
        description: "Author user id",
    },
];

impl FilterKind {
    pub fn def(&self) -> &'static FilterDef {
        // FILTER_DEFINITIONS lists every variant in declaration order
        &FILTER_DEFINITIONS[*self as usize]
    }

    pub fn keyword(&self) -> &'static str {
        self.def().keyword
    }

    /// Length of `keyword:` in bytes
    pub fn prefix_len(&self) -> usize {
        self.keyword().len() + 1
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Ticket status restriction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StatusFilter {
    Open,
    Closed,
    #[default]
    All,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::Open => "open",
            StatusFilter::Closed => "closed",
            StatusFilter::All => "all",
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown status '{}', expected open, closed or all", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for StatusFilter {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("open") {
            Ok(StatusFilter::Open)
        } else if s.eq_ignore_ascii_case("closed") {
            Ok(StatusFilter::Closed)
        } else if s.eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            Err(UnknownStatus(s.to_string()))
        }
    }
}

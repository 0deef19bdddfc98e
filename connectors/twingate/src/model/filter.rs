//! Read filters.

use super::group::Group;

/// How a name filter compares against entity names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NameFilter {
    #[default]
    Exact,
    Regexp,
    Contains,
    Exclude,
    Prefix,
    Suffix,
}

impl NameFilter {
    /// Parse a data-source attribute suffix such as `_regexp` or `_prefix`.
    ///
    /// Anything unrecognized means an exact match.
    pub fn from_suffix(suffix: &str) -> Self {
        match suffix {
            "_regexp" => Self::Regexp,
            "_contains" => Self::Contains,
            "_exclude" => Self::Exclude,
            "_prefix" => Self::Prefix,
            "_suffix" => Self::Suffix,
            _ => Self::Exact,
        }
    }

    /// GraphQL string filter operator.
    pub const fn operator(self) -> &'static str {
        match self {
            Self::Exact => "eq",
            Self::Regexp => "regexp",
            Self::Contains => "contains",
            Self::Exclude => "ne",
            Self::Prefix => "startsWith",
            Self::Suffix => "endsWith",
        }
    }
}

/// Group read filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupsFilter {
    pub name: Option<String>,
    pub name_filter: NameFilter,
    pub group_type: Option<String>,
    pub is_active: Option<bool>,
}

impl GroupsFilter {
    pub fn has_name(&self) -> bool {
        self.name.as_deref().is_some_and(|name| !name.is_empty())
    }

    /// Client-side check of the type and activity constraints.
    pub fn matches(&self, group: &Group) -> bool {
        if self
            .group_type
            .as_deref()
            .is_some_and(|kind| kind != group.group_type)
        {
            return false;
        }
        self.is_active.is_none_or(|active| active == group.is_active)
    }
}

//! Client-side narrowing of lists already fetched from the backend.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::lifecycle::{ElectionStatus, LifecycleEvaluator};
use crate::model::api::{Candidate, Election, ElectionResult, Party};

/// Something that can be matched against free-text search.
pub trait Searchable {
    /// The fields a query is matched against.
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for Election {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str()]
    }
}

impl Searchable for Candidate {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.party_name());
        fields.extend(self.election_title());
        fields
    }
}

impl Searchable for Party {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.description.as_deref());
        fields
    }
}

/// Items with any field containing `query`, ignoring case. A blank query
/// matches everything. Order is preserved.
pub fn search<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    let query = query.trim().to_lowercase();
    items
        .iter()
        .filter(|item| {
            query.is_empty()
                || item
                    .search_fields()
                    .iter()
                    .any(|field| field.to_lowercase().contains(&query))
        })
        .collect()
}

/// Which results an overview shows. Upcoming elections never have results
/// worth showing and are always left out.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ResultsFilter {
    #[default]
    All,
    Ongoing,
    Completed,
}

impl ResultsFilter {
    pub fn accepts(&self, status: ElectionStatus) -> bool {
        match (self, status) {
            (_, ElectionStatus::Upcoming) => false,
            (ResultsFilter::All, _) => true,
            (ResultsFilter::Ongoing, status) => status == ElectionStatus::Ongoing,
            (ResultsFilter::Completed, status) => status == ElectionStatus::Completed,
        }
    }

    pub fn apply<'a>(
        &self,
        results: &'a [ElectionResult],
        evaluator: &LifecycleEvaluator,
    ) -> Vec<&'a ElectionResult> {
        results
            .iter()
            .filter(|result| self.accepts(evaluator.status(result.start_date, result.end_date)))
            .collect()
    }
}

impl Display for ResultsFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultsFilter::All => write!(f, "all"),
            ResultsFilter::Ongoing => write!(f, "ongoing"),
            ResultsFilter::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for ResultsFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(ResultsFilter::All),
            "ongoing" => Ok(ResultsFilter::Ongoing),
            "completed" => Ok(ResultsFilter::Completed),
            other => Err(Error::invalid(
                "filter",
                format!("`{other}` is not one of all, ongoing, completed"),
            )),
        }
    }
}

/// The elections a voter can cast a ballot in right now.
pub fn open_elections<'a>(
    elections: impl IntoIterator<Item = &'a Election>,
    evaluator: &LifecycleEvaluator,
) -> Vec<&'a Election> {
    elections
        .into_iter()
        .filter(|election| evaluator.is_open(election))
        .collect()
}

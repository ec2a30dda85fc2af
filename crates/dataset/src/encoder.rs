use std::collections::{BTreeSet, HashMap};

use stockcast_core::CategoryCode;

/// Bidirectional mapping between category labels and dense integer codes.
///
/// Built once per dataset. Codes are assigned `0..k` in lexicographic label
/// order, so the encoding does not depend on row order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryEncoder {
    labels: Vec<String>,
    codes: HashMap<String, CategoryCode>,
}

impl CategoryEncoder {
    pub fn fit<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct: BTreeSet<&str> = labels.into_iter().collect();
        let labels: Vec<String> = distinct.into_iter().map(str::to_string).collect();
        let codes = labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), CategoryCode::new(i as u32)))
            .collect();
        Self { labels, codes }
    }

    pub fn encode(&self, label: &str) -> Option<CategoryCode> {
        self.codes.get(label).copied()
    }

    pub fn decode(&self, code: CategoryCode) -> Option<&str> {
        self.labels.get(code.index()).map(String::as_str)
    }

    pub fn contains(&self, code: CategoryCode) -> bool {
        code.index() < self.labels.len()
    }

    /// Labels indexed by code.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn iter(&self) -> impl Iterator<Item = (CategoryCode, &str)> {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, l)| (CategoryCode::new(i as u32), l.as_str()))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

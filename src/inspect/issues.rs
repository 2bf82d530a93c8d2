//! Issue collections produced by the topology inspectors.
//!
//! Rule violations are data, not errors: each one is recorded as a
//! (value, message) pair under a named category. [`InspectionIssues`] is one
//! flat category; [`InspectionIssuesMap`] groups per-owning-component
//! sub-collections (e.g. "unlinked mesh vertices", one entry per component).
//!
//! Collections are append-only during a run and merged with [`append`]
//! (`InspectionIssues::append`) when parallel workers join their partial
//! buffers.

use std::fmt;

use crate::model::ComponentId;

/// One category of inspection issues: a description plus every recorded
/// (value, message) pair.
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct InspectionIssues<T> {
    description: String,
    issues: Vec<(T, String)>,
}

impl<T> InspectionIssues<T> {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            issues: Vec::new(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Records one issue. Never fails and never deduplicates: every rule
    /// violation found is reported.
    pub fn add_issue(&mut self, value: T, message: impl Into<String>) {
        self.issues.push((value, message.into()));
    }

    #[inline]
    pub fn nb_issues(&self) -> usize {
        self.issues.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Recorded (value, message) pairs, in insertion order.
    pub fn issues(&self) -> &[(T, String)] {
        &self.issues
    }

    /// Recorded values only.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.issues.iter().map(|(value, _)| value)
    }

    /// Merges another buffer of the same category into this one. Used when
    /// parallel workers fan in; `self`'s description wins.
    pub fn append(&mut self, mut other: Self) {
        self.issues.append(&mut other.issues);
    }
}

impl<T> fmt::Display for InspectionIssues<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return write!(f, "{} -> no issues", self.description);
        }
        write!(f, "{}", self.description)?;
        for (_, message) in &self.issues {
            write!(f, "\n  -> {message}")?;
        }
        Ok(())
    }
}

/// Issues grouped by the component that owns them.
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct InspectionIssuesMap<T> {
    description: String,
    entries: Vec<(ComponentId, InspectionIssues<T>)>,
}

impl<T> InspectionIssuesMap<T> {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            entries: Vec::new(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Files a sub-collection under its owning component. Empty collections
    /// are dropped so the map only lists components that actually have
    /// issues.
    pub fn add_issues(&mut self, owner: ComponentId, issues: InspectionIssues<T>) {
        if issues.is_empty() {
            return;
        }
        self.entries.push((owner, issues));
    }

    /// Total number of contained issues, with no double counting.
    pub fn nb_issues(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, issues)| issues.nb_issues())
            .sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(ComponentId, InspectionIssues<T>)] {
        &self.entries
    }

    pub fn append(&mut self, mut other: Self) {
        self.entries.append(&mut other.entries);
    }
}

impl<T> fmt::Display for InspectionIssuesMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return write!(f, "{} -> no issues", self.description);
        }
        write!(f, "{}", self.description)?;
        for (owner, issues) in &self.entries {
            write!(f, "\n  [{owner}] {issues}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_collection_reports_no_issues() {
        let issues: InspectionIssues<usize> = InspectionIssues::new("Dangling vertices");
        assert_eq!(issues.nb_issues(), 0);
        assert_eq!(issues.to_string(), "Dangling vertices -> no issues");
    }

    #[test]
    fn display_lists_every_message() {
        let mut issues = InspectionIssues::new("Dangling vertices");
        issues.add_issue(3_usize, "unique vertex 3 has no CMV");
        issues.add_issue(7_usize, "unique vertex 7 has no CMV");
        let text = issues.to_string();
        assert!(text.starts_with("Dangling vertices"));
        assert!(text.contains("-> unique vertex 3 has no CMV"));
        assert!(text.contains("-> unique vertex 7 has no CMV"));
    }

    #[test]
    fn append_merges_buffers() {
        let mut left = InspectionIssues::new("category");
        left.add_issue(1_usize, "one");
        let mut right = InspectionIssues::new("category");
        right.add_issue(2_usize, "two");
        left.append(right);
        assert_eq!(left.nb_issues(), 2);
        let values: Vec<_> = left.values().copied().collect();
        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn map_skips_empty_subcollections_and_sums_counts() {
        let mut map: InspectionIssuesMap<u32> = InspectionIssuesMap::new("Unlinked vertices");
        map.add_issues(ComponentId::new(1), InspectionIssues::new("sub"));
        assert!(map.is_empty());
        let mut sub = InspectionIssues::new("sub");
        sub.add_issue(0_u32, "vertex 0 unlinked");
        sub.add_issue(1_u32, "vertex 1 unlinked");
        map.add_issues(ComponentId::new(2), sub);
        assert_eq!(map.nb_issues(), 2);
        assert_eq!(map.entries().len(), 1);
    }

    #[test]
    fn serializes_to_json() {
        let mut issues = InspectionIssues::new("category");
        issues.add_issue(5_usize, "message");
        let json = serde_json::to_value(&issues).unwrap();
        assert_eq!(json["description"], "category");
        assert_eq!(json["issues"][0][0], 5);
    }
}

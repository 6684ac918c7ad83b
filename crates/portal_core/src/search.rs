use serde::{Deserialize, Serialize};

/// Queries this short (in characters) close the results dropdown.
pub const MIN_QUERY_CHARS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Student,
    Lecture,
    Assignment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryRecord {
    pub kind: RecordKind,
    pub name: String,
    pub detail: String,
}

impl DirectoryRecord {
    pub fn new(kind: RecordKind, name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            detail: detail.into(),
        }
    }
}

/// Case-insensitive substring match on record names.
///
/// `None` means the dropdown should be hidden; `Some(vec![])` means it is
/// shown with no matches.
pub fn search<'a>(records: &'a [DirectoryRecord], query: &str) -> Option<Vec<&'a DirectoryRecord>> {
    let query = query.to_lowercase();
    if query.chars().count() < MIN_QUERY_CHARS {
        return None;
    }
    Some(
        records
            .iter()
            .filter(|record| record.name.to_lowercase().contains(&query))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> Vec<DirectoryRecord> {
        vec![
            DirectoryRecord::new(RecordKind::Student, "Isha Sharma", "Grade: 96.5%"),
            DirectoryRecord::new(RecordKind::Student, "Rohan Patel", "Grade: 94.2%"),
            DirectoryRecord::new(RecordKind::Lecture, "Calculus II", "Math Department"),
            DirectoryRecord::new(RecordKind::Assignment, "Physics Quiz", "Due: Tomorrow"),
        ]
    }

    #[test]
    fn short_queries_hide_results() {
        let records = directory();
        assert!(search(&records, "").is_none());
        assert!(search(&records, "is").is_none());
    }

    #[test]
    fn matches_names_ignoring_case() {
        let records = directory();
        let hits = search(&records, "SHAR").expect("shown");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Isha Sharma");
    }

    #[test]
    fn details_are_not_searched() {
        let records = directory();
        let hits = search(&records, "grade").expect("shown");
        assert!(hits.is_empty());
    }

    #[test]
    fn preserves_directory_order() {
        let mut records = directory();
        records.push(DirectoryRecord::new(
            RecordKind::Lecture,
            "Physics Lab",
            "Science Wing",
        ));
        let hits = search(&records, "physics").expect("shown");
        let names: Vec<_> = hits.iter().map(|record| record.name.as_str()).collect();
        assert_eq!(names, vec!["Physics Quiz", "Physics Lab"]);
    }
}

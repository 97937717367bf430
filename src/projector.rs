//! Pure projection from flat joined rows into nested one-to-many groups.
//!
//! No storage or network access; the fold preserves first-encounter order of
//! the group keys and appends children in row order.

use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

/// Fold a flat row stream into groups keyed by `key`, preserving the order in
/// which keys are first seen. `new_group` builds an empty group from the row
/// that introduces the key; `push` appends each row to its group.
pub fn fold_groups<R, K, G>(
    rows: impl IntoIterator<Item = R>,
    key: impl Fn(&R) -> K,
    new_group: impl Fn(&R) -> G,
    push: impl Fn(&mut G, R),
) -> Vec<G>
where
    K: Eq + Hash,
{
    let mut groups: Vec<G> = Vec::new();
    let mut index: HashMap<K, usize> = HashMap::new();

    for row in rows {
        let slot = match index.entry(key(&row)) {
            std::collections::hash_map::Entry::Occupied(entry) => *entry.get(),
            std::collections::hash_map::Entry::Vacant(entry) => {
                groups.push(new_group(&row));
                *entry.insert(groups.len() - 1)
            }
        };
        push(&mut groups[slot], row);
    }

    groups
}

/// One flat row of the teaching-classes join (timetable × classes × subjects).
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSubjectRow {
    pub class_id: i32,
    pub class_name: String,
    pub subject_id: i32,
    pub subject_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectRef {
    #[serde(rename = "SubjectID")]
    pub subject_id: i32,
    #[serde(rename = "SubjectName")]
    pub subject_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassGroup {
    #[serde(rename = "ClassID")]
    pub class_id: i32,
    #[serde(rename = "ClassName")]
    pub class_name: String,
    #[serde(rename = "Subjects")]
    pub subjects: Vec<SubjectRef>,
}

/// Group flat (class, subject) rows into one group per distinct class, with
/// subjects listed in the order first encountered. No deduplication beyond
/// what the source query already guarantees per row.
pub fn group_class_subjects(rows: impl IntoIterator<Item = ClassSubjectRow>) -> Vec<ClassGroup> {
    fold_groups(
        rows,
        |row| row.class_id,
        |row| ClassGroup {
            class_id: row.class_id,
            class_name: row.class_name.clone(),
            subjects: Vec::new(),
        },
        |group, row| {
            group.subjects.push(SubjectRef {
                subject_id: row.subject_id,
                subject_name: row.subject_name,
            });
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(class_id: i32, class_name: &str, subject_id: i32, subject_name: &str) -> ClassSubjectRow {
        ClassSubjectRow {
            class_id,
            class_name: class_name.to_string(),
            subject_id,
            subject_name: subject_name.to_string(),
        }
    }

    #[test]
    fn test_groups_by_class_in_first_encounter_order() {
        let rows = vec![
            row(1, "A", 10, "Math"),
            row(1, "A", 11, "Sci"),
            row(2, "B", 10, "Math"),
        ];

        let groups = group_class_subjects(rows);

        assert_eq!(
            groups,
            vec![
                ClassGroup {
                    class_id: 1,
                    class_name: "A".to_string(),
                    subjects: vec![
                        SubjectRef {
                            subject_id: 10,
                            subject_name: "Math".to_string()
                        },
                        SubjectRef {
                            subject_id: 11,
                            subject_name: "Sci".to_string()
                        },
                    ],
                },
                ClassGroup {
                    class_id: 2,
                    class_name: "B".to_string(),
                    subjects: vec![SubjectRef {
                        subject_id: 10,
                        subject_name: "Math".to_string()
                    }],
                },
            ]
        );
    }

    #[test]
    fn test_interleaved_rows_keep_group_order() {
        let rows = vec![
            row(2, "B", 20, "History"),
            row(1, "A", 10, "Math"),
            row(2, "B", 21, "Geo"),
        ];

        let groups = group_class_subjects(rows);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].class_id, 2);
        assert_eq!(groups[0].subjects.len(), 2);
        assert_eq!(groups[1].class_id, 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(group_class_subjects(Vec::new()).is_empty());
    }

    #[test]
    fn test_duplicate_rows_are_not_deduplicated() {
        // Dedup is the source query's job (DISTINCT); the fold must not hide
        // duplicates it is handed.
        let rows = vec![row(1, "A", 10, "Math"), row(1, "A", 10, "Math")];
        let groups = group_class_subjects(rows);
        assert_eq!(groups[0].subjects.len(), 2);
    }
}

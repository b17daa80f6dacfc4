//! Property-based tests for the hierarchy builder
//!
//! Random activity sheets (a few objectives, a few practices, numbered or unnumbered
//! practice ids) are folded and checked against the grouping and id rules.

use govsheet::hierarchy::{build_hierarchy, ActivityRow, Objective, ObjectiveOrder};
use proptest::prelude::*;
use std::collections::BTreeSet;

/// (objective, practice, practice id carries digits)
type RowShape = (usize, usize, bool);

fn sheet_strategy() -> impl Strategy<Value = Vec<RowShape>> {
    prop::collection::vec((0usize..3, 0usize..3, any::<bool>()), 0..40)
}

fn owned_rows(shape: &[RowShape]) -> Vec<Vec<String>> {
    shape
        .iter()
        .enumerate()
        .map(|(i, &(o, p, numbered))| {
            vec![
                format!("O{o}"),
                format!("Objective {o}"),
                if numbered {
                    format!("O{o}.{}", p + 1)
                } else {
                    String::new()
                },
                format!("Practice {p}"),
                format!("{}. task {i}", p + 1),
            ]
        })
        .collect()
}

fn activity_rows(owned: &[Vec<String>]) -> Vec<ActivityRow<'_>> {
    owned
        .iter()
        .map(|r| ActivityRow {
            objective_code: &r[0],
            objective_name: &r[1],
            practice_id: &r[2],
            practice_name: &r[3],
            description: &r[4],
            ..ActivityRow::default()
        })
        .collect()
}

fn task_index(description: &str) -> usize {
    description
        .strip_prefix("task ")
        .and_then(|n| n.parse().ok())
        .expect("description keeps the task number")
}

fn find<'a>(objectives: &'a [Objective], id: &str) -> Vec<&'a Objective> {
    objectives.iter().filter(|o| o.id == id).collect()
}

proptest! {
    #[test]
    fn every_row_lands_in_exactly_one_objective(shape in sheet_strategy()) {
        let owned = owned_rows(&shape);
        let objectives = build_hierarchy(activity_rows(&owned), ObjectiveOrder::Encounter);

        let total: usize = objectives.iter().map(Objective::activity_count).sum();
        prop_assert_eq!(total, shape.len());

        for o in 0..3 {
            let expected: BTreeSet<usize> = shape
                .iter()
                .enumerate()
                .filter(|(_, s)| s.0 == o)
                .map(|(i, _)| i)
                .collect();
            let matches = find(&objectives, &format!("O{o}"));

            if expected.is_empty() {
                prop_assert!(matches.is_empty());
                continue;
            }
            prop_assert_eq!(matches.len(), 1);

            let found: BTreeSet<usize> = matches[0]
                .practices
                .iter()
                .flat_map(|p| p.activities.iter())
                .map(|a| task_index(&a.description))
                .collect();
            prop_assert_eq!(found, expected);
        }
    }

    #[test]
    fn activity_ids_follow_row_order(shape in sheet_strategy()) {
        let owned = owned_rows(&shape);
        let objectives = build_hierarchy(activity_rows(&owned), ObjectiveOrder::Encounter);

        for practice in objectives.iter().flat_map(|o| o.practices.iter()) {
            let mut previous = None;
            for (position, activity) in practice.activities.iter().enumerate() {
                prop_assert_eq!(
                    &activity.id,
                    &format!("{}-A{:02}", practice.id, position + 1)
                );
                let index = task_index(&activity.description);
                prop_assert!(previous.map_or(true, |p| p < index));
                previous = Some(index);
            }
        }
    }

    #[test]
    fn numbered_practices_take_their_digits(shape in sheet_strategy()) {
        let owned = owned_rows(&shape);
        let objectives = build_hierarchy(activity_rows(&owned), ObjectiveOrder::Encounter);

        for &(o, p, _) in shape.iter().filter(|s| s.2) {
            let objective = find(&objectives, &format!("O{o}"))[0];
            let expected_id = format!("O{o}-P{:02}", p + 1);
            let expected_name = format!("Practice {p}");
            prop_assert!(
                objective
                    .practices
                    .iter()
                    .any(|practice| practice.id == expected_id && practice.name == expected_name),
                "missing practice {} in {}",
                expected_id,
                objective.id
            );
        }
    }

    #[test]
    fn encounter_order_follows_first_appearance(shape in sheet_strategy()) {
        let owned = owned_rows(&shape);
        let objectives = build_hierarchy(activity_rows(&owned), ObjectiveOrder::Encounter);

        let mut first_seen: Vec<String> = Vec::new();
        for &(o, _, _) in &shape {
            let id = format!("O{o}");
            if !first_seen.contains(&id) {
                first_seen.push(id);
            }
        }
        let ids: Vec<String> = objectives.iter().map(|o| o.id.clone()).collect();
        prop_assert_eq!(ids, first_seen);
    }

    #[test]
    fn by_id_order_is_sorted(shape in sheet_strategy()) {
        let owned = owned_rows(&shape);
        let objectives = build_hierarchy(activity_rows(&owned), ObjectiveOrder::ById);

        let ids: Vec<String> = objectives.iter().map(|o| o.id.clone()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        prop_assert_eq!(ids, sorted);
    }
}

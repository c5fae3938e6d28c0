//! Dependency planner for the entity kinds.
//!
//! Builds the foreign-key graph from the registry and computes a creation
//! order with Kahn's algorithm. Deletion is the exact reverse, so no row is
//! removed while something still references it.

use std::collections::{BTreeSet, HashMap};

use super::registry::EntityKind;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    #[error("cyclic dependency between entity kinds: {remaining:?}")]
    CycleDetected { remaining: Vec<EntityKind> },

    #[error("{kind} references {dependency}, which is not part of the plan")]
    UnknownDependency {
        kind: EntityKind,
        dependency: EntityKind,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyPlan {
    creation: Vec<EntityKind>,
}

impl DependencyPlan {
    /// Plan for every kind of the shipped schema.
    pub fn for_schema() -> Result<Self, PlanError> {
        Self::from_edges(&EntityKind::ALL, |kind| kind.dependencies().iter().copied())
    }

    /// Order `kinds` so that each kind comes after everything `dependencies`
    /// says it references. Among kinds that are ready at the same time the
    /// one listed first in `kinds` wins.
    pub fn from_edges<F, I>(kinds: &[EntityKind], dependencies: F) -> Result<Self, PlanError>
    where
        F: Fn(EntityKind) -> I,
        I: IntoIterator<Item = EntityKind>,
    {
        let position: HashMap<EntityKind, usize> = kinds
            .iter()
            .enumerate()
            .map(|(index, &kind)| (kind, index))
            .collect();

        let mut in_degree = vec![0usize; kinds.len()];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); kinds.len()];

        for (index, &kind) in kinds.iter().enumerate() {
            let mut seen = BTreeSet::new();
            for dependency in dependencies(kind) {
                let &dep_index = position.get(&dependency).ok_or(PlanError::UnknownDependency {
                    kind,
                    dependency,
                })?;
                if seen.insert(dep_index) {
                    in_degree[index] += 1;
                    dependents[dep_index].push(index);
                }
            }
        }

        let mut ready: BTreeSet<usize> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, degree)| **degree == 0)
            .map(|(index, _)| index)
            .collect();

        let mut creation = Vec::with_capacity(kinds.len());
        while let Some(index) = ready.pop_first() {
            creation.push(kinds[index]);
            for &dependent in &dependents[index] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    ready.insert(dependent);
                }
            }
        }

        if creation.len() != kinds.len() {
            let remaining = kinds
                .iter()
                .enumerate()
                .filter(|(index, _)| in_degree[*index] > 0)
                .map(|(_, &kind)| kind)
                .collect();
            return Err(PlanError::CycleDetected { remaining });
        }

        Ok(Self { creation })
    }

    pub fn creation_order(&self) -> &[EntityKind] {
        &self.creation
    }

    pub fn deletion_order(&self) -> Vec<EntityKind> {
        self.creation.iter().rev().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use EntityKind::*;

    fn position(order: &[EntityKind], kind: EntityKind) -> usize {
        order
            .iter()
            .position(|k| *k == kind)
            .expect("kind missing from order")
    }

    #[test]
    fn creation_order_respects_every_foreign_key() {
        let plan = DependencyPlan::for_schema().unwrap();
        let order = plan.creation_order();
        assert_eq!(order.len(), EntityKind::ALL.len());

        for kind in EntityKind::ALL {
            for dependency in kind.dependencies() {
                assert!(
                    position(order, *dependency) < position(order, kind),
                    "{dependency} must be created before {kind}"
                );
            }
        }
    }

    #[test]
    fn deletion_order_matches_reference_sequence() {
        let plan = DependencyPlan::for_schema().unwrap();
        assert_eq!(
            plan.deletion_order(),
            vec![
                Result,
                Attendance,
                Exam,
                Assignment,
                Lesson,
                TeacherSubject,
                TeacherClass,
                Event,
                Announcement,
                Student,
                Parent,
                Class,
                Grade,
                Teacher,
                Subject,
                Admin,
            ]
        );
    }

    #[test]
    fn deletion_never_removes_a_referenced_kind_first() {
        let deletion = DependencyPlan::for_schema().unwrap().deletion_order();
        for kind in EntityKind::ALL {
            for dependency in kind.dependencies() {
                assert!(position(&deletion, kind) < position(&deletion, *dependency));
            }
        }
    }

    #[test]
    fn declaration_order_is_only_a_tie_breaker() {
        // Result listed first still lands after everything it references.
        let kinds = [Result, Exam, Assignment, Student, Lesson];
        let plan = DependencyPlan::from_edges(&kinds, |kind| match kind {
            Result => vec![Student, Exam, Assignment],
            Exam | Assignment => vec![Lesson],
            _ => vec![],
        })
        .unwrap();

        assert_eq!(
            plan.creation_order(),
            &[Student, Lesson, Exam, Assignment, Result]
        );
    }

    #[test]
    fn cycle_is_reported_with_the_stuck_kinds() {
        let kinds = [Admin, Grade, Class, Student];
        let err = DependencyPlan::from_edges(&kinds, |kind| match kind {
            Class => vec![Student],
            Student => vec![Class, Grade],
            _ => vec![],
        })
        .unwrap_err();

        assert_eq!(
            err,
            PlanError::CycleDetected {
                remaining: vec![Class, Student]
            }
        );
    }

    #[test]
    fn unknown_dependency_is_rejected() {
        let err = DependencyPlan::from_edges(&[Class], |kind| kind.dependencies().to_vec())
            .unwrap_err();

        assert_eq!(
            err,
            PlanError::UnknownDependency {
                kind: Class,
                dependency: Grade
            }
        );
    }

    #[test]
    fn duplicate_edges_count_once() {
        let plan = DependencyPlan::from_edges(&[Class, Grade], |kind| match kind {
            Class => vec![Grade, Grade],
            _ => vec![],
        })
        .unwrap();

        assert_eq!(plan.creation_order(), &[Grade, Class]);
    }
}

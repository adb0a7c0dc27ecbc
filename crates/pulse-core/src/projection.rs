//! Task list projection.
//!
//! Turns an already-fetched task collection into the rows to render. Three
//! refinement steps apply in a fixed order:
//!
//! 1. server-side filter ([`TaskFilters`], sent as query parameters, never
//!    applied here)
//! 2. client-side text search ([`search`])
//! 3. client-side sort ([`sort`])
//!
//! Everything in this module is pure: inputs are borrowed, the output is a new
//! vector of references in render order, and no call can fail.

use std::cmp::Ordering;
use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::collation;
use crate::entities::{Executor, Task, UserId};
use crate::enums::{SortDirection, SortField, StatusFilter, UserRole};

/// Label used for a task creator whose name the backend did not send.
pub const CREATOR_FALLBACK_LABEL: &str = "Создатель";

// ---------------------------------------------------------------------------
// Server-side filters
// ---------------------------------------------------------------------------

/// Filters passed to the server when fetching tasks. Also part of the cache key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct TaskFilters {
    #[serde(default)]
    pub status: StatusFilter,
    /// Creator-only: restrict to tasks the creator authored.
    #[serde(default)]
    pub only_mine: bool,
    /// Creator-only: restrict to one executor's tasks.
    #[serde(default)]
    pub assignee: Option<UserId>,
}

impl TaskFilters {
    /// Query parameters for `GET /tasks/`. Creator-only filters are dropped
    /// for executors.
    #[must_use]
    pub fn query_params(&self, role: Option<UserRole>) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(status) = self.status.status() {
            params.push(("status", status.as_str().to_string()));
        }
        if role == Some(UserRole::Creator) {
            if self.only_mine {
                params.push(("only_my", "true".to_string()));
            }
            if let Some(assignee) = self.assignee {
                params.push(("assignee", assignee.to_string()));
            }
        }
        params
    }

    /// Stable string form used as a cache key segment.
    #[must_use]
    pub fn cache_segment(&self) -> String {
        let assignee = self.assignee.map_or_else(|| "any".to_string(), |id| id.to_string());
        format!("status={};only_mine={};assignee={assignee}", self.status, self.only_mine)
    }
}

// ---------------------------------------------------------------------------
// Counterparties
// ---------------------------------------------------------------------------

/// The "other side" of a task from the viewer's perspective.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Counterparty {
    #[serde(default)]
    pub id: Option<UserId>,
    pub name: String,
    pub position: String,
}

/// Lookup of counterparties for the acting role.
///
/// Creators look up assignees in their executor list; executors look up
/// creators derived from the task set itself.
#[derive(Debug, Clone)]
pub struct CounterpartyDirectory {
    role: UserRole,
    executors: HashMap<UserId, Executor>,
    creators: Vec<Counterparty>,
}

impl CounterpartyDirectory {
    /// Directory for a creator, keyed by executor id.
    #[must_use]
    pub fn for_creator(executors: &[Executor]) -> Self {
        Self {
            role: UserRole::Creator,
            executors: executors.iter().map(|ex| (ex.id, ex.clone())).collect(),
            creators: Vec::new(),
        }
    }

    /// Directory for an executor: the distinct creators of `tasks`, in order of
    /// first appearance.
    #[must_use]
    pub fn for_executor(tasks: &[Task]) -> Self {
        let mut creators: Vec<Counterparty> = Vec::new();
        for task in tasks {
            let candidate = creator_of(task);
            let seen = creators.iter().any(|known| match (known.id, candidate.id) {
                (Some(a), Some(b)) => a == b,
                (None, None) => known.name == candidate.name,
                _ => false,
            });
            if !seen {
                creators.push(candidate);
            }
        }
        Self {
            role: UserRole::Executor,
            executors: HashMap::new(),
            creators,
        }
    }

    /// Directory matching `role`.
    #[must_use]
    pub fn for_role(role: UserRole, executors: &[Executor], tasks: &[Task]) -> Self {
        match role {
            UserRole::Creator => Self::for_creator(executors),
            UserRole::Executor => Self::for_executor(tasks),
        }
    }

    #[must_use]
    pub const fn role(&self) -> UserRole {
        self.role
    }

    /// Distinct creators (executor view only; empty for creators).
    #[must_use]
    pub fn creators(&self) -> &[Counterparty] {
        &self.creators
    }

    /// Resolve the counterparty shown for `task`.
    #[must_use]
    pub fn counterparty(&self, task: &Task) -> Counterparty {
        match self.role {
            UserRole::Creator => self.assignee_of(task),
            UserRole::Executor => creator_of(task),
        }
    }

    fn assignee_of(&self, task: &Task) -> Counterparty {
        let executor = task.assignee.and_then(|id| self.executors.get(&id));

        let name = executor
            .and_then(|ex| non_empty(&ex.full_name).or_else(|| non_empty(&ex.email)))
            .map(str::to_string)
            .or_else(|| task.assignee.map(|id| id.to_string()))
            .or_else(|| task.assignee_name.as_deref().and_then(non_empty).map(str::to_string))
            .unwrap_or_default();

        let position = executor
            .and_then(|ex| ex.position.as_deref())
            .and_then(non_empty)
            .or_else(|| task.assignee_position.as_deref().and_then(non_empty))
            .unwrap_or_default()
            .to_string();

        Counterparty {
            id: task.assignee,
            name,
            position,
        }
    }
}

fn creator_of(task: &Task) -> Counterparty {
    Counterparty {
        id: task.creator,
        name: task
            .creator_name
            .as_deref()
            .and_then(non_empty)
            .unwrap_or(CREATOR_FALLBACK_LABEL)
            .to_string(),
        position: task
            .creator_position
            .as_deref()
            .and_then(non_empty)
            .unwrap_or_default()
            .to_string(),
    }
}

fn non_empty(value: &str) -> Option<&str> {
    if value.trim().is_empty() { None } else { Some(value) }
}

// ---------------------------------------------------------------------------
// Search + sort
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaskSort {
    pub field: SortField,
    #[serde(default)]
    pub direction: SortDirection,
}

/// Client-side refinement of the fetched list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaskQuery {
    /// Free-text search; empty matches everything.
    #[serde(default)]
    pub search: String,
    /// `None` keeps server order.
    #[serde(default)]
    pub sort: Option<TaskSort>,
}

/// Run search then sort over `tasks`.
#[must_use]
pub fn project<'a>(
    tasks: &'a [Task],
    directory: &CounterpartyDirectory,
    query: &TaskQuery,
) -> Vec<&'a Task> {
    let mut rows = search(tasks, directory, &query.search);
    if let Some(order) = query.sort {
        sort(&mut rows, directory, order);
    }
    rows
}

/// Keep tasks whose title, description, counterparty name, or counterparty
/// position contains `query` (case-insensitive). Preserves input order.
#[must_use]
pub fn search<'a>(tasks: &'a [Task], directory: &CounterpartyDirectory, query: &str) -> Vec<&'a Task> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return tasks.iter().collect();
    }

    tasks
        .iter()
        .filter(|task| {
            let person = directory.counterparty(task);
            let haystack = format!(
                "{} {} {} {}",
                task.title,
                task.description.as_deref().unwrap_or_default(),
                person.name,
                person.position
            )
            .to_lowercase();
            haystack.trim().contains(&needle)
        })
        .collect()
}

/// Stable sort of `rows` by `order`. Equal keys keep their relative order.
pub fn sort(rows: &mut Vec<&Task>, directory: &CounterpartyDirectory, order: TaskSort) {
    let mut keyed: Vec<(SortKey, &Task)> = rows
        .iter()
        .map(|task| (SortKey::for_task(task, directory, order.field), *task))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = a.compare(b);
        match order.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    *rows = keyed.into_iter().map(|(_, task)| task).collect();
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SortKey {
    Millis(i64),
    Text(String),
}

impl SortKey {
    fn for_task(task: &Task, directory: &CounterpartyDirectory, field: SortField) -> Self {
        let text = match field {
            SortField::DueAt => return Self::Millis(task.due_millis()),
            SortField::Counterparty => directory.counterparty(task).name,
            SortField::Position => directory.counterparty(task).position,
            SortField::Title => task.title.clone(),
            SortField::Description => task.description.clone().unwrap_or_default(),
            SortField::Priority => task.priority.as_str().to_string(),
            SortField::Status => task.status.as_str().to_string(),
        };
        Self::Text(text.to_lowercase())
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Millis(a), Self::Millis(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => collation::compare(a, b),
            (Self::Millis(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Millis(_)) => Ordering::Greater,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{TaskPriority, TaskStatus};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn task(id: i64, title: &str) -> Task {
        Task {
            id,
            title: title.to_string(),
            description: None,
            priority: TaskPriority::Medium,
            status: TaskStatus::New,
            due_at: None,
            creator: Some(1),
            creator_name: None,
            creator_position: None,
            assignee: None,
            assignee_name: None,
            assignee_position: None,
            executor_comment: None,
            result_file: None,
            attachments: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    fn executor(id: i64, full_name: &str, position: &str) -> Executor {
        Executor {
            id,
            email: format!("user{id}@example.com"),
            full_name: full_name.to_string(),
            company: None,
            position: Some(position.to_string()),
            avatar: None,
        }
    }

    fn ids(rows: &[&Task]) -> Vec<i64> {
        rows.iter().map(|task| task.id).collect()
    }

    fn sample_tasks() -> Vec<Task> {
        let mut a = task(1, "A");
        a.priority = TaskPriority::Low;
        let mut b = task(2, "B");
        b.priority = TaskPriority::High;
        b.due_at = Some("2024-01-01T00:00:00Z".into());
        vec![a, b]
    }

    #[test]
    fn due_sort_puts_missing_deadline_first_ascending() {
        let tasks = sample_tasks();
        let dir = CounterpartyDirectory::for_creator(&[]);
        let asc = project(
            &tasks,
            &dir,
            &TaskQuery {
                search: String::new(),
                sort: Some(TaskSort {
                    field: SortField::DueAt,
                    direction: SortDirection::Asc,
                }),
            },
        );
        assert_eq!(ids(&asc), vec![1, 2]);

        let desc = project(
            &tasks,
            &dir,
            &TaskQuery {
                search: String::new(),
                sort: Some(TaskSort {
                    field: SortField::DueAt,
                    direction: SortDirection::Desc,
                }),
            },
        );
        assert_eq!(ids(&desc), vec![2, 1]);
    }

    #[test]
    fn malformed_deadline_sorts_like_missing() {
        let mut tasks = sample_tasks();
        tasks[1].due_at = Some("soon".into());
        tasks.push({
            let mut c = task(3, "C");
            c.due_at = Some("2023-06-01".into());
            c
        });
        let dir = CounterpartyDirectory::for_creator(&[]);
        let mut rows: Vec<&Task> = tasks.iter().collect();
        sort(
            &mut rows,
            &dir,
            TaskSort {
                field: SortField::DueAt,
                direction: SortDirection::Asc,
            },
        );
        assert_eq!(ids(&rows), vec![1, 2, 3]);
    }

    #[test]
    fn creator_search_spans_assignee_name_and_title() {
        let executors = [executor(10, "Иван Петров", "Аналитик"), executor(11, "Олег Сидоров", "Инженер")];
        let mut first = task(1, "Отчёт");
        first.assignee = Some(10);
        let mut second = task(2, "Иванов мост");
        second.assignee = Some(11);
        let mut third = task(3, "Смета");
        third.assignee = Some(11);
        let tasks = vec![first, second, third];

        let dir = CounterpartyDirectory::for_creator(&executors);
        let rows = search(&tasks, &dir, "иван");
        assert_eq!(ids(&rows), vec![1, 2]);
    }

    #[test]
    fn search_trims_and_lowercases_query() {
        let executors = [executor(10, "Иван Петров", "Аналитик")];
        let mut t = task(1, "Квартальный план");
        t.assignee = Some(10);
        let tasks = vec![t];
        let dir = CounterpartyDirectory::for_creator(&executors);
        assert_eq!(ids(&search(&tasks, &dir, "  АНАЛИТИК ")), vec![1]);
        assert!(search(&tasks, &dir, "бухгалтер").is_empty());
    }

    #[test]
    fn executor_search_matches_creator_label() {
        let mut named = task(1, "Первая");
        named.creator_name = Some("Мария Кузнецова".into());
        let unnamed = task(2, "Вторая");
        let tasks = vec![named, unnamed];

        let dir = CounterpartyDirectory::for_executor(&tasks);
        assert_eq!(ids(&search(&tasks, &dir, "мария")), vec![1]);
        assert_eq!(ids(&search(&tasks, &dir, "создатель")), vec![2]);
    }

    #[test]
    fn empty_query_keeps_everything_in_order() {
        let tasks = vec![task(3, "c"), task(1, "a"), task(2, "b")];
        let dir = CounterpartyDirectory::for_creator(&[]);
        assert_eq!(ids(&project(&tasks, &dir, &TaskQuery::default())), vec![3, 1, 2]);
    }

    #[test]
    fn search_preserves_relative_order() {
        let tasks = vec![
            task(5, "план продаж"),
            task(1, "отпуск"),
            task(4, "план закупок"),
            task(2, "ПЛАН найма"),
        ];
        let dir = CounterpartyDirectory::for_creator(&[]);
        assert_eq!(ids(&search(&tasks, &dir, "план")), vec![5, 4, 2]);
    }

    #[rstest]
    #[case(SortField::Title)]
    #[case(SortField::Priority)]
    #[case(SortField::Status)]
    #[case(SortField::DueAt)]
    #[case(SortField::Counterparty)]
    fn descending_is_reverse_of_ascending_without_ties(#[case] field: SortField) {
        let executors = [executor(10, "Борис", "b"), executor(11, "Анна", "a"), executor(12, "Виктор", "c")];
        let specs = [
            (1, "Яблоки", TaskPriority::High, TaskStatus::New, "2024-03-01", 10),
            (2, "Арбузы", TaskPriority::Low, TaskStatus::Done, "2024-01-01", 11),
            (3, "Груши", TaskPriority::Medium, TaskStatus::Overdue, "2024-02-01", 12),
        ];
        let tasks: Vec<Task> = specs
            .iter()
            .map(|(id, title, priority, status, due, assignee)| {
                let mut t = task(*id, title);
                t.priority = *priority;
                t.status = *status;
                t.due_at = Some((*due).to_string());
                t.assignee = Some(*assignee);
                t
            })
            .collect();
        let dir = CounterpartyDirectory::for_creator(&executors);

        let mut asc: Vec<&Task> = tasks.iter().collect();
        sort(&mut asc, &dir, TaskSort { field, direction: SortDirection::Asc });
        let mut desc: Vec<&Task> = tasks.iter().collect();
        sort(&mut desc, &dir, TaskSort { field, direction: SortDirection::Desc });

        let mut reversed = ids(&asc);
        reversed.reverse();
        assert_eq!(reversed, ids(&desc));
    }

    #[test]
    fn ties_keep_input_order() {
        let tasks = vec![task(3, "Same"), task(1, "same"), task(2, "SAME")];
        let dir = CounterpartyDirectory::for_creator(&[]);
        let mut rows: Vec<&Task> = tasks.iter().collect();
        sort(
            &mut rows,
            &dir,
            TaskSort {
                field: SortField::Title,
                direction: SortDirection::Desc,
            },
        );
        assert_eq!(ids(&rows), vec![3, 1, 2]);
    }

    #[test]
    fn counterparty_falls_back_to_denormalized_fields() {
        let mut t = task(1, "x");
        t.assignee = Some(99);
        t.assignee_name = Some("Пётр".into());
        t.assignee_position = Some("Курьер".into());
        let dir = CounterpartyDirectory::for_creator(&[]);
        let person = dir.counterparty(&t);
        assert_eq!(person.name, "99");
        assert_eq!(person.position, "Курьер");

        t.assignee = None;
        assert_eq!(dir.counterparty(&t).name, "Пётр");

        t.assignee_name = None;
        assert_eq!(dir.counterparty(&t).name, "");
    }

    #[test]
    fn executor_directory_collects_distinct_creators() {
        let mut a = task(1, "a");
        a.creator = Some(7);
        a.creator_name = Some("Анна".into());
        let mut b = task(2, "b");
        b.creator = Some(8);
        b.creator_name = Some("Борис".into());
        let mut c = task(3, "c");
        c.creator = Some(7);
        c.creator_name = Some("Анна".into());
        let tasks = vec![a, b, c];

        let dir = CounterpartyDirectory::for_executor(&tasks);
        let names: Vec<&str> = dir.creators().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Анна", "Борис"]);
    }

    #[test]
    fn creator_only_filters_are_dropped_for_executors() {
        let filters = TaskFilters {
            status: StatusFilter::InProgress,
            only_mine: true,
            assignee: Some(12),
        };
        assert_eq!(
            filters.query_params(Some(UserRole::Creator)),
            vec![
                ("status", "in_progress".to_string()),
                ("only_my", "true".to_string()),
                ("assignee", "12".to_string()),
            ]
        );
        assert_eq!(
            filters.query_params(Some(UserRole::Executor)),
            vec![("status", "in_progress".to_string())]
        );
        assert!(TaskFilters::default().query_params(Some(UserRole::Creator)).is_empty());
    }

    #[test]
    fn cache_segment_distinguishes_filters() {
        let a = TaskFilters::default();
        let b = TaskFilters {
            assignee: Some(3),
            ..TaskFilters::default()
        };
        assert_eq!(a.cache_segment(), "status=all;only_mine=false;assignee=any");
        assert_ne!(a.cache_segment(), b.cache_segment());
    }

    #[test]
    fn input_is_untouched() {
        let tasks = sample_tasks();
        let before = tasks.clone();
        let dir = CounterpartyDirectory::for_creator(&[]);
        let _ = project(
            &tasks,
            &dir,
            &TaskQuery {
                search: "b".into(),
                sort: Some(TaskSort {
                    field: SortField::Priority,
                    direction: SortDirection::Desc,
                }),
            },
        );
        assert_eq!(tasks, before);
    }
}

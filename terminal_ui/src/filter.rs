use std::fmt;

use taskdesk_shared::{Task, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => task.status == *status,
        }
    }

    /// all → todo → in_progress → done → all
    pub fn next(self) -> StatusFilter {
        match self {
            StatusFilter::All => StatusFilter::Only(TaskStatus::Todo),
            StatusFilter::Only(TaskStatus::Todo) => StatusFilter::Only(TaskStatus::InProgress),
            StatusFilter::Only(TaskStatus::InProgress) => StatusFilter::Only(TaskStatus::Done),
            StatusFilter::Only(TaskStatus::Done) => StatusFilter::All,
        }
    }

    /// Accepts `all` or a wire status name.
    pub fn parse(s: &str) -> Option<StatusFilter> {
        if s == "all" {
            return Some(StatusFilter::All);
        }
        TaskStatus::parse(s).map(StatusFilter::Only)
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("Tutti gli stati"),
            StatusFilter::Only(TaskStatus::Todo) => f.write_str("Da fare"),
            StatusFilter::Only(TaskStatus::InProgress) => f.write_str("In corso"),
            StatusFilter::Only(TaskStatus::Done) => f.write_str("Completati"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ClientFilter {
    #[default]
    All,
    Only(String),
}

impl ClientFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            ClientFilter::All => true,
            ClientFilter::Only(name) => task.client_name == *name,
        }
    }

    /// Steps through `clients` in order, wrapping back to `All`. A selection
    /// that is no longer among `clients` restarts from `All`.
    pub fn next(&self, clients: &[&str]) -> ClientFilter {
        let position = match self {
            ClientFilter::All => None,
            ClientFilter::Only(name) => match clients.iter().position(|c| *c == name.as_str()) {
                Some(i) => Some(i),
                None => return ClientFilter::All,
            },
        };
        let next = position.map_or(0, |i| i + 1);
        match clients.get(next) {
            Some(name) => ClientFilter::Only((*name).to_string()),
            None => ClientFilter::All,
        }
    }

    /// Drops a selection whose client no longer exists in the store.
    pub fn retain_known(&mut self, clients: &[&str]) {
        if let ClientFilter::Only(name) = self {
            if !clients.contains(&name.as_str()) {
                *self = ClientFilter::All;
            }
        }
    }

    pub fn parse(s: &str) -> ClientFilter {
        if s == "all" {
            ClientFilter::All
        } else {
            ClientFilter::Only(s.to_string())
        }
    }
}

impl fmt::Display for ClientFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientFilter::All => f.write_str("Tutti i clienti"),
            ClientFilter::Only(name) => f.write_str(name),
        }
    }
}

/// Tasks passing both filters, ordered by due date. The sort is stable;
/// tasks whose due date does not parse go last.
pub fn visible_tasks<'a>(
    tasks: &'a [Task],
    status: &StatusFilter,
    client: &ClientFilter,
) -> Vec<&'a Task> {
    let mut visible: Vec<(&Task, _)> = tasks
        .iter()
        .filter(|t| status.matches(t) && client.matches(t))
        .map(|t| (t, t.due_at()))
        .collect();
    visible.sort_by_key(|(_, due)| (due.is_none(), *due));
    visible.into_iter().map(|(t, _)| t).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fake::task;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn ids(tasks: &[&Task]) -> Vec<i64> {
        tasks.iter().map(|t| t.id).collect()
    }

    #[test]
    fn sorts_by_due_date_ascending() {
        let tasks = vec![
            task(1, "Acme", TaskStatus::Todo, "2024-03-01T00:00:00Z", 1.0),
            task(2, "Acme", TaskStatus::Todo, "2024-01-01T00:00:00Z", 1.0),
            task(3, "Acme", TaskStatus::Todo, "2024-02-01T00:00:00+02:00", 1.0),
        ];
        let visible = visible_tasks(&tasks, &StatusFilter::All, &ClientFilter::All);
        assert_eq!(ids(&visible), vec![2, 3, 1]);
    }

    #[test]
    fn dates_without_offset_sort_among_the_others() {
        let tasks = vec![
            task(1, "Acme", TaskStatus::Todo, "2024-06-01T00:00:00Z", 1.0),
            task(2, "Acme", TaskStatus::Todo, "2024-01-01", 1.0),
            task(3, "Acme", TaskStatus::Todo, "2024-02-01T10:00:00", 1.0),
        ];
        let visible = visible_tasks(&tasks, &StatusFilter::All, &ClientFilter::All);
        assert_eq!(ids(&visible), vec![2, 3, 1]);
    }

    #[test]
    fn ties_and_bad_dates_keep_store_order() {
        let tasks = vec![
            task(1, "Acme", TaskStatus::Todo, "garbage", 1.0),
            task(2, "Acme", TaskStatus::Todo, "2024-01-01T00:00:00Z", 1.0),
            task(3, "Acme", TaskStatus::Todo, "", 1.0),
            task(4, "Acme", TaskStatus::Todo, "2024-01-01T00:00:00Z", 1.0),
        ];
        let visible = visible_tasks(&tasks, &StatusFilter::All, &ClientFilter::All);
        assert_eq!(ids(&visible), vec![2, 4, 1, 3]);
    }

    #[test]
    fn filters_on_both_dimensions() {
        let tasks = vec![
            task(1, "Acme", TaskStatus::Todo, "2024-01-01T00:00:00Z", 1.0),
            task(2, "Acme", TaskStatus::Done, "2024-01-01T00:00:00Z", 1.0),
            task(3, "Globex", TaskStatus::Todo, "2024-01-01T00:00:00Z", 1.0),
        ];
        let visible = visible_tasks(
            &tasks,
            &StatusFilter::Only(TaskStatus::Todo),
            &ClientFilter::Only("Acme".into()),
        );
        assert_eq!(ids(&visible), vec![1]);
    }

    #[test]
    fn status_filter_cycles_back_to_all() {
        let mut filter = StatusFilter::All;
        let mut seen = vec![];
        for _ in 0..4 {
            filter = filter.next();
            seen.push(filter);
        }
        assert_eq!(
            seen,
            vec![
                StatusFilter::Only(TaskStatus::Todo),
                StatusFilter::Only(TaskStatus::InProgress),
                StatusFilter::Only(TaskStatus::Done),
                StatusFilter::All,
            ]
        );
        assert_eq!(StatusFilter::parse("in_progress"), Some(StatusFilter::Only(TaskStatus::InProgress)));
        assert_eq!(StatusFilter::parse("blocked"), None);
    }

    #[test]
    fn client_filter_cycles_through_observed_clients() {
        let clients = ["Acme", "Globex"];
        let first = ClientFilter::All.next(&clients);
        assert_eq!(first, ClientFilter::Only("Acme".into()));
        let second = first.next(&clients);
        assert_eq!(second, ClientFilter::Only("Globex".into()));
        assert_eq!(second.next(&clients), ClientFilter::All);
        assert_eq!(ClientFilter::Only("Gone".into()).next(&clients), ClientFilter::All);
    }

    #[test]
    fn retain_known_resets_a_vanished_client() {
        let mut filter = ClientFilter::Only("Gone".into());
        filter.retain_known(&["Acme"]);
        assert_eq!(filter, ClientFilter::All);
    }

    fn arb_status() -> impl Strategy<Value = TaskStatus> {
        prop_oneof![
            Just(TaskStatus::Todo),
            Just(TaskStatus::InProgress),
            Just(TaskStatus::Done)
        ]
    }

    fn arb_due() -> impl Strategy<Value = String> {
        prop_oneof![
            (2020i32..2030, 1u32..13, 1u32..29)
                .prop_map(|(y, m, d)| format!("{y:04}-{m:02}-{d:02}T00:00:00Z")),
            Just("not a date".to_string()),
            Just(String::new()),
        ]
    }

    fn arb_tasks() -> impl Strategy<Value = Vec<Task>> {
        prop::collection::vec(
            (arb_status(), prop_oneof![Just("Acme"), Just("Globex"), Just("Initech")], arb_due()),
            0..20,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (status, client, due))| task(i as i64, client, status, &due, 1.0))
                .collect()
        })
    }

    fn arb_status_filter() -> impl Strategy<Value = StatusFilter> {
        prop_oneof![Just(StatusFilter::All), arb_status().prop_map(StatusFilter::Only)]
    }

    fn arb_client_filter() -> impl Strategy<Value = ClientFilter> {
        prop_oneof![
            Just(ClientFilter::All),
            Just(ClientFilter::Only("Acme".into())),
            Just(ClientFilter::Only("Nobody".into())),
        ]
    }

    proptest! {
        #[test]
        fn every_visible_task_passes_both_filters(
            tasks in arb_tasks(),
            status in arb_status_filter(),
            client in arb_client_filter(),
        ) {
            for t in visible_tasks(&tasks, &status, &client) {
                prop_assert!(status == StatusFilter::All || StatusFilter::Only(t.status) == status);
                prop_assert!(client == ClientFilter::All || ClientFilter::Only(t.client_name.clone()) == client);
            }
        }

        #[test]
        fn visible_tasks_are_non_decreasing_by_due_date(
            tasks in arb_tasks(),
            status in arb_status_filter(),
        ) {
            let visible = visible_tasks(&tasks, &status, &ClientFilter::All);
            let keys: Vec<_> = visible.iter().map(|t| (t.due_at().is_none(), t.due_at())).collect();
            prop_assert!(keys.windows(2).all(|w| w[0] <= w[1]));
        }

        #[test]
        fn filtering_never_invents_or_drops_matching_tasks(tasks in arb_tasks()) {
            let visible = visible_tasks(&tasks, &StatusFilter::All, &ClientFilter::All);
            prop_assert_eq!(visible.len(), tasks.len());
        }
    }
}

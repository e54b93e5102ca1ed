//! In-memory task collection and the request/outcome cycle that keeps it in
//! step with the remote API.
//!
//! Every mutation goes through three stages: the store *plans* a [`Command`]
//! (or decides nothing needs to happen), the command is *executed* against a
//! [`TaskApi`] producing an [`Outcome`], and the outcome is *applied* back to
//! the store. Local state only changes when an outcome reports success.

use std::collections::HashSet;

use indexmap::IndexSet;
use taskdesk_shared::{NewTask, Task, TaskId, TaskStatus};

use crate::api::TaskApi;

pub const DELETE_PROMPT: &str = "Sei sicuro di voler eliminare questo task?";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Load,
    Create(NewTask),
    Update(Task),
    Delete(TaskId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Loaded(Vec<Task>),
    LoadFailed,
    Created(Task),
    CreateFailed,
    Updated(Task),
    UpdateFailed(TaskId),
    Deleted(TaskId),
    DeleteFailed(TaskId),
}

/// Runs a command against the API. Failures are logged here and reported as
/// the matching `*Failed` outcome.
pub async fn execute(api: &dyn TaskApi, command: Command) -> Outcome {
    match command {
        Command::Load => match api.list().await {
            Ok(tasks) => {
                log::info!("loaded {} tasks", tasks.len());
                Outcome::Loaded(tasks)
            }
            Err(err) => {
                log::error!("failed to load tasks: {err}");
                Outcome::LoadFailed
            }
        },
        Command::Create(draft) => match api.create(&draft).await {
            Ok(task) => {
                log::info!("created task {} {:?}", task.id, task.title);
                Outcome::Created(task)
            }
            Err(err) => {
                log::error!("failed to create task {:?}: {err}", draft.title);
                Outcome::CreateFailed
            }
        },
        Command::Update(task) => {
            let id = task.id;
            match api.update(&task).await {
                Ok(()) => {
                    log::info!("task {id} is now {}", task.status.as_str());
                    Outcome::Updated(task)
                }
                Err(err) => {
                    log::error!("failed to update task {id}: {err}");
                    Outcome::UpdateFailed(id)
                }
            }
        }
        Command::Delete(id) => match api.delete(id).await {
            Ok(()) => {
                log::info!("deleted task {id}");
                Outcome::Deleted(id)
            }
            Err(err) => {
                log::error!("failed to delete task {id}: {err}");
                Outcome::DeleteFailed(id)
            }
        },
    }
}

/// A delete waiting for the user's answer. Dropping it cancels the delete.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteRequest {
    id: TaskId,
    title: String,
}

impl DeleteRequest {
    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn prompt(&self) -> &'static str {
        DELETE_PROMPT
    }

    pub fn confirm(self) -> ConfirmedDelete {
        ConfirmedDelete { id: self.id }
    }
}

/// Proof that the user agreed to delete a task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfirmedDelete {
    id: TaskId,
}

impl ConfirmedDelete {
    pub fn id(&self) -> TaskId {
        self.id
    }
}

#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    in_flight: HashSet<TaskId>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            in_flight: HashSet::new(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Whether an update or delete for `id` has been sent and not answered.
    pub fn is_in_flight(&self, id: TaskId) -> bool {
        self.in_flight.contains(&id)
    }

    /// Distinct client names in the order they first appear.
    pub fn client_names(&self) -> Vec<&str> {
        self.tasks
            .iter()
            .map(|t| t.client_name.as_str())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// `None` when the task is missing, already done, or already being updated.
    pub fn plan_mark_done(&mut self, id: TaskId) -> Option<Command> {
        if self.in_flight.contains(&id) {
            log::debug!("task {id} already has a request in flight");
            return None;
        }
        let task = self.get(id).filter(|t| !t.is_done())?;
        let updated = task.with_status(TaskStatus::Done);
        self.in_flight.insert(id);
        Some(Command::Update(updated))
    }

    pub fn request_delete(&self, id: TaskId) -> Option<DeleteRequest> {
        if self.in_flight.contains(&id) {
            return None;
        }
        self.get(id).map(|t| DeleteRequest {
            id,
            title: t.title.clone(),
        })
    }

    pub fn plan_delete(&mut self, confirmed: ConfirmedDelete) -> Option<Command> {
        let id = confirmed.id;
        if self.in_flight.contains(&id) || self.get(id).is_none() {
            return None;
        }
        self.in_flight.insert(id);
        Some(Command::Delete(id))
    }

    /// Folds an outcome into the store. Returns whether the task list changed.
    pub fn apply(&mut self, outcome: Outcome) -> bool {
        match outcome {
            Outcome::Loaded(tasks) => {
                self.tasks = tasks;
                true
            }
            Outcome::Created(task) => {
                match self.tasks.iter_mut().find(|t| t.id == task.id) {
                    Some(existing) => *existing = task,
                    None => self.tasks.push(task),
                }
                true
            }
            Outcome::Updated(task) => {
                self.in_flight.remove(&task.id);
                match self.tasks.iter_mut().find(|t| t.id == task.id) {
                    Some(existing) => {
                        *existing = task;
                        true
                    }
                    None => false,
                }
            }
            Outcome::Deleted(id) => {
                self.in_flight.remove(&id);
                let before = self.tasks.len();
                self.tasks.retain(|t| t.id != id);
                self.tasks.len() != before
            }
            Outcome::UpdateFailed(id) | Outcome::DeleteFailed(id) => {
                self.in_flight.remove(&id);
                false
            }
            Outcome::LoadFailed | Outcome::CreateFailed => false,
        }
    }

    pub async fn load(&mut self, api: &dyn TaskApi) -> bool {
        let outcome = execute(api, Command::Load).await;
        self.apply(outcome)
    }

    pub async fn create(&mut self, api: &dyn TaskApi, draft: NewTask) -> Option<TaskId> {
        match execute(api, Command::Create(draft)).await {
            Outcome::Created(task) => {
                let id = task.id;
                self.apply(Outcome::Created(task));
                Some(id)
            }
            other => {
                self.apply(other);
                None
            }
        }
    }

    pub async fn mark_done(&mut self, api: &dyn TaskApi, id: TaskId) -> bool {
        let Some(command) = self.plan_mark_done(id) else {
            return false;
        };
        let outcome = execute(api, command).await;
        self.apply(outcome)
    }

    pub async fn delete(&mut self, api: &dyn TaskApi, confirmed: ConfirmedDelete) -> bool {
        let Some(command) = self.plan_delete(confirmed) else {
            return false;
        };
        let outcome = execute(api, command).await;
        self.apply(outcome)
    }
}

//! Resolving referenced user ids into display strings.
//!
//! One bulk user listing is fetched per load. Ids missing from it are looked
//! up individually, each unique id once, with bounded concurrency. The first
//! expired session stops any further lookup from being issued.

use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::models::{EntityId, User};
use crate::services::UserService;
use crate::session::SessionGuard;

pub const UNASSIGNED: &str = "No asignado";
pub const LOAD_FAILED: &str = "Error al cargar";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(String),
    /// Row carries no user id
    Unassigned,
    /// Lookup failed or the session expired mid-pass
    Failed,
}

impl Resolution {
    pub fn display(&self) -> &str {
        match self {
            Resolution::Resolved(value) => value,
            Resolution::Unassigned => UNASSIGNED,
            Resolution::Failed => LOAD_FAILED,
        }
    }

    pub fn into_display(self) -> String {
        match self {
            Resolution::Resolved(value) => value,
            other => other.display().to_string(),
        }
    }
}

/// Users from the bulk listing, by id
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    by_id: HashMap<EntityId, User>,
}

impl UserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            by_id: users.into_iter().map(|u| (u.id, u)).collect(),
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&User> {
        self.by_id.get(&id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Per-row resolutions, in the order the rows were given
#[derive(Debug, Clone, Default)]
pub struct EnrichmentPass {
    pub resolutions: Vec<Vec<Resolution>>,
    pub lookups_issued: usize,
    pub session_expired: bool,
}

pub struct Enricher<'a> {
    guard: &'a SessionGuard,
    users: &'a UserService,
    concurrency: usize,
}

impl<'a> Enricher<'a> {
    pub fn new(guard: &'a SessionGuard, users: &'a UserService, concurrency: usize) -> Self {
        Self {
            guard,
            users,
            concurrency: concurrency.max(1),
        }
    }

    /// `refs[i]` holds the user ids row `i` references (one per display column).
    pub async fn resolve<R>(
        &self,
        refs: &[Vec<Option<EntityId>>],
        directory: &UserDirectory,
        report_error: R,
        context_message: &str,
    ) -> EnrichmentPass
    where
        R: Fn(&str),
    {
        let missing = missing_ids(refs, directory);
        let cancelled = AtomicBool::new(false);
        let issued = std::sync::atomic::AtomicUsize::new(0);

        let looked_up: HashMap<EntityId, Resolution> = {
            let cancelled = &cancelled;
            let issued = &issued;
            let report_error = &report_error;
            stream::iter(missing)
                .map(|id| async move {
                    if cancelled.load(Ordering::SeqCst) {
                        return (id, Resolution::Failed);
                    }
                    issued.fetch_add(1, Ordering::SeqCst);
                    let result = self
                        .guard
                        .safe_request(|| self.users.get(id), |msg| report_error(msg), context_message)
                        .await;
                    match result {
                        Ok(Some(user)) => (id, Resolution::Resolved(user.email)),
                        Ok(None) => {
                            cancelled.store(true, Ordering::SeqCst);
                            (id, Resolution::Failed)
                        }
                        Err(e) => {
                            tracing::warn!(user_id = id, error = %e, "User lookup failed");
                            (id, Resolution::Failed)
                        }
                    }
                })
                .buffered(self.concurrency)
                .collect::<Vec<_>>()
                .await
                .into_iter()
                .collect()
        };

        let resolutions = refs
            .iter()
            .map(|row| {
                row.iter()
                    .map(|user_id| match user_id {
                        None => Resolution::Unassigned,
                        Some(id) => match directory.get(*id) {
                            Some(user) => Resolution::Resolved(user.email.clone()),
                            None => looked_up.get(id).cloned().unwrap_or(Resolution::Failed),
                        },
                    })
                    .collect()
            })
            .collect();

        EnrichmentPass {
            resolutions,
            lookups_issued: issued.load(Ordering::SeqCst),
            session_expired: cancelled.load(Ordering::SeqCst),
        }
    }
}

/// Ids referenced by some row but absent from the directory, first-seen order
fn missing_ids(refs: &[Vec<Option<EntityId>>], directory: &UserDirectory) -> Vec<EntityId> {
    let mut seen = HashSet::new();
    refs.iter()
        .flatten()
        .flatten()
        .copied()
        .filter(|id| directory.get(*id).is_none())
        .filter(|id| seen.insert(*id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: EntityId, email: &str) -> User {
        User {
            id,
            email: email.to_string(),
            role: None,
            is_active: None,
        }
    }

    #[test]
    fn missing_ids_are_unique_and_ordered() {
        let directory = UserDirectory::new(vec![user(1, "a@x.com")]);
        let refs = vec![
            vec![Some(3), Some(1)],
            vec![None, Some(2)],
            vec![Some(3), Some(2)],
        ];
        assert_eq!(missing_ids(&refs, &directory), vec![3, 2]);
    }

    #[test]
    fn display_strings() {
        assert_eq!(Resolution::Unassigned.display(), "No asignado");
        assert_eq!(Resolution::Failed.display(), "Error al cargar");
        assert_eq!(Resolution::Resolved("a@x.com".into()).into_display(), "a@x.com");
    }
}

//! List screen state and its load/delete workflow.

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use super::decode::decode_collection;
use super::enrich::{Enricher, UserDirectory};
use super::pager::Pager;
use super::resources::ListResource;
use crate::config::ListingConfig;
use crate::error::ApiError;
use crate::models::{EntityId, Record};
use crate::services::UserService;
use crate::session::{SessionContext, SessionGuard};

/// Everything a list view renders. `items` is the raw page and drives
/// pagination; `rows` are the enriched copies for display.
#[derive(Debug, Clone, Serialize)]
pub struct ListState<I, W> {
    pub items: Vec<I>,
    pub rows: Vec<W>,
    pub pager: Pager,
    pub loading: bool,
    pub error: Option<String>,
    pub delete_error: Option<String>,
}

impl<I, W> ListState<I, W> {
    fn new(pager: Pager) -> Self {
        Self {
            items: Vec::new(),
            rows: Vec::new(),
            pager,
            loading: false,
            error: None,
            delete_error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { rows: usize },
    /// No request issued, the user is not logged in
    NotAuthenticated,
    /// The guard took over; state already carries the message
    SessionExpired,
    Failed,
    /// A newer load started before this one finished; results dropped
    Stale,
    /// Page change requested past either end
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Removed,
    /// Backend no longer had the row; the list was reloaded
    Resynced,
    SessionExpired,
    Failed,
}

pub struct ListScreen<R: ListResource> {
    resource: R,
    session: SessionContext,
    guard: SessionGuard,
    users: UserService,
    bulk_user_limit: u32,
    lookup_concurrency: usize,
    state: Mutex<ListState<R::Item, R::Row>>,
    generation: AtomicU64,
}

impl<R: ListResource> ListScreen<R> {
    pub fn new(
        resource: R,
        session: SessionContext,
        guard: SessionGuard,
        users: UserService,
        config: &ListingConfig,
    ) -> Self {
        Self {
            resource,
            session,
            guard,
            users,
            bulk_user_limit: config.bulk_user_limit,
            lookup_concurrency: config.lookup_concurrency,
            state: Mutex::new(ListState::new(Pager::new(config.page_size))),
            generation: AtomicU64::new(0),
        }
    }

    pub fn with_pager(self, pager: Pager) -> Self {
        self.state.lock().pager = pager;
        self
    }

    pub fn state(&self) -> ListState<R::Item, R::Row> {
        self.state.lock().clone()
    }

    pub fn rows(&self) -> Vec<R::Row> {
        self.state.lock().rows.clone()
    }

    pub fn items(&self) -> Vec<R::Item> {
        self.state.lock().items.clone()
    }

    pub fn pager(&self) -> Pager {
        self.state.lock().pager
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    pub fn delete_error(&self) -> Option<String> {
        self.state.lock().delete_error.clone()
    }

    pub fn dismiss_delete_error(&self) {
        self.state.lock().delete_error = None;
    }

    /// Fetch the current page and rebuild the display rows
    pub async fn load(&self) -> LoadOutcome {
        let messages = *self.resource.messages();

        if !self.session.is_authenticated() {
            // anything still in flight must not overwrite the prompt
            self.generation.fetch_add(1, Ordering::SeqCst);
            let mut state = self.state.lock();
            state.loading = false;
            state.error = Some(messages.not_authenticated.to_string());
            return LoadOutcome::NotAuthenticated;
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (skip, limit) = {
            let mut state = self.state.lock();
            state.loading = true;
            state.error = None;
            (state.pager.skip, state.pager.limit)
        };
        tracing::debug!(generation, skip, limit, "Loading list page");

        let report = |msg: &str| {
            self.update_if_current(generation, |state| state.error = Some(msg.to_string()));
        };

        let page = match self
            .guard
            .safe_request(|| self.resource.fetch_page(skip, limit), &report, messages.session_expired)
            .await
        {
            Ok(Some(page)) => page,
            Ok(None) => {
                self.update_if_current(generation, |state| state.loading = false);
                return LoadOutcome::SessionExpired;
            }
            Err(e) => {
                tracing::warn!(error = %e, code = e.error_code(), "List page failed to load");
                self.update_if_current(generation, |state| {
                    state.loading = false;
                    state.error = Some(messages.for_load(&e));
                });
                return LoadOutcome::Failed;
            }
        };

        let directory = if self.resource.needs_user_directory() {
            match self
                .guard
                .safe_request(|| self.users.list(0, self.bulk_user_limit), &report, messages.session_expired)
                .await
            {
                Ok(Some(users)) => UserDirectory::new(users),
                Ok(None) => {
                    self.update_if_current(generation, |state| state.loading = false);
                    return LoadOutcome::SessionExpired;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Bulk user listing failed, falling back to per-row lookups");
                    UserDirectory::default()
                }
            }
        } else {
            UserDirectory::default()
        };

        let items: Vec<R::Item> = match decode_collection(page, self.resource.collection_field()) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(error = %e, "Treating undecodable page as empty");
                Vec::new()
            }
        };

        let refs: Vec<_> = items.iter().map(|item| self.resource.user_refs(item)).collect();
        let pass = Enricher::new(&self.guard, &self.users, self.lookup_concurrency)
            .resolve(&refs, &directory, &report, messages.session_expired)
            .await;
        tracing::debug!(
            rows = items.len(),
            directory = directory.len(),
            lookups = pass.lookups_issued,
            session_expired = pass.session_expired,
            "Enriched list page"
        );

        let rows: Vec<R::Row> = items
            .iter()
            .zip(pass.resolutions.iter())
            .map(|(item, resolved)| self.resource.to_row(item, resolved))
            .collect();
        let count = rows.len();

        let committed = self.update_if_current(generation, move |state| {
            state.pager.record_page(items.len());
            state.items = items;
            state.rows = rows;
            state.loading = false;
        });

        if committed {
            LoadOutcome::Loaded { rows: count }
        } else {
            tracing::debug!(generation, "Discarding stale list load");
            LoadOutcome::Stale
        }
    }

    pub async fn next_page(&self) -> LoadOutcome {
        if !self.state.lock().pager.advance() {
            return LoadOutcome::Unchanged;
        }
        self.load().await
    }

    pub async fn previous_page(&self) -> LoadOutcome {
        if !self.state.lock().pager.back() {
            return LoadOutcome::Unchanged;
        }
        self.load().await
    }

    /// Delete a row. Success drops it locally without a reload; a 404 means
    /// the list is out of date, so it is reloaded.
    pub async fn delete(&self, id: EntityId) -> DeleteOutcome {
        let messages = *self.resource.messages();
        self.state.lock().delete_error = None;

        let result = self
            .guard
            .safe_request(
                || self.resource.delete(id),
                |msg| self.state.lock().delete_error = Some(msg.to_string()),
                messages.session_expired,
            )
            .await;

        match result {
            Ok(Some(())) => {
                self.remove_local(id);
                tracing::info!(id, "Row deleted");
                DeleteOutcome::Removed
            }
            Ok(None) => DeleteOutcome::SessionExpired,
            Err(ApiError::NotFound(_)) => {
                tracing::info!(id, "Row already gone, reloading list");
                self.remove_local(id);
                self.load().await;
                DeleteOutcome::Resynced
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "Delete failed");
                self.state.lock().delete_error = Some(messages.for_delete(&e));
                DeleteOutcome::Failed
            }
        }
    }

    fn remove_local(&self, id: EntityId) {
        let mut state = self.state.lock();
        state.items.retain(|item| item.id() != id);
        state.rows.retain(|row| row.id() != id);
    }

    /// Apply `f` only while `generation` is still the latest load
    fn update_if_current<F>(&self, generation: u64, f: F) -> bool
    where
        F: FnOnce(&mut ListState<R::Item, R::Row>),
    {
        let mut state = self.state.lock();
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        f(&mut state);
        true
    }
}

//! Host loop feeding a stream of updates to the router.
//!
//! Each update runs as its own task: the user is loaded (or created in the
//! initial state on first contact), routed, and the resulting state logged.
//! By default updates for the same user run concurrently and their state
//! writes race; [`DispatchConfig::serialize_per_user`] queues them behind a
//! per-user lock instead.

mod config;

pub use config::{ConfigError, DispatchConfig, ENV_MAX_IN_FLIGHT, ENV_SERIALIZE_PER_USER};

use crate::collab::UserStore;
use crate::core::UserId;
use crate::router::Router;
use crate::update::Update;
use dashmap::DashMap;
use futures::{Stream, StreamExt};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, OwnedSemaphorePermit, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

type LockMap = DashMap<UserId, Arc<Mutex<()>>>;

/// Runs one task per update against a shared [`Router`].
pub struct Dispatcher {
    router: Arc<Router>,
    config: DispatchConfig,
    locks: Arc<LockMap>,
    permits: Option<Arc<Semaphore>>,
}

impl Dispatcher {
    pub fn new(router: Arc<Router>, config: DispatchConfig) -> Self {
        let permits = config
            .in_flight_limit()
            .map(|limit| Arc::new(Semaphore::new(limit)));
        Self {
            router,
            config,
            locks: Arc::new(LockMap::new()),
            permits,
        }
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Consume `updates` until the stream ends or `shutdown` fires, then
    /// wait for in-flight updates. Returns the number of updates dispatched.
    pub async fn run<S>(&self, mut updates: S, shutdown: CancellationToken) -> usize
    where
        S: Stream<Item = Update> + Unpin,
    {
        let mut tasks = JoinSet::new();
        let mut dispatched = 0usize;

        loop {
            let update = tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    tracing::info!("Shutdown requested; no longer accepting updates");
                    break;
                }
                Some(finished) = tasks.join_next(), if !tasks.is_empty() => {
                    report(finished);
                    continue;
                }
                next = updates.next() => match next {
                    Some(update) => update,
                    None => break,
                },
            };

            let permit = match &self.permits {
                Some(semaphore) => tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => break,
                    permit = Arc::clone(semaphore).acquire_owned() => permit.ok(),
                },
                None => None,
            };

            tasks.spawn(self.handle_task(update, permit));
            dispatched += 1;
        }

        if !tasks.is_empty() {
            tracing::info!(in_flight = tasks.len(), "Waiting for in-flight updates");
        }
        while let Some(finished) = tasks.join_next().await {
            report(finished);
        }
        dispatched
    }

    /// Load or create the user and route one update.
    pub async fn handle(&self, update: Update) {
        let lock = self.lock_for(update.user_id);
        process(Arc::clone(&self.router), lock, update).await;
    }

    fn handle_task(
        &self,
        update: Update,
        permit: Option<OwnedSemaphorePermit>,
    ) -> impl std::future::Future<Output = ()> + Send + 'static {
        let router = Arc::clone(&self.router);
        let lock = self.lock_for(update.user_id);
        async move {
            let _permit = permit;
            process(router, lock, update).await;
        }
    }

    fn lock_for(&self, user: UserId) -> Option<UserLock> {
        self.config.serialize_per_user.then(|| {
            let mutex = self
                .locks
                .entry(user)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone();
            UserLock {
                locks: Arc::clone(&self.locks),
                user,
                mutex: Some(mutex),
            }
        })
    }
}

/// A claim on one user's lock. The map entry is forgotten when the last
/// claim drops, whether or not it ever acquired the lock.
struct UserLock {
    locks: Arc<LockMap>,
    user: UserId,
    mutex: Option<Arc<Mutex<()>>>,
}

impl UserLock {
    async fn acquire(self) -> UserGuard {
        let guard = match self.mutex.clone() {
            Some(mutex) => Some(mutex.lock_owned().await),
            None => None,
        };
        UserGuard {
            _guard: guard,
            _claim: self,
        }
    }
}

impl Drop for UserLock {
    fn drop(&mut self) {
        drop(self.mutex.take());
        // Every live claim holds a clone; the map's alone means idle.
        self.locks
            .remove_if(&self.user, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

/// Fields drop in order: the lock is released before the claim is.
struct UserGuard {
    _guard: Option<OwnedMutexGuard<()>>,
    _claim: UserLock,
}

async fn process(router: Arc<Router>, lock: Option<UserLock>, update: Update) {
    let _guard = match lock {
        Some(lock) => Some(lock.acquire().await),
        None => None,
    };

    let mut user = match router
        .store()
        .get_or_create(update.user_id, &update.sender)
        .await
    {
        Ok(user) => user,
        Err(err) => {
            tracing::warn!(user_id = %update.user_id, error = %err, "Failed to load user; dropping update");
            return;
        }
    };

    router.route_update(&mut user, &update).await;
    tracing::info!(user_id = %user.user_id, state = %user.state, "Update handled");
}

fn report(finished: Result<(), JoinError>) {
    if let Err(err) = finished {
        tracing::error!(error = %err, "Update task failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::memory::{MemoryMessenger, MemoryUserStore};
    use crate::core::{State, Transition};
    use crate::handler::{EntryHandler, HandlerRegistry};

    fn onboarding() -> (Dispatcher, Arc<MemoryUserStore>) {
        let store = Arc::new(MemoryUserStore::new());
        let handlers = HandlerRegistry::new()
            .register(State::Empty, EntryHandler::new(Transition::EmptyToNewUser))
            .register(State::NewUser, EntryHandler::new(Transition::NewUserToSelectRole))
            .register(State::SelectRole, EntryHandler::new(Transition::SelectRoleToMainMenu));
        let router = Router::new(handlers, store.clone(), Arc::new(MemoryMessenger::new()));
        (
            Dispatcher::new(Arc::new(router), DispatchConfig::default()),
            store,
        )
    }

    #[tokio::test]
    async fn first_contact_creates_user_and_routes() {
        let (dispatcher, store) = onboarding();

        dispatcher.handle(Update::message(UserId(3), "/start")).await;

        assert_eq!(store.state_of(UserId(3)), Some(State::NewUser.to_string()));
    }

    #[tokio::test]
    async fn run_drains_stream() {
        let (dispatcher, store) = onboarding();
        let updates = futures::stream::iter(vec![
            Update::message(UserId(1), "/start"),
            Update::message(UserId(2), "/start"),
        ]);

        let dispatched = dispatcher.run(updates, CancellationToken::new()).await;

        assert_eq!(dispatched, 2);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn cancelled_token_stops_intake() {
        let (dispatcher, store) = onboarding();
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        let dispatched = dispatcher
            .run(futures::stream::pending::<Update>(), shutdown)
            .await;

        assert_eq!(dispatched, 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn serialized_updates_apply_in_order() {
        let (dispatcher, store) = onboarding();
        let dispatcher = Dispatcher::new(
            Arc::clone(dispatcher.router()),
            DispatchConfig {
                serialize_per_user: true,
                max_in_flight: Some(2),
            },
        );
        let updates = futures::stream::iter(
            (0..3).map(|_| Update::message(UserId(9), "next")).collect::<Vec<_>>(),
        );

        dispatcher.run(updates, CancellationToken::new()).await;

        assert_eq!(store.state_of(UserId(9)), Some(State::MainMenu.to_string()));
        assert_eq!(store.writes(), 3);
    }

    #[tokio::test]
    async fn per_user_locks_are_released_after_drain() {
        let (dispatcher, store) = onboarding();
        let dispatcher = Dispatcher::new(
            Arc::clone(dispatcher.router()),
            DispatchConfig {
                serialize_per_user: true,
                max_in_flight: None,
            },
        );
        let updates = futures::stream::iter(
            (0..200)
                .flat_map(|id| [Update::message(UserId(id), "a"), Update::message(UserId(id), "b")])
                .collect::<Vec<_>>(),
        );

        let dispatched = dispatcher.run(updates, CancellationToken::new()).await;

        assert_eq!(dispatched, 400);
        assert_eq!(store.len(), 200);
        assert!(dispatcher.locks.is_empty());
    }

    #[tokio::test]
    async fn lock_is_kept_while_another_update_waits() {
        let (dispatcher, _store) = onboarding();
        let dispatcher = Dispatcher::new(
            Arc::clone(dispatcher.router()),
            DispatchConfig {
                serialize_per_user: true,
                max_in_flight: None,
            },
        );

        let first = dispatcher.lock_for(UserId(5)).unwrap();
        let waiting = dispatcher.lock_for(UserId(5)).unwrap();
        let guard = first.acquire().await;
        drop(guard);
        assert_eq!(dispatcher.locks.len(), 1);

        drop(waiting.acquire().await);
        assert!(dispatcher.locks.is_empty());
    }

    #[tokio::test]
    async fn abandoned_claim_releases_lock() {
        let (dispatcher, _store) = onboarding();
        let dispatcher = Dispatcher::new(
            Arc::clone(dispatcher.router()),
            DispatchConfig {
                serialize_per_user: true,
                max_in_flight: None,
            },
        );

        drop(dispatcher.lock_for(UserId(6)));

        assert!(dispatcher.locks.is_empty());
    }
}

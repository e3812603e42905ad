//! Immutable view descriptors, one per CRUD verb.
//!
//! A descriptor bundles everything one endpoint needs: its guard chain,
//! and the optional behaviors the verb supports (custom queryset or getter,
//! pre-/post-save hooks). Descriptors are plain values built once at
//! startup; a [`Resource`](crate::viewset::resource::Resource) turns them
//! into routes.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use snapdex_core::pagination::{Listing, PageParams};
use snapdex_core::types::DbId;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::viewset::guard::Guard;
use crate::viewset::resource::{FetchSource, ListSource, ViewResource, WriteSource};

/// Custom queryset producer for a listing view. Receives the caller, the
/// parent id when nested, the decoded filter, and the page parameters.
pub type ListQuerysetFn<R> = Arc<
    dyn Fn(
            AppState,
            AuthUser,
            Option<DbId>,
            <R as ListSource>::Filter,
            PageParams,
        ) -> BoxFuture<'static, Result<Listing<<R as ViewResource>::Record>, AppError>>
        + Send
        + Sync,
>;

/// Custom single-record getter for a retrieve view.
pub type GetterFn<R> = Arc<
    dyn Fn(
            AppState,
            AuthUser,
            DbId,
        ) -> BoxFuture<'static, Result<Option<<R as ViewResource>::Record>, AppError>>
        + Send
        + Sync,
>;

/// Pre-save hook: runs after decode, before persist, to set derived fields
/// (creator, parent key) the client must not set directly. Receives the
/// parent id on nested creates.
pub type PreSaveFn<R> =
    Arc<dyn Fn(&AuthUser, Option<DbId>, &mut <R as WriteSource>::Draft) + Send + Sync>;

/// Post-save hook: runs after persist, before encode (e.g. notifications).
pub type PostSaveFn<R> = Arc<
    dyn Fn(
            AppState,
            AuthUser,
            <R as ViewResource>::Record,
        ) -> BoxFuture<'static, Result<(), AppError>>
        + Send
        + Sync,
>;

/// Listing view: `GET` on the collection root (or `/{id}/<children>` when
/// nested), returning an `{items, count}` envelope.
pub struct ListView<R: ListSource> {
    pub(crate) guards: Vec<Guard>,
    pub(crate) queryset: Option<ListQuerysetFn<R>>,
}

impl<R: ListSource> ListView<R> {
    pub fn new() -> Self {
        Self {
            guards: Vec::new(),
            queryset: None,
        }
    }

    /// Append a guard to the chain (declared order = evaluation order).
    pub fn guard(mut self, guard: Guard) -> Self {
        self.guards.push(guard);
        self
    }

    /// Replace the default queryset (`R::query`) with a custom producer.
    pub fn queryset<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(AppState, AuthUser, Option<DbId>, R::Filter, PageParams) -> Fut
            + Send
            + Sync
            + 'static,
        Fut: Future<Output = Result<Listing<R::Record>, AppError>> + Send + 'static,
    {
        self.queryset = Some(Arc::new(move |state, auth, parent, filter, page| {
            Box::pin(f(state, auth, parent, filter, page))
        }));
        self
    }
}

impl<R: ListSource> Default for ListView<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Retrieve view: `GET /{id}`.
pub struct RetrieveView<R: FetchSource> {
    pub(crate) guards: Vec<Guard>,
    pub(crate) getter: Option<GetterFn<R>>,
}

impl<R: FetchSource> RetrieveView<R> {
    pub fn new() -> Self {
        Self {
            guards: Vec::new(),
            getter: None,
        }
    }

    /// Append a guard to the chain (declared order = evaluation order).
    pub fn guard(mut self, guard: Guard) -> Self {
        self.guards.push(guard);
        self
    }

    /// Replace the default lookup (`R::find`) with a custom getter.
    pub fn getter<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(AppState, AuthUser, DbId) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<R::Record>, AppError>> + Send + 'static,
    {
        self.getter = Some(Arc::new(move |state, auth, id| Box::pin(f(state, auth, id))));
        self
    }
}

impl<R: FetchSource> Default for RetrieveView<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Create view: `POST` on the collection root (or `/{id}/<children>` when
/// nested), returning 201 with the encoded entity.
pub struct CreateView<R: WriteSource> {
    pub(crate) guards: Vec<Guard>,
    pub(crate) pre_save: Option<PreSaveFn<R>>,
    pub(crate) post_save: Option<PostSaveFn<R>>,
}

impl<R: WriteSource> CreateView<R> {
    pub fn new() -> Self {
        Self {
            guards: Vec::new(),
            pre_save: None,
            post_save: None,
        }
    }

    /// Append a guard to the chain (declared order = evaluation order).
    pub fn guard(mut self, guard: Guard) -> Self {
        self.guards.push(guard);
        self
    }

    /// Set derived draft fields before persisting. Nested creates MUST bind
    /// the parent id here; the draft starts without it.
    pub fn pre_save<F>(mut self, f: F) -> Self
    where
        F: Fn(&AuthUser, Option<DbId>, &mut R::Draft) + Send + Sync + 'static,
    {
        self.pre_save = Some(Arc::new(f));
        self
    }

    /// Run a side effect after persisting, before the response is encoded.
    pub fn post_save<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(AppState, AuthUser, R::Record) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), AppError>> + Send + 'static,
    {
        self.post_save = Some(Arc::new(move |state, auth, record| {
            Box::pin(f(state, auth, record))
        }));
        self
    }
}

impl<R: WriteSource> Default for CreateView<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Update view: `PUT /{id}`, full replacement of the declared fields.
pub struct UpdateView<R: WriteSource> {
    pub(crate) guards: Vec<Guard>,
    pub(crate) _marker: std::marker::PhantomData<R>,
}

impl<R: WriteSource> UpdateView<R> {
    pub fn new() -> Self {
        Self {
            guards: Vec::new(),
            _marker: std::marker::PhantomData,
        }
    }

    /// Append a guard to the chain. Ownership checks run against the
    /// existing entity, before any mutation.
    pub fn guard(mut self, guard: Guard) -> Self {
        self.guards.push(guard);
        self
    }
}

impl<R: WriteSource> Default for UpdateView<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Delete view: `DELETE /{id}`, returning 204.
pub struct DeleteView<R: WriteSource> {
    pub(crate) guards: Vec<Guard>,
    pub(crate) _marker: std::marker::PhantomData<R>,
}

impl<R: WriteSource> DeleteView<R> {
    pub fn new() -> Self {
        Self {
            guards: Vec::new(),
            _marker: std::marker::PhantomData,
        }
    }

    /// Append a guard to the chain (declared order = evaluation order).
    pub fn guard(mut self, guard: Guard) -> Self {
        self.guards.push(guard);
        self
    }
}

impl<R: WriteSource> Default for DeleteView<R> {
    fn default() -> Self {
        Self::new()
    }
}

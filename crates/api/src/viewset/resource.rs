//! Resource definitions and the route registration engine.
//!
//! A [`Resource`] is the declarative grouping of one entity with its view
//! descriptors. Entities opt into capabilities through small traits:
//! [`ViewResource`] (names + encoding) is the base, [`ListSource`],
//! [`FetchSource`] and [`WriteSource`] add the repository operations the
//! corresponding verbs need. A child entity that is only ever listed under
//! a parent (likes under snaps) implements only [`ListSource`].
//!
//! Within a request the ordering is strict: guard chain, decode, pre-save,
//! persist (where uniqueness is validated), post-save, encode.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::Validate;

use snapdex_core::error::CoreError;
use snapdex_core::pagination::{Listing, PageParams};
use snapdex_core::types::DbId;

use crate::error::AppError;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::viewset::descriptor::{CreateView, DeleteView, ListView, RetrieveView, UpdateView};
use crate::viewset::guard::run_guards;
use crate::viewset::route_table::{url_segment, RouteEntry};

/// Base contract: entity names plus the record/output pair every view needs.
#[async_trait]
pub trait ViewResource: Send + Sync + 'static {
    /// Snake-case singular entity name, used for route and operation naming.
    const SINGULAR: &'static str;
    /// Snake-case plural entity name.
    const PLURAL: &'static str;
    /// Human-readable entity name for error messages.
    const DISPLAY: &'static str;

    /// Repository row type.
    type Record: Clone + Send + Sync + 'static;
    /// Wire representation of a record.
    type Output: Serialize + Send + 'static;

    /// Build the wire representation. Never re-validates; may resolve
    /// presigned URLs through the storage provider.
    async fn encode(state: &AppState, record: Self::Record) -> Result<Self::Output, AppError>;
}

/// Contract for resources exposing a listing endpoint.
#[async_trait]
pub trait ListSource: ViewResource {
    /// Declared filter parameters; unset fields do not filter.
    type Filter: DeserializeOwned + Send + 'static;

    /// Fetch one page plus the pre-slice count. `parent` is set on nested
    /// (`/{id}/<children>`) listings.
    async fn query(
        state: &AppState,
        parent: Option<DbId>,
        filter: &Self::Filter,
        page: &PageParams,
    ) -> Result<Listing<Self::Record>, AppError>;
}

/// Contract for resources exposing a retrieve endpoint.
#[async_trait]
pub trait FetchSource: ViewResource {
    /// Fetch by primary key; `None` when the id is absent.
    async fn find(state: &AppState, id: DbId) -> Result<Option<Self::Record>, AppError>;
}

/// Contract for resources exposing create/update/delete endpoints.
#[async_trait]
pub trait WriteSource: ViewResource {
    /// Wire payload for create and (full-replace) update.
    type Input: DeserializeOwned + Validate + Send + 'static;
    /// Insertable field set. Server-side fields (creator, parent key) start
    /// unset and are injected by pre-save hooks.
    type Draft: From<Self::Input> + Send + 'static;

    /// Persist a draft; uniqueness and constraint checks happen here.
    async fn insert(state: &AppState, draft: Self::Draft) -> Result<Self::Record, AppError>;

    /// Full replacement of the declared fields. `None` when the id is
    /// absent.
    async fn replace(
        state: &AppState,
        id: DbId,
        input: Self::Input,
    ) -> Result<Option<Self::Record>, AppError>;

    /// Delete by primary key. `false` when the id is absent.
    async fn remove(state: &AppState, id: DbId) -> Result<bool, AppError>;
}

/// Deferred registration of one endpoint: adds the route and its table
/// entry.
type Registrar = Box<dyn FnOnce(Router<AppState>, &mut Vec<RouteEntry>) -> Router<AppState> + Send>;

/// Declarative grouping of an entity with its view descriptors.
///
/// Each verb has exactly one slot and each nested view one registrar, so no
/// two descriptors can claim the same (method, path) shape. `register` is a
/// pure function of the definition: two registrations of the same
/// definition produce identical route tables.
pub struct Resource<R: ViewResource> {
    list: Option<Registrar>,
    retrieve: Option<Registrar>,
    create: Option<Registrar>,
    update: Option<Registrar>,
    delete: Option<Registrar>,
    children: Vec<Registrar>,
    _marker: PhantomData<R>,
}

impl<R: ViewResource> Resource<R> {
    pub fn new() -> Self {
        Self {
            list: None,
            retrieve: None,
            create: None,
            update: None,
            delete: None,
            children: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// `GET /` -- paginated, filtered listing.
    pub fn list(mut self, view: ListView<R>) -> Self
    where
        R: ListSource,
    {
        assert!(
            self.list.is_none(),
            "list view already registered for {}",
            R::PLURAL
        );
        self.list = Some(Box::new(move |router, table| {
            table.push(RouteEntry::list(R::PLURAL));
            let ListView { guards, queryset } = view;
            let guards = Arc::new(guards);
            let handler = move |State(state): State<AppState>,
                                auth: AuthUser,
                                Query(page): Query<PageParams>,
                                Query(filter): Query<R::Filter>| {
                let guards = Arc::clone(&guards);
                let queryset = queryset.clone();
                async move {
                    run_guards(&guards, &state, &auth, None).await?;
                    let listing = match queryset {
                        Some(queryset) => {
                            (*queryset)(state.clone(), auth, None, filter, page).await?
                        }
                        None => R::query(&state, None, &filter, &page).await?,
                    };
                    let mut items = Vec::with_capacity(listing.items.len());
                    for record in listing.items {
                        items.push(R::encode(&state, record).await?);
                    }
                    Ok::<_, AppError>(Json(Listing {
                        items,
                        count: listing.count,
                    }))
                }
            };
            router.route("/", get(handler))
        }));
        self
    }

    /// `GET /{id}` -- single entity.
    pub fn retrieve(mut self, view: RetrieveView<R>) -> Self
    where
        R: FetchSource,
    {
        assert!(
            self.retrieve.is_none(),
            "retrieve view already registered for {}",
            R::PLURAL
        );
        self.retrieve = Some(Box::new(move |router, table| {
            table.push(RouteEntry::retrieve(R::SINGULAR));
            let RetrieveView { guards, getter } = view;
            let guards = Arc::new(guards);
            let handler = move |State(state): State<AppState>,
                                auth: AuthUser,
                                Path(id): Path<DbId>| {
                let guards = Arc::clone(&guards);
                let getter = getter.clone();
                async move {
                    run_guards(&guards, &state, &auth, Some(id)).await?;
                    let record = match getter {
                        Some(getter) => (*getter)(state.clone(), auth, id).await?,
                        None => R::find(&state, id).await?,
                    };
                    let record = record.ok_or(CoreError::NotFound {
                        entity: R::DISPLAY,
                        id,
                    })?;
                    let output = R::encode(&state, record).await?;
                    Ok::<_, AppError>(Json(output))
                }
            };
            router.route("/{id}", get(handler))
        }));
        self
    }

    /// `POST /` -- create, returning 201 with the encoded entity.
    pub fn create(mut self, view: CreateView<R>) -> Self
    where
        R: WriteSource,
    {
        assert!(
            self.create.is_none(),
            "create view already registered for {}",
            R::PLURAL
        );
        self.create = Some(Box::new(move |router, table| {
            table.push(RouteEntry::create(R::SINGULAR, R::PLURAL));
            let CreateView {
                guards,
                pre_save,
                post_save,
            } = view;
            let guards = Arc::new(guards);
            let handler = move |State(state): State<AppState>,
                                auth: AuthUser,
                                AppJson(input): AppJson<R::Input>| {
                let guards = Arc::clone(&guards);
                let pre_save = pre_save.clone();
                let post_save = post_save.clone();
                async move {
                    run_guards(&guards, &state, &auth, None).await?;
                    input.validate()?;
                    let mut draft: R::Draft = input.into();
                    if let Some(pre_save) = &pre_save {
                        (**pre_save)(&auth, None, &mut draft);
                    }
                    let record = R::insert(&state, draft).await?;
                    if let Some(post_save) = &post_save {
                        (**post_save)(state.clone(), auth.clone(), record.clone()).await?;
                    }
                    let output = R::encode(&state, record).await?;
                    Ok::<_, AppError>((StatusCode::CREATED, Json(output)))
                }
            };
            router.route("/", post(handler))
        }));
        self
    }

    /// `PUT /{id}` -- full replacement of the declared fields.
    pub fn update(mut self, view: UpdateView<R>) -> Self
    where
        R: WriteSource,
    {
        assert!(
            self.update.is_none(),
            "update view already registered for {}",
            R::PLURAL
        );
        self.update = Some(Box::new(move |router, table| {
            table.push(RouteEntry::update(R::SINGULAR));
            let guards = Arc::new(view.guards);
            let handler = move |State(state): State<AppState>,
                                auth: AuthUser,
                                Path(id): Path<DbId>,
                                AppJson(input): AppJson<R::Input>| {
                let guards = Arc::clone(&guards);
                async move {
                    run_guards(&guards, &state, &auth, Some(id)).await?;
                    input.validate()?;
                    let record = R::replace(&state, id, input).await?.ok_or(
                        CoreError::NotFound {
                            entity: R::DISPLAY,
                            id,
                        },
                    )?;
                    let output = R::encode(&state, record).await?;
                    Ok::<_, AppError>(Json(output))
                }
            };
            router.route("/{id}", put(handler))
        }));
        self
    }

    /// `DELETE /{id}` -- returning 204.
    pub fn delete(mut self, view: DeleteView<R>) -> Self
    where
        R: WriteSource,
    {
        assert!(
            self.delete.is_none(),
            "delete view already registered for {}",
            R::PLURAL
        );
        self.delete = Some(Box::new(move |router, table| {
            table.push(RouteEntry::delete(R::SINGULAR));
            let guards = Arc::new(view.guards);
            let handler = move |State(state): State<AppState>,
                                auth: AuthUser,
                                Path(id): Path<DbId>| {
                let guards = Arc::clone(&guards);
                async move {
                    run_guards(&guards, &state, &auth, Some(id)).await?;
                    let removed = R::remove(&state, id).await?;
                    if !removed {
                        return Err(AppError::Core(CoreError::NotFound {
                            entity: R::DISPLAY,
                            id,
                        }));
                    }
                    Ok::<_, AppError>(StatusCode::NO_CONTENT)
                }
            };
            router.route("/{id}", delete(handler))
        }));
        self
    }

    /// `GET /{id}/<children>` -- listing of a child entity scoped under
    /// this resource's id.
    pub fn nest_list<C: ListSource>(mut self, view: ListView<C>) -> Self {
        self.children.push(Box::new(move |router, table| {
            table.push(RouteEntry::nested_list(R::SINGULAR, C::PLURAL));
            let path = format!("/{{id}}/{}", url_segment(C::PLURAL));
            let ListView { guards, queryset } = view;
            let guards = Arc::new(guards);
            let handler = move |State(state): State<AppState>,
                                auth: AuthUser,
                                Path(id): Path<DbId>,
                                Query(page): Query<PageParams>,
                                Query(filter): Query<C::Filter>| {
                let guards = Arc::clone(&guards);
                let queryset = queryset.clone();
                async move {
                    run_guards(&guards, &state, &auth, Some(id)).await?;
                    let listing = match queryset {
                        Some(queryset) => {
                            (*queryset)(state.clone(), auth, Some(id), filter, page).await?
                        }
                        None => C::query(&state, Some(id), &filter, &page).await?,
                    };
                    let mut items = Vec::with_capacity(listing.items.len());
                    for record in listing.items {
                        items.push(C::encode(&state, record).await?);
                    }
                    Ok::<_, AppError>(Json(Listing {
                        items,
                        count: listing.count,
                    }))
                }
            };
            router.route(&path, get(handler))
        }));
        self
    }

    /// `POST /{id}/<children>` -- create a child entity under this
    /// resource's id. The pre-save hook receives the parent id and must
    /// bind it onto the draft.
    pub fn nest_create<C: WriteSource>(mut self, view: CreateView<C>) -> Self {
        self.children.push(Box::new(move |router, table| {
            table.push(RouteEntry::nested_create(R::SINGULAR, C::SINGULAR, C::PLURAL));
            let path = format!("/{{id}}/{}", url_segment(C::PLURAL));
            let CreateView {
                guards,
                pre_save,
                post_save,
            } = view;
            let guards = Arc::new(guards);
            let handler = move |State(state): State<AppState>,
                                auth: AuthUser,
                                Path(id): Path<DbId>,
                                AppJson(input): AppJson<C::Input>| {
                let guards = Arc::clone(&guards);
                let pre_save = pre_save.clone();
                let post_save = post_save.clone();
                async move {
                    run_guards(&guards, &state, &auth, Some(id)).await?;
                    input.validate()?;
                    let mut draft: C::Draft = input.into();
                    if let Some(pre_save) = &pre_save {
                        (**pre_save)(&auth, Some(id), &mut draft);
                    }
                    let record = C::insert(&state, draft).await?;
                    if let Some(post_save) = &post_save {
                        (**post_save)(state.clone(), auth.clone(), record.clone()).await?;
                    }
                    let output = C::encode(&state, record).await?;
                    Ok::<_, AppError>((StatusCode::CREATED, Json(output)))
                }
            };
            router.route(&path, post(handler))
        }));
        self
    }

    /// Materialize the definition into routes plus its deterministic route
    /// table. Registration order is fixed: list, create, retrieve, update,
    /// delete, then nested views in declaration order.
    pub fn register(self) -> (Router<AppState>, Vec<RouteEntry>) {
        let mut router = Router::new();
        let mut table = Vec::new();

        let slots = [self.list, self.create, self.retrieve, self.update, self.delete];
        for registrar in slots.into_iter().flatten() {
            router = registrar(router, &mut table);
        }
        for registrar in self.children {
            router = registrar(router, &mut table);
        }

        (router, table)
    }
}

impl<R: ViewResource> Default for Resource<R> {
    fn default() -> Self {
        Self::new()
    }
}

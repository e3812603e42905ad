//! Declarative CRUD route registration.
//!
//! A [`resource::Resource`] bundles immutable view descriptors
//! ([`descriptor`]) for one entity and registers them as Axum routes,
//! producing one deterministic [`route_table::RouteEntry`] per endpoint.
//! Guards ([`guard`]) run before any handler body, so an unauthorized
//! request never causes a partial write.
//!
//! Descriptors are built once at startup and are immutable afterwards:
//! registration is a pure function of the resource definition.

pub mod descriptor;
pub mod guard;
pub mod resource;
pub mod route_table;

pub use descriptor::{CreateView, DeleteView, ListView, RetrieveView, UpdateView};
pub use guard::{guard, run_guards, Guard};
pub use resource::{FetchSource, ListSource, Resource, ViewResource, WriteSource};
pub use route_table::RouteEntry;

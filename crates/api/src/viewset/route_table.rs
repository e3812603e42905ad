//! Deterministic route metadata derivation.
//!
//! Every name here is a pure function of the entity names, so registering
//! the same resource definition twice yields byte-identical entries.

use serde::Serialize;

/// One registered endpoint's metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    /// HTTP method.
    pub method: &'static str,
    /// Path relative to the resource mount (`/`, `/{id}`, `/{id}/snaps`).
    pub path: String,
    /// Route name (`item`, `items`, `collection_items`).
    pub name: String,
    /// Operation id (`list_items`, `create_collection_item`).
    pub operation_id: String,
    /// Human-readable summary ("List Items of a Collection").
    pub summary: String,
}

impl RouteEntry {
    /// `GET /` on the collection root.
    pub(crate) fn list(plural: &str) -> Self {
        Self {
            method: "GET",
            path: "/".to_string(),
            name: plural.to_string(),
            operation_id: format!("list_{plural}"),
            summary: format!("List {}", humanize(plural)),
        }
    }

    /// `POST /` on the collection root.
    pub(crate) fn create(singular: &str, plural: &str) -> Self {
        Self {
            method: "POST",
            path: "/".to_string(),
            name: plural.to_string(),
            operation_id: format!("create_{singular}"),
            summary: format!("Create {}", humanize(singular)),
        }
    }

    /// `GET /{id}` on an instance.
    pub(crate) fn retrieve(singular: &str) -> Self {
        Self {
            method: "GET",
            path: "/{id}".to_string(),
            name: singular.to_string(),
            operation_id: format!("get_{singular}"),
            summary: format!("Get {}", humanize(singular)),
        }
    }

    /// `PUT /{id}` on an instance.
    pub(crate) fn update(singular: &str) -> Self {
        Self {
            method: "PUT",
            path: "/{id}".to_string(),
            name: singular.to_string(),
            operation_id: format!("update_{singular}"),
            summary: format!("Update {}", humanize(singular)),
        }
    }

    /// `DELETE /{id}` on an instance.
    pub(crate) fn delete(singular: &str) -> Self {
        Self {
            method: "DELETE",
            path: "/{id}".to_string(),
            name: singular.to_string(),
            operation_id: format!("delete_{singular}"),
            summary: format!("Delete {}", humanize(singular)),
        }
    }

    /// `GET /{id}/<children>` on a parent instance.
    pub(crate) fn nested_list(parent_singular: &str, child_plural: &str) -> Self {
        let parent = humanize(parent_singular);
        Self {
            method: "GET",
            path: format!("/{{id}}/{}", url_segment(child_plural)),
            name: format!("{parent_singular}_{child_plural}"),
            operation_id: format!("list_{parent_singular}_{child_plural}"),
            summary: format!("List {} of {} {parent}", humanize(child_plural), article(&parent)),
        }
    }

    /// `POST /{id}/<children>` on a parent instance.
    pub(crate) fn nested_create(
        parent_singular: &str,
        child_singular: &str,
        child_plural: &str,
    ) -> Self {
        let parent = humanize(parent_singular);
        Self {
            method: "POST",
            path: format!("/{{id}}/{}", url_segment(child_plural)),
            name: format!("{parent_singular}_{child_plural}"),
            operation_id: format!("create_{parent_singular}_{child_singular}"),
            summary: format!(
                "Create {} of {} {parent}",
                humanize(child_singular),
                article(&parent)
            ),
        }
    }
}

/// URL segment for a child resource (`pending_items` -> `pending-items`).
pub(crate) fn url_segment(plural: &str) -> String {
    plural.replace('_', "-")
}

/// `snake_case` -> `Snake Case`.
fn humanize(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// "a" or "an", depending on the first letter of `word`.
fn article(word: &str) -> &'static str {
    match word.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u' | 'A' | 'E' | 'I' | 'O' | 'U') => "an",
        _ => "a",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Object-storage key generation.

use uuid::Uuid;

/// Build a collision-resistant object name for an upload.
///
/// The random token guarantees two uploads of the same filename never
/// overwrite each other; the prefix (usually the owning entity's id) keeps
/// a bucket browsable per entity.
pub fn generate_object_name(prefix: &str, filename: &str) -> String {
    format!("{prefix}/{}-{filename}", Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_name_keeps_prefix_and_filename() {
        let name = generate_object_name("42", "photo.png");
        assert!(name.starts_with("42/"));
        assert!(name.ends_with("-photo.png"));
    }

    #[test]
    fn object_names_are_unique_per_call() {
        let first = generate_object_name("42", "photo.png");
        let second = generate_object_name("42", "photo.png");
        assert_ne!(first, second);
    }
}

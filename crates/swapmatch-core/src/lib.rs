// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Swapmatch exchange engine.
//!
//! Holds the error taxonomy, the domain types that cross crate boundaries,
//! and the storage lifecycle traits.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{Entity, SwapError};
pub use traits::{PluginAdapter, StorageAdapter};
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_map_to_status_codes() {
        let cases = [
            (SwapError::Config("bad".into()), 500),
            (
                SwapError::Storage {
                    source: Box::new(std::io::Error::other("disk")),
                },
                500,
            ),
            (
                SwapError::NotFound {
                    entity: Entity::Match,
                    id: 1,
                },
                404,
            ),
            (
                SwapError::Conflict {
                    existing: InteractionKind::Like,
                },
                409,
            ),
            (SwapError::validation("message", "must not be empty"), 400),
            (SwapError::Internal("oops".into()), 500),
        ];
        for (err, code) in cases {
            assert_eq!(err.status_code(), code, "{err}");
        }
    }

    #[test]
    fn storage_traits_are_object_safe() {
        fn _assert_storage(_: &dyn StorageAdapter) {}
        fn _assert_plugin(_: &dyn PluginAdapter) {}
    }
}

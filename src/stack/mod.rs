//! Strongly-typed identifiers for languages, frameworks, and database engines.
//!
//! All identifiers support a `Custom(String)` variant so entries added to the user-editable
//! catalog are representable without code changes. Built-in behavior (manifest readers,
//! recipe shapes, service tables) is keyed on the known variants only.

#[macro_use]
pub mod id_enum_macro;

pub mod database_id;
pub mod framework_id;
pub mod language_id;

pub use database_id::DatabaseId;
pub use framework_id::FrameworkId;
pub use language_id::LanguageId;

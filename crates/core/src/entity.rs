//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Catalog records (products, categories, salesmen) are entities: two records
/// with the same identifier describe the same thing, whatever their fields.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;

    /// Human-readable label used in messages (e.g. a product name).
    fn label(&self) -> &str;
}

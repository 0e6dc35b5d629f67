//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Users, roles and device sessions are entities: two snapshots with the same
/// id describe the same thing even when their fields differ.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// True if both values refer to the same entity.
    fn same_entity(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

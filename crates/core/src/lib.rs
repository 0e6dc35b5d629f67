//! `labyrinth-core` — shared building blocks for the admin console.
//!
//! Identifiers, the entity contract and the domain error model. No IO lives here.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{RoleId, SessionId, UserId};

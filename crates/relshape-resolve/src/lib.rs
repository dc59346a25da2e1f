//! Relational shape resolution for relshape.
//!
//! Reassembles many-to-many (M2M) and many-to-many-to-any (M2A) relationships
//! from the flat, pairwise relation registry:
//!
//! - `match_relation_pair` finds the junction edge and owning edge
//! - `resolve_m2m` / `resolve_m2a` build the descriptors from the catalogs
//! - `RelationResolver` memoizes both per `(collection, field)` and schema revision
//!
//! A field that is not a valid M2M/M2A resolves to `None`. Catalog entries
//! that cannot be found after a successful match leave the matching member
//! of the descriptor unset.

pub mod cache;
pub mod config;
pub mod m2a;
pub mod m2m;
pub mod matcher;
pub mod resolver;

pub use cache::{CacheStats, Resolution, ResolutionCache, ResolutionKind};
pub use config::{AmbiguityPolicy, ResolverConfig};
pub use m2a::{RelationM2A, resolve_m2a, resolve_m2a_with};
pub use m2m::{RelationM2M, resolve_m2m, resolve_m2m_with};
pub use matcher::{RelationPair, match_relation_pair};
pub use resolver::RelationResolver;

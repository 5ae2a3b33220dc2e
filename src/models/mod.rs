//! Wire types for the two API surfaces.
//!
//! Everything here is ephemeral: values are recomputed from the seed on
//! every access and never persisted. The only stored state is the override
//! store's patch map (see [`crate::store`]).

pub mod jira;
pub mod tempo;

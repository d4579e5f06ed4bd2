//! Entity metadata resolution
//!
//! - [`accessor`] - getter/setter discovery by naming convention
//! - [`profile`] - the resolved persistence profile of an entity type
//! - [`statement`] - the synthesized statement set
//! - [`registry`] - the process-wide cache of resolved profiles and mappers

pub mod accessor;
pub mod profile;
pub mod registry;
pub mod statement;

pub use accessor::getter_name;
pub use accessor::setter_name;
pub use profile::Profile;
pub use profile::ProfileAttribute;
pub use registry::Registration;
pub use statement::Statements;

//! `farmgate-parties` — personas: clients, employees and suppliers.
//!
//! The original schema modelled these as subclasses of one "persona" base
//! record; here they are one `Party` with a `PartyKind` discriminant plus
//! kind-specific optional fields.

pub mod party;

pub use party::{ContactInfo, NewParty, Party, PartyKind};

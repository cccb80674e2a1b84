//! Domain models for Woo dossiers.

mod dossier;
pub mod wire;

pub use dossier::{parse_date, Dossier, DossierFile, FairScore, TypeCode};
pub use wire::{FacetBucket, Municipality, RemotePage};

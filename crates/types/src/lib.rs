#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for addonhub
//!
//! This crate provides the request-scoped values that flow through a
//! download: the parsed addon reference, the credential and the team it
//! resolves to, the registry's download descriptor and the transfer outcome.

pub mod credential;
pub mod download;
pub mod reference;

pub use credential::{Credential, CredentialType, TeamScope};
pub use download::{DownloadDescriptor, Target, TransferResult};
pub use reference::{AddonKind, AddonReference};

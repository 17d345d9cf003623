//! medsentry — telehealth call companion backend.
//!
//! Extracts medication names from an uploaded clinical PDF, watches
//! live transcript fragments for newly spoken prescriptions, and
//! checks each new drug against the known list for interactions using
//! a browser-scrape source with a terminology-API fallback.

pub mod api;
pub mod config;
pub mod core_state;
pub mod extraction;
pub mod interactions;
pub mod session;
pub mod speech;

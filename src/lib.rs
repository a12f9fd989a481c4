//! Campus Placement API Library
//!
//! This library provides the HTTP routing layer, validation, and MongoDB
//! persistence for campus placement data: student records, company
//! placement drives, and the registrations linking them.

pub mod api;
pub mod config;
pub mod error;
pub mod store;
pub mod validate;

//! Shared building blocks for the dlife backend.
//!
//! This crate has no I/O. It holds the primitive types, the domain error
//! enum, the alert-header conventions used by every REST resource, and the
//! [`resource::Resource`] trait that ties a DTO to its REST path and search
//! index.

pub mod alert;
pub mod error;
pub mod resource;
pub mod types;

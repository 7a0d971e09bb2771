//! Core of the dynorm data-mapper.
//!
//! This crate provides:
//! - Wire types and the [`storage::StoreClient`] trait for DynamoDB-style stores
//! - The tagged-value codec between typed attributes and wire items
//! - The update planner turning attribute diffs into `AttributeUpdates`
//! - Pagination of query and scan operations
//! - The [`model::Model`] trait, per-type metadata and the model registry
//! - A generic [`repository::Repository`] tying these together

pub mod codec;
pub mod model;
pub mod repository;
pub mod storage;
pub mod update;

#[cfg(test)]
mod testing;

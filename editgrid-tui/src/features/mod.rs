//! Per-entity column sets and cell styles.

pub mod catalog;
pub mod people;
pub mod products;

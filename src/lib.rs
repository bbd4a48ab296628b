//! Movie browsing client core: debounced catalog search with stale-result
//! suppression, and a favorites set kept in sync across contexts.

pub mod catalog;
pub mod config;
pub mod details;
pub mod favorites;
pub mod logging;
pub mod mvi;
pub mod search;
pub mod storage;

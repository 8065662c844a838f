//! Shared test infrastructure for service tests.

mod db;
pub(crate) mod helpers;

pub(crate) use context::TestContext;

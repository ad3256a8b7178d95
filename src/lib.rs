#![doc(test(attr(deny(warnings))))]

//! Spend to Save tracks impulse purchases and nudges the user to set aside
//! ten percent of every frivolous spend, keeping running totals and a
//! history that survive restarts.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;
pub mod workflow;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Spend to Save tracing initialized.");
    });
}

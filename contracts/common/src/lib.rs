//! Access and pause primitives shared by the staking contracts.
//!
//! - [`admin_tiers`]: the `Operator < Admin < Governance` privilege ladder.
//! - [`pause`]: global and per-operation pause switches.
//!
//! Both modules only read and write the calling contract's storage; the
//! contract decides which tier each entry point requires and which error to
//! surface when a check fails.

#![no_std]

pub mod admin_tiers;
pub mod pause;

pub use admin_tiers::AdminTier;
pub use pause::PauseScope;

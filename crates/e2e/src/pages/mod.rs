//! Typed page models for the target deployment
//!
//! Thin selector tables and built-in [`crate::profile::FormPlan`]s for the
//! application's observed UI. Deployments whose UI has drifted override
//! these with YAML plans instead of editing code.

pub mod clients;
pub mod dashboard;
pub mod events;
pub mod login;

// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # Capacity Planner Sync
//!
//! Reconciles the Capacity Planner inventory (teams, pods, projects) against
//! the Meteo `OpenStack` inventory.
//!
//! ## Overview
//!
//! Meteo is the source of truth. Each run executes one command:
//!
//! - `create`: bulk-load pods, teams and projects into an empty Capacity Planner
//! - `update`: add new teams, create or update projects, then remove projects
//!   and teams Meteo no longer reports
//! - `delete`: remove every project, team and pod
//!
//! ## Architecture
//!
//! 1. **Source**: project and cloud lists fetched from Meteo
//! 2. **Target**: Capacity Planner collections, re-fetched by every lookup
//! 3. **Reconciler**: sequential passes of POST, PUT and DELETE calls
//!
//! ## Modules
//!
//! - [`config`]: Configuration layering and validation
//! - [`http`]: JSON REST client
//! - [`capacity`]: Capacity Planner records, initialization and lookups
//! - [`meteo`]: Meteo inventory client
//! - [`sync`]: Diffing, reconciliation and the run report
//! - [`openstack`]: `OpenStack` CLI collaborator
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```yaml
//! capacity_planner:
//!   base_url: http://capacity-planner.local
//!   default_team_name: unassigned
//!   default_deployment_type_name: standard
//!   project_deployment_type: 5K
//!
//! meteo:
//!   base_url: http://10.45.207.10
//!
//! pods:
//!   name_prefix: cloud
//!   credentials:
//!     project: Cap_Plan_Viewer
//!     username: cap_plan_user
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod capacity;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod meteo;
pub mod openstack;
pub mod sync;

#[cfg(test)]
mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use capacity::{CapacityPlanner, PlannerDefaults};
pub use cli::{Cli, OutputFormatter};
pub use config::{ConfigParser, ConfigValidator, SyncConfig};
pub use error::{Result, SyncError};
pub use http::{RestBackend, RestClient};
pub use meteo::MeteoClient;
pub use openstack::{OpenStackClient, OpenStackEnv, ProcessRunner};
pub use sync::{execute, Reconciler, SyncCommand, SyncReport};

//! `OpenStack` CLI collaborator.
//!
//! Runs the `openstack` client and legacy per-service clients as child
//! processes with explicit credentials, and parses their JSON or table
//! output.

mod client;
mod command;
mod env;
mod runner;

pub use client::OpenStackClient;
pub use command::{parse_table, ClientCommand, OPENSTACK_TOOL};
pub use env::{OpenStackEnv, DEFAULT_REGION};
pub use runner::{CommandOutput, CommandRunner, ProcessRunner};

#[cfg(test)]
pub use runner::MockCommandRunner;

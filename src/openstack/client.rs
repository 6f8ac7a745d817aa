//! Canned `OpenStack` queries.

use serde_json::Value;
use tracing::{debug, info};

use crate::error::{CommandError, Result};

use super::command::ClientCommand;
use super::env::OpenStackEnv;
use super::runner::CommandRunner;

/// Runs `OpenStack` client commands against one cloud.
#[derive(Debug)]
pub struct OpenStackClient<R> {
    /// Process runner.
    runner: R,
    /// Credentials exported to every command.
    env: OpenStackEnv,
}

impl<R: CommandRunner> OpenStackClient<R> {
    /// Creates a client for the cloud described by `env`.
    #[must_use]
    pub const fn new(runner: R, env: OpenStackEnv) -> Self {
        Self { runner, env }
    }

    /// Runs a command and parses its output.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::NonZeroExit`] if the tool fails, or an error if
    /// it cannot be spawned or its output cannot be parsed.
    pub async fn execute(&self, command: &ClientCommand) -> Result<Value> {
        info!("Running cli command ({command})");

        let output = self
            .runner
            .run(&command.tool, &command.args(), &self.env.vars(command.requires_region))
            .await?;

        if !output.success() {
            return Err(CommandError::NonZeroExit {
                code: output.status.unwrap_or(-1),
                stdout: output.stdout,
                stderr: output.stderr,
            }
            .into());
        }

        debug!("{}", output.stdout);
        debug!("{}", output.stderr);
        info!("cli command completed");

        command.parse_output(&output.stdout)
    }

    /// Details of every Cinder storage pool.
    ///
    /// # Errors
    ///
    /// See [`OpenStackClient::execute`].
    pub async fn cinder_pool_details(&self) -> Result<Value> {
        let command = ClientCommand::new("cinder", "--os_volume_api_version=2 get", "pools").arguments("--detail");
        self.execute(&command).await
    }

    /// Aggregate Nova hypervisor statistics.
    ///
    /// # Errors
    ///
    /// See [`OpenStackClient::execute`].
    pub async fn nova_hypervisor_stats(&self) -> Result<Value> {
        self.execute(&ClientCommand::new("nova", "hypervisor", "stats"))
            .await
    }

    /// Every Keystone project.
    ///
    /// # Errors
    ///
    /// See [`OpenStackClient::execute`].
    pub async fn project_list(&self) -> Result<Value> {
        self.execute(&ClientCommand::new("openstack", "project", "list").requires_region())
            .await
    }

    /// Quotas of one project.
    ///
    /// # Errors
    ///
    /// See [`OpenStackClient::execute`].
    pub async fn project_quotas(&self, project_name: &str) -> Result<Value> {
        let command = ClientCommand::new("openstack", "quota", "show").arguments(project_name);
        self.execute(&command).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PodCredentials;
    use crate::error::SyncError;
    use crate::openstack::{CommandOutput, MockCommandRunner};
    use serde_json::json;

    fn env() -> OpenStackEnv {
        OpenStackEnv::for_pod("https://keystone:5000/v3", &PodCredentials::default())
    }

    fn exited(status: i32, stdout: &str) -> CommandOutput {
        CommandOutput {
            status: Some(status),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    fn has_region(envs: &[(String, String)]) -> bool {
        envs.iter().any(|(key, _)| key == "OS_REGION_NAME")
    }

    #[tokio::test]
    async fn test_project_list_exports_region() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|program, args, envs| {
                program == "openstack"
                    && args.join(" ") == "project list -f json"
                    && has_region(envs)
            })
            .times(1)
            .returning(|_, _, _| Ok(exited(0, r#"[{"ID": "1", "Name": "web_prod"}]"#)));

        let client = OpenStackClient::new(runner, env());
        let projects = client.project_list().await.expect("command should succeed");

        assert_eq!(projects, json!([{"ID": "1", "Name": "web_prod"}]));
    }

    #[tokio::test]
    async fn test_hypervisor_stats_parses_table() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|program, args, envs| {
                program == "nova" && args.join(" ") == "hypervisor-stats" && !has_region(envs)
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(exited(
                    0,
                    "+-------+-----+\n| Property | Value |\n+-------+-----+\n| vcpus | 128 |\n+-------+-----+\n",
                ))
            });

        let client = OpenStackClient::new(runner, env());
        let stats = client.nova_hypervisor_stats().await.expect("command should succeed");

        assert_eq!(stats, json!({"vcpus": "128"}));
    }

    #[tokio::test]
    async fn test_quotas_pass_project_name() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|_, args, _| args.join(" ") == "quota show web_prod -f json")
            .times(1)
            .returning(|_, _, _| Ok(exited(0, r#"{"cores": 20}"#)));

        let client = OpenStackClient::new(runner, env());
        let quotas = client.project_quotas("web_prod").await.expect("command should succeed");

        assert_eq!(quotas["cores"], 20);
    }

    #[tokio::test]
    async fn test_cinder_pools_use_legacy_syntax() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|program, args, _| {
                program == "cinder" && args.join(" ") == "--os_volume_api_version=2 get-pools --detail"
            })
            .times(1)
            .returning(|_, _, _| Ok(exited(0, "+-+\n| h | v |\n+-+\n| name | pool1 |\n+-+\n")));

        let client = OpenStackClient::new(runner, env());
        let pools = client.cinder_pool_details().await.expect("command should succeed");

        assert_eq!(pools["name"], "pool1");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_error() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(|_, _, _| {
            Ok(CommandOutput {
                status: Some(1),
                stdout: String::from("partial"),
                stderr: String::from("auth failed"),
            })
        });

        let client = OpenStackClient::new(runner, env());
        let err = client.project_list().await.expect_err("command should fail");

        match err {
            SyncError::Command(CommandError::NonZeroExit { code, stdout, stderr }) => {
                assert_eq!(code, 1);
                assert_eq!(stdout, "partial");
                assert_eq!(stderr, "auth failed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

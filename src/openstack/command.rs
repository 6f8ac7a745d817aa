//! `OpenStack` client command lines and their output.

use serde_json::{Map, Value};

use crate::error::{CommandError, Result};

/// The unified client; every other tool is a legacy per-service client.
pub const OPENSTACK_TOOL: &str = "openstack";

/// Framing lines above the rows of a legacy table.
const TABLE_HEADER_LINES: usize = 3;

/// Framing lines below the rows of a legacy table, counting the empty
/// remainder after the final newline.
const TABLE_FOOTER_LINES: usize = 2;

/// One invocation of an `OpenStack` client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCommand {
    /// Executable, `openstack` or a legacy client such as `nova`.
    pub tool: String,
    /// Object the action applies to; may carry leading global options.
    pub object_type: String,
    /// Action to run.
    pub action: String,
    /// Whitespace-separated trailing arguments.
    pub arguments: String,
    /// Whether `OS_REGION_NAME` must be exported.
    pub requires_region: bool,
    /// Whether the command prints an object to parse.
    pub return_object: bool,
}

impl ClientCommand {
    /// Creates a command with no arguments that returns an object.
    #[must_use]
    pub fn new(tool: &str, object_type: &str, action: &str) -> Self {
        Self {
            tool: tool.to_string(),
            object_type: object_type.to_string(),
            action: action.to_string(),
            arguments: String::new(),
            requires_region: false,
            return_object: true,
        }
    }

    /// Sets the trailing arguments.
    #[must_use]
    pub fn arguments(mut self, arguments: &str) -> Self {
        self.arguments = arguments.to_string();
        self
    }

    /// Marks the command as region-scoped.
    #[must_use]
    pub const fn requires_region(mut self) -> Self {
        self.requires_region = true;
        self
    }

    /// Marks the command as printing nothing worth parsing.
    #[must_use]
    pub const fn discard_output(mut self) -> Self {
        self.return_object = false;
        self
    }

    /// Returns true for the unified `openstack` client.
    #[must_use]
    pub fn is_openstack(&self) -> bool {
        self.tool == OPENSTACK_TOOL
    }

    /// Arguments passed to the tool.
    ///
    /// The unified client takes `<object> <action>` and is asked for JSON
    /// when an object is expected. Legacy clients take `<object>-<action>`.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = self.object_type.split_whitespace().map(String::from).collect();

        if self.is_openstack() {
            args.push(self.action.clone());
        } else {
            match args.pop() {
                Some(object) => args.push(format!("{object}-{}", self.action)),
                None => args.push(self.action.clone()),
            }
        }

        args.extend(self.arguments.split_whitespace().map(String::from));

        if self.return_object && self.is_openstack() {
            args.extend([String::from("-f"), String::from("json")]);
        }
        args
    }

    /// Parses the tool's standard output.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InvalidOutput`] if the output is not valid
    /// JSON or not a well-formed table.
    pub fn parse_output(&self, stdout: &str) -> Result<Value> {
        if !self.return_object {
            return Ok(Value::Null);
        }
        if self.is_openstack() {
            return serde_json::from_str(stdout).map_err(|e| {
                CommandError::InvalidOutput {
                    message: format!("{self}: {e}"),
                }
                .into()
            });
        }
        parse_table(stdout).map(Value::Object)
    }
}

impl std::fmt::Display for ClientCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tool)?;
        for arg in self.args() {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Parses a legacy client's `| key | value |` table into a map.
///
/// # Errors
///
/// Returns [`CommandError::InvalidOutput`] for a row without two cells.
pub fn parse_table(output: &str) -> Result<Map<String, Value>> {
    let lines: Vec<&str> = output.split('\n').collect();
    let end = lines.len().saturating_sub(TABLE_FOOTER_LINES);
    let rows = lines.get(TABLE_HEADER_LINES..end).unwrap_or_default();

    let mut map = Map::new();
    for row in rows {
        let mut cells = row.split('|').skip(1);
        let (Some(key), Some(value)) = (cells.next(), cells.next()) else {
            return Err(CommandError::InvalidOutput {
                message: format!("Malformed table row '{row}'"),
            }
            .into());
        };
        map.insert(key.trim().to_string(), Value::String(value.trim().to_string()));
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use serde_json::json;

    const HYPERVISOR_STATS: &str = "\
+----------------------+--------+
| Property             | Value  |
+----------------------+--------+
| count                | 4      |
| vcpus                | 128    |
| memory_mb            | 515000 |
+----------------------+--------+
";

    #[test]
    fn test_openstack_command_requests_json() {
        let command = ClientCommand::new("openstack", "quota", "show").arguments("web_prod");

        assert_eq!(command.args(), vec!["quota", "show", "web_prod", "-f", "json"]);
        assert_eq!(command.to_string(), "openstack quota show web_prod -f json");
    }

    #[test]
    fn test_legacy_command_joins_object_and_action() {
        let command =
            ClientCommand::new("cinder", "--os_volume_api_version=2 get", "pools").arguments("--detail");

        assert_eq!(
            command.to_string(),
            "cinder --os_volume_api_version=2 get-pools --detail"
        );
        assert_eq!(
            ClientCommand::new("nova", "hypervisor", "stats").to_string(),
            "nova hypervisor-stats"
        );
    }

    #[test]
    fn test_discarded_output_skips_json_flag() {
        let command = ClientCommand::new("openstack", "project", "list").discard_output();

        assert_eq!(command.to_string(), "openstack project list");
        assert_eq!(command.parse_output("anything").expect("should parse"), Value::Null);
    }

    #[test]
    fn test_parse_table() {
        let map = parse_table(HYPERVISOR_STATS).expect("table should parse");

        assert_eq!(map.len(), 3);
        assert_eq!(map["count"], "4");
        assert_eq!(map["memory_mb"], "515000");
        assert!(!map.contains_key("Property"));
    }

    #[test]
    fn test_parse_short_output_is_empty() {
        assert!(parse_table("").expect("should parse").is_empty());
        assert!(parse_table("+---+\n").expect("should parse").is_empty());
    }

    #[test]
    fn test_parse_malformed_row() {
        let output = "+-+\n| h |\n+-+\nno cells here\n+-+\n";

        let err = parse_table(output).expect_err("row should be rejected");
        assert!(matches!(
            err,
            SyncError::Command(CommandError::InvalidOutput { .. })
        ));
    }

    #[test]
    fn test_parse_openstack_json() {
        let command = ClientCommand::new("openstack", "project", "list");

        let value = command
            .parse_output(r#"[{"ID": "abc", "Name": "web_prod"}]"#)
            .expect("json should parse");
        assert_eq!(value, json!([{"ID": "abc", "Name": "web_prod"}]));

        assert!(command.parse_output("not json").is_err());
    }
}

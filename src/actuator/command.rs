//! Command-backed remediator.
//!
//! Runs `kubectl delete pod -n <namespace> -l <selector>` (plus optional
//! `--grace-period`/`--force`), or a configured shell command through `sh -c`.
//! The child is awaited on the runtime, so other requests keep flowing.

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tokio::process::Command;

use crate::actuator::remediator::{InstanceSelector, RemediationError, RemediationOutput, Remediator};
use crate::config::RemediationConfig;

/// Program and arguments for one remediation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn render(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Production [`Remediator`] that shells out.
#[derive(Debug, Clone)]
pub struct CommandRemediator {
    config: RemediationConfig,
}

impl CommandRemediator {
    pub fn new(config: RemediationConfig) -> Self {
        Self { config }
    }

    /// Build the command line for a selector.
    pub fn command_line(&self, selector: &InstanceSelector) -> CommandLine {
        if let Some(template) = &self.config.command {
            let script = template
                .replace("{namespace}", &selector.namespace)
                .replace("{selector}", &selector.label_selector);
            return CommandLine {
                program: "sh".to_string(),
                args: vec!["-c".to_string(), script],
            };
        }

        let mut args = vec![
            "delete".to_string(),
            "pod".to_string(),
            "-n".to_string(),
            selector.namespace.clone(),
            "-l".to_string(),
            selector.label_selector.clone(),
        ];
        if let Some(grace) = self.config.grace_period_secs {
            args.push(format!("--grace-period={grace}"));
        }
        if self.config.force {
            args.push("--force".to_string());
        }
        CommandLine {
            program: self.config.kubectl.clone(),
            args,
        }
    }

    async fn execute(&self, selector: &InstanceSelector) -> Result<RemediationOutput, RemediationError> {
        let line = self.command_line(selector);
        let output = Command::new(&line.program)
            .args(&line.args)
            .output()
            .await?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            Ok(RemediationOutput { stdout, stderr })
        } else {
            Err(RemediationError::from_exit(output.status, stderr))
        }
    }
}

impl Remediator for CommandRemediator {
    fn terminate_instances<'a>(
        &'a self,
        selector: &'a InstanceSelector,
    ) -> BoxFuture<'a, Result<RemediationOutput, RemediationError>> {
        self.execute(selector).boxed()
    }

    fn describe(&self, selector: &InstanceSelector) -> String {
        self.command_line(selector).render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> InstanceSelector {
        InstanceSelector::new("selfheal", "app=selfheal-api")
    }

    fn shell(command: &str) -> CommandRemediator {
        CommandRemediator::new(RemediationConfig {
            command: Some(command.into()),
            ..RemediationConfig::default()
        })
    }

    #[test]
    fn test_default_kubectl_line() {
        let remediator = CommandRemediator::new(RemediationConfig::default());
        assert_eq!(
            remediator.describe(&selector()),
            "kubectl delete pod -n selfheal -l app=selfheal-api"
        );
    }

    #[test]
    fn test_force_flags() {
        let remediator = CommandRemediator::new(RemediationConfig {
            force: true,
            grace_period_secs: Some(0),
            ..RemediationConfig::default()
        });
        assert_eq!(
            remediator.describe(&selector()),
            "kubectl delete pod -n selfheal -l app=selfheal-api --grace-period=0 --force"
        );
    }

    #[test]
    fn test_shell_template() {
        let line = shell("kubectl -n {namespace} delete pod -l {selector}").command_line(&selector());
        assert_eq!(line.program, "sh");
        assert_eq!(
            line.args,
            vec!["-c", "kubectl -n selfheal delete pod -l app=selfheal-api"]
        );
    }

    #[tokio::test]
    async fn test_success_captures_stdout() {
        let output = shell("echo 'pod \"selfheal-api-1\" deleted'")
            .terminate_instances(&selector())
            .await
            .unwrap();
        assert_eq!(output.stdout, "pod \"selfheal-api-1\" deleted\n");
    }

    #[tokio::test]
    async fn test_success_captures_stderr_separately() {
        let output = shell("echo deleted; echo 'warning: immediate deletion' >&2")
            .terminate_instances(&selector())
            .await
            .unwrap();
        assert_eq!(output.stdout, "deleted\n");
        assert_eq!(output.stderr, "warning: immediate deletion\n");
    }

    #[tokio::test]
    async fn test_nonzero_exit_surfaces_stderr() {
        let err = shell("printf boom >&2; exit 1")
            .terminate_instances(&selector())
            .await
            .unwrap_err();
        assert!(matches!(err, RemediationError::Failed { status: Some(1), .. }));
        assert_eq!(err.to_string(), "boom");
    }

    #[tokio::test]
    async fn test_missing_tool() {
        let remediator = CommandRemediator::new(RemediationConfig {
            kubectl: "/nonexistent/kubectl".into(),
            ..RemediationConfig::default()
        });
        let err = remediator.terminate_instances(&selector()).await.unwrap_err();
        assert!(matches!(err, RemediationError::Spawn(_)));
        assert!(!err.to_string().is_empty());
    }
}

use async_trait::async_trait;
use serde::Deserialize;
use std::process::ExitStatus;
use thiserror::Error;
use tokio::process::Command;

/// An open issue as reported by `gh issue list`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
}

/// Failure talking to the issue tracker
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("could not decode issue list: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Operations shepherd needs from the issue tracker
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// List the open issues of `repo`
    async fn list_issues(&self, repo: &str) -> Result<Vec<Issue>, TrackerError>;

    /// Change the title of issue `number` in `repo`
    async fn edit_title(&self, repo: &str, number: u64, title: &str) -> Result<(), TrackerError>;

    /// Move issue `number` from `origin` to `destination`
    async fn transfer(
        &self,
        origin: &str,
        destination: &str,
        number: u64,
    ) -> Result<(), TrackerError>;
}

/// Issue tracker backed by the GitHub CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GhCli {
    binary: String,
    limit: u32,
}

impl GhCli {
    pub fn new(binary: impl Into<String>, limit: u32) -> Self {
        Self {
            binary: binary.into(),
            limit,
        }
    }

    /// Run gh with the given arguments and return its stdout
    async fn run(&self, args: &[&str]) -> Result<Vec<u8>, TrackerError> {
        let command = format!("{} {}", self.binary, args.join(" "));
        tracing::debug!("Running {}", command);

        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .await
            .map_err(|source| TrackerError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(TrackerError::CommandFailed {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl IssueTracker for GhCli {
    async fn list_issues(&self, repo: &str) -> Result<Vec<Issue>, TrackerError> {
        let limit = self.limit.to_string();
        let output = self
            .run(&[
                "issue", "list", "--json", "number,title", "--state", "open", "--limit", &limit,
                "-R", repo,
            ])
            .await?;

        parse_issue_list(&output)
    }

    async fn edit_title(&self, repo: &str, number: u64, title: &str) -> Result<(), TrackerError> {
        let number = number.to_string();
        self.run(&["issue", "edit", &number, "--title", title, "-R", repo])
            .await?;
        Ok(())
    }

    async fn transfer(
        &self,
        origin: &str,
        destination: &str,
        number: u64,
    ) -> Result<(), TrackerError> {
        let number = number.to_string();
        self.run(&["issue", "transfer", &number, destination, "-R", origin])
            .await?;
        Ok(())
    }
}

/// Decode the JSON array printed by `gh issue list --json number,title`
pub fn parse_issue_list(output: &[u8]) -> Result<Vec<Issue>, TrackerError> {
    Ok(serde_json::from_slice(output)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_issue_list() {
        let output = br#"[{"number":2,"title":"Issue 2"},{"number":1,"title":"Issue 1"}]"#;

        let issues = parse_issue_list(output).unwrap();

        assert_eq!(
            issues,
            vec![
                Issue {
                    number: 2,
                    title: "Issue 2".to_string()
                },
                Issue {
                    number: 1,
                    title: "Issue 1".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_parse_issue_list_ignores_extra_fields() {
        let output = br#"[{"number":7,"title":"helm:Bump","url":"https://example.test/7"}]"#;

        let issues = parse_issue_list(output).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].title, "helm:Bump");
    }

    #[test]
    fn test_parse_empty_issue_list() {
        assert!(parse_issue_list(b"[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_malformed_issue_list() {
        let err = parse_issue_list(b"no issues here").unwrap_err();
        assert!(matches!(err, TrackerError::Decode(_)));

        let err = parse_issue_list(br#"[{"number":"one","title":"x"}]"#).unwrap_err();
        assert!(matches!(err, TrackerError::Decode(_)));
    }

    // All process spawning lives in this one test: exec of a freshly written
    // script fails with ETXTBSY if a parallel test forks while it is open.
    #[cfg(unix)]
    #[test]
    fn test_gh_cli_against_fake_binary() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("calls.log");
        let script = dir.path().join("gh");
        let body = format!(
            "#!/bin/sh\n\
             echo \"$@\" >> '{}'\n\
             case \"$2\" in\n\
               list) echo '[{{\"number\":3,\"title\":\"helm:Bump chart\"}}]' ;;\n\
               transfer) echo 'transfer refused' >&2; exit 1 ;;\n\
             esac\n",
            log.display()
        );
        std::fs::write(&script, body).unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let gh = GhCli::new(script.to_string_lossy(), 25);

        let issues = tokio_test::block_on(gh.list_issues("org/a")).unwrap();
        assert_eq!(
            issues,
            vec![Issue {
                number: 3,
                title: "helm:Bump chart".to_string()
            }]
        );

        tokio_test::block_on(gh.edit_title("org/a", 3, "charts:Bump chart")).unwrap();

        let err = tokio_test::block_on(gh.transfer("org/a", "org/b", 3)).unwrap_err();
        match err {
            TrackerError::CommandFailed { stderr, status, .. } => {
                assert_eq!(stderr, "transfer refused");
                assert!(!status.success());
            }
            other => panic!("expected CommandFailed, got {other:?}"),
        }

        let calls = std::fs::read_to_string(&log).unwrap();
        let calls: Vec<&str> = calls.lines().collect();
        assert_eq!(
            calls,
            vec![
                "issue list --json number,title --state open --limit 25 -R org/a",
                "issue edit 3 --title charts:Bump chart -R org/a",
                "issue transfer 3 org/b -R org/a",
            ]
        );

        let missing = GhCli::new(dir.path().join("no-such-gh").to_string_lossy(), 10);
        let err = tokio_test::block_on(missing.list_issues("org/a")).unwrap_err();
        assert!(matches!(err, TrackerError::Spawn { .. }));
        assert!(err.to_string().contains("issue list"));
    }
}

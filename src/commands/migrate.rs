use anyhow::{Context, Result};

use crate::cli::args::MigrateArgs;
use crate::github::{Issue, IssueTracker};
use crate::prompt::Confirm;
use crate::title::rewrite_prefix;

pub const ABORT_MODIFY: &str = "Stopping without modifying issue titles.";
pub const ABORT_MIGRATE: &str = "Stopping without migrating issues.";

/// How a migration run ended without error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every fetched issue was transferred
    Migrated(usize),
    /// The origin had no open issues
    NothingToMigrate,
    /// The operator declined a confirmation prompt
    Aborted(&'static str),
    /// Changes were only reported
    DryRun,
}

/// Moves every open issue from one repository to another
pub struct MigrateCommand {
    args: MigrateArgs,
}

impl MigrateCommand {
    pub fn new(args: MigrateArgs) -> Self {
        Self { args }
    }

    pub async fn execute<T, C>(&self, tracker: &T, confirm: &mut C) -> Result<Outcome>
    where
        T: IssueTracker + ?Sized,
        C: Confirm + ?Sized,
    {
        let MigrateArgs {
            origin,
            destination,
            prepend,
            dry_run,
        } = &self.args;

        let mut issues = fetch_issues(tracker, origin).await?;
        if issues.is_empty() {
            tracing::info!("No open issues in {}", origin);
            return Ok(Outcome::NothingToMigrate);
        }

        if *dry_run {
            report_plan(&self.args, &issues);
            return Ok(Outcome::DryRun);
        }

        if let Some(prepend) = prepend {
            let question = format!("Modify {} issues with prepend `{}:`?", issues.len(), prepend);
            if !confirm.confirm(&question)? {
                return Ok(Outcome::Aborted(ABORT_MODIFY));
            }

            let modified = modify_prepend(tracker, origin, &issues, prepend).await?;
            tracing::info!("Modified {} issues", modified);

            // Pick up the new titles before transferring
            issues = fetch_issues(tracker, origin).await?;
            if issues.is_empty() {
                tracing::info!("No open issues left in {}", origin);
                return Ok(Outcome::NothingToMigrate);
            }
        }

        let question = format!(
            "Migrate {} issues from {} to {}?",
            issues.len(),
            origin,
            destination
        );
        if !confirm.confirm(&question)? {
            return Ok(Outcome::Aborted(ABORT_MIGRATE));
        }

        move_issues(tracker, origin, destination, &issues).await?;
        tracing::info!(
            "Migrated {} issues from {} to {}.",
            issues.len(),
            origin,
            destination
        );

        Ok(Outcome::Migrated(issues.len()))
    }
}

async fn fetch_issues<T>(tracker: &T, repo: &str) -> Result<Vec<Issue>>
where
    T: IssueTracker + ?Sized,
{
    let issues = tracker
        .list_issues(repo)
        .await
        .with_context(|| format!("could not fetch issues for {}", repo))?;

    tracing::debug!("Fetched {} open issues from {}", issues.len(), repo);
    Ok(issues)
}

/// Rewrite each title's label in turn, stopping at the first failure.
/// Returns the number of titles that actually changed.
async fn modify_prepend<T>(
    tracker: &T,
    repo: &str,
    issues: &[Issue],
    prepend: &str,
) -> Result<usize>
where
    T: IssueTracker + ?Sized,
{
    let mut modified = 0;

    for issue in issues {
        let new_title = rewrite_prefix(&issue.title, prepend);
        if new_title == issue.title {
            tracing::debug!("Issue #{} already has prepend `{}:`", issue.number, prepend);
            continue;
        }

        tracker
            .edit_title(repo, issue.number, &new_title)
            .await
            .with_context(|| {
                format!("could not rename issue #{} to {}", issue.number, new_title)
            })?;

        tracing::debug!("Renamed issue #{} to {}", issue.number, new_title);
        modified += 1;
    }

    Ok(modified)
}

/// Transfer each issue in turn, stopping at the first failure
async fn move_issues<T>(
    tracker: &T,
    origin: &str,
    destination: &str,
    issues: &[Issue],
) -> Result<()>
where
    T: IssueTracker + ?Sized,
{
    for issue in issues {
        tracker
            .transfer(origin, destination, issue.number)
            .await
            .with_context(|| {
                format!(
                    "could not transfer issue #{}: {} from {} to {}",
                    issue.number, issue.title, origin, destination
                )
            })?;

        tracing::debug!("Transferred issue #{} to {}", issue.number, destination);
    }

    Ok(())
}

fn report_plan(args: &MigrateArgs, issues: &[Issue]) {
    tracing::info!("Dry run: no issue will be edited or transferred");

    for line in plan(args, issues) {
        tracing::info!("{}", line);
    }
}

/// Renames and transfers a run would perform, in order
fn plan(args: &MigrateArgs, issues: &[Issue]) -> Vec<String> {
    let mut lines = Vec::new();

    for issue in issues {
        let title = match &args.prepend {
            Some(prepend) => {
                let new_title = rewrite_prefix(&issue.title, prepend);
                if new_title != issue.title {
                    lines.push(format!(
                        "Would rename #{}: {} -> {}",
                        issue.number, issue.title, new_title
                    ));
                }
                new_title
            }
            None => issue.title.clone(),
        };

        lines.push(format!(
            "Would transfer #{}: {} from {} to {}",
            issue.number, title, args.origin, args.destination
        ));
    }

    lines
}

//! Terminal merge dialog

use async_trait::async_trait;
use console::style;
use dialoguer::{Select, theme::ColorfulTheme};
use flsync_core::{MergeOutcome, MergeRequest, MergeResolver, TaskFileState};

/// Asks per conflicting file which side to keep
pub struct TerminalMergeResolver;

#[async_trait]
impl MergeResolver for TerminalMergeResolver {
    async fn resolve(&self, request: &MergeRequest) -> MergeOutcome {
        let request = request.clone();
        match tokio::task::spawn_blocking(move || ask(&request)).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                tracing::warn!("Merge dialog failed, cancelling: {}", e);
                MergeOutcome::Cancelled
            }
            Err(e) => {
                tracing::error!("Merge dialog panicked: {}", e);
                MergeOutcome::Cancelled
            }
        }
    }
}

/// Choice for one conflicting path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    TakeCurrent,
    KeepTarget,
    Cancel,
}

fn ask(request: &MergeRequest) -> dialoguer::Result<MergeOutcome> {
    println!(
        "\n{} `{}` -> `{}` has {} conflicting file(s)",
        style("Merge").bold(),
        request.current_task_name,
        request.target_task_name,
        request.conflicts.len()
    );

    let items = [
        format!("Take `{}` version", request.current_task_name),
        format!("Keep `{}` version", request.target_task_name),
        "Cancel propagation".to_string(),
    ];
    let mut choices = Vec::with_capacity(request.conflicts.len());
    for path in &request.conflicts {
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("{}", style(path).cyan()))
            .items(&items)
            .default(0)
            .interact_opt()?;
        let choice = match selection {
            Some(0) => Choice::TakeCurrent,
            Some(1) => Choice::KeepTarget,
            _ => Choice::Cancel,
        };
        if choice == Choice::Cancel {
            return Ok(MergeOutcome::Cancelled);
        }
        choices.push((path.clone(), choice));
    }

    Ok(MergeOutcome::Accepted(merged_state(request, &choices)))
}

/// Final target content: the auto-resolved state with each conflict replaced
/// by the chosen side; a side without the file deletes it
fn merged_state(request: &MergeRequest, choices: &[(String, Choice)]) -> TaskFileState {
    let mut merged = request.resolved_state.clone();
    for (path, choice) in choices {
        let source = match choice {
            Choice::TakeCurrent => &request.current_state,
            _ => &request.target_state,
        };
        match source.get(path) {
            Some(content) => merged.insert(path.clone(), content),
            None => {
                merged.remove(path);
            }
        }
    }
    merged
}

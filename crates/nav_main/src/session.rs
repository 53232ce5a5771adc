//! Scripted paging session and bus observers

use crate::store::Catalog;
use nav_core::{Input, InputSender, ItemId, ViewerEvent};
use std::time::Duration;
use tokio::sync::mpsc;

/// One step of a scripted session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Wait(u64),
    Send(Input),
}

/// Slow paging, key-repeat storm, reversal, cold jump, missing post
pub fn demo_script() -> Vec<Step> {
    let mut steps = vec![Step::Send(Input::SetWanted(ItemId(1))), Step::Wait(400)];

    // Reading page by page lets the predictions become eligible
    for id in 2..=4 {
        steps.push(Step::Send(Input::Navigate(ItemId(id))));
        steps.push(Step::Wait(700));
    }

    // Holding the right arrow
    for id in 5..=9 {
        steps.push(Step::Send(Input::Navigate(ItemId(id))));
        steps.push(Step::Wait(40));
    }
    steps.push(Step::Wait(900));

    // Reversing direction
    for id in [8, 7] {
        steps.push(Step::Send(Input::Navigate(ItemId(id))));
        steps.push(Step::Wait(40));
    }
    steps.push(Step::Wait(900));

    // Jump to a post that is not registered, then page past it mid-fetch
    steps.push(Step::Send(Input::SetWanted(ItemId(31))));
    steps.push(Step::Wait(60));
    steps.push(Step::Send(Input::SetWanted(ItemId(32))));
    steps.push(Step::Wait(900));

    // Missing upstream
    steps.push(Step::Send(Input::SetWanted(ItemId(13))));
    steps.push(Step::Wait(900));

    steps.push(Step::Send(Input::Shutdown));
    steps
}

/// Feed a script into the viewer
pub async fn run_script(inputs: InputSender, steps: Vec<Step>) -> nav_core::error::Result<()> {
    for step in steps {
        match step {
            Step::Wait(ms) => tokio::time::sleep(Duration::from_millis(ms)).await,
            Step::Send(input) => {
                tracing::debug!(?input, "Script");
                inputs.send(input)?;
            }
        }
    }
    Ok(())
}

/// Title bar, history sync and predictor, all driven by bus events
pub async fn observe(
    mut events: mpsc::UnboundedReceiver<ViewerEvent>,
    inputs: InputSender,
    catalog: Catalog,
    preload_count: usize,
) {
    while let Some(event) = events.recv().await {
        match event {
            ViewerEvent::DisplayedItemChanged { id } => {
                tracing::info!(title = %format!("Post {} - postview", id.0), "Title updated");
                tracing::debug!(path = %format!("/posts/{}", id.0), "History updated");

                let predicted = catalog.following(id, preload_count);
                if inputs.send(Input::Warm(predicted)).is_err() {
                    break;
                }
            }
            ViewerEvent::ImageReady { id } => {
                tracing::debug!(%id, "Image ready");
            }
        }
    }
}

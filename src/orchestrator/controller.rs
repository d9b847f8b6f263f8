//! Wizard session lifecycle controller.

use anyhow::{Context, Result};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::api::BackendClient;
use crate::geocode::Geocoder;
use crate::model::{AuthSession, WizardCommand, WizardEvent};
use crate::wizard::WizardSession;

/// Handle for a running wizard session task.
pub struct SessionHandle {
    pub commands: UnboundedSender<WizardCommand>,
    pub events: UnboundedReceiver<WizardEvent>,
    pub task: JoinHandle<Result<()>>,
}

impl SessionHandle {
    /// Ask the session to quit and wait for the task to finish.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.commands.send(WizardCommand::Quit);
        self.task
            .await
            .context("wizard session task panicked")?
            .context("wizard session failed")
    }
}

/// Spawn a wizard session and return its command/event endpoints.
pub fn spawn_session<G: Geocoder + 'static>(
    api: BackendClient,
    geocoder: G,
    auth: AuthSession,
) -> SessionHandle {
    let (event_tx, events) = mpsc::unbounded_channel();
    let (commands, cmd_rx) = mpsc::unbounded_channel();
    let session = WizardSession::new(api, geocoder, auth, event_tx);
    let task = tokio::spawn(async move { session.run(cmd_rx).await });
    SessionHandle {
        commands,
        events,
        task,
    }
}

use crate::api::LanguageModel;
use crate::chat::{build_conversation, ChatRequest, ChatSurface};
use crate::error::Result;
use crate::models::HistoryTurn;
use crate::orchestrator::{Orchestrator, TurnOutcome};
use crate::settings::SettingsStore;
use crate::tools::{ToolContext, ToolRegistry, COMMANDER_TAG};
use std::sync::Arc;

/// The chat participant: answers one request using the model and the tagged tools.
pub struct CommanderParticipant {
    registry: ToolRegistry,
    settings: Arc<dyn SettingsStore>,
    system_prompt: String,
    max_rounds: u32,
}

impl CommanderParticipant {
    pub fn new(
        registry: ToolRegistry,
        settings: Arc<dyn SettingsStore>,
        system_prompt: impl Into<String>,
        max_rounds: u32,
    ) -> Self {
        Self {
            registry,
            settings,
            system_prompt: system_prompt.into(),
            max_rounds,
        }
    }

    pub async fn handle_request(
        &self,
        model: &dyn LanguageModel,
        request: &ChatRequest,
        history: &[HistoryTurn],
        surface: &mut dyn ChatSurface,
    ) -> Result<TurnOutcome> {
        let tools = self.registry.descriptors_tagged(COMMANDER_TAG);
        let messages = build_conversation(&self.system_prompt, history, &request.prompt);

        tracing::debug!(
            model = model.family(),
            tools = tools.len(),
            history = history.len(),
            "Handling chat request"
        );

        let orchestrator = Orchestrator::new(
            model,
            &self.registry,
            tools,
            ToolContext::new(Arc::clone(&self.settings)),
            self.max_rounds,
        );

        let outcome = orchestrator.run(messages, surface).await;
        surface.finish()?;
        outcome
    }
}

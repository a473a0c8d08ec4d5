use super::directive::AgentDirective;
use super::errors::AgentError;
use super::models::AgentOptions;
use super::parser::interpret;
use crate::application::gateway::ToolGateway;
use crate::domain::tool::ToolDeclaration;
use crate::domain::types::{Conversation, FunctionCall, Turn};
use crate::model::{ModelError, ModelProvider, ModelRequest, ModelResponse};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct Agent<P: ModelProvider> {
    provider: Arc<P>,
    gateway: Arc<dyn ToolGateway>,
    declarations: Vec<ToolDeclaration>,
    conversation: Conversation,
    options: AgentOptions,
}

impl<P: ModelProvider> Agent<P> {
    pub fn new(
        provider: Arc<P>,
        gateway: Arc<dyn ToolGateway>,
        declarations: Vec<ToolDeclaration>,
        options: AgentOptions,
    ) -> Self {
        Self {
            provider,
            gateway,
            declarations,
            conversation: Conversation::new(),
            options,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn declarations(&self) -> &[ToolDeclaration] {
        &self.declarations
    }

    pub fn options(&self) -> &AgentOptions {
        &self.options
    }

    /// Answers one user input. Whatever the outcome, the conversation ends
    /// with a complete model text turn: the answer or the error message.
    pub async fn handle_input(&mut self, input: &str) -> Result<String, AgentError> {
        info!(model = %self.options.model, "Agent run started");
        self.conversation.push(Turn::user_text(input));

        match self.run_until_answer().await {
            Ok(answer) => {
                info!("Agent returned final response");
                self.conversation.push(Turn::model_text(answer.clone()));
                Ok(answer)
            }
            Err(err) => {
                warn!(%err, "Agent run ended without an answer");
                self.conversation.push(Turn::model_text(err.user_message()));
                Err(err)
            }
        }
    }

    async fn run_until_answer(&mut self) -> Result<String, AgentError> {
        let mut depth = 0usize;
        loop {
            let response = self.generate().await?;
            match interpret(response, self.provider.id())? {
                AgentDirective::Final { response } => return Ok(response),
                AgentDirective::CallTool(call) => {
                    if depth >= self.options.max_depth {
                        warn!(
                            depth,
                            limit = self.options.max_depth,
                            tool = %call.name,
                            "Agent exceeded max tool interactions"
                        );
                        return Err(AgentError::DepthExceeded {
                            limit: self.options.max_depth,
                        });
                    }
                    depth += 1;
                    info!(tool = %call.name, depth, "Agent requested tool execution");
                    self.execute(call).await?;
                }
            }
        }
    }

    async fn generate(&self) -> Result<ModelResponse, ModelError> {
        let request = ModelRequest {
            model: self.options.model.clone(),
            contents: self.conversation.turns().to_vec(),
            tools: self.declarations.clone(),
            system_instruction: self.options.system_prompt.clone(),
        };
        debug!(turns = request.contents.len(), "Submitting conversation to model");

        tokio::time::timeout(self.options.model_timeout, self.provider.generate(request))
            .await
            .map_err(|_| ModelError::Timeout {
                seconds: self.options.model_timeout.as_secs(),
            })?
    }

    /// Appends the call and its response as one unit. A structural gateway
    /// failure still records a response before it is reported.
    async fn execute(&mut self, call: FunctionCall) -> Result<(), AgentError> {
        let name = call.name.clone();
        let arguments = call.arguments();
        self.conversation.push(Turn::function_call(call));

        let outcome = tokio::time::timeout(
            self.options.tool_timeout,
            self.gateway.invoke_tool(&name, arguments),
        )
        .await;

        let (text, is_error, failure) = match outcome {
            Ok(Ok(result)) => {
                debug!(tool = %name, is_error = result.is_error, "Tool returned");
                (result.text_content(), result.is_error, None)
            }
            Ok(Err(err)) if err.is_structural() => (err.diagnostic(), true, Some(err)),
            Ok(Err(err)) => {
                warn!(tool = %name, %err, "Tool call failed; reporting to model");
                (err.diagnostic(), true, None)
            }
            Err(_) => {
                warn!(tool = %name, "Tool call timed out");
                (
                    format!(
                        "Tool \"{name}\" did not finish within {} seconds.",
                        self.options.tool_timeout.as_secs()
                    ),
                    true,
                    None,
                )
            }
        };
        self.conversation
            .push(Turn::function_result(name.clone(), text, is_error));

        match failure {
            Some(source) => Err(AgentError::Tool { tool: name, source }),
            None => Ok(()),
        }
    }
}

use crate::domain::types::FunctionCall;

#[derive(Debug, PartialEq)]
pub enum AgentDirective {
    Final { response: String },
    CallTool(FunctionCall),
}

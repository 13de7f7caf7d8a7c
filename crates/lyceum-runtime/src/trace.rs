//! One structured trace line per content block.

use tracing::{info, warn};

use lyceum_protocols::{Block, Turn, TurnId};

const PREVIEW_CHARS: usize = 160;

/// What gets logged for a single block.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceLine {
    pub agent: String,
    pub turn: Option<TurnId>,
    pub kind: &'static str,
    pub tool: Option<String>,
    pub is_error: Option<bool>,
    pub summary: String,
}

impl TraceLine {
    pub fn from_block(agent: &str, turn: Option<TurnId>, block: &Block) -> Self {
        let (tool, is_error, summary) = match block {
            Block::Text { text } => (None, None, preview(text)),
            Block::Thinking { text, .. } => (None, None, preview(text)),
            Block::ToolUse { name, input, .. } => {
                (Some(name.clone()), None, preview(&input.to_string()))
            }
            Block::ToolResult {
                tool_name,
                content,
                is_error,
                ..
            } => (Some(tool_name.clone()), Some(*is_error), preview(content)),
        };

        Self {
            agent: agent.to_string(),
            turn,
            kind: block.kind(),
            tool,
            is_error,
            summary,
        }
    }

    pub fn emit(&self) {
        let tool = self.tool.as_deref().unwrap_or("");
        if self.is_error == Some(true) {
            warn!(
                target: "lyceum::trace",
                agent = %self.agent,
                turn = ?self.turn,
                kind = self.kind,
                tool,
                is_error = true,
                "{}",
                self.summary
            );
        } else {
            info!(
                target: "lyceum::trace",
                agent = %self.agent,
                turn = ?self.turn,
                kind = self.kind,
                tool,
                is_error = self.is_error.unwrap_or(false),
                "{}",
                self.summary
            );
        }
    }
}

/// Emit a line for every block of a persisted turn.
pub fn trace_turn(agent: &str, turn: &Turn) -> Vec<TraceLine> {
    trace_blocks(agent, Some(turn.id), &turn.content)
}

/// Emit a line for every block, with an optional turn id.
pub fn trace_blocks(agent: &str, turn: Option<TurnId>, blocks: &[Block]) -> Vec<TraceLine> {
    blocks
        .iter()
        .map(|block| {
            let line = TraceLine::from_block(agent, turn, block);
            line.emit();
            line
        })
        .collect()
}

fn preview(text: &str) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= PREVIEW_CHARS {
        flat
    } else {
        let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut)
    }
}

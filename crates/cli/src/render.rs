//! Transcript rendering for the terminal.

use drafter_core::message::{Message, Role};

/// Print one transcript message with its role prefix.
///
/// The first user message each session is the canned greeting the agent
/// opens with, so user messages are shown too.
pub fn print_message(message: &Message) {
    match message.role {
        Role::User => println!("\n👤 USER: {}", message.content),
        Role::Assistant => {
            if !message.content.is_empty() {
                println!("\n🤖 AI: {}", message.content);
            }
            if !message.tool_calls.is_empty() {
                let names: Vec<&str> = message
                    .tool_calls
                    .iter()
                    .map(|call| call.name.as_str())
                    .collect();
                println!("🔧 USING TOOLS: {names:?}");
            }
        }
        Role::Tool => println!("\n🛠️ TOOL RESULT: {}", message.content),
        // The directive is rendered per call and never appears in the
        // transcript, so this arm is unreachable in practice.
        Role::System => {}
    }
}

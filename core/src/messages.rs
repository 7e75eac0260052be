use slide_common::{ChatMessage, OutlineRequest};

use crate::prompts::{system_prompt, user_prompt, Clock};

/// System message first, then the user message.
pub fn build_messages(request: &OutlineRequest, clock: &dyn Clock) -> [ChatMessage; 2] {
    [
        ChatMessage::system(system_prompt(
            request.tone.as_deref(),
            request.verbosity.as_deref(),
            request.instructions.as_deref(),
            request.include_title_slide,
        )),
        ChatMessage::user(user_prompt(
            &request.content,
            request.n_slides,
            request.language.as_deref(),
            request.additional_context.as_deref(),
            clock,
        )),
    ]
}

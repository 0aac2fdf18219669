//! Conversation history windowing.

use campus_core::{ConversationTurn, TurnRole};

use crate::prompt::PromptMessage;

/// Convert the most recent `limit` non-blank turns into prompt messages.
///
/// Blank turns are dropped before the window is applied, so they never use
/// up a slot. Order is preserved.
pub fn build_history_messages(turns: &[ConversationTurn], limit: usize) -> Vec<PromptMessage> {
    let turns_to_use = turns
        .iter()
        .filter(|turn| turn.has_content())
        .rev()
        .take(limit)
        .collect::<Vec<_>>();

    turns_to_use.into_iter().rev().map(convert_turn).collect()
}

fn convert_turn(turn: &ConversationTurn) -> PromptMessage {
    match turn.role {
        TurnRole::User => PromptMessage::user(turn.content.clone()),
        TurnRole::Assistant => PromptMessage::assistant(turn.content.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::PromptRole;

    fn numbered_turns(count: usize) -> Vec<ConversationTurn> {
        (0..count)
            .map(|i| {
                if i % 2 == 0 {
                    ConversationTurn::user(format!("question {i}"))
                } else {
                    ConversationTurn::assistant(format!("answer {i}"))
                }
            })
            .collect()
    }

    #[test]
    fn test_keeps_most_recent_turns_in_order() {
        let messages = build_history_messages(&numbered_turns(10), 4);
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["question 6", "answer 7", "question 8", "answer 9"]);
        assert_eq!(messages[0].role, PromptRole::User);
        assert_eq!(messages[1].role, PromptRole::Assistant);
    }

    #[test]
    fn test_shorter_history_is_kept_whole() {
        let messages = build_history_messages(&numbered_turns(3), 6);
        assert_eq!(messages.len(), 3);
    }

    #[test]
    fn test_zero_window_drops_history() {
        assert!(build_history_messages(&numbered_turns(5), 0).is_empty());
    }

    #[test]
    fn test_blank_turns_do_not_use_window_slots() {
        let turns = vec![
            ConversationTurn::user("first"),
            ConversationTurn::assistant("reply"),
            ConversationTurn::user("   "),
            ConversationTurn::assistant(""),
        ];
        let messages = build_history_messages(&turns, 2);
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "reply"]);
    }
}

//! core-keymap: the Normal-mode command grammar.
//!
//! Design principles:
//! - Pure and deterministic: resolution depends only on the command buffer.
//! - The grammar is a static table of [`Rule`]s, not behavior. Resolving a buffer yields a
//!   [`CommandAction`] value which the dispatcher executes against the active document.
//! - Full match only. A buffer that is a strict prefix of a pattern (`g` before `gg`, `1`
//!   before `1j`) resolves to `None` and stays pending; so does a buffer that can never
//!   match (`:x`, `0j`). There is no dead-end detection.
//! - Patterns are mutually exclusive: at most one rule fully matches any buffer.
//! - No side effects: logging only at TRACE.

use tracing::trace;

/// Cursor direction of a counted motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Down,
    Up,
    Right,
}

/// What a fully matched command does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandAction {
    Motion { direction: Direction, count: u32 },
    EnterInsert,
    EnterInsertAtLineEnd,
    JumpLineStart,
    JumpLineEnd,
    JumpDocumentStart,
    JumpDocumentEnd,
    FileSave,
    FileClose { forced: bool },
    FileSaveAndClose,
}

impl CommandAction {
    /// True for the colon commands acting on the document's file.
    pub fn is_file_command(&self) -> bool {
        matches!(
            self,
            CommandAction::FileSave
                | CommandAction::FileClose { .. }
                | CommandAction::FileSaveAndClose
        )
    }
}

/// When a rule is eligible to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Checked after every grammar-significant keystroke.
    Keystroke,
    /// Checked only when the confirm key (Enter) is pressed.
    Confirm,
}

/// Shape of the text a rule accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Exactly this text.
    Literal(&'static str),
    /// Optional decimal count (first digit 1-9) followed by the motion key.
    Counted(char),
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub pattern: Pattern,
    pub trigger: Trigger,
    pub action: RuleAction,
}

/// Action template of a rule; counted rules fill in the parsed count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAction {
    Fixed(CommandAction),
    Motion(Direction),
}

/// Upper bound applied to motion counts.
pub const MAX_COUNT: u32 = 999_999;

/// Every character that takes part in the grammar. In Normal mode these are accumulated into
/// the command buffer; any other printable key is swallowed without being recorded.
pub const GRAMMAR_KEYS: &str = "hjklgwqiAG^$:!0123456789";

const fn keystroke(pattern: Pattern, action: RuleAction) -> Rule {
    Rule {
        pattern,
        trigger: Trigger::Keystroke,
        action,
    }
}

const fn confirm(text: &'static str, action: CommandAction) -> Rule {
    Rule {
        pattern: Pattern::Literal(text),
        trigger: Trigger::Confirm,
        action: RuleAction::Fixed(action),
    }
}

pub static GRAMMAR: &[Rule] = &[
    keystroke(Pattern::Counted('h'), RuleAction::Motion(Direction::Left)),
    keystroke(Pattern::Counted('j'), RuleAction::Motion(Direction::Down)),
    keystroke(Pattern::Counted('k'), RuleAction::Motion(Direction::Up)),
    keystroke(Pattern::Counted('l'), RuleAction::Motion(Direction::Right)),
    keystroke(
        Pattern::Literal("i"),
        RuleAction::Fixed(CommandAction::EnterInsert),
    ),
    keystroke(
        Pattern::Literal("A"),
        RuleAction::Fixed(CommandAction::EnterInsertAtLineEnd),
    ),
    keystroke(
        Pattern::Literal("^"),
        RuleAction::Fixed(CommandAction::JumpLineStart),
    ),
    keystroke(
        Pattern::Literal("$"),
        RuleAction::Fixed(CommandAction::JumpLineEnd),
    ),
    keystroke(
        Pattern::Literal("gg"),
        RuleAction::Fixed(CommandAction::JumpDocumentStart),
    ),
    keystroke(
        Pattern::Literal("G"),
        RuleAction::Fixed(CommandAction::JumpDocumentEnd),
    ),
    confirm(":w", CommandAction::FileSave),
    confirm(":q", CommandAction::FileClose { forced: false }),
    confirm(":wq", CommandAction::FileSaveAndClose),
    confirm(":q!", CommandAction::FileClose { forced: true }),
];

/// True if `c` is grammar-significant.
pub fn is_grammar_key(c: char) -> bool {
    GRAMMAR_KEYS.contains(c)
}

impl Rule {
    /// Full-match `input` against this rule.
    pub fn full_match(&self, input: &str) -> Option<CommandAction> {
        match (self.pattern, self.action) {
            (Pattern::Literal(text), RuleAction::Fixed(action)) => {
                (input == text).then_some(action)
            }
            (Pattern::Counted(key), RuleAction::Motion(direction)) => {
                let digits = input.strip_suffix(key)?;
                let count = parse_count(digits)?;
                Some(CommandAction::Motion { direction, count })
            }
            // Table entries only pair literals with fixed actions and counted patterns with motions.
            _ => None,
        }
    }
}

/// Parse an optional count prefix. Empty means 1; a leading zero or any non-digit rejects.
fn parse_count(digits: &str) -> Option<u32> {
    if digits.is_empty() {
        return Some(1);
    }
    let mut chars = digits.chars();
    if !matches!(chars.next(), Some('1'..='9')) || !chars.all(|c| c.is_ascii_digit()) {
        return None;
    }
    let count = digits.bytes().fold(0u32, |acc, b| {
        acc.saturating_mul(10)
            .saturating_add(u32::from(b - b'0'))
            .min(MAX_COUNT)
    });
    Some(count)
}

fn resolve(input: &str, trigger: Trigger) -> Option<CommandAction> {
    let found = GRAMMAR
        .iter()
        .filter(|r| r.trigger == trigger)
        .find_map(|r| r.full_match(input));
    trace!(target: "input.grammar", len = input.len(), ?trigger, matched = ?found, "resolve");
    found
}

/// Resolve the command buffer after a grammar-significant keystroke.
pub fn match_keystroke(input: &str) -> Option<CommandAction> {
    resolve(input, Trigger::Keystroke)
}

/// Resolve the command buffer against the file commands (`:w`, `:q`, `:wq`, `:q!`).
pub fn match_file_command(input: &str) -> Option<CommandAction> {
    resolve(input, Trigger::Confirm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn motion(direction: Direction, count: u32) -> Option<CommandAction> {
        Some(CommandAction::Motion { direction, count })
    }

    #[test]
    fn bare_motions_default_to_one() {
        assert_eq!(match_keystroke("h"), motion(Direction::Left, 1));
        assert_eq!(match_keystroke("j"), motion(Direction::Down, 1));
        assert_eq!(match_keystroke("k"), motion(Direction::Up, 1));
        assert_eq!(match_keystroke("l"), motion(Direction::Right, 1));
    }

    #[test]
    fn counted_motions() {
        assert_eq!(match_keystroke("12j"), motion(Direction::Down, 12));
        assert_eq!(match_keystroke("105l"), motion(Direction::Right, 105));
        assert_eq!(match_keystroke("9k"), motion(Direction::Up, 9));
    }

    #[test]
    fn leading_zero_never_matches() {
        assert_eq!(match_keystroke("0j"), None);
        assert_eq!(match_keystroke("0"), None);
        assert_eq!(match_keystroke("012h"), None);
    }

    #[test]
    fn huge_counts_saturate() {
        assert_eq!(
            match_keystroke("99999999999999j"),
            motion(Direction::Down, MAX_COUNT)
        );
    }

    #[test]
    fn single_key_commands() {
        assert_eq!(match_keystroke("i"), Some(CommandAction::EnterInsert));
        assert_eq!(
            match_keystroke("A"),
            Some(CommandAction::EnterInsertAtLineEnd)
        );
        assert_eq!(match_keystroke("^"), Some(CommandAction::JumpLineStart));
        assert_eq!(match_keystroke("$"), Some(CommandAction::JumpLineEnd));
        assert_eq!(match_keystroke("G"), Some(CommandAction::JumpDocumentEnd));
    }

    #[test]
    fn gg_requires_both_keys() {
        assert_eq!(match_keystroke("g"), None);
        assert_eq!(match_keystroke("gg"), Some(CommandAction::JumpDocumentStart));
        assert_eq!(match_keystroke("ggg"), None);
    }

    #[test]
    fn prefixes_and_garbage_stay_pending() {
        for pending in ["1", "12", ":", ":w!", ":x", "2i", "3G", "gj", "jj"] {
            assert_eq!(match_keystroke(pending), None, "{pending:?}");
        }
    }

    #[test]
    fn file_commands_only_match_on_confirm() {
        assert_eq!(match_keystroke(":w"), None);
        assert_eq!(match_keystroke(":q!"), None);
        assert_eq!(match_file_command(":w"), Some(CommandAction::FileSave));
        assert_eq!(
            match_file_command(":q"),
            Some(CommandAction::FileClose { forced: false })
        );
        assert_eq!(
            match_file_command(":wq"),
            Some(CommandAction::FileSaveAndClose)
        );
        assert_eq!(
            match_file_command(":q!"),
            Some(CommandAction::FileClose { forced: true })
        );
        assert_eq!(match_file_command(":w "), None);
        assert_eq!(match_file_command("j"), None);
    }

    #[test]
    fn every_literal_uses_grammar_keys_only() {
        for rule in GRAMMAR {
            let text = match rule.pattern {
                Pattern::Literal(t) => t.to_string(),
                Pattern::Counted(k) => k.to_string(),
            };
            assert!(text.chars().all(is_grammar_key), "{text:?}");
        }
        assert!(!is_grammar_key('x'));
        assert!(!is_grammar_key('a'));
    }

    #[test]
    fn file_command_flag() {
        assert!(CommandAction::FileSave.is_file_command());
        assert!(!CommandAction::EnterInsert.is_file_command());
    }

    proptest! {
        #[test]
        fn at_most_one_rule_matches(input in "[hjklgwqiAG^$:!0-9]{0,5}") {
            let hits = GRAMMAR.iter().filter(|r| r.full_match(&input).is_some()).count();
            prop_assert!(hits <= 1, "{:?} matched {} rules", input, hits);
        }

        #[test]
        fn any_valid_count_round_trips(n in 1u32..=MAX_COUNT) {
            let input = format!("{n}l");
            prop_assert_eq!(
                match_keystroke(&input),
                Some(CommandAction::Motion { direction: Direction::Right, count: n })
            );
        }
    }
}

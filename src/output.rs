//! CLI output formatting.
//!
//! Output is **block-centric**: a story is shown as its ordered body, one
//! header line per block (position, component, uid) with indented context
//! lines underneath.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Home (home, id 412087, published)
//! 001 hero [hero-1]
//!     clean: hero
//!     editor: hero
//! 002 countdown_timer [countdown-1]
//!     clean: placeholder
//!     editor: missing
//!
//! 11 blocks, 1 unknown to the editor registry
//! ```
//!
//! ## Publish
//!
//! ```text
//! Published story 412087
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::content::{Block, ContentBlock, Story};
use crate::registry::RegistryKind;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn story_header(story: &Story) -> String {
    let state = if story.is_published() { "published" } else { "draft" };
    let name = if story.name.is_empty() { "(untitled)" } else { story.name.as_str() };
    format!("{} ({}, id {}, {})", name, story.full_slug, story.id, state)
}

fn block_line(index: usize, block: &ContentBlock) -> String {
    format!("{} {} [{}]", format_index(index), block.component, block.uid)
}

/// How a registry table handles one block: the entry name, or what happens
/// when there is none.
fn resolution(kind: RegistryKind, block: &ContentBlock) -> &'static str {
    let registry = kind.registry();
    match registry.names().find(|name| *name == block.component) {
        Some(name) => name,
        None if kind == RegistryKind::Clean => "placeholder",
        None => "missing",
    }
}

/// Per-block registry resolution for one story.
pub fn format_check(story: &Story) -> Vec<String> {
    let mut lines = vec![story_header(story)];
    let mut missing = 0;
    for (i, block) in story.blocks.iter().enumerate() {
        lines.push(block_line(i + 1, block));
        for kind in [RegistryKind::Clean, RegistryKind::Editor] {
            let resolved = resolution(kind, block);
            if resolved == "missing" {
                missing += 1;
            }
            lines.push(format!("{}{}: {}", indent(1), kind.as_str(), resolved));
        }
        if let Block::Unknown(_) = block.block {
            lines.push(format!("{}payload kept as raw JSON", indent(1)));
        }
    }
    lines.push(String::new());
    let noun = if story.blocks.len() == 1 { "block" } else { "blocks" };
    if missing == 0 {
        lines.push(format!("{} {}, all resolve in both registries", story.blocks.len(), noun));
    } else {
        lines.push(format!(
            "{} {}, {} unknown to the editor registry",
            story.blocks.len(),
            noun,
            missing
        ));
    }
    lines
}

pub fn print_check(story: &Story) {
    for line in format_check(story) {
        println!("{}", line);
    }
}

/// Blocks of `story` the editor registry cannot render.
pub fn editor_gaps(story: &Story) -> usize {
    story
        .blocks
        .iter()
        .filter(|block| resolution(RegistryKind::Editor, block) == "missing")
        .count()
}

pub fn format_publish(story_id: u64) -> Vec<String> {
    vec![format!("Published story {}", story_id)]
}

pub fn print_publish(story_id: u64) {
    for line in format_publish(story_id) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::home_story;

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    // =========================================================================
    // format_check
    // =========================================================================

    #[test]
    fn check_lists_blocks_in_order() {
        let lines = format_check(&home_story());
        assert_eq!(lines[0], "Home (home, id 412087, published)");
        assert_eq!(lines[1], "001 hero [hero-1]");
        assert_eq!(lines[2], "    clean: hero");
        assert_eq!(lines[3], "    editor: hero");
    }

    #[test]
    fn check_flags_unknown_component() {
        let lines = format_check(&home_story());
        let at = lines
            .iter()
            .position(|l| l.contains("countdown_timer"))
            .unwrap();
        assert_eq!(lines[at + 1], "    clean: placeholder");
        assert_eq!(lines[at + 2], "    editor: missing");
        assert_eq!(lines[at + 3], "    payload kept as raw JSON");
        assert!(lines.last().unwrap().ends_with("1 unknown to the editor registry"));
        assert_eq!(editor_gaps(&home_story()), 1);
    }

    #[test]
    fn check_clean_story_summary() {
        let mut story = home_story();
        story.blocks.retain(|b| !matches!(b.block, Block::Unknown(_)));
        let lines = format_check(&story);
        assert!(lines.last().unwrap().ends_with("all resolve in both registries"));
        assert_eq!(editor_gaps(&story), 0);
    }

    #[test]
    fn publish_line() {
        assert_eq!(format_publish(7), vec!["Published story 7"]);
    }
}

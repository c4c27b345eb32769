//! Splits post content into display blocks.
//!
//! This is a paragraph splitter, not a markdown parser. Content is cut at
//! blank lines and each block is classified by its leading characters:
//!
//! * `## ` opens a level-2 heading, `### ` a level-3 heading;
//! * a block whose every line starts with `- ` is an unordered list;
//! * a block whose every line starts with digits and a period is an
//!   ordered list (the number, period and following spaces are dropped);
//! * anything else is a paragraph.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    Heading2(String),
    Heading3(String),
    UnorderedList(Vec<String>),
    OrderedList(Vec<String>),
    Paragraph(String),
}

pub fn split_blocks(content: &str) -> Vec<ContentBlock> {
    let normalized = content.replace("\r\n", "\n");
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in normalized.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(classify(&current));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(classify(&current));
    }

    blocks
}

fn classify(lines: &[&str]) -> ContentBlock {
    let text = lines.join("\n");

    if let Some(rest) = text.strip_prefix("## ") {
        return ContentBlock::Heading2(rest.to_string());
    }
    if let Some(rest) = text.strip_prefix("### ") {
        return ContentBlock::Heading3(rest.to_string());
    }
    if lines.iter().all(|line| line.starts_with("- ")) {
        return ContentBlock::UnorderedList(
            lines.iter().map(|line| line[2..].to_string()).collect(),
        );
    }
    if lines.iter().all(|line| ordered_item(line).is_some()) {
        return ContentBlock::OrderedList(
            lines
                .iter()
                .filter_map(|line| ordered_item(line))
                .map(str::to_string)
                .collect(),
        );
    }

    ContentBlock::Paragraph(text)
}

/// Returns the item text of `12. item`, or `None` when the line lacks the
/// number-and-period prefix.
fn ordered_item(line: &str) -> Option<&str> {
    let digits = line.len() - line.trim_start_matches(|ch: char| ch.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    Some(rest.trim_start())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_blank_lines() {
        let blocks = split_blocks("First paragraph.\n\nSecond one\nwraps here.\n\n\n\nThird.");
        assert_eq!(
            blocks,
            vec![
                ContentBlock::Paragraph("First paragraph.".into()),
                ContentBlock::Paragraph("Second one\nwraps here.".into()),
                ContentBlock::Paragraph("Third.".into()),
            ]
        );
    }

    #[test]
    fn classifies_headings() {
        let blocks = split_blocks("## Overview\n\n### Details\n\n#### Deep");
        assert_eq!(
            blocks,
            vec![
                ContentBlock::Heading2("Overview".into()),
                ContentBlock::Heading3("Details".into()),
                ContentBlock::Paragraph("#### Deep".into()),
            ]
        );
    }

    #[test]
    fn classifies_lists() {
        let blocks = split_blocks("- one\n- two\n\n1. first\n2.second\n10.   tenth");
        assert_eq!(
            blocks,
            vec![
                ContentBlock::UnorderedList(vec!["one".into(), "two".into()]),
                ContentBlock::OrderedList(vec!["first".into(), "second".into(), "tenth".into()]),
            ]
        );
    }

    #[test]
    fn mixed_list_lines_fall_back_to_paragraph() {
        let blocks = split_blocks("- one\nnot an item\n\n1. first\n- second");
        assert_eq!(
            blocks,
            vec![
                ContentBlock::Paragraph("- one\nnot an item".into()),
                ContentBlock::Paragraph("1. first\n- second".into()),
            ]
        );
    }

    #[test]
    fn windows_line_endings_and_empty_content() {
        assert!(split_blocks("").is_empty());
        assert!(split_blocks("\n\n  \n").is_empty());
        assert_eq!(
            split_blocks("## Title\r\n\r\nBody"),
            vec![
                ContentBlock::Heading2("Title".into()),
                ContentBlock::Paragraph("Body".into()),
            ]
        );
    }
}

use std::fmt::Write as _;
use std::path::PathBuf;

use quire::domain::blocks::split_blocks;
use quire::presentation::views::BlockView;

use crate::context::AdminError;
use crate::io::read_value;

pub fn handle(file: PathBuf) -> Result<(), AdminError> {
    let markdown = read_value(None, Some(file))?;
    print!("{}", render_outline(&markdown));
    Ok(())
}

/// One line per block, tagged with the element it renders as.
pub fn render_outline(markdown: &str) -> String {
    let mut out = String::new();
    for block in split_blocks(markdown).into_iter().map(BlockView::from) {
        if block.items.is_empty() {
            let _ = writeln!(out, "[{}] {}", block.kind, block.text);
            continue;
        }
        let _ = writeln!(out, "[{}]", block.kind);
        for (index, item) in block.items.iter().enumerate() {
            if block.kind == "ol" {
                let _ = writeln!(out, "  {}. {item}", index + 1);
            } else {
                let _ = writeln!(out, "  - {item}");
            }
        }
    }
    out
}

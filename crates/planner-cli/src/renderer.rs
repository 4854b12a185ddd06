//! Markdown output for the shell, styled with termimad.

use std::fmt::Display;

use termimad::{MadSkin, crossterm::style::Color};

/// Prints the markdown produced by the planner display types.
///
/// Rich mode keeps heading markers visible and colours them, since entity
/// names are rendered as headings. Plain mode prints the markdown verbatim.
pub struct TerminalRenderer {
    rich: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Cyan);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich, skin }
    }

    pub fn render(&self, value: &impl Display) {
        let markdown = value.to_string();
        if !self.rich {
            print!("{markdown}");
            return;
        }

        for line in markdown.lines() {
            if line.starts_with('#') {
                println!("\x1b[36m{line}\x1b[0m");
            } else {
                self.skin.print_inline(line);
                println!();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_switch() {
        assert!(TerminalRenderer::new(true).rich);
        assert!(!TerminalRenderer::new(false).rich);
    }
}

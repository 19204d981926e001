use crate::types::Stage;

/// Terminals narrower than this use the compact layout.
pub const COMPACT_BREAKPOINT: u16 = 60;

pub struct Layout {
    pub term_width: u16,
    pub term_height: u16,
    pub compact: bool,
    /// Row of the key-hint bar.
    pub menu_y: u16,
    /// Rows between the hint bar and the text box, for background and character.
    pub stage_y: u16,
    pub stage_height: u16,
    pub text_x: u16,
    pub text_y: u16,
    pub text_width: u16,
    pub text_height: u16,
}

impl Layout {
    pub fn compute(term_width: u16, term_height: u16) -> Self {
        let compact = term_width < COMPACT_BREAKPOINT;
        let menu_h: u16 = 1;
        // Border rows plus dialogue rows.
        let text_height: u16 = if compact { 6 } else { 5 };
        let margin = if compact { 0 } else { term_width / 10 };
        let text_width = term_width.saturating_sub(margin * 2);
        let text_y = term_height.saturating_sub(text_height + 1);

        Layout {
            term_width,
            term_height,
            compact,
            menu_y: 0,
            stage_y: menu_h,
            stage_height: text_y.saturating_sub(menu_h),
            text_x: margin,
            text_y,
            text_width,
            text_height,
        }
    }

    /// Columns available for dialogue inside the text box border.
    pub fn inner_text_width(&self) -> usize {
        self.text_width.saturating_sub(4) as usize
    }

    pub fn inner_text_rows(&self) -> usize {
        self.text_height.saturating_sub(2) as usize
    }

    /// Left column of a character label of `width` columns.
    pub fn stage_x(&self, stage: Stage, width: u16) -> u16 {
        let free = self.term_width.saturating_sub(width);
        match stage {
            Stage::Left => free.min(2),
            Stage::Center => free / 2,
            Stage::Right => free.saturating_sub(2),
        }
    }
}

/// Wrap `text` to lines of at most `width` characters, breaking at spaces
/// where possible. Explicit newlines are kept.
///
/// Width is counted in `char`s, not terminal cells: a line of double-width
/// glyphs (CJK, most emoji) can take up to twice `width` columns and will
/// run past the text box frame.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_len = 0;
        for word in paragraph.split(' ') {
            let word_len = word.chars().count();
            let sep = usize::from(line_len > 0);
            if line_len + sep + word_len > width && line_len > 0 {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            } else if sep == 1 {
                line.push(' ');
                line_len += 1;
            }

            // Words longer than a full line are split hard.
            let mut chars = word.chars().peekable();
            while chars.peek().is_some() {
                if line_len == width {
                    lines.push(std::mem::take(&mut line));
                    line_len = 0;
                }
                if let Some(c) = chars.next() {
                    line.push(c);
                    line_len += 1;
                }
            }
        }
        lines.push(line);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_below_breakpoint() {
        assert!(Layout::compute(40, 20).compact);
        let wide = Layout::compute(100, 30);
        assert!(!wide.compact);
        assert_eq!(wide.text_x, 10);
        assert_eq!(wide.text_width, 80);
        assert_eq!(wide.text_y + wide.text_height, 29);
    }

    #[test]
    fn stage_positions() {
        let layout = Layout::compute(80, 24);
        assert_eq!(layout.stage_x(Stage::Left, 10), 2);
        assert_eq!(layout.stage_x(Stage::Center, 10), 35);
        assert_eq!(layout.stage_x(Stage::Right, 10), 68);
    }

    #[test]
    fn wraps_at_word_boundaries() {
        assert_eq!(
            wrap("Memory and reality blur", 10),
            ["Memory and", "reality", "blur"]
        );
    }

    #[test]
    fn splits_long_words_and_keeps_newlines() {
        assert_eq!(wrap("abcdefgh", 3), ["abc", "def", "gh"]);
        assert_eq!(wrap("a\nb", 10), ["a", "b"]);
        assert_eq!(wrap("", 10), [""]);
    }

    #[test]
    fn counts_chars_not_bytes_or_cells() {
        assert_eq!(wrap("ああ いい", 2), ["ああ", "いい"]);
    }
}

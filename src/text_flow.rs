//! Line placement primitives shared by the card renderer.
//!
//! Every routine records the exact text it draws, one line per entry followed
//! by a newline, into a per-card buffer. The card fingerprint is computed over
//! that buffer, so its contents must depend only on the card and the
//! configuration.

use crate::canvas::Canvas;
use crate::font::FontSpec;
use crate::types::Pt;
use crate::warnings::{LayoutWarnings, SlotRef, WarningKind};

pub struct TextFlow<'a> {
    canvas: &'a mut Canvas,
    warnings: &'a mut LayoutWarnings,
    slot: SlotRef,
    drawn: String,
}

impl<'a> TextFlow<'a> {
    pub fn new(canvas: &'a mut Canvas, warnings: &'a mut LayoutWarnings, slot: SlotRef) -> Self {
        Self {
            canvas,
            warnings,
            slot,
            drawn: String::new(),
        }
    }

    pub fn canvas(&mut self) -> &mut Canvas {
        self.canvas
    }

    pub fn slot(&self) -> SlotRef {
        self.slot
    }

    /// Everything drawn so far, in drawing order.
    pub fn drawn(&self) -> &str {
        &self.drawn
    }

    pub fn warn(&mut self, kind: WarningKind, message: impl Into<String>) {
        self.warnings.record(kind, self.slot, message);
    }

    /// Draws `text` with its baseline origin at (x, baseline).
    pub fn text_at(&mut self, text: &str, x: Pt, baseline: Pt, font: &FontSpec) {
        if !text.is_empty() {
            self.canvas.set_font(font);
            self.canvas.draw_string(x, baseline, text);
        }
        self.drawn.push_str(text);
        self.drawn.push('\n');
    }

    /// One line centered in `[x, x + max_width]` whose line box starts at `y`.
    /// Returns the leading consumed.
    pub fn centered_line(
        &mut self,
        text: &str,
        x: Pt,
        y: Pt,
        max_width: Pt,
        font: &FontSpec,
    ) -> Pt {
        let width = font.text_width(text);
        if width > max_width {
            self.warn(
                WarningKind::HorizontalOverflow,
                overflow_message(text, width, max_width),
            );
        }
        let left = x + (max_width - width) / 2;
        self.text_at(text, left, y - font.ascent(), font);
        font.leading()
    }

    /// Like [`TextFlow::centered_line`], but a line that does not fit is split
    /// once at the space closest to its middle. Returns one or two leadings.
    pub fn breakable_centered_line(
        &mut self,
        text: &str,
        x: Pt,
        y: Pt,
        max_width: Pt,
        font: &FontSpec,
    ) -> Pt {
        if font.text_width(text) <= max_width {
            return self.centered_line(text, x, y, max_width, font);
        }
        let Some(split) = middle_space(text) else {
            return self.centered_line(text, x, y, max_width, font);
        };
        let (head, tail) = (&text[..split], &text[split + 1..]);
        let first = self.centered_line(head, x, y, max_width, font);
        let second = self.centered_line(tail, x, y - first, max_width, font);
        first + second
    }

    /// One line whose right edge sits at `x + max_width`.
    pub fn right_aligned_line(
        &mut self,
        text: &str,
        x: Pt,
        y: Pt,
        max_width: Pt,
        font: &FontSpec,
    ) -> Pt {
        let width = font.text_width(text);
        if width > max_width {
            self.warn(
                WarningKind::HorizontalOverflow,
                overflow_message(text, width, max_width),
            );
        }
        self.text_at(text, x + max_width - width, y - font.ascent(), font);
        font.leading()
    }

    /// Greedy word wrap starting at `y`. Newlines are hard breaks. Lines past
    /// `max_height` are still drawn; the first one reports a vertical overflow.
    /// Returns the height consumed plus a quarter leading of paragraph gap, or
    /// zero for empty text.
    pub fn wrap_and_flow(
        &mut self,
        text: &str,
        x: Pt,
        y: Pt,
        max_width: Pt,
        max_height: Pt,
        font: &FontSpec,
    ) -> Pt {
        if text.is_empty() {
            return Pt::ZERO;
        }
        let leading = font.leading();
        let lines: Vec<String> = text
            .split('\n')
            .flat_map(|paragraph| wrap_paragraph(paragraph, max_width, font))
            .collect();
        let total: usize = lines.iter().map(|line| line.chars().count()).sum();

        let mut height = Pt::ZERO;
        let mut placed = 0usize;
        let mut overflowed = false;
        for line in &lines {
            if !overflowed && height + leading > max_height {
                overflowed = true;
                self.warn(
                    WarningKind::VerticalOverflow,
                    format!(
                        "text out of vertical space, placed {placed} of {total} characters"
                    ),
                );
            }
            self.text_at(line, x, y - height - font.ascent(), font);
            height += leading;
            if !overflowed {
                placed += line.chars().count();
            }
        }
        height + leading.mul_ratio(1, 4)
    }
}

fn overflow_message(text: &str, width: Pt, max_width: Pt) -> String {
    format!(
        "\"{text}\" out of horizontal space ({:.1}pt wide, {:.1}pt available)",
        width.to_f32(),
        max_width.to_f32()
    )
}

/// Byte offset of the space closest to the middle character; ties go left.
fn middle_space(text: &str) -> Option<usize> {
    let chars = text.chars().count() as i64;
    let mut best: Option<(i64, usize)> = None;
    for (char_index, (byte_index, ch)) in text.char_indices().enumerate() {
        if ch != ' ' {
            continue;
        }
        let distance = (2 * char_index as i64 - chars).abs();
        if best.is_none_or(|(d, _)| distance < d) {
            best = Some((distance, byte_index));
        }
    }
    best.map(|(_, byte_index)| byte_index)
}

/// Packs space-separated words into lines no wider than `max_width`, measuring
/// each candidate line as a whole string. A word wider than the box gets a
/// line of its own.
fn wrap_paragraph(paragraph: &str, max_width: Pt, font: &FontSpec) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Option<String> = None;
    for word in paragraph.split(' ') {
        current = Some(match current.take() {
            None => word.to_string(),
            Some(line) => {
                let candidate = format!("{line} {word}");
                if font.text_width(&candidate) <= max_width {
                    candidate
                } else {
                    lines.push(line);
                    word.to_string()
                }
            }
        });
    }
    lines.extend(current);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Command;
    use crate::font::BuiltinFont;
    use crate::types::Size;

    const SLOT: SlotRef = SlotRef { page: 3, card: 5 };

    fn pt(value: f32) -> Pt {
        Pt::from_f32(value)
    }

    fn font() -> FontSpec {
        FontSpec::new(BuiltinFont::Courier, 10.0)
    }

    fn positions(canvas: Canvas) -> Vec<(Pt, Pt, String)> {
        canvas.finish().pages[0]
            .commands
            .iter()
            .filter_map(|cmd| match cmd {
                Command::DrawString { x, y, text } => Some((*x, *y, text.clone())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn centered_line_centers_and_records() {
        let mut canvas = Canvas::new(Size::new(200.0, 200.0));
        let mut warnings = LayoutWarnings::new();
        let mut flow = TextFlow::new(&mut canvas, &mut warnings, SLOT);
        // Courier is 600 units per glyph: "abcd" at 10pt is 24pt wide.
        let used = flow.centered_line("abcd", pt(10.0), pt(100.0), pt(100.0), &font());
        assert_eq!(used, pt(11.25));
        assert_eq!(flow.drawn(), "abcd\n");
        drop(flow);
        assert!(warnings.is_empty());
        let drawn = positions(canvas);
        assert_eq!(drawn[0].0, pt(48.0));
        assert_eq!(drawn[0].1, pt(100.0) - font().ascent());
    }

    #[test]
    fn centered_overflow_warns_but_draws() {
        let mut canvas = Canvas::new(Size::new(200.0, 200.0));
        let mut warnings = LayoutWarnings::new();
        let mut flow = TextFlow::new(&mut canvas, &mut warnings, SLOT);
        flow.centered_line("abcdefghij", Pt::ZERO, pt(50.0), pt(30.0), &font());
        drop(flow);
        assert_eq!(warnings.len(), 1);
        let message = &warnings.messages()[0];
        assert!(message.starts_with("page 3, card 5:"));
        assert!(message.contains("horizontal space"));
        assert_eq!(positions(canvas).len(), 1);
    }

    #[test]
    fn breakable_line_splits_at_the_middle_space() {
        let mut canvas = Canvas::new(Size::new(200.0, 200.0));
        let mut warnings = LayoutWarnings::new();
        let mut flow = TextFlow::new(&mut canvas, &mut warnings, SLOT);
        let used = flow.breakable_centered_line("aa bb cc", Pt::ZERO, pt(100.0), pt(40.0), &font());
        assert_eq!(used, pt(22.5));
        assert_eq!(flow.drawn(), "aa bb\ncc\n");
        drop(flow);
        assert!(warnings.is_empty());
    }

    #[test]
    fn middle_space_ties_go_left() {
        // 7 chars, spaces at 2 and 5: distances |4-7|=3 and |10-7|=3.
        assert_eq!(middle_space("ab cd e"), Some(2));
        assert_eq!(middle_space("abcdef"), None);
        assert_eq!(middle_space("\u{e9}\u{e9} x"), Some(4));
    }

    #[test]
    fn unbreakable_line_falls_back_to_one_line() {
        let mut canvas = Canvas::new(Size::new(200.0, 200.0));
        let mut warnings = LayoutWarnings::new();
        let mut flow = TextFlow::new(&mut canvas, &mut warnings, SLOT);
        let used = flow.breakable_centered_line("abcdefghij", Pt::ZERO, pt(50.0), pt(30.0), &font());
        assert_eq!(used, font().leading());
        drop(flow);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn right_aligned_line_ends_at_the_box_edge() {
        let mut canvas = Canvas::new(Size::new(200.0, 200.0));
        let mut warnings = LayoutWarnings::new();
        let mut flow = TextFlow::new(&mut canvas, &mut warnings, SLOT);
        flow.right_aligned_line("abc", pt(10.0), pt(90.0), pt(50.0), &font());
        drop(flow);
        let drawn = positions(canvas);
        assert_eq!(drawn[0].0, pt(42.0));
    }

    #[test]
    fn wrap_packs_words_greedily() {
        let lines = wrap_paragraph("aa bb cc dd", pt(30.0), &font());
        assert_eq!(lines, vec!["aa bb", "cc dd"]);
        let lines = wrap_paragraph("enormousword x", pt(30.0), &font());
        assert_eq!(lines, vec!["enormousword", "x"]);
    }

    #[test]
    fn wrap_honours_hard_breaks_and_trailing_newline() {
        let mut canvas = Canvas::new(Size::new(200.0, 200.0));
        let mut warnings = LayoutWarnings::new();
        let mut flow = TextFlow::new(&mut canvas, &mut warnings, SLOT);
        let used = flow.wrap_and_flow("one\ntwo\n", Pt::ZERO, pt(190.0), pt(100.0), pt(100.0), &font());
        // three lines plus a quarter-leading gap
        assert_eq!(used, pt(11.25) * 3 + pt(2.813));
        assert_eq!(flow.drawn(), "one\ntwo\n\n");
        drop(flow);
        assert_eq!(positions(canvas).len(), 2);
    }

    #[test]
    fn empty_text_consumes_nothing() {
        let mut canvas = Canvas::new(Size::new(200.0, 200.0));
        let mut warnings = LayoutWarnings::new();
        let mut flow = TextFlow::new(&mut canvas, &mut warnings, SLOT);
        assert_eq!(
            flow.wrap_and_flow("", Pt::ZERO, pt(100.0), pt(50.0), pt(50.0), &font()),
            Pt::ZERO
        );
        assert_eq!(flow.drawn(), "");
    }

    #[test]
    fn vertical_overflow_warns_once_and_keeps_drawing() {
        let mut canvas = Canvas::new(Size::new(200.0, 200.0));
        let mut warnings = LayoutWarnings::new();
        let mut flow = TextFlow::new(&mut canvas, &mut warnings, SLOT);
        let text = "aa bb cc dd ee ff gg";
        flow.wrap_and_flow(text, Pt::ZERO, pt(190.0), pt(20.0), pt(25.0), &font());
        drop(flow);
        assert_eq!(warnings.len(), 1);
        let message = &warnings.messages()[0];
        assert!(message.contains("page 3, card 5"));
        assert!(message.contains("placed 4 of 14 characters"));
        assert_eq!(positions(canvas).len(), 7);
    }
}

use crate::font::{BuiltinFont, FontSpec};
use crate::types::{Color, Pt, Size};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetFillColor(Color),
    SetStrokeColor(Color),
    SetLineWidth(Pt),
    SetFont(BuiltinFont),
    SetFontSize(Pt),
    MoveTo { x: Pt, y: Pt },
    LineTo { x: Pt, y: Pt },
    ClosePath,
    Fill,
    Stroke,
    FillStroke,
    DrawRect { x: Pt, y: Pt, width: Pt, height: Pt },
    /// Text drawn with its baseline origin at (x, y).
    DrawString { x: Pt, y: Pt, text: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub commands: Vec<Command>,
}

impl Page {
    /// Every string drawn on the page, in drawing order.
    pub fn strings(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            Command::DrawString { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// A document outline entry pointing at a page (0-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub title: String,
    pub page_index: usize,
}

#[derive(Debug, Clone)]
pub struct Document {
    pub page_size: Size,
    pub pages: Vec<Page>,
    pub bookmarks: Vec<Bookmark>,
}

#[derive(Debug, Clone)]
struct GraphicsState {
    fill_color: Color,
    stroke_color: Color,
    line_width: Pt,
    font: BuiltinFont,
    font_size: Pt,
}

impl GraphicsState {
    fn initial() -> Self {
        Self {
            fill_color: Color::BLACK,
            stroke_color: Color::BLACK,
            line_width: Pt::from_f32(1.0),
            font: BuiltinFont::Helvetica,
            font_size: Pt::from_f32(12.0),
        }
    }
}

/// Recording drawing surface. Coordinates are PDF user space: origin at the
/// bottom-left of the page, y growing upward.
pub struct Canvas {
    page_size: Size,
    pages: Vec<Page>,
    current: Page,
    current_state: GraphicsState,
    bookmarks: Vec<Bookmark>,
}

impl Canvas {
    pub fn new(page_size: Size) -> Self {
        Self {
            page_size,
            pages: Vec::new(),
            current: Page::default(),
            current_state: GraphicsState::initial(),
            bookmarks: Vec::new(),
        }
    }

    pub fn page_size(&self) -> Size {
        self.page_size
    }

    /// 0-based index of the page currently being drawn.
    pub fn page_index(&self) -> usize {
        self.pages.len()
    }

    pub fn set_fill_color(&mut self, color: Color) {
        if self.current_state.fill_color == color {
            return;
        }
        self.current_state.fill_color = color;
        self.current.commands.push(Command::SetFillColor(color));
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        if self.current_state.stroke_color == color {
            return;
        }
        self.current_state.stroke_color = color;
        self.current.commands.push(Command::SetStrokeColor(color));
    }

    pub fn set_line_width(&mut self, width: Pt) {
        let width = width.max(Pt::ZERO);
        if self.current_state.line_width == width {
            return;
        }
        self.current_state.line_width = width;
        self.current.commands.push(Command::SetLineWidth(width));
    }

    /// Selects face, size and fill color for the next strings.
    pub fn set_font(&mut self, spec: &FontSpec) {
        if self.current_state.font != spec.font {
            self.current_state.font = spec.font;
            self.current.commands.push(Command::SetFont(spec.font));
        }
        if self.current_state.font_size != spec.size {
            self.current_state.font_size = spec.size;
            self.current.commands.push(Command::SetFontSize(spec.size));
        }
        self.set_fill_color(spec.fill_color());
    }

    pub fn move_to(&mut self, x: Pt, y: Pt) {
        self.current.commands.push(Command::MoveTo { x, y });
    }

    pub fn line_to(&mut self, x: Pt, y: Pt) {
        self.current.commands.push(Command::LineTo { x, y });
    }

    pub fn close_path(&mut self) {
        self.current.commands.push(Command::ClosePath);
    }

    /// Appends a closed polygon to the current path.
    pub fn polygon(&mut self, points: &[(Pt, Pt)]) {
        let Some(((x, y), rest)) = points.split_first() else {
            return;
        };
        self.move_to(*x, *y);
        for (x, y) in rest {
            self.line_to(*x, *y);
        }
        self.close_path();
    }

    pub fn fill(&mut self) {
        self.current.commands.push(Command::Fill);
    }

    pub fn stroke(&mut self) {
        self.current.commands.push(Command::Stroke);
    }

    pub fn fill_stroke(&mut self) {
        self.current.commands.push(Command::FillStroke);
    }

    pub fn draw_rect(&mut self, x: Pt, y: Pt, width: Pt, height: Pt) {
        self.current.commands.push(Command::DrawRect {
            x,
            y,
            width,
            height,
        });
    }

    pub fn draw_string(&mut self, x: Pt, y: Pt, text: impl Into<String>) {
        self.current.commands.push(Command::DrawString {
            x,
            y,
            text: text.into(),
        });
    }

    /// Registers an outline entry pointing at the page being drawn.
    pub fn bookmark(&mut self, title: impl Into<String>) {
        self.bookmarks.push(Bookmark {
            title: title.into(),
            page_index: self.page_index(),
        });
    }

    pub fn show_page(&mut self) {
        let current = std::mem::take(&mut self.current);
        self.pages.push(current);
        self.current_state = GraphicsState::initial();
    }

    pub fn is_current_empty(&self) -> bool {
        self.current.commands.is_empty()
    }

    /// Closes the page in progress. A document always has at least one page.
    pub fn finish(mut self) -> Document {
        if !self.current.commands.is_empty() || self.pages.is_empty() {
            self.show_page();
        }
        Document {
            page_size: self.page_size,
            pages: self.pages,
            bookmarks: self.bookmarks,
        }
    }
}

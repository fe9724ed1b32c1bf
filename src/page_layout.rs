//! Tiles sections of cards onto pages.
//!
//! Each section starts on a fresh page and gets one bookmark. Slots fill row
//! by row from the top-left. With background pages enabled every foreground
//! page is followed by a twin that carries only the card shapes.

use crate::canvas::{Canvas, Document};
use crate::card_render::{render_background, render_card, render_placeholder};
use crate::config::LayoutConfiguration;
use crate::model::CardCollection;
use crate::types::{Color, Pt, Rect};
use crate::warnings::{LayoutWarnings, SlotRef};

const GRID_LINE_WIDTH: f32 = 0.25;

/// The fingerprint printed on one card and where it landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardStamp {
    /// 0-based section index in the collection.
    pub section: usize,
    /// 0-based card index within the section.
    pub card: usize,
    /// 1-based page number in the output document.
    pub page: usize,
    /// 1-based slot number on that page.
    pub slot: usize,
    pub fingerprint: String,
}

/// Slot rectangles for one page.
#[derive(Debug, Clone, Copy)]
pub struct SlotGrid {
    area: Rect,
    per_x: u32,
    per_y: u32,
    slots: usize,
    slot_width: Pt,
    slot_height: Pt,
}

impl SlotGrid {
    pub fn new(config: &LayoutConfiguration) -> Self {
        let area = config.printable_area();
        Self {
            area,
            per_x: config.per_x,
            per_y: config.per_y,
            slots: config.slots_per_page(),
            slot_width: area.width / config.per_x as i32,
            slot_height: area.height / config.per_y as i32,
        }
    }

    pub fn len(&self) -> usize {
        self.slots
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn slot_size(&self) -> (Pt, Pt) {
        (self.slot_width, self.slot_height)
    }

    /// Slot `index`, counted row by row from the top-left.
    pub fn slot(&self, index: usize) -> Rect {
        let per_x = self.per_x.max(1) as usize;
        let column = (index % per_x) as i32;
        let row = (index / per_x) as i32;
        Rect::new(
            self.area.x + self.slot_width * column,
            self.area.top() - self.slot_height * (row + 1),
            self.slot_width,
            self.slot_height,
        )
    }

    /// Thin lines on every slot boundary, running half a margin past the
    /// printable area.
    fn draw_overlay(&self, canvas: &mut Canvas, color: Option<Color>) {
        let Some(color) = color else {
            return;
        };
        let reach_x = self.area.x / 2;
        let reach_y = self.area.y / 2;
        canvas.set_stroke_color(color);
        canvas.set_line_width(Pt::from_f32(GRID_LINE_WIDTH));
        for column in 0..=self.per_x as i32 {
            let x = self.area.x + self.slot_width * column;
            canvas.move_to(x, self.area.y - reach_y);
            canvas.line_to(x, self.area.top() + reach_y);
        }
        for row in 0..=self.per_y as i32 {
            let y = self.area.y + self.slot_height * row;
            canvas.move_to(self.area.x - reach_x, y);
            canvas.line_to(self.area.right() + reach_x, y);
        }
        canvas.stroke();
    }
}

/// Everything one layout pass produces.
#[derive(Debug)]
pub struct LayoutOutcome {
    pub document: Document,
    pub warnings: LayoutWarnings,
    pub stamps: Vec<CardStamp>,
}

pub struct PageLayout<'a> {
    config: &'a LayoutConfiguration,
    grid: SlotGrid,
    canvas: Canvas,
    warnings: LayoutWarnings,
    stamps: Vec<CardStamp>,
}

impl<'a> PageLayout<'a> {
    pub fn new(config: &'a LayoutConfiguration) -> Self {
        Self {
            config,
            grid: SlotGrid::new(config),
            canvas: Canvas::new(config.page_size()),
            warnings: LayoutWarnings::new(),
            stamps: Vec::new(),
        }
    }

    pub fn lay_out(mut self, collection: &CardCollection) -> LayoutOutcome {
        for (index, section) in collection.sections.iter().enumerate() {
            if section.is_empty() {
                log::debug!("section {} is empty, skipped", index + 1);
                continue;
            }
            let title = if section.name().is_empty() {
                format!("Untitled section {}", index + 1)
            } else {
                section.name().to_string()
            };
            log::debug!(
                "section {} \"{title}\": {} cards from page {}",
                index + 1,
                section.len(),
                self.canvas.page_index() + 1
            );
            self.canvas.bookmark(title);

            let mut cards = section.cards().iter().enumerate().peekable();
            while cards.peek().is_some() {
                let page = self.canvas.page_index() + 1;
                let mut used = 0;
                for slot_index in 0..self.grid.len() {
                    let rect = self.grid.slot(slot_index);
                    if let Some((card_index, card)) = cards.next() {
                        let slot_ref = SlotRef {
                            page,
                            card: slot_index + 1,
                        };
                        let fingerprint = render_card(
                            &mut self.canvas,
                            self.config,
                            card,
                            rect,
                            slot_ref,
                            &mut self.warnings,
                        );
                        self.stamps.push(CardStamp {
                            section: index,
                            card: card_index,
                            page,
                            slot: slot_index + 1,
                            fingerprint,
                        });
                        used += 1;
                    } else if self.config.fill_unused_slots {
                        render_placeholder(&mut self.canvas, self.config, rect);
                    } else {
                        break;
                    }
                }
                self.grid
                    .draw_overlay(&mut self.canvas, self.config.colors.foreground_grid);
                self.canvas.show_page();
                log::debug!("page {page}: {used} cards");

                if self.config.background_pages {
                    self.background_page(used);
                }
            }
        }

        LayoutOutcome {
            document: self.canvas.finish(),
            warnings: self.warnings,
            stamps: self.stamps,
        }
    }

    fn background_page(&mut self, used: usize) {
        let slots = if self.config.fill_unused_slots {
            self.grid.len()
        } else {
            used
        };
        for slot_index in 0..slots {
            render_background(&mut self.canvas, self.config, self.grid.slot(slot_index));
        }
        self.grid
            .draw_overlay(&mut self.canvas, self.config.colors.background_grid);
        self.canvas.show_page();
    }
}

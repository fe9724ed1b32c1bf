//! Draws one card, an empty placeholder, or a background twin into a slot.

use crate::canvas::Canvas;
use crate::config::LayoutConfiguration;
use crate::font::FontSpec;
use crate::hash;
use crate::model::Card;
use crate::text_flow::TextFlow;
use crate::types::{Color, Pt, Rect};
use crate::warnings::{LayoutWarnings, SlotRef, WarningKind};

const OUTLINED_INSET: f32 = 0.04;
const PLAIN_INSET: f32 = 0.025;
const CORNER_CUT: f32 = 0.10;

/// Geometry shared by cards, placeholders and background twins.
#[derive(Debug, Clone, Copy)]
struct CardFrame {
    slot: Rect,
    inner: Rect,
    cut: Pt,
    pad: Pt,
}

impl CardFrame {
    fn new(config: &LayoutConfiguration, slot: Rect) -> Self {
        let ratio = if config.colors.has_card_outline() {
            OUTLINED_INSET
        } else {
            PLAIN_INSET
        };
        let inner = slot.inset(slot.min_side() * ratio);
        let cut = inner.min_side() * CORNER_CUT;
        Self {
            slot,
            inner,
            cut,
            pad: cut / 2,
        }
    }

    fn outline(&self) -> [(Pt, Pt); 8] {
        cut_corners(self.inner, self.cut)
    }

    fn header_x(&self) -> Pt {
        self.inner.x + self.cut
    }

    fn header_width(&self) -> Pt {
        self.inner.width - self.cut * 2
    }

    fn body_x(&self) -> Pt {
        self.inner.x + self.pad
    }

    fn body_width(&self) -> Pt {
        self.inner.width - self.pad * 2
    }

    fn cost_bottom(&self) -> Pt {
        self.inner.y + self.pad
    }
}

fn cut_corners(rect: Rect, cut: Pt) -> [(Pt, Pt); 8] {
    let (left, bottom, right, top) = (rect.x, rect.y, rect.right(), rect.top());
    [
        (left + cut, bottom),
        (right - cut, bottom),
        (right, bottom + cut),
        (right, top - cut),
        (right - cut, top),
        (left + cut, top),
        (left, top - cut),
        (left, bottom + cut),
    ]
}

fn shield(rect: Rect) -> [(Pt, Pt); 6] {
    let cut = rect.height * 0.3;
    let (left, bottom, right, top) = (rect.x, rect.y, rect.right(), rect.top());
    [
        (left, top),
        (right, top),
        (right, bottom + cut),
        (right - cut, bottom),
        (left + cut, bottom),
        (left, bottom + cut),
    ]
}

/// Fills and/or strokes the current path depending on which colors are set.
fn paint(canvas: &mut Canvas, fill: Option<Color>, stroke: Option<Color>, points: &[(Pt, Pt)]) {
    if fill.is_none() && stroke.is_none() {
        return;
    }
    if let Some(color) = fill {
        canvas.set_fill_color(color);
    }
    if let Some(color) = stroke {
        canvas.set_stroke_color(color);
    }
    canvas.polygon(points);
    match (fill, stroke) {
        (Some(_), Some(_)) => canvas.fill_stroke(),
        (Some(_), None) => canvas.fill(),
        _ => canvas.stroke(),
    }
}

fn draw_background(canvas: &mut Canvas, config: &LayoutConfiguration, frame: &CardFrame) {
    if let Some(color) = config.colors.card_background {
        let slot = frame.slot;
        canvas.set_fill_color(color);
        canvas.draw_rect(slot.x, slot.y, slot.width, slot.height);
        canvas.fill();
    }
}

fn draw_outline(canvas: &mut Canvas, config: &LayoutConfiguration, frame: &CardFrame) {
    canvas.set_line_width(config.border_width);
    paint(
        canvas,
        config.colors.card_fill,
        config.colors.outer_border,
        &frame.outline(),
    );
}

fn draw_bar(canvas: &mut Canvas, config: &LayoutConfiguration, frame: &CardFrame, color: Color, y: Pt) {
    canvas.set_stroke_color(color);
    canvas.set_line_width(config.border_width / 2);
    canvas.move_to(frame.inner.x, y);
    canvas.line_to(frame.inner.right(), y);
    canvas.stroke();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BadgeShape {
    Shield,
    CutCorner,
}

#[derive(Debug, Clone, Copy)]
struct Badge<'t> {
    rect: Rect,
    shape: BadgeShape,
    text: &'t str,
    font: FontSpec,
    fill: Option<Color>,
}

/// The reserved strip at the bottom of a card that holds the cost.
#[derive(Debug, Clone)]
enum CostZone<'t> {
    Empty,
    Inline {
        height: Pt,
        value: &'t str,
        kind: &'t str,
    },
    Badges {
        height: Pt,
        width: Pt,
        badges: Vec<Badge<'t>>,
    },
}

impl CostZone<'_> {
    fn height(&self) -> Pt {
        match self {
            CostZone::Empty => Pt::ZERO,
            CostZone::Inline { height, .. } | CostZone::Badges { height, .. } => *height,
        }
    }
}

/// Lays out the cost strip. `value` and `kind` are `None` when that half of
/// the cost is absent; placeholders pass empty strings to get empty badges.
fn plan_cost_zone<'t>(
    config: &LayoutConfiguration,
    frame: &CardFrame,
    value: Option<&'t str>,
    kind: Option<&'t str>,
) -> CostZone<'t> {
    if value.is_none() && kind.is_none() {
        return CostZone::Empty;
    }
    let value_font = config.fonts.cost_value;
    let kind_font = config.fonts.cost_type;
    if config.colors.cost_border.is_none() {
        return CostZone::Inline {
            height: value_font.size.max(kind_font.size) * 1.25,
            value: value.unwrap_or(""),
            kind: kind.unwrap_or(""),
        };
    }

    let badge_height = value_font.size.max(kind_font.size * 1.5) * 1.25;
    let badge_width = |text: &str, font: &FontSpec| {
        (font.text_width(text) + badge_height / 2).max(badge_height)
    };
    let bottom = frame.cost_bottom();
    let center = frame.body_x() + frame.body_width() / 2;
    match (value, kind) {
        (Some(value), Some(kind)) => {
            let kind_width = badge_width(kind, &kind_font);
            let value_width = badge_width(value, &value_font);
            let overlap = badge_height / 4;
            let width = kind_width + value_width - overlap;
            let kind_x = center - width / 2;
            let value_x = kind_x + kind_width - overlap;
            CostZone::Badges {
                height: badge_height + overlap,
                width,
                badges: vec![
                    Badge {
                        rect: Rect::new(kind_x, bottom, kind_width, badge_height),
                        shape: BadgeShape::Shield,
                        text: kind,
                        font: kind_font,
                        fill: config.colors.cost_type_fill,
                    },
                    Badge {
                        rect: Rect::new(value_x, bottom + overlap, value_width, badge_height),
                        shape: BadgeShape::CutCorner,
                        text: value,
                        font: value_font,
                        fill: config.colors.cost_value_fill,
                    },
                ],
            }
        }
        (Some(text), None) | (None, Some(text)) => {
            let is_value = value.is_some();
            let font = if is_value { value_font } else { kind_font };
            let width = badge_width(text, &font);
            let badge = Badge {
                rect: Rect::new(center - width / 2, bottom, width, badge_height),
                shape: if is_value {
                    BadgeShape::CutCorner
                } else {
                    BadgeShape::Shield
                },
                text,
                font,
                fill: if is_value {
                    config.colors.cost_value_fill
                } else {
                    config.colors.cost_type_fill
                },
            };
            CostZone::Badges {
                height: badge_height,
                width,
                badges: vec![badge],
            }
        }
        (None, None) => CostZone::Empty,
    }
}

fn draw_badge_shape(canvas: &mut Canvas, config: &LayoutConfiguration, badge: &Badge<'_>) {
    canvas.set_line_width(config.border_width);
    match badge.shape {
        BadgeShape::Shield => paint(canvas, badge.fill, config.colors.cost_border, &shield(badge.rect)),
        BadgeShape::CutCorner => paint(
            canvas,
            badge.fill,
            config.colors.cost_border,
            &cut_corners(badge.rect, badge.rect.height / 4),
        ),
    }
}

/// Baseline that centers a line of `font` vertically in a box of `height`.
fn centered_baseline(bottom: Pt, height: Pt, font: &FontSpec) -> Pt {
    bottom + (height - font.size) / 2 + font.descent()
}

fn draw_cost_zone(
    flow: &mut TextFlow<'_>,
    config: &LayoutConfiguration,
    frame: &CardFrame,
    zone: &CostZone<'_>,
) {
    match zone {
        CostZone::Empty => {}
        CostZone::Inline {
            height,
            value,
            kind,
        } => {
            let value_font = config.fonts.cost_value;
            let kind_font = config.fonts.cost_type;
            let value_width = value_font.text_width(value);
            let kind_width = kind_font.text_width(kind);
            let gap = if value.is_empty() || kind.is_empty() {
                Pt::ZERO
            } else {
                kind_font.text_width(" ")
            };
            let total = value_width + gap + kind_width;
            if total > frame.body_width() {
                flow.warn(
                    WarningKind::HorizontalOverflow,
                    format!("cost \"{value} {kind}\" out of horizontal space"),
                );
            }
            let larger = if value_font.size >= kind_font.size {
                value_font
            } else {
                kind_font
            };
            let baseline = centered_baseline(frame.cost_bottom(), *height, &larger);
            let left = frame.body_x() + (frame.body_width() - total) / 2;
            if !value.is_empty() {
                flow.text_at(value, left, baseline, &value_font);
            }
            if !kind.is_empty() {
                flow.text_at(kind, left + value_width + gap, baseline, &kind_font);
            }
        }
        CostZone::Badges { width, badges, .. } => {
            if *width > frame.body_width() {
                flow.warn(
                    WarningKind::CostBadgesTooWide,
                    format!(
                        "cost borders too wide, out of horizontal space ({:.1}pt wide, {:.1}pt available)",
                        width.to_f32(),
                        frame.body_width().to_f32()
                    ),
                );
            }
            for badge in badges {
                draw_badge_shape(flow.canvas(), config, badge);
                let text_width = badge.font.text_width(badge.text);
                let x = badge.rect.x + (badge.rect.width - text_width) / 2;
                let baseline = centered_baseline(badge.rect.y, badge.rect.height, &badge.font);
                flow.text_at(badge.text, x, baseline, &badge.font);
            }
        }
    }
}

fn non_empty(text: &str) -> Option<&str> {
    (!text.is_empty()).then_some(text)
}

/// Renders `card` into `slot` and returns the fingerprint drawn in its corner.
/// Layout problems are recorded in `warnings`; rendering always completes.
pub fn render_card(
    canvas: &mut Canvas,
    config: &LayoutConfiguration,
    card: &Card,
    slot: Rect,
    slot_ref: SlotRef,
    warnings: &mut LayoutWarnings,
) -> String {
    let frame = CardFrame::new(config, slot);
    draw_background(canvas, config, &frame);
    draw_outline(canvas, config, &frame);

    // The cost strip is the floor for the wrapped text, so size it first.
    let zone = plan_cost_zone(
        config,
        &frame,
        non_empty(&card.cost_value),
        non_empty(&card.cost_type),
    );
    let cost_top = frame.cost_bottom() + zone.height();
    let text_floor = cost_top + frame.pad;

    let mut flow = TextFlow::new(canvas, warnings, slot_ref);
    let mut cursor = frame.inner.top() - frame.pad;
    cursor -= flow.breakable_centered_line(
        &card.title,
        frame.header_x(),
        cursor,
        frame.header_width(),
        &config.fonts.title,
    );

    let half_pad = frame.pad / 2;
    if let Some(color) = config.colors.title_bar {
        cursor -= half_pad;
        draw_bar(flow.canvas(), config, &frame, color, cursor);
        cursor -= half_pad;
    }
    if !card.name.is_empty() {
        cursor -= flow.breakable_centered_line(
            &card.name,
            frame.header_x(),
            cursor,
            frame.header_width(),
            &config.fonts.name,
        );
    }
    if let Some(color) = config.colors.title_bar {
        cursor -= half_pad;
        draw_bar(flow.canvas(), config, &frame, color, cursor);
        cursor -= half_pad;
    }
    if let Some(color) = config.colors.upper_lower_bar {
        cursor -= half_pad;
        draw_bar(flow.canvas(), config, &frame, color, cursor);
        cursor -= half_pad;
        if !matches!(zone, CostZone::Empty) {
            draw_bar(flow.canvas(), config, &frame, color, cost_top + half_pad);
        }
    }

    draw_cost_zone(&mut flow, config, &frame, &zone);

    cursor -= flow.wrap_and_flow(
        &card.legend,
        frame.body_x(),
        cursor,
        frame.body_width(),
        cursor - text_floor,
        &config.fonts.legend,
    );
    flow.wrap_and_flow(
        &card.rules,
        frame.body_x(),
        cursor,
        frame.body_width(),
        cursor - text_floor,
        &config.fonts.rules,
    );

    let fingerprint = hash::fingerprint(flow.drawn());
    // Drawn after hashing, so the stamp never feeds its own input. Pulled in
    // by half a corner cut to stay inside the clipped outline.
    flow.right_aligned_line(
        &fingerprint,
        frame.inner.x,
        frame.inner.top() - frame.pad,
        frame.inner.width - frame.pad,
        &config.fingerprint_font,
    );
    log::trace!(
        "page {} card {}: \"{}\" -> {fingerprint}",
        slot_ref.page,
        slot_ref.card,
        card.title
    );
    fingerprint
}

/// Marks an unused slot. Never draws text, so there is no fingerprint.
pub fn render_placeholder(canvas: &mut Canvas, config: &LayoutConfiguration, slot: Rect) {
    let frame = CardFrame::new(config, slot);
    draw_background(canvas, config, &frame);
    if config.unused_slot_borders {
        draw_outline(canvas, config, &frame);
        if config.colors.cost_border.is_some() {
            if let CostZone::Badges { badges, .. } = plan_cost_zone(config, &frame, Some(""), Some("")) {
                for badge in &badges {
                    draw_badge_shape(canvas, config, badge);
                }
            }
        }
    }
    if config.unused_slot_title_bars {
        if let Some(color) = config.colors.title_bar {
            let half_pad = frame.pad / 2;
            let mut cursor = frame.inner.top() - frame.pad - config.fonts.title.leading() - half_pad;
            draw_bar(canvas, config, &frame, color, cursor);
            cursor -= half_pad + config.fonts.name.leading() + half_pad;
            draw_bar(canvas, config, &frame, color, cursor);
        }
    }
}

/// The reverse side of a slot: background fill and outline only.
pub fn render_background(canvas: &mut Canvas, config: &LayoutConfiguration, slot: Rect) {
    let frame = CardFrame::new(config, slot);
    draw_background(canvas, config, &frame);
    draw_outline(canvas, config, &frame);
}

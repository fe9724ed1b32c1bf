use crate::types::{Color, Pt};
use serde::{Deserialize, Serialize};

/// The standard-14 text faces every PDF reader ships with. No font program is
/// embedded; widths come from the Adobe core AFM files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BuiltinFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

impl BuiltinFont {
    pub const ALL: [BuiltinFont; 12] = [
        BuiltinFont::Helvetica,
        BuiltinFont::HelveticaBold,
        BuiltinFont::HelveticaOblique,
        BuiltinFont::HelveticaBoldOblique,
        BuiltinFont::TimesRoman,
        BuiltinFont::TimesBold,
        BuiltinFont::TimesItalic,
        BuiltinFont::TimesBoldItalic,
        BuiltinFont::Courier,
        BuiltinFont::CourierBold,
        BuiltinFont::CourierOblique,
        BuiltinFont::CourierBoldOblique,
    ];

    /// PostScript name used as `/BaseFont`.
    pub fn base_name(self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "Helvetica",
            BuiltinFont::HelveticaBold => "Helvetica-Bold",
            BuiltinFont::HelveticaOblique => "Helvetica-Oblique",
            BuiltinFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
            BuiltinFont::TimesRoman => "Times-Roman",
            BuiltinFont::TimesBold => "Times-Bold",
            BuiltinFont::TimesItalic => "Times-Italic",
            BuiltinFont::TimesBoldItalic => "Times-BoldItalic",
            BuiltinFont::Courier => "Courier",
            BuiltinFont::CourierBold => "Courier-Bold",
            BuiltinFont::CourierOblique => "Courier-Oblique",
            BuiltinFont::CourierBoldOblique => "Courier-BoldOblique",
        }
    }

    pub fn from_base_name(name: &str) -> Option<BuiltinFont> {
        BuiltinFont::ALL
            .into_iter()
            .find(|font| font.base_name().eq_ignore_ascii_case(name.trim()))
    }

    fn metrics(self) -> &'static FaceMetrics {
        match self {
            BuiltinFont::Helvetica | BuiltinFont::HelveticaOblique => &HELVETICA,
            BuiltinFont::HelveticaBold | BuiltinFont::HelveticaBoldOblique => &HELVETICA_BOLD,
            BuiltinFont::TimesRoman => &TIMES_ROMAN,
            BuiltinFont::TimesBold => &TIMES_BOLD,
            BuiltinFont::TimesItalic => &TIMES_ITALIC,
            BuiltinFont::TimesBoldItalic => &TIMES_BOLD_ITALIC,
            BuiltinFont::Courier | BuiltinFont::CourierOblique => &COURIER,
            BuiltinFont::CourierBold | BuiltinFont::CourierBoldOblique => &COURIER_BOLD,
        }
    }

    /// Advance width of `text` in 1/1000 em.
    pub fn text_units(self, text: &str) -> i32 {
        let metrics = self.metrics();
        text.chars()
            .map(|ch| metrics.advance_for_char(ch) as i32)
            .fold(0i32, |acc, w| acc.saturating_add(w))
    }
}

struct FaceMetrics {
    /// Widths for the printable ASCII range 0x20..=0x7E.
    ascii: Option<[u16; 95]>,
    fixed_width: u16,
    missing_width: u16,
    ascent: i16,
    descent: i16,
}

impl FaceMetrics {
    fn advance_for_char(&self, ch: char) -> u16 {
        let Some(ascii) = &self.ascii else {
            return self.fixed_width;
        };
        let code = ch as u32;
        if (0x20..=0x7e).contains(&code) {
            ascii[(code - 0x20) as usize]
        } else {
            self.missing_width
        }
    }
}

#[rustfmt::skip]
static HELVETICA: FaceMetrics = FaceMetrics {
    ascii: Some([
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
        1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
        667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
        333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
        556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
    ]),
    fixed_width: 0,
    missing_width: 556,
    ascent: 718,
    descent: -207,
};

#[rustfmt::skip]
static HELVETICA_BOLD: FaceMetrics = FaceMetrics {
    ascii: Some([
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
        975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
        667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
        333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
        611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
    ]),
    fixed_width: 0,
    missing_width: 611,
    ascent: 718,
    descent: -207,
};

#[rustfmt::skip]
static TIMES_ROMAN: FaceMetrics = FaceMetrics {
    ascii: Some([
        250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
        921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
        556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
        333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
        500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
    ]),
    fixed_width: 0,
    missing_width: 500,
    ascent: 683,
    descent: -217,
};

#[rustfmt::skip]
static TIMES_BOLD: FaceMetrics = FaceMetrics {
    ascii: Some([
        250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
        930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
        611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
        333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
        556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
    ]),
    fixed_width: 0,
    missing_width: 500,
    ascent: 676,
    descent: -205,
};

#[rustfmt::skip]
static TIMES_ITALIC: FaceMetrics = FaceMetrics {
    ascii: Some([
        250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333, 250, 278,
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 675, 675, 675, 500,
        920, 611, 611, 667, 722, 611, 611, 722, 722, 333, 444, 667, 556, 833, 667, 722,
        611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556, 389, 278, 389, 422, 500,
        333, 500, 500, 444, 500, 444, 278, 500, 500, 278, 278, 444, 278, 722, 500, 500,
        500, 500, 389, 389, 278, 500, 444, 667, 444, 444, 389, 400, 275, 400, 541,
    ]),
    fixed_width: 0,
    missing_width: 500,
    ascent: 683,
    descent: -217,
};

#[rustfmt::skip]
static TIMES_BOLD_ITALIC: FaceMetrics = FaceMetrics {
    ascii: Some([
        250, 389, 555, 500, 500, 833, 778, 278, 333, 333, 500, 570, 250, 333, 250, 278,
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
        832, 667, 667, 667, 722, 667, 667, 722, 778, 389, 500, 667, 611, 889, 722, 722,
        611, 722, 667, 556, 611, 722, 667, 889, 667, 611, 611, 333, 278, 333, 570, 500,
        333, 500, 500, 444, 500, 444, 333, 500, 556, 278, 278, 500, 278, 778, 556, 500,
        500, 500, 389, 389, 278, 556, 444, 667, 500, 444, 389, 348, 220, 348, 570,
    ]),
    fixed_width: 0,
    missing_width: 500,
    ascent: 683,
    descent: -205,
};

static COURIER: FaceMetrics = FaceMetrics {
    ascii: None,
    fixed_width: 600,
    missing_width: 600,
    ascent: 629,
    descent: -157,
};

static COURIER_BOLD: FaceMetrics = FaceMetrics {
    ascii: None,
    fixed_width: 600,
    missing_width: 600,
    ascent: 626,
    descent: -142,
};

/// Leading as a ratio of the font size: 9/8.
const LEADING_NUM: i32 = 9;
const LEADING_DEN: i32 = 8;

/// A font descriptor for one text role: face, size and optional color.
/// An absent color draws black.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub font: BuiltinFont,
    pub size: Pt,
    pub color: Option<Color>,
}

impl FontSpec {
    pub fn new(font: BuiltinFont, size: f32) -> Self {
        Self {
            font,
            size: Pt::from_f32(size),
            color: None,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = Pt::from_f32(size);
        self
    }

    pub fn fill_color(&self) -> Color {
        self.color.unwrap_or(Color::BLACK)
    }

    pub fn text_width(&self, text: &str) -> Pt {
        let units = self.font.text_units(text);
        if units <= 0 {
            return Pt::ZERO;
        }
        self.size.mul_ratio(units, 1000)
    }

    /// Distance from the top of a line box down to its baseline.
    pub fn ascent(&self) -> Pt {
        self.size.mul_ratio(self.font.metrics().ascent as i32, 1000)
    }

    pub fn descent(&self) -> Pt {
        self.size.mul_ratio(-(self.font.metrics().descent as i32), 1000)
    }

    /// Baseline-to-baseline distance: size x 1.125.
    pub fn leading(&self) -> Pt {
        self.size.mul_ratio(LEADING_NUM, LEADING_DEN)
    }
}

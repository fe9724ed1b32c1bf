use fixed::types::I32F32;
use serde::{Deserialize, Serialize};

/// A length in PDF points, stored as fixed point and quantized to 1/1000 pt so
/// that layout arithmetic is reproducible bit for bit.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct Pt(I32F32);

const FRACTION: i128 = 1 << 32;

impl Pt {
    pub const ZERO: Pt = Pt(I32F32::from_bits(0));

    pub fn from_f32(value: f32) -> Pt {
        if !value.is_finite() {
            return Pt::ZERO;
        }
        Pt::from_milli((value as f64 * 1000.0).round() as i128)
    }

    pub fn to_f32(self) -> f32 {
        self.0.to_num()
    }

    /// The length in thousandths of a point.
    pub fn milli(self) -> i64 {
        let milli = round_div(self.0.to_bits() as i128 * 1000, FRACTION);
        milli.clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }

    pub fn max(self, other: Pt) -> Pt {
        if self >= other { self } else { other }
    }

    pub fn min(self, other: Pt) -> Pt {
        if self <= other { self } else { other }
    }

    /// Scales by `num / denom` without leaving integer milli-points.
    pub fn mul_ratio(self, num: i32, denom: i32) -> Pt {
        let scaled = (self.milli() as i128).saturating_mul(num as i128);
        Pt::from_milli(round_div(scaled, denom as i128))
    }

    fn from_milli(milli: i128) -> Pt {
        let bits = round_div(milli.saturating_mul(FRACTION), 1000);
        Pt(I32F32::from_bits(
            bits.clamp(i64::MIN as i128, i64::MAX as i128) as i64,
        ))
    }
}

/// Integer division rounding half away from zero. Zero when `den` is zero.
fn round_div(num: i128, den: i128) -> i128 {
    if den == 0 {
        return 0;
    }
    let (quotient, rest) = (num / den, num % den);
    if rest.abs() * 2 >= den.abs() {
        quotient + num.signum() * den.signum()
    } else {
        quotient
    }
}

impl From<f32> for Pt {
    fn from(value: f32) -> Self {
        Pt::from_f32(value)
    }
}

impl From<Pt> for f32 {
    fn from(value: Pt) -> Self {
        value.to_f32()
    }
}

impl std::ops::Add for Pt {
    type Output = Pt;
    fn add(self, rhs: Pt) -> Pt {
        Pt::from_milli(self.milli() as i128 + rhs.milli() as i128)
    }
}

impl std::ops::Sub for Pt {
    type Output = Pt;
    fn sub(self, rhs: Pt) -> Pt {
        Pt::from_milli(self.milli() as i128 - rhs.milli() as i128)
    }
}

impl std::ops::AddAssign for Pt {
    fn add_assign(&mut self, rhs: Pt) {
        *self = *self + rhs;
    }
}

impl std::ops::SubAssign for Pt {
    fn sub_assign(&mut self, rhs: Pt) {
        *self = *self - rhs;
    }
}

impl std::ops::Mul<i32> for Pt {
    type Output = Pt;
    fn mul(self, rhs: i32) -> Pt {
        self.mul_ratio(rhs, 1)
    }
}

impl std::ops::Div<i32> for Pt {
    type Output = Pt;
    fn div(self, rhs: i32) -> Pt {
        self.mul_ratio(1, rhs)
    }
}

/// Float scaling for percentages and font-relative sizes.
impl std::ops::Mul<f32> for Pt {
    type Output = Pt;
    fn mul(self, rhs: f32) -> Pt {
        Pt::from_f32(self.to_f32() * rhs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: Pt,
    pub height: Pt,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: Pt::from_f32(width),
            height: Pt::from_f32(height),
        }
    }

    pub fn landscape(self) -> Self {
        if self.width >= self.height {
            return self;
        }
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

/// Named paper sizes, portrait orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PageFormat {
    A0,
    A1,
    A2,
    A3,
    A4,
    Legal,
    Letter,
    Custom(Size),
}

impl PageFormat {
    pub const NAMED: [PageFormat; 7] = [
        PageFormat::A0,
        PageFormat::A1,
        PageFormat::A2,
        PageFormat::A3,
        PageFormat::A4,
        PageFormat::Legal,
        PageFormat::Letter,
    ];

    pub fn size(self) -> Size {
        match self {
            PageFormat::A0 => Size::new(2383.94, 3370.39),
            PageFormat::A1 => Size::new(1683.78, 2383.94),
            PageFormat::A2 => Size::new(1190.55, 1683.78),
            PageFormat::A3 => Size::new(841.89, 1190.55),
            PageFormat::A4 => Size::new(595.28, 841.89),
            // 8.5in x 14in and 8.5in x 11in at 72pt/in.
            PageFormat::Legal => Size::new(612.0, 1008.0),
            PageFormat::Letter => Size::new(612.0, 792.0),
            PageFormat::Custom(size) => size,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PageFormat::A0 => "A0",
            PageFormat::A1 => "A1",
            PageFormat::A2 => "A2",
            PageFormat::A3 => "A3",
            PageFormat::A4 => "A4",
            PageFormat::Legal => "Legal",
            PageFormat::Letter => "Letter",
            PageFormat::Custom(_) => "Custom",
        }
    }
}

/// Axis-aligned box with its origin at the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: Pt,
    pub y: Pt,
    pub width: Pt,
    pub height: Pt,
}

impl Rect {
    pub fn new(x: Pt, y: Pt, width: Pt, height: Pt) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> Pt {
        self.x + self.width
    }

    pub fn top(&self) -> Pt {
        self.y + self.height
    }

    pub fn min_side(&self) -> Pt {
        self.width.min(self.height)
    }

    /// Shrinks the box by `amount` on every side.
    pub fn inset(&self, amount: Pt) -> Rect {
        Rect {
            x: self.x + amount,
            y: self.y + amount,
            width: (self.width - amount * 2).max(Pt::ZERO),
            height: (self.height - amount * 2).max(Pt::ZERO),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn gray(level: f32) -> Self {
        Self::rgb(level, level, level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pt_quantizes_to_milli_points() {
        let value = Pt::from_f32(595.2804);
        assert_eq!(value.milli(), 595_280);
        assert_eq!((value / 3).milli(), 198_427);
    }

    #[test]
    fn pt_ratio_rounds_half_away_from_zero() {
        assert_eq!(Pt::from_f32(1.0).mul_ratio(1, 3).milli(), 333);
        assert_eq!(Pt::from_f32(-1.0).mul_ratio(2, 3).milli(), -667);
    }

    #[test]
    fn named_formats_are_portrait() {
        for format in PageFormat::NAMED {
            let size = format.size();
            assert!(size.height > size.width, "{} is not portrait", format.name());
        }
        assert_eq!(PageFormat::A4.size().width.milli(), 595_280);
    }

    #[test]
    fn landscape_swaps_portrait_sizes_only() {
        let letter = PageFormat::Letter.size().landscape();
        assert_eq!(letter.width.to_f32(), 792.0);
        assert_eq!(letter.landscape(), letter);
    }

    #[test]
    fn inset_never_goes_negative() {
        let rect = Rect::new(Pt::ZERO, Pt::ZERO, Pt::from_f32(4.0), Pt::from_f32(10.0));
        let inner = rect.inset(Pt::from_f32(3.0));
        assert_eq!(inner.width, Pt::ZERO);
        assert_eq!(inner.height.to_f32(), 4.0);
    }
}

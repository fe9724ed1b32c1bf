use crate::error::CardPressError;
use crate::font::{BuiltinFont, FontSpec};
use crate::types::{Color, PageFormat, Pt, Rect, Size};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextRole {
    Title,
    Name,
    Legend,
    Rules,
    CostValue,
    CostType,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextFonts {
    pub title: FontSpec,
    pub name: FontSpec,
    pub legend: FontSpec,
    pub rules: FontSpec,
    pub cost_value: FontSpec,
    pub cost_type: FontSpec,
}

impl TextFonts {
    pub fn get(&self, role: TextRole) -> &FontSpec {
        match role {
            TextRole::Title => &self.title,
            TextRole::Name => &self.name,
            TextRole::Legend => &self.legend,
            TextRole::Rules => &self.rules,
            TextRole::CostValue => &self.cost_value,
            TextRole::CostType => &self.cost_type,
        }
    }

    pub fn get_mut(&mut self, role: TextRole) -> &mut FontSpec {
        match role {
            TextRole::Title => &mut self.title,
            TextRole::Name => &mut self.name,
            TextRole::Legend => &mut self.legend,
            TextRole::Rules => &mut self.rules,
            TextRole::CostValue => &mut self.cost_value,
            TextRole::CostType => &mut self.cost_type,
        }
    }

    fn iter(&self) -> impl Iterator<Item = (TextRole, &FontSpec)> {
        [
            TextRole::Title,
            TextRole::Name,
            TextRole::Legend,
            TextRole::Rules,
            TextRole::CostValue,
            TextRole::CostType,
        ]
        .into_iter()
        .map(move |role| (role, self.get(role)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorRole {
    CardBackground,
    TitleBar,
    UpperLowerBar,
    OuterBorder,
    CardFill,
    CostBorder,
    CostValueFill,
    CostTypeFill,
    ForegroundGrid,
    BackgroundGrid,
}

/// Structural colors. `None` means the element is not drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuralColors {
    pub card_background: Option<Color>,
    pub title_bar: Option<Color>,
    pub upper_lower_bar: Option<Color>,
    pub outer_border: Option<Color>,
    pub card_fill: Option<Color>,
    pub cost_border: Option<Color>,
    pub cost_value_fill: Option<Color>,
    pub cost_type_fill: Option<Color>,
    pub foreground_grid: Option<Color>,
    pub background_grid: Option<Color>,
}

impl StructuralColors {
    pub fn get(&self, role: ColorRole) -> Option<Color> {
        match role {
            ColorRole::CardBackground => self.card_background,
            ColorRole::TitleBar => self.title_bar,
            ColorRole::UpperLowerBar => self.upper_lower_bar,
            ColorRole::OuterBorder => self.outer_border,
            ColorRole::CardFill => self.card_fill,
            ColorRole::CostBorder => self.cost_border,
            ColorRole::CostValueFill => self.cost_value_fill,
            ColorRole::CostTypeFill => self.cost_type_fill,
            ColorRole::ForegroundGrid => self.foreground_grid,
            ColorRole::BackgroundGrid => self.background_grid,
        }
    }

    pub fn set(&mut self, role: ColorRole, color: Option<Color>) {
        let slot = match role {
            ColorRole::CardBackground => &mut self.card_background,
            ColorRole::TitleBar => &mut self.title_bar,
            ColorRole::UpperLowerBar => &mut self.upper_lower_bar,
            ColorRole::OuterBorder => &mut self.outer_border,
            ColorRole::CardFill => &mut self.card_fill,
            ColorRole::CostBorder => &mut self.cost_border,
            ColorRole::CostValueFill => &mut self.cost_value_fill,
            ColorRole::CostTypeFill => &mut self.cost_type_fill,
            ColorRole::ForegroundGrid => &mut self.foreground_grid,
            ColorRole::BackgroundGrid => &mut self.background_grid,
        };
        *slot = color;
    }

    /// True when the card outline polygon is drawn at all.
    pub fn has_card_outline(&self) -> bool {
        self.outer_border.is_some() || self.card_fill.is_some()
    }
}

/// Every knob of one export run, as plain data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSettings {
    pub page_format: PageFormat,
    pub landscape: bool,
    pub per_x: u32,
    pub per_y: u32,
    /// Total horizontal margin as a percentage of the page width, split
    /// evenly between left and right.
    pub margin_x_percent: f32,
    /// Total vertical margin as a percentage of the page height.
    pub margin_y_percent: f32,
    pub fonts: TextFonts,
    pub fingerprint_font: FontSpec,
    pub colors: StructuralColors,
    pub border_width: Pt,
    pub background_pages: bool,
    pub fill_unused_slots: bool,
    pub unused_slot_borders: bool,
    pub unused_slot_title_bars: bool,
}

impl LayoutSettings {
    pub fn page_size(&self) -> Size {
        let size = self.page_format.size();
        if self.landscape { size.landscape() } else { size }
    }

    /// The area inside the margins that the slot grid tiles.
    pub fn printable_area(&self) -> Rect {
        let page = self.page_size();
        let width = page.width * (1.0 - self.margin_x_percent / 100.0);
        let height = page.height * (1.0 - self.margin_y_percent / 100.0);
        Rect::new(
            (page.width - width) / 2,
            (page.height - height) / 2,
            width,
            height,
        )
    }

    pub fn slots_per_page(&self) -> usize {
        self.per_x as usize * self.per_y as usize
    }

    fn apply(&mut self, style: &PresetStyle) {
        self.colors.card_background = style.card_background;
        self.colors.title_bar = style.title_bar;
        self.colors.upper_lower_bar = style.upper_lower_bar;
        self.colors.outer_border = style.outer_border;
        self.colors.card_fill = style.card_fill;
        self.colors.cost_border = style.cost_border;
        self.colors.cost_value_fill = style.cost_value_fill;
        self.colors.cost_type_fill = style.cost_type_fill;
        self.fonts.cost_value.size = Pt::from_f32(style.cost_value_size);
        self.fonts.cost_value.color = style.cost_value_color;
    }

    fn validate(&self) -> Result<(), CardPressError> {
        if self.per_x < 1 || self.per_y < 1 {
            return Err(CardPressError::InvalidConfiguration(format!(
                "grid must be at least 1x1, got {}x{}",
                self.per_x, self.per_y
            )));
        }
        for (axis, value) in [("x", self.margin_x_percent), ("y", self.margin_y_percent)] {
            if !value.is_finite() || !(0.0..=99.0).contains(&value) {
                return Err(CardPressError::InvalidConfiguration(format!(
                    "margin {axis} must be within 0..=99 percent, got {value}"
                )));
            }
        }
        let page = self.page_size();
        if page.width <= Pt::ZERO || page.height <= Pt::ZERO {
            return Err(CardPressError::InvalidConfiguration(
                "page size must be positive".to_string(),
            ));
        }
        let min_size = Pt::from_f32(1.0);
        for (role, spec) in self.fonts.iter() {
            if spec.size < min_size {
                return Err(CardPressError::InvalidConfiguration(format!(
                    "{role:?} font size must be at least 1pt"
                )));
            }
        }
        if self.fingerprint_font.size < min_size {
            return Err(CardPressError::InvalidConfiguration(
                "fingerprint font size must be at least 1pt".to_string(),
            ));
        }
        if self.border_width < Pt::ZERO {
            return Err(CardPressError::InvalidConfiguration(
                "border width must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for LayoutSettings {
    fn default() -> Self {
        let mut settings = LayoutSettings {
            page_format: PageFormat::A4,
            landscape: false,
            per_x: 3,
            per_y: 3,
            margin_x_percent: 10.0,
            margin_y_percent: 11.15,
            fonts: TextFonts {
                title: FontSpec::new(BuiltinFont::HelveticaBold, 10.0),
                name: FontSpec::new(BuiltinFont::Helvetica, 8.0),
                legend: FontSpec::new(BuiltinFont::TimesItalic, 7.0),
                rules: FontSpec::new(BuiltinFont::TimesRoman, 7.5),
                cost_value: FontSpec::new(BuiltinFont::HelveticaBold, 12.0),
                cost_type: FontSpec::new(BuiltinFont::Helvetica, 7.0),
            },
            fingerprint_font: FontSpec::new(BuiltinFont::Helvetica, 4.0)
                .with_color(Color::gray(0.5)),
            colors: StructuralColors {
                foreground_grid: Some(Color::gray(0.8)),
                ..StructuralColors::default()
            },
            border_width: Pt::from_f32(1.0),
            background_pages: false,
            fill_unused_slots: false,
            unused_slot_borders: true,
            unused_slot_title_bars: false,
        };
        settings.apply(Preset::default().style());
        settings
    }
}

/// Named starting points for the settings. They differ only in the fields of
/// [`PresetStyle`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Preset {
    #[default]
    MonochromeClassic,
    ColorClassic,
    MonochromeAlternate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetStyle {
    pub card_background: Option<Color>,
    pub title_bar: Option<Color>,
    pub upper_lower_bar: Option<Color>,
    pub outer_border: Option<Color>,
    pub card_fill: Option<Color>,
    pub cost_border: Option<Color>,
    pub cost_value_fill: Option<Color>,
    pub cost_type_fill: Option<Color>,
    pub cost_value_size: f32,
    pub cost_value_color: Option<Color>,
}

const INK: Color = Color::BLACK;
const PAPER: Color = Color::WHITE;
const PARCHMENT: Color = Color {
    r: 0.961,
    g: 0.933,
    b: 0.863,
};
const UMBER: Color = Color {
    r: 0.353,
    g: 0.224,
    b: 0.118,
};
const CRIMSON: Color = Color {
    r: 0.588,
    g: 0.071,
    b: 0.094,
};
const GOLD: Color = Color {
    r: 0.961,
    g: 0.808,
    b: 0.384,
};
const SKY: Color = Color {
    r: 0.765,
    g: 0.855,
    b: 0.949,
};

static PRESETS: [(Preset, PresetStyle); 3] = [
    (
        Preset::MonochromeClassic,
        PresetStyle {
            card_background: None,
            title_bar: Some(INK),
            upper_lower_bar: None,
            outer_border: Some(INK),
            card_fill: None,
            cost_border: Some(INK),
            cost_value_fill: Some(PAPER),
            cost_type_fill: Some(PAPER),
            cost_value_size: 12.0,
            cost_value_color: None,
        },
    ),
    (
        Preset::ColorClassic,
        PresetStyle {
            card_background: Some(UMBER),
            title_bar: Some(CRIMSON),
            upper_lower_bar: None,
            outer_border: Some(UMBER),
            card_fill: Some(PARCHMENT),
            cost_border: Some(UMBER),
            cost_value_fill: Some(GOLD),
            cost_type_fill: Some(SKY),
            cost_value_size: 14.0,
            cost_value_color: Some(CRIMSON),
        },
    ),
    (
        Preset::MonochromeAlternate,
        PresetStyle {
            card_background: None,
            title_bar: None,
            upper_lower_bar: Some(INK),
            outer_border: Some(INK),
            card_fill: None,
            cost_border: None,
            cost_value_fill: None,
            cost_type_fill: None,
            cost_value_size: 10.0,
            cost_value_color: None,
        },
    ),
];

impl Preset {
    pub const ALL: [Preset; 3] = [
        Preset::MonochromeClassic,
        Preset::ColorClassic,
        Preset::MonochromeAlternate,
    ];

    pub fn style(self) -> &'static PresetStyle {
        PRESETS
            .iter()
            .find(|(preset, _)| *preset == self)
            .map(|(_, style)| style)
            .unwrap_or(&PRESETS[0].1)
    }
}

/// Validated, read-only settings for one export run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutConfiguration {
    settings: LayoutSettings,
}

impl LayoutConfiguration {
    pub fn builder() -> LayoutConfigurationBuilder {
        LayoutConfigurationBuilder::new()
    }

    pub fn to_builder(&self) -> LayoutConfigurationBuilder {
        LayoutConfigurationBuilder {
            settings: self.settings.clone(),
        }
    }

    /// Reads stored settings and validates them like [`LayoutConfigurationBuilder::build`].
    pub fn from_json(json: &str) -> Result<Self, CardPressError> {
        LayoutConfigurationBuilder::from_json(json)?.build()
    }

    pub fn to_json(&self) -> Result<String, CardPressError> {
        Ok(serde_json::to_string_pretty(&self.settings)?)
    }
}

impl Deref for LayoutConfiguration {
    type Target = LayoutSettings;

    fn deref(&self) -> &LayoutSettings {
        &self.settings
    }
}

/// Mutable editing form of the settings; `build` validates and freezes it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutConfigurationBuilder {
    settings: LayoutSettings,
}

impl LayoutConfigurationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_preset(preset: Preset) -> Self {
        Self::new().reset(preset)
    }

    /// Restores every field to the shared defaults plus `preset`'s style.
    pub fn reset(mut self, preset: Preset) -> Self {
        self.settings = LayoutSettings::default();
        self.settings.apply(preset.style());
        self
    }

    pub fn page_format(mut self, format: PageFormat) -> Self {
        self.settings.page_format = format;
        self
    }

    pub fn landscape(mut self, enabled: bool) -> Self {
        self.settings.landscape = enabled;
        self
    }

    pub fn grid(mut self, per_x: u32, per_y: u32) -> Self {
        self.settings.per_x = per_x;
        self.settings.per_y = per_y;
        self
    }

    pub fn margins(mut self, x_percent: f32, y_percent: f32) -> Self {
        self.settings.margin_x_percent = x_percent;
        self.settings.margin_y_percent = y_percent;
        self
    }

    pub fn font(mut self, role: TextRole, spec: FontSpec) -> Self {
        *self.settings.fonts.get_mut(role) = spec;
        self
    }

    pub fn fingerprint_font(mut self, spec: FontSpec) -> Self {
        self.settings.fingerprint_font = spec;
        self
    }

    pub fn color(mut self, role: ColorRole, color: Option<Color>) -> Self {
        self.settings.colors.set(role, color);
        self
    }

    pub fn border_width(mut self, width: f32) -> Self {
        self.settings.border_width = Pt::from_f32(width);
        self
    }

    pub fn background_pages(mut self, enabled: bool) -> Self {
        self.settings.background_pages = enabled;
        self
    }

    pub fn fill_unused_slots(mut self, enabled: bool) -> Self {
        self.settings.fill_unused_slots = enabled;
        self
    }

    pub fn unused_slot_borders(mut self, enabled: bool) -> Self {
        self.settings.unused_slot_borders = enabled;
        self
    }

    pub fn unused_slot_title_bars(mut self, enabled: bool) -> Self {
        self.settings.unused_slot_title_bars = enabled;
        self
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut LayoutSettings {
        &mut self.settings
    }

    pub fn build(&self) -> Result<LayoutConfiguration, CardPressError> {
        self.settings.validate()?;
        Ok(LayoutConfiguration {
            settings: self.settings.clone(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, CardPressError> {
        let settings: LayoutSettings = serde_json::from_str(json)?;
        Ok(Self { settings })
    }

    pub fn to_json(&self) -> Result<String, CardPressError> {
        Ok(serde_json::to_string_pretty(&self.settings)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_three_by_three_slot_geometry() {
        let config = LayoutConfiguration::default();
        let area = config.printable_area();
        assert!((area.width.to_f32() - 535.75).abs() < 0.5);
        assert!((area.height.to_f32() - 748.12).abs() < 0.5);
        let slot_w = area.width / config.per_x as i32;
        let slot_h = area.height / config.per_y as i32;
        assert!((slot_w.to_f32() - 178.58).abs() < 0.5);
        assert!((slot_h.to_f32() - 249.37).abs() < 0.5);
    }

    #[test]
    fn margins_are_split_evenly() {
        let config = LayoutConfiguration::default();
        let area = config.printable_area();
        let page = config.page_size();
        let right_margin = page.width - area.right();
        assert!((right_margin - area.x).milli().abs() <= 1);
    }

    #[test]
    fn build_rejects_empty_grid() {
        let err = LayoutConfiguration::builder().grid(0, 3).build().unwrap_err();
        assert!(matches!(err, CardPressError::InvalidConfiguration(_)));
    }

    #[test]
    fn build_rejects_out_of_range_margins() {
        assert!(LayoutConfiguration::builder().margins(100.0, 0.0).build().is_err());
        assert!(LayoutConfiguration::builder().margins(5.0, -1.0).build().is_err());
        assert!(LayoutConfiguration::builder().margins(99.0, 0.0).build().is_ok());
    }

    #[test]
    fn build_rejects_tiny_fonts() {
        let tiny = FontSpec::new(BuiltinFont::Helvetica, 0.5);
        let err = LayoutConfiguration::builder()
            .font(TextRole::Rules, tiny)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("Rules"));
    }

    #[test]
    fn presets_only_touch_their_own_fields() {
        let classic = LayoutConfigurationBuilder::from_preset(Preset::MonochromeClassic);
        let color = LayoutConfigurationBuilder::from_preset(Preset::ColorClassic);
        assert_eq!(classic.settings().fonts.title, color.settings().fonts.title);
        assert_eq!(classic.settings().per_x, color.settings().per_x);
        assert_ne!(
            classic.settings().fonts.cost_value,
            color.settings().fonts.cost_value
        );
        assert!(color.settings().colors.card_background.is_some());
    }

    #[test]
    fn alternate_preset_uses_inline_costs_and_bars() {
        let alt = LayoutConfigurationBuilder::from_preset(Preset::MonochromeAlternate);
        let colors = alt.settings().colors;
        assert!(colors.cost_border.is_none());
        assert!(colors.title_bar.is_none());
        assert!(colors.upper_lower_bar.is_some());
    }

    #[test]
    fn reset_discards_edits() {
        let edited = LayoutConfiguration::builder()
            .grid(2, 2)
            .color(ColorRole::CardFill, Some(Color::WHITE))
            .reset(Preset::MonochromeClassic);
        assert_eq!(edited, LayoutConfigurationBuilder::new());
    }

    #[test]
    fn to_builder_keeps_settings_for_further_edits() {
        let config = LayoutConfiguration::builder().grid(4, 3).build().unwrap();
        assert_eq!(config.slots_per_page(), 12);
        assert_eq!(config.to_builder().build().unwrap(), config);
        let wider = config.to_builder().grid(5, 3).build().unwrap();
        assert_eq!(wider.slots_per_page(), 15);
        assert_eq!(wider.colors, config.colors);
    }

    #[test]
    fn settings_round_trip_through_json() {
        let builder = LayoutConfigurationBuilder::from_preset(Preset::ColorClassic)
            .page_format(PageFormat::Letter)
            .background_pages(true);
        let json = builder.to_json().unwrap();
        let restored = LayoutConfigurationBuilder::from_json(&json).unwrap();
        assert_eq!(restored.build().unwrap(), builder.build().unwrap());
    }

    #[test]
    fn stored_settings_are_validated_on_load() {
        let mut builder = LayoutConfigurationBuilder::new();
        builder.settings_mut().per_y = 0;
        let json = builder.to_json().unwrap();
        let err = LayoutConfiguration::from_json(&json).unwrap_err();
        assert!(matches!(err, CardPressError::InvalidConfiguration(_)));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = LayoutConfigurationBuilder::from_json("{\"per_x\": ").unwrap_err();
        assert!(matches!(err, CardPressError::Config(_)));
    }

    #[test]
    fn landscape_swaps_page_axes() {
        let config = LayoutConfiguration::builder().landscape(true).build().unwrap();
        let size = config.page_size();
        assert!(size.width > size.height);
    }
}

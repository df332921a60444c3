//! Presentation properties: per-node declarations and the render-time cascade.

use radsvg_canvas::{Color, FillRule, LineCap, LineJoin, StrokeStyle, TextAnchor};

use crate::attributes::{SvgLength, DEFAULT_FONT_SIZE};

// ==================== Paint ====================

/// Paint value (fill or stroke).
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    /// No paint.
    None,
    /// Solid color.
    Color(Color),
    /// The element's `color` property.
    CurrentColor,
    /// Paint server reference (gradients, patterns). Only the fallback is drawn.
    Url { id: String, fallback: Option<Color> },
}

impl Paint {
    /// Parse paint attribute. Returns `None` for unrecognized values.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "none" => return Some(Paint::None),
            "currentcolor" => return Some(Paint::CurrentColor),
            _ => {}
        }

        if let Some(rest) = s.strip_prefix("url(") {
            let close = rest.find(')')?;
            let id = rest[..close]
                .trim()
                .trim_matches(|c| c == '"' || c == '\'')
                .trim_start_matches('#')
                .to_string();
            let fallback = rest[close + 1..].trim();
            let fallback = match fallback {
                "" => None,
                other => Some(Color::parse(other)?),
            };
            return Some(Paint::Url { id, fallback });
        }

        Color::parse(s).map(Paint::Color)
    }
}

/// Visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
    Collapse,
}

/// Display. Only `none` changes behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Inline,
    None,
}

// ==================== Declared Style ====================

/// The style properties one element sets explicitly. `None` inherits from the parent
/// (or takes the initial value for non-inherited properties).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedStyle {
    pub fill: Option<Paint>,
    pub fill_opacity: Option<f32>,
    pub fill_rule: Option<FillRule>,
    pub stroke: Option<Paint>,
    pub stroke_width: Option<f32>,
    pub stroke_opacity: Option<f32>,
    pub stroke_linecap: Option<LineCap>,
    pub stroke_linejoin: Option<LineJoin>,
    pub stroke_miterlimit: Option<f32>,
    pub opacity: Option<f32>,
    pub visibility: Option<Visibility>,
    pub display: Option<Display>,
    pub color: Option<Color>,
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub font_weight: Option<u16>,
    pub text_anchor: Option<TextAnchor>,
}

impl ResolvedStyle {
    /// Build from presentation attributes, then the inline `style` declarations, which win.
    pub fn from_attributes<'a>(
        attributes: impl IntoIterator<Item = (&'a str, &'a str)>,
        inline: Option<&str>,
    ) -> Self {
        let mut style = Self::default();
        for (name, value) in attributes {
            style.set_property(name, value);
        }
        if let Some(inline) = inline {
            for declaration in inline.split(';') {
                if let Some((name, value)) = declaration.split_once(':') {
                    style.set_property(name.trim(), value.trim());
                }
            }
        }
        style
    }

    /// Apply one property. Returns false for names that are not style properties.
    /// Invalid values leave the property unchanged; `inherit` clears it.
    pub fn set_property(&mut self, name: &str, value: &str) -> bool {
        let value = value.trim();
        let inherit = value == "inherit";

        macro_rules! assign {
            ($field:ident, $parsed:expr) => {{
                if inherit {
                    self.$field = None;
                } else if let Some(v) = $parsed {
                    self.$field = Some(v);
                }
            }};
        }

        match name {
            "fill" => assign!(fill, Paint::parse(value)),
            "fill-opacity" => assign!(fill_opacity, parse_opacity(value)),
            "fill-rule" => assign!(fill_rule, parse_fill_rule(value)),
            "stroke" => assign!(stroke, Paint::parse(value)),
            "stroke-width" => assign!(
                stroke_width,
                SvgLength::parse(value)
                    .map(|l| l.to_px(0.0))
                    .filter(|w| *w >= 0.0)
            ),
            "stroke-opacity" => assign!(stroke_opacity, parse_opacity(value)),
            "stroke-linecap" => assign!(stroke_linecap, parse_line_cap(value)),
            "stroke-linejoin" => assign!(stroke_linejoin, parse_line_join(value)),
            "stroke-miterlimit" => assign!(
                stroke_miterlimit,
                value.parse::<f32>().ok().filter(|m| *m >= 1.0)
            ),
            "opacity" => assign!(opacity, parse_opacity(value)),
            "visibility" => assign!(visibility, parse_visibility(value)),
            "display" => assign!(
                display,
                Some(if value == "none" {
                    Display::None
                } else {
                    Display::Inline
                })
            ),
            "color" => assign!(color, Color::parse(value)),
            "font-family" => assign!(
                font_family,
                Some(value.to_string()).filter(|f| !f.is_empty())
            ),
            "font-size" => assign!(font_size, parse_font_size(value)),
            "font-weight" => assign!(font_weight, parse_font_weight(value)),
            "text-anchor" => assign!(text_anchor, parse_text_anchor(value)),
            _ => return false,
        }
        true
    }
}

fn parse_opacity(s: &str) -> Option<f32> {
    let v = match s.strip_suffix('%') {
        Some(pct) => pct.trim().parse::<f32>().ok()? / 100.0,
        None => s.parse::<f32>().ok()?,
    };
    v.is_finite().then(|| v.clamp(0.0, 1.0))
}

fn parse_fill_rule(s: &str) -> Option<FillRule> {
    match s {
        "nonzero" => Some(FillRule::NonZero),
        "evenodd" => Some(FillRule::EvenOdd),
        _ => None,
    }
}

fn parse_line_cap(s: &str) -> Option<LineCap> {
    match s {
        "butt" => Some(LineCap::Butt),
        "round" => Some(LineCap::Round),
        "square" => Some(LineCap::Square),
        _ => None,
    }
}

fn parse_line_join(s: &str) -> Option<LineJoin> {
    match s {
        "miter" | "miter-clip" | "arcs" => Some(LineJoin::Miter),
        "round" => Some(LineJoin::Round),
        "bevel" => Some(LineJoin::Bevel),
        _ => None,
    }
}

fn parse_visibility(s: &str) -> Option<Visibility> {
    match s {
        "visible" => Some(Visibility::Visible),
        "hidden" => Some(Visibility::Hidden),
        "collapse" => Some(Visibility::Collapse),
        _ => None,
    }
}

fn parse_font_size(s: &str) -> Option<f32> {
    let keyword = match s {
        "xx-small" => Some(9.0),
        "x-small" => Some(10.0),
        "small" => Some(13.0),
        "medium" => Some(16.0),
        "large" => Some(18.0),
        "x-large" => Some(24.0),
        "xx-large" => Some(32.0),
        _ => None,
    };
    keyword
        .or_else(|| SvgLength::parse(s).map(|l| l.to_px(DEFAULT_FONT_SIZE)))
        .filter(|size| *size >= 0.0)
}

fn parse_font_weight(s: &str) -> Option<u16> {
    match s {
        "normal" => Some(400),
        "bold" => Some(700),
        _ => s.parse::<u16>().ok().filter(|w| (1..=1000).contains(w)),
    }
}

fn parse_text_anchor(s: &str) -> Option<TextAnchor> {
    match s {
        "start" => Some(TextAnchor::Start),
        "middle" => Some(TextAnchor::Middle),
        "end" => Some(TextAnchor::End),
        _ => None,
    }
}

// ==================== Computed Style ====================

/// Fully resolved style at one point of the render walk.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    pub fill: Paint,
    pub fill_opacity: f32,
    pub fill_rule: FillRule,
    pub stroke: Paint,
    pub stroke_width: f32,
    pub stroke_opacity: f32,
    pub stroke_linecap: LineCap,
    pub stroke_linejoin: LineJoin,
    pub stroke_miterlimit: f32,
    /// Own or inherited `opacity`. Zero suppresses this node's paint only.
    pub opacity: f32,
    pub visibility: Visibility,
    pub display: Display,
    pub color: Color,
    pub font_family: String,
    pub font_size: f32,
    pub font_weight: u16,
    pub text_anchor: TextAnchor,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self::initial()
    }
}

impl ComputedStyle {
    /// Initial values of every property.
    pub fn initial() -> Self {
        Self {
            fill: Paint::Color(Color::BLACK),
            fill_opacity: 1.0,
            fill_rule: FillRule::NonZero,
            stroke: Paint::None,
            stroke_width: 1.0,
            stroke_opacity: 1.0,
            stroke_linecap: LineCap::Butt,
            stroke_linejoin: LineJoin::Miter,
            stroke_miterlimit: 4.0,
            opacity: 1.0,
            visibility: Visibility::Visible,
            display: Display::Inline,
            color: Color::BLACK,
            font_family: "sans-serif".to_string(),
            font_size: DEFAULT_FONT_SIZE,
            font_weight: 400,
            text_anchor: TextAnchor::Start,
        }
    }

    /// Compute a child's style from this (parent) style and the child's declarations.
    pub fn cascade(&self, declared: &ResolvedStyle) -> Self {
        fn pick<T: Clone>(own: &Option<T>, inherited: &T) -> T {
            own.clone().unwrap_or_else(|| inherited.clone())
        }

        Self {
            fill: pick(&declared.fill, &self.fill),
            fill_opacity: pick(&declared.fill_opacity, &self.fill_opacity),
            fill_rule: pick(&declared.fill_rule, &self.fill_rule),
            stroke: pick(&declared.stroke, &self.stroke),
            stroke_width: pick(&declared.stroke_width, &self.stroke_width),
            stroke_opacity: pick(&declared.stroke_opacity, &self.stroke_opacity),
            stroke_linecap: pick(&declared.stroke_linecap, &self.stroke_linecap),
            stroke_linejoin: pick(&declared.stroke_linejoin, &self.stroke_linejoin),
            stroke_miterlimit: pick(&declared.stroke_miterlimit, &self.stroke_miterlimit),
            opacity: pick(&declared.opacity, &self.opacity),
            visibility: pick(&declared.visibility, &self.visibility),
            display: declared.display.unwrap_or_default(),
            color: pick(&declared.color, &self.color),
            font_family: pick(&declared.font_family, &self.font_family),
            font_size: pick(&declared.font_size, &self.font_size),
            font_weight: pick(&declared.font_weight, &self.font_weight),
            text_anchor: pick(&declared.text_anchor, &self.text_anchor),
        }
    }

    /// Whether this element paints anything of its own.
    pub fn is_painted(&self) -> bool {
        self.visibility == Visibility::Visible && self.opacity > 0.0
    }

    /// Resolve a paint to a solid color, before opacity is applied.
    pub fn paint_color(&self, paint: &Paint) -> Option<Color> {
        match paint {
            Paint::None => None,
            Paint::Color(c) => Some(*c),
            Paint::CurrentColor => Some(self.color),
            Paint::Url { fallback, .. } => *fallback,
        }
    }

    pub fn stroke_style(&self) -> StrokeStyle {
        StrokeStyle {
            width: self.stroke_width,
            line_cap: self.stroke_linecap,
            line_join: self.stroke_linejoin,
            miter_limit: self.stroke_miterlimit,
        }
    }
}

//! Flag emoji and SVG manipulation

use base64::{engine::general_purpose::STANDARD, Engine};
use once_cell::sync::Lazy;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default flag canvas (4:3)
pub const DEFAULT_VIEW_BOX: &str = "0 0 640 480";
const DEFAULT_WIDTH: f64 = 640.0;
const DEFAULT_HEIGHT: f64 = 480.0;

/// Characters `encodeURIComponent` leaves alone, minus `'`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'(')
    .remove(b')');

static SVG_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<svg[^>]*>").expect("Invalid svg tag regex pattern"));
static SVG_CLOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</svg\s*>").expect("Invalid svg close regex pattern"));
static VIEW_BOX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"viewBox="([^"]+)""#).expect("Invalid viewBox regex pattern"));
static WIDTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\swidth="([^"]+)""#).expect("Invalid width regex pattern"));
static HEIGHT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\sheight="([^"]+)""#).expect("Invalid height regex pattern"));

/// Hyphen-joined uppercase code points: "🇮🇳" -> "1F1EE-1F1F3"
pub fn emoji_to_unicode(emoji: &str) -> String {
    emoji
        .chars()
        .map(|c| format!("{:04X}", c as u32))
        .collect::<Vec<_>>()
        .join("-")
}

/// Regional-indicator pair for a two-letter code
pub fn iso_to_flag_emoji(iso2: &str) -> Option<String> {
    let code = iso2.trim();
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    code.to_ascii_uppercase()
        .chars()
        .map(|c| char::from_u32(0x1F1E6 + (c as u32 - 'A' as u32)))
        .collect()
}

fn attribute<'s>(pattern: &Regex, tag: &'s str) -> Option<&'s str> {
    pattern
        .captures(tag)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// View box of the root element, derived from width/height if absent
fn view_box(svg: &str) -> String {
    let Some(tag) = SVG_OPEN.find(svg).map(|m| m.as_str()) else {
        return DEFAULT_VIEW_BOX.to_string();
    };
    if let Some(vb) = attribute(&VIEW_BOX, tag) {
        return vb.to_string();
    }
    match (attribute(&WIDTH, tag), attribute(&HEIGHT, tag)) {
        (Some(w), Some(h)) => format!("0 0 {} {}", w, h),
        _ => DEFAULT_VIEW_BOX.to_string(),
    }
}

/// Intrinsic width and height from the view box
fn dimensions(svg: &str) -> (f64, f64) {
    let parts: Vec<f64> = view_box(svg)
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.trim_end_matches("px").parse().ok())
        .collect();
    match parts.as_slice() {
        [_, _, w, h] if *w > 0.0 && *h > 0.0 => (*w, *h),
        _ => (DEFAULT_WIDTH, DEFAULT_HEIGHT),
    }
}

/// Replace the root element's opening tag with one sized `width`×`height`,
/// keeping the view box.
pub fn resize_svg(svg: &str, width: u32, height: u32) -> String {
    let tag = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{}" width="{}" height="{}">"#,
        view_box(svg),
        width,
        height
    );
    SVG_OPEN.replace(svg, regex::NoExpand(&tag)).into_owned()
}

/// Largest size that fits inside `max_width`×`max_height` at the image's
/// own aspect ratio
pub fn fit_within(svg: &str, max_width: u32, max_height: u32) -> (u32, u32) {
    let (w, h) = dimensions(svg);
    let ratio = w / h;

    let mut new_width = max_width as f64;
    let mut new_height = new_width / ratio;
    if new_height > max_height as f64 {
        new_height = max_height as f64;
        new_width = new_height * ratio;
    }
    (new_width.round() as u32, new_height.round() as u32)
}

pub fn resize_svg_keep_ratio(svg: &str, max_width: u32, max_height: u32) -> String {
    let (width, height) = fit_within(svg, max_width, max_height);
    resize_svg(svg, width, height)
}

pub fn svg_to_data_url(svg: &str) -> String {
    format!(
        "data:image/svg+xml,{}",
        utf8_percent_encode(svg, URI_COMPONENT)
    )
}

pub fn svg_to_base64_data_url(svg: &str) -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImgTagOptions {
    pub width: u32,
    pub height: u32,
    pub alt: String,
    pub class_name: Option<String>,
    pub keep_ratio: bool,
}

impl Default for ImgTagOptions {
    fn default() -> Self {
        Self {
            width: 64,
            height: 48,
            alt: "Flag".to_string(),
            class_name: None,
            keep_ratio: true,
        }
    }
}

/// `<img>` tag embedding the resized flag as a data URL
pub fn flag_img_tag(svg: &str, options: &ImgTagOptions) -> String {
    let resized = if options.keep_ratio {
        resize_svg_keep_ratio(svg, options.width, options.height)
    } else {
        resize_svg(svg, options.width, options.height)
    };
    let class_attr = options
        .class_name
        .as_deref()
        .filter(|c| !c.is_empty())
        .map(|c| format!(r#" class="{}""#, c))
        .unwrap_or_default();

    format!(
        r#"<img src="{}" alt="{}" width="{}" height="{}"{} />"#,
        svg_to_data_url(&resized),
        options.alt,
        options.width,
        options.height,
        class_attr
    )
}

/// Size presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagSize {
    Tiny,
    Small,
    Medium,
    Large,
    XLarge,
    Icon,
    Thumbnail,
    Banner,
}

impl FlagSize {
    pub const ALL: [FlagSize; 8] = [
        FlagSize::Tiny,
        FlagSize::Small,
        FlagSize::Medium,
        FlagSize::Large,
        FlagSize::XLarge,
        FlagSize::Icon,
        FlagSize::Thumbnail,
        FlagSize::Banner,
    ];

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Tiny => (16, 12),
            Self::Small => (32, 24),
            Self::Medium => (64, 48),
            Self::Large => (128, 96),
            Self::XLarge => (256, 192),
            Self::Icon => (24, 24),
            Self::Thumbnail => (100, 75),
            Self::Banner => (800, 600),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tiny => "tiny",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::XLarge => "xlarge",
            Self::Icon => "icon",
            Self::Thumbnail => "thumbnail",
            Self::Banner => "banner",
        }
    }
}

impl fmt::Display for FlagSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlagSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|size| size.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown flag size '{}'", s))
    }
}

pub fn resize_with_preset(svg: &str, size: FlagSize) -> String {
    let (width, height) = size.dimensions();
    resize_svg(svg, width, height)
}

/// CSS filter effects. Percentages for grayscale, brightness and contrast;
/// 0-1 for opacity; pixels for blur.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagFilter {
    pub grayscale: Option<f64>,
    pub brightness: Option<f64>,
    pub contrast: Option<f64>,
    pub opacity: Option<f64>,
    pub blur: Option<f64>,
}

impl FlagFilter {
    fn css(&self) -> Vec<String> {
        let mut parts = Vec::new();
        if let Some(v) = self.grayscale {
            parts.push(format!("grayscale({}%)", v));
        }
        if let Some(v) = self.brightness {
            parts.push(format!("brightness({}%)", v));
        }
        if let Some(v) = self.contrast {
            parts.push(format!("contrast({}%)", v));
        }
        if let Some(v) = self.opacity {
            parts.push(format!("opacity({})", v));
        }
        if let Some(v) = self.blur {
            parts.push(format!("blur({}px)", v));
        }
        parts
    }
}

pub fn apply_filter(svg: &str, filter: &FlagFilter) -> String {
    let parts = filter.css();
    if parts.is_empty() {
        return svg.to_string();
    }
    let style = format!(r#"<svg style="filter: {};""#, parts.join(" "));
    svg.replacen("<svg", &style, 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagShape {
    Circle,
    Rounded,
    Square,
}

/// Clip the flag to a `size`×`size` shape. `Square` is a plain resize.
pub fn apply_shape(svg: &str, shape: FlagShape, size: u32) -> String {
    let half = size as f64 / 2.0;
    let (id, clip) = match shape {
        FlagShape::Circle => (
            "circle-clip",
            format!(r#"<circle cx="{}" cy="{}" r="{}" />"#, half, half, half),
        ),
        FlagShape::Rounded => {
            let radius = size as f64 * 0.1;
            (
                "rounded-clip",
                format!(
                    r#"<rect x="0" y="0" width="{}" height="{}" rx="{}" ry="{}" />"#,
                    size, size, radius, radius
                ),
            )
        }
        FlagShape::Square => return resize_svg(svg, size, size),
    };

    let inner = SVG_CLOSE.replace(&SVG_OPEN.replace(svg, ""), "").trim().to_string();
    let (w, h) = dimensions(svg);
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {size} {size}" width="{size}" height="{size}">"#,
            r#"<defs><clipPath id="{id}">{clip}</clipPath></defs>"#,
            r#"<g clip-path="url(#{id})" transform="scale({sx} {sy})">{inner}</g></svg>"#
        ),
        size = size,
        id = id,
        clip = clip,
        sx = size as f64 / w,
        sy = size as f64 / h,
        inner = inner
    )
}

//! Colour normalisation.
//!
//! Application code hands colours over in whatever notation is convenient:
//! CSS names, hex, `rgb()`/`rgba()`, `hsl()`/`hsla()`, or a packed ARGB
//! integer. The platform only understands packed ARGB, so every colour is
//! normalised through [`ColorInput::normalize`] before it crosses the bridge.
//! Parsing failures surface as [`ColorError`] and never reach the platform.

mod named;

use bridge_traits::PlatformColor;
use std::fmt;
use thiserror::Error;

/// A colour that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color {input:?}: {reason}")]
pub struct ColorError {
    pub input: String,
    pub reason: &'static str,
}

impl ColorError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// Non-premultiplied 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xFF)
    }

    #[must_use]
    const fn from_rgb_key(rgb: u32) -> Self {
        Self::opaque((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    #[must_use]
    pub const fn to_platform(self) -> PlatformColor {
        PlatformColor::from_rgba(self.r, self.g, self.b, self.a)
    }

    /// `#RRGGBBAA`
    #[must_use]
    pub fn to_hex(self) -> String {
        self.to_platform().to_hex()
    }
}

impl From<PlatformColor> for Rgba {
    fn from(color: PlatformColor) -> Self {
        Self::new(color.red(), color.green(), color.blue(), color.alpha())
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Any colour representation accepted by the colour setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorInput {
    /// CSS colour notation, parsed on normalisation.
    Css(String),
    /// Packed `0xAARRGGBB`, forwarded as is.
    Argb(u32),
    Rgba(Rgba),
}

impl ColorInput {
    /// Converts to the packed representation the platform expects.
    pub fn normalize(&self) -> Result<PlatformColor, ColorError> {
        match self {
            ColorInput::Css(text) => parse_css_color(text).map(Rgba::to_platform),
            ColorInput::Argb(argb) => Ok(PlatformColor::from_argb(*argb)),
            ColorInput::Rgba(rgba) => Ok(rgba.to_platform()),
        }
    }
}

impl From<&str> for ColorInput {
    fn from(value: &str) -> Self {
        ColorInput::Css(value.to_string())
    }
}

impl From<String> for ColorInput {
    fn from(value: String) -> Self {
        ColorInput::Css(value)
    }
}

impl From<&String> for ColorInput {
    fn from(value: &String) -> Self {
        ColorInput::Css(value.clone())
    }
}

impl From<u32> for ColorInput {
    fn from(value: u32) -> Self {
        ColorInput::Argb(value)
    }
}

impl From<Rgba> for ColorInput {
    fn from(value: Rgba) -> Self {
        ColorInput::Rgba(value)
    }
}

impl From<PlatformColor> for ColorInput {
    fn from(value: PlatformColor) -> Self {
        ColorInput::Argb(value.argb())
    }
}

impl fmt::Display for ColorInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorInput::Css(text) => f.write_str(text),
            ColorInput::Argb(argb) => write!(f, "0x{:08X}", argb),
            ColorInput::Rgba(rgba) => fmt::Display::fmt(rgba, f),
        }
    }
}

/// Parses a CSS colour string.
///
/// Supported: named colours, `transparent`, `#rgb`, `#rgba`, `#rrggbb`,
/// `#rrggbbaa`, `rgb()`/`rgba()` and `hsl()`/`hsla()` in both comma and
/// space-separated syntax. Case and surrounding whitespace are ignored.
pub fn parse_css_color(input: &str) -> Result<Rgba, ColorError> {
    let normalized = input.trim().to_ascii_lowercase();

    if normalized.is_empty() {
        return Err(ColorError::new(input, "empty color"));
    }

    if normalized == "transparent" {
        return Ok(Rgba::TRANSPARENT);
    }

    if let Some(hex) = normalized.strip_prefix('#') {
        return parse_hex(input, hex);
    }

    if let Some(open) = normalized.find('(') {
        let Some(args) = normalized[open + 1..].strip_suffix(')') else {
            return Err(ColorError::new(input, "unterminated color function"));
        };
        let function = normalized[..open].trim_end();
        return match function {
            "rgb" | "rgba" => parse_rgb_function(input, args),
            "hsl" | "hsla" => parse_hsl_function(input, args),
            _ => Err(ColorError::new(input, "unsupported color function")),
        };
    }

    named::lookup(&normalized)
        .map(Rgba::from_rgb_key)
        .ok_or_else(|| ColorError::new(input, "unknown color name"))
}

fn parse_hex(input: &str, hex: &str) -> Result<Rgba, ColorError> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ColorError::new(input, "non-hex digit"));
    }

    let digit = |i: usize| -> u8 {
        // Validated above.
        (hex.as_bytes()[i] as char).to_digit(16).unwrap_or(0) as u8
    };
    let short = |i: usize| digit(i) * 0x11;
    let long = |i: usize| digit(i) * 16 + digit(i + 1);

    match hex.len() {
        3 => Ok(Rgba::opaque(short(0), short(1), short(2))),
        4 => Ok(Rgba::new(short(0), short(1), short(2), short(3))),
        6 => Ok(Rgba::opaque(long(0), long(2), long(4))),
        8 => Ok(Rgba::new(long(0), long(2), long(4), long(6))),
        _ => Err(ColorError::new(input, "hex colors need 3, 4, 6 or 8 digits")),
    }
}

/// Splits function arguments into three components plus an optional alpha.
fn split_args<'a>(input: &str, args: &'a str) -> Result<(Vec<&'a str>, Option<&'a str>), ColorError> {
    if args.contains(',') {
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(ColorError::new(input, "empty color component"));
        }
        return match parts.len() {
            3 => Ok((parts, None)),
            4 => Ok((parts[..3].to_vec(), Some(parts[3]))),
            _ => Err(ColorError::new(input, "expected 3 or 4 components")),
        };
    }

    let (channels, alpha) = match args.split_once('/') {
        Some((channels, alpha)) => {
            let alpha = alpha.trim();
            if alpha.is_empty() || alpha.contains('/') {
                return Err(ColorError::new(input, "malformed alpha component"));
            }
            (channels, Some(alpha))
        }
        None => (args, None),
    };

    let parts: Vec<&str> = channels.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(ColorError::new(input, "expected 3 color components"));
    }
    Ok((parts, alpha))
}

fn parse_number(input: &str, text: &str) -> Result<f64, ColorError> {
    let value: f64 = text
        .parse()
        .map_err(|_| ColorError::new(input, "malformed number"))?;
    if !value.is_finite() {
        return Err(ColorError::new(input, "malformed number"));
    }
    Ok(value)
}

/// `0..=255` or a percentage.
fn parse_channel(input: &str, text: &str) -> Result<u8, ColorError> {
    let value = match text.strip_suffix('%') {
        Some(percent) => parse_number(input, percent)? / 100.0 * 255.0,
        None => parse_number(input, text)?,
    };
    Ok(value.round().clamp(0.0, 255.0) as u8)
}

/// `0..=1` or a percentage.
fn parse_alpha(input: &str, text: &str) -> Result<u8, ColorError> {
    let value = match text.strip_suffix('%') {
        Some(percent) => parse_number(input, percent)? / 100.0,
        None => parse_number(input, text)?,
    };
    Ok((value.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// Fraction in `0..=1`; the `%` sign is optional.
fn parse_percentage(input: &str, text: &str) -> Result<f64, ColorError> {
    let number = text.strip_suffix('%').unwrap_or(text);
    Ok((parse_number(input, number)? / 100.0).clamp(0.0, 1.0))
}

/// Hue in degrees, normalised into `0..360`.
fn parse_hue(input: &str, text: &str) -> Result<f64, ColorError> {
    let degrees = if let Some(deg) = text.strip_suffix("deg") {
        parse_number(input, deg)?
    } else if let Some(turn) = text.strip_suffix("turn") {
        parse_number(input, turn)? * 360.0
    } else if let Some(grad) = text.strip_suffix("grad") {
        parse_number(input, grad)? * 0.9
    } else if let Some(rad) = text.strip_suffix("rad") {
        parse_number(input, rad)?.to_degrees()
    } else {
        parse_number(input, text)?
    };
    Ok(degrees.rem_euclid(360.0))
}

fn parse_rgb_function(input: &str, args: &str) -> Result<Rgba, ColorError> {
    let (channels, alpha) = split_args(input, args)?;
    let r = parse_channel(input, channels[0])?;
    let g = parse_channel(input, channels[1])?;
    let b = parse_channel(input, channels[2])?;
    let a = match alpha {
        Some(alpha) => parse_alpha(input, alpha)?,
        None => 0xFF,
    };
    Ok(Rgba::new(r, g, b, a))
}

fn parse_hsl_function(input: &str, args: &str) -> Result<Rgba, ColorError> {
    let (channels, alpha) = split_args(input, args)?;
    let h = parse_hue(input, channels[0])?;
    let s = parse_percentage(input, channels[1])?;
    let l = parse_percentage(input, channels[2])?;
    let a = match alpha {
        Some(alpha) => parse_alpha(input, alpha)?,
        None => 0xFF,
    };
    let (r, g, b) = hsl_to_rgb(h, s, l);
    Ok(Rgba::new(r, g, b, a))
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let h_prime = h / 60.0;
    let x = c * (1.0 - (h_prime % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match h_prime as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_u8(r1), to_u8(g1), to_u8(b1))
}

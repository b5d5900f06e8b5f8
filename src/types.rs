use serde::{Deserialize, Serialize};

// Style defaults
pub const FILL_COLOR: &str = "rgba(0,0,0,1)";
pub const STROKE_COLOR: &str = "rgba(0,0,0,1)";
pub const STROKE_WIDTH: f64 = 2.0;
pub const STROKE_DASH_ARRAY: [f64; 0] = [];
pub const FONT_FAMILY: &str = "Arial";
pub const FONT_SIZE: f64 = 32.0;
pub const FONT_WEIGHT: u32 = 400;
pub const OPACITY: f64 = 1.0;

/// Name tag of the workspace object.
pub const WORKSPACE_NAME: &str = "clip";
pub const WORKSPACE_FILL: &str = "white";

// Geometry presets
pub const CIRCLE_RADIUS: f64 = 150.0;
pub const ELLIPSE_RY_RATIO: f64 = 0.6;
pub const RECTANGLE_SIZE: (f64, f64) = (300.0, 300.0);
pub const SOFT_RECTANGLE_RADIUS: f64 = 10.0;
pub const TRIANGLE_SIZE: (f64, f64) = (300.0, 300.0);
pub const DIAMOND_SIZE: (f64, f64) = (420.0, 420.0);
pub const PRESET_ORIGIN: (f64, f64) = (100.0, 100.0);
pub const TEXTBOX_WIDTH: f64 = 400.0;
/// Line height multiplier used to size text boxes.
pub const TEXT_LINE_HEIGHT: f64 = 1.16;

/// Every shape the factory knows how to build.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    Circle,
    SoftRectangle,
    Rectangle,
    Triangle,
    InverseTriangle,
    Diamond,
    Star,
    Pentagon,
    Hexagon,
    ArrowRight,
    ArrowLeft,
    ArrowUp,
    ArrowDown,
    Heart,
    Plus,
    Ellipse,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 16] = [
        ShapeKind::Circle,
        ShapeKind::SoftRectangle,
        ShapeKind::Rectangle,
        ShapeKind::Triangle,
        ShapeKind::InverseTriangle,
        ShapeKind::Diamond,
        ShapeKind::Star,
        ShapeKind::Pentagon,
        ShapeKind::Hexagon,
        ShapeKind::ArrowRight,
        ShapeKind::ArrowLeft,
        ShapeKind::ArrowUp,
        ShapeKind::ArrowDown,
        ShapeKind::Heart,
        ShapeKind::Plus,
        ShapeKind::Ellipse,
    ];
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub fn svg_anchor(self) -> &'static str {
        match self {
            TextAlign::Left | TextAlign::Justify => "start",
            TextAlign::Center => "middle",
            TextAlign::Right => "end",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl FontStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
        }
    }
}

/// Named image filters offered by the filter sidebar.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum ImageFilter {
    Polaroid,
    Sepia,
    Kodachrome,
    Contrast,
    Brightness,
    Greyscale,
    Brownie,
    Vintage,
    Technicolor,
    Pixelate,
    Invert,
    Blur,
    Sharpen,
    Emboss,
    RemoveColor,
    BlackWhite,
    Vibrance,
    BlendColor,
    HueRotate,
    Resize,
    Saturation,
    Gamma,
}

impl ImageFilter {
    pub const ALL: [ImageFilter; 22] = [
        ImageFilter::Polaroid,
        ImageFilter::Sepia,
        ImageFilter::Kodachrome,
        ImageFilter::Contrast,
        ImageFilter::Brightness,
        ImageFilter::Greyscale,
        ImageFilter::Brownie,
        ImageFilter::Vintage,
        ImageFilter::Technicolor,
        ImageFilter::Pixelate,
        ImageFilter::Invert,
        ImageFilter::Blur,
        ImageFilter::Sharpen,
        ImageFilter::Emboss,
        ImageFilter::RemoveColor,
        ImageFilter::BlackWhite,
        ImageFilter::Vibrance,
        ImageFilter::BlendColor,
        ImageFilter::HueRotate,
        ImageFilter::Resize,
        ImageFilter::Saturation,
        ImageFilter::Gamma,
    ];

    /// Parse a filter name as shown in the UI. `"none"` and unknown names
    /// map to `None`, which clears the filter.
    pub fn from_name(name: &str) -> Option<ImageFilter> {
        let filter = match name.to_ascii_lowercase().as_str() {
            "polaroid" => ImageFilter::Polaroid,
            "sepia" => ImageFilter::Sepia,
            "kodachrome" => ImageFilter::Kodachrome,
            "contrast" => ImageFilter::Contrast,
            "brightness" => ImageFilter::Brightness,
            "greyscale" | "grayscale" => ImageFilter::Greyscale,
            "brownie" => ImageFilter::Brownie,
            "vintage" => ImageFilter::Vintage,
            "technicolor" => ImageFilter::Technicolor,
            "pixelate" => ImageFilter::Pixelate,
            "invert" => ImageFilter::Invert,
            "blur" => ImageFilter::Blur,
            "sharpen" => ImageFilter::Sharpen,
            "emboss" => ImageFilter::Emboss,
            "removecolor" => ImageFilter::RemoveColor,
            "blackwhite" | "blacknwhite" => ImageFilter::BlackWhite,
            "vibrance" => ImageFilter::Vibrance,
            "blendcolor" => ImageFilter::BlendColor,
            "huerotate" => ImageFilter::HueRotate,
            "resize" => ImageFilter::Resize,
            "saturation" => ImageFilter::Saturation,
            "gamma" => ImageFilter::Gamma,
            _ => return None,
        };
        Some(filter)
    }

    /// CSS filter string used when drawing to a 2D context.
    pub fn css(self) -> &'static str {
        match self {
            ImageFilter::Polaroid => "sepia(0.2) contrast(1.1) saturate(1.2)",
            ImageFilter::Sepia => "sepia(1)",
            ImageFilter::Kodachrome => "contrast(1.2) saturate(1.4)",
            ImageFilter::Contrast => "contrast(1.3)",
            ImageFilter::Brightness => "brightness(1.2)",
            ImageFilter::Greyscale => "grayscale(1)",
            ImageFilter::Brownie => "sepia(0.6) contrast(1.1)",
            ImageFilter::Vintage => "sepia(0.4) saturate(0.8)",
            ImageFilter::Technicolor => "saturate(1.8) contrast(1.1)",
            ImageFilter::Pixelate => "none",
            ImageFilter::Invert => "invert(1)",
            ImageFilter::Blur => "blur(4px)",
            ImageFilter::Sharpen => "contrast(1.1)",
            ImageFilter::Emboss => "grayscale(1) contrast(1.5)",
            ImageFilter::RemoveColor => "saturate(0.2)",
            ImageFilter::BlackWhite => "grayscale(1) contrast(2)",
            ImageFilter::Vibrance => "saturate(1.5)",
            ImageFilter::BlendColor => "sepia(0.3) hue-rotate(-20deg)",
            ImageFilter::HueRotate => "hue-rotate(90deg)",
            ImageFilter::Resize => "none",
            ImageFilter::Saturation => "saturate(2)",
            ImageFilter::Gamma => "brightness(1.1) contrast(0.9)",
        }
    }
}

/// Export artifact formats.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Jpg,
    Svg,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpg => "jpg",
            ExportFormat::Svg => "svg",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpg => "image/jpeg",
            ExportFormat::Svg => "image/svg+xml",
            ExportFormat::Json => "text/json",
        }
    }
}

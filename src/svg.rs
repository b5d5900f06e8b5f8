use kurbo::Rect;

use crate::objects::{xml_escape, SceneObject};

/// Serializes `objects` into a standalone SVG covering `region`, with the
/// region's top-left corner mapped to the origin.
pub fn export_svg<'a>(region: Rect, background: Option<&str>, objects: impl IntoIterator<Item = &'a SceneObject>) -> String {
    let origin = region.origin();
    let mut body = String::new();
    for obj in objects {
        if obj.is_workspace() {
            continue;
        }
        body.push_str(&obj.to_svg_element(origin));
    }
    let background = match background {
        Some(fill) if !fill.is_empty() && fill != "transparent" => {
            format!(r##"<rect width="100%" height="100%" fill="{}" />"##, xml_escape(fill))
        }
        _ => String::new(),
    };
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">{}{}</svg>"##,
        region.width(),
        region.height(),
        region.width(),
        region.height(),
        background,
        body
    )
}

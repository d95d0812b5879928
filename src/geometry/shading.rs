use serde::{Deserialize, Serialize};

use super::{Region, ViewportSize};

/// Class shared by every shading overlay element.
pub const SHADED_REGION_CLASSNAME: &str = "qr-shaded-region";
/// Translucent black, `#0000007a`.
pub const SHADE_COLOR: [u8; 4] = [0x00, 0x00, 0x00, 0x7a];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShadePosition {
    Left = 1,
    Right = 2,
    Top = 3,
    Bottom = 4,
}

/// One translucent rectangle masking part of the viewport outside the focus box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShadeRect {
    pub position: ShadePosition,
    pub rect: Region,
}

impl ShadeRect {
    /// Element id, e.g. `qr-shaded-region_3` for the top shade.
    pub fn element_id(&self) -> String {
        format!("{SHADED_REGION_CLASSNAME}_{}", self.position as u8)
    }
}

/// Overlays masking everything outside `region`.
///
/// Left and right shades span the full height; top and bottom only span
/// the focus box width. A region at the origin needs no shading.
pub fn shaded_regions(viewport: ViewportSize, region: Region) -> Option<[ShadeRect; 4]> {
    if region.is_at_origin() {
        return None;
    }

    Some([
        ShadeRect {
            position: ShadePosition::Left,
            rect: Region::new(0.0, 0.0, region.x, viewport.height),
        },
        ShadeRect {
            position: ShadePosition::Right,
            rect: Region::new(viewport.width - region.x, 0.0, region.x, viewport.height),
        },
        ShadeRect {
            position: ShadePosition::Top,
            rect: Region::new(region.x, 0.0, region.width, region.y),
        },
        ShadeRect {
            position: ShadePosition::Bottom,
            rect: Region::new(region.x, viewport.height - region.y, region.width, region.y),
        },
    ])
}

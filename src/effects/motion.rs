use crate::foundation::core::Dimensions;

/// Scale/rotation applied to a clip so it sits correctly in the sequence frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct MotionParams {
    /// Percentage, rounded to two decimals.
    pub scale: f64,
    /// Editor rotation in degrees (positive is counter-clockwise); zero when none is needed.
    pub rotation: i32,
    /// `true` when a landscape picture fills a portrait sequence (sides cropped).
    pub fill: bool,
}

impl MotionParams {
    /// Compensation for a clip of `clip` pixels with metadata `rotation`, placed in `sequence`.
    ///
    /// `None` when the clip is unrotated and its orientation needs no correction.
    pub fn compensate(clip: Dimensions, rotation: i32, sequence: Dimensions) -> Option<Self> {
        let effective = effective_dimensions(clip, rotation);
        let fill = sequence.is_portrait() && effective.is_landscape();
        if rotation == 0 && !fill {
            return None;
        }
        if effective.width == 0 || effective.height == 0 {
            return None;
        }

        let scale_x = f64::from(sequence.width) / f64::from(effective.width);
        let scale_y = f64::from(sequence.height) / f64::from(effective.height);
        let scale = if fill { scale_y } else { scale_x.min(scale_y) } * 100.0;

        Some(Self {
            scale: (scale * 100.0).round() / 100.0,
            rotation: editor_rotation(rotation),
            fill,
        })
    }

    /// Scale as written into documents.
    pub fn scale_label(&self) -> String {
        super::two_decimals(self.scale)
    }
}

/// Displayed dimensions once metadata rotation is applied.
pub fn effective_dimensions(clip: Dimensions, rotation: i32) -> Dimensions {
    match rotation {
        90 | 270 | -90 => clip.transposed(),
        _ => clip,
    }
}

/// Metadata rotation (clockwise) mapped to the editor's counter-clockwise convention.
pub fn editor_rotation(rotation: i32) -> i32 {
    match rotation {
        90 => -90,
        270 | -90 => 90,
        _ => 0,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/motion.rs"]
mod tests;

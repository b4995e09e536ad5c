//! Layout constraints: the space a node may occupy and how it should sit in
//! any space left over.
//!
//! Like styles, constraints are inherited by value. A parent hands each child
//! its own effective constraint with the maxima replaced by whatever space is
//! still free; the child's [`ConstraintOverride`] is then applied on top.

use serde::{Deserialize, Serialize};

/// Sentinel for "no limit" on an axis.
pub const UNBOUNDED: f64 = f64::INFINITY;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HAlign {
    Left,
    Center,
    Right,
    /// No alignment requested; content sits at the left edge.
    #[default]
    None,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
    /// No alignment requested; content sits at the top edge.
    #[default]
    None,
}

impl HAlign {
    /// Offset of content `extra` points narrower than its slot.
    pub fn offset(self, extra: f64) -> f64 {
        let extra = extra.max(0.0);
        match self {
            HAlign::Left | HAlign::None => 0.0,
            HAlign::Center => extra / 2.0,
            HAlign::Right => extra,
        }
    }
}

impl VAlign {
    pub fn offset(self, extra: f64) -> f64 {
        let extra = extra.max(0.0);
        match self {
            VAlign::Top | VAlign::None => 0.0,
            VAlign::Center => extra / 2.0,
            VAlign::Bottom => extra,
        }
    }
}

/// Fully resolved constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraint {
    pub max_width: f64,
    pub max_height: f64,
    pub halign: HAlign,
    pub valign: VAlign,
    /// Shrink to natural width instead of filling `max_width`.
    pub tight_width: bool,
    /// Shrink to natural height instead of filling `max_height`.
    pub tight_height: bool,
    /// When false, content larger than the maxima is an error rather than
    /// being clamped.
    pub shrinkable: bool,
}

impl Default for Constraint {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl Constraint {
    pub fn unbounded() -> Self {
        Self {
            max_width: UNBOUNDED,
            max_height: UNBOUNDED,
            halign: HAlign::None,
            valign: VAlign::None,
            tight_width: false,
            tight_height: true,
            shrinkable: true,
        }
    }

    pub fn bounded(max_width: f64, max_height: f64) -> Self {
        Self::unbounded().with_max(max_width, max_height)
    }

    /// Same constraint with new maxima. Negative space clamps to zero.
    pub fn with_max(self, max_width: f64, max_height: f64) -> Self {
        Self {
            max_width: max_width.max(0.0),
            max_height: max_height.max(0.0),
            ..self
        }
    }

    pub fn with_max_height(self, max_height: f64) -> Self {
        self.with_max(self.max_width, max_height)
    }

    pub fn width_bounded(&self) -> bool {
        self.max_width.is_finite()
    }

    pub fn height_bounded(&self) -> bool {
        self.max_height.is_finite()
    }

    /// Does a box of this size exceed the maxima?
    pub fn exceeded_by(&self, width: f64, height: f64) -> bool {
        width > self.max_width + EPSILON || height > self.max_height + EPSILON
    }

    /// Final size of a container whose content measures `content_w x content_h`.
    pub fn container_size(&self, content_w: f64, content_h: f64) -> (f64, f64) {
        let width = if self.tight_width || !self.width_bounded() {
            content_w
        } else {
            self.max_width
        };
        let height = if self.tight_height || !self.height_bounded() {
            content_h
        } else {
            self.max_height
        };
        (
            width.min(self.max_width).max(0.0),
            height.min(self.max_height).max(0.0),
        )
    }
}

/// Tolerance for comparing accumulated float sizes against a limit.
pub(crate) const EPSILON: f64 = 1e-6;

/// The fields a node sets on top of its inherited constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintOverride {
    pub max_width: Option<f64>,
    pub max_height: Option<f64>,
    pub halign: Option<HAlign>,
    pub valign: Option<VAlign>,
    pub tight_width: Option<bool>,
    pub tight_height: Option<bool>,
    pub shrinkable: Option<bool>,
}

impl ConstraintOverride {
    /// Apply this override to `parent`. Maxima can only narrow.
    pub fn resolve(&self, parent: &Constraint) -> Constraint {
        Constraint {
            max_width: self
                .max_width
                .map_or(parent.max_width, |w| w.max(0.0).min(parent.max_width)),
            max_height: self
                .max_height
                .map_or(parent.max_height, |h| h.max(0.0).min(parent.max_height)),
            halign: self.halign.unwrap_or(parent.halign),
            valign: self.valign.unwrap_or(parent.valign),
            tight_width: self.tight_width.unwrap_or(parent.tight_width),
            tight_height: self.tight_height.unwrap_or(parent.tight_height),
            shrinkable: self.shrinkable.unwrap_or(parent.shrinkable),
        }
    }

    // ── Builder ────────────────────────────────────────────────

    pub fn max_width(mut self, width: f64) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn max_height(mut self, height: f64) -> Self {
        self.max_height = Some(height);
        self
    }

    pub fn align(mut self, halign: HAlign, valign: VAlign) -> Self {
        self.halign = Some(halign);
        self.valign = Some(valign);
        self
    }

    pub fn halign(mut self, halign: HAlign) -> Self {
        self.halign = Some(halign);
        self
    }

    pub fn valign(mut self, valign: VAlign) -> Self {
        self.valign = Some(valign);
        self
    }

    pub fn tight(mut self, width: bool, height: bool) -> Self {
        self.tight_width = Some(width);
        self.tight_height = Some(height);
        self
    }

    /// Fill all available space on both axes.
    pub fn fill(self) -> Self {
        self.tight(false, false)
    }

    pub fn non_shrinkable(mut self) -> Self {
        self.shrinkable = Some(false);
        self
    }
}

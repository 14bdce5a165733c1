use mathbox_library::layout::{Abs, Em};
use mathbox_library::math::{AtomClass, Frame, MathSize, spacing};
use mathbox_library::text::MathFont;

/// Computes the advances of elements.
#[derive(Copy, Clone)]
pub struct Measurer<'a> {
    pub font: &'a dyn MathFont,
    pub font_size: Abs,
}

/// The advance of an operator and where its glyph sits within it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OperatorMetrics {
    pub lspace: Abs,
    pub width: Abs,
}

impl<'a> Measurer<'a> {
    pub fn new(font: &'a dyn MathFont, font_size: Abs) -> Self {
        Self { font, font_size }
    }

    /// The font size at a math size.
    pub fn size(&self, size: MathSize) -> Abs {
        let constants = self.font.constants();
        match size {
            MathSize::Display | MathSize::Text => self.font_size,
            MathSize::Script => self.font_size * constants.script_percent_scale_down,
            MathSize::ScriptScript => {
                self.font_size * constants.script_script_percent_scale_down
            }
        }
    }

    /// The advance of a text run.
    pub fn measure_text(&self, frame: &Frame) -> Abs {
        frame.width
    }

    /// The advance of a pre-rendered structure.
    pub fn measure_display(&self, frame: &Frame) -> Abs {
        frame.width
    }

    /// The advance of an explicit space.
    pub fn measure_explicit_space(&self, mu: f64, size: MathSize) -> Abs {
        Em::from_mu(mu).at(self.size(size))
    }

    /// The advance of an operator glyph including the spacing around it.
    ///
    /// A known neighbour gives the spacing of that pair. A missing one, at
    /// the edge of a list, gives the operator's default spacing, which is
    /// the spacing next to an ordinary atom. Spacing that only applies
    /// outside of scripts is zero in script sizes.
    pub fn measure_operator(
        &self,
        glyph_width: Abs,
        class: AtomClass,
        size: MathSize,
        left: Option<AtomClass>,
        right: Option<AtomClass>,
    ) -> OperatorMetrics {
        let font_size = self.size(size);
        let lspace = spacing(left.unwrap_or(AtomClass::Ordinary), class, size, font_size);
        let rspace = spacing(class, right.unwrap_or(AtomClass::Ordinary), size, font_size);
        OperatorMetrics { lspace, width: lspace + glyph_width + rspace }
    }

    /// The spacing between two adjacent elements.
    pub fn inter_element_spacing(&self, left: AtomClass, right: AtomClass, size: MathSize) -> Abs {
        spacing(left, right, size, self.size(size))
    }
}

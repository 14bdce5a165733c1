use ecow::EcoString;
use log::warn;
use mathbox_library::layout::{Abs, Axis, Em, Point};
use mathbox_library::math::{AtomClass, Frame, GlyphRun, MathSize, MathStyle, SourceRange};
use mathbox_library::text::{GlyphId, GlyphMetrics};
use smallvec::smallvec;

use super::MathContext;

/// Metrics of the box drawn for characters the font cannot show.
const NOTDEF: GlyphMetrics = GlyphMetrics {
    id: GlyphId(0),
    advance: Em::new(0.5),
    ascent: Em::new(0.7),
    descent: Em::zero(),
    italics: Em::zero(),
    accent_attach: None,
};

/// A laid out piece of a math list.
#[derive(Debug, Clone)]
pub enum MathFragment {
    Glyph(GlyphFragment),
    Frame(FrameFragment),
    Space(SpaceFragment),
}

impl MathFragment {
    pub fn width(&self) -> Abs {
        match self {
            Self::Glyph(glyph) => glyph.width(),
            Self::Frame(fragment) => fragment.frame.width,
            Self::Space(space) => space.width,
        }
    }

    pub fn ascent(&self) -> Abs {
        match self {
            Self::Glyph(glyph) => glyph.ascent(),
            Self::Frame(fragment) => fragment.frame.ascent,
            Self::Space(_) => Abs::zero(),
        }
    }

    pub fn descent(&self) -> Abs {
        match self {
            Self::Glyph(glyph) => glyph.descent(),
            Self::Frame(fragment) => fragment.frame.descent,
            Self::Space(_) => Abs::zero(),
        }
    }

    pub fn class(&self) -> AtomClass {
        match self {
            Self::Glyph(glyph) => glyph.class,
            Self::Frame(fragment) => fragment.class,
            Self::Space(_) => AtomClass::Ordinary,
        }
    }

    pub fn math_size(&self) -> MathSize {
        match self {
            Self::Glyph(glyph) => glyph.math_size,
            Self::Frame(fragment) => fragment.math_size,
            Self::Space(space) => space.math_size,
        }
    }

    pub fn font_size(&self) -> Abs {
        match self {
            Self::Glyph(glyph) => glyph.font_size,
            Self::Frame(fragment) => fragment.font_size,
            Self::Space(space) => space.font_size,
        }
    }

    /// Whether the fragment takes part in inter-atom spacing.
    pub fn is_spaced(&self) -> bool {
        !matches!(self, Self::Space(_))
    }

    /// Whether the fragment is a single character.
    pub fn is_character(&self) -> bool {
        matches!(self, Self::Glyph(_))
    }

    pub fn italics_correction(&self) -> Abs {
        match self {
            Self::Glyph(glyph) => glyph.italics(),
            Self::Frame(fragment) => fragment.italics_correction,
            Self::Space(_) => Abs::zero(),
        }
    }

    /// Where accents attach horizontally.
    pub fn accent_attach(&self) -> Abs {
        match self {
            Self::Glyph(glyph) => glyph.accent_attach(),
            Self::Frame(fragment) => {
                fragment.accent_attach.unwrap_or(fragment.frame.width / 2.0)
            }
            Self::Space(space) => space.width / 2.0,
        }
    }

    pub fn set_range(&mut self, range: SourceRange) {
        match self {
            Self::Glyph(glyph) => glyph.range = range,
            Self::Frame(fragment) => fragment.frame.range = range,
            Self::Space(_) => {}
        }
    }

    pub fn into_frame(self) -> Frame {
        match self {
            Self::Glyph(glyph) => glyph.into_frame(),
            Self::Frame(fragment) => fragment.frame,
            Self::Space(space) => Frame::space(space.width),
        }
    }
}

impl From<GlyphFragment> for MathFragment {
    fn from(glyph: GlyphFragment) -> Self {
        Self::Glyph(glyph)
    }
}

impl From<FrameFragment> for MathFragment {
    fn from(fragment: FrameFragment) -> Self {
        Self::Frame(fragment)
    }
}

impl From<SpaceFragment> for MathFragment {
    fn from(space: SpaceFragment) -> Self {
        Self::Space(space)
    }
}

/// A single glyph.
#[derive(Debug, Clone)]
pub struct GlyphFragment {
    pub text: EcoString,
    pub metrics: GlyphMetrics,
    pub font_size: Abs,
    pub class: AtomClass,
    pub math_size: MathSize,
    pub range: SourceRange,
    /// How far the glyph is raised above the baseline.
    pub shift: Abs,
}

impl GlyphFragment {
    /// Look up the glyph for a character. Characters the font lacks are
    /// shown as the font's `.notdef` glyph.
    pub fn new(ctx: &MathContext, c: char, style: MathStyle, class: AtomClass) -> Self {
        let metrics = ctx.font.glyph(c).unwrap_or_else(|| {
            warn!("font has no glyph for {c:?}, using notdef");
            ctx.font.glyph_by_id(GlyphId(0)).unwrap_or(NOTDEF)
        });
        Self {
            text: c.into(),
            metrics,
            font_size: ctx.font_size(style),
            class,
            math_size: style.size,
            range: SourceRange::detached(),
            shift: Abs::zero(),
        }
    }

    pub fn width(&self) -> Abs {
        self.metrics.advance.at(self.font_size)
    }

    pub fn ascent(&self) -> Abs {
        self.metrics.ascent.at(self.font_size) + self.shift
    }

    pub fn descent(&self) -> Abs {
        self.metrics.descent.at(self.font_size) - self.shift
    }

    pub fn italics(&self) -> Abs {
        self.metrics.italics.at(self.font_size)
    }

    pub fn accent_attach(&self) -> Abs {
        self.metrics.attach().at(self.font_size)
    }

    /// Replace the glyph with a variant that is at least `target - short_fall`
    /// long along the axis. If no variant is long enough, the longest one is
    /// used.
    pub fn stretch(&mut self, ctx: &MathContext, target: Abs, short_fall: Abs, axis: Axis) {
        let advance = match axis {
            Axis::X => self.width(),
            Axis::Y => self.metrics.height().at(self.font_size),
        };
        let short_target = target - short_fall;
        if short_target <= advance {
            return;
        }

        let variants = ctx.font.variants(self.metrics.id, axis);
        let mut best = None;
        for variant in &variants {
            best = Some(variant);
            if short_target <= variant.advance.at(self.font_size) {
                break;
            }
        }

        let Some(best) = best else {
            log::debug!("{:?} has no variants along {axis:?}", self.text);
            return;
        };
        if best.advance.at(self.font_size) < short_target {
            warn!("no variant of {:?} reaches {short_target:?}, using the largest", self.text);
        }
        self.metrics = best.metrics;
    }

    /// Move the glyph vertically so that it is centered on the math axis.
    pub fn center_on_axis(&mut self, axis_height: Abs) {
        let ascent = self.metrics.ascent.at(self.font_size);
        let descent = self.metrics.descent.at(self.font_size);
        self.shift = axis_height - (ascent - descent) / 2.0;
    }

    pub fn into_frame(self) -> Frame {
        let run = GlyphRun {
            text: self.text,
            glyphs: smallvec![self.metrics.id],
            size: self.font_size,
        };
        let glyph = Frame::glyphs(
            run,
            self.metrics.advance.at(self.font_size),
            self.metrics.ascent.at(self.font_size),
            self.metrics.descent.at(self.font_size),
        )
        .with_range(self.range);

        if self.shift == Abs::zero() {
            return glyph;
        }

        let mut frame = Frame::group().with_range(self.range);
        frame.width = glyph.width;
        frame.push_grow(Point::with_y(self.shift), glyph);
        frame
    }
}

/// An already laid out frame.
#[derive(Debug, Clone)]
pub struct FrameFragment {
    pub frame: Frame,
    pub class: AtomClass,
    pub math_size: MathSize,
    pub font_size: Abs,
    pub italics_correction: Abs,
    pub accent_attach: Option<Abs>,
}

impl FrameFragment {
    pub fn new(ctx: &MathContext, style: MathStyle, frame: Frame) -> Self {
        Self {
            frame,
            class: AtomClass::Ordinary,
            math_size: style.size,
            font_size: ctx.font_size(style),
            italics_correction: Abs::zero(),
            accent_attach: None,
        }
    }

    pub fn with_class(self, class: AtomClass) -> Self {
        Self { class, ..self }
    }

    pub fn with_italics_correction(self, italics_correction: Abs) -> Self {
        Self { italics_correction, ..self }
    }

    pub fn with_accent_attach(self, accent_attach: Abs) -> Self {
        Self { accent_attach: Some(accent_attach), ..self }
    }
}

/// Horizontal space.
#[derive(Debug, Clone)]
pub struct SpaceFragment {
    pub width: Abs,
    pub math_size: MathSize,
    pub font_size: Abs,
}

impl SpaceFragment {
    pub fn new(ctx: &MathContext, style: MathStyle, width: Abs) -> Self {
        Self {
            width,
            math_size: style.size,
            font_size: ctx.font_size(style),
        }
    }
}

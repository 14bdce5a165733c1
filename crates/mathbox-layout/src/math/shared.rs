use mathbox_library::layout::Em;

/// Resolve a math constant at the font size of a style.
macro_rules! scaled {
    ($ctx:expr, $style:expr, $name:ident) => {
        $ctx.constants.$name.at($ctx.font_size($style))
    };
}

/// How much less high scaled delimiters can be than what they wrap.
pub const DELIM_SHORT_FALL: Em = Em::new(0.1);

/// The fraction of the wrapped content a delimiter must at least cover.
pub const DELIMITER_FACTOR: f64 = 0.901;

/// Space in place of a missing delimiter.
pub const NULL_DELIMITER_SPACE: Em = Em::new(0.12);

/// Space between a stretched delimiter and what it wraps.
pub const DELIMITER_PADDING: Em = Em::new(1.0 / 18.0);

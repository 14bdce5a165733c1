/// Create a lazy initialized, globally unique `'static` reference to a value.
#[macro_export]
macro_rules! singleton {
    ($ty:ty, $value:expr) => {{
        static VALUE: $crate::once_cell::sync::Lazy<$ty> =
            $crate::once_cell::sync::Lazy::new(|| $value);
        &*VALUE
    }};
}

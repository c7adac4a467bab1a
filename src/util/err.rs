/// Converts errors from their error type (of the submodule) to that of
/// a `waymark::Error` variant.
///
/// ```rust,ignore
/// use waymark::route::RouteError;
/// waymark::impl_err!(RouteError, Route);
/// ```
pub mod err_macro {
    #[macro_export]
    macro_rules! impl_err {
        ($from:ty, $variant:ident) => {
            impl From<$from> for $crate::Error {
                fn from(value: $from) -> Self {
                    $crate::Error::$variant(value)
                }
            }
        };
    }

    pub use impl_err;
}

/// A `&'static scraper::Selector` compiled on first use.
/// The pattern must be a valid CSS selector literal.
#[macro_export]
macro_rules! selector {
    ($css: literal) => {{
        static SELECTOR: $crate::__private::Lazy<$crate::__private::Selector> =
            $crate::__private::Lazy::new(|| {
                $crate::__private::Selector::parse($css).expect(concat!("Invalid selector: ", $css))
            });
        &*SELECTOR
    }};
}

/// A `&'static regex::Regex` compiled on first use.
#[macro_export]
macro_rules! regex {
    ($pattern: literal) => {{
        static PATTERN: $crate::__private::Lazy<$crate::__private::Regex> =
            $crate::__private::Lazy::new(|| {
                $crate::__private::Regex::new($pattern).expect(concat!("Invalid regex: ", $pattern))
            });
        &*PATTERN
    }};
}

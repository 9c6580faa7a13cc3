#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Build a [`Complex`](crate::Complex) from a literal, panicking on bad input.
///
/// Meant for tests and fixtures where the literal is known to be valid.
#[macro_export]
macro_rules! complex {
    ($lit:literal) => {
        <$crate::Complex as ::std::str::FromStr>::from_str($lit).unwrap()
    };
}

/// Build an [`Agent`](crate::Agent) from a literal, panicking on bad input.
#[macro_export]
macro_rules! agent {
    ($lit:literal) => {
        <$crate::Agent as ::std::str::FromStr>::from_str($lit).unwrap()
    };
}

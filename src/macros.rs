// src/macros.rs

/// String shorthand.
/// `s!()` is an empty `String`, `s!(x)` is `String::from(x)`.
#[macro_export]
macro_rules! s {
    () => {
        ::std::string::String::new()
    };
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

/// Concatenate string slices into a fresh `String`.
/// Used for URL and file-name assembly.
#[macro_export]
macro_rules! join {
    ($first:expr $(, $rest:expr)+ $(,)?) => {{
        let mut out = ::std::string::String::from($first);
        $(
            out.push_str($rest);
        )+
        out
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn s_and_join() {
        let empty: String = s!();
        assert!(empty.is_empty());
        assert_eq!(s!("race"), "race".to_string());
        assert_eq!(join!("race/", "omloop", "/startlist"), "race/omloop/startlist");
    }
}

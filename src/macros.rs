// src/macros.rs
#[macro_export]
macro_rules! s {
    // String shorthand!
    () => {
        ::std::string::String::new()
    };
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

#[macro_export]
macro_rules! lines {
    // Newline-joined String from any number of string-likes (no trailing '\n')
    ($first:expr $(, $rest:expr)* $(,)?) => {{
        let mut s = ::std::string::String::from($first);
        $(
            s.push('\n');
            s.push_str($rest);
        )*
        s
    }};
}

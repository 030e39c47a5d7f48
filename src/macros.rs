macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

macro_rules! rule {
    (
        id: $id:expr,
        kind: $kind:expr,
        pattern: $pat:literal
        $(, buckets: $buckets:expr)?
        , prod: $produce:expr
        $(,)?
    ) => {
        $crate::FieldRule {
            id: $id,
            kind: $kind,
            matcher: $crate::Matcher::Regex { re: $crate::regex!($pat), produce: $produce },
            buckets: { 0 $(| $buckets)? },
        }
    };
}

macro_rules! scan_rule {
    (
        id: $id:expr,
        kind: $kind:expr
        $(, buckets: $buckets:expr)?
        , scan: $scan:expr
        $(,)?
    ) => {
        $crate::FieldRule {
            id: $id,
            kind: $kind,
            matcher: $crate::Matcher::Scan($scan),
            buckets: { 0 $(| $buckets)? },
        }
    };
}

pub(crate) use {regex, rule, scan_rule};

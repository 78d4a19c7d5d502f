//! Sample expressions shared by the compile benchmarks

/// Short everyday paths
pub const SIMPLE_PATHS: &[(&str, &str)] = &[
    ("root", "/"),
    ("name", "book"),
    ("absolute", "/library/shelf/book"),
    ("descendant", "//book"),
    ("attribute", "/library/book/@isbn"),
    ("axis", "ancestor-or-self::section/following-sibling::*"),
    ("kind_test", "//chapter/text()"),
];

/// Paths whose cost is dominated by predicate parsing
pub const PREDICATE_PATHS: &[(&str, &str)] = &[
    ("position", "/library/book[3]"),
    ("equals", "//book[@lang = 'en']/title"),
    ("contains", "//book[contains(title, 'Rust')]"),
    ("boolean", "//book[@lang = 'en' and price or not(@draft) and author]"),
    (
        "grouped",
        "//book[(@lang = 'en' or @lang = 'de') and (contains(title, 'XML') or 1)]",
    ),
];

/// A path with `depth` levels of nested predicates, e.g. `a[a[a]]`
pub fn nested_path(depth: usize) -> String {
    format!("{}a{}", "a[".repeat(depth), "]".repeat(depth))
}

/// A predicate joining `terms` existence tests with alternating combinators
pub fn wide_predicate(terms: usize) -> String {
    let body: Vec<String> = (0..terms).map(|i| format!("t{i}")).collect();
    let mut out = String::from("a[");
    for (i, term) in body.iter().enumerate() {
        if i > 0 {
            out.push_str(if i % 2 == 0 { " or " } else { " and " });
        }
        out.push_str(term);
    }
    out.push(']');
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use xmlpath_core::compile;

    #[test]
    fn test_samples_compile() {
        for (name, path) in SIMPLE_PATHS.iter().chain(PREDICATE_PATHS) {
            assert!(compile(path).is_ok(), "sample {name} should compile");
        }
    }

    #[test]
    fn test_generated_paths_compile() {
        assert_eq!(nested_path(2), "a[a[a]]");
        assert!(compile(&nested_path(16)).is_ok());
        assert_eq!(wide_predicate(3), "a[t0 and t1 or t2]");
        assert!(compile(&wide_predicate(64)).is_ok());
    }
}

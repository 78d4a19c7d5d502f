//! Indented tree rendering of compiled paths

use std::fmt;
use xmlpath_core::{CompiledPath, Predicate, Step};

const INDENT: &str = "  ";

/// Renders a compiled path as one line per path, step and predicate node
pub struct Tree<'a>(&'a CompiledPath);

pub fn tree(path: &CompiledPath) -> Tree<'_> {
    Tree(path)
}

impl fmt::Display for Tree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_path(f, self.0, 0)
    }
}

/// Start a line at `depth`; every line but the first begins with a newline
fn line(f: &mut fmt::Formatter<'_>, depth: usize, first: bool) -> fmt::Result {
    if !first {
        f.write_str("\n")?;
    }
    for _ in 0..depth {
        f.write_str(INDENT)?;
    }
    Ok(())
}

fn write_path(f: &mut fmt::Formatter<'_>, path: &CompiledPath, depth: usize) -> fmt::Result {
    line(f, depth, depth == 0)?;
    write!(f, "path {:?}", path.source())?;
    for step in path.steps() {
        write_step(f, step, depth + 1)?;
    }
    Ok(())
}

fn write_step(f: &mut fmt::Formatter<'_>, step: &Step, depth: usize) -> fmt::Result {
    line(f, depth, false)?;
    f.write_str("step")?;
    if step.is_root() {
        f.write_str(" root")?;
    }
    write!(
        f,
        " axis={} kind={} test={}",
        step.axis(),
        step.node_kind(),
        step.node_test()
    )?;
    match step.predicate() {
        Some(predicate) => write_predicate(f, predicate, depth + 1),
        None => Ok(()),
    }
}

fn write_predicate(f: &mut fmt::Formatter<'_>, predicate: &Predicate, depth: usize) -> fmt::Result {
    line(f, depth, false)?;
    match predicate {
        Predicate::Position(n) => write!(f, "position {n}"),
        Predicate::Contains { path, literal } => {
            write!(f, "contains {literal:?}")?;
            write_path(f, path, depth + 1)
        }
        Predicate::Not(path) => {
            f.write_str("not")?;
            write_path(f, path, depth + 1)
        }
        Predicate::Equals { path, literal } => {
            write!(f, "equals {literal:?}")?;
            write_path(f, path, depth + 1)
        }
        Predicate::Exists(path) => {
            f.write_str("exists")?;
            write_path(f, path, depth + 1)
        }
        Predicate::And(terms) | Predicate::Or(terms) => {
            f.write_str(if matches!(predicate, Predicate::And(_)) {
                "and"
            } else {
                "or"
            })?;
            for term in terms {
                write_predicate(f, term, depth + 1)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use xmlpath_core::compile;

    #[test]
    fn test_tree_plain_path() {
        let path = compile("/a/@b").unwrap();
        assert_eq!(
            tree(&path).to_string(),
            "path \"/a/@b\"\n  step root axis=child kind=node test=a\n  step axis=attribute kind=attribute test=b"
        );
    }

    #[test]
    fn test_tree_predicates() {
        let path = compile("a[b = 'x' or 2]").unwrap();
        let expected = [
            "path \"a[b = 'x' or 2]\"",
            "  step axis=child kind=node test=a",
            "    or",
            "      equals \"x\"",
            "        path \"b \"",
            "          step axis=child kind=node test=b",
            "      position 2",
        ]
        .join("\n");
        assert_eq!(tree(&path).to_string(), expected);
    }

    #[test]
    fn test_tree_absolute_sub_path() {
        let path = compile("a[not(/b)]").unwrap();
        let expected = [
            "path \"a[not(/b)]\"",
            "  step axis=child kind=node test=a",
            "    not",
            "      path \"/b\"",
            "        step root axis=child kind=node test=b",
        ]
        .join("\n");
        let rendered = tree(&path).to_string();
        assert_eq!(rendered, expected);
        assert!(!rendered.ends_with('\n'));
    }
}

use std::fmt::Write as _;

use anyhow::{Result, bail};

/// Desired shape of a single named entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Empty placeholder file.
    File,
    /// Directory holding a flat list of empty files.
    DirWithFiles(Vec<String>),
    /// Directory holding a nested description.
    DirWithTree(Tree),
}

/// Ordered mapping from entry name to [`Node`]; iteration follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<(String, Node)>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, rejecting names that are not a single path component
    /// or that are already present at this level.
    pub fn insert(&mut self, name: impl Into<String>, node: Node) -> Result<()> {
        let name = name.into();
        validate_name(&name)?;
        if let Node::DirWithFiles(files) = &node {
            for file in files {
                validate_name(file)?;
            }
        }
        if self.entries.iter().any(|(existing, _)| existing == &name) {
            bail!("duplicate entry `{name}`");
        }
        self.entries.push((name, node));
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Whether a directory entry called `name` sits at this level.
    pub fn has_dir(&self, name: &str) -> bool {
        self.iter().any(|(entry, node)| {
            entry == name && matches!(node, Node::DirWithFiles(_) | Node::DirWithTree(_))
        })
    }

    /// Render as an indented listing, directories suffixed with `/`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        render_into(self, 0, &mut out);
        out
    }
}

#[cfg(test)]
impl Tree {
    pub fn file(mut self, name: &str) -> Result<Self> {
        self.insert(name, Node::File)?;
        Ok(self)
    }

    pub fn dir_with_files(mut self, name: &str, files: &[&str]) -> Result<Self> {
        let files = files.iter().map(|f| (*f).to_owned()).collect();
        self.insert(name, Node::DirWithFiles(files))?;
        Ok(self)
    }

    pub fn dir(mut self, name: &str, subtree: Tree) -> Result<Self> {
        self.insert(name, Node::DirWithTree(subtree))?;
        Ok(self)
    }
}

fn render_into(tree: &Tree, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    for (name, node) in tree.iter() {
        match node {
            Node::File => {
                let _ = writeln!(out, "{indent}{name}");
            }
            Node::DirWithFiles(files) => {
                let _ = writeln!(out, "{indent}{name}/");
                for file in files {
                    let _ = writeln!(out, "{indent}  {file}");
                }
            }
            Node::DirWithTree(subtree) => {
                let _ = writeln!(out, "{indent}{name}/");
                render_into(subtree, depth + 1, out);
            }
        }
    }
}

/// Entry names must resolve to exactly one normal component under their parent.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("entry name must not be empty");
    }
    if name == "." || name == ".." {
        bail!("entry name `{name}` is not allowed");
    }
    if name.contains(['/', '\\']) {
        bail!("entry name `{name}` must not contain path separators");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let tree = Tree::new()
            .file("z.txt")
            .unwrap()
            .dir_with_files("a", &["x"])
            .unwrap()
            .dir("m", Tree::new())
            .unwrap();
        let names: Vec<_> = tree.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["z.txt", "a", "m"]);
    }

    #[test]
    fn rejects_bad_names() {
        assert!(Tree::new().file("").is_err());
        assert!(Tree::new().file("..").is_err());
        assert!(Tree::new().file("a/b").is_err());
        assert!(Tree::new().dir_with_files("ok", &["nested/file"]).is_err());
        assert!(Tree::new().file("a").unwrap().file("a").is_err());
    }

    #[test]
    fn has_dir_ignores_files_and_nested_entries() {
        let tree = Tree::new()
            .dir("lib", Tree::new().dir("core", Tree::new()).unwrap())
            .unwrap()
            .dir_with_files("assets", &[])
            .unwrap()
            .file("main")
            .unwrap();
        assert!(tree.has_dir("lib"));
        assert!(tree.has_dir("assets"));
        assert!(!tree.has_dir("main"));
        assert!(!tree.has_dir("core"));
    }

    #[test]
    fn render_lists_nested_entries() {
        let tree = Tree::new()
            .dir(
                "a",
                Tree::new().dir_with_files("b", &["c.txt"]).unwrap(),
            )
            .unwrap()
            .file("README.md")
            .unwrap();
        assert_eq!(tree.render(), "a/\n  b/\n    c.txt\nREADME.md\n");
    }
}

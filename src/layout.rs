use std::fs;

use anyhow::{Context, Result, bail};
use camino::Utf8Path;
use toml_edit::{DocumentMut, Item, TableLike};

use crate::templates;
use crate::tree::{Node, Tree};

pub const DEFAULT_LAYOUT: &str = "flutter";
const LAYOUT_DIR: &str = "layouts";
const FILE_MARKER: &str = "file";

/// Names of the layouts compiled into the binary.
pub fn available() -> Vec<String> {
    templates::list(LAYOUT_DIR)
        .into_iter()
        .filter_map(|name| name.strip_suffix(".toml").map(str::to_owned))
        .collect()
}

pub fn builtin(name: &str) -> Result<Tree> {
    let raw = builtin_source(name)?;
    parse(&raw).with_context(|| format!("parsing built-in layout `{name}`"))
}

fn builtin_source(name: &str) -> Result<String> {
    if !available().iter().any(|known| known == name) {
        bail!(
            "unknown layout `{name}` (available: {})",
            available().join(", ")
        );
    }
    templates::get_string(&template_name(name))
}

fn template_name(name: &str) -> String {
    format!("{LAYOUT_DIR}/{name}.toml")
}

/// Load a layout description from a TOML file on disk.
pub fn load(path: &Utf8Path) -> Result<Tree> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading layout {}", path))?;
    parse(&raw).with_context(|| format!("parsing layout {}", path))
}

/// Write a built-in layout to `path` as a starting point for a custom one.
pub fn export(name: &str, path: &Utf8Path, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        bail!("{} already exists; rerun with --force to overwrite", path);
    }
    builtin_source(name)?;
    templates::write_template(path, &template_name(name))
}

/// Parse a TOML layout: tables are directories, string arrays are
/// directories of empty files, and the string `"file"` is an empty file.
pub fn parse(raw: &str) -> Result<Tree> {
    let doc: DocumentMut = raw.parse()?;
    convert(doc.as_table(), "")
}

fn convert(table: &dyn TableLike, prefix: &str) -> Result<Tree> {
    let mut tree = Tree::new();
    for (key, item) in table.iter() {
        let key_path = if prefix.is_empty() {
            key.to_owned()
        } else {
            format!("{prefix}.{key}")
        };
        let node = convert_item(item, &key_path)?;
        tree.insert(key, node)
            .with_context(|| format!("invalid entry `{key_path}`"))?;
    }
    Ok(tree)
}

fn convert_item(item: &Item, key_path: &str) -> Result<Node> {
    if let Some(table) = item.as_table_like() {
        return Ok(Node::DirWithTree(convert(table, key_path)?));
    }
    if let Some(array) = item.as_array() {
        let mut files = Vec::with_capacity(array.len());
        for value in array.iter() {
            let Some(name) = value.as_str() else {
                bail!("`{key_path}` must list file names as strings");
            };
            files.push(name.to_owned());
        }
        return Ok(Node::DirWithFiles(files));
    }
    match item.as_str() {
        Some(FILE_MARKER) => Ok(Node::File),
        Some(other) => bail!("`{key_path}` has unknown marker \"{other}\" (expected \"{FILE_MARKER}\")"),
        None => bail!("`{key_path}` must be a table, an array of file names, or \"{FILE_MARKER}\""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child<'a>(tree: &'a Tree, name: &str) -> &'a Node {
        tree.iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, node)| node)
            .unwrap_or_else(|| panic!("no entry {name}"))
    }

    fn subtree<'a>(tree: &'a Tree, name: &str) -> &'a Tree {
        match child(tree, name) {
            Node::DirWithTree(sub) => sub,
            other => panic!("{name} is not a nested directory: {other:?}"),
        }
    }

    #[test]
    fn parses_all_three_shapes() {
        let tree = parse(
            r#"
"README.md" = "file"
assets = ["products.json"]

[a.b]
c = []
"#,
        )
        .unwrap();

        assert_eq!(child(&tree, "README.md"), &Node::File);
        assert_eq!(
            child(&tree, "assets"),
            &Node::DirWithFiles(vec!["products.json".to_owned()])
        );
        let b = subtree(subtree(&tree, "a"), "b");
        assert_eq!(child(b, "c"), &Node::DirWithFiles(Vec::new()));
    }

    #[test]
    fn keeps_document_order() {
        let tree = parse("z = \"file\"\nm = []\na = \"file\"\n").unwrap();
        let names: Vec<_> = tree.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["z", "m", "a"]);
    }

    #[test]
    fn inline_tables_are_directories() {
        let tree = parse("a = { b = [\"c.txt\"] }\n").unwrap();
        let a = subtree(&tree, "a");
        assert_eq!(child(a, "b"), &Node::DirWithFiles(vec!["c.txt".to_owned()]));
    }

    #[test]
    fn rejects_unknown_values_with_key_path() {
        let err = parse("[lib]\nmain = 3\n").unwrap_err();
        assert!(format!("{err:#}").contains("lib.main"));

        let err = parse("a = \"dir\"\n").unwrap_err();
        assert!(format!("{err:#}").contains("unknown marker"));

        let err = parse("a = [1, 2]\n").unwrap_err();
        assert!(format!("{err:#}").contains("file names as strings"));

        let err = parse("a = [\"../escape\"]\n").unwrap_err();
        assert!(format!("{err:#}").contains("invalid entry `a`"));
    }

    #[test]
    fn builtin_flutter_layout_is_complete() {
        assert!(available().contains(&DEFAULT_LAYOUT.to_owned()));

        let tree = builtin(DEFAULT_LAYOUT).unwrap();
        let lib = subtree(&tree, "lib");
        assert_eq!(child(lib, "main.dart"), &Node::File);
        assert_eq!(child(lib, "injection_container.dart"), &Node::File);

        let presentation = subtree(subtree(subtree(lib, "features"), "catalog"), "presentation");
        assert_eq!(
            child(presentation, "blocs"),
            &Node::DirWithFiles(vec![
                "catalog_bloc.dart".to_owned(),
                "catalog_event.dart".to_owned(),
                "catalog_state.dart".to_owned(),
            ])
        );

        let test = subtree(&tree, "test");
        let product_detail = subtree(subtree(test, "features"), "product_detail");
        assert!(product_detail.iter().next().is_none());
        assert_eq!(child(&tree, "pubspec.yaml"), &Node::File);
    }

    #[test]
    fn unknown_builtin_lists_available() {
        let err = builtin("nope").unwrap_err();
        assert!(err.to_string().contains(DEFAULT_LAYOUT));
    }

    #[test]
    fn export_refuses_to_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let path = Utf8Path::from_path(tmp.path()).unwrap().join("layout.toml");

        export(DEFAULT_LAYOUT, &path, false).unwrap();
        assert!(export(DEFAULT_LAYOUT, &path, false).is_err());
        export(DEFAULT_LAYOUT, &path, true).unwrap();

        assert_eq!(load(&path).unwrap(), builtin(DEFAULT_LAYOUT).unwrap());
    }
}

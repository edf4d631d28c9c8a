/*
 * SPDX-FileCopyrightText: 2026 The linkrank authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Extraction of the link graph of a directory of HTML pages.

use anyhow::{Context, Result};
use linkrank::prelude::*;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Matches the `href` attribute of `<a>` tags.
const HREF_PATTERN: &str = r#"<a\s+(?:[^>]*?)href="([^"]*)""#;

/// Returns the set of `href` targets matched by `href` in `contents`,
/// excluding `page` itself.
fn extract_links(href: &Regex, page: &str, contents: &str) -> BTreeSet<String> {
    href.captures_iter(contents)
        .map(|c| c[1].to_owned())
        .filter(|link| link != page)
        .collect()
}

/// Parses the `.html` files of a directory (non-recursively) and returns
/// the graph of the links between them.
///
/// Nodes are file names. Links to files outside the directory are dropped,
/// so pages whose links all point outside become dangling.
pub fn crawl(dir: impl AsRef<Path>) -> Result<LinkGraph<String>> {
    let dir = dir.as_ref();
    log::info!("Crawling {}", dir.display());
    let href = Regex::new(HREF_PATTERN)?;

    let mut pages = BTreeMap::new();
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("Could not read directory {}", dir.display()))?
    {
        let entry = entry.with_context(|| format!("Could not read directory {}", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            log::warn!("Skipping file with non-UTF-8 name {}", path.display());
            continue;
        };
        if !name.ends_with(".html") {
            continue;
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Could not read page {}", path.display()))?;
        pages.insert(name.to_owned(), extract_links(&href, name, &contents));
    }

    let graph = LinkGraph::from_links_lossy(pages);
    log::info!(
        "Found {} pages and {} links",
        graph.num_nodes(),
        graph.num_arcs()
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_links() -> Result<()> {
        let contents = r#"
            <html><body>
            <a href="2.html">Two</a>
            <a class="x" href="3.html">Three</a>
            <a href="1.html">Self</a>
            <a href="2.html">Two again</a>
            <link href="style.css">
            <ahref="4.html">
            </body></html>
        "#;
        let links = extract_links(&Regex::new(HREF_PATTERN)?, "1.html", contents);
        assert_eq!(
            links.into_iter().collect::<Vec<_>>(),
            vec!["2.html".to_owned(), "3.html".to_owned()]
        );
        Ok(())
    }

    #[test]
    fn test_crawl() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(
            dir.path().join("a.html"),
            r#"<a href="b.html">b</a> <a href="https://example.com">out</a>"#,
        )?;
        std::fs::write(dir.path().join("b.html"), r#"<a href="a.html">a</a>"#)?;
        std::fs::write(dir.path().join("c.html"), r#"<a href="missing.html">x</a>"#)?;
        std::fs::write(dir.path().join("notes.txt"), r#"<a href="a.html">a</a>"#)?;
        std::fs::create_dir(dir.path().join("sub.html"))?;

        let g = crawl(dir.path())?;
        assert_eq!(g.num_nodes(), 3);
        assert_eq!(g.num_arcs(), 2);
        let a = "a.html".to_owned();
        let c = "c.html".to_owned();
        assert_eq!(
            g.links(&a)?.cloned().collect::<Vec<_>>(),
            vec!["b.html".to_owned()]
        );
        assert_eq!(g.links(&c)?.count(), 0);
        Ok(())
    }

    #[test]
    fn test_missing_dir() {
        assert!(crawl("/this/directory/does/not/exist").is_err());
    }
}

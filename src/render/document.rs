// Plugin list page assembly.
// Combines the fixed page head, the table and the PDF fallback layout.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::plugin::PluginInfo;

use super::definitions::plugin_definitions;
use super::table::rst_table;

const FILE_HEAD: &str = r"
.. Note this file is autogenerated by scripts/update-plugin-list.py - usually weekly via github action

.. _plugin-list:

Pytest Plugin List
==================

Below is an automated compilation of ``pytest``` plugins available on `PyPI <https://pypi.org>`_.
It includes PyPI projects whose names begin with ``pytest-`` or ``pytest_`` and a handful of manually selected projects.
Packages classified as inactive are excluded.

For detailed insights into how this list is generated,
please refer to `the update script <https://github.com/pytest-dev/pytest/blob/main/scripts/update-plugin-list.py>`_.

.. warning::

   Please be aware that this list is not a curated collection of projects
   and does not undergo a systematic review process.
   It serves purely as an informational resource to aid in the discovery of ``pytest`` plugins.

   Do not presume any endorsement from the ``pytest`` project or its developers,
   and always conduct your own quality assessment before incorporating any of these plugins into your own projects.


.. The following conditional uses a different format for this list when
   creating a PDF, because otherwise the table gets far too wide for the
   page.

";

const TABLE_INDENT: &str = "   ";
const DEFINITIONS_INDENT: &str = "  ";

/// Render the complete plugin list page.
pub fn render_document(plugins: &[PluginInfo]) -> String {
    let table = rst_table(&PluginInfo::HEADERS, plugins.iter().map(PluginInfo::cells));

    let mut out = String::from(FILE_HEAD);
    out.push_str(&format!("This list contains {} plugins.\n\n", plugins.len()));
    out.push_str(".. only:: not latex\n\n");
    out.push_str(&indent(&table, TABLE_INDENT));
    out.push_str("\n\n");
    out.push_str(".. only:: latex\n\n");
    out.push_str(&indent(&plugin_definitions(plugins), DEFINITIONS_INDENT));
    out
}

/// Write the rendered page, creating parent directories as needed.
pub fn write_document(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, text)?;
    Ok(())
}

/// Prefix every line that is not whitespace-only, keeping line endings.
fn indent(text: &str, prefix: &str) -> String {
    split_lines_inclusive(text)
        .into_iter()
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{}{}", prefix, line)
            }
        })
        .collect()
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split into lines that keep their terminators.
///
/// Every Unicode line boundary ends a line and `\r\n` counts as one.
fn split_lines_inclusive(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        let mut end = i + c.len_utf8();
        if c == '\r' {
            if let Some(&(j, '\n')) = chars.peek() {
                end = j + 1;
                chars.next();
            }
        }
        lines.push(&text[start..end]);
        start = end;
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

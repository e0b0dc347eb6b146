// src/core/html.rs
use std::collections::HashMap;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use super::sanitize::normalize_ws;

#[derive(Clone, Debug, Error)]
#[error("bad selector `{css}`: {msg}")]
pub struct SelectorError {
    css: String,
    msg: String,
}

pub fn selector(css: &str) -> Result<Selector, SelectorError> {
    Selector::parse(css).map_err(|e| SelectorError { css: s!(css), msg: format!("{e:?}") })
}

type Cached = LazyLock<Result<Selector, SelectorError>>;

static THEAD_TH: Cached = LazyLock::new(|| selector("thead th"));
static BODY_TR: Cached = LazyLock::new(|| selector("tbody > tr"));
static TD: Cached = LazyLock::new(|| selector("td"));

/// Fixed selectors are parsed once per process.
fn cached(sel: &'static Cached) -> Result<&'static Selector, SelectorError> {
    sel.as_ref().map_err(Clone::clone)
}

/// Visible text of an element, whitespace collapsed.
pub fn text_of(el: ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<String>())
}

/// Every `<table>` carrying `class` (among others), in document order.
pub fn tables_with_class<'a>(doc: &'a Html, class: &str) -> Result<Vec<ElementRef<'a>>, SelectorError> {
    let sel = selector(&format!("table.{class}"))?;
    Ok(doc.select(&sel).collect())
}

/// Header text -> column index over every `<th>` in `<thead>`.
/// Repeated names keep the last index.
pub fn header_index(table: ElementRef<'_>) -> Result<HashMap<String, usize>, SelectorError> {
    Ok(table
        .select(cached(&THEAD_TH)?)
        .enumerate()
        .map(|(i, th)| (text_of(th), i))
        .collect())
}

/// `<tr>` rows of the table body, skipping nested tables.
pub fn body_rows<'a>(table: ElementRef<'a>) -> Result<Vec<ElementRef<'a>>, SelectorError> {
    Ok(table.select(cached(&BODY_TR)?).collect())
}

/// Text of each `<td>` in a row (row-header `<th>` cells excluded).
pub fn td_texts(row: ElementRef<'_>) -> Result<Vec<String>, SelectorError> {
    Ok(row.select(cached(&TD)?).map(text_of).collect())
}

pub fn has_class(el: ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
        <table class="stats_table row_summable">
          <thead><tr><th>Rk</th><th>Date</th><th>PTS</th></tr></thead>
          <tbody>
            <tr><th>1</th><td>2022-10-18</td><td> 31 </td></tr>
            <tr class="thead"><th>Rk</th><th>Date</th><th>PTS</th></tr>
          </tbody>
        </table>
        <table class="other"><tbody><tr><td>x</td></tr></tbody></table>
    "#;

    #[test]
    fn finds_tables_by_class() {
        let doc = Html::parse_document(DOC);
        assert_eq!(tables_with_class(&doc, "row_summable").unwrap().len(), 1);
        assert_eq!(tables_with_class(&doc, "missing").unwrap().len(), 0);
    }

    #[test]
    fn headers_and_cells_line_up() {
        let doc = Html::parse_document(DOC);
        let table = tables_with_class(&doc, "row_summable").unwrap()[0];
        let headers = header_index(table).unwrap();
        assert_eq!(headers["Rk"], 0);
        assert_eq!(headers["PTS"], 2);

        let rows = body_rows(table).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(td_texts(rows[0]).unwrap(), vec!["2022-10-18", "31"]);
        assert!(td_texts(rows[1]).unwrap().is_empty());
        assert!(has_class(rows[1], "thead"));
    }

    #[test]
    fn fixed_selectors_parse_once_and_stay_valid() {
        let first = cached(&TD).unwrap();
        let again = cached(&TD).unwrap();
        assert!(std::ptr::eq(first, again));
        assert!(cached(&THEAD_TH).is_ok());
        assert!(cached(&BODY_TR).is_ok());
    }
}

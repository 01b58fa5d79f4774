use std::sync::LazyLock;

use scraper::{Html, Selector};

static TABLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());
static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

/// Only the leading cells of a row carry gene links; later columns are stats.
const LINK_CELLS_PER_ROW: usize = 6;

/// Collect profile links from every table of a search results page.
///
/// Walks tables, then rows, then the first six cells of each row, in document
/// order. A cell contributes the `href` of its first anchor when that href
/// contains `marker` (with default settings,
/// `&stageSelect=cstage&dataOption_clinical=expression`). Duplicates are kept.
pub fn extract_profile_links(html: &str, marker: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let mut links = Vec::new();

    for table in doc.select(&TABLE) {
        for row in table.select(&ROW) {
            for cell in row.select(&CELL).take(LINK_CELLS_PER_ROW) {
                let Some(anchor) = cell.select(&ANCHOR).next() else {
                    continue;
                };
                let Some(href) = anchor.value().attr("href") else {
                    continue;
                };
                if href.contains(marker) {
                    links.push(href.to_string());
                }
            }
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE_LINK_MARKER: &str = "&stageSelect=cstage&dataOption_clinical=expression";

    fn row(cells: &[&str]) -> String {
        let tds: String = cells.iter().map(|c| format!("<td>{}</td>", c)).collect();
        format!("<tr>{}</tr>", tds)
    }

    fn link(gene: &str) -> String {
        format!(
            "<a href=\"/cgi-bin/clinical_profile.cgi?geneChoice={}&amp;customSub=Basal&amp;cancerSelect=HNSC&amp;stageSelect=cstage&amp;dataOption_clinical=expression\">{}</a>",
            gene, gene
        )
    }

    #[test]
    fn no_matching_anchor() {
        let html = format!(
            "<table>{}{}</table><table>{}</table>",
            row(&["TP53", "<a href=\"/gene?name=TP53\">TP53</a>"]),
            row(&["1.0", "2.0"]),
            row(&["<a href=\"/other.cgi?stageSelect=pstage\">x</a>"]),
        );
        assert!(extract_profile_links(&html, PROFILE_LINK_MARKER).is_empty());
    }

    #[test]
    fn anchor_in_third_cell() {
        let href = "/profile?geneChoice=TP53&stageSelect=cstage&dataOption_clinical=expression";
        let html = format!(
            "<table>{}</table>",
            row(&["a", "b", &format!("<a href=\"{}\">TP53</a>", href), "d"])
        );
        let links = extract_profile_links(&html, PROFILE_LINK_MARKER);
        assert_eq!(links, vec![href.to_string()]);
    }

    #[test]
    fn seventh_cell_ignored() {
        let mut cells = vec!["x"; 6];
        let late = link("EGFR");
        cells.push(&late);
        let html = format!("<table>{}</table>", row(&cells));
        assert!(extract_profile_links(&html, PROFILE_LINK_MARKER).is_empty());
    }

    #[test]
    fn sixth_cell_included() {
        let mut cells = vec!["x"; 5];
        let last = link("EGFR");
        cells.push(&last);
        let html = format!("<table>{}</table>", row(&cells));
        assert_eq!(extract_profile_links(&html, PROFILE_LINK_MARKER).len(), 1);
    }

    #[test]
    fn document_order_and_duplicates() {
        let html = format!(
            "<table>{}{}</table><table>{}</table>",
            row(&[&link("TP53"), &link("TP53")]),
            row(&[&link("EGFR")]),
            row(&[&link("KRAS")]),
        );
        let links = extract_profile_links(&html, PROFILE_LINK_MARKER);
        let genes: Vec<_> = links
            .iter()
            .map(|l| l.split("geneChoice=").nth(1).unwrap().split('&').next().unwrap())
            .collect();
        assert_eq!(genes, vec!["TP53", "TP53", "EGFR", "KRAS"]);
    }

    #[test]
    fn anchor_without_href_skipped() {
        let html = format!("<table>{}</table>", row(&["<a name=\"top\">top</a>", &link("MYC")]));
        assert_eq!(extract_profile_links(&html, PROFILE_LINK_MARKER).len(), 1);
    }

    #[test]
    fn custom_marker() {
        let html = format!(
            "<table>{}</table>",
            row(&["<a href=\"/p?g=A&stageSelect=pstage&dataOption_clinical=expression\">A</a>"])
        );
        assert!(extract_profile_links(&html, PROFILE_LINK_MARKER).is_empty());
        let links = extract_profile_links(&html, "&stageSelect=pstage&dataOption_clinical=expression");
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn search_fixture() {
        let html = std::fs::read_to_string("tests/fixtures/search_results.html").unwrap();
        let links = extract_profile_links(&html, PROFILE_LINK_MARKER);
        assert_eq!(links.len(), 12, "got: {:?}", links);
        assert!(links[0].contains("geneChoice=TP53"));
        assert!(links.iter().all(|l| l.contains(PROFILE_LINK_MARKER)));
    }
}

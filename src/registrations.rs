//! Registration roster scraping for one competition page. Fetch and parse
//! are split so the parser can be exercised on fixture HTML.

use scraper::{Html, Selector};
use tracing::{info, warn};

use crate::constants::registrations_url;
use crate::error::Result;
use crate::types::Registrant;

/// Fetch the registrations page and parse the competitor table. The roster
/// is held in memory only; nothing is persisted.
pub async fn fetch_registrations(competition_id: &str) -> Result<Vec<Registrant>> {
    let url = registrations_url(competition_id);
    info!("Fetching registrations from {}", url);

    let body = reqwest::get(&url).await?.error_for_status()?.text().await?;
    let registrants = parse_registrations(&body);

    info!("Parsed {} registrants", registrants.len());
    if registrants.is_empty() {
        warn!("No registrants found - the page structure may have changed");
    }
    Ok(registrants)
}

/// Extract (name, WCA ID) pairs from the registrations table. The first
/// cell of each row holds the competitor name; competitors with prior
/// results link to their profile page, whose last path segment is the WCA
/// ID. First-time competitors have plain text and no ID.
pub fn parse_registrations(html: &str) -> Vec<Registrant> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse("table").unwrap();
    let row_selector = Selector::parse("tr").unwrap();
    let cell_selector = Selector::parse("td").unwrap();
    let link_selector = Selector::parse("a").unwrap();

    let Some(table) = document.select(&table_selector).next() else {
        return Vec::new();
    };

    let mut registrants = Vec::new();
    // Skip the header row, matching the table layout on the WCA site
    for row in table.select(&row_selector).skip(1) {
        let Some(cell) = row.select(&cell_selector).next() else {
            continue;
        };

        let registrant = match cell.select(&link_selector).next() {
            Some(link) => {
                let name = link.text().collect::<String>().trim().to_string();
                let wca_id = link
                    .value()
                    .attr("href")
                    .and_then(|href| href.trim_end_matches('/').rsplit('/').next())
                    .filter(|id| !id.is_empty())
                    .map(String::from);
                Registrant { name, wca_id }
            }
            None => Registrant {
                name: cell.text().collect::<String>().trim().to_string(),
                wca_id: None,
            },
        };

        if !registrant.name.is_empty() {
            registrants.push(registrant);
        }
    }

    registrants
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE_HTML: &str = r#"
        <html><body>
        <table>
          <tr><th>Name</th><th>Country</th></tr>
          <tr>
            <td><a href="/persons/2009ZEMD01">Alice Zemdegs</a></td>
            <td>Australia</td>
          </tr>
          <tr>
            <td>Bob Newcomer</td>
            <td>USA</td>
          </tr>
          <tr><td></td><td></td></tr>
        </table>
        </body></html>
    "#;

    #[test]
    fn parses_linked_and_unlinked_registrants() {
        let registrants = parse_registrations(FIXTURE_HTML);
        assert_eq!(
            registrants,
            vec![
                Registrant {
                    name: "Alice Zemdegs".to_string(),
                    wca_id: Some("2009ZEMD01".to_string()),
                },
                Registrant {
                    name: "Bob Newcomer".to_string(),
                    wca_id: None,
                },
            ]
        );
    }

    #[test]
    fn page_without_a_table_yields_an_empty_roster() {
        assert!(parse_registrations("<html><body><p>404</p></body></html>").is_empty());
    }
}

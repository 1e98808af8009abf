// src/specs/startlist.rs
//
// Race start list page: `<site>/race/<slug>/<year>/startlist`.
//
// Layout (current):
//   <ul class="startlist_v4">
//     <li> team header … <ul> <li><a href="rider/tadej-pogacar">POGAČAR Tadej</a></li> … </ul></li>
//   </ul>
// Older seasons used `startlist_v3` / `startlist`. Rider links elsewhere on
// the page (sidebars, "popular riders") must not leak in, so only links
// inside a known container count.

use std::collections::HashSet;

use scraper::Html;

use crate::config::consts::STARTLIST_SUFFIX;
use crate::core::html::{selector, text_of};
use crate::core::sanitize::site_relative;
use crate::error::FetchError;
use crate::model::Entrant;

/// Container selectors, most recent layout first.
const CONTAINERS: [&str; 3] = ["ul.startlist_v4", "ul.startlist_v3", ".startlist"];
const RIDER_LINK: &str = r#"a[href*="rider/"]"#;

/// Full start-list URL for a race locator.
///
/// - `race/omloop-het-nieuwsblad/2026` → `<base>race/omloop-het-nieuwsblad/2026/startlist`
/// - a full `http(s)://` URL is kept, with `/startlist` appended if missing.
pub fn startlist_url(base: &str, locator: &str) -> String {
    let loc = locator.trim().trim_end_matches('/');
    let url = if loc.starts_with("http://") || loc.starts_with("https://") {
        s!(loc)
    } else {
        join!(base.trim_end_matches('/'), "/", loc.trim_start_matches('/'))
    };
    if url.ends_with(STARTLIST_SUFFIX) {
        url
    } else {
        join!(&url, STARTLIST_SUFFIX)
    }
}

/// Extract entrants from a start-list page, in page order, one per rider.
///
/// No container → empty list (start list not published yet).
pub fn parse_startlist(doc: &str, base: &str) -> Result<Vec<Entrant>, FetchError> {
    let html = Html::parse_document(doc);
    let link_sel = selector(RIDER_LINK)?;

    for css in CONTAINERS {
        let container_sel = selector(css)?;
        let Some(container) = html.select(&container_sel).next() else {
            continue;
        };

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for a in container.select(&link_sel) {
            let Some(href) = a.value().attr("href") else { continue };
            let rider_id = site_relative(href, base);
            if !rider_id.starts_with("rider/") || !seen.insert(rider_id.clone()) {
                continue;
            }
            out.push(Entrant { rider_id, rider_name: text_of(a) });
        }
        tracing::debug!(container = css, riders = out.len(), "parsed start list");
        return Ok(out);
    }

    tracing::debug!("no start list container on page");
    Ok(Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.procyclingstats.com/";

    const V4: &str = r#"
        <html><head><title>Omloop Het Nieuwsblad 2026 Startlist</title></head><body>
        <div class="sidebar"><a href="rider/wout-van-aert">Popular: VAN AERT Wout</a></div>
        <ul class="startlist_v4">
          <li>
            <div class="ridersCont">
              <a class="team" href="team/team-visma-lease-a-bike-2026">Team Visma | Lease a Bike</a>
              <ul>
                <li><span class="bib">1</span><a href="rider/matteo-jorgenson"><span class="uppercase">JORGENSON</span> Matteo</a></li>
                <li><span class="bib">2</span><a href="/rider/christophe-laporte">LAPORTE&nbsp;Christophe</a></li>
              </ul>
            </div>
          </li>
          <li>
            <div class="ridersCont">
              <a class="team" href="team/alpecin-deceuninck-2026">Alpecin - Deceuninck</a>
              <ul>
                <li><a href="rider/mathieu-van-der-poel">VAN DER POEL Mathieu</a></li>
                <li><a href="rider/mathieu-van-der-poel">VAN DER POEL Mathieu</a></li>
              </ul>
            </div>
          </li>
        </ul>
        </body></html>
    "#;

    #[test]
    fn parses_v4_layout() {
        let riders = parse_startlist(V4, BASE).unwrap();
        assert_eq!(
            riders,
            vec![
                Entrant::new("rider/matteo-jorgenson", "JORGENSON Matteo"),
                Entrant::new("rider/christophe-laporte", "LAPORTE Christophe"),
                Entrant::new("rider/mathieu-van-der-poel", "VAN DER POEL Mathieu"),
            ]
        );
    }

    #[test]
    fn falls_back_to_older_layout() {
        let doc = r#"<div class="page"><a href="rider/x">X</a><div class="startlist"><a href="rider/y">Y y</a></div></div>"#;
        assert_eq!(parse_startlist(doc, BASE).unwrap(), vec![Entrant::new("rider/y", "Y y")]);
    }

    #[test]
    fn unpublished_start_list_is_empty() {
        let doc = r#"<html><body><p>Startlist not yet available</p><a href="rider/x">X</a></body></html>"#;
        assert!(parse_startlist(doc, BASE).unwrap().is_empty());
    }

    #[test]
    fn url_from_path_and_full_url() {
        assert_eq!(
            startlist_url(BASE, "race/omloop-het-nieuwsblad/2026"),
            "https://www.procyclingstats.com/race/omloop-het-nieuwsblad/2026/startlist"
        );
        assert_eq!(
            startlist_url(BASE, "/race/strade-bianche/2026/"),
            "https://www.procyclingstats.com/race/strade-bianche/2026/startlist"
        );
        assert_eq!(
            startlist_url(BASE, "https://www.procyclingstats.com/race/milano-sanremo/2026/startlist"),
            "https://www.procyclingstats.com/race/milano-sanremo/2026/startlist"
        );
        assert_eq!(
            startlist_url(BASE, "https://mirror.example/race/e3/2026"),
            "https://mirror.example/race/e3/2026/startlist"
        );
    }
}

// src/ingest/parse.rs
//! Feed parsing: raw XML text in, canonical `RawEntry` records out.
//!
//! Both dialects seen on arXiv endpoints are accepted: RSS 2.0 (the public
//! listing feeds) and Atom (the query API). Cardinality ambiguity inherent to
//! XML-to-struct mapping is resolved here, once: fields that may appear zero,
//! one, or many times always land in a `Vec`, scalars in an `Option`.
//! Downstream code never branches on shape again.

use anyhow::{bail, Context, Result};
use quick_xml::de::from_str;
use quick_xml::events::Event;
use serde::Deserialize;

/// Canonical per-item record, normalized immediately after deserialization.
/// No invariants beyond shape: any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub title: Option<String>,
    pub page_url: Option<String>,
    /// Date/time literal exactly as the feed carried it.
    pub published: Option<String>,
    pub summary: Option<String>,
    pub authors: Vec<String>,
    pub categories: Vec<String>,
    /// Direct PDF link when the feed provides one (Atom does, RSS does not).
    pub pdf_url: Option<String>,
    /// arXiv announce type ("new", "cross", "replace"); RSS only.
    pub announce_type: Option<String>,
}

// ---------------------------------------------------------------------------
// RSS 2.0 (rss/channel/item)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    // One element with comma-joined names, or repeated elements; both occur.
    #[serde(rename = "creator", default)]
    creators: Vec<String>,
    #[serde(rename = "category", default)]
    categories: Vec<String>,
    #[serde(rename = "announce_type")]
    announce_type: Option<String>,
}

impl From<Item> for RawEntry {
    fn from(it: Item) -> Self {
        RawEntry {
            title: trimmed(it.title),
            page_url: trimmed(it.link),
            published: trimmed(it.pub_date),
            summary: trimmed(it.description),
            authors: split_creators(&it.creators),
            categories: trimmed_list(it.categories),
            pdf_url: None,
            announce_type: trimmed(it.announce_type),
        }
    }
}

// ---------------------------------------------------------------------------
// Atom (feed/entry), as served by the arXiv query API
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    id: Option<String>,
    title: Option<String>,
    summary: Option<String>,
    published: Option<String>,
    #[serde(rename = "author", default)]
    authors: Vec<AtomAuthor>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    #[serde(rename = "category", default)]
    categories: Vec<AtomCategory>,
}

#[derive(Debug, Deserialize)]
struct AtomAuthor {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@rel")]
    rel: Option<String>,
    #[serde(rename = "@title")]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomCategory {
    #[serde(rename = "@term")]
    term: Option<String>,
}

impl From<AtomEntry> for RawEntry {
    fn from(e: AtomEntry) -> Self {
        let page_url = e
            .links
            .iter()
            .find(|l| l.rel.as_deref() == Some("alternate"))
            .and_then(|l| l.href.clone())
            .or_else(|| e.id.clone());
        let pdf_url = e
            .links
            .iter()
            .find(|l| l.title.as_deref() == Some("pdf"))
            .and_then(|l| l.href.clone());

        RawEntry {
            title: trimmed(e.title),
            page_url: trimmed(page_url),
            published: trimmed(e.published),
            summary: trimmed(e.summary),
            authors: e
                .authors
                .into_iter()
                .filter_map(|a| trimmed(a.name))
                .collect(),
            categories: e
                .categories
                .into_iter()
                .filter_map(|c| trimmed(c.term))
                .collect(),
            pdf_url: trimmed(pdf_url),
            announce_type: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Parse feed text into canonical entries, preserving document order.
/// Malformed XML or an unrecognized root element is fatal for the run.
pub fn parse_feed(text: &str) -> Result<Vec<RawEntry>> {
    match root_element(text)?.as_str() {
        "rss" => {
            let rss: Rss = from_str(text).context("parsing rss feed xml")?;
            Ok(rss.channel.items.into_iter().map(RawEntry::from).collect())
        }
        "feed" => {
            let feed: AtomFeed = from_str(text).context("parsing atom feed xml")?;
            Ok(feed.entries.into_iter().map(RawEntry::from).collect())
        }
        other => bail!("unrecognized feed document root <{other}>"),
    }
}

/// Name of the first start element, used to dispatch between dialects.
fn root_element(text: &str) -> Result<String> {
    let mut reader = quick_xml::Reader::from_str(text);
    loop {
        match reader.read_event().context("reading feed xml")? {
            Event::Start(e) | Event::Empty(e) => {
                let name = e.name();
                let local = name.as_ref().split(|b| *b == b':').next_back().unwrap_or(&[]);
                return Ok(String::from_utf8_lossy(local).into_owned());
            }
            Event::Eof => bail!("feed body contains no xml elements"),
            _ => continue,
        }
    }
}

fn trimmed(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn trimmed_list(v: Vec<String>) -> Vec<String> {
    v.into_iter().filter_map(|s| trimmed(Some(s))).collect()
}

/// RSS carries authors as `dc:creator`, sometimes one comma-joined string,
/// sometimes repeated elements. Always flatten to one name per slot.
fn split_creators(creators: &[String]) -> Vec<String> {
    creators
        .iter()
        .flat_map(|c| c.split(','))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS_ONE_ITEM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:arxiv="http://arxiv.org/schemas/atom">
  <channel>
    <title>cs.CL updates on arXiv.org</title>
    <item>
      <title>A Single Paper</title>
      <link>https://arxiv.org/abs/2403.00001</link>
      <description>arXiv:2403.00001v1 Announce Type: new
Abstract: Only one item today.</description>
      <dc:creator>Ada Lovelace, Alan Turing</dc:creator>
      <category>cs.CL</category>
      <pubDate>Tue, 05 Mar 2024 00:00:00 -0400</pubDate>
      <arxiv:announce_type>new</arxiv:announce_type>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn single_item_feed_yields_one_element_sequence() {
        let entries = parse_feed(RSS_ONE_ITEM).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title.as_deref(), Some("A Single Paper"));
        assert_eq!(entries[0].announce_type.as_deref(), Some("new"));
    }

    #[test]
    fn comma_joined_creators_are_split_into_a_list() {
        let entries = parse_feed(RSS_ONE_ITEM).unwrap();
        assert_eq!(entries[0].authors, vec!["Ada Lovelace", "Alan Turing"]);
    }

    #[test]
    fn single_category_and_list_category_normalize_equally() {
        let single = r#"<rss><channel><item>
            <title>t</title><category>cs.CL</category>
        </item></channel></rss>"#;
        let listed = r#"<rss><channel><item>
            <title>t</title><category>cs.CL</category><category>cs.LG</category>
        </item></channel></rss>"#;
        let one = parse_feed(single).unwrap();
        let many = parse_feed(listed).unwrap();
        assert_eq!(one[0].categories, vec!["cs.CL"]);
        assert_eq!(many[0].categories, vec!["cs.CL", "cs.LG"]);
    }

    #[test]
    fn atom_entry_maps_links_and_terms() {
        let atom = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <id>http://arxiv.org/abs/2403.00002v1</id>
    <title>An Atom Paper</title>
    <summary>  Abstract text here.  </summary>
    <published>2024-03-05T10:00:00Z</published>
    <author><name>Grace Hopper</name></author>
    <author><name>Donald Knuth</name></author>
    <link href="http://arxiv.org/abs/2403.00002v1" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/2403.00002v1" rel="related"/>
    <category term="cs.CL"/>
  </entry>
</feed>"#;
        let entries = parse_feed(atom).unwrap();
        assert_eq!(entries.len(), 1);
        let e = &entries[0];
        assert_eq!(e.page_url.as_deref(), Some("http://arxiv.org/abs/2403.00002v1"));
        assert_eq!(e.pdf_url.as_deref(), Some("http://arxiv.org/pdf/2403.00002v1"));
        assert_eq!(e.authors, vec!["Grace Hopper", "Donald Knuth"]);
        assert_eq!(e.categories, vec!["cs.CL"]);
        assert_eq!(e.summary.as_deref(), Some("Abstract text here."));
    }

    #[test]
    fn non_xml_body_is_a_parse_error() {
        assert!(parse_feed("503 Service Unavailable").is_err());
    }

    #[test]
    fn unrecognized_root_is_rejected() {
        assert!(parse_feed("<html><body>oops</body></html>").is_err());
    }
}

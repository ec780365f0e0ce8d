//! Built-in channel catalog and the listing endpoint.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::cors;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub group: String,
    pub logo: String,
    pub url: String,
}

fn channel(id: &str, name: &str, group: &str, logo: &str, url: &str) -> Channel {
    Channel {
        id: id.to_string(),
        name: name.to_string(),
        group: group.to_string(),
        logo: logo.to_string(),
        url: url.to_string(),
    }
}

/// The predefined catalog. Stream URLs are public HLS endpoints; most of their
/// CDNs only answer requests that look like they come from a browser, which is
/// why playback goes through the relay.
pub fn builtin_catalog() -> Vec<Channel> {
    vec![
        channel(
            "nasa-public",
            "NASA TV Public",
            "Science",
            "https://i.imgur.com/Pz5V1Ta.png",
            "https://ntv1.akamaized.net/hls/live/2014075/NASA-NTV1-HLS/master.m3u8",
        ),
        channel(
            "red-bull-tv",
            "Red Bull TV",
            "Sports",
            "https://i.imgur.com/7NeBmWr.png",
            "https://rbmn-live.akamaized.net/hls/live/590964/BoRB-AT/master.m3u8",
        ),
        channel(
            "dw-english",
            "DW English",
            "News",
            "https://i.imgur.com/A1xzjOI.png",
            "https://dwamdstream102.akamaized.net/hls/live/2015525/dwstream102/index.m3u8",
        ),
        channel(
            "france24-en",
            "France 24 English",
            "News",
            "https://i.imgur.com/61MSiq9.png",
            "https://static.france24.com/live/F24_EN_LO_HLS/live_web.m3u8",
        ),
        channel(
            "aljazeera-en",
            "Al Jazeera English",
            "News",
            "https://i.imgur.com/7bRVpnu.png",
            "https://live-hls-web-aje.getaj.net/AJE/01.m3u8",
        ),
        channel(
            "bloomberg-us",
            "Bloomberg TV",
            "Business",
            "https://i.imgur.com/OuogLHx.png",
            "https://bloomberg.com/media-manifest/streams/us.m3u8",
        ),
        channel(
            "rakuten-action",
            "Rakuten Action Movies",
            "Entertainment",
            "https://i.imgur.com/mHzWGVd.png",
            "https://rakuten-actionmovies-1-eu.rakuten.wurl.tv/playlist.m3u8",
        ),
        channel(
            "fashion-tv",
            "Fashion TV",
            "Entertainment",
            "https://i.imgur.com/9fPNrNT.png",
            "https://fash1043.cloudycdn.services/slive/_definst_/ftv_ftv_midnite_k1y_27049_midnite_secr_108_hls.smil/playlist.m3u8",
        ),
        channel(
            "cgtn-doc",
            "CGTN Documentary",
            "Science",
            "https://i.imgur.com/TSG6WtN.png",
            "https://livedocus.cgtn.com/1000d/prog_index.m3u8",
        ),
        channel(
            "classic-arts",
            "Classic Arts Showcase",
            "Music",
            "https://i.imgur.com/tezrpyk.png",
            "https://classicartsshowcase.akamaized.net/hls/live/2033862/CAS/master.m3u8",
        ),
    ]
}

/// Case-insensitive catalog filter: `search` is a substring match on the
/// channel name, `group` an exact group match. Absent filters match everything.
pub fn filter_channels<'a>(
    catalog: &'a [Channel],
    search: Option<&str>,
    group: Option<&str>,
) -> Vec<&'a Channel> {
    let needle = search.map(str::to_lowercase);
    let group = group.map(str::to_lowercase);
    catalog
        .iter()
        .filter(|entry| {
            needle
                .as_deref()
                .map_or(true, |n| entry.name.to_lowercase().contains(n))
        })
        .filter(|entry| {
            group
                .as_deref()
                .map_or(true, |g| entry.group.to_lowercase() == g)
        })
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct ChannelQuery {
    pub search: Option<String>,
    pub group: Option<String>,
}

pub async fn list_channels(
    State(state): State<AppState>,
    Query(query): Query<ChannelQuery>,
) -> Response {
    let matches = filter_channels(&state.catalog, query.search.as_deref(), query.group.as_deref());
    let mut response = Json(matches).into_response();
    cors::apply_cors(response.headers_mut());
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique() {
        let catalog = builtin_catalog();
        let mut ids: Vec<_> = catalog.iter().map(|c| c.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn no_filters_returns_the_whole_catalog() {
        let catalog = builtin_catalog();
        assert_eq!(filter_channels(&catalog, None, None).len(), catalog.len());
    }

    #[test]
    fn search_matches_name_substrings_case_insensitively() {
        let catalog = builtin_catalog();
        let matches = filter_channels(&catalog, Some("nasa"), None);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "nasa-public");
    }

    #[test]
    fn group_filter_is_exact_but_case_insensitive() {
        let catalog = builtin_catalog();
        let news = filter_channels(&catalog, None, Some("NEWS"));
        assert!(!news.is_empty());
        assert!(news.iter().all(|c| c.group == "News"));
    }

    #[test]
    fn search_and_group_filters_combine() {
        let catalog = builtin_catalog();
        let matches = filter_channels(&catalog, Some("english"), Some("news"));
        assert!(matches.iter().all(|c| c.group == "News"));
        assert!(matches
            .iter()
            .all(|c| c.name.to_lowercase().contains("english")));
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn unmatched_search_returns_nothing() {
        let catalog = builtin_catalog();
        assert!(filter_channels(&catalog, Some("no such channel"), None).is_empty());
    }
}

//! Playback URL derivation from a streaming locator's resolved paths.

use mediaflow_client::models::{ListPathsResponse, StreamingProtocol};

/// Build the HLS playback URL for Apple devices.
///
/// Scans the resolved paths for the first HLS entry with a non-empty path
/// list and joins it with the streaming endpoint's hostname. Returns an
/// empty string when no HLS path is present; callers treat that as "no URL
/// available", not as an error.
pub fn hls_playback_url(host_name: &str, paths: &ListPathsResponse) -> String {
    for streaming_path in &paths.streaming_paths {
        if streaming_path.streaming_protocol == StreamingProtocol::Hls {
            if let Some(path) = streaming_path.paths.first() {
                return format!("https://{}/{}", host_name, path.trim_start_matches('/'));
            }
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediaflow_client::models::StreamingPath;

    fn path(protocol: StreamingProtocol, paths: &[&str]) -> StreamingPath {
        StreamingPath {
            streaming_protocol: protocol,
            encryption_scheme: Some("CommonEncryptionCbcs".to_string()),
            paths: paths.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn picks_the_hls_entry_over_dash() {
        let response = ListPathsResponse {
            streaming_paths: vec![
                path(StreamingProtocol::Dash, &["/asset/manifest(format=mpd)"]),
                path(StreamingProtocol::Hls, &["/asset/manifest(format=m3u8)"]),
            ],
            download_paths: vec![],
        };

        let url = hls_playback_url("endpoint.streaming.example.net", &response);
        assert_eq!(
            url,
            "https://endpoint.streaming.example.net/asset/manifest(format=m3u8)"
        );
    }

    #[test]
    fn no_hls_entry_yields_empty_string() {
        let response = ListPathsResponse {
            streaming_paths: vec![path(StreamingProtocol::Dash, &["/asset/manifest(format=mpd)"])],
            download_paths: vec![],
        };

        assert_eq!(hls_playback_url("host", &response), "");
    }

    #[test]
    fn hls_entry_without_paths_is_skipped() {
        let response = ListPathsResponse {
            streaming_paths: vec![
                path(StreamingProtocol::Hls, &[]),
                path(StreamingProtocol::Hls, &["/asset/a.m3u8"]),
            ],
            download_paths: vec![],
        };

        assert_eq!(hls_playback_url("host", &response), "https://host/asset/a.m3u8");
    }

    #[test]
    fn empty_path_list_yields_empty_string() {
        let response = ListPathsResponse {
            streaming_paths: vec![],
            download_paths: vec![],
        };

        assert_eq!(hls_playback_url("host", &response), "");
    }
}
